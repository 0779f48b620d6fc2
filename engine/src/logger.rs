use std::sync::OnceLock;

use chrono::Local;

static LOGGER: OnceLock<Logger> = OnceLock::new();

pub struct Logger {
    prefix: Option<String>,
}

impl Logger {
    fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    pub fn log(&self, message: &str) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        match &self.prefix {
            Some(prefix) => println!("[{}][{}] {}", timestamp, prefix, message),
            None => println!("[{}] {}", timestamp, message),
        }
    }
}

/// Installs the process-wide logger. Calling this more than once keeps the
/// first prefix.
pub fn init_logger(prefix: Option<String>) {
    LOGGER.get_or_init(|| Logger::new(prefix));
}

pub fn log(message: &str) {
    LOGGER.get_or_init(|| Logger::new(None)).log(message);
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::logger::log(&format!($($arg)*))
    };
}
