use std::io::ErrorKind;
use std::path::PathBuf;

use crate::log;

#[derive(Debug)]
pub enum HighScoreError {
    IoError(std::io::Error),
}

impl std::fmt::Display for HighScoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HighScoreError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for HighScoreError {}

impl From<std::io::Error> for HighScoreError {
    fn from(e: std::io::Error) -> Self {
        HighScoreError::IoError(e)
    }
}

/// Persistence boundary for the single best-score integer.
pub trait HighScoreStore {
    /// Missing or unreadable state is worth 0, never an error.
    fn load(&self) -> u32;

    fn save(&mut self, value: u32) -> Result<(), HighScoreError>;
}

/// Stores the high score as a plain decimal integer in a text file.
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

fn parse_high_score(content: &str) -> u32 {
    content.trim().parse().unwrap_or(0)
}

impl HighScoreStore for FileHighScoreStore {
    fn load(&self) -> u32 {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => parse_high_score(&content),
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    log!(
                        "Failed to read high score file {}: {}",
                        self.path.display(),
                        e
                    );
                }
                0
            }
        }
    }

    fn save(&mut self, value: u32) -> Result<(), HighScoreError> {
        std::fs::write(&self.path, value.to_string())?;
        Ok(())
    }
}

/// Keeps the high score for the process lifetime only.
#[derive(Default)]
pub struct MemoryHighScoreStore {
    value: u32,
}

impl MemoryHighScoreStore {
    pub fn new(value: u32) -> Self {
        Self { value }
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load(&self) -> u32 {
        self.value
    }

    fn save(&mut self, value: u32) -> Result<(), HighScoreError> {
        self.value = value;
        Ok(())
    }
}
