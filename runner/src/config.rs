use serde::{Deserialize, Serialize};
use snake_engine::config::Validate;
use snake_engine::game::GameSettings;

/// Host-side configuration: simulation settings plus where the best score
/// lives on disk.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameSettings,
    pub high_score_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            game: GameSettings::default(),
            high_score_file: "snake_highscore.txt".to_string(),
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<(), String> {
        self.game.validate()?;
        if self.high_score_file.is_empty() {
            return Err("High score file path must not be empty".to_string());
        }
        Ok(())
    }
}
