use serde::{Deserialize, Serialize};

use super::types::FieldSize;

/// Tunable parameters of a play session. Defaults match the classic setup:
/// a 30x30 field, a three-segment snake at 10 ticks per second, and a
/// difficulty bump every 5 points.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub field_width: usize,
    pub field_height: usize,
    pub initial_snake_length: usize,
    pub initial_speed: u32,
    pub speed_increment: u32,
    pub obstacle_threshold: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            field_width: 30,
            field_height: 30,
            initial_snake_length: 3,
            initial_speed: 10,
            speed_increment: 1,
            obstacle_threshold: 5,
        }
    }
}

impl GameSettings {
    pub fn field_size(&self) -> FieldSize {
        FieldSize::new(self.field_width, self.field_height)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.field_width < 10 || self.field_width > 100 {
            return Err("Field width must be between 10 and 100".to_string());
        }
        if self.field_height < 10 || self.field_height > 100 {
            return Err("Field height must be between 10 and 100".to_string());
        }
        if self.initial_snake_length < 3 {
            return Err("Initial snake length must be at least 3".to_string());
        }
        if self.initial_snake_length >= self.field_width.min(self.field_height) {
            return Err("Initial snake length must fit inside the field".to_string());
        }
        if self.initial_speed < 1 || self.initial_speed > 120 {
            return Err("Initial speed must be between 1 and 120 ticks per second".to_string());
        }
        if self.speed_increment < 1 || self.speed_increment > 20 {
            return Err("Speed increment must be between 1 and 20".to_string());
        }
        if self.obstacle_threshold < 1 {
            return Err("Obstacle threshold must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GameSettings::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_fields() {
        let bad = [
            GameSettings { field_width: 5, ..Default::default() },
            GameSettings { field_height: 200, ..Default::default() },
            GameSettings { initial_snake_length: 2, ..Default::default() },
            GameSettings { initial_snake_length: 30, ..Default::default() },
            GameSettings { initial_speed: 0, ..Default::default() },
            GameSettings { speed_increment: 0, ..Default::default() },
            GameSettings { obstacle_threshold: 0, ..Default::default() },
        ];

        for settings in bad {
            assert!(settings.validate().is_err(), "accepted {:?}", settings);
        }
    }
}
