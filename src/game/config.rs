use serde::{Deserialize, Serialize};

/// Fastest starting pace, in ticks per second (one tick per millisecond)
pub const MAX_SPEED: u32 = 1000;

/// Configuration for a single run
///
/// Defaults reproduce the classic 800x600 board drawn with 20px blocks:
/// a 40x30 grid, a three-segment snake starting at (5, 5) heading right,
/// and ten ticks per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Cell occupied by the head of the seed snake
    pub start_x: i32,
    pub start_y: i32,
    /// Ticks per second at level 0
    pub initial_speed: u32,
    /// A level is gained whenever the score lands on a multiple of this
    pub level_step: u32,

    // Food
    pub food_weight_min: u32,
    pub food_weight_max: u32,
    /// Ticks a food item survives before it is replaced
    pub food_ticks_min: u32,
    pub food_ticks_max: u32,
    /// Random draws tried before the spawner scans for free cells
    pub spawn_attempts: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 40,
            grid_height: 30,
            initial_snake_length: 3,
            start_x: 5,
            start_y: 5,
            initial_speed: 10,
            level_step: 5,
            food_weight_min: 1,
            food_weight_max: 3,
            food_ticks_min: 30,
            food_ticks_max: 60,
            spawn_attempts: 64,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Total number of cells on the grid
    pub fn cell_count(&self) -> usize {
        self.grid_width * self.grid_height
    }

    /// Validate the configuration
    ///
    /// The seed snake trails to the left of the start cell, so the whole
    /// body has to fit between column 0 and the head.
    pub fn validate(&self) -> Result<(), String> {
        self.validate_food()?;

        if self.initial_snake_length == 0 {
            return Err("initial_snake_length must be at least 1".to_string());
        }

        if self.start_y < 0 || self.start_y as usize >= self.grid_height {
            return Err(format!(
                "start_y must be in [0, {}), got {}",
                self.grid_height, self.start_y
            ));
        }

        if self.start_x < 0 || self.start_x as usize >= self.grid_width {
            return Err(format!(
                "start_x must be in [0, {}), got {}",
                self.grid_width, self.start_x
            ));
        }

        if (self.start_x as usize) + 1 < self.initial_snake_length {
            return Err(format!(
                "a snake of length {} does not fit left of start_x {}",
                self.initial_snake_length, self.start_x
            ));
        }

        if self.initial_snake_length >= self.cell_count() {
            return Err(format!(
                "initial_snake_length ({}) leaves no room for food on a {}x{} grid",
                self.initial_snake_length, self.grid_width, self.grid_height
            ));
        }

        if self.initial_speed == 0 || self.initial_speed > MAX_SPEED {
            return Err(format!(
                "initial_speed must be in 1..={MAX_SPEED}, got {}",
                self.initial_speed
            ));
        }

        if self.level_step == 0 {
            return Err("level_step must be at least 1".to_string());
        }

        Ok(())
    }

    /// Validate the grid and the food ranges, the part a spawner relies on
    pub fn validate_food(&self) -> Result<(), String> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(format!(
                "grid must be at least 1x1, got {}x{}",
                self.grid_width, self.grid_height
            ));
        }

        if i32::try_from(self.grid_width).is_err() || i32::try_from(self.grid_height).is_err() {
            return Err("grid dimensions must fit in i32".to_string());
        }

        if self.food_weight_min == 0 || self.food_weight_min > self.food_weight_max {
            return Err(format!(
                "food weights must satisfy 1 <= min <= max, got {}..={}",
                self.food_weight_min, self.food_weight_max
            ));
        }

        if self.food_ticks_min == 0 || self.food_ticks_min > self.food_ticks_max {
            return Err(format!(
                "food ticks must satisfy 1 <= min <= max, got {}..={}",
                self.food_ticks_min, self.food_ticks_max
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 40);
        assert_eq!(config.grid_height, 30);
        assert_eq!(config.initial_snake_length, 3);
        assert_eq!(config.initial_speed, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 12);
        assert_eq!(config.grid_width, 15);
        assert_eq!(config.grid_height, 12);
        assert_eq!(config.cell_count(), 180);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_start_outside_grid() {
        let config = GameConfig {
            start_x: 10,
            ..GameConfig::small()
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            start_y: -1,
            ..GameConfig::small()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_snake_does_not_fit() {
        let config = GameConfig {
            start_x: 1,
            ..GameConfig::small()
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            start_x: 2,
            ..GameConfig::small()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_snake_fills_grid() {
        let config = GameConfig {
            grid_width: 3,
            grid_height: 1,
            start_x: 2,
            start_y: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_ranges() {
        let config = GameConfig {
            food_weight_min: 4,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            food_ticks_min: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            level_step: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            initial_speed: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_speed_upper_bound() {
        let config = GameConfig {
            initial_speed: MAX_SPEED,
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let config = GameConfig {
            initial_speed: MAX_SPEED + 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_food_ignores_snake_layout() {
        let config = GameConfig::new(2, 1);
        assert!(config.validate().is_err());
        assert!(config.validate_food().is_ok());

        let config = GameConfig {
            food_ticks_max: 10,
            ..GameConfig::new(2, 1)
        };
        assert!(config.validate_food().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"grid_width": 12}"#).unwrap();
        assert_eq!(config.grid_width, 12);
        assert_eq!(config.grid_height, 30);
        assert_eq!(config.food_weight_max, 3);
    }
}
