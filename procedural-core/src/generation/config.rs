use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{CaveError, Result};

/// World-space translation applied to every cell position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

/// Caller-supplied parameters for one cave generation run.
///
/// Missing fields fall back to the defaults when deserialized, so a config
/// file only has to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaveConfig {
    pub width: usize,
    pub height: usize,
    pub cell_size: f32,
    pub offset: Offset,
    pub fill_percentage: u32,
    pub smoothing_iterations: u32,
    pub room_count: u32,
    pub room_radius: u32,
    pub room_edge_noise: f32,
    pub seed: u64,
    pub spawn_radius: u32,
    pub placement_margin: usize,
    pub noise_frequency: f64,
    pub max_placement_attempts: u32,
}

impl Default for CaveConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            cell_size: DEFAULT_CELL_SIZE,
            offset: Offset::default(),
            fill_percentage: DEFAULT_FILL_PERCENTAGE,
            smoothing_iterations: DEFAULT_SMOOTHING_ITERATIONS,
            room_count: DEFAULT_ROOM_COUNT,
            room_radius: DEFAULT_ROOM_RADIUS,
            room_edge_noise: DEFAULT_ROOM_EDGE_NOISE,
            seed: DEFAULT_SEED,
            spawn_radius: DEFAULT_SPAWN_RADIUS,
            placement_margin: DEFAULT_PLACEMENT_MARGIN,
            noise_frequency: DEFAULT_NOISE_FREQUENCY,
            max_placement_attempts: DEFAULT_MAX_PLACEMENT_ATTEMPTS,
        }
    }
}

impl CaveConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Reject configurations the pipeline cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.width < MIN_GRID_SIDE || self.height < MIN_GRID_SIDE {
            return Err(invalid(format!(
                "grid must be at least {MIN_GRID_SIDE}x{MIN_GRID_SIDE}, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(invalid(format!(
                "cell_size must be a positive number, got {}",
                self.cell_size
            )));
        }
        if !self.offset.x.is_finite() || !self.offset.y.is_finite() {
            return Err(invalid("offset must be finite".to_string()));
        }
        if self.fill_percentage > 100 {
            return Err(invalid(format!(
                "fill_percentage must be within 0-100, got {}",
                self.fill_percentage
            )));
        }
        if self.room_radius < 1 {
            return Err(invalid("room_radius must be at least 1".to_string()));
        }
        if !self.room_edge_noise.is_finite() || self.room_edge_noise < 0.0 {
            return Err(invalid(format!(
                "room_edge_noise must be a non-negative number, got {}",
                self.room_edge_noise
            )));
        }
        if !self.noise_frequency.is_finite() {
            return Err(invalid("noise_frequency must be finite".to_string()));
        }
        if self.max_placement_attempts == 0 {
            return Err(invalid(
                "max_placement_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Squared distance every non-spawn room center keeps from spawn
    pub fn spawn_exclusion_sq(&self) -> u64 {
        let d = u64::from(self.room_radius) * u64::from(SPAWN_EXCLUSION_FACTOR);
        d.saturating_mul(d)
    }

    pub fn from_ron(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Load and validate a config file. `.json` files are parsed as JSON,
    /// everything else as RON.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&text)?,
            _ => Self::from_ron(&text)?,
        };
        config.validate()?;
        Ok(config)
    }
}

fn invalid(reason: String) -> CaveError {
    CaveError::InvalidConfig(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_is_valid() {
        let config = CaveConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.width, 50);
        assert_eq!(config.fill_percentage, 45);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_rejects_tiny_grid() {
        let config = CaveConfig {
            width: 2,
            ..CaveConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CaveError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_minimum_grid_accepted() {
        let config = CaveConfig {
            width: 3,
            height: 3,
            ..CaveConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_scalars() {
        let base = CaveConfig::default();
        let cases = [
            CaveConfig {
                cell_size: 0.0,
                ..base.clone()
            },
            CaveConfig {
                cell_size: f32::NAN,
                ..base.clone()
            },
            CaveConfig {
                fill_percentage: 101,
                ..base.clone()
            },
            CaveConfig {
                room_radius: 0,
                ..base.clone()
            },
            CaveConfig {
                room_edge_noise: -0.5,
                ..base.clone()
            },
            CaveConfig {
                max_placement_attempts: 0,
                ..base.clone()
            },
        ];
        for config in cases {
            assert!(config.validate().is_err(), "accepted {config:?}");
        }
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config = CaveConfig::from_ron("(width: 64, room_count: 8)").unwrap();
        assert_eq!(config.width, 64);
        assert_eq!(config.room_count, 8);
        assert_eq!(config.height, DEFAULT_HEIGHT);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = CaveConfig::default().with_seed(7);
        let restored = CaveConfig::from_json(&config.to_json()).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_load_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"seed": 99, "room_count": 2}}"#).unwrap();
        let config = CaveConfig::load(file.path()).unwrap();
        assert_eq!(config.seed, 99);
        assert_eq!(config.room_count, 2);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "(fill_percentage: 150)").unwrap();
        assert!(matches!(
            CaveConfig::load(file.path()),
            Err(CaveError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = CaveConfig::load(Path::new("does/not/exist.ron"));
        assert!(matches!(result, Err(CaveError::Io(_))));
    }

    #[test]
    fn test_spawn_exclusion() {
        let config = CaveConfig::default();
        assert_eq!(config.spawn_exclusion_sq(), 81);

        let huge = CaveConfig {
            room_radius: u32::MAX,
            ..CaveConfig::default()
        };
        assert_eq!(huge.spawn_exclusion_sq(), u64::MAX);
    }
}
