//! Runtime configuration for the office scheduler.

use crate::components::DwellRange;
use crate::error::OfficeError;
use agentoffice_logic::raster::Tint;
use serde::{Deserialize, Serialize};
use std::io::Read;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfficeConfig {
    /// Logical update steps per second.
    pub fps: u32,
    /// Most fixed steps run for one host frame; older time is dropped.
    pub max_catch_up_steps: u32,
    /// Walking time per grid cell.
    pub seconds_per_tile: f32,
    pub dwell_min_seconds: f32,
    pub dwell_max_seconds: f32,
    /// Floor/wall tint hue in degrees.
    pub team_hue: f32,
    /// Floor tint saturation, 0–100.
    pub team_saturation: f32,
    /// RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for OfficeConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            max_catch_up_steps: 5,
            seconds_per_tile: 0.3,
            dwell_min_seconds: 20.0,
            dwell_max_seconds: 60.0,
            team_hue: 220.0,
            team_saturation: 15.0,
            seed: None,
        }
    }
}

impl OfficeConfig {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self, OfficeError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, OfficeError> {
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), OfficeError> {
        if self.fps == 0 {
            return Err(OfficeError::InvalidConfig("fps must be positive".into()));
        }
        if self.max_catch_up_steps == 0 {
            return Err(OfficeError::InvalidConfig(
                "max_catch_up_steps must be positive".into(),
            ));
        }
        if self.seconds_per_tile.is_nan() || self.seconds_per_tile <= 0.0 {
            return Err(OfficeError::InvalidConfig(format!(
                "seconds_per_tile must be positive, got {}",
                self.seconds_per_tile
            )));
        }
        if self.dwell_min_seconds < 0.0 || self.dwell_min_seconds > self.dwell_max_seconds {
            return Err(OfficeError::InvalidConfig(format!(
                "dwell range {}..{} is empty",
                self.dwell_min_seconds, self.dwell_max_seconds
            )));
        }
        Ok(())
    }

    /// Fixed step length in seconds.
    pub fn step_seconds(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }

    pub fn dwell(&self) -> DwellRange {
        DwellRange::new(self.dwell_min_seconds, self.dwell_max_seconds)
    }

    pub fn floor_tint(&self) -> Tint {
        Tint::new(self.team_hue, self.team_saturation, 1.1, -10.0)
    }

    pub fn wall_tint(&self) -> Tint {
        Tint::new(self.team_hue, 10.0, 1.0, -20.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = OfficeConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.step_seconds() - 1.0 / 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = OfficeConfig::from_json_str(r#"{"fps": 60, "seed": 9}"#).unwrap();
        assert_eq!(config.fps, 60);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.max_catch_up_steps, 5);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        assert!(matches!(
            OfficeConfig::from_json_str(r#"{"fps": 0}"#),
            Err(OfficeError::InvalidConfig(_))
        ));
        assert!(OfficeConfig::from_json_str(r#"{"seconds_per_tile": 0.0}"#).is_err());
        assert!(OfficeConfig::from_json_str(r#"{"dwell_min_seconds": 90.0}"#).is_err());
        assert!(matches!(
            OfficeConfig::from_json_str("{not json"),
            Err(OfficeError::Json(_))
        ));
    }
}
