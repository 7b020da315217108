// Configuration - Tuning constants for the sandbox
// Loaded from an optional JSON file named by THREEBODY_CONFIG (.env supported)

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::physics_engine::{
    MassModel, Vec2, BASE_TIME_STEP, G, MASS_BASE, MASS_SCALE, N_TRAIL, SOFTENING,
};

/// Environment variable pointing at a JSON config file
pub const CONFIG_ENV_VAR: &str = "THREEBODY_CONFIG";

/// Empirically tuned values; they calibrate what looks plausible on screen
/// rather than anything physical, so they are kept as configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub gravitational_constant: f64,
    pub softening: f64,
    pub base_time_step: f64,
    pub trail_length: usize,
    /// Drag distance to velocity factor for placed bodies
    pub velocity_scale: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    pub mass_base: f64,
    pub mass_scale: f64,
    /// Simulation speed multiplier bounds
    pub min_speed: f64,
    pub max_speed: f64,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub frame_interval_ms: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravitational_constant: G,
            softening: SOFTENING,
            base_time_step: BASE_TIME_STEP,
            trail_length: N_TRAIL,
            velocity_scale: 0.03,
            min_radius: 10.0,
            max_radius: 100.0,
            mass_base: MASS_BASE,
            mass_scale: MASS_SCALE,
            min_speed: 0.1,
            max_speed: 50.0,
            canvas_width: 800.0,
            canvas_height: 600.0,
            frame_interval_ms: 16,
        }
    }
}

impl SimConfig {
    /// Read `.env`, then the JSON file named by `THREEBODY_CONFIG` if set
    pub fn load() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => Self::from_file(path),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("invalid config in {}", path.display()))
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let config: SimConfig = serde_json::from_str(raw).context("malformed config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.gravitational_constant <= 0.0 {
            bail!("gravitational_constant must be positive");
        }
        if self.softening <= 0.0 {
            bail!("softening must be positive");
        }
        if self.base_time_step <= 0.0 {
            bail!("base_time_step must be positive");
        }
        if self.trail_length == 0 {
            bail!("trail_length must be at least 1");
        }
        if self.mass_base <= 1.0 || self.mass_scale <= 0.0 {
            bail!("mass model needs mass_base > 1 and mass_scale > 0");
        }
        if self.min_radius <= 0.0 || self.min_radius >= self.max_radius {
            bail!(
                "radius range [{}, {}] is invalid",
                self.min_radius,
                self.max_radius
            );
        }
        if self.min_speed <= 0.0 || self.min_speed > self.max_speed {
            bail!(
                "speed range [{}, {}] is invalid",
                self.min_speed,
                self.max_speed
            );
        }
        if self.canvas_width <= 0.0 || self.canvas_height <= 0.0 {
            bail!("canvas dimensions must be positive");
        }
        Ok(())
    }

    pub fn mass_model(&self) -> MassModel {
        MassModel::new(self.mass_base, self.mass_scale)
    }

    pub fn canvas_center(&self) -> Vec2 {
        Vec2::new(self.canvas_width / 2.0, self.canvas_height / 2.0)
    }

    pub fn clamp_radius(&self, radius: f64) -> f64 {
        radius.max(self.min_radius).min(self.max_radius)
    }

    pub fn clamp_speed(&self, multiplier: f64) -> f64 {
        if multiplier.is_nan() {
            return self.min_speed;
        }
        multiplier.max(self.min_speed).min(self.max_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config = SimConfig::from_json(r#"{ "softening": 250.0, "trail_length": 40 }"#).unwrap();
        assert_eq!(config.softening, 250.0);
        assert_eq!(config.trail_length, 40);
        assert_eq!(config.gravitational_constant, G);
        assert_eq!(config.max_radius, 100.0);
    }

    #[test]
    fn test_rejects_non_increasing_mass_model() {
        let err = SimConfig::from_json(r#"{ "mass_base": 0.9 }"#).unwrap_err();
        assert!(format!("{:#}", err).contains("mass_base"));
    }

    #[test]
    fn test_rejects_inverted_radius_range() {
        assert!(SimConfig::from_json(r#"{ "min_radius": 120.0 }"#).is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = SimConfig::from_file("/nonexistent/threebody.json").unwrap_err();
        assert!(format!("{}", err).contains("/nonexistent/threebody.json"));
    }

    #[test]
    fn test_clamps() {
        let config = SimConfig::default();
        assert_eq!(config.clamp_radius(500.0), 100.0);
        assert_eq!(config.clamp_radius(2.0), 10.0);
        assert_eq!(config.clamp_speed(0.0), 0.1);
        assert_eq!(config.clamp_speed(-3.0), 0.1);
        assert_eq!(config.clamp_speed(80.0), 50.0);
        assert_eq!(config.clamp_speed(f64::NAN), 0.1);
    }
}
