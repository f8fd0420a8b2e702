//! Burner rig configuration
//!
//! The calibration length, stoichiometric air/fuel ratio, and burner inner
//! diameter vary per rig and per fuel, so they travel in an explicit
//! configuration value passed into both the geometry resolver and the flame
//! speed estimator instead of being baked into the formulas. The defaults
//! describe the reference methane/air rig.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Reference rig: real-world width of the nozzle fixture spanned by the two
/// base reference marks (mm)
pub const DEFAULT_CALIBRATION_MM: f64 = 19.5;

/// Stoichiometric air/fuel volumetric ratio for methane in air
/// CH4 + 2 (O2 + 3.76 N2) -> CO2 + 2 H2O, so 9.52 volumes of air per volume of fuel
pub const METHANE_AIR_STOICH_RATIO: f64 = 9.52;

/// Reference rig: burner nozzle inner diameter (mm)
pub const DEFAULT_BURNER_INNER_DIAMETER_MM: f64 = 14.3;

/// Physical constants of the burner rig and fuel chemistry.
///
/// All three values must be positive and finite; `validate` (called by
/// `load`) rejects anything else before it can reach a divisor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurnerConfig {
    /// Real-world distance between the two base reference marks (mm)
    pub calibration_mm: f64,
    /// Stoichiometric air/fuel volumetric ratio for the fuel in use
    pub stoichiometric_air_fuel_ratio: f64,
    /// Inner diameter of the burner nozzle (mm)
    pub burner_inner_diameter_mm: f64,
}

impl Default for BurnerConfig {
    fn default() -> Self {
        Self {
            calibration_mm: DEFAULT_CALIBRATION_MM,
            stoichiometric_air_fuel_ratio: METHANE_AIR_STOICH_RATIO,
            burner_inner_diameter_mm: DEFAULT_BURNER_INNER_DIAMETER_MM,
        }
    }
}

impl BurnerConfig {
    /// Load and validate a configuration from a JSON file.
    ///
    /// Missing fields fall back to the methane/air reference rig defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed, or contains a
    /// non-positive or non-finite value
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents =
            fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        let config: Self =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written or the configuration
    /// cannot be serialized
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeFailed(e.to_string()))?;

        fs::write(path, contents).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        Ok(())
    }

    /// Check that every value is a positive finite number.
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` naming the offending field
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("calibration_mm", self.calibration_mm),
            (
                "stoichiometric_air_fuel_ratio",
                self.stoichiometric_air_fuel_ratio,
            ),
            ("burner_inner_diameter_mm", self.burner_inner_diameter_mm),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a positive finite value, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Errors that can occur loading or validating a burner configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read the file
    LoadFailed(String),
    /// Failed to parse the file contents
    ParseFailed(String),
    /// Failed to serialize the configuration
    SerializeFailed(String),
    /// Failed to write the file
    SaveFailed(String),
    /// A value is out of its physical range
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::LoadFailed(msg) => write!(f, "Failed to load config: {msg}"),
            ConfigError::ParseFailed(msg) => write!(f, "Failed to parse config: {msg}"),
            ConfigError::SerializeFailed(msg) => write!(f, "Failed to serialize config: {msg}"),
            ConfigError::SaveFailed(msg) => write!(f, "Failed to save config: {msg}"),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
