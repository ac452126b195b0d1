//! TOML configuration for the viewer and the `--print` mode.
//!
//! Every field is optional; missing values fall back to the startup state
//! of the viewer (bundled NACA file, 15 °C at 500 m, 2 m/s, 14° AoA).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::airfoil::LoadOptions;
use crate::atmosphere::TROPOPAUSE_ALTITUDE;
use crate::circulation::ExponentMode;
use crate::geometry::Vec2;
use crate::simulation::SimulationInputs;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AviaryConfig {
    pub airfoil: AirfoilSection,
    pub flight: FlightSection,
    pub model: ModelSection,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AirfoilSection {
    pub path: PathBuf,
    pub flip: bool,
    pub center_chord: bool,
}

impl Default for AirfoilSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from("airfoils/naca0012.dat"),
            flip: true,
            center_chord: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FlightSection {
    pub temperature_c: f64,
    pub altitude_m: f64,
    pub airspeed_m_s: f64,
    pub angle_of_attack_deg: f64,
    /// AoA change per frame while an arrow key is held.
    pub rotation_speed_deg: f64,
}

impl Default for FlightSection {
    fn default() -> Self {
        Self {
            temperature_c: 15.0,
            altitude_m: 500.0,
            airspeed_m_s: 2.0,
            angle_of_attack_deg: 14.0,
            rotation_speed_deg: 0.25,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ModelSection {
    pub flip_normal: bool,
    pub scale: f64,
    pub span_m: f64,
    pub legacy_exponent: bool,
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            flip_normal: false,
            scale: 1.0,
            span_m: 6.0,
            legacy_exponent: false,
        }
    }
}

impl AviaryConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let model = &self.model;
        if !(model.scale.is_finite() && model.scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "model.scale must be positive, got {}",
                model.scale
            )));
        }
        if !(model.span_m.is_finite() && model.span_m >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "model.span_m must be non-negative, got {}",
                model.span_m
            )));
        }
        let flight = &self.flight;
        for (key, value) in [
            ("flight.temperature_c", flight.temperature_c),
            ("flight.altitude_m", flight.altitude_m),
            ("flight.airspeed_m_s", flight.airspeed_m_s),
            ("flight.angle_of_attack_deg", flight.angle_of_attack_deg),
            ("flight.rotation_speed_deg", flight.rotation_speed_deg),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!("{key} must be finite, got {value}")));
            }
        }
        if flight.altitude_m > TROPOPAUSE_ALTITUDE {
            return Err(ConfigError::Invalid(format!(
                "flight.altitude_m must be at most {TROPOPAUSE_ALTITUDE}, got {}",
                flight.altitude_m
            )));
        }
        Ok(())
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            center_chord: self.airfoil.center_chord,
            flip_y: self.airfoil.flip,
        }
    }

    pub fn exponent_mode(&self) -> ExponentMode {
        if self.model.legacy_exponent {
            ExponentMode::LegacyInteger
        } else {
            ExponentMode::Fractional
        }
    }

    pub fn simulation_inputs(&self) -> SimulationInputs {
        SimulationInputs {
            temperature_c: self.flight.temperature_c,
            altitude_m: self.flight.altitude_m,
            airspeed_m_s: self.flight.airspeed_m_s,
            angle_of_attack_deg: self.flight.angle_of_attack_deg,
            flip_normal: self.model.flip_normal,
            flip_airfoil: self.airfoil.flip,
            scale: self.model.scale,
            span_m: self.model.span_m,
            rotation_origin: Vec2::zeros(),
            exponent: self.exponent_mode(),
        }
    }
}
