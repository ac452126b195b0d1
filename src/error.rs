use thiserror::Error;

use crate::airfoil::LoadError;
use crate::atmosphere::AtmosphereError;
use crate::circulation::{CirculationError, Unsupported};
use crate::config::ConfigError;
use crate::geometry::GeometryError;
use crate::simulation::SimulationError;

/// Any failure the crate can report.
#[derive(Debug, Error)]
pub enum AviaryError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Atmosphere(#[from] AtmosphereError),
    #[error(transparent)]
    Circulation(#[from] CirculationError),
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    #[error(transparent)]
    Unsupported(#[from] Unsupported),
}

impl AviaryError {
    /// Math and capability errors leave the caller free to skip the current
    /// step and carry on; load and config errors do not.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AviaryError::Load(_) | AviaryError::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airfoil::{Airfoil, LoadOptions};
    use crate::atmosphere::pressure_at_altitude;
    use crate::geometry::{normalize, Vec2};

    fn pressure(altitude_m: f64) -> Result<f64, AviaryError> {
        Ok(pressure_at_altitude(15.0, altitude_m)?)
    }

    #[test]
    fn module_errors_convert() {
        let err = pressure(20_000.0).unwrap_err();
        assert!(matches!(err, AviaryError::Atmosphere(_)));
        assert!(err.is_recoverable());

        let err: AviaryError = normalize(Vec2::zeros()).unwrap_err().into();
        assert!(err.is_recoverable());

        let err: AviaryError = Airfoil::parse("", LoadOptions::default()).unwrap_err().into();
        assert!(!err.is_recoverable());
        assert_eq!(err.to_string(), "airfoil file has no name line");
    }
}
