//! Troposphere model: barometric pressure, ideal-gas density and dynamic
//! pressure.

use thiserror::Error;

/// Acceleration due to gravity, m/s².
pub const GRAVITY: f64 = 9.80665;
/// Molar mass of dry air, kg/mol.
pub const MOLAR_MASS_AIR: f64 = 0.0289644;
/// Universal gas constant, J/(mol·K).
pub const UNIVERSAL_GAS_CONSTANT: f64 = 8.3144598;
/// Temperature lapse rate, K/m.
pub const LAPSE_RATE: f64 = 0.0065;
/// Standard sea-level pressure, Pa.
pub const SEA_LEVEL_PRESSURE: f64 = 101_325.0;
/// Specific gas constant of dry air, J/(kg·K).
pub const SPECIFIC_GAS_CONSTANT_AIR: f64 = 287.05;
/// Upper altitude bound of the barometric formula, m.
pub const TROPOPAUSE_ALTITUDE: f64 = 11_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum AtmosphereError {
    #[error("altitude {altitude_m} m is above the 11000 m limit of the troposphere model")]
    AltitudeOutOfRange { altitude_m: f64 },
    #[error("absolute temperature must be positive (got {kelvin} K)")]
    NonPositiveTemperature { kelvin: f64 },
    #[error("{quantity} must be finite (got {value})")]
    NonFinite { quantity: &'static str, value: f64 },
}

fn require_finite(quantity: &'static str, value: f64) -> Result<f64, AtmosphereError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AtmosphereError::NonFinite { quantity, value })
    }
}

pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + 273.15
}

/// Static pressure (Pa) at `altitude_m`, given the sea-level temperature in °C.
pub fn pressure_at_altitude(celsius: f64, altitude_m: f64) -> Result<f64, AtmosphereError> {
    require_finite("temperature", celsius)?;
    require_finite("altitude", altitude_m)?;
    if altitude_m > TROPOPAUSE_ALTITUDE {
        return Err(AtmosphereError::AltitudeOutOfRange { altitude_m });
    }

    let t0 = celsius_to_kelvin(celsius);
    if t0 <= 0.0 {
        return Err(AtmosphereError::NonPositiveTemperature { kelvin: t0 });
    }
    let t = t0 - LAPSE_RATE * altitude_m;
    if t <= 0.0 {
        return Err(AtmosphereError::NonPositiveTemperature { kelvin: t });
    }

    let exponent = GRAVITY * MOLAR_MASS_AIR / (UNIVERSAL_GAS_CONSTANT * LAPSE_RATE);
    Ok(SEA_LEVEL_PRESSURE * (t / t0).powf(exponent))
}

/// Air density (kg/m³) from the ideal gas law.
pub fn air_density(celsius: f64, pressure_pa: f64) -> Result<f64, AtmosphereError> {
    require_finite("pressure", pressure_pa)?;
    let kelvin = celsius_to_kelvin(require_finite("temperature", celsius)?);
    if kelvin <= 0.0 {
        return Err(AtmosphereError::NonPositiveTemperature { kelvin });
    }
    Ok(pressure_pa / (SPECIFIC_GAS_CONSTANT_AIR * kelvin))
}

/// q = ½ρv²
pub fn dynamic_pressure(density: f64, airspeed: f64) -> f64 {
    0.5 * density * airspeed * airspeed
}

/// Atmosphere scalars for a single simulation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtmosphereState {
    pub temperature_c: f64,
    pub altitude_m: f64,
    pub airspeed_m_s: f64,
    pub pressure_pa: f64,
    pub density_kg_m3: f64,
    pub dynamic_pressure_pa: f64,
}

impl AtmosphereState {
    /// Derive pressure, density and dynamic pressure from the current inputs.
    pub fn evaluate(
        temperature_c: f64,
        altitude_m: f64,
        airspeed_m_s: f64,
    ) -> Result<Self, AtmosphereError> {
        require_finite("airspeed", airspeed_m_s)?;
        let pressure_pa = pressure_at_altitude(temperature_c, altitude_m)?;
        let density_kg_m3 = air_density(temperature_c, pressure_pa)?;

        Ok(Self {
            temperature_c,
            altitude_m,
            airspeed_m_s,
            pressure_pa,
            density_kg_m3,
            dynamic_pressure_pa: dynamic_pressure(density_kg_m3, airspeed_m_s),
        })
    }
}
