//! Lumped-vortex circulation estimates.
//!
//! Each panel is treated as a small thin airfoil of its own: a bound vortex
//! sits at its quarter chord and the circulation follows the thin-airfoil
//! distribution `Γ = 2U sin α (c/x − 1)^½`. There is no influence matrix,
//! so panels do not see one another.

use std::f64::consts::PI;
use std::fmt;

use thiserror::Error;

use crate::panel::Panel;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CirculationError {
    #[error("chordwise position must be positive (got {x})")]
    NonPositivePosition { x: f64 },
    #[error("c/x - 1 is negative ({radicand}); position lies past the chord")]
    NegativeRadicand { radicand: f64 },
    #[error("evaluation point ({x}, {z}) coincides with the vortex")]
    SingularPoint { x: f64, z: f64 },
}

/// Exponent applied to `(c/x − 1)` in the circulation formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExponentMode {
    /// `0.5`, the thin-airfoil result.
    #[default]
    Fractional,
    /// `1/2` evaluated in integer arithmetic, i.e. `0`. Collapses the
    /// distribution to `Γ = 2U sin α`; kept to reproduce old output.
    LegacyInteger,
}

/// Γ at chordwise position `x` on a chord of length `chord`.
pub fn circulation_at_point(
    x: f64,
    chord: f64,
    freestream_velocity: f64,
    angle_of_attack_rad: f64,
    mode: ExponentMode,
) -> Result<f64, CirculationError> {
    let base = 2.0 * freestream_velocity * angle_of_attack_rad.sin();

    match mode {
        ExponentMode::LegacyInteger => Ok(base),
        ExponentMode::Fractional => {
            if x <= 0.0 || !x.is_finite() {
                return Err(CirculationError::NonPositivePosition { x });
            }
            let radicand = chord / x - 1.0;
            if radicand < 0.0 {
                return Err(CirculationError::NegativeRadicand { radicand });
            }
            Ok(base * radicand.sqrt())
        }
    }
}

/// Downwash at `(x, z)` from a point vortex of strength `gamma` placed at
/// the quarter chord, `(chord / 4, 0)`.
pub fn induced_velocity(gamma: f64, x: f64, z: f64, chord: f64) -> Result<f64, CirculationError> {
    let xo = chord / 4.0;
    let zo = 0.0;
    let dx = x - xo;
    let dz = z - zo;
    let r_squared = dz * dz + dx * dx;

    if r_squared == 0.0 {
        return Err(CirculationError::SingularPoint { x, z });
    }

    Ok(gamma / (2.0 * PI) * dx / r_squared)
}

/// Thin-airfoil lift coefficient, `CL = 2π sin α`.
pub fn coefficient_of_lift(angle_of_attack_rad: f64) -> f64 {
    2.0 * PI * angle_of_attack_rad.sin()
}

/// Whether the model can produce a given quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Supported,
    Unsupported { reason: &'static str },
}

impl Capability {
    pub fn is_supported(&self) -> bool {
        matches!(self, Capability::Supported)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Supported => f.write_str("supported"),
            Capability::Unsupported { reason } => write!(f, "unsupported: {reason}"),
        }
    }
}

pub const COEFFICIENT_OF_LIFT: Capability = Capability::Supported;

pub const PRESSURE_COEFFICIENT: Capability = Capability::Unsupported {
    reason: "local Cp needs a full panel-method solve across all panels",
};

/// Returned when asking for a quantity whose [`Capability`] is unsupported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{quantity} is not available: {capability}")]
pub struct Unsupported {
    pub quantity: &'static str,
    pub capability: Capability,
}

/// Always fails: see [`PRESSURE_COEFFICIENT`].
pub fn pressure_coefficient(_panel: &Panel, _freestream_velocity: f64) -> Result<f64, Unsupported> {
    Err(Unsupported {
        quantity: "pressure coefficient",
        capability: PRESSURE_COEFFICIENT,
    })
}

/// Circulation and induced velocity for one panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelVortex {
    /// Panel inclination, used as the local angle of attack (radians).
    pub angle_rad: f64,
    pub circulation: f64,
    pub induced_velocity: f64,
}

impl PanelVortex {
    /// Evaluate the panel as its own chord, sampled at its midpoint.
    pub fn sample(
        panel: &Panel,
        freestream_velocity: f64,
        mode: ExponentMode,
    ) -> Result<Self, CirculationError> {
        let chord = panel.length;
        let x = chord / 2.0;
        let angle_rad = panel.angle();

        let circulation = circulation_at_point(x, chord, freestream_velocity, angle_rad, mode)?;
        let induced_velocity = induced_velocity(circulation, x, 0.0, chord)?;

        Ok(Self {
            angle_rad,
            circulation,
            induced_velocity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec2;
    use approx::assert_relative_eq;

    #[test]
    fn circulation_uses_square_root() {
        let alpha = 0.1_f64;
        let gamma = circulation_at_point(0.2, 1.0, 10.0, alpha, ExponentMode::Fractional).unwrap();
        assert_relative_eq!(gamma, 20.0 * alpha.sin() * 2.0, epsilon = 1e-12);
    }

    #[test]
    fn legacy_exponent_drops_distribution() {
        let alpha = 0.1_f64;
        let gamma =
            circulation_at_point(0.2, 1.0, 10.0, alpha, ExponentMode::LegacyInteger).unwrap();
        assert_relative_eq!(gamma, 20.0 * alpha.sin(), epsilon = 1e-12);
        // Agrees with the fractional form at mid-chord.
        let frac = circulation_at_point(0.5, 1.0, 10.0, alpha, ExponentMode::Fractional).unwrap();
        assert_relative_eq!(gamma, frac, epsilon = 1e-12);
    }

    #[test]
    fn circulation_domain_errors() {
        assert_eq!(
            circulation_at_point(0.0, 1.0, 1.0, 0.1, ExponentMode::Fractional),
            Err(CirculationError::NonPositivePosition { x: 0.0 })
        );
        assert!(matches!(
            circulation_at_point(2.0, 1.0, 1.0, 0.1, ExponentMode::Fractional),
            Err(CirculationError::NegativeRadicand { .. })
        ));
        // Trailing edge is the end of the valid range.
        assert_eq!(
            circulation_at_point(1.0, 1.0, 1.0, 0.1, ExponentMode::Fractional),
            Ok(0.0)
        );
    }

    #[test]
    fn induced_velocity_from_quarter_chord_vortex() {
        // x - xo = 0.25, r² = 0.0625
        let w = induced_velocity(2.0 * PI, 0.5, 0.0, 1.0).unwrap();
        assert_relative_eq!(w, 4.0, epsilon = 1e-12);

        let off_axis = induced_velocity(2.0 * PI, 0.25, 1.0, 1.0).unwrap();
        assert_eq!(off_axis, 0.0);
    }

    #[test]
    fn induced_velocity_singular_at_vortex() {
        assert_eq!(
            induced_velocity(1.0, 0.25, 0.0, 1.0),
            Err(CirculationError::SingularPoint { x: 0.25, z: 0.0 })
        );
    }

    #[test]
    fn lift_slope() {
        assert_eq!(coefficient_of_lift(0.0), 0.0);
        assert_relative_eq!(coefficient_of_lift(PI / 2.0), 2.0 * PI);
        assert_relative_eq!(coefficient_of_lift(0.05), 2.0 * PI * 0.05_f64.sin());
    }

    #[test]
    fn pressure_coefficient_is_unsupported() {
        let panel = Panel::new(0, Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), false);
        let err = pressure_coefficient(&panel, 10.0).unwrap_err();
        assert!(!err.capability.is_supported());
        assert_eq!(err, pressure_coefficient(&panel, 50.0).unwrap_err());
        assert!(!PRESSURE_COEFFICIENT.is_supported());
    }

    #[test]
    fn capability_labels() {
        assert!(COEFFICIENT_OF_LIFT.is_supported());
        assert_eq!(COEFFICIENT_OF_LIFT.to_string(), "supported");
        assert!(PRESSURE_COEFFICIENT
            .to_string()
            .starts_with("unsupported: local Cp"));
    }

    #[test]
    fn panel_sample_uses_panel_as_chord() {
        let panel = Panel::new(0, Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), false);
        let vortex = PanelVortex::sample(&panel, 2.0, ExponentMode::Fractional).unwrap();
        assert_relative_eq!(vortex.angle_rad, PI / 4.0);
        assert_relative_eq!(vortex.circulation, 4.0 * (PI / 4.0).sin(), epsilon = 1e-12);
        let expected_w = vortex.circulation / (2.0 * PI) * 4.0 / panel.length;
        assert_relative_eq!(vortex.induced_velocity, expected_w, epsilon = 1e-12);
    }

    #[test]
    fn zero_length_panel_is_rejected() {
        let p = Vec2::new(0.3, 0.3);
        let panel = Panel::new(0, p, p, false);
        assert!(PanelVortex::sample(&panel, 2.0, ExponentMode::Fractional).is_err());
    }
}
