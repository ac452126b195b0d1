//! One evaluation step: explicit inputs in, a [`Frame`] of derived values out.
//!
//! The interactive loop owns a [`SimulationInputs`] and mutates it between
//! steps; `evaluate` keeps no state of its own.

use thiserror::Error;

use crate::airfoil::Airfoil;
use crate::atmosphere::{AtmosphereError, AtmosphereState};
use crate::circulation::{CirculationError, ExponentMode, PanelVortex};
use crate::geometry::{self, GeometryError, Vec2};
use crate::metrics::WingMetrics;
use crate::panel::{build_panels, Panel, PanelTransform};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Atmosphere(#[from] AtmosphereError),
    #[error("scale must be positive and finite (got {scale})")]
    InvalidScale { scale: f64 },
    #[error("span must be non-negative and finite (got {span})")]
    InvalidSpan { span: f64 },
    #[error("angle of attack must be finite (got {angle_deg}°)")]
    InvalidAngle { angle_deg: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationInputs {
    pub temperature_c: f64,
    pub altitude_m: f64,
    pub airspeed_m_s: f64,
    /// Degrees at this boundary; converted to radians inside the models.
    pub angle_of_attack_deg: f64,
    pub flip_normal: bool,
    /// Mirrors the load-time flip; sets the side the overlay arrows point to.
    pub flip_airfoil: bool,
    /// Multiplies every rotated point (display units per chord).
    pub scale: f64,
    pub span_m: f64,
    pub rotation_origin: Vec2,
    pub exponent: ExponentMode,
}

impl Default for SimulationInputs {
    fn default() -> Self {
        Self {
            temperature_c: 15.0,
            altitude_m: 500.0,
            airspeed_m_s: 2.0,
            angle_of_attack_deg: 14.0,
            flip_normal: false,
            flip_airfoil: true,
            scale: 1.0,
            span_m: 6.0,
            rotation_origin: Vec2::zeros(),
            exponent: ExponentMode::Fractional,
        }
    }
}

impl SimulationInputs {
    fn transform(&self) -> PanelTransform {
        PanelTransform {
            origin: self.rotation_origin,
            angle_deg: self.angle_of_attack_deg,
            scale: self.scale,
        }
    }
}

/// Chord reference line, rotated with the airfoil.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChordLine {
    pub start: Vec2,
    pub end: Vec2,
    /// Unit lateral direction of the chord.
    pub normal: Result<Vec2, GeometryError>,
}

impl ChordLine {
    fn new(inputs: &SimulationInputs) -> Self {
        let half = inputs.scale / 2.0;
        let origin = inputs.rotation_origin;
        let angle = inputs.angle_of_attack_deg;
        let start = geometry::rotate(Vec2::new(-half, 0.0), origin, angle);
        let end = geometry::rotate(Vec2::new(half, 0.0), origin, angle);
        let normal = geometry::edge_normal(start, end, false)
            .and_then(|n| geometry::perpendicular(n, false, false));

        Self { start, end, normal }
    }
}

/// A panel plus everything the overlays draw for it. Failures are kept per
/// panel so one degenerate segment does not stall the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelSample {
    pub panel: Panel,
    pub normal: Result<Vec2, GeometryError>,
    pub vortex: Result<PanelVortex, CirculationError>,
}

impl PanelSample {
    /// Debug arrow: the lateral direction scaled by induced velocity.
    pub fn overlay_vector(&self, flip_airfoil: bool) -> Option<Vec2> {
        let normal = self.normal.ok()?;
        let vortex = self.vortex.ok()?;
        geometry::perpendicular(normal * vortex.induced_velocity, flip_airfoil, false).ok()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub airfoil_name: String,
    /// Rotated and scaled outline, in file order.
    pub points: Vec<Vec2>,
    pub chord: ChordLine,
    pub panels: Vec<PanelSample>,
    pub atmosphere: AtmosphereState,
    pub metrics: WingMetrics,
    pub inputs: SimulationInputs,
}

impl Frame {
    pub fn skipped_panels(&self) -> usize {
        self.panels
            .iter()
            .filter(|sample| sample.normal.is_err() || sample.vortex.is_err())
            .count()
    }

    /// Text for the stat overlay.
    pub fn stat_lines(&self) -> Vec<String> {
        let atmosphere = &self.atmosphere;
        let metrics = &self.metrics;
        vec![
            format!("Airfoil: {}", self.airfoil_name),
            format!("Airspeed (m/s): {}", atmosphere.airspeed_m_s),
            format!("Angle of attack (deg): {}°", self.inputs.angle_of_attack_deg),
            format!("Altitude (m): {}", atmosphere.altitude_m),
            format!("Air temperature (°C): {}", atmosphere.temperature_c),
            format!("Static air pressure (Pa): {:.2}", atmosphere.pressure_pa),
            format!("Air density (kg/m³): {:.5}", atmosphere.density_kg_m3),
            format!("Dynamic air pressure (Pa): {:.4}", atmosphere.dynamic_pressure_pa),
            format!("Wing width (m): {}", metrics.span),
            format!("Wing top length (m): {:.4}", metrics.top_length),
            format!("Wing bottom length (m): {:.4}", metrics.bottom_length),
            format!("Wing top area (m²): {:.4}", metrics.top_area),
            format!("Wing bottom area (m²): {:.4}", metrics.bottom_area),
            format!("Wing total area (m²): {:.4}", metrics.total_area),
        ]
    }
}

/// Evaluate one simulation step for `airfoil`.
pub fn evaluate(airfoil: &Airfoil, inputs: &SimulationInputs) -> Result<Frame, SimulationError> {
    if !(inputs.scale.is_finite() && inputs.scale > 0.0) {
        return Err(SimulationError::InvalidScale { scale: inputs.scale });
    }
    if !(inputs.span_m.is_finite() && inputs.span_m >= 0.0) {
        return Err(SimulationError::InvalidSpan { span: inputs.span_m });
    }
    if !inputs.angle_of_attack_deg.is_finite() {
        return Err(SimulationError::InvalidAngle {
            angle_deg: inputs.angle_of_attack_deg,
        });
    }

    let atmosphere = AtmosphereState::evaluate(
        inputs.temperature_c,
        inputs.altitude_m,
        inputs.airspeed_m_s,
    )?;

    let transform = inputs.transform();
    let points: Vec<Vec2> = airfoil.points().iter().map(|p| transform.apply(*p)).collect();
    let panels = build_panels(airfoil.points(), &transform);
    let metrics = WingMetrics::accumulate(&panels, inputs.span_m);

    let samples: Vec<PanelSample> = panels
        .into_iter()
        .map(|panel| PanelSample {
            normal: panel.normal(inputs.flip_normal),
            vortex: PanelVortex::sample(&panel, inputs.airspeed_m_s, inputs.exponent),
            panel,
        })
        .collect();

    for sample in &samples {
        if let Err(err) = sample.normal {
            tracing::debug!(panel = sample.panel.index, %err, "panel has no normal");
        } else if let Err(err) = sample.vortex {
            tracing::debug!(panel = sample.panel.index, %err, "panel vortex skipped");
        }
    }

    let frame = Frame {
        airfoil_name: airfoil.name().to_string(),
        points,
        chord: ChordLine::new(inputs),
        panels: samples,
        atmosphere,
        metrics,
        inputs: *inputs,
    };

    tracing::debug!(
        panels = frame.panels.len(),
        skipped = frame.skipped_panels(),
        pressure_pa = frame.atmosphere.pressure_pa,
        total_area = frame.metrics.total_area,
        "evaluated frame"
    );
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airfoil::LoadOptions;
    use approx::assert_relative_eq;

    fn diamond() -> Airfoil {
        Airfoil::parse(
            "Diamond\n1.0  0.0\n0.5  0.06\n0.0  0.0\n0.5  -0.06\n",
            LoadOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn evaluation_is_repeatable() {
        let airfoil = diamond();
        let inputs = SimulationInputs::default();
        assert_eq!(evaluate(&airfoil, &inputs).unwrap(), evaluate(&airfoil, &inputs).unwrap());
    }

    #[test]
    fn outputs_follow_inputs() {
        let airfoil = diamond();
        let mut inputs = SimulationInputs::default();
        let slow = evaluate(&airfoil, &inputs).unwrap();
        inputs.airspeed_m_s = 4.0;
        let fast = evaluate(&airfoil, &inputs).unwrap();

        assert_relative_eq!(
            fast.atmosphere.dynamic_pressure_pa,
            4.0 * slow.atmosphere.dynamic_pressure_pa,
            epsilon = 1e-12
        );
        let slow_gamma = slow.panels[0].vortex.unwrap().circulation;
        let fast_gamma = fast.panels[0].vortex.unwrap().circulation;
        assert_relative_eq!(fast_gamma, 2.0 * slow_gamma, epsilon = 1e-12);
    }

    #[test]
    fn altitude_above_limit_fails_the_frame() {
        let inputs = SimulationInputs {
            altitude_m: 11_500.0,
            ..Default::default()
        };
        assert!(matches!(
            evaluate(&diamond(), &inputs),
            Err(SimulationError::Atmosphere(AtmosphereError::AltitudeOutOfRange { .. }))
        ));
    }

    #[test]
    fn nan_inputs_fail_the_frame() {
        let airfoil = diamond();
        for inputs in [
            SimulationInputs { altitude_m: f64::NAN, ..Default::default() },
            SimulationInputs { temperature_c: f64::NAN, ..Default::default() },
            SimulationInputs { airspeed_m_s: f64::NAN, ..Default::default() },
        ] {
            assert!(matches!(
                evaluate(&airfoil, &inputs),
                Err(SimulationError::Atmosphere(AtmosphereError::NonFinite { .. }))
            ));
        }
        let inputs = SimulationInputs {
            angle_of_attack_deg: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            evaluate(&airfoil, &inputs),
            Err(SimulationError::InvalidAngle { .. })
        ));
    }

    #[test]
    fn invalid_scale_and_span() {
        let airfoil = diamond();
        let zero_scale = SimulationInputs {
            scale: 0.0,
            ..Default::default()
        };
        assert_eq!(
            evaluate(&airfoil, &zero_scale),
            Err(SimulationError::InvalidScale { scale: 0.0 })
        );
        let negative_span = SimulationInputs {
            span_m: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            evaluate(&airfoil, &negative_span),
            Err(SimulationError::InvalidSpan { .. })
        ));
    }

    #[test]
    fn duplicate_point_is_skipped_not_fatal() {
        let airfoil = Airfoil::parse(
            "Dup\n1.0  0.0\n1.0  0.0\n0.0  0.0\n",
            LoadOptions::default(),
        )
        .unwrap();
        let frame = evaluate(&airfoil, &SimulationInputs::default()).unwrap();
        assert_eq!(frame.panels.len(), 2);
        assert_eq!(frame.skipped_panels(), 1);
        assert!(frame.panels[0].overlay_vector(true).is_none());
        assert!(frame.panels[1].overlay_vector(true).is_some());
    }

    #[test]
    fn chord_line_spans_scale() {
        let inputs = SimulationInputs {
            scale: 800.0,
            ..Default::default()
        };
        let frame = evaluate(&diamond(), &inputs).unwrap();
        let chord = frame.chord;
        assert_relative_eq!(geometry::distance(chord.start, chord.end), 800.0, epsilon = 1e-9);
        let normal = chord.normal.unwrap();
        assert_relative_eq!(normal.dot(&(chord.end - chord.start)), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn overlay_arrow_is_lateral() {
        let frame = evaluate(&diamond(), &SimulationInputs::default()).unwrap();
        for sample in &frame.panels {
            let arrow = sample.overlay_vector(true).unwrap();
            assert_relative_eq!(arrow.dot(&sample.panel.edge()), 0.0, epsilon = 1e-12);
            assert_relative_eq!(
                arrow.norm(),
                sample.vortex.unwrap().induced_velocity.abs(),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn stat_lines_cover_the_overlay() {
        let frame = evaluate(&diamond(), &SimulationInputs::default()).unwrap();
        let lines = frame.stat_lines();
        assert_eq!(lines[0], "Airfoil: Diamond");
        assert!(lines.iter().any(|l| l.starts_with("Static air pressure (Pa): 95460.9")));
        assert!(lines.iter().any(|l| l.starts_with("Wing total area")));
    }
}
