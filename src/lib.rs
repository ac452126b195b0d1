//! Numerical core of the Aviary airfoil sketch.
//!
//! Loads `.dat` airfoil outlines, derives panel geometry, and evaluates a
//! troposphere model and a lumped-vortex circulation estimate once per
//! simulation step. Drawing lives in the `aviary` binary.

pub mod airfoil;
pub mod atmosphere;
pub mod circulation;
pub mod config;
pub mod error;
pub mod geometry;
pub mod metrics;
pub mod panel;
pub mod simulation;

pub use airfoil::{Airfoil, LoadError, LoadOptions};
pub use atmosphere::{AtmosphereError, AtmosphereState};
pub use circulation::{Capability, CirculationError, ExponentMode, PanelVortex, Unsupported};
pub use config::{AviaryConfig, ConfigError};
pub use error::AviaryError;
pub use geometry::{GeometryError, Vec2};
pub use metrics::WingMetrics;
pub use panel::Panel;
pub use simulation::{evaluate, Frame, PanelSample, SimulationError, SimulationInputs};
