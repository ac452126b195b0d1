use std::path::PathBuf;

use approx::assert_relative_eq;
use aviary::{evaluate, Airfoil, AviaryConfig, LoadOptions, SimulationInputs};

fn bundled_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("airfoils/naca0012.dat")
}

#[test]
fn loads_fixed_width_file() {
    let airfoil = Airfoil::load(bundled_path(), LoadOptions::default()).expect("load");
    assert_eq!(airfoil.name(), "NACA 0012 AIRFOILS");
    assert_eq!(airfoil.points().len(), 33);
    assert_eq!(airfoil.repeated_points(), 0);
    assert!(!airfoil.is_closed());

    // Trailing edge at x = 1 lands at 0.5 once centered; y is flipped.
    let first = airfoil.points()[0];
    assert_relative_eq!(first.x, 0.5, epsilon = 1e-12);
    assert_relative_eq!(first.y, -0.00126, epsilon = 1e-12);
    let last = airfoil.points()[32];
    assert_relative_eq!(last.y, 0.00126, epsilon = 1e-12);
}

#[test]
fn symmetric_section_has_equal_surfaces() {
    let airfoil = Airfoil::load(bundled_path(), LoadOptions::default()).expect("load");
    let frame = evaluate(&airfoil, &SimulationInputs::default()).expect("evaluate");

    assert_eq!(frame.panels.len(), 32);
    assert_eq!(frame.skipped_panels(), 0);

    let metrics = frame.metrics;
    assert_relative_eq!(metrics.top_length, metrics.bottom_length, epsilon = 1e-9);
    assert!(metrics.top_length > 1.0 && metrics.top_length < 1.1);
    assert_eq!(metrics.total_area, metrics.top_area + metrics.bottom_area);
}

#[test]
fn default_config_points_at_bundled_file() {
    let config = AviaryConfig::default();
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(&config.airfoil.path);
    assert!(path.exists(), "{} is missing", path.display());
}

#[test]
fn export_round_trips_through_disk() {
    let airfoil = Airfoil::load(bundled_path(), LoadOptions::default()).expect("load");
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("export.dat");
    std::fs::write(&path, airfoil.to_dat()).expect("write");

    let reloaded = Airfoil::load(&path, LoadOptions::default()).expect("reload");
    assert_eq!(reloaded.name(), airfoil.name());
    assert_eq!(reloaded.points().len(), airfoil.points().len());
    for (a, b) in airfoil.points().iter().zip(reloaded.points()) {
        assert_relative_eq!(*a, *b, epsilon = 1e-9);
    }
}
