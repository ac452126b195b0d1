use std::path::PathBuf;

use anyhow::Context;
use aviary::circulation::{coefficient_of_lift, COEFFICIENT_OF_LIFT, PRESSURE_COEFFICIENT};
use aviary::geometry::{deg_to_rad, Vec2};
use aviary::{evaluate, Airfoil, AviaryConfig, ExponentMode, Frame, SimulationInputs};
use clap::Parser;
use eframe::egui;
use egui_plot::{Line, Plot, Points};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Debug arrow length per unit of induced velocity, relative to the chord.
const OVERLAY_GAIN: f64 = 0.625;
const CHORD_NORMAL_LENGTH: f64 = 0.25;

#[derive(Parser, Debug)]
#[command(name = "aviary")]
#[command(about = "Airfoil sketch with standard atmosphere and lumped-vortex circulation")]
#[command(version)]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Airfoil .dat file, overrides the config
    #[arg(short, long)]
    airfoil: Option<PathBuf>,

    /// Use the integer circulation exponent (Γ = 2U sin α)
    #[arg(long)]
    legacy_exponent: bool,

    /// Evaluate one step, print the stats and exit
    #[arg(long)]
    print: bool,
}

struct AviaryViewer {
    airfoil: Airfoil,
    inputs: SimulationInputs,
    rotation_speed_deg: f64,
    frame: Option<Frame>,
    error: Option<String>,
    draw_debug: bool,
    sim_time_ms: f64,
}

impl AviaryViewer {
    fn new(airfoil: Airfoil, inputs: SimulationInputs, rotation_speed_deg: f64) -> Self {
        let mut viewer = Self {
            airfoil,
            inputs,
            rotation_speed_deg,
            frame: None,
            error: None,
            draw_debug: false,
            sim_time_ms: 0.0,
        };
        viewer.step();
        viewer
    }

    /// Re-evaluate the model. On failure the previous frame stays on screen.
    fn step(&mut self) {
        match evaluate(&self.airfoil, &self.inputs) {
            Ok(frame) => {
                self.frame = Some(frame);
                self.error = None;
            }
            Err(err) => {
                let message = err.to_string();
                if self.error.as_deref() != Some(message.as_str()) {
                    tracing::warn!(%err, "evaluation failed, keeping last frame");
                }
                self.error = Some(message);
            }
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        ctx.input(|i| {
            if i.key_pressed(egui::Key::ArrowUp) {
                self.inputs.airspeed_m_s += 1.0;
            }
            if i.key_pressed(egui::Key::ArrowDown) {
                self.inputs.airspeed_m_s = (self.inputs.airspeed_m_s - 1.0).max(0.0);
            }
            if i.key_down(egui::Key::ArrowRight) {
                self.inputs.angle_of_attack_deg += self.rotation_speed_deg;
            }
            if i.key_down(egui::Key::ArrowLeft) {
                self.inputs.angle_of_attack_deg -= self.rotation_speed_deg;
            }
            if i.key_pressed(egui::Key::Space) {
                self.draw_debug = !self.draw_debug;
            }
            self.sim_time_ms += f64::from(i.stable_dt) * 1000.0;
        });
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Simulation Controls");

        ui.add(egui::Slider::new(&mut self.inputs.airspeed_m_s, 0.0..=100.0).text("Airspeed (m/s)"));
        ui.add(
            egui::Slider::new(&mut self.inputs.angle_of_attack_deg, -30.0..=30.0)
                .text("Angle of Attack (°)"),
        );
        ui.add(egui::Slider::new(&mut self.inputs.altitude_m, 0.0..=11_000.0).text("Altitude (m)"));
        ui.add(
            egui::Slider::new(&mut self.inputs.temperature_c, -50.0..=50.0)
                .text("Temperature (°C)"),
        );
        ui.add(egui::Slider::new(&mut self.inputs.span_m, 0.0..=20.0).text("Wing width (m)"));

        ui.checkbox(&mut self.draw_debug, "Show Debug Overlay");
        ui.checkbox(&mut self.inputs.flip_normal, "Flip Normals");

        let mut legacy = self.inputs.exponent == ExponentMode::LegacyInteger;
        if ui.checkbox(&mut legacy, "Legacy Circulation Exponent").changed() {
            self.inputs.exponent = if legacy {
                ExponentMode::LegacyInteger
            } else {
                ExponentMode::Fractional
            };
        }

        ui.separator();
        ui.heading("Stats");
        ui.label(format!("Simulation time (ms): {}", self.sim_time_ms.round()));
        if let Some(frame) = &self.frame {
            for line in frame.stat_lines() {
                ui.label(line);
            }
            let cl = coefficient_of_lift(deg_to_rad(frame.inputs.angle_of_attack_deg));
            ui.label(format!("Lift coefficient (CL): {cl:.3}"));
            if frame.skipped_panels() > 0 {
                ui.label(format!("Skipped panels: {}", frame.skipped_panels()));
            }
        }
        for (quantity, capability) in [
            ("Lift coefficient", COEFFICIENT_OF_LIFT),
            ("Pressure coefficient", PRESSURE_COEFFICIENT),
        ] {
            ui.label(format!("{quantity}: {capability}"));
        }

        if let Some(error) = &self.error {
            ui.separator();
            ui.colored_label(egui::Color32::LIGHT_RED, error.as_str());
        }
    }

    fn draw_frame(&self, plot_ui: &mut egui_plot::PlotUi, frame: &Frame) {
        let chord = &frame.chord;
        plot_ui.line(
            Line::new(vec![to_plot(chord.start), to_plot(chord.end)])
                .color(egui::Color32::from_rgb(100, 150, 255))
                .width(3.0)
                .name("Chord"),
        );

        let outline: Vec<[f64; 2]> = frame.points.iter().copied().map(to_plot).collect();
        plot_ui.line(
            Line::new(outline)
                .color(egui::Color32::GREEN)
                .width(3.0)
                .name(&frame.airfoil_name),
        );

        if !self.draw_debug {
            return;
        }

        let scale = frame.inputs.scale;
        if let Ok(normal) = chord.normal {
            let middle = (chord.start + chord.end) / 2.0;
            plot_ui.line(
                Line::new(vec![
                    to_plot(middle),
                    to_plot(middle + normal * CHORD_NORMAL_LENGTH * scale),
                ])
                .color(egui::Color32::from_rgb(255, 161, 0))
                .width(3.0),
            );
        }

        let corners: Vec<[f64; 2]> = frame
            .panels
            .iter()
            .map(|sample| to_plot(sample.panel.start))
            .collect();
        plot_ui.points(Points::new(corners).radius(4.0).color(egui::Color32::RED));

        for sample in &frame.panels {
            let Some(arrow) = sample.overlay_vector(frame.inputs.flip_airfoil) else {
                continue;
            };
            let color = if sample.panel.on_bottom {
                egui::Color32::from_rgb(255, 109, 194)
            } else {
                egui::Color32::from_rgb(255, 161, 0)
            };
            let base = sample.panel.midpoint;
            plot_ui.line(
                Line::new(vec![to_plot(base), to_plot(base + arrow * OVERLAY_GAIN * scale)])
                    .color(color)
                    .width(2.0),
            );
        }
    }
}

impl eframe::App for AviaryViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);

        egui::SidePanel::left("controls").show(ctx, |ui| {
            self.controls(ui);
        });

        self.step();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Aviary");

            let plot = Plot::new("airfoil_plot").data_aspect(1.0);
            plot.show(ui, |plot_ui| {
                if let Some(frame) = &self.frame {
                    self.draw_frame(plot_ui, frame);
                }
            });
        });

        ctx.request_repaint();
    }
}

fn to_plot(v: Vec2) -> [f64; 2] {
    [v.x, v.y]
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AviaryConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AviaryConfig::default(),
    };
    if let Some(path) = args.airfoil {
        config.airfoil.path = path;
    }
    if args.legacy_exponent {
        config.model.legacy_exponent = true;
    }

    let airfoil = Airfoil::load(&config.airfoil.path, config.load_options())
        .with_context(|| format!("loading airfoil {}", config.airfoil.path.display()))?;
    let inputs = config.simulation_inputs();

    if args.print {
        let frame = evaluate(&airfoil, &inputs).context("evaluating step")?;
        for line in frame.stat_lines() {
            println!("{line}");
        }
        let cl = coefficient_of_lift(deg_to_rad(inputs.angle_of_attack_deg));
        println!("Lift coefficient (CL): {cl:.3}");
        return Ok(());
    }

    let rotation_speed_deg = config.flight.rotation_speed_deg;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 720.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Aviary",
        options,
        Box::new(move |_cc| Box::new(AviaryViewer::new(airfoil, inputs, rotation_speed_deg))),
    )
    .map_err(|err| anyhow::anyhow!("viewer exited with an error: {err}"))
}
