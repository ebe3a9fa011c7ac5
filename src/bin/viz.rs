use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};
use nalgebra::Matrix3x6;

use quad_sim::config::ScenarioConfig;
use quad_sim::physics::Wind;
use quad_sim::sim::{self, Sample};

/// Marker pairs drawn as segments: the two arms and the vertical mast.
const SEGMENTS: [(usize, usize, &str); 3] = [(0, 2, "Arm 0-2"), (1, 3, "Arm 1-3"), (4, 5, "Mast")];

fn main() -> eframe::Result {
    let scenario = ScenarioConfig {
        wind: Wind::along_x(1.0, 2.0 * std::f64::consts::PI),
        ..Default::default()
    };

    let app = match QuadViz::fly(&scenario) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("simulation failed: {}", e);
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1500.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Quadcopter Flight Simulator", options, Box::new(|_| Ok(Box::new(app))))
}

struct QuadViz {
    name: String,
    reference: String,
    dt: f64,
    span: f64,
    samples: Vec<Sample>,
    frames: Vec<Matrix3x6<f64>>,
    tick: usize,
    playing: bool,
}

impl QuadViz {
    fn fly(scenario: &ScenarioConfig) -> quad_sim::Result<Self> {
        let mut vehicle = scenario.vehicle()?;
        let mut controller = scenario.controller()?;
        let flight =
            sim::simulate_with(&mut vehicle, &mut controller, &scenario.reference, &scenario.sim)?;
        let frames = flight
            .samples
            .iter()
            .map(|s| vehicle.params.frame_points(&s.state))
            .collect();
        Ok(Self {
            name: vehicle.name,
            reference: scenario.reference.label(),
            dt: scenario.sim.dt,
            span: 2.0 * vehicle.params.arm_length,
            samples: flight.samples,
            frames,
            tick: 0,
            playing: true,
        })
    }
}

/// Column `col` of the frame points projected onto world axes `a` and `b`.
fn project(pts: &Matrix3x6<f64>, col: usize, a: usize, b: usize) -> [f64; 2] {
    [pts[(a, col)], pts[(b, col)]]
}

fn airframe_plot(
    ui: &mut egui::Ui,
    id: &str,
    pts: &Matrix3x6<f64>,
    (a, b): (usize, usize),
    (x_label, y_label): (&str, &str),
    size: f32,
    span: f64,
) {
    let [cx, cy] = project(pts, 4, a, b);
    Plot::new(id)
        .width(size)
        .height(size)
        .data_aspect(1.0)
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .include_x(cx - span)
        .include_x(cx + span)
        .include_y(cy - span)
        .include_y(cy + span)
        .show(ui, |plot_ui| {
            for (from, to, name) in SEGMENTS {
                let seg: PlotPoints = vec![project(pts, from, a, b), project(pts, to, a, b)].into();
                plot_ui.line(Line::new(name, seg));
            }
            let rotors: PlotPoints = (0..4).map(|c| project(pts, c, a, b)).collect();
            plot_ui.points(Points::new("Rotors", rotors).radius(4.0));
        });
}

impl eframe::App for QuadViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.playing && !self.frames.is_empty() {
            let advance = (ctx.input(|i| i.stable_dt) as f64 / self.dt).round().max(1.0) as usize;
            self.tick = (self.tick + advance) % self.frames.len();
            ctx.request_repaint();
        }

        // Airframe playback: top and side projections of the frame points
        egui::SidePanel::right("airframe").min_width(340.0).show(ctx, |ui| {
            ui.heading("Airframe");
            let Some(last) = self.frames.len().checked_sub(1) else {
                ui.label("no samples");
                return;
            };
            ui.horizontal(|ui| {
                let label = if self.playing { "Pause" } else { "Play" };
                if ui.button(label).clicked() {
                    self.playing = !self.playing;
                }
                ui.add(egui::Slider::new(&mut self.tick, 0..=last).text("tick"));
            });
            let s = &self.samples[self.tick];
            ui.label(format!(
                "t = {:.3} s   pos = ({:.2}, {:.2}, {:.2})   tilt = {:.1} deg",
                s.state.time,
                s.state.pos.x,
                s.state.pos.y,
                s.state.pos.z,
                s.state.tilt().to_degrees()
            ));

            let pts = &self.frames[self.tick];
            let size = ui.available_width().min(ui.available_height() / 2.0 - 24.0);
            ui.label("Top view");
            airframe_plot(ui, "frame_top", pts, (0, 1), ("x (m)", "y (m)"), size, self.span);
            ui.label("Side view");
            airframe_plot(ui, "frame_side", pts, (0, 2), ("x (m)", "z (m)"), size, self.span);
        });

        let step = (self.samples.len() / 2000).max(1);
        let sampled: Vec<&Sample> = self.samples.iter().step_by(step).collect();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading(format!("Vehicle: {}", self.name));
            let max_err = self
                .samples
                .iter()
                .map(|s| (s.state.pos - s.target).norm())
                .fold(0.0_f64, f64::max);
            let max_tilt = self
                .samples
                .iter()
                .map(|s| s.state.tilt().to_degrees())
                .fold(0.0_f64, f64::max);
            ui.label(format!(
                "Reference: {}  |  Max tracking error: {:.3} m  |  Max tilt: {:.1} deg  |  Flight: {:.1} s",
                self.reference,
                max_err,
                max_tilt,
                self.samples.last().map_or(0.0, |s| s.state.time),
            ));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_w = available.x / 2.0 - 8.0;
            let half_h = available.y / 2.0 - 8.0;

            ui.horizontal(|ui| {
                // Ground track against the reference
                ui.vertical(|ui| {
                    ui.label("Ground Track (m)");
                    let flown: PlotPoints = sampled.iter()
                        .map(|s| [s.state.pos.x, s.state.pos.y])
                        .collect();
                    let target: PlotPoints = sampled.iter()
                        .map(|s| [s.target.x, s.target.y])
                        .collect();
                    Plot::new("ground_track")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("x (m)")
                        .data_aspect(1.0)
                        .legend(Legend::default())
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Reference", target));
                            plot_ui.line(Line::new("Flown", flown));
                        });
                });

                ui.vertical(|ui| {
                    ui.label("Altitude (m)");
                    let points: PlotPoints = sampled.iter()
                        .map(|s| [s.state.time, s.state.pos.z])
                        .collect();
                    Plot::new("altitude")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("z", points));
                        });
                });
            });

            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label("Rotor Speeds (rad/s)");
                    Plot::new("rotors")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .legend(Legend::default())
                        .show(ui, |plot_ui| {
                            for i in 0..4 {
                                let points: PlotPoints = sampled.iter()
                                    .map(|s| [s.time, s.rotors.0[i]])
                                    .collect();
                                plot_ui.line(Line::new(format!("Rotor {}", i), points));
                            }
                        });
                });

                ui.vertical(|ui| {
                    ui.label("Wind Force (N)");
                    Plot::new("wind")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .legend(Legend::default())
                        .show(ui, |plot_ui| {
                            for (axis, name) in ["x", "y", "z"].iter().enumerate() {
                                let points: PlotPoints = sampled.iter()
                                    .map(|s| [s.time, s.wind[axis]])
                                    .collect();
                                plot_ui.line(Line::new(format!("Wind {}", name), points));
                            }
                        });
                });
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{UnitQuaternion, Vector3};
    use quad_sim::dynamics::state::State;
    use quad_sim::vehicle::VehicleParamsBuilder;

    #[test]
    fn projections_pick_world_axes() {
        let params = VehicleParamsBuilder::new().build().unwrap();
        let state = State::at_rest(Vector3::new(1.0, 2.0, 3.0), UnitQuaternion::identity());
        let pts = params.frame_points(&state);
        // rotor 1 sits on +y, the mast tip above the origin
        assert_eq!(project(&pts, 1, 0, 1), [1.0, 2.25]);
        let [x, z] = project(&pts, 5, 0, 2);
        assert_eq!(x, 1.0);
        assert!((z - 3.05).abs() < 1e-12);
        assert_eq!(project(&pts, 4, 1, 2), [2.0, 3.0]);
    }

    #[test]
    fn playback_frames_follow_samples() {
        let scenario = ScenarioConfig {
            sim: quad_sim::types::SimConfig { dt: 0.01, max_time: 0.2 },
            ..Default::default()
        };
        let app = QuadViz::fly(&scenario).unwrap();
        assert_eq!(app.frames.len(), app.samples.len());
        let last = app.samples.last().unwrap();
        assert_eq!(app.frames.last().unwrap().column(4).into_owned(), last.state.pos);
    }
}
