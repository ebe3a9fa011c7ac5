use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, Level};

use quad_sim::config::{ScenarioConfig, VehicleConfig};
use quad_sim::gnc::Reference;
use quad_sim::io::{self, FlightSummary, RunReport, SweepEntry};
use quad_sim::physics::Wind;
use quad_sim::sim::{self, Flight};
use quad_sim::types::Vehicle;
use quad_sim::Result;

/// Dataset runs default to this length when no config file is given.
const DATASET_DURATION: f64 = 125.0;

#[derive(Debug, Parser)]
#[command(name = "quad-sim", version, about = "Quadcopter flight simulator and wind dataset generator")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Airframe {
    /// 1 kg, 0.25 m arm frame
    Quad250,
    /// 27 g micro quad
    Crazyflie,
}

impl Airframe {
    fn config(self) -> VehicleConfig {
        match self {
            Airframe::Quad250 => VehicleConfig::default(),
            Airframe::Crazyflie => VehicleConfig::crazyflie(),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fly a single run and print a summary
    Fly {
        /// JSON scenario file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Run length in seconds
        #[arg(long)]
        duration: Option<f64>,
        /// Airframe preset, overriding the config file
        #[arg(long, value_enum)]
        airframe: Option<Airframe>,
        /// Hold the initial position instead of flying the figure-eight
        #[arg(long)]
        hover: bool,
        /// Wind amplitude along x (N)
        #[arg(long)]
        wind: Option<f64>,
        /// Wind angular frequency (rad/s)
        #[arg(long)]
        omega: Option<f64>,
        /// Write the full state trajectory as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Write the flight summary as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Generate the wind dataset over the amplitude/frequency grid
    Sweep {
        /// JSON scenario file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Run length per cell in seconds
        #[arg(long)]
        duration: Option<f64>,
        /// Airframe preset, overriding the config file
        #[arg(long, value_enum)]
        airframe: Option<Airframe>,
        /// Output directory
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).with_target(false).init();

    match cli.command {
        Commands::Fly { config, duration, airframe, hover, wind, omega, csv, json } => {
            let mut scenario = load_scenario(config.as_deref(), None)?;
            if let Some(d) = duration {
                scenario.sim.max_time = d;
            }
            if let Some(a) = airframe {
                scenario.vehicle = a.config();
            }
            if hover {
                scenario.reference = Reference::Hover { point: scenario.initial_position };
            }
            if wind.is_some() || omega.is_some() {
                let amplitude = wind.unwrap_or(scenario.wind.amplitude.x);
                let w = omega.unwrap_or(scenario.wind.omega);
                scenario.wind = Wind::along_x(amplitude, w);
            }
            scenario.validate()?;
            fly(&scenario, csv.as_deref(), json.as_deref())
        }
        Commands::Sweep { config, duration, airframe, out } => {
            let mut scenario = load_scenario(config.as_deref(), Some(DATASET_DURATION))?;
            if let Some(d) = duration {
                scenario.sim.max_time = d;
            }
            if let Some(a) = airframe {
                scenario.vehicle = a.config();
            }
            scenario.validate()?;
            sweep(&scenario, &out)
        }
    }
}

fn load_scenario(path: Option<&Path>, default_duration: Option<f64>) -> Result<ScenarioConfig> {
    match path {
        Some(p) => ScenarioConfig::from_file(p),
        None => {
            let mut scenario = ScenarioConfig::default();
            if let Some(d) = default_duration {
                scenario.sim.max_time = d;
            }
            Ok(scenario)
        }
    }
}

// ---------------------------------------------------------------------------
// fly
// ---------------------------------------------------------------------------

fn fly(scenario: &ScenarioConfig, csv: Option<&Path>, json: Option<&Path>) -> Result<()> {
    let mut vehicle = scenario.vehicle()?;
    let mut controller = scenario.controller()?;
    let flight = sim::simulate_with(&mut vehicle, &mut controller, &scenario.reference, &scenario.sim)?;
    let summary = FlightSummary::from_flight(&flight);
    info!(steps = summary.steps, rms = summary.rms_tracking_error_m, "run complete");

    print_report(scenario, &vehicle, &flight, &summary);

    if let Some(path) = csv {
        io::csv::write_trajectory_file(path, &flight.trajectory)?;
        info!(path = %path.display(), "trajectory written");
    }
    if let Some(path) = json {
        let report = RunReport {
            vehicle: vehicle.name.clone(),
            reference: scenario.reference.label(),
            wind: vehicle.wind,
            performance: summary,
        };
        io::json::write_report_file(path, &report)?;
        info!(path = %path.display(), "summary written");
    }
    Ok(())
}

fn print_report(scenario: &ScenarioConfig, vehicle: &Vehicle, flight: &Flight, summary: &FlightSummary) {
    let p = &vehicle.params;

    println!();
    println!("====================================================================");
    println!("  QUADCOPTER FLIGHT SIMULATION: {}", vehicle.name);
    println!("====================================================================");
    println!();
    println!("  Vehicle Parameters");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Mass:          {:>8.3} kg    Arm length:   {:>8.3} m",
        p.mass, p.arm_length
    );
    println!(
        "  k_thrust:      {:>8.2e}       k_drag:       {:>8.2e}",
        p.k_thrust, p.k_drag
    );
    println!(
        "  Hover thrust:  {:>8.2} N     Hover speed:  {:>8.1} rad/s",
        p.hover_thrust(),
        p.hover_speed()
    );
    let wind = if vehicle.wind.is_calm() {
        "calm".to_string()
    } else {
        format!("{:.2} N @ {:.2} rad/s", vehicle.wind.amplitude.norm(), vehicle.wind.omega)
    };
    println!("  Reference:     {}", scenario.reference.label());
    println!("  Wind:          {}", wind);
    println!();

    println!("  Performance Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Tracking RMS:  {:>8.3} m     Tracking max: {:>8.3} m",
        summary.rms_tracking_error_m, summary.max_tracking_error_m
    );
    println!(
        "  Max speed:     {:>8.2} m/s   Max tilt:     {:>8.1} deg",
        summary.max_speed_ms, summary.max_tilt_deg
    );
    println!(
        "  Rotor max:     {:>8.1} rad/s Rotor mean:   {:>8.1} rad/s",
        summary.max_rotor_speed, summary.mean_rotor_speed
    );
    println!("  Flight time:   {:>8.2} s", summary.duration_s);
    println!();

    println!("  Trajectory");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>8}  {:>8}  {:>8}  {:>8}  {:>8}",
        "t (s)", "x (m)", "y (m)", "z (m)", "err (m)", "tilt(°)"
    );
    println!("  {}", "─".repeat(60));

    let interval = (flight.samples.len() / 30).max(1);
    for (i, s) in flight.samples.iter().enumerate() {
        if i % interval != 0 && i + 1 != flight.samples.len() {
            continue;
        }
        println!(
            "  {:>7.2}  {:>8.3}  {:>8.3}  {:>8.3}  {:>8.3}  {:>8.2}",
            s.state.time,
            s.state.pos.x,
            s.state.pos.y,
            s.state.pos.z,
            (s.state.pos - s.target).norm(),
            s.state.tilt().to_degrees()
        );
    }

    println!();
    println!("  Simulation: {} steps, dt={} s", summary.steps, scenario.sim.dt);
    println!("====================================================================");
    println!();
}

// ---------------------------------------------------------------------------
// sweep
// ---------------------------------------------------------------------------

fn sweep(scenario: &ScenarioConfig, out: &Path) -> Result<()> {
    std::fs::create_dir_all(out)?;
    let results = sim::run_sweep(scenario)?;

    let mut entries = Vec::with_capacity(results.len());
    for r in &results {
        let (dataset, trajectory) =
            io::csv::write_cell(out, &r.cell.tag(), &r.vehicle.params, &r.flight)?;

        let performance = FlightSummary::from_flight(&r.flight);
        println!(
            "  A={:>4.1} N  ω={:>6.3} rad/s  rms={:>7.3} m  max={:>7.3} m  → {}",
            r.cell.amplitude,
            r.cell.omega,
            performance.rms_tracking_error_m,
            performance.max_tracking_error_m,
            dataset
        );
        entries.push(SweepEntry {
            amplitude: r.cell.amplitude,
            omega: r.cell.omega,
            dataset,
            trajectory,
            performance,
        });
    }

    io::json::write_report_file(out.join("summary.json"), &entries)?;
    info!(cells = entries.len(), out = %out.display(), "dataset written");
    Ok(())
}
