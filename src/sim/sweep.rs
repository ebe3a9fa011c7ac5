use rayon::prelude::*;
use tracing::{debug, info};

use super::runner::{simulate_with, Flight};
use crate::config::ScenarioConfig;
use crate::error::Result;
use crate::physics::Wind;
use crate::vehicle::Vehicle;

// ---------------------------------------------------------------------------
// Wind parameter sweep
// ---------------------------------------------------------------------------

/// One grid point: gust amplitude (N) and angular frequency (rad/s).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub amplitude: f64,
    pub omega: f64,
}

impl Cell {
    /// File-name tag, e.g. `wind_1_omega_6.283185307179586`.
    pub fn tag(&self) -> String {
        format!("wind_{}_omega_{}", self.amplitude, self.omega)
    }
}

#[derive(Debug, Clone)]
pub struct CellResult {
    pub cell: Cell,
    pub vehicle: Vehicle,
    pub flight: Flight,
}

/// Grid in amplitude-major order.
pub fn cells(scenario: &ScenarioConfig) -> Vec<Cell> {
    let sweep = &scenario.sweep;
    sweep
        .amplitudes
        .iter()
        .flat_map(|&amplitude| sweep.omegas.iter().map(move |&omega| Cell { amplitude, omega }))
        .collect()
}

/// Fly one cell on a fresh vehicle and controller.
pub fn run_cell(scenario: &ScenarioConfig, cell: Cell) -> Result<CellResult> {
    let wind = Wind::new(scenario.sweep.direction * cell.amplitude, cell.omega);
    let mut vehicle = scenario.vehicle_with_wind(wind)?;
    let mut controller = scenario.controller()?;
    let flight = simulate_with(&mut vehicle, &mut controller, &scenario.reference, &scenario.sim)?;
    debug!(cell = %cell.tag(), steps = flight.samples.len(), "cell finished");
    Ok(CellResult { cell, vehicle, flight })
}

/// Run every cell in parallel; each worker owns its vehicle.
/// Results come back in grid order regardless of scheduling.
pub fn run_sweep(scenario: &ScenarioConfig) -> Result<Vec<CellResult>> {
    let grid = cells(scenario);
    info!(cells = grid.len(), duration = scenario.sim.max_time, "starting sweep");
    let results = grid
        .into_par_iter()
        .map(|cell| run_cell(scenario, cell))
        .collect::<Result<Vec<_>>>()?;
    info!(cells = results.len(), "sweep complete");
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SweepConfig;
    use crate::dynamics::state::SimConfig;
    use std::f64::consts::PI;

    fn short_scenario() -> ScenarioConfig {
        ScenarioConfig {
            sim: SimConfig { dt: 1.0 / 200.0, max_time: 1.0 },
            sweep: SweepConfig {
                amplitudes: vec![0.0, 2.0],
                omegas: vec![PI, 3.0 * PI],
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn default_grid_is_three_by_three() {
        let grid = cells(&ScenarioConfig::default());
        assert_eq!(grid.len(), 9);
        assert_eq!(grid[0], Cell { amplitude: 0.0, omega: PI });
        assert_eq!(grid[1], Cell { amplitude: 0.0, omega: 2.0 * PI });
        assert_eq!(grid[8], Cell { amplitude: 2.0, omega: 3.0 * PI });
    }

    #[test]
    fn sweep_preserves_grid_order() {
        let scenario = short_scenario();
        let results = run_sweep(&scenario).unwrap();
        let got: Vec<Cell> = results.iter().map(|r| r.cell).collect();
        assert_eq!(got, cells(&scenario));
        for r in &results {
            assert_eq!(r.flight.samples.len(), 200);
        }
    }

    #[test]
    fn parallel_matches_serial() {
        let scenario = short_scenario();
        let parallel = run_sweep(&scenario).unwrap();
        for r in &parallel {
            let serial = run_cell(&scenario, r.cell).unwrap();
            assert_eq!(serial.flight.trajectory, r.flight.trajectory);
        }
    }

    #[test]
    fn zero_amplitude_cells_see_no_wind() {
        let results = run_sweep(&short_scenario()).unwrap();
        for r in results.iter().filter(|r| r.cell.amplitude == 0.0) {
            assert!(r.flight.samples.iter().all(|s| s.wind.norm() == 0.0));
        }
    }

    #[test]
    fn tag_matches_dataset_naming() {
        let c = Cell { amplitude: 1.0, omega: 2.5 };
        assert_eq!(c.tag(), "wind_1_omega_2.5");
    }
}
