pub mod integrator;
pub mod runner;
pub mod sweep;

pub use runner::{simulate, simulate_with, step, Flight, Sample};
pub use integrator::euler_step;
pub use sweep::{run_sweep, Cell, CellResult};
