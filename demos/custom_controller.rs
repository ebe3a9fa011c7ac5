use nalgebra::Vector3;

use quad_sim::dynamics::state::{RotorSpeeds, SimConfig, State, GRAVITY};
use quad_sim::gnc::{Controller, Reference};
use quad_sim::physics::Wind;
use quad_sim::sim;
use quad_sim::vehicle::{presets, VehicleParams};

/// Collective-only altitude hold: PD on height, equal speed on all four
/// rotors, no attitude control at all.
struct AltitudeHold {
    params: VehicleParams,
    kp: f64,
    kd: f64,
}

impl Controller for AltitudeHold {
    fn control(&mut self, state: &State, target: &Vector3<f64>) -> quad_sim::Result<RotorSpeeds> {
        let accel = self.kp * (target.z - state.pos.z) - self.kd * state.vel.z + GRAVITY;
        let thrust = (self.params.mass * accel).max(0.0);
        Ok(RotorSpeeds::uniform((thrust / (4.0 * self.params.k_thrust)).sqrt()))
    }

    fn name(&self) -> &str {
        "AltitudeHold"
    }
}

fn main() -> quad_sim::Result<()> {
    let mut vehicle = presets::default_quad(Wind::calm())?;
    let reference = Reference::Hover { point: Vector3::new(1.0, 0.0, 1.0) };
    let config = SimConfig { dt: 1.0 / 200.0, max_time: 10.0 };

    let mut controller = AltitudeHold {
        params: vehicle.params.clone(),
        kp: 4.0,
        kd: 3.0,
    };

    println!("Simulating with {} controller...", controller.name());
    let flight = sim::simulate_with(&mut vehicle, &mut controller, &reference, &config)?;

    let peak = flight.trajectory.iter().map(|s| s.pos.z).fold(0.0_f64, f64::max);
    println!("Peak altitude: {:.3} m", peak);
    if let Some(last) = flight.final_state() {
        println!("Final altitude: {:.3} m", last.pos.z);
        println!("Final tilt: {:.2} deg", last.tilt().to_degrees());
    }
    println!("Trajectory points: {}", flight.trajectory.len());
    Ok(())
}
