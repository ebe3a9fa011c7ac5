use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Sinusoidal wind disturbance
// ---------------------------------------------------------------------------

/// World-frame gust force `amplitude · sin(omega·t + phase)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Wind {
    pub amplitude: Vector3<f64>,  // N
    pub omega: f64,               // rad/s
    pub phase: f64,               // rad
}

impl Wind {
    pub fn new(amplitude: Vector3<f64>, omega: f64) -> Self {
        Self { amplitude, omega, phase: 0.0 }
    }

    /// No disturbance at any time.
    pub fn calm() -> Self {
        Self::new(Vector3::zeros(), 0.0)
    }

    /// Gust along world +X, as used by the dataset sweep.
    pub fn along_x(amplitude: f64, omega: f64) -> Self {
        Self::new(Vector3::new(amplitude, 0.0, 0.0), omega)
    }

    pub fn with_phase(mut self, phase: f64) -> Self {
        self.phase = phase;
        self
    }

    pub fn force(&self, t: f64) -> Vector3<f64> {
        self.amplitude * (self.omega * t + self.phase).sin()
    }

    pub fn is_calm(&self) -> bool {
        self.amplitude == Vector3::zeros()
    }
}

impl Default for Wind {
    fn default() -> Self {
        Self::calm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    fn zero_at_start_without_phase() {
        let w = Wind::along_x(2.0, PI);
        assert_eq!(w.force(0.0), Vector3::zeros());
    }

    #[test]
    fn peaks_at_quarter_period() {
        let w = Wind::along_x(2.0, 2.0 * PI);
        assert_abs_diff_eq!(w.force(0.25), Vector3::new(2.0, 0.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(w.force(0.75), Vector3::new(-2.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn phase_shifts_signal() {
        let w = Wind::along_x(1.0, 3.0 * PI).with_phase(PI / 2.0);
        assert_abs_diff_eq!(w.force(0.0).x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn calm_is_always_zero() {
        let w = Wind::calm();
        assert!(w.is_calm());
        for t in [0.0, 0.3, 12.5, 100.0] {
            assert_eq!(w.force(t), Vector3::zeros());
        }
    }
}
