use std::f64::consts::PI;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Guidance: desired position as a function of time
// ---------------------------------------------------------------------------

/// Reference curve sampled by the driver once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reference {
    /// Lissajous figure-eight in the z = 0 plane:
    /// r = 2πt/T, p = (cos(r/2), sin(r), 0).
    FigureEight { period: f64 },
    /// Fixed setpoint. A point straight below the vehicle far enough that
    /// the position loop asks for downward thrust has no reference attitude;
    /// `ScenarioConfig::validate` rejects it for the starting position.
    Hover { point: Vector3<f64> },
}

impl Reference {
    pub fn position(&self, t: f64) -> Vector3<f64> {
        match *self {
            Reference::FigureEight { period } => {
                let r = 2.0 * PI * t / period;
                Vector3::new((r / 2.0).cos(), r.sin(), 0.0)
            }
            Reference::Hover { point } => point,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Reference::FigureEight { period } => format!("figure-eight (T={:.2}s)", period),
            Reference::Hover { point } => {
                format!("hover at ({:.2}, {:.2}, {:.2})", point.x, point.y, point.z)
            }
        }
    }
}

impl Default for Reference {
    fn default() -> Self {
        Reference::FigureEight { period: 1.5 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn figure_eight_starts_at_unit_x() {
        let r = Reference::default();
        assert_abs_diff_eq!(r.position(0.0), Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn figure_eight_closes_after_two_periods() {
        let r = Reference::FigureEight { period: 1.5 };
        // x has half the frequency of y, so the curve closes after 2T.
        assert_abs_diff_eq!(r.position(3.0), r.position(0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(r.position(1.5).x, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn figure_eight_stays_in_plane() {
        let r = Reference::FigureEight { period: 2.0 };
        for i in 0..50 {
            let p = r.position(i as f64 * 0.1);
            assert_eq!(p.z, 0.0);
            assert!(p.x.abs() <= 1.0 && p.y.abs() <= 1.0);
        }
    }

    #[test]
    fn hover_is_constant() {
        let point = Vector3::new(1.0, 0.0, 1.0);
        let r = Reference::Hover { point };
        assert_eq!(r.position(0.0), point);
        assert_eq!(r.position(42.0), point);
    }

    #[test]
    fn reference_roundtrips_through_json() {
        let r: Reference = serde_json::from_str(r#"{"kind":"figure_eight","period":2.5}"#).unwrap();
        assert_eq!(r, Reference::FigureEight { period: 2.5 });
    }
}
