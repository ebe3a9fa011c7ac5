use nalgebra::{Quaternion, Vector3};

use crate::error::{Result, SimError};

// ---------------------------------------------------------------------------
// Quaternion algebra (scalar-first [w, x, y, z])
// ---------------------------------------------------------------------------

/// Below this midpoint length the two directions are treated as antiparallel.
const ANTIPARALLEL_EPS: f64 = 1e-12;

/// Hamilton product `q ⊗ p`. Not necessarily unit norm.
pub fn multiply(q: &Quaternion<f64>, p: &Quaternion<f64>) -> Quaternion<f64> {
    q * p
}

pub fn conjugate(q: &Quaternion<f64>) -> Quaternion<f64> {
    q.conjugate()
}

/// Divide by the Euclidean norm. The zero vector has no direction.
pub fn normalize(v: &Vector3<f64>) -> Result<Vector3<f64>> {
    let n = v.norm();
    if n == 0.0 || !n.is_finite() {
        return Err(SimError::DegenerateVector);
    }
    Ok(v / n)
}

/// Minimal rotation taking direction `v_from` onto `v_to` (midpoint method).
///
/// The half-angle vector `mid = normalize(from + to)` gives
/// `q = [from·mid, from × mid]` directly, without trigonometry.
/// Antiparallel inputs have no unique minimal rotation and are rejected.
pub fn from_vectors(v_from: &Vector3<f64>, v_to: &Vector3<f64>) -> Result<Quaternion<f64>> {
    let from = normalize(v_from)?;
    let to = normalize(v_to)?;
    let sum = from + to;
    if sum.norm() < ANTIPARALLEL_EPS {
        return Err(SimError::AntiparallelVectors);
    }
    let mid = normalize(&sum)?;
    Ok(Quaternion::from_parts(from.dot(&mid), from.cross(&mid)))
}

/// Pick the hemisphere with non-negative scalar part.
///
/// `q` and `-q` encode the same rotation; the positive one is the short way
/// round, so feedback on its vector part never unwinds a full turn.
pub fn shortest_path(q: Quaternion<f64>) -> Quaternion<f64> {
    if q.w < 0.0 {
        -q
    } else {
        q
    }
}

/// Embed a body rate as a pure quaternion `[0, ω]`.
pub fn pure(v: &Vector3<f64>) -> Quaternion<f64> {
    Quaternion::from_parts(0.0, *v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use nalgebra::UnitQuaternion;

    fn sample() -> (Quaternion<f64>, Quaternion<f64>, Quaternion<f64>) {
        (
            Quaternion::new(0.9, 0.1, -0.3, 0.2),
            Quaternion::new(-0.4, 1.2, 0.5, 0.7),
            Quaternion::new(2.0, -0.6, 0.0, 1.1),
        )
    }

    #[test]
    fn multiply_is_associative() {
        let (a, b, c) = sample();
        let left = multiply(&multiply(&a, &b), &c);
        let right = multiply(&a, &multiply(&b, &c));
        assert_abs_diff_eq!(left.coords, right.coords, epsilon = 1e-12);
    }

    #[test]
    fn identity_is_neutral() {
        let (a, _, _) = sample();
        let one = Quaternion::new(1.0, 0.0, 0.0, 0.0);
        assert_eq!(multiply(&one, &a), a);
        assert_eq!(multiply(&a, &one), a);
    }

    #[test]
    fn hamilton_product_scalar_first() {
        // i ⊗ j = k
        let i = Quaternion::new(0.0, 1.0, 0.0, 0.0);
        let j = Quaternion::new(0.0, 0.0, 1.0, 0.0);
        let k = multiply(&i, &j);
        assert_eq!(k, Quaternion::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(multiply(&j, &i), Quaternion::new(0.0, 0.0, 0.0, -1.0));
    }

    #[test]
    fn product_with_conjugate_is_squared_norm() {
        let (a, b, _) = sample();
        for q in [a, b] {
            let r = multiply(&q, &conjugate(&q));
            assert_relative_eq!(r.w, q.norm_squared(), epsilon = 1e-12);
            assert_abs_diff_eq!(r.imag(), Vector3::zeros(), epsilon = 1e-12);
        }
    }

    #[test]
    fn normalize_gives_unit_norm() {
        for v in [
            Vector3::new(3.0, 4.0, 0.0),
            Vector3::new(1e-8, -2e-8, 5e-9),
            Vector3::new(-120.0, 0.5, 33.0),
        ] {
            let n = normalize(&v).unwrap();
            assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn normalize_zero_is_domain_error() {
        assert!(matches!(
            normalize(&Vector3::zeros()),
            Err(SimError::DegenerateVector)
        ));
    }

    #[test]
    fn from_vectors_rotates_from_onto_to() {
        let from = Vector3::new(0.0, 0.0, 1.0);
        let to = Vector3::new(1.0, 2.0, 3.0);
        let q = UnitQuaternion::from_quaternion(from_vectors(&from, &to).unwrap());
        let rotated = q * from;
        assert_abs_diff_eq!(rotated, to.normalize(), epsilon = 1e-12);
    }

    #[test]
    fn from_vectors_is_unit_and_minimal() {
        let from = Vector3::x();
        let to = Vector3::y();
        let q = from_vectors(&from, &to).unwrap();
        assert_relative_eq!(q.norm(), 1.0, epsilon = 1e-12);
        // 90 deg about +z
        let half = std::f64::consts::FRAC_PI_4;
        assert_abs_diff_eq!(q.w, half.cos(), epsilon = 1e-12);
        assert_abs_diff_eq!(q.k, half.sin(), epsilon = 1e-12);
    }

    #[test]
    fn from_vectors_same_direction_is_identity() {
        let up = Vector3::z();
        let q = from_vectors(&up, &(up * 9.81)).unwrap();
        assert_eq!(q, Quaternion::new(1.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn from_vectors_antiparallel_is_domain_error() {
        let up = Vector3::z();
        assert!(matches!(
            from_vectors(&up, &-up),
            Err(SimError::AntiparallelVectors)
        ));
    }

    #[test]
    fn shortest_path_keeps_rotation() {
        let raw = Quaternion::new(-0.8, 0.2, -0.4, 0.4);
        let fixed = shortest_path(raw);
        assert!(fixed.w >= 0.0);
        let r_raw = UnitQuaternion::from_quaternion(raw).to_rotation_matrix();
        let r_fixed = UnitQuaternion::from_quaternion(fixed).to_rotation_matrix();
        assert_abs_diff_eq!(r_raw.matrix(), r_fixed.matrix(), epsilon = 1e-12);

        let already = Quaternion::new(0.8, 0.2, -0.4, 0.4);
        assert_eq!(shortest_path(already), already);
    }
}
