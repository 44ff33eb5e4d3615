//! Geometry helpers over sample-aligned position and velocity sequences.
//!
//! Degenerate samples (zero time step, zero-length segment, zero speed) are
//! returned as `None` rather than as NaN or infinity. Aggregates built on
//! top of these sequences skip the `None` entries.

use crate::interface::Vec3;

pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn scale(a: Vec3, k: f64) -> Vec3 {
    [a[0] * k, a[1] * k, a[2] * k]
}

pub fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Euclidean length; `hypot` keeps large components from overflowing.
pub fn norm(a: Vec3) -> f64 {
    a[0].hypot(a[1]).hypot(a[2])
}

/// Per-sample Euclidean norm of the velocity vectors.
pub fn speed(velocities: &[Vec3]) -> Vec<f64> {
    velocities.iter().map(|&v| norm(v)).collect()
}

/// First difference of velocity over time, length `N - 1`.
///
/// A step whose time delta is at most `time_eps` yields `None`.
pub fn acceleration(velocities: &[Vec3], timestamps: &[f64], time_eps: f64) -> Vec<Option<Vec3>> {
    velocities
        .windows(2)
        .zip(timestamps.windows(2))
        .map(|(v, t)| {
            let dt = t[1] - t[0];
            (dt > time_eps).then(|| scale(sub(v[1], v[0]), 1.0 / dt))
        })
        .collect()
}

/// Angle in degrees between consecutive displacement vectors at each
/// interior sample, length `N - 2`.
///
/// A sample whose incoming or outgoing segment is not longer than
/// `length_eps` yields `None`.
pub fn turn_angles(positions: &[Vec3], length_eps: f64) -> Vec<Option<f64>> {
    positions
        .windows(3)
        .map(|w| {
            let incoming = sub(w[1], w[0]);
            let outgoing = sub(w[2], w[1]);
            let (len_in, len_out) = (norm(incoming), norm(outgoing));
            if len_in <= length_eps || len_out <= length_eps {
                return None;
            }
            let cos = (dot(incoming, outgoing) / (len_in * len_out)).clamp(-1.0, 1.0);
            Some(cos.acos().to_degrees())
        })
        .collect()
}

/// Path curvature (1/m) at each interior sample, length `N - 2`.
///
/// Velocity and acceleration are taken by finite differences of the
/// positions; curvature is the magnitude of the acceleration component
/// orthogonal to velocity divided by the squared speed. Samples with a time
/// step at most `time_eps` or a speed at most `speed_eps` yield `None`.
pub fn curvature(
    positions: &[Vec3],
    timestamps: &[f64],
    time_eps: f64,
    speed_eps: f64,
) -> Vec<Option<f64>> {
    positions
        .windows(3)
        .zip(timestamps.windows(3))
        .map(|(p, t)| {
            let (dt0, dt1) = (t[1] - t[0], t[2] - t[1]);
            if dt0 <= time_eps || dt1 <= time_eps {
                return None;
            }
            let v0 = scale(sub(p[1], p[0]), 1.0 / dt0);
            let v1 = scale(sub(p[2], p[1]), 1.0 / dt1);
            let accel = scale(sub(v1, v0), 2.0 / (dt0 + dt1));
            let velocity = scale(add(v0, v1), 0.5);
            let speed = norm(velocity);
            if speed <= speed_eps {
                return None;
            }
            let along = dot(accel, velocity) / speed;
            let normal_sq = (dot(accel, accel) - along * along).max(0.0);
            Some(normal_sq.sqrt() / (speed * speed))
        })
        .collect()
}

pub fn segment_lengths(positions: &[Vec3]) -> Vec<f64> {
    positions.windows(2).map(|w| norm(sub(w[1], w[0]))).collect()
}

/// Sum of consecutive segment lengths.
pub fn path_length(positions: &[Vec3]) -> f64 {
    segment_lengths(positions).iter().sum()
}

/// Net displacement over path length, in [0, 1]; 1.0 when the path length
/// is at most `length_eps`.
pub fn straightness(positions: &[Vec3], length_eps: f64) -> f64 {
    let total = path_length(positions);
    match (positions.first(), positions.last()) {
        (Some(&first), Some(&last)) if total > length_eps => {
            (norm(sub(last, first)) / total).clamp(0.0, 1.0)
        }
        _ => 1.0,
    }
}

/// Collects the defined samples of a guarded sequence.
pub fn defined<T: Copy>(samples: &[Option<T>]) -> Vec<T> {
    samples.iter().flatten().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn speed_is_vector_norm() {
        assert_eq!(speed(&[[3.0, 4.0, 0.0], [0.0, 0.0, 0.0]]), vec![5.0, 0.0]);
    }

    #[test]
    fn norm_of_huge_vector_is_finite() {
        let n = norm([3e200, 4e200, 0.0]);
        assert!(n.is_finite());
        assert_relative_eq!(n, 5e200, max_relative = 1e-12);
    }

    #[test]
    fn acceleration_skips_zero_time_step() {
        let v = [[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [4.0, 0.0, 0.0]];
        let t = [0.0, 1.0, 1.0];
        let a = acceleration(&v, &t, 1e-9);
        assert_eq!(a, vec![Some([2.0, 0.0, 0.0]), None]);
    }

    #[test]
    fn right_angle_turn() {
        let p = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]];
        let angles = turn_angles(&p, 1e-9);
        assert_relative_eq!(angles[0].unwrap(), 90.0, epsilon = 1e-9);
    }

    #[test]
    fn reversal_clamps_to_half_turn() {
        let p = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 0.0]];
        assert_relative_eq!(turn_angles(&p, 1e-9)[0].unwrap(), 180.0);
    }

    #[test]
    fn repeated_point_turn_is_undefined() {
        let p = [[0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]];
        assert_eq!(turn_angles(&p, 1e-9), vec![None]);
    }

    #[test]
    fn curvature_of_circle_is_inverse_radius() {
        let radius = 500.0;
        let step = 0.01_f64;
        let positions: Vec<Vec3> = (0..50)
            .map(|i| {
                let a = i as f64 * step;
                [radius * a.cos(), radius * a.sin(), 0.0]
            })
            .collect();
        let t: Vec<f64> = (0..50).map(|i| i as f64).collect();
        for k in defined(&curvature(&positions, &t, 1e-9, 1e-6)) {
            assert_relative_eq!(k, 1.0 / radius, max_relative = 1e-3);
        }
    }

    #[test]
    fn stationary_curvature_is_undefined() {
        let positions = [[1.0, 1.0, 1.0]; 4];
        let t = [0.0, 1.0, 2.0, 3.0];
        assert!(curvature(&positions, &t, 1e-9, 1e-6)
            .iter()
            .all(Option::is_none));
    }

    #[test]
    fn straight_segment_is_fully_straight() {
        let p: Vec<Vec3> = (0..10).map(|i| [i as f64, 2.0 * i as f64, 0.5]).collect();
        assert_relative_eq!(straightness(&p, 1e-9), 1.0, epsilon = 1e-12);
        assert_relative_eq!(path_length(&p), 9.0 * 5f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn degenerate_path_is_straight_by_definition() {
        assert_eq!(straightness(&[[5.0, 5.0, 5.0]; 3], 1e-9), 1.0);
    }

    #[test]
    fn closed_loop_has_zero_straightness() {
        let p = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 0.0, 0.0],
        ];
        assert_eq!(straightness(&p, 1e-9), 0.0);
    }

    proptest! {
        #[test]
        fn straightness_stays_in_unit_interval(
            points in proptest::collection::vec(
                (-1e4f64..1e4, -1e4f64..1e4, -1e3f64..1e3), 2..40)
        ) {
            let p: Vec<Vec3> = points.into_iter().map(|(x, y, z)| [x, y, z]).collect();
            let s = straightness(&p, 1e-9);
            prop_assert!((0.0..=1.0).contains(&s));
        }

        #[test]
        fn turn_angles_are_finite_and_bounded(
            points in proptest::collection::vec(
                (-10f64..10.0, -10f64..10.0, -10f64..10.0), 3..30)
        ) {
            let p: Vec<Vec3> = points.into_iter().map(|(x, y, z)| [x, y, z]).collect();
            for angle in defined(&turn_angles(&p, 1e-9)) {
                prop_assert!(angle.is_finite());
                prop_assert!((0.0..=180.0).contains(&angle));
            }
        }
    }
}
