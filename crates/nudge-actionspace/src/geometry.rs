//! Planar geometry helpers shared by the action spaces.
//!
//! - [`linspace`] – evenly spaced samples of a closed interval.
//! - [`euclidean_distance`] – distance between two feature vectors.
//! - [`Side`] – the four canonical approach sides of a box-shaped object.
//! - [`object_side_angles`] – world-frame angles of an object's sides,
//!   starting from the side that faces the robot.

use std::f64::consts::{FRAC_PI_2, PI};

use nudge_types::normalize_angle;
use serde::{Deserialize, Serialize};

const TIE_EPSILON: f64 = 1e-9;

/// `num` evenly spaced samples of `[start, end]`, endpoints included.
///
/// A single sample yields `end`; zero samples yield an empty vector.
pub fn linspace(start: f64, end: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![end],
        _ => {
            let step = (end - start) / (num - 1) as f64;
            (0..num)
                .map(|i| if i == num - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Euclidean distance between two equally sized feature vectors.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "feature vectors differ in length");
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

// ────────────────────────────────────────────────────────────────────────────
// Sides
// ────────────────────────────────────────────────────────────────────────────

/// Object axis whose extent applies to an approach side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Extent seen when approaching from the front or back.
    Length,
    /// Extent seen when approaching from the left or right.
    Width,
}

/// One of the four canonical sides of an object, measured in the object's
/// own frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Front,
    Left,
    Back,
    Right,
}

impl Side {
    /// Enumeration order used by the object-oriented action table.
    pub const ALL: [Side; 4] = [Side::Front, Side::Left, Side::Back, Side::Right];

    /// Heading offset of this side: FRONT=0, LEFT=π/2, BACK=π, RIGHT=3π/2.
    pub fn heading(self) -> f64 {
        match self {
            Side::Front => 0.0,
            Side::Left => FRAC_PI_2,
            Side::Back => PI,
            Side::Right => 3.0 * FRAC_PI_2,
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Side::Front | Side::Back => Axis::Length,
            Side::Left | Side::Right => Axis::Width,
        }
    }

    /// Position of this side in [`Side::ALL`].
    pub fn index(self) -> usize {
        match self {
            Side::Front => 0,
            Side::Left => 1,
            Side::Back => 2,
            Side::Right => 3,
        }
    }
}

/// World-frame angles of the four sides of an object oriented at `theta`.
///
/// Index 0 is the side whose angle is closest to zero (the side facing the
/// robot); the rest follow counter-clockwise.  When an object corner points
/// straight at the robot two sides tie and the right-hand one (negative
/// angle) is taken as the front.
pub fn object_side_angles(theta: f64) -> [f64; 4] {
    let angles: [f64; 4] =
        std::array::from_fn(|k| normalize_angle(theta + k as f64 * FRAC_PI_2));

    let mut front = 0;
    for (k, angle) in angles.iter().enumerate().skip(1) {
        let candidate = angle.abs();
        let best = angles[front].abs();
        let tie = (candidate - best).abs() <= TIE_EPSILON;
        if (!tie && candidate < best) || (tie && *angle < angles[front]) {
            front = k;
        }
    }

    std::array::from_fn(|i| angles[(front + i) % 4])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_4;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn linspace_includes_both_endpoints() {
        let v = linspace(-10.0, 10.0, 5);
        assert_eq!(v.len(), 5);
        assert!(approx(v[0], -10.0));
        assert!(approx(v[1], -5.0));
        assert!(approx(v[2], 0.0));
        assert!(approx(v[4], 10.0));
    }

    #[test]
    fn linspace_degenerate_counts() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(0.0, 1.0, 1), vec![1.0]);
    }

    #[test]
    fn euclidean_distance_of_3_4_triangle() {
        assert!(approx(euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0));
        assert!(approx(euclidean_distance(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]), 0.0));
    }

    #[test]
    fn side_headings_and_axes() {
        let headings: Vec<f64> = Side::ALL.iter().map(|s| s.heading()).collect();
        assert!(approx(headings[0], 0.0));
        assert!(approx(headings[1], FRAC_PI_2));
        assert!(approx(headings[2], PI));
        assert!(approx(headings[3], 3.0 * FRAC_PI_2));

        assert_eq!(Side::Front.axis(), Axis::Length);
        assert_eq!(Side::Back.axis(), Axis::Length);
        assert_eq!(Side::Left.axis(), Axis::Width);
        assert_eq!(Side::Right.axis(), Axis::Width);

        for (i, side) in Side::ALL.iter().enumerate() {
            assert_eq!(side.index(), i);
        }
    }

    #[test]
    fn side_angles_for_aligned_object() {
        let angles = object_side_angles(0.0);
        assert!(approx(angles[0], 0.0));
        assert!(approx(angles[1], FRAC_PI_2));
        assert!(approx(angles[2], PI));
        assert!(approx(angles[3], -FRAC_PI_2));
    }

    #[test]
    fn side_angles_pick_the_side_nearest_zero() {
        // Object rotated by 100°: its right side (at 10°) faces the robot.
        let theta = 100f64.to_radians();
        let angles = object_side_angles(theta);
        assert!(approx(angles[0], 10f64.to_radians()));
        assert!(approx(angles[1], 100f64.to_radians()));
        assert!(approx(angles[2], -170f64.to_radians()));
        assert!(approx(angles[3], -80f64.to_radians()));
    }

    #[test]
    fn side_angles_tie_prefers_right_hand_side() {
        let angles = object_side_angles(FRAC_PI_4);
        assert!(approx(angles[0], -FRAC_PI_4));
        assert!(approx(angles[1], FRAC_PI_4));
        assert!(approx(angles[2], 3.0 * FRAC_PI_4));
        assert!(approx(angles[3], -3.0 * FRAC_PI_4));
    }
}
