use log::debug;
use nalgebra::{Matrix3, Vector3};

use crate::lattice::lattice_geometry::LatticeGeometry;

// 2^53: beyond this an f64 quotient no longer resolves neighbouring integers
const MAX_RESOLVABLE_COEFFICIENT: f64 = 9_007_199_254_740_992.0;

/// Walks the integers around a reference value in order of increasing distance from the
/// continuous optimum: `r`, `r + s`, `r - s`, `r + 2s`, `r - 2s`, ...
///
/// `s` is +1 when the continuous optimum lies above `r` and -1 otherwise, so the second
/// candidate is always the one on the near side of the fractional part.
struct OutwardSteps {
    reference: i64,
    sign: i64,
    delta: i64,
}

impl OutwardSteps {
    fn new(reference: i64, sign: i64) -> Self {
        OutwardSteps {
            reference,
            sign,
            delta: 0,
        }
    }

    fn current(&self) -> i64 {
        self.reference + self.sign * self.delta
    }

    /// Moves to the next candidate, or `None` once it no longer fits in an `i64`.
    fn advance(&mut self) -> Option<i64> {
        let delta = self
            .delta
            .checked_neg()?
            .checked_add(i64::from(self.delta <= 0))?;
        let next = self.reference.checked_add(self.sign.checked_mul(delta)?)?;
        self.delta = delta;
        Some(next)
    }
}

/// Starts a 1D search along the diagonal entry `diag` for the residual component `target`.
/// Returns the stepper and the squared distance of its first candidate. A quotient too large to
/// round exactly yields an infinite distance, so the axis contributes no candidates.
fn start_axis(diag: f64, target: f64) -> (OutwardSteps, f64) {
    let quotient = (target / diag).round();
    if !(quotient.abs() < MAX_RESOLVABLE_COEFFICIENT) {
        return (OutwardSteps::new(0, 1), f64::INFINITY);
    }
    let reference = quotient as i64;
    let sign = if diag * (reference as f64) < target { 1 } else { -1 };
    let steps = OutwardSteps::new(reference, sign);
    let d2 = axis_distance_sq(diag, reference, target);
    (steps, d2)
}

fn axis_distance_sq(diag: f64, n: i64, target: f64) -> f64 {
    let d = n as f64 * diag - target;
    d * d
}

/// Squared distance of the next candidate along an axis, infinite once the walk overflows.
fn next_distance_sq(steps: &mut OutwardSteps, diag: f64, target: f64) -> f64 {
    match steps.advance() {
        Some(n) => axis_distance_sq(diag, n, target),
        None => f64::INFINITY,
    }
}

/// Integer coefficients `(n0, n1, n2)` minimising `|x - (n0 a + n1 b + n2 c)|^2`, where
/// `a, b, c` are the rows of the lower-triangular `basis`.
///
/// The search is nested from axis 2 (outermost) down to axis 0. Each level visits integers
/// outward from its rounded continuous optimum and stops once the squared distance along its
/// own axis reaches what is left of the bound. The bound starts at `prune_radius_sq` and
/// shrinks whenever a strictly closer combination is found, so ties keep the first candidate
/// in visiting order.
pub fn nearest_lattice_coefficients(
    basis: &Matrix3<f64>,
    prune_radius_sq: f64,
    point: &Vector3<f64>,
) -> [i64; 3] {
    let l = basis;
    let x = point;
    let mut best = [0i64; 3];

    let mut bound2 = prune_radius_sq;
    let (mut steps2, mut d2_2) = start_axis(l[(2, 2)], x[2]);
    while d2_2 < bound2 {
        let n2 = steps2.current();
        let x1 = [x[0] - n2 as f64 * l[(2, 0)], x[1] - n2 as f64 * l[(2, 1)]];

        // Remaining budget after axis 2; doubles as the running best for axes 0 and 1
        let mut bound1 = bound2 - d2_2;
        let (mut steps1, mut d2_1) = start_axis(l[(1, 1)], x1[1]);
        while d2_1 < bound1 {
            let n1 = steps1.current();
            let x0 = x1[0] - n1 as f64 * l[(1, 0)];
            let n0 = (x0 / l[(0, 0)]).round() as i64;
            let d2_0 = axis_distance_sq(l[(0, 0)], n0, x0);
            if d2_0 < bound1 - d2_1 {
                best = [n0, n1, n2];
                bound1 = d2_0 + d2_1;
            }
            d2_1 = next_distance_sq(&mut steps1, l[(1, 1)], x1[1]);
        }

        bound2 = bound1 + d2_2;
        d2_2 = next_distance_sq(&mut steps2, l[(2, 2)], x[2]);
    }

    best
}

/// Replaces `point` with its minimum-image residual and returns the lattice coefficients that
/// were subtracted.
pub fn decode(basis: &Matrix3<f64>, prune_radius_sq: f64, point: &mut Vector3<f64>) -> [i64; 3] {
    let n = nearest_lattice_coefficients(basis, prune_radius_sq, point);
    let (n0, n1, n2) = (n[0] as f64, n[1] as f64, n[2] as f64);
    let l = basis;

    // x -= n^T L, lower triangle only
    point[0] -= n0 * l[(0, 0)] + n1 * l[(1, 0)] + n2 * l[(2, 0)];
    point[1] -= n1 * l[(1, 1)] + n2 * l[(2, 1)];
    point[2] -= n2 * l[(2, 2)];
    n
}

impl LatticeGeometry {
    /// Minimum image of `point`.
    pub fn wrap(&self, point: Vector3<f64>) -> Vector3<f64> {
        let mut wrapped = point;
        self.wrap_in_place(&mut wrapped);
        wrapped
    }

    pub fn wrap_in_place(&self, point: &mut Vector3<f64>) -> [i64; 3] {
        decode(self.basis(), self.prune_radius_sq(), point)
    }

    /// Coefficients of the lattice translation closest to `point`.
    pub fn image_of(&self, point: &Vector3<f64>) -> [i64; 3] {
        nearest_lattice_coefficients(self.basis(), self.prune_radius_sq(), point)
    }
}

/// Wraps every point in place, one after the other.
pub fn wrap_points(geometry: &LatticeGeometry, points: &mut [Vector3<f64>]) {
    debug!("Wrapping {} points", points.len());
    for point in points.iter_mut() {
        geometry.wrap_in_place(point);
    }
}

/// Wraps every point in place on the rayon thread pool. Small batches fall back to
/// [`wrap_points`].
#[cfg(feature = "parallel")]
pub fn wrap_points_par(geometry: &LatticeGeometry, points: &mut [Vector3<f64>]) {
    use crate::config::PARALLEL_MIN_POINTS;
    use rayon::prelude::*;

    if points.len() < PARALLEL_MIN_POINTS {
        wrap_points(geometry, points);
        return;
    }

    debug!(
        "Wrapping {} points on {} threads",
        points.len(),
        rayon::current_num_threads()
    );
    points.par_iter_mut().for_each(|point| {
        geometry.wrap_in_place(point);
    });
}

/// Shortest vector from `from` to any periodic image of `to`.
pub fn minimum_image_displacement(
    geometry: &LatticeGeometry,
    from: &Vector3<f64>,
    to: &Vector3<f64>,
) -> Vector3<f64> {
    geometry.wrap(to - from)
}

pub fn minimum_image_distance(
    geometry: &LatticeGeometry,
    from: &Vector3<f64>,
    to: &Vector3<f64>,
) -> f64 {
    minimum_image_displacement(geometry, from, to).norm()
}
