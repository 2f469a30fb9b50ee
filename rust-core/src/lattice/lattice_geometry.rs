use anyhow::{bail, Error};
use log::{debug, warn};
use nalgebra::{Matrix3, Vector3};
use serde::Serialize;

use crate::config::{BASE_VECTOR_TOLERANCE, TRIANGULAR_TOLERANCE};
use crate::interfaces::TriangularCheck;

/// Sum of squares of every basis entry on or below the diagonal.
///
/// This is the initial squared search radius handed to the nearest lattice search for every
/// point. Entries above the diagonal are ignored, matching the search itself.
pub fn prune_radius_sq(basis: &Matrix3<f64>) -> f64 {
    let mut sum = 0.0;
    for i in 0..3 {
        for j in 0..=i {
            sum += basis[(i, j)] * basis[(i, j)];
        }
    }
    sum
}

/// A lower-triangular lattice basis together with its pruning radius.
///
/// Row `i` of `basis` is lattice vector `i`; columns are the Cartesian x, y, z axes. Lattice
/// vector 0 therefore lies along x, vector 1 in the xy-plane, and vector 2 is unrestricted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatticeGeometry {
    basis: Matrix3<f64>,
    prune_radius_sq: f64,
}

impl LatticeGeometry {
    pub fn from_lattice_vectors(
        a: Vector3<f64>,
        b: Vector3<f64>,
        c: Vector3<f64>,
    ) -> Result<Self, Error> {
        let matrix = Matrix3::from_rows(&[a.transpose(), b.transpose(), c.transpose()]);
        Self::from_matrix(matrix)
    }

    pub fn from_rows(rows: [[f64; 3]; 3]) -> Result<Self, Error> {
        Self::from_lattice_vectors(rows[0].into(), rows[1].into(), rows[2].into())
    }

    /// Construct from a matrix whose rows are the lattice vectors, rejecting anything that is
    /// not lower triangular with a positive diagonal.
    pub fn from_matrix(matrix: Matrix3<f64>) -> Result<Self, Error> {
        Self::with_check(matrix, TriangularCheck::Strict)
    }

    /// Like [`LatticeGeometry::from_matrix`] but entries above the diagonal are discarded
    /// instead of rejected.
    pub fn from_matrix_lenient(matrix: Matrix3<f64>) -> Result<Self, Error> {
        Self::with_check(matrix, TriangularCheck::Lenient)
    }

    pub fn with_check(matrix: Matrix3<f64>, check: TriangularCheck) -> Result<Self, Error> {
        if matrix.iter().any(|v| !v.is_finite()) {
            return Err(Error::msg("Lattice vectors must have finite components."));
        }

        let mut basis = matrix;
        for i in 0..3 {
            for j in (i + 1)..3 {
                let entry = matrix[(i, j)];
                match check {
                    TriangularCheck::Strict => {
                        if entry.abs() > TRIANGULAR_TOLERANCE {
                            bail!(
                                "Lattice vector {} has a nonzero component along axis {} ({}); the basis must be lower triangular.",
                                i,
                                j,
                                entry
                            );
                        }
                    }
                    TriangularCheck::Lenient => {
                        if entry != 0.0 {
                            warn!(
                                "Ignoring component {} of lattice vector {} along axis {} (basis is not lower triangular)",
                                entry, i, j
                            );
                        }
                    }
                }
                basis[(i, j)] = 0.0;
            }
        }

        for i in 0..3 {
            if basis[(i, i)] <= BASE_VECTOR_TOLERANCE {
                bail!(
                    "Lattice vector {} must have a positive component along its own axis (got {}).",
                    i,
                    basis[(i, i)]
                );
            }
        }

        let prune_radius_sq = prune_radius_sq(&basis);
        debug!(
            "Prepared lattice geometry: diagonal ({}, {}, {}), prune radius^2 {}",
            basis[(0, 0)],
            basis[(1, 1)],
            basis[(2, 2)],
            prune_radius_sq
        );

        Ok(LatticeGeometry {
            basis,
            prune_radius_sq,
        })
    }

    /// Standard triclinic cell from edge lengths and the angles α (b,c), β (a,c), γ (a,b) in
    /// radians, oriented with a along x and b in the xy-plane.
    pub fn from_cell_parameters(
        a: f64,
        b: f64,
        c: f64,
        alpha: f64,
        beta: f64,
        gamma: f64,
    ) -> Result<Self, Error> {
        if !(a > 0.0 && b > 0.0 && c > 0.0) {
            bail!("Cell lengths must be positive (got {}, {}, {}).", a, b, c);
        }

        let (cos_a, cos_b, cos_g) = (alpha.cos(), beta.cos(), gamma.cos());
        let sin_g = gamma.sin();
        if sin_g.abs() < BASE_VECTOR_TOLERANCE {
            bail!("Angle gamma must not be a multiple of pi.");
        }

        // Squared volume of the unit-edge cell
        let v2 = 1.0 + 2.0 * cos_a * cos_b * cos_g - cos_a * cos_a - cos_b * cos_b - cos_g * cos_g;
        if v2 <= 0.0 {
            bail!("Cell angles ({}, {}, {}) do not describe a real cell.", alpha, beta, gamma);
        }

        Self::from_matrix(Matrix3::new(
            a, 0.0, 0.0,
            b * cos_g, b * sin_g, 0.0,
            c * cos_b, c * (cos_a - cos_b * cos_g) / sin_g, c * v2.sqrt() / sin_g,
        ))
    }

    pub fn basis(&self) -> &Matrix3<f64> {
        &self.basis
    }

    pub fn prune_radius_sq(&self) -> f64 {
        self.prune_radius_sq
    }

    pub fn lattice_vectors(&self) -> [Vector3<f64>; 3] {
        [
            self.basis.row(0).transpose(),
            self.basis.row(1).transpose(),
            self.basis.row(2).transpose(),
        ]
    }

    /// Cartesian translation `n0 * a + n1 * b + n2 * c`.
    pub fn translation(&self, n: [i64; 3]) -> Vector3<f64> {
        self.basis.transpose() * Vector3::new(n[0] as f64, n[1] as f64, n[2] as f64)
    }

    pub fn cell_volume(&self) -> f64 {
        self.basis[(0, 0)] * self.basis[(1, 1)] * self.basis[(2, 2)]
    }
}
