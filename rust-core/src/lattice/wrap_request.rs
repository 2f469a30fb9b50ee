use anyhow::{anyhow, bail, Error};
use log::{debug, info};
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::interfaces::TriangularCheck;
use crate::lattice::lattice_geometry::LatticeGeometry;

/// A batch of coordinates to wrap into the cell spanned by `cell`.
///
/// Shapes are unchecked until [`WrapRequest::execute`], which rejects malformed arguments with a
/// message naming the offending one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrapRequest {
    /// Three lattice vectors, lower triangular
    pub cell: Vec<Vec<f64>>,
    /// Center of the wrapped cell
    #[serde(default = "default_origin")]
    pub origin: Vec<f64>,
    pub coordinates: Vec<Vec<f64>>,
    /// Drop entries above the diagonal instead of rejecting them
    #[serde(default)]
    pub lenient: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrapResponse {
    pub coordinates: Vec<[f64; 3]>,
}

fn default_origin() -> Vec<f64> {
    vec![0.0; 3]
}

fn parse_vec(name: &str, values: &[f64]) -> Result<Vector3<f64>, Error> {
    if values.len() != 3 {
        bail!("{} must be 3D", name);
    }
    Ok(Vector3::new(values[0], values[1], values[2]))
}

impl WrapRequest {
    pub fn new(cell: Vec<Vec<f64>>, origin: Vec<f64>, coordinates: Vec<Vec<f64>>) -> Self {
        WrapRequest {
            cell,
            origin,
            coordinates,
            lenient: false,
        }
    }

    /// Validated lattice geometry described by `cell`.
    pub fn geometry(&self) -> Result<LatticeGeometry, Error> {
        if self.cell.len() != 3 {
            bail!("3 lattice vectors required");
        }
        let mut rows = Vec::with_capacity(3);
        for vector in &self.cell {
            rows.push(parse_vec("lattice vectors", vector)?.transpose());
        }
        LatticeGeometry::with_check(
            Matrix3::from_rows(&rows[..]),
            TriangularCheck::from_lenient_flag(self.lenient),
        )
    }

    /// Checks every argument, then wraps all coordinates about `origin`.
    pub fn execute(&self) -> Result<WrapResponse, Error> {
        // Origin first, then cell, then coordinates
        let origin = parse_vec("origin", &self.origin)?;
        let geometry = self.geometry()?;

        let mut points = self
            .coordinates
            .iter()
            .enumerate()
            .map(|(i, xyz)| {
                parse_vec("coordinates", xyz)
                    .map(|p| p - origin)
                    .map_err(|e| anyhow!("{} (entry {})", e, i))
            })
            .collect::<Result<Vec<_>, Error>>()?;

        debug!("Validated wrap request with {} coordinates", points.len());
        wrap_batch(&geometry, &mut points);

        let coordinates = points
            .into_iter()
            .map(|p| {
                let shifted = p + origin;
                [shifted[0], shifted[1], shifted[2]]
            })
            .collect::<Vec<_>>();
        info!("Wrapped {} coordinates", coordinates.len());

        Ok(WrapResponse { coordinates })
    }
}

#[cfg(feature = "parallel")]
fn wrap_batch(geometry: &LatticeGeometry, points: &mut [Vector3<f64>]) {
    crate::lattice::nearest_lattice_search::wrap_points_par(geometry, points);
}

#[cfg(not(feature = "parallel"))]
fn wrap_batch(geometry: &LatticeGeometry, points: &mut [Vector3<f64>]) {
    crate::lattice::nearest_lattice_search::wrap_points(geometry, points);
}
