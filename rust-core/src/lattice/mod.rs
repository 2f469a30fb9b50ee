// Lattice module: Triangular lattice geometry and the nearest lattice point search
// This module maps Cartesian points onto their minimum image in a periodic triclinic cell

// ======================== MODULE DECLARATIONS ========================
pub mod lattice_geometry;
pub mod nearest_lattice_search;
pub mod wrap_request;

// Test modules
mod _tests_lattice_geometry;

// ======================== LATTICE GEOMETRY ========================
pub use lattice_geometry::{
    LatticeGeometry,                // struct - lower-triangular basis (rows are lattice vectors) with its pruning radius
    prune_radius_sq,                // fn(basis: &Matrix3<f64>) -> f64 - sum of squares of the entries on/below the diagonal
};
// LatticeGeometry impl methods:
//   from_lattice_vectors(a, b, c) -> Result<Self>            - checked construction from three row vectors
//   from_rows(rows: [[f64; 3]; 3]) -> Result<Self>           - checked construction from plain arrays
//   from_matrix(matrix: Matrix3<f64>) -> Result<Self>        - rejects upper-triangle entries and non-positive diagonal
//   from_matrix_lenient(matrix: Matrix3<f64>) -> Result<Self> - drops upper-triangle entries with a warning
//   from_cell_parameters(a, b, c, alpha, beta, gamma) -> Result<Self> - standard triclinic cell from lengths/angles
//   basis(&self) -> &Matrix3<f64>                            - the triangular basis
//   prune_radius_sq(&self) -> f64                            - initial squared search radius
//   lattice_vectors(&self) -> [Vector3<f64>; 3]              - rows as vectors
//   translation(&self, n: [i64; 3]) -> Vector3<f64>          - n0 a + n1 b + n2 c
//   cell_volume(&self) -> f64                                - product of the diagonal
//   wrap(&self, point) -> Vector3<f64>                       - minimum image of a point
//   wrap_in_place(&self, &mut point) -> [i64; 3]             - in-place wrap, returns subtracted coefficients
//   image_of(&self, &point) -> [i64; 3]                      - nearest lattice coefficients

// ======================== NEAREST LATTICE SEARCH ========================
pub use nearest_lattice_search::{
    decode,                         // fn(basis, prune_radius_sq, point: &mut Vector3<f64>) -> [i64; 3] - in-place minimum image
    minimum_image_displacement,     // fn(geometry, from, to) -> Vector3<f64> - shortest periodic vector from -> to
    minimum_image_distance,         // fn(geometry, from, to) -> f64 - length of the above
    nearest_lattice_coefficients,   // fn(basis, prune_radius_sq, point) -> [i64; 3] - pruned closest lattice vector search
    wrap_points,                    // fn(geometry, points: &mut [Vector3<f64>]) - sequential batch wrap
};

#[cfg(feature = "parallel")]
pub use nearest_lattice_search::wrap_points_par; // fn(geometry, points) - rayon batch wrap

// ======================== BOUNDARY REQUESTS ========================
pub use wrap_request::{
    WrapRequest,                    // struct - unvalidated cell/origin/coordinates as handed over by a caller
    WrapResponse,                   // struct - wrapped coordinates
};
