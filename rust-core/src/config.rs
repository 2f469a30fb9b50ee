// Constants

// Tolerances
pub const BASE_VECTOR_TOLERANCE: f64 = 1e-10; // Smallest admissible diagonal entry of a basis
pub const TRIANGULAR_TOLERANCE: f64 = 1e-10; // Largest admissible entry above the diagonal

// Batching
pub const PARALLEL_MIN_POINTS: usize = 4096; // Below this, parallel wrapping runs sequentially
