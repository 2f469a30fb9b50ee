//! Periodic boundary wrapping library
//!
//! This library maps Cartesian points onto their minimum image in an arbitrary (triclinic)
//! 3D periodic cell by solving the closest lattice vector problem for a lower-triangular basis.

pub mod config;
pub mod interfaces;
pub mod lattice;

/// Common result type used throughout the library
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
