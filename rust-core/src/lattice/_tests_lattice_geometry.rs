#[cfg(test)]
mod _tests_lattice_geometry {
    use super::super::lattice_geometry::{prune_radius_sq, LatticeGeometry};
    use approx::assert_relative_eq;
    use nalgebra::{Matrix3, Vector3};
    use std::f64::consts::PI;

    const TOL: f64 = 1e-10;

    // Close-packed (rhombohedral 60°) cell with unit edges
    fn close_packed() -> Matrix3<f64> {
        Matrix3::new(
            1.0, 0.0, 0.0,
            0.5, 0.8660254, 0.0,
            0.5, 0.28867513, 0.81649658,
        )
    }

    #[test]
    fn test_prune_radius_close_packed() {
        // Three unit lattice vectors
        let radius = prune_radius_sq(&close_packed());
        assert_relative_eq!(radius, 3.0, epsilon = 1e-7);
    }

    #[test]
    fn test_prune_radius_ignores_upper_triangle() {
        let mut m = Matrix3::from_diagonal(&Vector3::new(1.0, 2.0, 3.0));
        m[(0, 1)] = 100.0;
        m[(0, 2)] = -50.0;
        m[(1, 2)] = 7.0;
        assert_relative_eq!(prune_radius_sq(&m), 14.0);
    }

    #[test]
    fn test_prune_radius_covers_every_lattice_vector() {
        let geometry = LatticeGeometry::from_matrix(close_packed()).unwrap();
        for v in geometry.lattice_vectors() {
            assert!(v.norm_squared() <= geometry.prune_radius_sq());
        }
    }

    #[test]
    fn test_from_rows_matches_from_matrix() {
        let from_rows = LatticeGeometry::from_rows([
            [1.0, 0.0, 0.0],
            [0.5, 0.8660254, 0.0],
            [0.5, 0.28867513, 0.81649658],
        ])
        .unwrap();
        let from_matrix = LatticeGeometry::from_matrix(close_packed()).unwrap();
        assert_eq!(from_rows, from_matrix);
        assert_eq!(from_rows.basis()[(1, 0)], 0.5);
        assert_eq!(from_rows.basis()[(0, 1)], 0.0);
    }

    #[test]
    fn test_rejects_upper_triangle() {
        let mut m = close_packed();
        m[(0, 2)] = 0.3;
        let err = LatticeGeometry::from_matrix(m).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("lower triangular"), "unexpected message: {}", msg);
        assert!(msg.contains("Lattice vector 0"), "unexpected message: {}", msg);
    }

    #[test]
    fn test_accepts_upper_triangle_noise_below_tolerance() {
        let mut m = close_packed();
        m[(1, 2)] = 1e-13;
        let geometry = LatticeGeometry::from_matrix(m).unwrap();
        assert_eq!(geometry.basis()[(1, 2)], 0.0);
    }

    #[test]
    fn test_rejects_non_positive_diagonal() {
        let mut zero = close_packed();
        zero[(1, 1)] = 0.0;
        assert!(LatticeGeometry::from_matrix(zero).is_err());

        let mut negative = close_packed();
        negative[(2, 2)] = -0.8;
        let err = LatticeGeometry::from_matrix(negative).unwrap_err();
        assert!(err.to_string().contains("Lattice vector 2"));
    }

    #[test]
    fn test_rejects_non_finite_entries() {
        let mut m = close_packed();
        m[(2, 0)] = f64::NAN;
        assert!(LatticeGeometry::from_matrix(m).is_err());
    }

    #[test]
    fn test_lenient_drops_upper_triangle() {
        let mut m = close_packed();
        m[(0, 1)] = 4.0;
        m[(1, 2)] = -2.0;
        let geometry = LatticeGeometry::from_matrix_lenient(m).unwrap();
        assert_eq!(geometry.basis(), &close_packed());
        assert_relative_eq!(geometry.prune_radius_sq(), 3.0, epsilon = 1e-7);
    }

    #[test]
    fn test_lenient_still_requires_positive_diagonal() {
        let mut m = close_packed();
        m[(0, 0)] = -1.0;
        assert!(LatticeGeometry::from_matrix_lenient(m).is_err());
    }

    #[test]
    fn test_cell_parameters_orthorhombic() {
        let geometry =
            LatticeGeometry::from_cell_parameters(2.0, 3.0, 4.0, PI / 2.0, PI / 2.0, PI / 2.0)
                .unwrap();
        let expected = Matrix3::from_diagonal(&Vector3::new(2.0, 3.0, 4.0));
        assert!((geometry.basis() - expected).abs().max() < TOL);
        assert_relative_eq!(geometry.cell_volume(), 24.0, epsilon = TOL);
    }

    #[test]
    fn test_cell_parameters_close_packed() {
        let geometry =
            LatticeGeometry::from_cell_parameters(1.0, 1.0, 1.0, PI / 3.0, PI / 3.0, PI / 3.0)
                .unwrap();
        assert!((geometry.basis() - close_packed()).abs().max() < 1e-7);
        for v in geometry.lattice_vectors() {
            assert_relative_eq!(v.norm(), 1.0, epsilon = TOL);
        }
    }

    #[test]
    fn test_cell_parameters_rejects_bad_input() {
        assert!(LatticeGeometry::from_cell_parameters(-1.0, 1.0, 1.0, 1.5, 1.5, 1.5).is_err());
        assert!(LatticeGeometry::from_cell_parameters(1.0, 1.0, 1.0, 1.5, 1.5, 0.0).is_err());

        // Three 150° angles cannot close a cell
        let obtuse = 5.0 * PI / 6.0;
        assert!(LatticeGeometry::from_cell_parameters(1.0, 1.0, 1.0, obtuse, obtuse, obtuse).is_err());
    }

    #[test]
    fn test_translation() {
        let geometry = LatticeGeometry::from_matrix(close_packed()).unwrap();
        let t = geometry.translation([1, -2, 3]);
        let [a, b, c] = geometry.lattice_vectors();
        let expected: Vector3<f64> = a - 2.0 * b + 3.0 * c;
        assert_relative_eq!(t, expected, epsilon = TOL);
    }
}
