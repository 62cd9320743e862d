use millpath_core::linalg::{identity, invert, mat_mul, max_abs_diff, transpose};
use millpath_core::Matrix;
use proptest::prelude::*;

fn square_matrix(n: usize) -> impl Strategy<Value = Matrix> {
    prop::collection::vec(-100.0f64..100.0, n * n)
        .prop_map(move |data| Matrix::from_row_slice(n, n, &data).unwrap())
}

/// Diagonally dominant matrices are always well conditioned enough to invert.
fn well_conditioned(n: usize) -> impl Strategy<Value = Matrix> {
    prop::collection::vec(-1.0f64..1.0, n * n).prop_map(move |data| {
        let mut m = Matrix::from_row_slice(n, n, &data).unwrap();
        for i in 0..n {
            m[(i, i)] += n as f64 + 1.0;
        }
        m
    })
}

#[test]
fn test_inverse_round_trip_example() {
    let a = Matrix::from_rows(&[vec![4.0, 7.0], vec![2.0, 6.0]]).unwrap();
    let inv = invert(&a).unwrap();
    let product = mat_mul(&a, &inv).unwrap();
    assert!(max_abs_diff(&product, &identity(2).unwrap()).unwrap() < 1e-8);

    // Known closed form: 1/10 * [[6, -7], [-2, 4]]
    assert!((inv[(0, 0)] - 0.6).abs() < 1e-12);
    assert!((inv[(0, 1)] + 0.7).abs() < 1e-12);
    assert!((inv[(1, 0)] + 0.2).abs() < 1e-12);
    assert!((inv[(1, 1)] - 0.4).abs() < 1e-12);
}

proptest! {
    #[test]
    fn prop_identity_right_multiplication(a in square_matrix(4)) {
        let product = mat_mul(&a, &identity(4).unwrap()).unwrap();
        prop_assert!(max_abs_diff(&product, &a).unwrap() < 1e-9);
    }

    #[test]
    fn prop_inverse_round_trip(a in well_conditioned(5)) {
        let inv = invert(&a).unwrap();
        let product = mat_mul(&a, &inv).unwrap();
        prop_assert!(max_abs_diff(&product, &identity(5).unwrap()).unwrap() < 1e-8);
    }

    #[test]
    fn prop_double_transpose(a in square_matrix(3)) {
        prop_assert_eq!(transpose(&transpose(&a)), a);
    }
}
