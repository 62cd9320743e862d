use millpath_core::Point3;
use millpath_geometry::nurbs::{basis_functions, clamped_uniform_knots, find_span};
use millpath_geometry::{evaluate_curve, evaluate_surface, NurbsCurve, NurbsSurface};
use proptest::prelude::*;

#[test]
fn test_non_uniform_knots_partition_of_unity() {
    let knots = [0.0, 0.0, 0.0, 0.2, 0.2, 0.7, 1.0, 1.0, 1.0];
    for i in 0..=20 {
        let t = i as f64 / 20.0;
        let values = basis_functions(&knots, t, 2, 6).unwrap();
        let sum: f64 = values.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12, "sum at {t} = {sum}");
    }
    // Double knot at 0.2: the curve interpolates the middle control point.
    let values = basis_functions(&knots, 0.2, 2, 6).unwrap();
    assert!((values[2] - 1.0).abs() < 1e-12);
    assert_eq!(find_span(&knots, 2, 6, 0.2), 4);
}

#[test]
fn test_weight_one_matches_bspline() {
    let points = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 3.0, 0.0),
        Point3::new(4.0, 3.0, 2.0),
        Point3::new(5.0, 0.0, 2.0),
    ];
    let knots = clamped_uniform_knots(4, 3).unwrap();
    let plain = NurbsCurve::new(points.clone(), None, 3, knots.clone()).unwrap();
    let weighted = NurbsCurve::new(points, Some(vec![1.0; 4]), 3, knots).unwrap();
    for i in 0..=8 {
        let t = i as f64 / 8.0;
        assert!(evaluate_curve(&plain, t).distance_to(&evaluate_curve(&weighted, t)) < 1e-12);
    }
}

#[test]
fn test_biquadratic_surface_corners_interpolate() {
    let net: Vec<Vec<Point3>> = (0..3)
        .map(|i| {
            (0..3)
                .map(|j| Point3::new(i as f64, j as f64, ((i + j) % 2) as f64))
                .collect()
        })
        .collect();
    let knots = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
    let surface = NurbsSurface::new(net.clone(), None, 2, 2, knots.clone(), knots).unwrap();
    assert!(evaluate_surface(&surface, 0.0, 0.0).distance_to(&net[0][0]) < 1e-12);
    assert!(evaluate_surface(&surface, 1.0, 0.0).distance_to(&net[2][0]) < 1e-12);
    assert!(evaluate_surface(&surface, 1.0, 1.0).distance_to(&net[2][2]) < 1e-12);
}

proptest! {
    #[test]
    fn prop_basis_partition_of_unity(
        degree in 1usize..5,
        extra in 0usize..8,
        t in 0.0f64..=1.0,
    ) {
        let n = degree + 1 + extra;
        let knots = clamped_uniform_knots(n, degree).unwrap();
        let values = basis_functions(&knots, t, degree, n).unwrap();
        prop_assert_eq!(values.len(), n);
        prop_assert!(values.iter().all(|&v| v >= -1e-12));
        let sum: f64 = values.iter().sum();
        prop_assert!((sum - 1.0).abs() < 1e-9);
        // At most degree + 1 functions are non-zero.
        prop_assert!(values.iter().filter(|v| v.abs() > 1e-15).count() <= degree + 1);
    }

    #[test]
    fn prop_curve_stays_in_control_hull_box(
        ys in prop::collection::vec(-10.0f64..10.0, 4..8),
        t in 0.0f64..=1.0,
    ) {
        let points: Vec<Point3> = ys
            .iter()
            .enumerate()
            .map(|(i, &y)| Point3::new(i as f64, y, 0.0))
            .collect();
        let curve = NurbsCurve::clamped_uniform(points, 3).unwrap();
        let p = evaluate_curve(&curve, t);
        let lo = ys.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = ys.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(p.y >= lo - 1e-9 && p.y <= hi + 1e-9);
    }
}
