use millpath_core::roots::{solve, solve_with};
use millpath_core::NewtonOptions;

#[test]
fn test_square_root_of_two() {
    let result = solve(|x| x * x - 2.0, |x| 2.0 * x, 1.5);

    assert!(result.converged);
    assert!(result.iterations < 10);
    assert!((result.x - std::f64::consts::SQRT_2).abs() < 1e-8);
}

#[test]
fn test_custom_tolerance() {
    let options = NewtonOptions {
        tolerance: 1e-3,
        max_iter: 50,
    };
    let loose = solve_with(|x| x.cos() - x, |x| -x.sin() - 1.0, 1.0, &options);
    let tight = solve(|x| x.cos() - x, |x| -x.sin() - 1.0, 1.0);

    assert!(loose.converged && tight.converged);
    assert!(loose.iterations <= tight.iterations);
    assert!((tight.x - 0.739_085_133_2).abs() < 1e-8);
}
