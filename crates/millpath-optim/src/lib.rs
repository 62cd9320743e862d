//! # Millpath Optim
//!
//! Small numerical optimization and estimation toolkit used to tune toolpath
//! parameters:
//!
//! - **Adam**: bias-corrected gradient descent with a convergence flag
//! - **Interior point**: log-barrier solver for small linear programs
//! - **Kalman**: linear and extended Kalman filter steps
//! - **Riccati**: discrete algebraic Riccati iteration and LQR gains

pub mod adam;
pub mod interior_point;
pub mod kalman;
pub mod riccati;

pub use adam::{adam_optimize, adam_optimize_with, AdamOptions, AdamResult, AdamState};
pub use interior_point::{InteriorPointOptions, InteriorPointResult};
pub use kalman::{ExtendedKalmanFilter, KalmanState, KalmanUpdate};
pub use riccati::{
    compute_gain, discrete_lqr_gain, solve_riccati, solve_riccati_with, RiccatiOptions,
    RiccatiSolution,
};
