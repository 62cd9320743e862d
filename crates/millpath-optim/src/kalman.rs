//! Kalman filter predict/update steps and an extended Kalman filter.
//!
//! States are immutable: every step returns a new [`KalmanState`].

use millpath_core::linalg::{add, identity, invert, mat_mul, mat_vec, sub, transpose};
use millpath_core::{Matrix, NumericError, Result};
use tracing::trace;

/// Mean estimate and covariance
#[derive(Debug, Clone, PartialEq)]
pub struct KalmanState {
    pub x: Vec<f64>,
    pub p: Matrix,
}

impl KalmanState {
    pub fn new(x: Vec<f64>, p: Matrix) -> Result<Self> {
        if !p.is_square() || p.rows() != x.len() {
            return Err(NumericError::dimension(
                "kalman state",
                format!("{0}x{0} covariance", x.len()),
                format!("{}x{}", p.rows(), p.cols()),
            ));
        }
        Ok(Self { x, p })
    }

    pub fn dim(&self) -> usize {
        self.x.len()
    }
}

/// Result of a measurement update
#[derive(Debug, Clone, PartialEq)]
pub struct KalmanUpdate {
    pub state: KalmanState,
    /// `z - H x` before the update
    pub innovation: Vec<f64>,
    pub gain: Matrix,
}

/// Propagate through the linear model: `{F x, F P Fᵀ + Q}`.
pub fn predict(state: &KalmanState, f: &Matrix, q: &Matrix) -> Result<KalmanState> {
    let x = mat_vec(f, &state.x)?;
    let p = add(&mat_mul(&mat_mul(f, &state.p)?, &transpose(f))?, q)?;
    Ok(KalmanState { x, p })
}

/// Measurement update with the standard covariance form `(I - K H) P`.
///
/// Fails with `SingularMatrix` when the innovation covariance cannot be
/// inverted.
pub fn update(state: &KalmanState, z: &[f64], h: &Matrix, r: &Matrix) -> Result<KalmanUpdate> {
    let predicted = mat_vec(h, &state.x)?;
    correct(state, z, &predicted, h, r, CovarianceForm::Standard)
}

/// Measurement update with the Joseph form
/// `(I - K H) P (I - K H)ᵀ + K R Kᵀ`, which keeps `P` symmetric positive
/// semi-definite under rounding.
pub fn update_joseph(
    state: &KalmanState,
    z: &[f64],
    h: &Matrix,
    r: &Matrix,
) -> Result<KalmanUpdate> {
    let predicted = mat_vec(h, &state.x)?;
    correct(state, z, &predicted, h, r, CovarianceForm::Joseph)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CovarianceForm {
    Standard,
    Joseph,
}

/// Shared correction given the predicted measurement and its Jacobian.
fn correct(
    state: &KalmanState,
    z: &[f64],
    predicted: &[f64],
    h: &Matrix,
    r: &Matrix,
    form: CovarianceForm,
) -> Result<KalmanUpdate> {
    if z.len() != predicted.len() {
        return Err(NumericError::dimension(
            "kalman update",
            format!("measurement of length {}", predicted.len()),
            format!("length {}", z.len()),
        ));
    }
    let innovation: Vec<f64> = z.iter().zip(predicted).map(|(zi, hi)| zi - hi).collect();

    let ht = transpose(h);
    let pht = mat_mul(&state.p, &ht)?;
    let s = add(&mat_mul(h, &pht)?, r)?;
    let gain = mat_mul(&pht, &invert(&s)?)?;

    let correction = mat_vec(&gain, &innovation)?;
    let x: Vec<f64> = state.x.iter().zip(&correction).map(|(a, b)| a + b).collect();

    let i_kh = sub(&identity(state.dim())?, &mat_mul(&gain, h)?)?;
    let p = match form {
        CovarianceForm::Standard => mat_mul(&i_kh, &state.p)?,
        CovarianceForm::Joseph => {
            let kept = mat_mul(&mat_mul(&i_kh, &state.p)?, &transpose(&i_kh))?;
            let noise = mat_mul(&mat_mul(&gain, r)?, &transpose(&gain))?;
            add(&kept, &noise)?
        }
    };

    trace!("Kalman update: innovation {:?}", innovation);
    Ok(KalmanUpdate {
        state: KalmanState { x, p },
        innovation,
        gain,
    })
}

/// Extended Kalman filter over nonlinear process and measurement models.
///
/// `f`/`h` map a state to the next state and to a predicted measurement;
/// the Jacobians are evaluated at the current estimate.
pub struct ExtendedKalmanFilter<F, FJ, H, HJ>
where
    F: Fn(&[f64]) -> Vec<f64>,
    FJ: Fn(&[f64]) -> Matrix,
    H: Fn(&[f64]) -> Vec<f64>,
    HJ: Fn(&[f64]) -> Matrix,
{
    pub process: F,
    pub process_jacobian: FJ,
    pub measurement: H,
    pub measurement_jacobian: HJ,
    /// Process noise covariance
    pub q: Matrix,
    /// Measurement noise covariance
    pub r: Matrix,
}

impl<F, FJ, H, HJ> ExtendedKalmanFilter<F, FJ, H, HJ>
where
    F: Fn(&[f64]) -> Vec<f64>,
    FJ: Fn(&[f64]) -> Matrix,
    H: Fn(&[f64]) -> Vec<f64>,
    HJ: Fn(&[f64]) -> Matrix,
{
    /// `{f(x), F P Fᵀ + Q}` with `F` the process Jacobian at `x`.
    pub fn predict(&self, state: &KalmanState) -> Result<KalmanState> {
        let jacobian = (self.process_jacobian)(&state.x);
        let x = (self.process)(&state.x);
        if x.len() != state.dim() {
            return Err(NumericError::dimension(
                "ekf predict",
                format!("state of length {}", state.dim()),
                format!("length {}", x.len()),
            ));
        }
        let p = add(
            &mat_mul(&mat_mul(&jacobian, &state.p)?, &transpose(&jacobian))?,
            &self.q,
        )?;
        Ok(KalmanState { x, p })
    }

    /// Correct with measurement `z`; the innovation is `z - h(x)`.
    pub fn update(&self, state: &KalmanState, z: &[f64]) -> Result<KalmanUpdate> {
        let predicted = (self.measurement)(&state.x);
        let jacobian = (self.measurement_jacobian)(&state.x);
        correct(state, z, &predicted, &jacobian, &self.r, CovarianceForm::Standard)
    }

    /// Predict then update.
    pub fn step(&self, state: &KalmanState, z: &[f64]) -> Result<KalmanUpdate> {
        let predicted = self.predict(state)?;
        self.update(&predicted, z)
    }
}
