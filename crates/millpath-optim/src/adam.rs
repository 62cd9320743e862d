//! Adam gradient descent.

use millpath_core::linalg::norm;
use millpath_core::{NumericError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Adam hyper-parameters and stopping rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdamOptions {
    pub learning_rate: f64,
    /// Hard cap on iterations
    pub max_iter: usize,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
    /// Stop once the gradient's Euclidean norm drops below this
    pub gradient_tolerance: f64,
}

impl Default for AdamOptions {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            max_iter: 1000,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
            gradient_tolerance: 1e-6,
        }
    }
}

/// Position, moment estimates and step counter of one Adam run
#[derive(Debug, Clone, PartialEq)]
pub struct AdamState {
    pub x: Vec<f64>,
    pub m: Vec<f64>,
    pub v: Vec<f64>,
    pub t: u32,
}

impl AdamState {
    pub fn new(x0: &[f64]) -> Self {
        Self {
            x: x0.to_vec(),
            m: vec![0.0; x0.len()],
            v: vec![0.0; x0.len()],
            t: 0,
        }
    }

    /// Apply one bias-corrected Adam update for `gradient`.
    pub fn step(&mut self, gradient: &[f64], options: &AdamOptions) -> Result<()> {
        if gradient.len() != self.x.len() {
            return Err(NumericError::dimension(
                "adam step",
                format!("gradient of length {}", self.x.len()),
                format!("length {}", gradient.len()),
            ));
        }
        self.t += 1;
        let bias1 = 1.0 - options.beta1.powi(self.t as i32);
        let bias2 = 1.0 - options.beta2.powi(self.t as i32);

        for (i, &g) in gradient.iter().enumerate() {
            self.m[i] = options.beta1 * self.m[i] + (1.0 - options.beta1) * g;
            self.v[i] = options.beta2 * self.v[i] + (1.0 - options.beta2) * g * g;
            let m_hat = self.m[i] / bias1;
            let v_hat = self.v[i] / bias2;
            self.x[i] -= options.learning_rate * m_hat / (v_hat.sqrt() + options.epsilon);
        }
        Ok(())
    }
}

/// Outcome of an Adam run
#[derive(Debug, Clone, PartialEq)]
pub struct AdamResult {
    pub x: Vec<f64>,
    /// Objective at `x`
    pub value: f64,
    pub iterations: usize,
    /// True when the gradient norm fell below the tolerance before the cap
    pub converged: bool,
}

/// Minimize `f` from `x0` with the given learning rate and iteration cap.
pub fn adam_optimize<F, G>(
    f: F,
    gradient: G,
    x0: &[f64],
    learning_rate: f64,
    max_iter: usize,
) -> Result<AdamResult>
where
    F: Fn(&[f64]) -> f64,
    G: Fn(&[f64]) -> Vec<f64>,
{
    let options = AdamOptions {
        learning_rate,
        max_iter,
        ..Default::default()
    };
    adam_optimize_with(f, gradient, x0, &options)
}

/// Minimize `f` from `x0`.
///
/// Fails only when `gradient` returns a vector of the wrong length.
pub fn adam_optimize_with<F, G>(
    f: F,
    gradient: G,
    x0: &[f64],
    options: &AdamOptions,
) -> Result<AdamResult>
where
    F: Fn(&[f64]) -> f64,
    G: Fn(&[f64]) -> Vec<f64>,
{
    let mut state = AdamState::new(x0);
    let mut iterations = 0;
    let mut converged = false;

    while iterations < options.max_iter {
        let g = gradient(&state.x);
        if norm(&g) < options.gradient_tolerance {
            converged = true;
            break;
        }
        state.step(&g, options)?;
        iterations += 1;
    }
    if !converged {
        converged = norm(&gradient(&state.x)) < options.gradient_tolerance;
    }

    let value = f(&state.x);
    debug!(
        "Adam finished after {} iterations (converged: {}, value: {})",
        iterations, converged, value
    );
    Ok(AdamResult {
        x: state.x,
        value,
        iterations,
        converged,
    })
}
