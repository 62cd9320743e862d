//! Radix-2 Cooley-Tukey FFT.
//!
//! Input lengths must be a power of two; anything else is rejected with
//! [`NumericError::InvalidInputLength`] rather than padded.

use millpath_core::{NumericError, Result};
use nalgebra::Complex;
use std::f64::consts::PI;

/// One complex sample `{re, im}`.
pub type ComplexSample = Complex<f64>;

fn check_length(len: usize) -> Result<()> {
    if len == 0 || !len.is_power_of_two() {
        return Err(NumericError::InvalidInputLength {
            len,
            reason: "FFT length must be a non-zero power of two".to_string(),
        });
    }
    Ok(())
}

/// Forward transform with twiddles `e^{-2πik/n}`.
pub fn fft(signal: &[ComplexSample]) -> Result<Vec<ComplexSample>> {
    check_length(signal.len())?;
    Ok(transform(signal))
}

/// Inverse transform, scaled by `1/n` so that `ifft(fft(x)) == x`.
pub fn ifft(spectrum: &[ComplexSample]) -> Result<Vec<ComplexSample>> {
    check_length(spectrum.len())?;
    let n = spectrum.len() as f64;
    let conjugated: Vec<ComplexSample> = spectrum.iter().map(|c| c.conj()).collect();
    Ok(transform(&conjugated)
        .into_iter()
        .map(|c| c.conj() / n)
        .collect())
}

/// Forward transform of a real-valued signal.
pub fn fft_real(samples: &[f64]) -> Result<Vec<ComplexSample>> {
    let signal: Vec<ComplexSample> = samples.iter().map(|&re| Complex::new(re, 0.0)).collect();
    fft(&signal)
}

/// `sqrt(re² + im²)` for every bin.
pub fn magnitude_spectrum(spectrum: &[ComplexSample]) -> Vec<f64> {
    spectrum.iter().map(|c| c.norm()).collect()
}

fn transform(signal: &[ComplexSample]) -> Vec<ComplexSample> {
    let n = signal.len();
    if n == 1 {
        return signal.to_vec();
    }

    let even: Vec<ComplexSample> = signal.iter().step_by(2).copied().collect();
    let odd: Vec<ComplexSample> = signal.iter().skip(1).step_by(2).copied().collect();
    let even = transform(&even);
    let odd = transform(&odd);

    let half = n / 2;
    let mut out = vec![Complex::new(0.0, 0.0); n];
    for k in 0..half {
        let twiddle = Complex::from_polar(1.0, -2.0 * PI * k as f64 / n as f64) * odd[k];
        out[k] = even[k] + twiddle;
        out[k + half] = even[k] - twiddle;
    }
    out
}
