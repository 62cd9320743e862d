//! # Millpath Signal
//!
//! Signal processing for Millpath:
//!
//! - **FFT**: recursive radix-2 Cooley-Tukey forward/inverse transforms
//! - **Spectrum**: magnitude spectra, peak filtering and the surface defect analyzer

pub mod fft;
pub mod spectrum;

pub use fft::{fft, fft_real, ifft, magnitude_spectrum, ComplexSample};
pub use spectrum::{find_peaks_above, DefectReport, Peak, SurfaceDefect, SurfaceDefectAnalyzer};
