//! Frequency-domain surface defect analysis.
//!
//! A sampled surface profile (height readings at a fixed spacing along a
//! pass) is transformed with [`fft_real`]; periodic defects such as chatter
//! marks or feed-per-tooth scallops show up as spectral peaks.

use crate::fft::{fft_real, magnitude_spectrum};
use millpath_core::{NumericError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A spectral bin whose magnitude exceeded the threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    pub freq_index: usize,
    pub magnitude: f64,
}

/// Bins with `magnitude > threshold`, in index order.
///
/// Single forward pass over `spectrum`; the iterator is not restartable.
pub fn find_peaks_above(spectrum: &[f64], threshold: f64) -> impl Iterator<Item = Peak> + '_ {
    spectrum
        .iter()
        .enumerate()
        .filter(move |(_, &magnitude)| magnitude > threshold)
        .map(|(freq_index, &magnitude)| Peak {
            freq_index,
            magnitude,
        })
}

/// A periodic defect found in a surface profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceDefect {
    /// FFT bin of the defect
    pub freq_index: usize,
    /// Spatial frequency (cycles/mm)
    pub frequency: f64,
    /// Spatial period (mm)
    pub wavelength: f64,
    /// Estimated peak height of the sinusoidal component (same units as the profile)
    pub amplitude: f64,
}

/// Result of analyzing one profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefectReport {
    /// Defects sorted by descending amplitude
    pub defects: Vec<SurfaceDefect>,
    /// Mean profile height removed before the transform
    pub mean_height: f64,
}

impl DefectReport {
    /// The strongest defect, if any.
    pub fn dominant(&self) -> Option<&SurfaceDefect> {
        self.defects.first()
    }
}

/// Finds periodic components in evenly spaced surface height samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceDefectAnalyzer {
    /// Distance between consecutive samples (mm)
    pub sample_spacing: f64,
    /// Minimum amplitude reported as a defect
    pub amplitude_threshold: f64,
}

impl SurfaceDefectAnalyzer {
    /// Create a new analyzer
    pub fn new(sample_spacing: f64, amplitude_threshold: f64) -> Self {
        Self {
            sample_spacing,
            amplitude_threshold,
        }
    }

    /// Analyze a profile whose length is a power of two.
    ///
    /// The mean is removed first so the DC bin never reports a defect, and
    /// only bins `1..n/2` are inspected since the upper half mirrors them for
    /// real input. Amplitudes are scaled by `2/n`.
    pub fn analyze(&self, profile: &[f64]) -> Result<DefectReport> {
        if !(self.sample_spacing.is_finite() && self.sample_spacing > 0.0) {
            return Err(NumericError::parameter(
                "sample_spacing",
                "must be positive and finite",
            ));
        }

        let n = profile.len();
        let mean_height = if n > 0 {
            profile.iter().sum::<f64>() / n as f64
        } else {
            0.0
        };
        let centered: Vec<f64> = profile.iter().map(|h| h - mean_height).collect();
        let spectrum = magnitude_spectrum(&fft_real(&centered)?);

        let scale = 2.0 / n as f64;
        let amplitudes: Vec<f64> = spectrum[..n / 2].iter().map(|m| m * scale).collect();

        let span = n as f64 * self.sample_spacing;
        let mut defects: Vec<SurfaceDefect> = find_peaks_above(&amplitudes, self.amplitude_threshold)
            .filter(|peak| peak.freq_index > 0)
            .map(|peak| {
                let frequency = peak.freq_index as f64 / span;
                SurfaceDefect {
                    freq_index: peak.freq_index,
                    frequency,
                    wavelength: 1.0 / frequency,
                    amplitude: peak.magnitude,
                }
            })
            .collect();
        defects.sort_by(|a, b| b.amplitude.total_cmp(&a.amplitude));

        debug!(
            "Surface analysis of {} samples found {} defects",
            n,
            defects.len()
        );

        Ok(DefectReport {
            defects,
            mean_height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_peaks_above_is_strict() {
        let spectrum = [0.5, 2.0, 1.0, 3.0];
        let peaks: Vec<Peak> = find_peaks_above(&spectrum, 1.0).collect();
        assert_eq!(
            peaks,
            vec![
                Peak {
                    freq_index: 1,
                    magnitude: 2.0
                },
                Peak {
                    freq_index: 3,
                    magnitude: 3.0
                },
            ]
        );
    }

    #[test]
    fn test_find_peaks_empty_input() {
        assert_eq!(find_peaks_above(&[], 0.0).count(), 0);
    }

    #[test]
    fn test_analyzer_rejects_bad_spacing() {
        let analyzer = SurfaceDefectAnalyzer::new(0.0, 0.1);
        assert!(analyzer.analyze(&[0.0; 8]).is_err());
    }
}
