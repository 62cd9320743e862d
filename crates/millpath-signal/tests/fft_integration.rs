use millpath_signal::{fft, fft_real, ifft, magnitude_spectrum, ComplexSample, SurfaceDefectAnalyzer};
use proptest::prelude::*;
use std::f64::consts::PI;

#[test]
fn test_impulse_magnitudes_are_unity() {
    let spectrum = fft_real(&[1.0, 0.0, 0.0, 0.0]).unwrap();
    let magnitudes = magnitude_spectrum(&spectrum);

    assert_eq!(magnitudes.len(), 4);
    assert!(magnitudes.iter().all(|m| (m - 1.0).abs() < 1e-12));
}

#[test]
fn test_single_tone_lands_in_its_bin() {
    let n = 32;
    let samples: Vec<f64> = (0..n)
        .map(|i| (2.0 * PI * 3.0 * i as f64 / n as f64).cos())
        .collect();
    let magnitudes = magnitude_spectrum(&fft_real(&samples).unwrap());

    assert!((magnitudes[3] - n as f64 / 2.0).abs() < 1e-9);
    assert!((magnitudes[n - 3] - n as f64 / 2.0).abs() < 1e-9);
    for (k, m) in magnitudes.iter().enumerate() {
        if k != 3 && k != n - 3 {
            assert!(*m < 1e-9, "bin {k} leaked {m}");
        }
    }
}

#[test]
fn test_analyzer_finds_chatter_frequencies() {
    let n = 64;
    let profile: Vec<f64> = (0..n)
        .map(|i| {
            let phase = 2.0 * PI * i as f64 / n as f64;
            1.0 + 0.2 * (4.0 * phase).sin() + 0.05 * (10.0 * phase).sin()
        })
        .collect();

    let report = SurfaceDefectAnalyzer::new(0.5, 0.02).analyze(&profile).unwrap();

    assert!((report.mean_height - 1.0).abs() < 1e-12);
    assert_eq!(report.defects.len(), 2);
    let dominant = report.dominant().unwrap();
    assert_eq!(dominant.freq_index, 4);
    assert!((dominant.amplitude - 0.2).abs() < 1e-9);
    assert!((dominant.frequency - 0.125).abs() < 1e-12);
    assert!((dominant.wavelength - 8.0).abs() < 1e-9);
    assert_eq!(report.defects[1].freq_index, 10);
}

#[test]
fn test_flat_profile_has_no_defects() {
    let report = SurfaceDefectAnalyzer::new(1.0, 1e-6)
        .analyze(&[3.0; 16])
        .unwrap();
    assert!(report.defects.is_empty());
    assert!(report.dominant().is_none());
}

fn signal(len_log2: u32) -> impl Strategy<Value = Vec<ComplexSample>> {
    prop::collection::vec((-10.0f64..10.0, -10.0f64..10.0), 1usize << len_log2)
        .prop_map(|pairs| pairs.into_iter().map(|(re, im)| ComplexSample::new(re, im)).collect())
}

proptest! {
    #[test]
    fn prop_fft_ifft_round_trip(input in (0u32..8).prop_flat_map(signal)) {
        let restored = ifft(&fft(&input).unwrap()).unwrap();
        prop_assert_eq!(restored.len(), input.len());
        for (a, b) in restored.iter().zip(&input) {
            prop_assert!((a - b).norm() < 1e-9);
        }
    }

    #[test]
    fn prop_parseval(input in (1u32..7).prop_flat_map(signal)) {
        let n = input.len() as f64;
        let time_energy: f64 = input.iter().map(|c| c.norm_sqr()).sum();
        let freq_energy: f64 = fft(&input).unwrap().iter().map(|c| c.norm_sqr()).sum::<f64>() / n;
        prop_assert!((time_energy - freq_energy).abs() < 1e-6 * time_energy.max(1.0));
    }
}
