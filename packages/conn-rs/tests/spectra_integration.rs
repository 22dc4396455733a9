use conn_rs::spectra::{
    compute_tapered_spectra, csd_all_pairs, csd_from_tapered_spectra, psd_from_tapered_spectra,
    SpectraOptions, WindowType,
};
use ndarray::Array2;
use std::f64::consts::PI;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Four channels of 1 s at 100 Hz: 10, 20 and 30 Hz sines plus an offset ramp
fn recording() -> Array2<f64> {
    Array2::from_shape_fn((4, 100), |(c, t)| {
        let t = t as f64 / 100.0;
        match c {
            0 => (2.0 * PI * 10.0 * t).sin(),
            1 => 0.5 * (2.0 * PI * 20.0 * t).sin() + 3.0,
            2 => (2.0 * PI * 30.0 * t).cos(),
            _ => t,
        }
    })
}

fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::MIN), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
        .0
}

#[test]
fn test_unpadded_hann_psd_end_to_end() {
    init_logger();
    let spectra =
        compute_tapered_spectra(&recording(), 100.0, &SpectraOptions::unpadded(WindowType::Hanning))
            .unwrap();

    assert_eq!(spectra.nfft, 100);
    assert_eq!(spectra.num_channels(), 4);
    assert_eq!(spectra.num_freq_bins(), 51);
    assert!(spectra.mean_removed);
    assert_eq!(spectra.freq_bins[0], 0.0);
    assert!((spectra.freq_bins[50] - 50.0).abs() < 1e-12);

    let psd = psd_from_tapered_spectra(&spectra, &[]).unwrap();
    assert_eq!(psd.psd.dim(), (4, 51));
    assert_eq!(psd.indices, vec![0, 1, 2, 3]);
    assert_eq!(psd.method, WindowType::Hanning);

    assert_eq!(argmax(&psd.psd.row(0).to_vec()), 10);
    assert_eq!(argmax(&psd.psd.row(1).to_vec()), 20);
    assert_eq!(argmax(&psd.psd.row(2).to_vec()), 30);
    // Offset removed before tapering
    assert!(psd.psd[[1, 0]] < 1e-3 * psd.psd[[1, 20]]);
    assert!(psd.psd.iter().all(|&p| p >= 0.0));
}

#[test]
fn test_zero_padded_defaults() {
    init_logger();
    let spectra = compute_tapered_spectra(&recording(), 100.0, &SpectraOptions::default()).unwrap();
    // 2 * 100 - 1 = 199 -> 256
    assert_eq!(spectra.nfft, 256);
    assert_eq!(spectra.num_freq_bins(), 129);
    assert!((spectra.freq_bins[128] - 50.0).abs() < 1e-12);

    let psd = psd_from_tapered_spectra(&spectra, &[0]).unwrap();
    let peak = argmax(&psd.psd.row(0).to_vec());
    assert!((psd.freq_bins[peak] - 10.0).abs() < 0.5);
}

#[test]
fn test_unknown_window_falls_back_to_hanning() {
    let options = SpectraOptions {
        window: WindowType::from_name("slepian"),
        ..SpectraOptions::unpadded(WindowType::Ones)
    };
    let spectra = compute_tapered_spectra(&recording(), 100.0, &options).unwrap();
    assert_eq!(spectra.method, WindowType::Hanning);
}

#[test]
fn test_csd_agrees_with_psd() {
    init_logger();
    let spectra =
        compute_tapered_spectra(&recording(), 100.0, &SpectraOptions::unpadded(WindowType::Ones))
            .unwrap();
    let psd = psd_from_tapered_spectra(&spectra, &[]).unwrap();
    let csd = csd_from_tapered_spectra(&spectra, 2, &[2, 0]).unwrap();

    assert_eq!(csd.seed, 2);
    assert_eq!(csd.csd.dim(), (2, 51));
    for k in 0..51 {
        let auto = csd.csd[[0, k]];
        assert!((auto.re - psd.psd[[2, k]]).abs() <= 1e-9 * (1.0 + psd.psd[[2, k]]));
        assert!(auto.im.abs() < 1e-9);
        // Cauchy-Schwarz per bin
        let cross = csd.csd[[1, k]].norm();
        let bound = (psd.psd[[2, k]] * psd.psd[[0, k]]).sqrt();
        assert!(cross <= bound + 1e-9 * (1.0 + bound));
    }

    let all = csd_all_pairs(&spectra).unwrap();
    assert_eq!(all.len(), 4);
    assert!(all.iter().all(|c| c.csd.dim() == (4, 51)));
}

#[test]
fn test_invalid_inputs() {
    let short = Array2::<f64>::zeros((2, 1));
    assert!(compute_tapered_spectra(&short, 100.0, &SpectraOptions::default()).is_err());
    assert!(compute_tapered_spectra(&recording(), 0.0, &SpectraOptions::default()).is_err());

    let spectra = compute_tapered_spectra(&recording(), 100.0, &SpectraOptions::default()).unwrap();
    assert!(psd_from_tapered_spectra(&spectra, &[4]).is_err());
    assert!(csd_from_tapered_spectra(&spectra, 7, &[]).is_err());
}
