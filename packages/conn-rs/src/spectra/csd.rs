//! Cross-spectral density from tapered spectra

use ndarray::{Array1, Array2};
use rustfft::num_complex::Complex64;

use super::taper::WindowType;
use super::tapered::TaperedSpectra;
use crate::error::Result;

/// Cross-spectral density of a seed channel against a channel subset
#[derive(Debug, Clone)]
pub struct CsdData {
    /// `indices.len() × freq_bins.len()`, row `i` is seed against `indices[i]`
    pub csd: Array2<Complex64>,
    pub freq_bins: Array1<f64>,
    pub seed: usize,
    pub indices: Vec<usize>,
    pub method: WindowType,
}

/// Compute the CSD of `seed` against every channel in `indices` (all channels when empty).
///
/// Uses the same taper-weight normalisation and half-spectrum doubling as the PSD, so
/// the seed against itself reproduces its PSD with zero phase.
pub fn csd_from_tapered_spectra(
    spectra: &TaperedSpectra,
    seed: usize,
    indices: &[usize],
) -> Result<CsdData> {
    spectra.check_index(seed)?;
    let indices = spectra.resolve_indices(indices)?;
    let denom = spectra.weight_normalization()?;
    let num_bins = spectra.num_freq_bins();

    let seed_spectra = weighted(spectra, seed);

    let mut csd = Array2::<Complex64>::zeros((indices.len(), num_bins));
    for (mut row, &target) in csd.rows_mut().into_iter().zip(indices.iter()) {
        let target_spectra = weighted(spectra, target);
        let taper_pairs = seed_spectra.rows().into_iter().zip(target_spectra.rows());
        for (seed_taper, target_taper) in taper_pairs {
            for ((out, s), t) in row.iter_mut().zip(seed_taper.iter()).zip(target_taper.iter()) {
                *out += s * t.conj();
            }
        }
        for (k, out) in row.iter_mut().enumerate() {
            *out *= spectra.half_spectrum_factor(k) / denom;
        }
    }

    Ok(CsdData {
        csd,
        freq_bins: spectra.freq_bins.clone(),
        seed,
        indices,
        method: spectra.method,
    })
}

/// CSD of every channel (as seed) against all channels
pub fn csd_all_pairs(spectra: &TaperedSpectra) -> Result<Vec<CsdData>> {
    log::debug!(
        "[SPECTRA] CSD for all {} × {} channel pairs",
        spectra.num_channels(),
        spectra.num_channels()
    );
    (0..spectra.num_channels())
        .map(|seed| csd_from_tapered_spectra(spectra, seed, &[]))
        .collect()
}

/// Tapered spectra of `channel` with each taper row scaled by its weight
fn weighted(spectra: &TaperedSpectra, channel: usize) -> Array2<Complex64> {
    let mut out = spectra.data[channel].clone();
    for (mut row, weight) in out.rows_mut().into_iter().zip(spectra.taper_weights.iter()) {
        row.mapv_inplace(|v| v * weight);
    }
    out
}
