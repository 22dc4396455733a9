//! Power spectral density from tapered spectra

use ndarray::{Array1, Array2};

use super::taper::WindowType;
use super::tapered::TaperedSpectra;
use crate::error::Result;

/// Power spectral density of a channel subset
#[derive(Debug, Clone)]
pub struct PsdData {
    /// `indices.len() × freq_bins.len()`, rows in the order of `indices`
    pub psd: Array2<f64>,
    pub freq_bins: Array1<f64>,
    pub indices: Vec<usize>,
    pub method: WindowType,
}

/// Compute the PSD of the channels in `indices` (all channels when empty).
///
/// Power is averaged over tapers with the squared taper weights as normalisation,
/// then doubled for every bin except DC and, for an even FFT length, Nyquist.
/// The output keeps every frequency bin.
pub fn psd_from_tapered_spectra(spectra: &TaperedSpectra, indices: &[usize]) -> Result<PsdData> {
    let indices = spectra.resolve_indices(indices)?;
    let denom = spectra.weight_normalization()?;
    let num_bins = spectra.num_freq_bins();

    let mut psd = Array2::<f64>::zeros((indices.len(), num_bins));
    for (mut row, &channel) in psd.rows_mut().into_iter().zip(indices.iter()) {
        let tapered = &spectra.data[channel];
        for (taper, weight) in tapered.rows().into_iter().zip(spectra.taper_weights.iter()) {
            for (out, value) in row.iter_mut().zip(taper.iter()) {
                *out += (weight * value).norm_sqr();
            }
        }
        for (k, out) in row.iter_mut().enumerate() {
            *out *= spectra.half_spectrum_factor(k) / denom;
        }
    }

    log::debug!(
        "[SPECTRA] PSD for {} channels × {} bins",
        indices.len(),
        num_bins
    );

    Ok(PsdData {
        psd,
        freq_bins: spectra.freq_bins.clone(),
        indices,
        method: spectra.method,
    })
}
