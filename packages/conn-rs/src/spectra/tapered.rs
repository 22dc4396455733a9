//! Tapered forward transforms returning the non-redundant half-spectrum

use ndarray::{Array1, Array2, ArrayView1};
use rustfft::{num_complex::Complex64, FftPlanner};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

use super::taper::{generate_window, TaperSet, WindowType};
use crate::error::{ConnError, Result};
use crate::profile_scope;

// Thread-local FFT planner so repeated transforms of one length reuse the plan
thread_local! {
    static FFT_PLANNER: RefCell<FftPlanner<f64>> = RefCell::new(FftPlanner::new());
}

/// Largest transform length accepted (2^26 points)
pub const MAX_NFFT: usize = 1 << 26;

/// Run `f` with this thread's FFT planner
pub(crate) fn with_fft_planner<R>(f: impl FnOnce(&mut FftPlanner<f64>) -> R) -> R {
    FFT_PLANNER.with(|planner| f(&mut planner.borrow_mut()))
}

/// Options for [`compute_tapered_spectra`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectraOptions {
    /// Window applied to every channel (unknown names resolve to hanning)
    #[serde(default)]
    pub window: WindowType,

    /// Requested FFT length; raised to the signal length when smaller
    #[serde(default)]
    pub nfft: Option<usize>,

    /// Pad the FFT length to the next power of two >= 2 * nfft - 1
    #[serde(default = "default_true")]
    pub zero_pad: bool,

    /// Subtract each channel's mean before tapering
    #[serde(default = "default_true")]
    pub remove_mean: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SpectraOptions {
    fn default() -> Self {
        Self {
            window: WindowType::Hanning,
            nfft: None,
            zero_pad: true,
            remove_mean: true,
        }
    }
}

impl SpectraOptions {
    /// Options for an unpadded transform of exactly the signal length
    pub fn unpadded(window: WindowType) -> Self {
        Self {
            window,
            zero_pad: false,
            ..Default::default()
        }
    }
}

/// Tapered half-spectra of every channel plus the metadata shared by all of them
#[derive(Debug, Clone)]
pub struct TaperedSpectra {
    /// One `num_tapers × num_freq_bins` matrix per input channel, in input order
    pub data: Vec<Array2<Complex64>>,
    pub freq_bins: Array1<f64>,
    pub taper_weights: Vec<Complex64>,
    /// Window actually used; an unknown request is recorded as hanning
    pub method: WindowType,
    pub sampling_frequency: f64,
    pub mean_removed: bool,
    pub signal_length: usize,
    pub nfft: usize,
}

impl TaperedSpectra {
    pub fn num_channels(&self) -> usize {
        self.data.len()
    }

    pub fn num_tapers(&self) -> usize {
        self.taper_weights.len()
    }

    pub fn num_freq_bins(&self) -> usize {
        self.freq_bins.len()
    }

    /// Channel indices to process: `indices` itself, or every channel when empty
    pub(crate) fn resolve_indices(&self, indices: &[usize]) -> Result<Vec<usize>> {
        if indices.is_empty() {
            return Ok((0..self.num_channels()).collect());
        }
        for &index in indices {
            self.check_index(index)?;
        }
        Ok(indices.to_vec())
    }

    pub(crate) fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.num_channels() {
            return Err(ConnError::ChannelOutOfRange {
                index,
                num_channels: self.num_channels(),
            });
        }
        Ok(())
    }

    /// Sum of squared taper-weight magnitudes used to normalise PSD/CSD
    pub(crate) fn weight_normalization(&self) -> Result<f64> {
        let denom: f64 = self.taper_weights.iter().map(|w| w.norm_sqr()).sum();
        if denom <= 0.0 || !denom.is_finite() {
            return Err(ConnError::InvalidParameter(
                "Taper weights must have non-zero energy".to_string(),
            ));
        }
        Ok(denom)
    }

    /// Factor applied to bin `k` to restore the energy of the discarded negative half.
    ///
    /// DC is never doubled; the Nyquist bin (last bin of an even-length FFT) isn't either.
    pub(crate) fn half_spectrum_factor(&self, k: usize) -> f64 {
        let last = self.num_freq_bins() - 1;
        if k == 0 || (self.nfft % 2 == 0 && k == last) {
            1.0
        } else {
            2.0
        }
    }
}

/// Resolve the transform length for a signal of `signal_length` samples.
///
/// Fails when the length is zero or the (padded) length exceeds [`MAX_NFFT`].
pub fn resolve_nfft(
    signal_length: usize,
    requested: Option<usize>,
    zero_pad: bool,
) -> Result<usize> {
    let base = requested.unwrap_or(signal_length).max(signal_length);
    if base == 0 {
        return Err(ConnError::InvalidParameter(
            "FFT length must be positive".to_string(),
        ));
    }

    let nfft = if zero_pad {
        base.checked_mul(2)
            .and_then(|n| (n - 1).checked_next_power_of_two())
            .ok_or_else(|| nfft_too_large(base))?
    } else {
        base
    };
    if nfft > MAX_NFFT {
        return Err(nfft_too_large(nfft));
    }
    Ok(nfft)
}

fn nfft_too_large(nfft: usize) -> ConnError {
    ConnError::InvalidParameter(format!(
        "FFT length {} exceeds the maximum of {}",
        nfft, MAX_NFFT
    ))
}

/// Frequencies (Hz) of the half-spectrum bins for an `nfft`-point transform.
///
/// Even `nfft` ends at Nyquist (`fs / 2`); odd `nfft` ends one half-bin below it.
pub fn fft_frequencies(nfft: usize, sampling_frequency: f64) -> Array1<f64> {
    let resolution = sampling_frequency / nfft as f64;
    Array1::from_shape_fn(nfft / 2 + 1, |k| k as f64 * resolution)
}

/// Compute tapered half-spectra of every channel (row) of `data`.
///
/// # Arguments
/// * `data` - Channel × sample matrix
/// * `sampling_frequency` - Sampling frequency in Hz
/// * `options` - Window, FFT length, zero padding and mean removal
///
/// # Returns
/// TaperedSpectra holding one taper × frequency matrix per channel
pub fn compute_tapered_spectra(
    data: &Array2<f64>,
    sampling_frequency: f64,
    options: &SpectraOptions,
) -> Result<TaperedSpectra> {
    profile_scope!("compute_tapered_spectra");

    if !(sampling_frequency.is_finite() && sampling_frequency > 0.0) {
        return Err(ConnError::InvalidParameter(format!(
            "Sampling frequency must be positive, got {}",
            sampling_frequency
        )));
    }

    let signal_length = data.ncols();
    validate_signal_length(signal_length)?;

    let input = if options.remove_mean {
        remove_channel_means(data)
    } else {
        data.clone()
    };

    let tapers = generate_window(signal_length, options.window)?;
    let nfft = resolve_nfft(signal_length, options.nfft, options.zero_pad)?;

    log::debug!(
        "[SPECTRA] {} channels × {} samples, window={}, nfft={}, mean_removed={}",
        data.nrows(),
        signal_length,
        options.window,
        nfft,
        options.remove_mean
    );

    let spectra = transform_channels(&input, &tapers, nfft);

    Ok(TaperedSpectra {
        data: spectra,
        freq_bins: fft_frequencies(nfft, sampling_frequency),
        taper_weights: tapers.weights().to_vec(),
        method: options.window,
        sampling_frequency,
        mean_removed: options.remove_mean,
        signal_length,
        nfft,
    })
}

/// Compute tapered half-spectra with a caller-supplied taper set.
///
/// No mean removal is applied; `nfft` must be at least the signal length.
pub fn compute_tapered_spectra_with_tapers(
    data: &Array2<f64>,
    tapers: &TaperSet,
    nfft: usize,
) -> Result<Vec<Array2<Complex64>>> {
    let signal_length = data.ncols();
    validate_signal_length(signal_length)?;

    if tapers.signal_length() != signal_length {
        return Err(ConnError::ShapeMismatch(format!(
            "Taper length {} does not match channel length {}",
            tapers.signal_length(),
            signal_length
        )));
    }
    if nfft < signal_length {
        return Err(ConnError::InvalidParameter(format!(
            "FFT length {} is shorter than the signal length {}",
            nfft, signal_length
        )));
    }
    if nfft > MAX_NFFT {
        return Err(nfft_too_large(nfft));
    }

    Ok(transform_channels(data, tapers, nfft))
}

fn validate_signal_length(signal_length: usize) -> Result<()> {
    if signal_length < 2 {
        return Err(ConnError::InvalidParameter(format!(
            "Channels need at least 2 samples, got {}",
            signal_length
        )));
    }
    Ok(())
}

fn remove_channel_means(data: &Array2<f64>) -> Array2<f64> {
    let mut centered = data.clone();
    for mut row in centered.rows_mut() {
        let mean = row.mean().unwrap_or(0.0);
        row.mapv_inplace(|x| x - mean);
    }
    centered
}

fn transform_channels(
    data: &Array2<f64>,
    tapers: &TaperSet,
    nfft: usize,
) -> Vec<Array2<Complex64>> {
    let num_bins = nfft / 2 + 1;

    with_fft_planner(|planner| {
        let fft = planner.plan_fft_forward(nfft);
        let mut buffer = vec![Complex64::new(0.0, 0.0); nfft];

        data.rows()
            .into_iter()
            .map(|channel| {
                let mut spectra = Array2::<Complex64>::zeros((tapers.num_tapers(), num_bins));
                for (taper, mut out) in tapers.tapers().rows().into_iter().zip(spectra.rows_mut()) {
                    fill_tapered(&mut buffer, channel, taper);
                    fft.process(&mut buffer);
                    for (dst, src) in out.iter_mut().zip(buffer.iter()) {
                        *dst = *src;
                    }
                }
                spectra
            })
            .collect()
    })
}

/// Write `channel ⊙ taper` into the front of `buffer` and zero the padding
fn fill_tapered(buffer: &mut [Complex64], channel: ArrayView1<f64>, taper: ArrayView1<f64>) {
    buffer.fill(Complex64::new(0.0, 0.0));
    for ((dst, &x), &w) in buffer.iter_mut().zip(channel.iter()).zip(taper.iter()) {
        *dst = Complex64::new(x * w, 0.0);
    }
}
