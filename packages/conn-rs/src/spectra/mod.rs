//! Spectral Estimation Module
//!
//! Tapered spectral estimates of multichannel recordings:
//! - Hann / rectangular tapers with unit weights
//! - Tapered forward FFT keeping the non-redundant half-spectrum
//! - Power spectral density (PSD) per channel
//! - Cross-spectral density (CSD) between a seed and target channels
//!
//! PSD and CSD keep every frequency bin and double all bins except DC and,
//! for an even FFT length, the Nyquist bin.

mod csd;
mod psd;
mod taper;
mod tapered;

pub use csd::{csd_all_pairs, csd_from_tapered_spectra, CsdData};
pub use psd::{psd_from_tapered_spectra, PsdData};
pub use taper::{generate_window, hanning_window, TaperSet, WindowType};
pub use tapered::{
    compute_tapered_spectra, compute_tapered_spectra_with_tapers, fft_frequencies, resolve_nfft,
    SpectraOptions, TaperedSpectra, MAX_NFFT,
};
pub(crate) use tapered::with_fft_planner;
