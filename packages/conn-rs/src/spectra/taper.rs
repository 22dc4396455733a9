//! Window functions (tapers) applied before the forward transform

use ndarray::Array2;
use rustfft::num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::{ConnError, Result};

/// Window type used to taper each channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum WindowType {
    #[default]
    Hanning,
    Ones,
}

impl WindowType {
    /// Resolve a window name. Unknown names fall back to `hanning`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "hanning" => Self::Hanning,
            "ones" => Self::Ones,
            other => {
                log::debug!(
                    "[SPECTRA] Unknown window type '{}', falling back to hanning",
                    other
                );
                Self::Hanning
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hanning => "hanning",
            Self::Ones => "ones",
        }
    }
}

impl From<String> for WindowType {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl std::fmt::Display for WindowType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Taper rows (one per taper, each `signal_length` long) with their weights
#[derive(Debug, Clone)]
pub struct TaperSet {
    tapers: Array2<f64>,
    weights: Vec<Complex64>,
}

impl TaperSet {
    pub fn new(tapers: Array2<f64>, weights: Vec<Complex64>) -> Result<Self> {
        if tapers.nrows() != weights.len() {
            return Err(ConnError::ShapeMismatch(format!(
                "{} taper rows but {} taper weights",
                tapers.nrows(),
                weights.len()
            )));
        }
        if tapers.nrows() == 0 {
            return Err(ConnError::InvalidParameter(
                "Taper set must contain at least one taper".to_string(),
            ));
        }
        Ok(Self { tapers, weights })
    }

    pub fn tapers(&self) -> &Array2<f64> {
        &self.tapers
    }

    pub fn weights(&self) -> &[Complex64] {
        &self.weights
    }

    pub fn num_tapers(&self) -> usize {
        self.tapers.nrows()
    }

    pub fn signal_length(&self) -> usize {
        self.tapers.ncols()
    }
}

/// Generate the taper set for `window` over `signal_length` samples.
///
/// Both supported windows produce a single taper with unit weight.
pub fn generate_window(signal_length: usize, window: WindowType) -> Result<TaperSet> {
    if signal_length == 0 {
        return Err(ConnError::InvalidParameter(
            "Signal length must be positive".to_string(),
        ));
    }

    let tapers = match window {
        WindowType::Hanning => hanning_window(signal_length),
        WindowType::Ones => Array2::ones((1, signal_length)),
    };

    TaperSet::new(tapers, vec![Complex64::new(1.0, 0.0)])
}

/// Symmetric Hann window as a `1 × signal_length` matrix.
///
/// A single-sample window is `[1.0]`.
pub fn hanning_window(signal_length: usize) -> Array2<f64> {
    if signal_length == 1 {
        return Array2::ones((1, 1));
    }

    let denom = signal_length as f64 - 1.0;
    Array2::from_shape_fn((1, signal_length), |(_, n)| {
        0.5 - 0.5 * (2.0 * PI * n as f64 / denom).cos()
    })
}
