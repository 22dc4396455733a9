use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// FIFF unit code for volts (EEG electrodes)
pub const FIFF_UNIT_V: i32 = 107;
/// FIFF unit code for tesla (magnetometers)
pub const FIFF_UNIT_T: i32 = 112;
/// FIFF unit code for tesla per metre (planar gradiometers)
pub const FIFF_UNIT_T_M: i32 = 201;

/// Per-channel description from the measurement info
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub name: String,
    /// FIFF unit code of the channel
    pub unit: i32,
    /// Sensor location (r0) in head coordinates, metres
    pub position: [f32; 3],
}

/// Measurement info shared by evoked data, covariance and inverse computations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementInfo {
    pub channels: Vec<ChannelInfo>,
    #[serde(default)]
    pub bads: Vec<String>,
    pub sampling_frequency: f64,
}

/// Averaged sensor data: `channels × samples`
#[derive(Debug, Clone, Default)]
pub struct Evoked {
    pub info: MeasurementInfo,
    pub data: Array2<f64>,
}

impl Evoked {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() || self.info.channels.is_empty()
    }
}

/// One hemisphere of a source space
#[derive(Debug, Clone, Default)]
pub struct SourceSpace {
    /// Coordinates of every vertex of the surface (`n_vertices × 3`)
    pub rr: Array2<f32>,
    /// Vertices in use as sources
    pub vertno: Vec<usize>,
    /// Centroid vertex of each cluster (filled in by clustering)
    pub centroid_vertno: Vec<usize>,
}

/// Forward solution: gain matrix plus the left and right hemisphere source spaces
#[derive(Debug, Clone, Default)]
pub struct ForwardSolution {
    /// `sensors × sources` gain matrix consumed by the inverse solver
    pub gain: Array2<f64>,
    /// Left hemisphere first, then right
    pub hemispheres: Vec<SourceSpace>,
}

impl ForwardSolution {
    pub fn is_empty(&self) -> bool {
        self.hemispheres.iter().all(|h| h.vertno.is_empty())
    }
}

/// Anatomical annotation of a subject's surfaces, consumed by forward clustering
#[derive(Debug, Clone, Default)]
pub struct AnnotationSet {
    pub subject: String,
    pub annot_type: String,
    /// Label id of every vertex, one vector per hemisphere
    pub labels: Vec<Vec<i32>>,
}

/// Noise covariance matrix over the named channels
#[derive(Debug, Clone, Default)]
pub struct NoiseCovariance {
    pub names: Vec<String>,
    pub data: Array2<f64>,
}

impl NoiseCovariance {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Shrinkage factors for noise covariance regularization
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CovarianceRegularization {
    pub mag: f64,
    pub grad: f64,
    pub eeg: f64,
    pub proj: bool,
}

impl Default for CovarianceRegularization {
    fn default() -> Self {
        Self {
            mag: 0.05,
            grad: 0.05,
            eeg: 0.1,
            proj: true,
        }
    }
}

/// Parameters for building and applying a minimum-norm inverse operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InverseParameters {
    /// Loose orientation constraint
    pub loose: f32,
    /// Depth weighting exponent
    pub depth: f32,
    /// Regularization parameter, 1 / SNR^2
    pub lambda2: f64,
    /// "MNE", "dSPM" or "sLORETA"
    pub method: String,
}

impl InverseParameters {
    pub fn from_snr(snr: f64, method: impl Into<String>) -> Self {
        Self {
            loose: 0.2,
            depth: 0.8,
            lambda2: 1.0 / snr.powi(2),
            method: method.into(),
        }
    }
}

/// Source estimate: `sources × samples`
#[derive(Debug, Clone, Default)]
pub struct SourceEstimate {
    pub data: Array2<f64>,
    pub tmin: f32,
    pub tstep: f32,
}

impl SourceEstimate {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_parameters_from_snr() {
        let params = InverseParameters::from_snr(3.0, "dSPM");
        assert!((params.lambda2 - 1.0 / 9.0).abs() < 1e-12);
        assert_eq!(params.loose, 0.2);
        assert_eq!(params.depth, 0.8);
    }

    #[test]
    fn test_empty_defaults() {
        assert!(Evoked::default().is_empty());
        assert!(ForwardSolution::default().is_empty());
        assert!(NoiseCovariance::default().is_empty());
        assert!(SourceEstimate::default().is_empty());
    }
}
