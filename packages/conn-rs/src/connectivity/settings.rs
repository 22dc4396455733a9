//! Connectivity request configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConnError, Result};

/// Sensor modality kept during sensor-level acquisition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelType {
    Meg,
    Eeg,
}

/// MEG coil type kept during sensor-level acquisition (ignored for EEG)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoilType {
    Grad,
    Mag,
}

/// Source localization options, used when `do_source_loc` is set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceLocalizationSettings {
    /// Forward solution handle
    #[serde(default)]
    pub forward: PathBuf,

    /// Noise covariance handle
    #[serde(default)]
    pub covariance: PathBuf,

    /// Subject whose annotation set drives clustering
    #[serde(default = "default_subject")]
    pub subject: String,

    /// FreeSurfer subjects directory
    #[serde(default)]
    pub subjects_dir: PathBuf,

    /// Annotation (parcellation) name
    #[serde(default = "default_annot_type")]
    pub annot_type: String,

    /// Reduce the forward solution to cluster centroids before inversion
    #[serde(default = "default_true")]
    pub do_cluster: bool,

    /// Number of sources per cluster
    #[serde(default = "default_cluster_size")]
    pub cluster_size: usize,

    /// Signal-to-noise ratio; the inverse uses lambda^2 = 1 / snr^2
    #[serde(default = "default_snr")]
    pub snr: f64,

    /// Inverse method: "MNE", "dSPM" or "sLORETA"
    #[serde(default = "default_source_loc_method")]
    pub method: String,
}

fn default_subject() -> String {
    "sample".to_string()
}
fn default_annot_type() -> String {
    "aparc.a2009s".to_string()
}
fn default_true() -> bool {
    true
}
fn default_cluster_size() -> usize {
    40
}
fn default_snr() -> f64 {
    1.0
}
fn default_source_loc_method() -> String {
    "dSPM".to_string()
}
fn default_connectivity_method() -> String {
    "COR".to_string()
}
fn default_channel_type() -> ChannelType {
    ChannelType::Meg
}
fn default_coil_type() -> CoilType {
    CoilType::Grad
}

impl Default for SourceLocalizationSettings {
    fn default() -> Self {
        Self {
            forward: PathBuf::new(),
            covariance: PathBuf::new(),
            subject: default_subject(),
            subjects_dir: PathBuf::new(),
            annot_type: default_annot_type(),
            do_cluster: true,
            cluster_size: default_cluster_size(),
            snr: default_snr(),
            method: default_source_loc_method(),
        }
    }
}

/// Complete configuration of one connectivity computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectivitySettings {
    /// Evoked recording handle
    #[serde(default)]
    pub measurement: PathBuf,

    /// Index of the average (evoked set) inside the recording
    #[serde(default)]
    pub ave_index: usize,

    /// Connectivity measure: "COR" or "XCOR"
    #[serde(default = "default_connectivity_method")]
    pub method: String,

    #[serde(default = "default_channel_type")]
    pub channel_type: ChannelType,

    #[serde(default = "default_coil_type")]
    pub coil_type: CoilType,

    /// Drop channels listed as bad in the measurement info
    #[serde(default)]
    pub exclude_bads: bool,

    /// Compute connectivity in source space instead of sensor space
    #[serde(default)]
    pub do_source_loc: bool,

    #[serde(default)]
    pub source: SourceLocalizationSettings,
}

impl Default for ConnectivitySettings {
    fn default() -> Self {
        Self {
            measurement: PathBuf::new(),
            ave_index: 0,
            method: default_connectivity_method(),
            channel_type: default_channel_type(),
            coil_type: default_coil_type(),
            exclude_bads: false,
            do_source_loc: false,
            source: SourceLocalizationSettings::default(),
        }
    }
}

impl ConnectivitySettings {
    /// Sensor-level connectivity over the channels of one type
    pub fn sensor_level(
        measurement: impl Into<PathBuf>,
        method: impl Into<String>,
        channel_type: ChannelType,
        coil_type: CoilType,
    ) -> Self {
        Self {
            measurement: measurement.into(),
            method: method.into(),
            channel_type,
            coil_type,
            ..Default::default()
        }
    }

    /// Source-level connectivity through a minimum-norm inverse
    pub fn source_level(
        measurement: impl Into<PathBuf>,
        method: impl Into<String>,
        source: SourceLocalizationSettings,
    ) -> Self {
        Self {
            measurement: measurement.into(),
            method: method.into(),
            do_source_loc: true,
            source,
            ..Default::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.method.trim().is_empty() {
            return Err(ConnError::InvalidParameter(
                "Connectivity method must not be empty".to_string(),
            ));
        }

        if self.do_source_loc {
            let snr = self.source.snr;
            if !(snr.is_finite() && snr > 0.0) {
                return Err(ConnError::InvalidParameter(format!(
                    "SNR must be positive, got {}",
                    snr
                )));
            }
            if self.source.do_cluster && self.source.cluster_size == 0 {
                return Err(ConnError::InvalidParameter(
                    "Cluster size must be positive".to_string(),
                ));
            }
        }

        Ok(())
    }

}
