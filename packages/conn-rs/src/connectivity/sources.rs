//! Collaborators that supply sensor and source-space data
//!
//! File readers, forward clustering and the minimum-norm solver live outside
//! this crate; they plug in through these traits. A collaborator signals
//! "nothing available" either with an error or with an empty value.

use std::path::Path;

use crate::error::Result;
use crate::types::{
    AnnotationSet, CovarianceRegularization, Evoked, ForwardSolution, InverseParameters,
    MeasurementInfo, NoiseCovariance, SourceEstimate,
};

/// Loads averaged sensor recordings
pub trait SensorDataSource: Send + Sync {
    fn load_evoked(&self, measurement: &Path, ave_index: usize) -> Result<Evoked>;
}

/// Loads forward solutions and reduces them to cluster centroids
pub trait ForwardModelSource: Send + Sync {
    fn load_forward(&self, forward: &Path) -> Result<ForwardSolution>;

    fn load_annotation_set(
        &self,
        subject: &str,
        subjects_dir: &Path,
        annot_type: &str,
    ) -> Result<AnnotationSet>;

    /// Returned source spaces must fill `centroid_vertno`
    fn cluster_forward(
        &self,
        forward: &ForwardSolution,
        annotations: &AnnotationSet,
        cluster_size: usize,
    ) -> Result<ForwardSolution>;
}

/// Loads and regularizes noise covariance matrices
pub trait NoiseCovarianceSource: Send + Sync {
    fn load_covariance(&self, covariance: &Path) -> Result<NoiseCovariance>;

    fn regularize(
        &self,
        covariance: &NoiseCovariance,
        info: &MeasurementInfo,
        params: &CovarianceRegularization,
    ) -> Result<NoiseCovariance>;
}

/// Builds an inverse operator and applies it to evoked data
pub trait MinimumNormSolver: Send + Sync {
    /// Returns an empty estimate when the inputs are insufficient
    fn apply_inverse(
        &self,
        evoked: &Evoked,
        forward: &ForwardSolution,
        covariance: &NoiseCovariance,
        params: &InverseParameters,
    ) -> Result<SourceEstimate>;
}

/// Collaborators needed for source-level connectivity
#[derive(Clone, Copy)]
pub struct SourceSpaceSources<'a> {
    pub forward: &'a dyn ForwardModelSource,
    pub covariance: &'a dyn NoiseCovarianceSource,
    pub inverse: &'a dyn MinimumNormSolver,
}

/// Every collaborator a [`Connectivity`](super::Connectivity) computation may call
#[derive(Clone, Copy)]
pub struct DataSources<'a> {
    pub sensors: &'a dyn SensorDataSource,
    /// Only required when source localization is requested
    pub source_space: Option<SourceSpaceSources<'a>>,
}

impl<'a> DataSources<'a> {
    pub fn sensor_only(sensors: &'a dyn SensorDataSource) -> Self {
        Self {
            sensors,
            source_space: None,
        }
    }

    pub fn with_source_space(
        sensors: &'a dyn SensorDataSource,
        source_space: SourceSpaceSources<'a>,
    ) -> Self {
        Self {
            sensors,
            source_space: Some(source_space),
        }
    }
}
