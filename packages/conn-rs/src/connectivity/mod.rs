//! Connectivity Module
//!
//! Builds connectivity networks from evoked recordings:
//! - Sensor-level acquisition filtered by channel and coil type
//! - Source-level acquisition through forward model, noise covariance and a
//!   minimum-norm inverse supplied by [`sources`] collaborators
//! - Correlation ("COR") and cross-correlation ("XCOR") measures

mod acquisition;
mod measures;
mod orchestrator;
mod settings;
pub mod sources;

pub use acquisition::{
    acquire_sensor_level, acquire_source_level, pick_sensor_channels, AcquiredData,
};
pub use measures::{cross_correlation, pearson_correlation, ConnectivityMethod};
pub use orchestrator::Connectivity;
pub use settings::{ChannelType, CoilType, ConnectivitySettings, SourceLocalizationSettings};
pub use sources::{
    DataSources, ForwardModelSource, MinimumNormSolver, NoiseCovarianceSource, SensorDataSource,
    SourceSpaceSources,
};
