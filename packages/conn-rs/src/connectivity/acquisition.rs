//! Sensor-level and source-level data acquisition
//!
//! Both paths produce a data matrix and a node-position matrix whose rows
//! correspond one to one.

use ndarray::{Array2, Axis};

use super::settings::{ChannelType, CoilType, ConnectivitySettings};
use super::sources::{SensorDataSource, SourceSpaceSources};
use crate::error::{ConnError, Result};
use crate::types::{
    ChannelInfo, CovarianceRegularization, Evoked, ForwardSolution, InverseParameters, SourceSpace,
    FIFF_UNIT_T, FIFF_UNIT_T_M, FIFF_UNIT_V,
};

/// Data matrix (`nodes × samples`) with one 3-D position per node
#[derive(Debug, Clone)]
pub struct AcquiredData {
    pub data: Array2<f64>,
    pub node_positions: Array2<f32>,
}

impl AcquiredData {
    pub fn num_nodes(&self) -> usize {
        self.data.nrows()
    }
}

fn unit_matches(unit: i32, channel_type: ChannelType, coil_type: CoilType) -> bool {
    match (channel_type, coil_type) {
        (ChannelType::Meg, CoilType::Grad) => unit == FIFF_UNIT_T_M,
        (ChannelType::Meg, CoilType::Mag) => unit == FIFF_UNIT_T,
        (ChannelType::Eeg, _) => unit == FIFF_UNIT_V,
    }
}

/// Indices of the channels whose unit matches the requested channel and coil type.
///
/// Order follows `channels`. Channels named in `bads` are skipped.
pub fn pick_sensor_channels(
    channels: &[ChannelInfo],
    channel_type: ChannelType,
    coil_type: CoilType,
    bads: &[String],
) -> Vec<usize> {
    channels
        .iter()
        .enumerate()
        .filter(|(_, ch)| unit_matches(ch.unit, channel_type, coil_type))
        .filter(|(_, ch)| !bads.contains(&ch.name))
        .map(|(i, _)| i)
        .collect()
}

/// Load evoked data and keep the channels matching the settings' channel filter.
///
/// Returns `Ok(None)` when no evoked data is available or no channel matches.
pub fn acquire_sensor_level(
    settings: &ConnectivitySettings,
    sensors: &dyn SensorDataSource,
) -> Result<Option<AcquiredData>> {
    let Some(evoked) = load_evoked(settings, sensors) else {
        return Ok(None);
    };

    if evoked.data.nrows() != evoked.info.channels.len() {
        return Err(ConnError::ShapeMismatch(format!(
            "Evoked data has {} rows but {} channels",
            evoked.data.nrows(),
            evoked.info.channels.len()
        )));
    }

    let bads: &[String] = if settings.exclude_bads {
        &evoked.info.bads
    } else {
        &[]
    };
    let picks = pick_sensor_channels(
        &evoked.info.channels,
        settings.channel_type,
        settings.coil_type,
        bads,
    );

    if picks.is_empty() {
        log::warn!(
            "[CONN] No channels match channel type {:?} / coil type {:?}",
            settings.channel_type,
            settings.coil_type
        );
        return Ok(None);
    }

    let data = evoked.data.select(Axis(0), &picks);
    let mut node_positions = Array2::<f32>::zeros((picks.len(), 3));
    for (mut row, &i) in node_positions.rows_mut().into_iter().zip(picks.iter()) {
        let position = evoked.info.channels[i].position;
        row[0] = position[0];
        row[1] = position[1];
        row[2] = position[2];
    }

    log::info!(
        "[CONN] Sensor level: picked {} of {} channels",
        picks.len(),
        evoked.info.channels.len()
    );

    Ok(Some(AcquiredData {
        data,
        node_positions,
    }))
}

/// Reconstruct source activity with a minimum-norm inverse.
///
/// Nodes are the cluster centroids (clustered) or the used vertices, left
/// hemisphere first. Returns `Ok(None)` when evoked data, forward solution or
/// source estimate is empty.
pub fn acquire_source_level(
    settings: &ConnectivitySettings,
    sensors: &dyn SensorDataSource,
    collaborators: &SourceSpaceSources<'_>,
) -> Result<Option<AcquiredData>> {
    let source = &settings.source;

    let Some(evoked) = load_evoked(settings, sensors) else {
        return Ok(None);
    };

    let forward = match collaborators.forward.load_forward(&source.forward) {
        Ok(fwd) if !fwd.is_empty() => fwd,
        Ok(_) => {
            log::warn!("[CONN] Forward solution {:?} is empty", source.forward);
            return Ok(None);
        }
        Err(e) => {
            log::warn!("[CONN] Failed to load forward solution {:?}: {}", source.forward, e);
            return Ok(None);
        }
    };

    let noise_cov = collaborators.covariance.load_covariance(&source.covariance)?;
    let noise_cov = collaborators.covariance.regularize(
        &noise_cov,
        &evoked.info,
        &CovarianceRegularization::default(),
    )?;

    let forward = if source.do_cluster {
        let annotations = collaborators.forward.load_annotation_set(
            &source.subject,
            &source.subjects_dir,
            &source.annot_type,
        )?;
        log::info!(
            "[CONN] Clustering forward solution with {} ({} sources per cluster)",
            source.annot_type,
            source.cluster_size
        );
        collaborators
            .forward
            .cluster_forward(&forward, &annotations, source.cluster_size)?
    } else {
        forward
    };

    let params = InverseParameters::from_snr(source.snr, source.method.clone());
    log::info!(
        "[CONN] Applying {} inverse (lambda2 = {:.4})",
        params.method,
        params.lambda2
    );
    let estimate = collaborators
        .inverse
        .apply_inverse(&evoked, &forward, &noise_cov, &params)?;

    if estimate.is_empty() {
        log::warn!("[CONN] Source estimate is empty");
        return Ok(None);
    }

    let node_positions = source_node_positions(&forward, source.do_cluster)?;
    if node_positions.nrows() != estimate.data.nrows() {
        return Err(ConnError::ShapeMismatch(format!(
            "Source estimate has {} rows but the source space has {} nodes",
            estimate.data.nrows(),
            node_positions.nrows()
        )));
    }

    log::info!("[CONN] Source level: {} nodes", node_positions.nrows());

    Ok(Some(AcquiredData {
        data: estimate.data,
        node_positions,
    }))
}

fn load_evoked(settings: &ConnectivitySettings, sensors: &dyn SensorDataSource) -> Option<Evoked> {
    match sensors.load_evoked(&settings.measurement, settings.ave_index) {
        Ok(evoked) if !evoked.is_empty() => Some(evoked),
        Ok(_) => {
            log::warn!(
                "[CONN] Evoked set {} of {:?} is empty",
                settings.ave_index,
                settings.measurement
            );
            None
        }
        Err(e) => {
            log::warn!(
                "[CONN] Failed to load evoked set {} of {:?}: {}",
                settings.ave_index,
                settings.measurement,
                e
            );
            None
        }
    }
}

/// Stack node coordinates of every hemisphere, left first
fn source_node_positions(forward: &ForwardSolution, clustered: bool) -> Result<Array2<f32>> {
    let mut rows: Vec<[f32; 3]> = Vec::new();
    for hemisphere in &forward.hemispheres {
        let vertices = if clustered {
            &hemisphere.centroid_vertno
        } else {
            &hemisphere.vertno
        };
        for &vertex in vertices {
            rows.push(vertex_position(hemisphere, vertex)?);
        }
    }

    let mut positions = Array2::<f32>::zeros((rows.len(), 3));
    for (mut row, position) in positions.rows_mut().into_iter().zip(rows.iter()) {
        row[0] = position[0];
        row[1] = position[1];
        row[2] = position[2];
    }
    Ok(positions)
}

fn vertex_position(hemisphere: &SourceSpace, vertex: usize) -> Result<[f32; 3]> {
    if vertex >= hemisphere.rr.nrows() || hemisphere.rr.ncols() < 3 {
        return Err(ConnError::ShapeMismatch(format!(
            "Vertex {} outside source space with {} vertices",
            vertex,
            hemisphere.rr.nrows()
        )));
    }
    Ok([
        hemisphere.rr[[vertex, 0]],
        hemisphere.rr[[vertex, 1]],
        hemisphere.rr[[vertex, 2]],
    ])
}
