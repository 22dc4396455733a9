use super::acquisition::{acquire_sensor_level, acquire_source_level, AcquiredData};
use super::measures::ConnectivityMethod;
use super::settings::ConnectivitySettings;
use super::sources::DataSources;
use crate::error::{ConnError, Result};
use crate::network::Network;
use crate::profile_scope;

/// Computes a connectivity network from an evoked recording.
///
/// Data is acquired at sensor level (channels filtered by type) or at source
/// level (minimum-norm reconstruction), then handed to the configured measure.
/// Missing input data and unknown methods yield an empty [`Network`] whose
/// status says why; invalid settings and collaborator failures are errors.
#[derive(Debug, Clone)]
pub struct Connectivity {
    settings: ConnectivitySettings,
}

impl Connectivity {
    pub fn new(settings: &ConnectivitySettings) -> Self {
        Self {
            settings: settings.clone(),
        }
    }

    pub fn settings(&self) -> &ConnectivitySettings {
        &self.settings
    }

    pub fn calculate(&self, sources: &DataSources<'_>) -> Result<Network> {
        profile_scope!("connectivity_calculate");
        self.settings.validate()?;

        let method = self.settings.method.as_str();
        log::info!(
            "[CONN] Computing {} connectivity at {} level",
            method,
            if self.settings.do_source_loc {
                "source"
            } else {
                "sensor"
            }
        );

        let Some(acquired) = self.acquire(sources)? else {
            log::warn!("[CONN] No input data available, returning empty {} network", method);
            return Ok(Network::missing_data(method));
        };

        self.dispatch(&acquired)
    }

    fn acquire(&self, sources: &DataSources<'_>) -> Result<Option<AcquiredData>> {
        if !self.settings.do_source_loc {
            return acquire_sensor_level(&self.settings, sources.sensors);
        }

        let Some(source_space) = sources.source_space.as_ref() else {
            return Err(ConnError::InvalidParameter(
                "Source localization requested without forward model, covariance and inverse \
                 solver collaborators"
                    .to_string(),
            ));
        };
        acquire_source_level(&self.settings, sources.sensors, source_space)
    }

    fn dispatch(&self, acquired: &AcquiredData) -> Result<Network> {
        let method = self.settings.method.as_str();
        match ConnectivityMethod::from_name(method) {
            Some(measure) => {
                let network = measure.compute(&acquired.data, &acquired.node_positions)?;
                log::info!(
                    "[CONN] {} network: {} nodes, {} edges",
                    method,
                    network.num_nodes(),
                    network.edges.len()
                );
                Ok(network)
            }
            None => {
                log::warn!("[CONN] Connectivity method '{}' is not implemented", method);
                Ok(Network::unsupported(method))
            }
        }
    }
}
