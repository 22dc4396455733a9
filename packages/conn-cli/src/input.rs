use conn_rs::connectivity::SensorDataSource;
use conn_rs::{ConnError, Evoked, MeasurementInfo};
use ndarray::Array2;
use serde::Deserialize;
use std::path::Path;

/// Multichannel recording read by the spectral subcommands
#[derive(Deserialize)]
pub struct RecordingFile {
    pub sampling_frequency: f64,
    pub data: Vec<Vec<f64>>,
}

#[derive(Deserialize)]
struct EvokedEntry {
    info: MeasurementInfo,
    data: Vec<Vec<f64>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EvokedFile {
    Single(EvokedEntry),
    Sets(Vec<EvokedEntry>),
}

/// Rows of equal length into a `rows × columns` matrix
pub fn rows_to_array(rows: Vec<Vec<f64>>) -> Result<Array2<f64>, String> {
    let num_rows = rows.len();
    let num_cols = rows.first().map(|r| r.len()).unwrap_or(0);
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != num_cols) {
        return Err(format!(
            "Row {} has {} samples, expected {}",
            i,
            row.len(),
            num_cols
        ));
    }

    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((num_rows, num_cols), flat).map_err(|e| e.to_string())
}

pub fn read_recording(path: &str) -> Result<(Array2<f64>, f64), String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path, e))?;
    let recording: RecordingFile = serde_json::from_str(&content)
        .map_err(|e| format!("Invalid recording JSON in '{}': {}", path, e))?;

    if recording.data.is_empty() {
        return Err(format!("Recording '{}' has no channels", path));
    }
    let data = rows_to_array(recording.data)?;
    Ok((data, recording.sampling_frequency))
}

/// Serves evoked sets from JSON files on disk
pub struct JsonEvokedSource;

impl SensorDataSource for JsonEvokedSource {
    fn load_evoked(&self, measurement: &Path, ave_index: usize) -> conn_rs::Result<Evoked> {
        let content = std::fs::read_to_string(measurement)?;
        let entry = match serde_json::from_str::<EvokedFile>(&content)? {
            EvokedFile::Single(entry) if ave_index == 0 => entry,
            EvokedFile::Single(_) => {
                return Err(ConnError::InvalidParameter(format!(
                    "{:?} holds a single evoked set, requested index {}",
                    measurement, ave_index
                )))
            }
            EvokedFile::Sets(mut sets) => {
                if ave_index >= sets.len() {
                    return Err(ConnError::InvalidParameter(format!(
                        "{:?} holds {} evoked sets, requested index {}",
                        measurement,
                        sets.len(),
                        ave_index
                    )));
                }
                sets.swap_remove(ave_index)
            }
        };

        let data = rows_to_array(entry.data).map_err(ConnError::ShapeMismatch)?;
        Ok(Evoked {
            info: entry.info,
            data,
        })
    }
}
