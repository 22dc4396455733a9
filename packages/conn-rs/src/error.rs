use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConnError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Channel index {index} out of range ({num_channels} channels)")]
    ChannelOutOfRange { index: usize, num_channels: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConnError>;
