use thiserror::Error;

use crate::types::Roi;

#[derive(Error, Debug)]
pub enum InspectError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Region of interest {roi} does not fit inside a {width}x{height} frame")]
    RoiOutOfBounds { roi: Roi, width: u32, height: u32 },

    #[error("Invalid configuration for `{parameter}`: {reason}")]
    InvalidConfig {
        parameter: &'static str,
        reason: String,
    },

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("No frames available: {0}")]
    NoFrames(String),

    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl InspectError {
    pub(crate) fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            parameter,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, InspectError>;
