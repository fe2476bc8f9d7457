use bristle::{
    InspectError, InspectionConfig, Pipeline, Station, TransmitFailurePolicy,
    io::{
        DirectorySource, FrameSource, LogSink, NullDisplay, OverlayDisplay, ResultSink, SerialConfig,
        SerialSink, SnapshotDisplay, StillSource,
    },
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum StationConfigError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    Inspect(#[from] InspectError),
    #[error("Invalid station setting `{0}`: must be greater than zero")]
    NotPositive(&'static str),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

/// Where the station's frames come from
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Image files in a directory, taken in name order
    Directory {
        path: PathBuf,
        #[serde(default)]
        repeat: bool,
    },
    /// One image analysed on every pass
    Still { path: PathBuf },
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::Directory {
            path: PathBuf::from("frames"),
            repeat: true,
        }
    }
}

impl SourceConfig {
    pub fn open(&self) -> Result<Box<dyn FrameSource>, StationConfigError> {
        Ok(match self {
            Self::Directory { path, repeat } => Box::new(DirectorySource::open(path, *repeat)?),
            Self::Still { path } => Box::new(StillSource::open(path)?),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Directory for overlay snapshots; no display when absent
    pub output_dir: Option<PathBuf>,
    pub every_n_passes: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            every_n_passes: 1,
        }
    }
}

impl DisplayConfig {
    pub fn open(&self) -> Result<Box<dyn OverlayDisplay>, StationConfigError> {
        Ok(match &self.output_dir {
            Some(dir) => Box::new(SnapshotDisplay::new(dir, self.every_n_passes)?),
            None => Box::new(NullDisplay),
        })
    }
}

/// Everything needed to run one inspection station
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct StationConfig {
    /// Period of the inspection loop
    #[serde(default = "StationConfig::default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default)]
    pub on_transmit_error: TransmitFailurePolicy,
    #[serde(default)]
    pub inspection: InspectionConfig,
    pub source: SourceConfig,
    /// Actuator link; verdicts are only logged when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial: Option<SerialConfig>,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            tick_ms: Self::default_tick_ms(),
            on_transmit_error: TransmitFailurePolicy::default(),
            inspection: InspectionConfig::default(),
            source: SourceConfig::default(),
            serial: None,
            display: DisplayConfig::default(),
        }
    }
}

impl StationConfig {
    fn default_tick_ms() -> u64 {
        30
    }

    /// Load StationConfig from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, StationConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, StationConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load StationConfig from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, StationConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, StationConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StationConfigError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(StationConfigError::UnsupportedFileFormat),
        }
    }

    pub fn to_toml(&self) -> Result<String, StationConfigError> {
        Ok(toml::to_string_pretty(&self)?)
    }

    pub fn to_json(&self) -> Result<String, StationConfigError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    /// Save in the format named by the file extension
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), StationConfigError> {
        let path_ref = path.as_ref();
        let content = match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => self.to_toml()?,
            Some("json") => self.to_json()?,
            _ => return Err(StationConfigError::UnsupportedFileFormat),
        };
        fs::write(path_ref, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), StationConfigError> {
        self.inspection.validate()?;
        if self.tick_ms == 0 {
            return Err(StationConfigError::NotPositive("tick_ms"));
        }
        if self.display.every_n_passes == 0 {
            return Err(StationConfigError::NotPositive("display.every_n_passes"));
        }
        Ok(())
    }

    fn open_sink(&self) -> Result<Box<dyn ResultSink>, StationConfigError> {
        let codes = self.inspection.verdict.codes()?;
        Ok(match &self.serial {
            Some(serial) => Box::new(SerialSink::open(serial, codes)?),
            None => {
                warn!("No serial port configured, verdicts will only be logged");
                Box::new(LogSink::new(codes))
            }
        })
    }

    /// Open the source, sink and display and wire them into a station.
    ///
    /// The region is checked against the source before the serial port is
    /// opened.
    pub fn open_station(&self) -> Result<Station, StationConfigError> {
        self.validate()?;
        let pipeline = Pipeline::from_config(&self.inspection)?;

        let source = self.source.open()?;
        let (width, height) = source.dimensions();
        let roi = pipeline.roi();
        if !roi.fits_within(width, height) {
            return Err(InspectError::RoiOutOfBounds { roi, width, height }.into());
        }

        let sink = self.open_sink()?;
        let display = self.display.open()?;
        info!("Inspecting every {} ms", self.tick_ms);

        Ok(Station::new(pipeline, source, sink, display)?.with_transmit_policy(self.on_transmit_error))
    }
}
