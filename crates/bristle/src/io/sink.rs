use std::{io::Write, thread, time::Duration};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serialport::SerialPort;
use tracing::{debug, info};

use crate::{
    algorithms::VerdictCodes,
    error::Result,
    io::ResultSink,
    types::Verdict,
};

/// Writes one code byte per verdict to any byte stream
pub struct WriterSink<W: Write> {
    writer: W,
    codes: VerdictCodes,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W, codes: VerdictCodes) -> Self {
        Self { writer, codes }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ResultSink for WriterSink<W> {
    fn transmit(&mut self, verdict: Verdict) -> Result<()> {
        let code = self.codes.code(verdict);
        self.writer.write_all(&[code])?;
        self.writer.flush()?;
        debug!("Transmitted {} as {:?}", verdict, code as char);
        Ok(())
    }
}

/// Serial link to the actuator board
pub type SerialSink = WriterSink<Box<dyn SerialPort>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SerialConfig {
    /// Device path, e.g. `/dev/ttyUSB0` or `COM10`
    pub port: String,
    #[serde(default = "SerialConfig::default_baud_rate")]
    pub baud_rate: u32,
    /// Write timeout
    #[serde(default = "SerialConfig::default_timeout_ms")]
    pub timeout_ms: u64,
    /// Wait after opening; boards that reset on connect need about 2 s
    #[serde(default = "SerialConfig::default_settle_ms")]
    pub settle_ms: u64,
}

impl SerialConfig {
    fn default_baud_rate() -> u32 {
        9600
    }

    fn default_timeout_ms() -> u64 {
        100
    }

    fn default_settle_ms() -> u64 {
        2000
    }

    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud_rate: Self::default_baud_rate(),
            timeout_ms: Self::default_timeout_ms(),
            settle_ms: Self::default_settle_ms(),
        }
    }
}

impl SerialSink {
    /// Open the port and wait for the board to settle
    pub fn open(config: &SerialConfig, codes: VerdictCodes) -> Result<Self> {
        let port = serialport::new(config.port.as_str(), config.baud_rate)
            .timeout(Duration::from_millis(config.timeout_ms))
            .open()?;
        info!("Opened serial port {} at {} baud", config.port, config.baud_rate);

        if config.settle_ms > 0 {
            thread::sleep(Duration::from_millis(config.settle_ms));
        }

        Ok(Self::new(port, codes))
    }
}

/// Sink for running without hardware: verdicts are only logged
#[derive(Debug, Clone, Default)]
pub struct LogSink {
    codes: VerdictCodes,
    sent: u64,
}

impl LogSink {
    pub fn new(codes: VerdictCodes) -> Self {
        Self { codes, sent: 0 }
    }

    pub fn sent(&self) -> u64 {
        self.sent
    }
}

impl ResultSink for LogSink {
    fn transmit(&mut self, verdict: Verdict) -> Result<()> {
        self.sent += 1;
        debug!("No serial link, verdict {} (code {:?}) not sent", verdict, self.codes.code(verdict) as char);
        Ok(())
    }
}
