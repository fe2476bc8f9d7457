use std::fmt;

use image::Rgb;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    error::{InspectError, Result},
    io::{FrameSource, OverlayDisplay, ResultSink},
    pipeline::Pipeline,
    render::{render, OverlayStyle},
    types::{Report, Verdict},
};

/// What to do when the verdict code cannot be sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransmitFailurePolicy {
    /// Log it and keep inspecting; the verdict is still displayed
    #[default]
    Ignore,
    /// Stop the station with the error
    Abort,
}

/// Status line shown to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StationStatus {
    #[default]
    Waiting,
    Reported(Report),
}

impl StationStatus {
    /// Gray while waiting; green for PASS and red for FAIL once reported
    pub fn color(&self) -> Rgb<u8> {
        match self {
            Self::Waiting => Rgb([128, 128, 128]),
            Self::Reported(report) => match report.verdict {
                Verdict::Pass => Rgb([0, 200, 0]),
                Verdict::Fail => Rgb([220, 0, 0]),
            },
        }
    }
}

impl fmt::Display for StationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => f.write_str("Waiting..."),
            Self::Reported(report) => report.fmt(f),
        }
    }
}

/// One camera, one pipeline, one actuator link.
///
/// The station owns its hardware handles; they are released when it is
/// dropped, whichever way the caller exits.
pub struct Station {
    pipeline: Pipeline,
    source: Box<dyn FrameSource>,
    sink: Box<dyn ResultSink>,
    display: Box<dyn OverlayDisplay>,
    style: OverlayStyle,
    policy: TransmitFailurePolicy,
    status: StationStatus,
    passes: u64,
    skipped: u64,
}

impl Station {
    /// Wire up a station. Fails before any frame is read when the region
    /// does not fit the source's frames.
    pub fn new(
        pipeline: Pipeline,
        source: Box<dyn FrameSource>,
        sink: Box<dyn ResultSink>,
        display: Box<dyn OverlayDisplay>,
    ) -> Result<Self> {
        let roi = pipeline.roi();
        let (width, height) = source.dimensions();
        if !roi.fits_within(width, height) {
            return Err(InspectError::RoiOutOfBounds { roi, width, height });
        }
        info!("Station ready: {}x{} frames, {}", width, height, pipeline.info());

        Ok(Self {
            pipeline,
            source,
            sink,
            display,
            style: OverlayStyle::default(),
            policy: TransmitFailurePolicy::default(),
            status: StationStatus::Waiting,
            passes: 0,
            skipped: 0,
        })
    }

    pub fn with_transmit_policy(mut self, policy: TransmitFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_style(mut self, style: OverlayStyle) -> Self {
        self.style = style;
        self
    }

    /// Run one analysis pass.
    ///
    /// Returns `Ok(None)` when no frame was available; the status is left
    /// as it was.
    pub fn tick(&mut self) -> Result<Option<Report>> {
        let frame = match self.source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                self.skipped += 1;
                debug!("No frame available, pass skipped");
                return Ok(None);
            }
            Err(err) => {
                self.skipped += 1;
                warn!("Frame acquisition failed, pass skipped: {}", err);
                return Ok(None);
            }
        };

        if frame.dimensions() != self.source.dimensions() {
            self.skipped += 1;
            let (width, height) = self.source.dimensions();
            warn!(
                "Frame is {}x{} instead of {}x{}, pass skipped",
                frame.width(),
                frame.height(),
                width,
                height
            );
            return Ok(None);
        }

        let inspection = self.pipeline.process(&frame)?;
        let report = inspection.report;

        if let Err(err) = self.sink.transmit(report.verdict) {
            match self.policy {
                TransmitFailurePolicy::Ignore => {
                    warn!("Verdict {} not transmitted: {}", report.verdict, err);
                }
                TransmitFailurePolicy::Abort => return Err(err),
            }
        }

        let previous = std::mem::replace(&mut self.status, StationStatus::Reported(report));
        match previous {
            StationStatus::Reported(last) if last.verdict == report.verdict => {
                debug!("{}", report);
            }
            _ => info!("{}", report),
        }
        self.passes += 1;

        match render(&frame, &inspection, &self.style) {
            Ok(overlay) => {
                if let Err(err) = self.display.show(&overlay, &self.status) {
                    warn!("Display update failed: {}", err);
                }
            }
            Err(err) => warn!("Overlay rendering failed: {}", err),
        }

        Ok(Some(report))
    }

    /// Clear the displayed verdict until the next pass
    pub fn refresh(&mut self) {
        self.status = StationStatus::Waiting;
        if let Err(err) = self.display.status(&self.status) {
            warn!("Display update failed: {}", err);
        }
        info!("Status reset");
    }

    pub fn status(&self) -> StationStatus {
        self.status
    }

    /// Completed passes
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Passes skipped for lack of a frame
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// True when the frame source has nothing left to give
    pub fn is_finished(&self) -> bool {
        self.source.is_exhausted()
    }
}

impl Drop for Station {
    fn drop(&mut self) {
        info!(
            "Station stopped after {} passes ({} skipped), releasing camera and serial link",
            self.passes, self.skipped
        );
    }
}
