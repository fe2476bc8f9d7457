//! Boundaries to the hardware and the operator: where frames come from,
//! where verdict codes go, and where overlays are shown.

pub mod display;
pub mod sink;
pub mod source;

pub use display::*;
pub use sink::*;
pub use source::*;

use crate::{
    error::Result,
    render::Overlay,
    station::StationStatus,
    types::{Frame, Verdict},
};

/// Supplies one frame per analysis pass
pub trait FrameSource {
    /// Width and height of every frame this source produces
    fn dimensions(&self) -> (u32, u32);

    /// Next frame, or `None` when nothing new is available this pass
    fn next_frame(&mut self) -> Result<Option<Frame>>;

    /// True once the source will never produce another frame
    fn is_exhausted(&self) -> bool {
        false
    }
}

/// Receives exactly one verdict per completed pass
pub trait ResultSink {
    fn transmit(&mut self, verdict: Verdict) -> Result<()>;
}

/// Shows overlays and the status line to the operator
pub trait OverlayDisplay {
    fn show(&mut self, overlay: &Overlay, status: &StationStatus) -> Result<()>;

    /// Status changed without a new overlay (e.g. after a refresh)
    fn status(&mut self, _status: &StationStatus) -> Result<()> {
        Ok(())
    }
}
