use std::path::{Path, PathBuf};

use image::RgbImage;
use tracing::{debug, info};

use crate::{
    error::Result,
    io::OverlayDisplay,
    render::Overlay,
    station::StationStatus,
};

const STATUS_SWATCH: (u32, u32) = (160, 24);

/// Writes the latest overlays as PNG files for an external viewer.
///
/// `frame.png`, `roi.png` and `edges.png` are rewritten every
/// `every_n_passes` passes. `status.txt` holds the current status line and
/// `status.png` a swatch in the status colour.
#[derive(Debug)]
pub struct SnapshotDisplay {
    dir: PathBuf,
    every_n_passes: u64,
    shown: u64,
}

impl SnapshotDisplay {
    pub fn new<P: AsRef<Path>>(dir: P, every_n_passes: u64) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        info!("Writing overlay snapshots to {}", dir.display());
        Ok(Self {
            dir,
            every_n_passes: every_n_passes.max(1),
            shown: 0,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl OverlayDisplay for SnapshotDisplay {
    fn show(&mut self, overlay: &Overlay, status: &StationStatus) -> Result<()> {
        if self.shown % self.every_n_passes == 0 {
            overlay.frame.save(self.dir.join("frame.png"))?;
            overlay.roi.save(self.dir.join("roi.png"))?;
            overlay.edges.save(self.dir.join("edges.png"))?;
            debug!("Snapshot {} written", self.shown);
        }
        self.shown += 1;
        self.status(status)
    }

    fn status(&mut self, status: &StationStatus) -> Result<()> {
        std::fs::write(self.dir.join("status.txt"), format!("{status}\n"))?;
        RgbImage::from_pixel(STATUS_SWATCH.0, STATUS_SWATCH.1, status.color())
            .save(self.dir.join("status.png"))?;
        Ok(())
    }
}

/// Discards everything; for headless runs
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDisplay;

impl OverlayDisplay for NullDisplay {
    fn show(&mut self, _overlay: &Overlay, _status: &StationStatus) -> Result<()> {
        Ok(())
    }
}
