use std::{
    collections::VecDeque,
    path::{Path, PathBuf},
};

use image::GenericImageView;
use tracing::{debug, info, warn};

use crate::{
    error::{InspectError, Result},
    io::FrameSource,
    types::Frame,
};

const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff"];

/// Replays image files from a directory in file name order
#[derive(Debug)]
pub struct DirectorySource {
    frames: Vec<PathBuf>,
    next: usize,
    repeat: bool,
    dimensions: (u32, u32),
}

impl DirectorySource {
    pub fn open<P: AsRef<Path>>(dir: P, repeat: bool) -> Result<Self> {
        let dir = dir.as_ref();
        let mut frames: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            })
            .collect();
        frames.sort();

        let first = frames.first().ok_or_else(|| {
            InspectError::NoFrames(format!("no image files in {}", dir.display()))
        })?;
        let dimensions = image::image_dimensions(first)?;
        info!(
            "Replaying {} frames from {} ({}x{}, repeat: {})",
            frames.len(),
            dir.display(),
            dimensions.0,
            dimensions.1,
            repeat
        );

        Ok(Self {
            frames,
            next: 0,
            repeat,
            dimensions,
        })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameSource for DirectorySource {
    fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if self.next >= self.frames.len() {
            if !self.repeat {
                return Ok(None);
            }
            self.next = 0;
        }

        let path = &self.frames[self.next];
        self.next += 1;
        match image::open(path) {
            Ok(image) if image.dimensions() != self.dimensions => {
                warn!(
                    "Skipping frame {}: {}x{} instead of {}x{}",
                    path.display(),
                    image.width(),
                    image.height(),
                    self.dimensions.0,
                    self.dimensions.1
                );
                Ok(None)
            }
            Ok(image) => {
                debug!("Loaded frame {}", path.display());
                Ok(Some(image.to_rgb8()))
            }
            Err(err) => {
                warn!("Skipping unreadable frame {}: {}", path.display(), err);
                Ok(None)
            }
        }
    }

    fn is_exhausted(&self) -> bool {
        !self.repeat && self.next >= self.frames.len()
    }
}

/// Produces the same image on every pass
#[derive(Debug, Clone)]
pub struct StillSource {
    frame: Frame,
}

impl StillSource {
    pub fn new(frame: Frame) -> Self {
        Self { frame }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(image::open(path)?.to_rgb8()))
    }
}

impl FrameSource for StillSource {
    fn dimensions(&self) -> (u32, u32) {
        self.frame.dimensions()
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        Ok(Some(self.frame.clone()))
    }
}

/// In-memory frame queue; an empty queue means "no frame this pass"
#[derive(Debug, Clone)]
pub struct MemorySource {
    frames: VecDeque<Option<Frame>>,
    dimensions: (u32, u32),
}

impl MemorySource {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            frames: VecDeque::new(),
            dimensions: (width, height),
        }
    }

    /// Queue a frame for a later pass
    pub fn push(&mut self, frame: Frame) {
        self.frames.push_back(Some(frame));
    }

    /// Queue a pass on which the camera has nothing new
    pub fn push_gap(&mut self) {
        self.frames.push_back(None);
    }
}

impl FrameSource for MemorySource {
    fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        Ok(self.frames.pop_front().flatten())
    }

    fn is_exhausted(&self) -> bool {
        self.frames.is_empty()
    }
}
