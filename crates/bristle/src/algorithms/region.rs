use image::SubImage;
use crate::{
    error::{InspectError, Result},
    types::{Frame, Roi},
};

/// Borrow the region of interest out of a frame without copying pixels.
///
/// The rectangle must lie fully inside the frame: an out-of-bounds region is
/// reported as [`InspectError::RoiOutOfBounds`] rather than clamped.
pub fn extract_roi<'a>(frame: &'a Frame, roi: &Roi) -> Result<SubImage<&'a Frame>> {
    if roi.is_empty() {
        return Err(InspectError::invalid(
            "roi",
            format!("width and height must be positive, got {}x{}", roi.width, roi.height),
        ));
    }

    if !roi.fits_within(frame.width(), frame.height()) {
        return Err(InspectError::RoiOutOfBounds {
            roi: *roi,
            width: frame.width(),
            height: frame.height(),
        });
    }

    Ok(image::imageops::crop_imm(frame, roi.x, roi.y, roi.width, roi.height))
}
