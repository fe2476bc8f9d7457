//! Operator overlays built from an analysis result.
//!
//! Rendering never feeds back into analysis: it takes the untouched frame
//! plus an [`Inspection`] and returns fresh images for display.

use image::{DynamicImage, Rgb, RgbImage};
use imageproc::{
    drawing::{draw_hollow_rect_mut, draw_line_segment_mut},
    rect::Rect,
};

use crate::{
    algorithms::extract_roi,
    error::Result,
    types::{Frame, Inspection},
};

#[derive(Debug, Clone)]
pub struct OverlayStyle {
    pub roi_color: Rgb<u8>,
    pub roi_thickness: u32,
    pub contour_color: Rgb<u8>,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            roi_color: Rgb([0, 255, 0]),
            roi_thickness: 2,
            contour_color: Rgb([0, 0, 255]),
        }
    }
}

/// The three views shown to the operator
#[derive(Debug, Clone)]
pub struct Overlay {
    /// Full frame with the region outlined
    pub frame: RgbImage,
    /// Region crop with retained contours drawn
    pub roi: RgbImage,
    /// Edge map as a colour image
    pub edges: RgbImage,
}

pub fn render(frame: &Frame, inspection: &Inspection, style: &OverlayStyle) -> Result<Overlay> {
    let roi = inspection.roi;
    let mut roi_image = extract_roi(frame, &roi)?.to_image();

    for classified in &inspection.contours {
        let points = &classified.contour.points;
        if points.len() == 1 {
            let [x, y] = points[0];
            if let Some(pixel) = roi_image.get_pixel_mut_checked(x as u32, y as u32) {
                *pixel = style.contour_color;
            }
            continue;
        }
        for (i, &[x, y]) in points.iter().enumerate() {
            let [nx, ny] = points[(i + 1) % points.len()];
            draw_line_segment_mut(&mut roi_image, (x, y), (nx, ny), style.contour_color);
        }
    }

    let mut frame_image = frame.clone();
    for inset in 0..style.roi_thickness as i32 {
        let outline = Rect::at(roi.x as i32 - inset, roi.y as i32 - inset)
            .of_size(roi.width + 2 * inset as u32, roi.height + 2 * inset as u32);
        draw_hollow_rect_mut(&mut frame_image, outline, style.roi_color);
    }

    let edges = DynamicImage::ImageLuma8(inspection.edges.clone()).to_rgb8();

    Ok(Overlay {
        frame: frame_image,
        roi: roi_image,
        edges,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClassifiedContour, Contour, ContourKind, Report, Roi, Verdict};
    use image::GrayImage;

    fn inspection_with_square(roi: Roi) -> Inspection {
        let square = Contour::new(vec![[5.0, 5.0], [25.0, 5.0], [25.0, 25.0], [5.0, 25.0]]);
        Inspection {
            report: Report { verdict: Verdict::Fail, zigzag_count: 0 },
            contours: vec![ClassifiedContour {
                perimeter: square.perimeter(),
                contour: square,
                vertices: 4,
                kind: ContourKind::Plain,
            }],
            excluded: 0,
            edges: GrayImage::new(roi.width, roi.height),
            roi,
        }
    }

    #[test]
    fn test_overlay_views() {
        let frame = Frame::from_pixel(120, 100, Rgb([10, 10, 10]));
        let roi = Roi::new(20, 30, 60, 40);
        let style = OverlayStyle::default();

        let overlay = render(&frame, &inspection_with_square(roi), &style).expect("Should render");

        assert_eq!(overlay.frame.dimensions(), (120, 100));
        assert_eq!(overlay.roi.dimensions(), (60, 40));
        assert_eq!(overlay.edges.dimensions(), (60, 40));

        // Region outline, inner and outer ring
        assert_eq!(*overlay.frame.get_pixel(20, 30), style.roi_color);
        assert_eq!(*overlay.frame.get_pixel(19, 29), style.roi_color);
        assert_eq!(*overlay.frame.get_pixel(50, 50), Rgb([10, 10, 10]));

        // Contour drawn on the crop, interior untouched
        assert_eq!(*overlay.roi.get_pixel(15, 5), style.contour_color);
        assert_eq!(*overlay.roi.get_pixel(25, 15), style.contour_color);
        assert_eq!(*overlay.roi.get_pixel(15, 15), Rgb([10, 10, 10]));
    }

    #[test]
    fn test_rendering_leaves_source_frame_alone() {
        let frame = Frame::from_pixel(120, 100, Rgb([10, 10, 10]));
        let before = frame.clone();
        render(&frame, &inspection_with_square(Roi::new(20, 30, 60, 40)), &OverlayStyle::default())
            .expect("Should render");
        assert_eq!(frame, before);
    }
}
