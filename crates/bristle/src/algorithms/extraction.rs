use imageproc::contours::BorderType;
use crate::{
    error::Result,
    traits::ContourExtractor,
    types::{Contour, EdgeMap},
};

/// Border-following extractor that keeps only outermost boundaries.
///
/// Hole borders and anything nested inside a hole are dropped, so each
/// connected group of edge pixels yields exactly one contour.
#[derive(Debug, Clone, Default)]
pub struct ExternalContourExtractor;

impl ContourExtractor for ExternalContourExtractor {
    fn extract_contours(&self, edges: &EdgeMap) -> Result<Vec<Contour>> {
        let contours = imageproc::contours::find_contours::<i32>(edges);

        let result = contours
            .into_iter()
            .filter(|contour| contour.border_type == BorderType::Outer && contour.parent.is_none())
            .map(|contour| {
                Contour::new(contour.points.iter().map(|p| [p.x as f32, p.y as f32]).collect())
            })
            .collect();

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn fill(image: &mut GrayImage, x0: u32, y0: u32, x1: u32, y1: u32, value: u8) {
        for y in y0..y1 {
            for x in x0..x1 {
                image.put_pixel(x, y, Luma([value]));
            }
        }
    }

    #[test]
    fn test_empty_map_has_no_contours() {
        let edges = GrayImage::new(50, 50);
        let contours = ExternalContourExtractor.extract_contours(&edges).expect("Should extract");
        assert!(contours.is_empty());
    }

    #[test]
    fn test_nested_borders_are_skipped() {
        // A ring with a blob inside its hole
        let mut edges = GrayImage::new(100, 100);
        fill(&mut edges, 20, 20, 80, 80, 255);
        fill(&mut edges, 30, 30, 70, 70, 0);
        fill(&mut edges, 45, 45, 55, 55, 255);

        let contours = ExternalContourExtractor.extract_contours(&edges).expect("Should extract");
        assert_eq!(contours.len(), 1);

        let xs: Vec<f32> = contours[0].points.iter().map(|p| p[0]).collect();
        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        assert_eq!((min_x, max_x), (20.0, 79.0));
    }

    #[test]
    fn test_separate_components_each_yield_a_contour() {
        let mut edges = GrayImage::new(100, 40);
        fill(&mut edges, 5, 5, 25, 25, 255);
        fill(&mut edges, 40, 5, 60, 25, 255);
        fill(&mut edges, 75, 5, 95, 25, 255);

        let contours = ExternalContourExtractor.extract_contours(&edges).expect("Should extract");
        assert_eq!(contours.len(), 3);
    }
}
