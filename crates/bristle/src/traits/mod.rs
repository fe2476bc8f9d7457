use image::GrayImage;
use crate::{error::Result, types::{Contour, EdgeMap}};

/// Trait for grayscale preprocessing stages (blur, edge detection)
pub trait ImagePreprocessor: Send + Sync {
    /// Produce a new image of the same size from the input image
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage>;
}

/// Trait for contour extraction algorithms
pub trait ContourExtractor: Send + Sync {
    /// Trace boundary curves on a binary edge map
    fn extract_contours(&self, edges: &EdgeMap) -> Result<Vec<Contour>>;
}

/// Trait for polygon approximation of closed contours
pub trait ShapeSimplifier: Send + Sync {
    /// Return the vertices of the approximated closed polygon.
    /// The closing vertex is not repeated.
    fn simplify(&self, contour: &Contour, tolerance: f32) -> Vec<[f32; 2]>;
}
