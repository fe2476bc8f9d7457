use tracing::trace;
use crate::{
    algorithms::DouglasPeuckerSimplifier,
    traits::ShapeSimplifier,
    types::{ClassifiedContour, Contour, ContourKind},
};

/// Splits contours into zig-zag and plain shapes by their approximated vertex count.
pub struct ZigZagClassifier {
    /// Contours with a closed perimeter at or below this are noise
    pub min_length: f32,
    /// Maximum deviation allowed by the polygon approximation
    pub tolerance: f32,
    /// A contour is zig-zag when it keeps more vertices than this
    pub vertex_threshold: usize,
    simplifier: Box<dyn ShapeSimplifier>,
}

/// Per-frame classification output
#[derive(Debug, Clone, Default)]
pub struct Classification {
    pub contours: Vec<ClassifiedContour>,
    pub excluded: usize,
}

impl Classification {
    pub fn zigzag_count(&self) -> u32 {
        self.contours.iter().filter(|c| c.is_zigzag()).count() as u32
    }
}

impl ZigZagClassifier {
    pub fn new(min_length: f32, tolerance: f32, vertex_threshold: usize) -> Self {
        Self {
            min_length,
            tolerance,
            vertex_threshold,
            simplifier: Box::new(DouglasPeuckerSimplifier),
        }
    }

    /// Replace the polygon approximation algorithm
    pub fn with_simplifier<S>(mut self, simplifier: S) -> Self
    where
        S: ShapeSimplifier + 'static,
    {
        self.simplifier = Box::new(simplifier);
        self
    }

    /// Classify one contour, or `None` when it is too short to count.
    pub fn classify(&self, contour: Contour) -> Option<ClassifiedContour> {
        let perimeter = contour.perimeter();
        if perimeter <= self.min_length {
            return None;
        }

        let vertices = self.simplifier.simplify(&contour, self.tolerance).len();
        let kind = if vertices > self.vertex_threshold {
            ContourKind::ZigZag
        } else {
            ContourKind::Plain
        };
        trace!(perimeter, vertices, %kind, "classified contour");

        Some(ClassifiedContour {
            contour,
            perimeter,
            vertices,
            kind,
        })
    }

    pub fn classify_all(&self, contours: Vec<Contour>) -> Classification {
        let mut classification = Classification::default();
        for contour in contours {
            match self.classify(contour) {
                Some(classified) => classification.contours.push(classified),
                None => classification.excluded += 1,
            }
        }
        classification
    }
}

impl Default for ZigZagClassifier {
    fn default() -> Self {
        Self::new(50.0, 2.0, 6)
    }
}

impl std::fmt::Debug for ZigZagClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZigZagClassifier")
            .field("min_length", &self.min_length)
            .field("tolerance", &self.tolerance)
            .field("vertex_threshold", &self.vertex_threshold)
            .finish_non_exhaustive()
    }
}
