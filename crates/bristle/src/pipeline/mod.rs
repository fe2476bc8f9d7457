pub mod builder;

use tracing::debug;
use crate::{
    algorithms::{extract_roi, to_grayscale, VerdictEngine, ZigZagClassifier},
    config::InspectionConfig,
    error::Result,
    traits::{ContourExtractor, ImagePreprocessor},
    types::{EdgeMap, Frame, Inspection, Report, Roi},
};

/// Frame analysis: region crop, edge map, contour classification, verdict.
///
/// Processing is a pure function of the frame and the pipeline's fixed
/// configuration; nothing is carried from one frame to the next.
pub struct Pipeline {
    roi: Roi,
    preprocessors: Vec<Box<dyn ImagePreprocessor>>,
    contour_extractor: Box<dyn ContourExtractor>,
    classifier: ZigZagClassifier,
    verdict: VerdictEngine,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> builder::PipelineBuilder {
        builder::PipelineBuilder::new()
    }

    /// Validate the configuration and build the standard pipeline from it
    pub fn from_config(config: &InspectionConfig) -> Result<Self> {
        config.validate()?;
        Ok(builder::PipelineBuilder::from_config(config).build())
    }

    /// Create a new pipeline with the given components
    pub fn new(
        roi: Roi,
        preprocessors: Vec<Box<dyn ImagePreprocessor>>,
        contour_extractor: Box<dyn ContourExtractor>,
        classifier: ZigZagClassifier,
        verdict: VerdictEngine,
    ) -> Self {
        Self {
            roi,
            preprocessors,
            contour_extractor,
            classifier,
            verdict,
        }
    }

    pub fn roi(&self) -> Roi {
        self.roi
    }

    /// Crop the region and turn it into a binary edge map
    pub fn edge_map(&self, frame: &Frame) -> Result<EdgeMap> {
        let region = extract_roi(frame, &self.roi)?;
        let mut image = to_grayscale(&*region);
        for preprocessor in &self.preprocessors {
            image = preprocessor.preprocess(&image)?;
        }
        Ok(image)
    }

    /// Classify the contours of an edge map and decide the verdict
    pub fn analyze_edges(&self, edges: EdgeMap) -> Result<Inspection> {
        let contours = self.contour_extractor.extract_contours(&edges)?;
        let traced = contours.len();
        let classification = self.classifier.classify_all(contours);

        let zigzag_count = classification.zigzag_count();
        let verdict = self.verdict.decide(zigzag_count);
        debug!(
            traced,
            retained = classification.contours.len(),
            excluded = classification.excluded,
            zigzag_count,
            %verdict,
            "frame analysed"
        );

        Ok(Inspection {
            report: Report { verdict, zigzag_count },
            contours: classification.contours,
            excluded: classification.excluded,
            edges,
            roi: self.roi,
        })
    }

    /// Process a frame through the entire pipeline
    pub fn process(&self, frame: &Frame) -> Result<Inspection> {
        let edges = self.edge_map(frame)?;
        self.analyze_edges(edges)
    }

    /// Get information about the pipeline configuration
    pub fn info(&self) -> String {
        format!(
            "Pipeline: roi {}, {} preprocessors, min length {}, tolerance {}, zig-zag above {} vertices, pass at {}",
            self.roi,
            self.preprocessors.len(),
            self.classifier.min_length,
            self.classifier.tolerance,
            self.classifier.vertex_threshold,
            self.verdict.pass_threshold,
        )
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.info())
    }
}
