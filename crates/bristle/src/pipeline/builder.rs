use crate::{
    pipeline::Pipeline,
    config::InspectionConfig,
    traits::{ImagePreprocessor, ContourExtractor, ShapeSimplifier},
    types::Roi,
    algorithms::{
        CannyPreprocessor,
        ExternalContourExtractor,
        GaussianBlurPreprocessor,
        VerdictEngine,
        ZigZagClassifier,
    },
};

/// Builder for creating processing pipelines with a fluent API
pub struct PipelineBuilder {
    roi: Roi,
    preprocessors: Vec<Box<dyn ImagePreprocessor>>,
    contour_extractor: Option<Box<dyn ContourExtractor>>,
    classifier: ZigZagClassifier,
    verdict: VerdictEngine,
}

impl PipelineBuilder {
    /// Create a new pipeline builder with no preprocessing stages
    pub fn new() -> Self {
        Self {
            roi: Roi::default(),
            preprocessors: Vec::new(),
            contour_extractor: None,
            classifier: ZigZagClassifier::default(),
            verdict: VerdictEngine::default(),
        }
    }

    /// Standard blur + Canny pipeline for a configuration.
    ///
    /// Does not validate; [`Pipeline::from_config`] does.
    pub fn from_config(config: &InspectionConfig) -> Self {
        Self::new()
            .with_roi(config.roi)
            .add_preprocessor(GaussianBlurPreprocessor {
                kernel_size: config.edges.blur_kernel_size,
                sigma: config.edges.blur_sigma,
            })
            .add_preprocessor(CannyPreprocessor {
                low_threshold: config.edges.low_threshold,
                high_threshold: config.edges.high_threshold,
            })
            .with_classifier(ZigZagClassifier::new(
                config.contours.min_length,
                config.contours.simplify_tolerance,
                config.contours.zigzag_vertex_threshold,
            ))
            .with_pass_threshold(config.verdict.pass_threshold)
    }

    pub fn with_roi(mut self, roi: Roi) -> Self {
        self.roi = roi;
        self
    }

    /// Add a preprocessor to the pipeline
    pub fn add_preprocessor<P>(mut self, preprocessor: P) -> Self
    where
        P: ImagePreprocessor + 'static,
    {
        self.preprocessors.push(Box::new(preprocessor));
        self
    }

    /// Set the contour extractor (replaces any existing one)
    pub fn set_contour_extractor<E>(mut self, extractor: E) -> Self
    where
        E: ContourExtractor + 'static,
    {
        self.contour_extractor = Some(Box::new(extractor));
        self
    }

    pub fn with_classifier(mut self, classifier: ZigZagClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Swap the polygon approximation used by the classifier
    pub fn with_simplifier<S>(mut self, simplifier: S) -> Self
    where
        S: ShapeSimplifier + 'static,
    {
        self.classifier = self.classifier.with_simplifier(simplifier);
        self
    }

    pub fn with_pass_threshold(mut self, pass_threshold: u32) -> Self {
        self.verdict = VerdictEngine::new(pass_threshold);
        self
    }

    /// Build the pipeline with default components if not specified
    pub fn build(self) -> Pipeline {
        let contour_extractor = self.contour_extractor
            .unwrap_or_else(|| Box::new(ExternalContourExtractor));

        Pipeline::new(
            self.roi,
            self.preprocessors,
            contour_extractor,
            self.classifier,
            self.verdict,
        )
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
