//! # Bristle Pattern Inspection Library
//!
//! Classifies a brush sample seen by a camera as PASS or FAIL by counting
//! zig-zag shaped edge contours inside a fixed region of interest, then
//! reports the verdict to an actuator board as a single byte.
//!
//! ## Core Features
//!
//! - **Pure analysis pipeline**: region crop, grayscale, blur, Canny edges,
//!   external contour tracing, Douglas-Peucker vertex counting, threshold verdict
//! - **Trait-based stages**: swap preprocessors, contour extractors or simplifiers
//! - **Separate rendering**: overlays are built from analysis results, never the other way round
//! - **Owned hardware handles**: frame sources, serial sinks and displays are injected into a [`Station`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bristle::{InspectionConfig, Pipeline};
//!
//! let pipeline = Pipeline::from_config(&InspectionConfig::default())?;
//!
//! let frame = image::open("brush.png")?.to_rgb8();
//! let inspection = pipeline.process(&frame)?;
//! println!("{}", inspection.report);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Running a Station
//!
//! ```rust,no_run
//! use bristle::{InspectionConfig, Pipeline, Station, io::*};
//!
//! let config = InspectionConfig::default();
//! let codes = config.verdict.codes()?;
//! let mut station = Station::new(
//!     Pipeline::from_config(&config)?,
//!     Box::new(DirectorySource::open("frames", true)?),
//!     Box::new(SerialSink::open(&SerialConfig::new("/dev/ttyUSB0"), codes)?),
//!     Box::new(SnapshotDisplay::new("live", 10)?),
//! )?;
//! station.tick()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Core modules
pub mod error;
pub mod types;
pub mod traits;
pub mod algorithms;
pub mod config;
pub mod pipeline;
pub mod render;
pub mod io;
pub mod station;

// Re-exports for convenience
pub use error::{InspectError, Result};
pub use types::{ClassifiedContour, Contour, ContourKind, Frame, Inspection, Report, Roi, Verdict};
pub use traits::*;
pub use algorithms::*;
pub use config::InspectionConfig;
pub use pipeline::{Pipeline, builder::PipelineBuilder};
pub use render::{render, Overlay, OverlayStyle};
pub use station::{Station, StationStatus, TransmitFailurePolicy};

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb};
    use imageproc::drawing::draw_line_segment_mut;

    fn draw_sawtooth(edges: &mut GrayImage, x0: f32, y0: f32) {
        let points: Vec<(f32, f32)> = (0..=10)
            .map(|i| (x0 + i as f32 * 10.0, y0 + if i % 2 == 0 { 0.0 } else { 20.0 }))
            .collect();
        for pair in points.windows(2) {
            draw_line_segment_mut(edges, pair[0], pair[1], Luma([255u8]));
        }
    }

    fn edge_map_with_sawtooths(count: usize) -> GrayImage {
        let mut edges = GrayImage::new(300, 200);
        for i in 0..count {
            draw_sawtooth(&mut edges, 30.0, 20.0 + i as f32 * 60.0);
        }
        edges
    }

    fn pipeline() -> Pipeline {
        Pipeline::from_config(&InspectionConfig {
            roi: Roi::new(0, 0, 300, 200),
            ..InspectionConfig::default()
        })
        .expect("Config should be valid")
    }

    #[test]
    fn test_three_sawtooth_curves_pass() {
        let inspection = pipeline()
            .analyze_edges(edge_map_with_sawtooths(3))
            .expect("Should analyse");

        assert_eq!(inspection.zigzag_count(), 3);
        assert_eq!(inspection.verdict(), Verdict::Pass);
        for classified in &inspection.contours {
            assert!(classified.vertices >= 7, "got {} vertices", classified.vertices);
            assert!(classified.perimeter > 50.0);
        }
        assert_eq!(config::VerdictConfig::default().codes().expect("Codes").code(inspection.verdict()), b'P');
    }

    #[test]
    fn test_two_sawtooth_curves_fail() {
        let inspection = pipeline()
            .analyze_edges(edge_map_with_sawtooths(2))
            .expect("Should analyse");

        assert_eq!(inspection.zigzag_count(), 2);
        assert_eq!(inspection.verdict(), Verdict::Fail);
        assert_eq!(config::VerdictConfig::default().codes().expect("Codes").code(inspection.verdict()), b'F');
    }

    #[test]
    fn test_long_straight_edge_is_not_zigzag() {
        let mut edges = GrayImage::new(300, 200);
        draw_line_segment_mut(&mut edges, (10.0, 100.0), (110.0, 100.0), Luma([255u8]));

        let inspection = pipeline().analyze_edges(edges).expect("Should analyse");

        assert_eq!(inspection.contours.len(), 1);
        let line = &inspection.contours[0];
        assert!(line.perimeter > 50.0);
        assert_eq!(line.vertices, 2);
        assert_eq!(line.kind, ContourKind::Plain);
        assert_eq!(inspection.zigzag_count(), 0);
    }

    #[test]
    fn test_empty_edge_map_fails_with_zero_count() {
        let inspection = pipeline()
            .analyze_edges(GrayImage::new(300, 200))
            .expect("Should analyse");
        assert!(inspection.contours.is_empty());
        assert_eq!(inspection.report, Report { verdict: Verdict::Fail, zigzag_count: 0 });
    }

    #[test]
    fn test_short_specks_are_excluded() {
        let mut edges = GrayImage::new(300, 200);
        for i in 0..5 {
            edges.put_pixel(20 + i * 30, 20, Luma([255u8]));
        }
        let inspection = pipeline().analyze_edges(edges).expect("Should analyse");
        assert!(inspection.contours.is_empty());
        assert_eq!(inspection.excluded, 5);
    }

    #[test]
    fn test_processing_is_repeatable() {
        let mut frame = Frame::from_pixel(300, 200, Rgb([15, 15, 15]));
        for y in 60..140 {
            for x in 50..250 {
                // Bright band with a stepped top edge
                if y >= 60 + (x / 12 % 2) * 15 {
                    frame.put_pixel(x, y, Rgb([220, 210, 200]));
                }
            }
        }

        let pipeline = pipeline();
        let first = pipeline.process(&frame).expect("Should process");
        let second = pipeline.process(&frame).expect("Should process");

        assert_eq!(first.report, second.report);
        assert_eq!(first.contours, second.contours);
        assert_eq!(first.edges, second.edges);
        assert!(first.edges.pixels().all(|p| p[0] == 0 || p[0] == 255));
    }

    #[test]
    fn test_edge_map_finds_moderate_contrast_step() {
        // Gray 20 to 95: detectable with the 5-tap blur alone, lost if
        // the image were smoothed a second time
        let frame = Frame::from_fn(300, 200, |x, _| {
            if x < 150 { Rgb([20, 20, 20]) } else { Rgb([95, 95, 95]) }
        });
        let edges = pipeline().edge_map(&frame).expect("Should build edge map");

        let edge_pixels = edges.pixels().filter(|p| p[0] == 255).count();
        assert_eq!(edge_pixels, 200);
        for y in [0, 100, 199] {
            assert!((149..=150).any(|x| edges.get_pixel(x, y)[0] == 255), "row {y} has no edge");
        }
    }

    #[test]
    fn test_raising_threshold_only_moves_pass_to_fail() {
        let edges = edge_map_with_sawtooths(3);
        let mut previous = Verdict::Pass;
        for threshold in 1..8 {
            let pipeline = PipelineBuilder::new()
                .with_roi(Roi::new(0, 0, 300, 200))
                .with_pass_threshold(threshold)
                .build();
            let inspection = pipeline.analyze_edges(edges.clone()).expect("Should analyse");
            assert_eq!(inspection.zigzag_count(), 3);
            assert!(!(previous == Verdict::Fail && inspection.verdict() == Verdict::Pass));
            previous = inspection.verdict();
        }
        assert_eq!(previous, Verdict::Fail);
    }

    #[test]
    fn test_region_outside_frame_is_an_error() {
        let frame = Frame::new(200, 100);
        let result = Pipeline::from_config(&InspectionConfig::default())
            .expect("Config should be valid")
            .process(&frame);
        assert!(matches!(result, Err(InspectError::RoiOutOfBounds { .. })));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = InspectionConfig::default();
        config.edges.blur_kernel_size = 0;
        assert!(matches!(
            Pipeline::from_config(&config),
            Err(InspectError::InvalidConfig { parameter: "edges.blur_kernel_size", .. })
        ));
    }

    #[test]
    fn test_edge_map_matches_region_size() {
        let frame = Frame::new(640, 480);
        let edges = Pipeline::from_config(&InspectionConfig::default())
            .expect("Config should be valid")
            .edge_map(&frame)
            .expect("Should build edge map");
        assert_eq!(edges.dimensions(), (300, 200));
    }
}
