//! Inspection parameters.
//!
//! Every field defaults to the values the station was tuned with, so a
//! configuration file only needs to name what it changes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    algorithms::VerdictCodes,
    error::{InspectError, Result},
    types::Roi,
};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct InspectionConfig {
    /// Rectangle of the frame that is analysed
    pub roi: Roi,
    pub edges: EdgeConfig,
    pub contours: ContourConfig,
    pub verdict: VerdictConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EdgeConfig {
    /// Odd Gaussian kernel size
    #[schemars(range(min = 1))]
    pub blur_kernel_size: u32,
    /// Gaussian spread, 0 derives it from the kernel size
    #[schemars(range(min = 0.0))]
    pub blur_sigma: f32,
    /// Gradients above this are edges when connected to a strong edge
    pub low_threshold: f32,
    /// Gradients above this are always edges
    pub high_threshold: f32,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            blur_kernel_size: 5,
            blur_sigma: 0.0,
            low_threshold: 60.0,
            high_threshold: 150.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ContourConfig {
    /// Contours whose closed perimeter is not above this are ignored
    #[schemars(range(min = 0.0))]
    pub min_length: f32,
    /// Polygon approximation tolerance in pixels
    pub simplify_tolerance: f32,
    /// Contours keeping more vertices than this are zig-zag
    pub zigzag_vertex_threshold: usize,
}

impl Default for ContourConfig {
    fn default() -> Self {
        Self {
            min_length: 50.0,
            simplify_tolerance: 2.0,
            zigzag_vertex_threshold: 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct VerdictConfig {
    /// Minimum zig-zag count for a PASS
    #[schemars(range(min = 1))]
    pub pass_threshold: u32,
    /// ASCII code sent for PASS
    pub pass_code: char,
    /// ASCII code sent for FAIL
    pub fail_code: char,
}

impl Default for VerdictConfig {
    fn default() -> Self {
        Self {
            pass_threshold: 3,
            pass_code: 'P',
            fail_code: 'F',
        }
    }
}

impl VerdictConfig {
    pub fn codes(&self) -> Result<VerdictCodes> {
        let byte = |parameter: &'static str, code: char| {
            if code.is_ascii() {
                Ok(code as u8)
            } else {
                Err(InspectError::invalid(parameter, format!("'{code}' is not an ASCII character")))
            }
        };

        let codes = VerdictCodes {
            pass: byte("verdict.pass_code", self.pass_code)?,
            fail: byte("verdict.fail_code", self.fail_code)?,
        };
        if codes.pass == codes.fail {
            return Err(InspectError::invalid(
                "verdict.fail_code",
                "must differ from verdict.pass_code",
            ));
        }
        Ok(codes)
    }
}

fn finite_non_negative(parameter: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(InspectError::invalid(parameter, format!("must be a finite value >= 0, got {value}")))
    }
}

impl InspectionConfig {
    /// Check every parameter, naming the first invalid one
    pub fn validate(&self) -> Result<()> {
        if self.roi.is_empty() {
            return Err(InspectError::invalid(
                "roi",
                format!("width and height must be positive, got {}x{}", self.roi.width, self.roi.height),
            ));
        }

        let edges = &self.edges;
        if edges.blur_kernel_size == 0 || edges.blur_kernel_size % 2 == 0 {
            return Err(InspectError::invalid(
                "edges.blur_kernel_size",
                format!("must be odd and positive, got {}", edges.blur_kernel_size),
            ));
        }
        finite_non_negative("edges.blur_sigma", edges.blur_sigma)?;
        finite_non_negative("edges.low_threshold", edges.low_threshold)?;
        finite_non_negative("edges.high_threshold", edges.high_threshold)?;
        if edges.low_threshold > edges.high_threshold {
            return Err(InspectError::invalid(
                "edges.low_threshold",
                format!(
                    "{} is above edges.high_threshold {}",
                    edges.low_threshold, edges.high_threshold
                ),
            ));
        }

        let contours = &self.contours;
        finite_non_negative("contours.min_length", contours.min_length)?;
        if !(contours.simplify_tolerance.is_finite() && contours.simplify_tolerance > 0.0) {
            return Err(InspectError::invalid(
                "contours.simplify_tolerance",
                format!("must be positive, got {}", contours.simplify_tolerance),
            ));
        }

        if self.verdict.pass_threshold == 0 {
            return Err(InspectError::invalid(
                "verdict.pass_threshold",
                "must be at least 1",
            ));
        }
        self.verdict.codes()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected_parameter(config: &InspectionConfig) -> &'static str {
        match config.validate() {
            Err(InspectError::InvalidConfig { parameter, .. }) => parameter,
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = InspectionConfig::default();
        config.validate().expect("Defaults should validate");
        assert_eq!(config.roi, Roi::new(100, 50, 300, 200));
        assert_eq!(config.edges.low_threshold, 60.0);
        assert_eq!(config.edges.high_threshold, 150.0);
        assert_eq!(config.contours.min_length, 50.0);
        assert_eq!(config.contours.simplify_tolerance, 2.0);
        assert_eq!(config.contours.zigzag_vertex_threshold, 6);
        assert_eq!(config.verdict.pass_threshold, 3);
    }

    #[test]
    fn test_invalid_parameters_are_named() {
        let mut config = InspectionConfig::default();
        config.roi.width = 0;
        assert_eq!(rejected_parameter(&config), "roi");

        let mut config = InspectionConfig::default();
        config.edges.blur_kernel_size = 4;
        assert_eq!(rejected_parameter(&config), "edges.blur_kernel_size");

        let mut config = InspectionConfig::default();
        config.edges.low_threshold = 200.0;
        assert_eq!(rejected_parameter(&config), "edges.low_threshold");

        let mut config = InspectionConfig::default();
        config.edges.high_threshold = f32::NAN;
        assert_eq!(rejected_parameter(&config), "edges.high_threshold");

        let mut config = InspectionConfig::default();
        config.contours.min_length = -1.0;
        assert_eq!(rejected_parameter(&config), "contours.min_length");

        let mut config = InspectionConfig::default();
        config.contours.simplify_tolerance = 0.0;
        assert_eq!(rejected_parameter(&config), "contours.simplify_tolerance");

        let mut config = InspectionConfig::default();
        config.verdict.pass_threshold = 0;
        assert_eq!(rejected_parameter(&config), "verdict.pass_threshold");

        let mut config = InspectionConfig::default();
        config.verdict.fail_code = 'P';
        assert_eq!(rejected_parameter(&config), "verdict.fail_code");

        let mut config = InspectionConfig::default();
        config.verdict.pass_code = 'é';
        assert_eq!(rejected_parameter(&config), "verdict.pass_code");
    }

    #[test]
    fn test_codes_from_config() {
        let codes = VerdictConfig::default().codes().expect("Should convert");
        assert_eq!(codes, VerdictCodes { pass: b'P', fail: b'F' });
    }
}
