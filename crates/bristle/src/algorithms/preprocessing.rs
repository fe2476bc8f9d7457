use std::collections::VecDeque;

use image::{GenericImageView, GrayImage, Luma, Rgb};
use imageproc::{
    definitions::Image,
    filter::separable_filter_equal,
    gradients::{horizontal_sobel, vertical_sobel},
};
use crate::{
    error::{InspectError, Result},
    traits::ImagePreprocessor,
};

/// Convert a colour view to luminance using the `image` crate's fixed weights
pub fn to_grayscale<I>(image: &I) -> GrayImage
where
    I: GenericImageView<Pixel = Rgb<u8>>,
{
    image::imageops::grayscale(image)
}

/// Gaussian blur preprocessor for noise reduction
#[derive(Debug, Clone)]
pub struct GaussianBlurPreprocessor {
    /// Odd number of taps of the separable kernel, applied along both axes
    pub kernel_size: u32,
    /// Explicit spread; `0.0` derives it from `kernel_size`
    pub sigma: f32,
}

impl GaussianBlurPreprocessor {
    /// Spread used for blurring. A zero sigma falls back to the usual
    /// kernel-size rule `0.3 * ((k - 1) / 2 - 1) + 0.8`.
    pub fn effective_sigma(&self) -> f32 {
        if self.sigma > 0.0 {
            self.sigma
        } else {
            let k = self.kernel_size.max(1) as f32;
            0.3 * ((k - 1.0) * 0.5 - 1.0) + 0.8
        }
    }

    /// Normalised 1-D kernel with exactly `kernel_size` taps
    pub fn kernel(&self) -> Vec<f32> {
        let size = self.kernel_size.max(1) as usize;
        let sigma = self.effective_sigma();
        let center = (size / 2) as f32;

        let mut kernel: Vec<f32> = (0..size)
            .map(|i| {
                let d = i as f32 - center;
                (-(d * d) / (2.0 * sigma * sigma)).exp()
            })
            .collect();
        let sum: f32 = kernel.iter().sum();
        kernel.iter_mut().for_each(|weight| *weight /= sum);
        kernel
    }
}

impl Default for GaussianBlurPreprocessor {
    fn default() -> Self {
        Self { kernel_size: 5, sigma: 0.0 }
    }
}

impl ImagePreprocessor for GaussianBlurPreprocessor {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        let sigma = self.effective_sigma();
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(InspectError::ImageProcessing(format!(
                "blur sigma must be positive, got {sigma}"
            )));
        }
        if self.kernel_size % 2 == 0 {
            return Err(InspectError::ImageProcessing(format!(
                "blur kernel size must be odd, got {}",
                self.kernel_size
            )));
        }
        Ok(separable_filter_equal(image, &self.kernel()))
    }
}

/// Two-threshold gradient edge detector (Canny with hysteresis).
///
/// Runs on the image as given: smoothing is the job of a preceding
/// [`GaussianBlurPreprocessor`]. Gradients are 3x3 Sobel with an L1
/// magnitude. A pixel is an edge when it is a local maximum along its
/// gradient direction and either exceeds `high_threshold` or exceeds
/// `low_threshold` while 8-connected to such a pixel.
#[derive(Debug, Clone)]
pub struct CannyPreprocessor {
    pub low_threshold: f32,
    pub high_threshold: f32,
}

impl Default for CannyPreprocessor {
    fn default() -> Self {
        Self {
            low_threshold: 60.0,
            high_threshold: 150.0,
        }
    }
}

impl ImagePreprocessor for CannyPreprocessor {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        if self.low_threshold > self.high_threshold {
            return Err(InspectError::ImageProcessing(format!(
                "canny low threshold {} exceeds high threshold {}",
                self.low_threshold, self.high_threshold
            )));
        }

        let gx = horizontal_sobel(image);
        let gy = vertical_sobel(image);
        let candidates = non_maximum_suppression(&gx, &gy, self.low_threshold);
        Ok(hysteresis(&candidates, self.high_threshold))
    }
}

// tan(22.5°) and tan(67.5°)
const TAN_22_5: f32 = 0.414_213_57;
const TAN_67_5: f32 = 2.414_213_6;

/// Gradient magnitudes that are above `low` and are local maxima across the
/// edge; everything else is zero.
fn non_maximum_suppression(gx: &Image<Luma<i16>>, gy: &Image<Luma<i16>>, low: f32) -> Image<Luma<f32>> {
    let (width, height) = gx.dimensions();
    let magnitude: Image<Luma<f32>> = Image::from_fn(width, height, |x, y| {
        let dx = gx.get_pixel(x, y)[0] as f32;
        let dy = gy.get_pixel(x, y)[0] as f32;
        Luma([dx.abs() + dy.abs()])
    });
    let at = |x: i64, y: i64| -> f32 {
        if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
            0.0
        } else {
            magnitude.get_pixel(x as u32, y as u32)[0]
        }
    };

    Image::from_fn(width, height, |x, y| {
        let value = magnitude.get_pixel(x, y)[0];
        if value <= low {
            return Luma([0.0]);
        }

        let dx = gx.get_pixel(x, y)[0] as f32;
        let dy = gy.get_pixel(x, y)[0] as f32;
        let (ax, ay) = (dx.abs(), dy.abs());
        let (x, y) = (x as i64, y as i64);
        let (before, after) = if ay <= ax * TAN_22_5 {
            (at(x - 1, y), at(x + 1, y))
        } else if ay >= ax * TAN_67_5 {
            (at(x, y - 1), at(x, y + 1))
        } else if (dx > 0.0) == (dy > 0.0) {
            (at(x - 1, y - 1), at(x + 1, y + 1))
        } else {
            (at(x + 1, y - 1), at(x - 1, y + 1))
        };

        // Strict on one side so a plateau two pixels wide keeps one pixel
        if value > before && value >= after {
            Luma([value])
        } else {
            Luma([0.0])
        }
    })
}

/// Keep strong candidates and every candidate 8-connected to one
fn hysteresis(candidates: &Image<Luma<f32>>, high: f32) -> GrayImage {
    let (width, height) = candidates.dimensions();
    let mut edges = GrayImage::new(width, height);
    let mut queue = VecDeque::new();

    for (x, y, pixel) in candidates.enumerate_pixels() {
        if pixel[0] > high {
            edges.put_pixel(x, y, Luma([255u8]));
            queue.push_back((x, y));
        }
    }

    while let Some((x, y)) = queue.pop_front() {
        for ny in y.saturating_sub(1)..=(y + 1).min(height - 1) {
            for nx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
                if edges.get_pixel(nx, ny)[0] == 0 && candidates.get_pixel(nx, ny)[0] > 0.0 {
                    edges.put_pixel(nx, ny, Luma([255u8]));
                    queue.push_back((nx, ny));
                }
            }
        }
    }

    edges
}
