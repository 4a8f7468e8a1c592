//! Bright-object detection.
//!
//! Finds the ball (or any bright marker) in a frame: the intensity image is
//! binarized at a fixed threshold, bright pixels are grouped into 8-connected
//! regions, and the centroid of the largest region is reported if that region
//! is big enough to be more than noise.

use image::GrayImage;
use pitchlens_analysis_model::geometry::Point2D;
use pitchlens_analysis_model::motion::Centroid;
use pitchlens_frame_source::Frame;

/// Default binarization threshold.
pub const DEFAULT_THRESHOLD: u8 = 200;

/// Threshold for footage with strong glare or a white pitch surround.
pub const HIGH_GLARE_THRESHOLD: u8 = 240;

/// Default minimum region area in pixels.
pub const DEFAULT_MIN_AREA: usize = 50;

const NEIGHBOURS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Configuration for [`MotionDetector`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionConfig {
    /// Pixels strictly brighter than this are foreground.
    pub threshold: u8,
    /// A region must cover more than this many pixels to count.
    pub min_area: usize,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            min_area: DEFAULT_MIN_AREA,
        }
    }
}

impl MotionConfig {
    pub fn high_glare() -> Self {
        Self {
            threshold: HIGH_GLARE_THRESHOLD,
            ..Self::default()
        }
    }
}

/// One connected bright region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrightRegion {
    /// Pixel count.
    pub area: usize,
    /// Raster position (row-major) of the region's first pixel.
    pub first_pixel: usize,
    sum_x: f64,
    sum_y: f64,
}

impl BrightRegion {
    /// First-order moment with binary mass.
    pub fn centroid(&self) -> Point2D {
        let mass = self.area as f64;
        Point2D::new(self.sum_x / mass, self.sum_y / mass)
    }
}

/// Stateless per-frame detector.
#[derive(Debug, Clone, Default)]
pub struct MotionDetector {
    config: MotionConfig,
}

impl MotionDetector {
    pub fn new(config: MotionConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(MotionConfig::default())
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Detect the object in a decoded frame.
    pub fn detect_frame(&self, frame: &Frame) -> Option<Centroid> {
        self.detect(frame.index, &frame.luma())
    }

    /// Detect the object in an intensity image.
    ///
    /// Returns `None` when no region exceeds `min_area`.
    pub fn detect(&self, frame_index: u64, luma: &GrayImage) -> Option<Centroid> {
        let mut best: Option<BrightRegion> = None;
        for region in self.regions(luma) {
            // Regions arrive in raster order, so `>` keeps the first of equal areas.
            if best.map_or(true, |b| region.area > b.area) {
                best = Some(region);
            }
        }

        let region = best.filter(|r| r.area > self.config.min_area)?;
        Some(Centroid {
            frame_index,
            position: region.centroid(),
            area: region.area,
        })
    }

    /// Label every 8-connected region of above-threshold pixels.
    ///
    /// Regions are ordered by the raster position of their first pixel.
    pub fn regions(&self, luma: &GrayImage) -> Vec<BrightRegion> {
        let (width, height) = luma.dimensions();
        let (w, h) = (width as usize, height as usize);
        let pixels = luma.as_raw();
        let threshold = self.config.threshold;

        let mut visited = vec![false; w * h];
        let mut stack: Vec<usize> = Vec::new();
        let mut regions = Vec::new();

        for start in 0..w * h {
            if visited[start] || pixels[start] <= threshold {
                continue;
            }

            visited[start] = true;
            stack.push(start);
            let mut region = BrightRegion {
                area: 0,
                first_pixel: start,
                sum_x: 0.0,
                sum_y: 0.0,
            };

            while let Some(idx) = stack.pop() {
                let (x, y) = (idx % w, idx / w);
                region.area += 1;
                region.sum_x += x as f64;
                region.sum_y += y as f64;

                for (dx, dy) in NEIGHBOURS {
                    let nx = x as i64 + dx;
                    let ny = y as i64 + dy;
                    if nx < 0 || ny < 0 || nx >= w as i64 || ny >= h as i64 {
                        continue;
                    }
                    let n = ny as usize * w + nx as usize;
                    if !visited[n] && pixels[n] > threshold {
                        visited[n] = true;
                        stack.push(n);
                    }
                }
            }

            regions.push(region);
        }

        regions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};

    fn with_square(width: u32, height: u32, x0: u32, y0: u32, size: u32, value: u8) -> GrayImage {
        let mut img = GrayImage::from_pixel(width, height, Luma([10]));
        for y in y0..y0 + size {
            for x in x0..x0 + size {
                img.put_pixel(x, y, Luma([value]));
            }
        }
        img
    }

    #[test]
    fn test_detects_square_centroid() {
        let img = with_square(64, 48, 10, 20, 10, 255);
        let centroid = MotionDetector::with_defaults().detect(7, &img).unwrap();
        assert_eq!(centroid.frame_index, 7);
        assert_eq!(centroid.area, 100);
        assert!((centroid.position.x - 14.5).abs() < 1e-9);
        assert!((centroid.position.y - 24.5).abs() < 1e-9);
    }

    #[test]
    fn test_dark_frame_has_no_centroid() {
        let img = GrayImage::from_pixel(32, 32, Luma([0]));
        assert!(MotionDetector::with_defaults().detect(0, &img).is_none());
    }

    #[test]
    fn test_small_region_rejected() {
        // 7x7 = 49 pixels, not more than the default min_area of 50
        let img = with_square(32, 32, 4, 4, 7, 255);
        assert!(MotionDetector::with_defaults().detect(0, &img).is_none());

        let lenient = MotionDetector::new(MotionConfig {
            min_area: 10,
            ..MotionConfig::default()
        });
        assert!(lenient.detect(0, &img).is_some());
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let img = with_square(32, 32, 0, 0, 10, DEFAULT_THRESHOLD);
        assert!(MotionDetector::with_defaults().detect(0, &img).is_none());
    }

    #[test]
    fn test_high_glare_ignores_moderate_brightness() {
        let img = with_square(32, 32, 0, 0, 10, 220);
        assert!(MotionDetector::with_defaults().detect(0, &img).is_some());
        assert!(MotionDetector::new(MotionConfig::high_glare())
            .detect(0, &img)
            .is_none());
    }

    #[test]
    fn test_largest_region_wins() {
        let mut img = with_square(80, 40, 2, 2, 8, 255);
        for y in 10..22 {
            for x in 50..62 {
                img.put_pixel(x, y, Luma([255]));
            }
        }
        let centroid = MotionDetector::with_defaults().detect(0, &img).unwrap();
        assert_eq!(centroid.area, 144);
        assert!((centroid.position.x - 55.5).abs() < 1e-9);
    }

    #[test]
    fn test_diagonal_pixels_are_connected() {
        let mut img = GrayImage::from_pixel(8, 8, Luma([0]));
        for i in 0..8 {
            img.put_pixel(i, i, Luma([255]));
        }
        let regions = MotionDetector::with_defaults().regions(&img);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].area, 8);
    }

    #[test]
    fn test_equal_regions_resolve_to_first_in_raster_order() {
        let mut img = with_square(60, 30, 40, 2, 8, 255);
        for y in 15..23 {
            for x in 2..10 {
                img.put_pixel(x, y, Luma([255]));
            }
        }
        let centroid = MotionDetector::with_defaults().detect(0, &img).unwrap();
        // The right-hand square starts on an earlier row.
        assert!((centroid.position.x - 43.5).abs() < 1e-9);
    }

    #[test]
    fn test_detect_frame_uses_frame_index() {
        let image = RgbImage::from_fn(32, 32, |x, y| {
            if (8..18).contains(&x) && (8..18).contains(&y) {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        });
        let frame = Frame::new(42, 1.4, image);
        let centroid = MotionDetector::with_defaults().detect_frame(&frame).unwrap();
        assert_eq!(centroid.frame_index, 42);
        assert!((centroid.position.x - 12.5).abs() < 1e-9);
    }
}
