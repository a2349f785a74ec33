//! How far apart are two renders?
//!
//! The metric walks the region both bitmaps share and sums the per-pixel
//! intensity differences. The sum is normalized against the largest
//! difference four 8-bit channels could produce, so a score of `1.0` means
//! every compared pixel flipped completely.
//!
//! Pixels outside the shared region are not compared: a render that only
//! grew or shrank is scored on the area both versions cover.

use serde::Serialize;

use crate::types::{BitmapData, Pixel};

/// Largest per-pixel difference the normalization assumes
const MAX_PIXEL_DELTA: f64 = 256.0 * 4.0;

/// Result of comparing two bitmaps
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PixelDiff {
    /// Normalized dissimilarity, 0.0 for identical renders
    pub score: f64,
    /// One magnitude per compared pixel, x outer then y
    pub diff_map: Vec<u32>,
}

impl PixelDiff {
    /// True when no compared pixel differs
    pub fn is_identical(&self) -> bool {
        self.diff_map.iter().all(|&m| m == 0)
    }
}

/// Compare two rendered bitmaps over their overlapping region
pub fn pixel_diff(a: &BitmapData, b: &BitmapData) -> PixelDiff {
    let width = a.width.min(b.width);
    let height = a.height.min(b.height);

    let mut total: u64 = 0;
    let mut diff_map = Vec::with_capacity(width as usize * height as usize);

    for x in 0..width {
        for y in 0..height {
            let magnitude = match (a.pixel(x, y), b.pixel(x, y)) {
                (Some(pa), Some(pb)) => pixel_delta(pa, pb),
                // Short data buffers compare as blank
                (pa, pb) => pixel_delta(
                    pa.unwrap_or(Pixel::Gray(0)),
                    pb.unwrap_or(Pixel::Gray(0)),
                ),
            };
            total += u64::from(magnitude);
            diff_map.push(magnitude);
        }
    }

    let area = u64::from(width) * u64::from(height);
    let score = if area == 0 {
        0.0
    } else {
        total as f64 / (area as f64 * MAX_PIXEL_DELTA)
    };

    PixelDiff { score, diff_map }
}

/// Difference between two pixels: plain for gray, channel sum otherwise
fn pixel_delta(a: Pixel, b: Pixel) -> u32 {
    match (a, b) {
        (Pixel::Gray(va), Pixel::Gray(vb)) => u32::from(va.abs_diff(vb)),
        (pa, pb) => pa
            .to_rgba()
            .iter()
            .zip(pb.to_rgba().iter())
            .map(|(ca, cb)| u32::from(ca.abs_diff(*cb)))
            .sum(),
    }
}
