//! Background color estimation.
//!
//! The signature sits on a flat-ish paper color. The top and left bands of the
//! search region are assumed free of strokes, so a sparse grid of samples from
//! those bands gives a robust per-channel median.

use image::{Rgb, RgbaImage};

/// Default depth of the sampled border bands, in pixels.
pub const DEFAULT_MARGIN: u32 = 60;

/// Default sampling stride inside the border bands.
pub const DEFAULT_STRIDE: u32 = 5;

/// Fallback color when the region yields no samples.
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Estimate the background color of `region` from its top and left bands.
///
/// Samples every `stride`-th pixel of:
/// - the top band, `2 * margin` wide and `margin` tall;
/// - the left band, `margin` wide and the full region height.
///
/// The overlap of both bands is sampled twice. Each channel's median is the
/// element at index `len / 2` of the sorted samples. Returns white for an
/// empty region.
#[must_use]
pub fn estimate_background(region: &RgbaImage, margin: u32, stride: u32) -> Rgb<u8> {
    let (width, height) = region.dimensions();
    let step = stride.max(1) as usize;

    let top_band = (0..margin.saturating_mul(2).min(width))
        .step_by(step)
        .flat_map(|x| (0..margin.min(height)).step_by(step).map(move |y| (x, y)));
    let left_band = (0..margin.min(width))
        .step_by(step)
        .flat_map(|x| (0..height).step_by(step).map(move |y| (x, y)));

    let mut reds = Vec::new();
    let mut greens = Vec::new();
    let mut blues = Vec::new();
    for (x, y) in top_band.chain(left_band) {
        let px = region.get_pixel(x, y);
        reds.push(px[0]);
        greens.push(px[1]);
        blues.push(px[2]);
    }

    match (median(reds), median(greens), median(blues)) {
        (Some(r), Some(g), Some(b)) => Rgb([r, g, b]),
        _ => WHITE,
    }
}

/// Upper median of a sample set, `None` when empty.
fn median(mut values: Vec<u8>) -> Option<u8> {
    values.sort_unstable();
    values.get(values.len() / 2).copied()
}
