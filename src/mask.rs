//! Alpha and binary masks.
//!
//! The alpha mask is derived from each pixel's RGB distance to the estimated
//! background. Colored pixels are rejected outright so only near-gray ink
//! strokes survive. A smoothstep ramp between two distance thresholds keeps
//! stroke edges anti-aliased.

use image::{GrayImage, Luma, Rgb, RgbaImage};

/// Default distance below which a pixel is fully transparent.
pub const DEFAULT_T0: f32 = 8.0;
/// Default distance above which a pixel is fully opaque.
pub const DEFAULT_T1: f32 = 40.0;
/// Default saturation (max - min channel) above which a pixel is rejected.
pub const DEFAULT_SATURATION_CUTOFF: u8 = 25;
/// Default alpha cutoff for the binary mask (strictly greater is foreground).
pub const DEFAULT_BINARY_CUTOFF: u8 = 35;

/// Parameters for [`build_alpha_mask`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskParams {
    /// Dead zone: distances below this map to alpha 0.
    pub t0: f32,
    /// Saturation zone: distances above this map to alpha 255.
    pub t1: f32,
    /// Pixels whose channel spread exceeds this are treated as colored and dropped.
    pub saturation_cutoff: u8,
}

impl Default for MaskParams {
    fn default() -> Self {
        Self {
            t0: DEFAULT_T0,
            t1: DEFAULT_T1,
            saturation_cutoff: DEFAULT_SATURATION_CUTOFF,
        }
    }
}

/// Foreground value stored in a [`BinaryMask`]'s gray image.
pub const FOREGROUND: u8 = 255;

/// A 2D grid of foreground flags, backed by a 0/255 [`GrayImage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMask {
    image: GrayImage,
}

impl BinaryMask {
    /// Create an all-background mask.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: GrayImage::new(width, height),
        }
    }

    /// Wrap a gray image, treating every non-zero pixel as foreground.
    #[must_use]
    pub fn from_gray(mut image: GrayImage) -> Self {
        for px in image.pixels_mut() {
            if px[0] != 0 {
                px[0] = FOREGROUND;
            }
        }
        Self { image }
    }

    /// The mask as a 0/255 gray image.
    #[must_use]
    pub fn as_gray(&self) -> &GrayImage {
        &self.image
    }

    /// Mask width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Mask height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Whether `(x, y)` is foreground. Out-of-bounds coordinates are background.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.image.get_pixel_checked(x, y).is_some_and(|px| px[0] != 0)
    }

    /// Set the flag at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the mask.
    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        let v = if value { FOREGROUND } else { 0 };
        self.image.put_pixel(x, y, Luma([v]));
    }

    /// Number of foreground pixels.
    #[must_use]
    pub fn count(&self) -> usize {
        self.image.pixels().filter(|px| px[0] != 0).count()
    }

    /// Whether the mask has no foreground at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.image.pixels().any(|px| px[0] != 0)
    }
}

/// Cubic ease curve `x^2 (3 - 2x)`, mapping `[0, 1]` onto `[0, 1]`.
#[must_use]
pub fn smoothstep(x: f32) -> f32 {
    x * x * (3.0 - 2.0 * x)
}

/// Map a background distance to an 8-bit opacity.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn distance_to_alpha(dist: f32, t0: f32, t1: f32) -> u8 {
    if dist < t0 {
        0
    } else if dist > t1 {
        255
    } else {
        let normalized = (dist - t0) / (t1 - t0);
        (smoothstep(normalized) * 255.0) as u8
    }
}

/// Build the soft alpha mask of `region` against `background`.
#[must_use]
pub fn build_alpha_mask(
    region: &RgbaImage,
    background: Rgb<u8>,
    params: &MaskParams,
) -> GrayImage {
    let [bg_r, bg_g, bg_b] = background.0.map(f32::from);
    let mut alpha = GrayImage::new(region.width(), region.height());

    for (x, y, px) in region.enumerate_pixels() {
        let [r, g, b, _] = px.0;
        let saturation = r.max(g).max(b) - r.min(g).min(b);
        if saturation > params.saturation_cutoff {
            continue;
        }

        let dr = f32::from(r) - bg_r;
        let dg = f32::from(g) - bg_g;
        let db = f32::from(b) - bg_b;
        let dist = (dr * dr + dg * dg + db * db).sqrt();

        let a = distance_to_alpha(dist, params.t0, params.t1);
        alpha.put_pixel(x, y, Luma([a]));
    }

    alpha
}

/// Threshold an alpha mask: values strictly above `cutoff` become foreground.
#[must_use]
pub fn threshold_alpha(alpha: &GrayImage, cutoff: u8) -> BinaryMask {
    let mut mask = BinaryMask::new(alpha.width(), alpha.height());
    for (x, y, px) in alpha.enumerate_pixels() {
        if px[0] > cutoff {
            mask.set(x, y, true);
        }
    }
    mask
}
