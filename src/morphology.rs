//! Binary morphology with a 3x3 square structuring element.
//!
//! Masks are filtered as 0/255 gray images with `imageproc`, using the
//! chessboard (L-infinity) norm so that radius 1 is exactly a 3x3 min/max
//! filter. Neighbours outside the mask are ignored: a foreground pixel on the
//! image border is not eroded just for touching the border.

use image::GrayImage;
use imageproc::distance_transform::Norm;
use imageproc::morphology;

use crate::mask::BinaryMask;

/// Default kernel size for the opening step.
pub const DEFAULT_KERNEL_SIZE: u32 = 3;

/// Run an `imageproc` filter over the mask's gray image. Empty masks pass through.
fn apply<F>(mask: &BinaryMask, filter: F) -> BinaryMask
where
    F: FnOnce(&GrayImage) -> GrayImage,
{
    if mask.width() == 0 || mask.height() == 0 {
        return mask.clone();
    }
    BinaryMask::from_gray(filter(mask.as_gray()))
}

/// 3x3 minimum filter: a pixel stays foreground only if its whole neighbourhood is.
#[must_use]
pub fn erode(mask: &BinaryMask) -> BinaryMask {
    apply(mask, |gray| morphology::erode(gray, Norm::LInf, 1))
}

/// 3x3 maximum filter: a pixel becomes foreground if any neighbour is.
#[must_use]
pub fn dilate(mask: &BinaryMask) -> BinaryMask {
    apply(mask, |gray| morphology::dilate(gray, Norm::LInf, 1))
}

/// Morphological opening: `kernel_size / 2` erosions, then as many dilations.
///
/// Under the L-infinity norm, `n` chained 3x3 passes equal one pass of radius `n`.
#[must_use]
pub fn open(mask: &BinaryMask, kernel_size: u32) -> BinaryMask {
    let radius = u8::try_from(kernel_size / 2).unwrap_or(u8::MAX);
    if radius == 0 {
        return mask.clone();
    }
    apply(mask, |gray| morphology::open(gray, Norm::LInf, radius))
}

/// Opening followed by one extra erosion to strip single-pixel borders left
/// by the low binary threshold.
#[must_use]
pub fn clean(mask: &BinaryMask, kernel_size: u32) -> BinaryMask {
    erode(&open(mask, kernel_size))
}
