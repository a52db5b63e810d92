//! Connected components and the handwriting filter.
//!
//! Components are grown with an explicit-stack flood fill over 8-connected
//! neighbours, so large strokes never exhaust the call stack.

use crate::mask::BinaryMask;

/// Axis-aligned bounding box with inclusive corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    /// Leftmost column.
    pub min_x: u32,
    /// Topmost row.
    pub min_y: u32,
    /// Rightmost column (inclusive).
    pub max_x: u32,
    /// Bottom row (inclusive).
    pub max_y: u32,
}

impl BoundingBox {
    /// Box covering a single pixel.
    #[must_use]
    pub fn point(x: u32, y: u32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    /// Grow the box to include `(x, y)`.
    pub fn include(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    /// Expand by `padding` on every side, clamped to a `width` x `height` area.
    ///
    /// The box must lie inside that area.
    #[must_use]
    pub fn padded(&self, padding: u32, width: u32, height: u32) -> Self {
        Self {
            min_x: self.min_x.saturating_sub(padding),
            min_y: self.min_y.saturating_sub(padding),
            max_x: self.max_x.saturating_add(padding).min(width.saturating_sub(1)),
            max_y: self.max_y.saturating_add(padding).min(height.saturating_sub(1)),
        }
    }
}

/// One 8-connected foreground region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Every pixel of the region, in discovery order.
    pub pixels: Vec<(u32, u32)>,
    /// Tight bounding box of `pixels`.
    pub bbox: BoundingBox,
}

impl Component {
    /// Pixel count.
    #[must_use]
    pub fn area(&self) -> usize {
        self.pixels.len()
    }
}

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

/// Label every 8-connected foreground region of `mask`.
///
/// Seeds are taken in row-major order; each foreground pixel lands in exactly
/// one component.
#[must_use]
pub fn find_components(mask: &BinaryMask) -> Vec<Component> {
    let (width, height) = (mask.width(), mask.height());
    let mut visited = vec![false; width as usize * height as usize];
    let idx = |x: u32, y: u32| y as usize * width as usize + x as usize;
    let mut components = Vec::new();
    let mut stack = Vec::new();

    for seed_y in 0..height {
        for seed_x in 0..width {
            if visited[idx(seed_x, seed_y)] || !mask.get(seed_x, seed_y) {
                continue;
            }

            visited[idx(seed_x, seed_y)] = true;
            stack.push((seed_x, seed_y));
            let mut pixels = Vec::new();
            let mut bbox = BoundingBox::point(seed_x, seed_y);

            while let Some((x, y)) = stack.pop() {
                pixels.push((x, y));
                bbox.include(x, y);

                for (dx, dy) in NEIGHBOURS {
                    let nx = i64::from(x) + dx;
                    let ny = i64::from(y) + dy;
                    let (Ok(nx), Ok(ny)) = (u32::try_from(nx), u32::try_from(ny)) else {
                        continue;
                    };
                    if nx >= width || ny >= height {
                        continue;
                    }
                    let n = idx(nx, ny);
                    if !visited[n] && mask.get(nx, ny) {
                        visited[n] = true;
                        stack.push((nx, ny));
                    }
                }
            }

            components.push(Component { pixels, bbox });
        }
    }

    components
}

/// Why a component was not kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Area below the minimum (speckle) or above the maximum.
    Area,
    /// Taller than the allowed share of the region.
    TooTall,
    /// Narrower than the required share of the region.
    TooNarrow,
    /// Spans nearly the whole region, i.e. a background frame.
    FrameArtifact,
}

/// Shape and size gates separating handwriting from noise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentFilter {
    /// Minimum area, inclusive.
    pub min_area: usize,
    /// Maximum area, inclusive.
    pub max_area: usize,
    /// Largest allowed bbox height as a fraction of region height.
    pub max_height_ratio: f64,
    /// Smallest allowed bbox width as a fraction of region width.
    pub min_width_ratio: f64,
    /// Width fraction at or above which a component may be a frame.
    pub frame_width_ratio: f64,
    /// Height fraction at or above which a component may be a frame.
    pub frame_height_ratio: f64,
}

impl Default for ComponentFilter {
    fn default() -> Self {
        Self {
            min_area: 200,
            max_area: 200_000,
            max_height_ratio: 0.55,
            min_width_ratio: 0.25,
            frame_width_ratio: 0.85,
            frame_height_ratio: 0.70,
        }
    }
}

impl ComponentFilter {
    /// Check `component` against every gate, returning the first one it fails.
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] reason when the component is not handwriting.
    pub fn check(
        &self,
        component: &Component,
        region_width: u32,
        region_height: u32,
    ) -> Result<(), Rejection> {
        let area = component.area();
        if area < self.min_area || area > self.max_area {
            return Err(Rejection::Area);
        }

        let bbox_w = f64::from(component.bbox.width());
        let bbox_h = f64::from(component.bbox.height());
        let region_w = f64::from(region_width);
        let region_h = f64::from(region_height);

        if bbox_h > region_h * self.max_height_ratio {
            return Err(Rejection::TooTall);
        }
        if bbox_w < region_w * self.min_width_ratio {
            return Err(Rejection::TooNarrow);
        }
        if bbox_w >= region_w * self.frame_width_ratio
            && bbox_h >= region_h * self.frame_height_ratio
        {
            return Err(Rejection::FrameArtifact);
        }

        Ok(())
    }

    /// Whether `component` passes every gate.
    #[must_use]
    pub fn is_handwriting(
        &self,
        component: &Component,
        region_width: u32,
        region_height: u32,
    ) -> bool {
        self.check(component, region_width, region_height).is_ok()
    }
}
