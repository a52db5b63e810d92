//! Core signature extraction pipeline.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{imageops, ExtendedColorType, GrayImage, ImageEncoder, Luma, Rgb, Rgba, RgbaImage};
use tracing::{debug, info, warn};

use crate::background::{self, estimate_background};
use crate::components::{find_components, BoundingBox, Component, ComponentFilter, Rejection};
use crate::error::{Error, Result};
use crate::mask::{self, build_alpha_mask, threshold_alpha, MaskParams};
use crate::morphology;

/// Logo read when no input path is given.
pub const DEFAULT_INPUT_PATH: &str = "public/assets/Lil Movements (LOGO).png";

/// Signature written when no output path is given.
pub const DEFAULT_OUTPUT_PATH: &str = "public/assets/lil-signature.png";

/// Tuning parameters for every stage of the pipeline.
///
/// The defaults are tuned for a signature in the top-left corner of a logo
/// printed on a light, roughly uniform background.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Fraction of the source width searched, from the left edge.
    pub region_width_ratio: f64,
    /// Fraction of the source height searched, from the top edge.
    pub region_height_ratio: f64,
    /// Depth of the border bands sampled for the background color.
    pub background_margin: u32,
    /// Sampling stride inside the border bands.
    pub background_stride: u32,
    /// Distance ramp and saturation rejection for the alpha mask.
    pub mask: MaskParams,
    /// Alpha values strictly above this are foreground in the binary mask.
    pub binary_cutoff: u8,
    /// Opening kernel size; `kernel_size / 2` erode/dilate passes.
    pub kernel_size: u32,
    /// Shape and size gates for handwriting components.
    pub filter: ComponentFilter,
    /// Gaussian sigma used to soften the rebuilt alpha; `0` disables blurring.
    pub blur_sigma: f32,
    /// Blurred alpha at or below this is fully transparent in the output.
    pub composite_alpha_cutoff: u8,
    /// Margin kept around the detected signature when cropping.
    pub padding: u32,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            region_width_ratio: 0.55,
            region_height_ratio: 0.30,
            background_margin: background::DEFAULT_MARGIN,
            background_stride: background::DEFAULT_STRIDE,
            mask: MaskParams::default(),
            binary_cutoff: mask::DEFAULT_BINARY_CUTOFF,
            kernel_size: morphology::DEFAULT_KERNEL_SIZE,
            filter: ComponentFilter::default(),
            blur_sigma: 0.6,
            composite_alpha_cutoff: 10,
            padding: 25,
        }
    }
}

impl ExtractOptions {
    /// Reject parameter combinations the pipeline cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOptions`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let ratio_ok = |r: f64| r > 0.0 && r <= 1.0;
        if !ratio_ok(self.region_width_ratio) || !ratio_ok(self.region_height_ratio) {
            return Err(Error::InvalidOptions(format!(
                "region ratios must be in (0, 1], got {}x{}",
                self.region_width_ratio, self.region_height_ratio
            )));
        }
        if self.background_stride == 0 {
            return Err(Error::InvalidOptions("background stride must be non-zero".into()));
        }
        if !(self.mask.t0.is_finite() && self.mask.t1.is_finite()) || self.mask.t1 <= self.mask.t0 {
            return Err(Error::InvalidOptions(format!(
                "distance thresholds must satisfy t0 < t1, got t0={} t1={}",
                self.mask.t0, self.mask.t1
            )));
        }
        if self.filter.min_area > self.filter.max_area {
            return Err(Error::InvalidOptions(format!(
                "component area range is empty: [{}, {}]",
                self.filter.min_area, self.filter.max_area
            )));
        }
        if !self.blur_sigma.is_finite() || self.blur_sigma < 0.0 {
            return Err(Error::InvalidOptions(format!(
                "blur sigma must be a non-negative number, got {}",
                self.blur_sigma
            )));
        }
        Ok(())
    }
}

/// Summary of one extraction run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionReport {
    /// Dimensions of the decoded source image.
    pub source_size: (u32, u32),
    /// Dimensions of the searched top-left region.
    pub region_size: (u32, u32),
    /// Estimated paper color.
    pub background: Rgb<u8>,
    /// Components found after morphological cleanup.
    pub components_found: usize,
    /// Components accepted as handwriting.
    pub components_kept: usize,
    /// Tight box of visible output pixels in region coordinates, before padding.
    /// `None` when nothing survived filtering.
    pub bbox: Option<BoundingBox>,
    /// Dimensions of the image that is (or would be) saved.
    pub output_size: (u32, u32),
    /// Size of the written PNG, set by [`SignatureExtractor::extract_file`].
    pub bytes_written: Option<u64>,
}

impl ExtractionReport {
    /// Whether any signature pixels were found.
    #[must_use]
    pub fn found_signature(&self) -> bool {
        self.bbox.is_some()
    }
}

/// Output of [`SignatureExtractor::extract`].
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Cropped RGBA signature, or the full transparent region when nothing was found.
    pub image: RgbaImage,
    /// What happened along the way.
    pub report: ExtractionReport,
}

/// Signature extraction pipeline holding validated options.
///
/// Create once with [`SignatureExtractor::new()`]; extraction is pure and
/// deterministic, so repeated runs on the same input give identical output.
#[derive(Debug, Clone, Default)]
pub struct SignatureExtractor {
    options: ExtractOptions,
}

impl SignatureExtractor {
    /// Create an extractor after validating `options`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOptions`] if a parameter is out of range.
    pub fn new(options: ExtractOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// The options this extractor runs with.
    #[must_use]
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Run the whole pipeline on an in-memory image.
    #[must_use]
    pub fn extract(&self, image: &RgbaImage) -> Extraction {
        let opts = &self.options;
        let source_size = image.dimensions();
        info!("Original image size: {}x{}", source_size.0, source_size.1);

        let region = select_region(image, opts.region_width_ratio, opts.region_height_ratio);
        let (region_w, region_h) = region.dimensions();
        info!("Signature search region: {region_w}x{region_h}");

        let background =
            estimate_background(&region, opts.background_margin, opts.background_stride);
        let [bg_r, bg_g, bg_b] = background.0;
        info!("Estimated background color: RGB({bg_r}, {bg_g}, {bg_b})");

        let alpha = build_alpha_mask(&region, background, &opts.mask);
        debug!(
            t0 = opts.mask.t0,
            t1 = opts.mask.t1,
            saturation_cutoff = opts.mask.saturation_cutoff,
            "Initial alpha mask created"
        );

        let binary = threshold_alpha(&alpha, opts.binary_cutoff);
        debug!(
            "Binary mask created (threshold: {}, {} foreground pixels)",
            opts.binary_cutoff,
            binary.count()
        );

        let cleaned = morphology::clean(&binary, opts.kernel_size);
        debug!(
            "Morphological opening + erosion applied ({} foreground pixels left)",
            cleaned.count()
        );

        let components = find_components(&cleaned);
        info!("Found {} connected components", components.len());

        let kept: Vec<&Component> = components
            .iter()
            .filter(|comp| match opts.filter.check(comp, region_w, region_h) {
                Ok(()) => true,
                Err(Rejection::FrameArtifact) => {
                    warn!(
                        "Rejecting large rectangle artifact: {}x{}",
                        comp.bbox.width(),
                        comp.bbox.height()
                    );
                    false
                }
                Err(reason) => {
                    debug!(?reason, area = comp.area(), "Rejecting component");
                    false
                }
            })
            .collect();
        info!("Kept {} handwriting components", kept.len());

        let composited = composite(&region, &kept, opts.blur_sigma, opts.composite_alpha_cutoff);

        let bbox = alpha_bounding_box(&composited);
        let image = if let Some(bbox) = bbox {
            let crop = bbox.padded(opts.padding, region_w, region_h);
            let cropped = imageops::crop_imm(
                &composited,
                crop.min_x,
                crop.min_y,
                crop.width(),
                crop.height(),
            )
            .to_image();
            info!("Final signature size: {}x{}", cropped.width(), cropped.height());
            cropped
        } else {
            warn!("No signature detected after filtering");
            composited
        };

        let report = ExtractionReport {
            source_size,
            region_size: (region_w, region_h),
            background,
            components_found: components.len(),
            components_kept: kept.len(),
            bbox,
            output_size: image.dimensions(),
            bytes_written: None,
        };

        Extraction { image, report }
    }

    /// Load `input`, extract the signature, and write it to `output` as PNG.
    ///
    /// The output's parent directory is created if needed. Finding no
    /// signature is not an error: the transparent region is still written and
    /// the returned report has no bounding box.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InputNotFound`] before any work if `input` is missing,
    /// or an [`Error::Image`] / [`Error::Io`] if decoding or writing fails.
    pub fn extract_file(&self, input: &Path, output: &Path) -> Result<ExtractionReport> {
        if !input.exists() {
            return Err(Error::InputNotFound(input.to_path_buf()));
        }

        let source = image::open(input)?.to_rgba8();
        let Extraction { image, mut report } = self.extract(&source);

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        save_png(&image, output)?;
        let bytes = std::fs::metadata(output)?.len();
        info!("Signature extracted to: {}", output.display());
        #[allow(clippy::cast_precision_loss)]
        {
            info!("File size: {:.1} KB", bytes as f64 / 1024.0);
        }

        report.bytes_written = Some(bytes);
        Ok(report)
    }
}

/// Crop the top-left `width_ratio` x `height_ratio` share of `image`.
///
/// Dimensions are truncated towards zero.
#[must_use]
pub fn select_region(image: &RgbaImage, width_ratio: f64, height_ratio: f64) -> RgbaImage {
    let (width, height) = image.dimensions();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (crop_w, crop_h) = (
        ((f64::from(width) * width_ratio) as u32).min(width),
        ((f64::from(height) * height_ratio) as u32).min(height),
    );
    imageops::crop_imm(image, 0, 0, crop_w, crop_h).to_image()
}

/// Rebuild the region's alpha from the kept components and composite the
/// original colors under it.
///
/// Kept pixels start fully opaque, the alpha is softened with a Gaussian blur
/// of `sigma`, and pixels whose blurred alpha does not exceed `alpha_cutoff`
/// stay fully transparent. Component pixels outside `region` are ignored.
#[must_use]
pub fn composite(
    region: &RgbaImage,
    kept: &[&Component],
    sigma: f32,
    alpha_cutoff: u8,
) -> RgbaImage {
    let (width, height) = region.dimensions();
    let mut alpha = GrayImage::new(width, height);
    for comp in kept {
        for &(x, y) in &comp.pixels {
            if let Some(px) = alpha.get_pixel_mut_checked(x, y) {
                *px = Luma([255]);
            }
        }
    }

    if sigma > 0.0 && width > 0 && height > 0 {
        alpha = imageops::blur(&alpha, sigma);
    }

    let mut out = RgbaImage::new(width, height);
    for (x, y, a) in alpha.enumerate_pixels() {
        let a = a[0];
        if a > alpha_cutoff {
            let [r, g, b, _] = region.get_pixel(x, y).0;
            out.put_pixel(x, y, Rgba([r, g, b, a]));
        }
    }
    out
}

/// Tight box around every pixel with non-zero alpha, `None` if fully transparent.
#[must_use]
pub fn alpha_bounding_box(image: &RgbaImage) -> Option<BoundingBox> {
    image
        .enumerate_pixels()
        .filter(|(_, _, px)| px[3] > 0)
        .fold(None, |bbox: Option<BoundingBox>, (x, y, _)| {
            Some(match bbox {
                Some(mut b) => {
                    b.include(x, y);
                    b
                }
                None => BoundingBox::point(x, y),
            })
        })
}

/// Encode an RGBA image as a maximally compressed PNG.
///
/// # Errors
///
/// Returns an error if the encoder rejects the image (e.g. zero dimensions).
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_png(image, &mut buf)?;
    Ok(buf)
}

/// Save an RGBA image as a maximally compressed PNG at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be created or encoding fails.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_png(image, &mut writer)?;
    writer.flush()?;
    Ok(())
}

fn write_png<W: Write>(image: &RgbaImage, writer: W) -> Result<()> {
    let encoder = PngEncoder::new_with_quality(writer, CompressionType::Best, FilterType::Adaptive);
    encoder.write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(())
}

/// Resolve the CLI's optional paths against the fixed defaults.
#[must_use]
pub fn resolve_paths(input: Option<&Path>, output: Option<&Path>) -> (PathBuf, PathBuf) {
    (
        input.map_or_else(|| PathBuf::from(DEFAULT_INPUT_PATH), Path::to_path_buf),
        output.map_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH), Path::to_path_buf),
    )
}
