//! Extract a handwritten signature from a logo image as a transparent PNG.
//!
//! The signature is isolated by its distance from the estimated paper color,
//! cleaned up with binary morphology, and separated from noise and logo
//! artwork by connected-component analysis. Only near-gray (ink) pixels are
//! considered, so colored logo elements never leak into the result.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use signature_extractor::{ExtractOptions, SignatureExtractor};
//!
//! let extractor = SignatureExtractor::new(ExtractOptions::default()).expect("valid options");
//! let report = extractor
//!     .extract_file(Path::new("logo.png"), Path::new("signature.png"))
//!     .expect("extraction failed");
//! println!("kept {} components", report.components_kept);
//! ```
//!
//! # Pipeline
//!
//! 1. Crop the top-left search region ([`select_region`]).
//! 2. Estimate the background color from the region's border bands
//!    ([`background::estimate_background`]).
//! 3. Build a soft alpha mask from background distance ([`mask::build_alpha_mask`]).
//! 4. Threshold, open and erode ([`morphology::clean`]), then label and filter
//!    8-connected components ([`components`]).
//! 5. Rebuild and blur the alpha, composite, autocrop with padding, and save.
//!
//! Finding nothing is a soft outcome: the report carries no bounding box and a
//! fully transparent image is still produced.

#![deny(missing_docs)]

pub mod background;
pub mod components;
pub mod error;
mod extractor;
pub mod mask;
pub mod morphology;

pub use components::{BoundingBox, Component, ComponentFilter, Rejection};
pub use error::{Error, Result};
pub use extractor::{
    alpha_bounding_box, composite, encode_png, resolve_paths, save_png, select_region, Extraction,
    ExtractOptions, ExtractionReport, SignatureExtractor, DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH,
};
pub use mask::{BinaryMask, MaskParams};
