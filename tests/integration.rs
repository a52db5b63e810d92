use image::{Rgb, Rgba, RgbaImage};
use signature_extractor::{encode_png, BoundingBox, Error, ExtractOptions, SignatureExtractor};

const PAPER: Rgba<u8> = Rgba([245, 242, 236, 255]);
const INK: Rgba<u8> = Rgba([60, 60, 60, 255]);
const LOGO_RED: Rgba<u8> = Rgba([200, 30, 40, 255]);

/// 800x600 source; the search region is its top-left 440x180.
fn paper() -> RgbaImage {
    RgbaImage::from_pixel(800, 600, PAPER)
}

fn fill(img: &mut RgbaImage, bbox: BoundingBox, color: Rgba<u8>) {
    for y in bbox.min_y..=bbox.max_y {
        for x in bbox.min_x..=bbox.max_x {
            img.put_pixel(x, y, color);
        }
    }
}

fn rect(min_x: u32, min_y: u32, max_x: u32, max_y: u32) -> BoundingBox {
    BoundingBox {
        min_x,
        min_y,
        max_x,
        max_y,
    }
}

#[test]
fn blank_paper_yields_empty_transparent_output() {
    let extractor = SignatureExtractor::default();
    let result = extractor.extract(&paper());

    assert_eq!(result.report.region_size, (440, 180));
    assert_eq!(result.report.background, Rgb([245, 242, 236]));
    assert_eq!(result.report.components_found, 0);
    assert_eq!(result.report.components_kept, 0);
    assert!(result.report.bbox.is_none());
    assert!(!result.report.found_signature());
    // Soft failure: the uncropped, fully transparent region is still produced.
    assert_eq!(result.image.dimensions(), (440, 180));
    assert!(result.image.pixels().all(|p| p[3] == 0));
}

#[test]
fn single_gray_stroke_is_kept_with_exact_bbox() {
    let mut img = paper();
    let blob = rect(150, 70, 349, 109);
    fill(&mut img, blob, INK);

    let result = SignatureExtractor::default().extract(&img);

    assert_eq!(result.report.components_found, 1);
    assert_eq!(result.report.components_kept, 1);
    assert_eq!(result.report.bbox, Some(blob));
    // 25px padding on every side.
    assert_eq!(result.image.dimensions(), (250, 90));
    assert_eq!(result.report.output_size, (250, 90));
    // Stroke interior keeps its original color, effectively opaque.
    let center = result.image.get_pixel(125, 45);
    assert_eq!(center.0[..3], INK.0[..3]);
    assert!(center[3] >= 250, "interior alpha {}", center[3]);
    // Padding is transparent.
    assert_eq!(result.image.get_pixel(0, 0)[3], 0);
}

#[test]
fn colored_logo_and_specks_are_dropped() {
    let mut img = paper();
    let blob = rect(150, 70, 349, 109);
    fill(&mut img, blob, INK);
    // Red artwork is rejected by saturation.
    fill(&mut img, rect(200, 130, 400, 170), LOGO_RED);
    // A small dark speck is removed by the opening.
    fill(&mut img, rect(100, 150, 101, 151), INK);
    // A one-pixel hairline is removed as well.
    fill(&mut img, rect(60, 20, 430, 20), INK);

    let result = SignatureExtractor::default().extract(&img);

    assert_eq!(result.report.components_kept, 1);
    assert_eq!(result.report.bbox, Some(blob));
}

#[test]
fn small_marks_are_filtered_out() {
    let mut img = paper();
    // Survives cleanup but is far narrower than a quarter of the region.
    fill(&mut img, rect(200, 80, 239, 119), INK);

    let result = SignatureExtractor::default().extract(&img);

    assert_eq!(result.report.components_found, 1);
    assert_eq!(result.report.components_kept, 0);
    assert!(result.report.bbox.is_none());
}

#[test]
fn padding_is_clamped_at_region_edges() {
    let mut img = paper();
    // Bottom-right corner of the 440x180 region.
    let blob = rect(300, 150, 435, 172);
    fill(&mut img, blob, INK);

    let result = SignatureExtractor::default().extract(&img);

    assert_eq!(result.report.bbox, Some(blob));
    let (w, h) = result.image.dimensions();
    let (region_w, region_h) = result.report.region_size;
    assert!(w <= region_w && h <= region_h);
    // x: 275..=439, y: 125..=179
    assert_eq!((w, h), (165, 55));
}

#[test]
fn extraction_is_deterministic() {
    let mut img = paper();
    fill(&mut img, rect(150, 70, 349, 109), INK);
    fill(&mut img, rect(160, 120, 300, 140), Rgba([90, 88, 92, 255]));

    let extractor = SignatureExtractor::default();
    let first = encode_png(&extractor.extract(&img).image).unwrap();
    let second = encode_png(&extractor.extract(&img).image).unwrap();
    assert_eq!(first, second);
}

#[test]
fn custom_padding_changes_crop() {
    let mut img = paper();
    fill(&mut img, rect(150, 70, 349, 109), INK);

    let extractor = SignatureExtractor::new(ExtractOptions {
        padding: 0,
        ..ExtractOptions::default()
    })
    .unwrap();
    let result = extractor.extract(&img);
    assert_eq!(result.image.dimensions(), (200, 40));
}

#[test]
fn extract_file_writes_png() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("logo.png");
    let output = dir.path().join("nested/assets/signature.png");

    let mut img = paper();
    fill(&mut img, rect(150, 70, 349, 109), INK);
    img.save(&input).unwrap();

    let extractor = SignatureExtractor::default();
    let report = extractor.extract_file(&input, &output).unwrap();

    assert!(report.found_signature());
    let written = std::fs::metadata(&output).unwrap().len();
    assert_eq!(report.bytes_written, Some(written));

    let decoded = image::open(&output).unwrap().to_rgba8();
    assert_eq!(decoded, extractor.extract(&img).image);
}

#[test]
fn extract_file_saves_transparent_region_when_nothing_found() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("blank.png");
    let output = dir.path().join("signature.png");
    paper().save(&input).unwrap();

    let report = SignatureExtractor::default()
        .extract_file(&input, &output)
        .unwrap();

    assert!(!report.found_signature());
    let decoded = image::open(&output).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (440, 180));
    assert!(decoded.pixels().all(|p| p[3] == 0));
}

#[test]
fn missing_input_is_reported_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("does-not-exist.png");
    let output = dir.path().join("signature.png");

    let err = SignatureExtractor::default()
        .extract_file(&input, &output)
        .unwrap_err();

    assert!(matches!(err, Error::InputNotFound(ref p) if *p == input));
    assert!(!output.exists());
}

#[test]
fn undecodable_input_is_an_image_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("logo.png");
    let output = dir.path().join("signature.png");
    std::fs::write(&input, b"definitely not a png").unwrap();

    let err = SignatureExtractor::default()
        .extract_file(&input, &output)
        .unwrap_err();

    assert!(matches!(err, Error::Image(_)));
    assert!(!output.exists());
}
