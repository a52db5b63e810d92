use std::error::Error as _;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use signature_extractor::{resolve_paths, ExtractOptions, ExtractionReport, SignatureExtractor};

#[derive(Parser)]
#[command(
    name = "extract-signature",
    about = "Extract a handwritten signature from a logo image as a transparent PNG",
    version,
    after_help = "Without arguments, reads `public/assets/Lil Movements (LOGO).png` and writes\n\
                  `public/assets/lil-signature.png`. Set RUST_LOG to override the log filter."
)]
struct Cli {
    /// Logo image to extract the signature from
    input: Option<PathBuf>,

    /// Output PNG path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Margin kept around the signature when cropping, in pixels
    #[arg(long)]
    padding: Option<u32>,

    /// Gaussian sigma used to soften the signature edges (0 disables)
    #[arg(long, allow_negative_numbers = true)]
    blur_sigma: Option<f32>,

    /// Log per-stage details
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn init_tracing(cli: &Cli) {
    let default_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    let (input, output) = resolve_paths(cli.input.as_deref(), cli.output.as_deref());

    if !input.exists() {
        eprintln!("Error: Logo file not found: {}", input.display());
        process::exit(1);
    }

    let defaults = ExtractOptions::default();
    let options = ExtractOptions {
        padding: cli.padding.unwrap_or(defaults.padding),
        blur_sigma: cli.blur_sigma.unwrap_or(defaults.blur_sigma),
        ..defaults
    };

    let extractor = match SignatureExtractor::new(options) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    if !cli.quiet {
        eprintln!("Extracting handwritten signature (strokes only)");
        eprintln!();
    }

    match extractor.extract_file(&input, &output) {
        Ok(report) => print_report(&report, &output, cli.quiet),
        Err(e) => {
            eprintln!("[FAIL] {e}");
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            process::exit(1);
        }
    }
}

fn print_report(report: &ExtractionReport, output: &Path, quiet: bool) {
    if quiet {
        return;
    }

    eprintln!();
    if report.found_signature() {
        let (w, h) = report.output_size;
        eprintln!(
            "[OK] {} ({w}x{h}, {} of {} components kept)",
            output.display(),
            report.components_kept,
            report.components_found
        );
    } else {
        eprintln!(
            "[EMPTY] {}: no signature survived filtering, saved transparent region",
            output.display()
        );
    }
}
