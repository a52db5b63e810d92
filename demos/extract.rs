//! Extract a signature from a single logo image.
//!
//! Usage:
//! ```sh
//! cargo run --example extract -- logo.png signature.png
//! ```

use std::env;
use std::path::Path;
use std::process;

use signature_extractor::SignatureExtractor;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <input> <output>", args[0]);
        process::exit(1);
    }

    let extractor = SignatureExtractor::default();
    match extractor.extract_file(Path::new(&args[1]), Path::new(&args[2])) {
        Ok(report) if report.found_signature() => {
            let (w, h) = report.output_size;
            println!("Done: {w}x{h} signature, {} components kept", report.components_kept);
        }
        Ok(_) => println!("No signature found; wrote a transparent image"),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
