//! Extracts a TAR (optionally gzip-compressed) archive.
//!
//! Usage:
//! ```sh
//! cargo run --example extract_tar -- archive.tar.gz output/ [strip]
//! RUST_LOG=debug cargo run --example extract_tar -- archive.tar output/
//! ```
//!
//! Faulting entries are skipped and listed at the end.

use std::fs::File;
use std::io::BufReader;
use std::io::Read;

use flate2::read::GzDecoder;
use safex_core::ErrorHandlerChoice;
use safex_core::ExtractionConfig;
use safex_core::extract_tar;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(archive), Some(output)) = (args.next(), args.next()) else {
        eprintln!("usage: extract_tar <archive.tar[.gz]> <output-dir> [strip-components]");
        std::process::exit(2);
    };
    let strip = args.next().map_or(Ok(0), |s| s.parse::<usize>())?;

    let file = BufReader::new(File::open(&archive)?);
    let reader: Box<dyn Read> = if archive.ends_with(".gz") || archive.ends_with(".tgz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    let config = ExtractionConfig::default()
        .with_strip_components(strip)
        .with_error_handler(|_entry, _err| ErrorHandlerChoice::Skip);

    let report = extract_tar(reader, &output, &config)?;

    println!(
        "{} files, {} directories, {} symlinks, {} bytes in {:?}",
        report.files_extracted,
        report.directories_created,
        report.symlinks_created,
        report.bytes_written,
        report.duration
    );
    for warning in &report.warnings {
        println!("skipped: {warning}");
    }
    Ok(())
}
