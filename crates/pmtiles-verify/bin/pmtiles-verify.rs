//! pmtiles-verify binary entry point.
//!
//! Thin wrapper around the pmtiles-verify library that:
//! 1. Initializes logging
//! 2. Parses command-line arguments
//! 3. Runs the verification and prints every finding
//!
//! Exits with status 1 when the archive has findings.

use anyhow::Result;
use pmtiles_verify::{VerifyArgs, verify};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = VerifyArgs::from_args();
    let report = verify(&args.location, &args.to_options()).await?;

    for finding in &report.findings {
        println!("{finding}");
    }
    println!("Completed verify in {:?}.", report.elapsed);

    if report.is_valid() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}
