//! Command-line configuration
//!
//! Every option can also be set through the environment:
//!
//! - `PMTILES_BUCKET`: explicit bucket URL
//! - `PMTILES_PREFIX`: key prefix or base directory
//! - `PMTILES_HTTP_TIMEOUT_SECS`: HTTP request timeout
//! - `PMTILES_STRICT_LENGTH`: reject HTTP bodies of the wrong length

use crate::verify::VerifyOptions;
use clap::Parser;
use pmtiles_bucket::HttpBucketConfig;
use std::time::Duration;

/// Arguments of the `pmtiles-verify` binary
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pmtiles-verify",
    about = "Check a PMTiles v3 archive for structural consistency",
    version
)]
pub struct VerifyArgs {
    /// Archive location: local path or http(s) URL
    pub location: String,

    /// Bucket URL the location is a key inside of
    #[arg(long, env = "PMTILES_BUCKET")]
    pub bucket: Option<String>,

    /// Key prefix inside the bucket, or base directory for local paths
    #[arg(long, env = "PMTILES_PREFIX")]
    pub prefix: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, env = "PMTILES_HTTP_TIMEOUT_SECS", default_value_t = 30)]
    pub http_timeout_secs: u64,

    /// Treat HTTP bodies shorter or longer than the requested range as errors
    #[arg(long, env = "PMTILES_STRICT_LENGTH")]
    pub strict_length: bool,
}

impl VerifyArgs {
    /// Parse from command-line arguments and environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Convert to library options
    pub fn to_options(&self) -> VerifyOptions {
        VerifyOptions {
            bucket: self.bucket.clone(),
            prefix: self.prefix.clone(),
            http: HttpBucketConfig::default()
                .with_request_timeout(Duration::from_secs(self.http_timeout_secs))
                .with_strict_length(self.strict_length),
            cancellation: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = VerifyArgs::try_parse_from(["pmtiles-verify", "world.pmtiles"])
            .expect("Should parse");
        assert_eq!(args.location, "world.pmtiles");
        assert_eq!(args.http_timeout_secs, 30);

        let options = args.to_options();
        assert_eq!(options.http.request_timeout, Duration::from_secs(30));
        assert!(options.cancellation.is_none());
    }

    #[test]
    fn test_all_flags() {
        let args = VerifyArgs::try_parse_from([
            "pmtiles-verify",
            "world.pmtiles",
            "--bucket",
            "https://example.com/tiles",
            "--prefix",
            "v1",
            "--http-timeout-secs",
            "5",
            "--strict-length",
        ])
        .expect("Should parse");

        let options = args.to_options();
        assert_eq!(options.bucket.as_deref(), Some("https://example.com/tiles"));
        assert_eq!(options.prefix.as_deref(), Some("v1"));
        assert_eq!(options.http.request_timeout, Duration::from_secs(5));
        assert!(options.http.strict_length);
    }

    #[test]
    fn test_location_required() {
        assert!(VerifyArgs::try_parse_from(["pmtiles-verify"]).is_err());
    }
}
