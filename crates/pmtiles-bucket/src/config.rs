//! HTTP backend configuration

use std::time::Duration;

/// Configuration for [`HttpBucket`](crate::HttpBucket)
///
/// Requests are never retried. When a server ignores the `Range` header and
/// answers 200 with the whole object, the requested range is sliced out of
/// it. Bodies of any other length are accepted as-is unless `strict_length`
/// is set.
#[derive(Debug, Clone)]
pub struct HttpBucketConfig {
    /// Timeout for a complete request/response cycle
    pub request_timeout: Duration,

    /// Timeout for establishing a connection
    pub connect_timeout: Duration,

    /// `User-Agent` header sent with every request
    pub user_agent: String,

    /// Reject bodies whose length differs from the requested range
    pub strict_length: bool,
}

impl Default for HttpBucketConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: concat!("pmtiles-rs/", env!("CARGO_PKG_VERSION")).to_string(),
            strict_length: false,
        }
    }
}

impl HttpBucketConfig {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the connect timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Enable or disable body length validation
    pub fn with_strict_length(mut self, strict: bool) -> Self {
        self.strict_length = strict;
        self
    }
}
