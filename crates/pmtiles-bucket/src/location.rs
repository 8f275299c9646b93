//! Resolving user-supplied locations into a bucket URL and object key

use crate::error::{BucketError, Result};
use std::path::Path;
use url::Url;

/// A bucket URL and the key of an object inside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocation {
    /// URL of the containing bucket (`https://host/dir`, `file:///dir`, ...)
    pub bucket_url: String,
    /// Object key relative to the bucket
    pub key: String,
}

impl ObjectLocation {
    fn new(bucket_url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket_url: bucket_url.into(),
            key: key.into(),
        }
    }
}

/// Split a location into a bucket URL and a key
///
/// - A non-empty `bucket` is used as-is and `key` is taken verbatim.
/// - An `http://` or `https://` key splits into `scheme://host[:port]/dir`
///   and the final path segment.
/// - Anything else is a local path. With a `prefix` the bucket is the
///   absolute prefix directory and `key` is verbatim; without one the
///   bucket is the file's parent directory and the key its file name.
///
/// No I/O is performed.
pub fn normalize_bucket_key(bucket: &str, prefix: &str, key: &str) -> Result<ObjectLocation> {
    if !bucket.is_empty() {
        return Ok(ObjectLocation::new(bucket, key));
    }

    if key.starts_with("http://") || key.starts_with("https://") {
        return normalize_http(key);
    }

    if prefix.is_empty() {
        let absolute = std::path::absolute(key)
            .map_err(|e| BucketError::invalid_location(key, e.to_string()))?;
        let file_name = absolute
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| BucketError::invalid_location(key, "path has no file name"))?
            .to_string();
        let parent = absolute
            .parent()
            .ok_or_else(|| BucketError::invalid_location(key, "path has no parent directory"))?;
        Ok(ObjectLocation::new(file_url(parent)?, file_name))
    } else {
        let absolute = std::path::absolute(prefix)
            .map_err(|e| BucketError::invalid_location(prefix, e.to_string()))?;
        Ok(ObjectLocation::new(file_url(&absolute)?, key))
    }
}

fn normalize_http(location: &str) -> Result<ObjectLocation> {
    let url =
        Url::parse(location).map_err(|e| BucketError::invalid_location(location, e.to_string()))?;
    let host = url
        .host_str()
        .ok_or_else(|| BucketError::invalid_location(location, "missing host"))?;

    let (dir, file) = url.path().rsplit_once('/').unwrap_or(("", url.path()));
    if file.is_empty() {
        return Err(BucketError::invalid_location(location, "URL has no file name"));
    }

    let authority = match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };
    Ok(ObjectLocation::new(
        format!("{}://{authority}{dir}", url.scheme()),
        file,
    ))
}

/// `file://` URL for an absolute directory
///
/// Characters with URL meaning (`#`, `?`, `%`) are percent-encoded so the
/// URL parses back to the same path.
fn file_url(dir: &Path) -> Result<String> {
    Url::from_file_path(dir)
        .map(String::from)
        .map_err(|()| BucketError::invalid_location(&dir.display().to_string(), "not an absolute path"))
}

/// Whether a prefix leaves keys unchanged
pub fn is_trivial_prefix(prefix: &str) -> bool {
    matches!(prefix, "" | "/" | ".")
}

/// Lexically clean a slash-separated prefix
///
/// Repeated slashes, `.` segments and trailing slashes are removed and `..`
/// segments consume their parent where one exists.
pub fn clean_prefix(prefix: &str) -> String {
    let absolute = prefix.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in prefix.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    if absolute {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}
