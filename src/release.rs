// Latest-release query against the GitHub API

use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;

use serde::Deserialize;

use crate::transport::HttpClient;
use crate::version::Version;

const GITHUB_API_BASE: &str = "https://api.github.com";

// Release documents are a few KB; a small bounded buffer is enough.
const READ_BUF_SIZE: usize = 1024;

// Hard cap on the accumulated document; a server streaming more than this is
// not serving a release document.
const MAX_BODY_SIZE: usize = 64 * 1024;

/// Normalized view of one release: tag, parsed version, asset name -> URL.
/// Built fresh for every check, never cached across checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDescriptor {
    pub tag: String,
    pub version: Version,
    pub assets: BTreeMap<String, String>,
}

#[derive(Debug)]
pub enum QueryError {
    /// Transport-level failure (connect, TLS, timeout, dropped stream).
    Network(String),
    /// The registry answered with a non-2xx status.
    HttpStatus(u16),
    /// The body was not the expected release document.
    MalformedResponse(String),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::Network(msg) => write!(f, "release query failed: {msg}"),
            QueryError::HttpStatus(code) => write!(f, "release query returned HTTP {code}"),
            QueryError::MalformedResponse(msg) => {
                write!(f, "release response was malformed: {msg}")
            }
        }
    }
}

impl std::error::Error for QueryError {}

// Only the fields we consume; GitHub sends dozens more and serde skips them.
#[derive(Deserialize)]
struct RawRelease {
    tag_name: String,
    #[serde(default)]
    assets: Vec<RawAsset>,
}

#[derive(Deserialize)]
struct RawAsset {
    name: String,
    browser_download_url: String,
}

/// Fetches the latest release for `repo` ("owner/name"), one round trip.
///
/// No internal retry: a failed check is terminal for this cycle and the host
/// re-triggers on its own schedule.
pub fn fetch_latest<C: HttpClient>(
    client: &mut C,
    repo: &str,
) -> Result<ReleaseDescriptor, QueryError> {
    let url = format!("{GITHUB_API_BASE}/repos/{repo}/releases/latest");
    log::debug!("querying latest release: {url}");

    let mut response = client
        .get(&url)
        .map_err(|e| QueryError::Network(format!("{e:#}")))?;
    if !response.is_success() {
        return Err(QueryError::HttpStatus(response.status));
    }

    let mut body = Vec::new();
    let mut buf = [0u8; READ_BUF_SIZE];
    loop {
        let n = response
            .body
            .read(&mut buf)
            .map_err(|e| QueryError::Network(e.to_string()))?;
        if n == 0 {
            break;
        }
        if body.len() + n > MAX_BODY_SIZE {
            return Err(QueryError::MalformedResponse(format!(
                "release document larger than {MAX_BODY_SIZE} bytes"
            )));
        }
        body.extend_from_slice(&buf[..n]);
    }

    let raw: RawRelease =
        serde_json::from_slice(&body).map_err(|e| QueryError::MalformedResponse(e.to_string()))?;
    let version = Version::parse(&raw.tag_name).map_err(|e| {
        QueryError::MalformedResponse(format!("release tag {:?}: {e}", raw.tag_name))
    })?;

    let assets = raw
        .assets
        .into_iter()
        .map(|a| (a.name, a.browser_download_url))
        .collect();

    Ok(ReleaseDescriptor {
        tag: raw.tag_name,
        version,
        assets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_document_parses() {
        let raw: RawRelease = serde_json::from_str(
            r#"{
                "tag_name": "v1.4",
                "name": "Release 1.4",
                "prerelease": false,
                "assets": [
                    {"name": "firmware.bin",
                     "browser_download_url": "https://example.com/firmware.bin",
                     "size": 1024},
                    {"name": "firmware-esp32-s3.bin",
                     "browser_download_url": "https://example.com/firmware-esp32-s3.bin",
                     "size": 2048}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(raw.tag_name, "v1.4");
        assert_eq!(raw.assets.len(), 2);
        assert_eq!(raw.assets[1].name, "firmware-esp32-s3.bin");
    }

    #[test]
    fn test_release_without_assets_parses_empty() {
        let raw: RawRelease = serde_json::from_str(r#"{"tag_name": "v2.0"}"#).unwrap();
        assert!(raw.assets.is_empty());
    }

    #[test]
    fn test_missing_tag_is_rejected_by_serde() {
        let result: Result<RawRelease, _> = serde_json::from_str(r#"{"assets": []}"#);
        assert!(result.is_err());
    }
}
