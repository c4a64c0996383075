//! Discovery of a document served at one of the well-known paths.

use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::LoadError;
use crate::load::{fetch_document, http_client};
use crate::version::{SpecVersion, detect_spec_version};

/// Paths probed in order, relative to the base URL.
pub const WELL_KNOWN_PATHS: [&str; 5] = [
    "/v3/api-docs",
    "/swagger.json",
    "/openapi.json",
    "/api-docs",
    "/docs/openapi.json",
];

const PROBE_TIMEOUT_SECS: u64 = 3;

/// A document found by [`discover_spec`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoverResult {
    pub url: String,
    pub version: SpecVersion,
}

/// Probe the well-known paths under `base_url` and return the first one
/// serving a recognizable document.
///
/// Candidates answering with an error status, an unparsable body or a
/// document in neither dialect are skipped.
pub async fn discover_spec(base_url: &str) -> Result<DiscoverResult, LoadError> {
    discover_with_timeout(base_url, Duration::from_secs(PROBE_TIMEOUT_SECS)).await
}

pub(crate) async fn discover_with_timeout(
    base_url: &str,
    timeout: Duration,
) -> Result<DiscoverResult, LoadError> {
    let base = base_url.trim_end_matches('/');
    let client = http_client(timeout)?;
    let mut tried = Vec::with_capacity(WELL_KNOWN_PATHS.len());

    for path in WELL_KNOWN_PATHS {
        let url = format!("{base}{path}");
        tried.push(url.clone());

        let document = match fetch_document(&client, &url).await {
            Ok(document) => document,
            Err(err) => {
                warn!(url = %url, error = %err, "Skipping discovery candidate.");
                continue;
            }
        };
        let version = detect_spec_version(&document);
        if version.is_known() {
            info!(url = %url, %version, "Discovered API document.");
            return Ok(DiscoverResult { url, version });
        }
        warn!(url = %url, "Skipping discovery candidate: not an OpenAPI or Swagger document.");
    }

    Err(LoadError::DiscoveryFailed {
        base: base.to_string(),
        tried,
    })
}
