//! Loading a document from a file path or URL and normalizing it to OpenAPI 3.x.

use std::path::Path;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info};

use crate::bundle::bundle;
use crate::error::LoadError;
use crate::parse::{SourceFormat, parse_document};
use crate::swagger2::convert_swagger2;
use crate::version::{SpecVersion, detect_spec_version, is_url};

const FETCH_TIMEOUT_SECS: u64 = 30;

/// Load a document from a local path or an `http(s)://` URL.
///
/// The result is a bundled OpenAPI 3.x document: Swagger 2.0 input is
/// converted first, and documents in neither dialect are rejected.
pub async fn load_spec(input: &str) -> Result<Value, LoadError> {
    let raw = if is_url(input) {
        let client = http_client(Duration::from_secs(FETCH_TIMEOUT_SECS))?;
        fetch_document(&client, input).await?
    } else {
        read_document(Path::new(input)).await?
    };
    normalize_document(raw, input)
}

/// Convert and bundle an already-parsed document.
pub fn normalize_document(document: Value, origin: &str) -> Result<Value, LoadError> {
    let version = detect_spec_version(&document);
    let mut document = match version {
        SpecVersion::Unknown => {
            return Err(LoadError::UnrecognizedFormat {
                origin: origin.to_string(),
            });
        }
        SpecVersion::Swagger2 => {
            info!(origin, "Converting Swagger 2.0 document to OpenAPI 3.0.");
            convert_swagger2(document)
        }
        SpecVersion::OpenApi3 => document,
    };
    bundle(&mut document);
    debug!(origin, %version, "Document normalized.");
    Ok(document)
}

async fn read_document(path: &Path) -> Result<Value, LoadError> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(LoadError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(LoadError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    debug!(path = %path.display(), bytes = text.len(), "Read document.");
    parse_document(&text, SourceFormat::from_path(path), &path.display().to_string())
}

pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, LoadError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(LoadError::Client)
}

/// Fetch a URL and parse its body, JSON first and YAML otherwise.
pub(crate) async fn fetch_document(client: &reqwest::Client, url: &str) -> Result<Value, LoadError> {
    let parsed = url::Url::parse(url).map_err(|source| LoadError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;
    let fetch_error = |source| LoadError::Fetch {
        url: url.to_string(),
        source,
    };

    let response = client.get(parsed).send().await.map_err(fetch_error)?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status,
        });
    }
    let text = response.text().await.map_err(fetch_error)?;
    debug!(url, bytes = text.len(), "Fetched document.");
    parse_document(&text, SourceFormat::Sniff, url)
}
