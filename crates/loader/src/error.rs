use std::path::PathBuf;

/// Errors raised while loading, converting or discovering a document.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Cannot find spec file: {}. Check the path and try again.", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {origin}: {message}")]
    Parse { origin: String, message: String },

    #[error("Unrecognized spec format in {origin}. Expected OpenAPI 3.x or Swagger 2.0.")]
    UnrecognizedFormat { origin: String },

    #[error("Invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Failed to fetch spec from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to fetch spec from {url}: {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Could not find an API spec at {base}. Tried:\n{}", format_tried(.tried))]
    DiscoveryFailed { base: String, tried: Vec<String> },
}

fn format_tried(tried: &[String]) -> String {
    tried
        .iter()
        .map(|url| format!("  - {url}"))
        .collect::<Vec<_>>()
        .join("\n")
}
