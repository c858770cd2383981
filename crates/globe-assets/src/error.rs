use std::path::PathBuf;

/// Why a texture could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The HTTP request failed or returned a non-success status.
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    /// Reading the response body or a local file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The payload exceeded the configured size limit.
    #[error("{location} exceeds the {limit} byte limit")]
    TooLarge { location: String, limit: u64 },

    /// The bytes are not a supported image.
    #[error("failed to decode {label}: {source}")]
    Decode {
        label: String,
        #[source]
        source: image::ImageError,
    },

    /// Network access is disabled.
    #[error("offline mode, not fetching {location}")]
    Offline { location: String },
}
