use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("invalid api base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("{method} {url} failed: {source}")]
    Transport {
        method: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{method} {url} returned HTTP {status}: {message}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
        message: String,
    },
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum PageError {
    #[error("failed to load student {nim}: {source}")]
    Load {
        nim: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("no bearer token available for updating student {nim}")]
    MissingCredential { nim: String },
    #[error("failed to update student {nim}: {source}")]
    Update {
        nim: String,
        #[source]
        source: anyhow::Error,
    },
}

impl PageError {
    /// HTTP status of the backend reply behind this failure, if there was one.
    pub fn backend_status(&self) -> Option<u16> {
        match self {
            PageError::Load { source, .. } | PageError::Update { source, .. } => source
                .downcast_ref::<ApiClientError>()
                .and_then(ApiClientError::status),
            PageError::MissingCredential { .. } => None,
        }
    }

    /// True when signing in again is the likely fix.
    pub fn needs_fresh_token(&self) -> bool {
        matches!(self, PageError::MissingCredential { .. })
            || matches!(self.backend_status(), Some(401 | 403))
    }
}
