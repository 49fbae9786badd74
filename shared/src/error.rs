use thiserror::Error;

/// Everything a backend call can fail with. None of these are fatal to the
/// application; controllers surface them as notifications and stay
/// interactive.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request never reached the server or never came back.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status, optionally carrying a
    /// human-readable message in the body.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The resource is absent from the backing collection.
    #[error("{0} not found")]
    NotFound(String),

    /// Rejected client-side before any network call.
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    pub fn not_found(resource: &str) -> Self {
        Self::NotFound(resource.to_string())
    }
}
