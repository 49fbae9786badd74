//! Transient user notifications and the error-to-message extractor.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use shared::ApiError;
use tracing::warn;

const DEFAULT_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    expires_at: Instant,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Queue of live notifications. Entries expire independently after their TTL;
/// any number may coexist.
#[derive(Debug)]
pub struct Notifier {
    entries: Mutex<Vec<Notification>>,
    ttl: Duration,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            ttl,
        }
    }

    pub fn notify(&self, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.push(Notification {
            message,
            severity,
            expires_at: Instant::now() + self.ttl,
        });
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(Severity::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(Severity::Error, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.notify(Severity::Warning, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.notify(Severity::Info, message);
    }

    /// Drops dead entries and returns the ones still alive.
    pub fn purge_expired(&self) -> Vec<Notification> {
        let now = Instant::now();
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.retain(|n| !n.is_expired(now));
        entries.clone()
    }

    pub fn snapshot(&self) -> Vec<Notification> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

/// Turns any backend failure into one user-facing string: API-supplied
/// message first, then network wording, then whatever the error itself says.
pub fn error_message(error: &ApiError) -> String {
    match error {
        ApiError::Http { status, message } => {
            warn!(status, "surfacing API error to the user");
            if message.is_empty() {
                format!("Server error: {status}")
            } else {
                message.clone()
            }
        }
        ApiError::Network(_) => "Network error. Please check your connection.".to_string(),
        ApiError::NotFound(_) | ApiError::Validation(_) => error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifications_coexist_and_expire() {
        let notifier = Notifier::new(Duration::from_millis(20));
        notifier.success("saved");
        notifier.error("boom");
        assert_eq!(notifier.snapshot().len(), 2);

        std::thread::sleep(Duration::from_millis(30));
        notifier.info("fresh");
        let alive = notifier.purge_expired();
        assert_eq!(alive.len(), 1);
        assert_eq!(alive[0].message, "fresh");
        assert_eq!(alive[0].severity, Severity::Info);
    }

    #[test]
    fn extractor_prefers_api_message() {
        let err = ApiError::Http {
            status: 422,
            message: "Barcode already exists".to_string(),
        };
        assert_eq!(error_message(&err), "Barcode already exists");

        let bare = ApiError::Http {
            status: 500,
            message: String::new(),
        };
        assert_eq!(error_message(&bare), "Server error: 500");
    }

    #[test]
    fn extractor_network_and_not_found() {
        let network = ApiError::Network("connection refused".to_string());
        assert_eq!(
            error_message(&network),
            "Network error. Please check your connection."
        );
        assert_eq!(
            error_message(&ApiError::not_found("Product")),
            "Product not found"
        );
    }
}
