//! Error types for seogeo operations.
//!
//! [`SeoGeoError`] covers remote API faults, credential problems, file I/O
//! and output formatting. Remote faults in the keyword pipeline never reach
//! callers as errors: [`crate::keywords::MetricsFetcher`] turns them into a
//! heuristic fallback. They surface directly only from the competitor
//! analysis, which has no offline mode.
//!
//! # Example
//!
//! ```rust
//! use seogeo_core::{OutputMode, SeoGeoError};
//!
//! match "yaml".parse::<OutputMode>() {
//!     Ok(mode) => println!("mode: {:?}", mode),
//!     Err(SeoGeoError::UnknownFormat(name)) => println!("no such format: {}", name),
//!     Err(e) => println!("Error: {}", e),
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for seogeo operations.
#[derive(Error, Debug)]
pub enum SeoGeoError {
    /// HTTP transport errors from reqwest that fit no narrower variant.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("API request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// The API could not be reached at all (DNS, TLS, refused connection).
    #[error("Network connection failed: {0}")]
    Connection(String),

    /// 401 from the API.
    #[error("Invalid API credentials (401 Unauthorized)")]
    Unauthorized,

    /// 402 from the API.
    #[error("Insufficient API credits (402 Payment Required)")]
    PaymentRequired,

    /// 429 from the API.
    #[error("API rate limit exceeded (429)")]
    RateLimited,

    /// Any other non-success HTTP status.
    #[error("API HTTP error ({status})")]
    HttpStatus { status: u16 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The credential is not in `login:password` form.
    #[error("Invalid API key format: expected 'login:password'")]
    InvalidCredential,

    /// No credential could be resolved and the operation needs one.
    #[error("DataForSEO API key required")]
    MissingCredential,

    /// The API answered, but not with anything usable.
    #[error("Malformed API response: {0}")]
    MalformedResponse(String),

    /// The SERP lookup produced no organic results.
    #[error("No SERP results found for '{0}'")]
    NoSerpResults(String),

    /// Output format name not recognised.
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Cache entry could not be read or written.
    #[error("Cache error: {0}")]
    Cache(String),
}

impl SeoGeoError {
    /// Whether this error came from talking to the remote API.
    pub fn is_remote(&self) -> bool {
        match self {
            #[cfg(feature = "fetch")]
            Self::HttpError(_) => true,
            Self::Timeout { .. }
            | Self::Connection(_)
            | Self::Unauthorized
            | Self::PaymentRequired
            | Self::RateLimited
            | Self::HttpStatus { .. }
            | Self::MalformedResponse(_) => true,
            _ => false,
        }
    }

    /// Actionable advice for the user, for errors that have some.
    pub fn guidance(&self) -> Option<&'static str> {
        let text = match self {
            Self::Timeout { .. } => {
                "Possible causes: slow internet connection or DataForSEO API delays.\n\
                 1. Check your internet connection\n\
                 2. Try again in a few moments\n\
                 3. Fallback mode is used automatically, no action needed"
            }
            Self::Connection(_) => {
                "Cannot connect to the DataForSEO API.\n\
                 1. Check your internet connection\n\
                 2. Verify you can access https://api.dataforseo.com\n\
                 3. Check whether a firewall is blocking outbound HTTPS\n\
                 4. Try disabling your VPN if you use one"
            }
            Self::Unauthorized => {
                "Your API credentials are incorrect or expired.\n\
                 1. Verify the format is 'login:password' (colon-separated)\n\
                 2. Check the credentials in the dashboard: https://app.dataforseo.com/\n\
                 3. Ensure the account is active (not an expired trial)\n\
                 4. Verify there are no extra spaces in the credential string"
            }
            Self::PaymentRequired => {
                "Your DataForSEO account has insufficient credits.\n\
                 1. Add credits: https://app.dataforseo.com/billing\n\
                 2. Check your current balance in the dashboard"
            }
            Self::RateLimited => {
                "Too many requests were made to the API.\n\
                 1. Wait a few minutes before trying again\n\
                 2. Check your DataForSEO plan limits\n\
                 3. Cached results are used for repeated queries"
            }
            Self::InvalidCredential => {
                "The API key must look like 'login:password', for example\n\
                 user@example.com:mypassword123 or username:SecureP@ssw0rd"
            }
            Self::MissingCredential => {
                "Credential options:\n\
                 1. Set the DATAFORSEO_API_KEY environment variable\n\
                 2. Create ~/.dataforseo-skill/config.json with {\"api_key\": \"login:password\"} (or run `seogeo setup`)\n\
                 3. Pass --api-key 'login:password'\n\
                 4. Pass --interactive to be prompted\n\
                 Plain text (login:password) and Base64-encoded keys are both accepted"
            }
            _ => return None,
        };
        Some(text)
    }
}

/// Result type alias for SeoGeoError.
pub type Result<T> = std::result::Result<T, SeoGeoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SeoGeoError::UnknownFormat("yaml".to_string());
        assert_eq!(err.to_string(), "Unknown format: yaml");
    }

    #[test]
    fn test_timeout_error() {
        let err = SeoGeoError::Timeout { timeout: 30 };
        assert!(err.to_string().contains("30"));
        assert!(err.is_remote());
    }

    #[test]
    fn test_http_status_error() {
        let err = SeoGeoError::HttpStatus { status: 503 };
        assert!(err.to_string().contains("503"));
        assert!(err.guidance().is_none());
    }

    #[test]
    fn test_guidance_for_auth_faults() {
        assert!(SeoGeoError::Unauthorized.guidance().unwrap().contains("login:password"));
        assert!(SeoGeoError::PaymentRequired.guidance().unwrap().contains("billing"));
        assert!(SeoGeoError::RateLimited.guidance().unwrap().contains("Wait"));
    }

    #[test]
    fn test_local_errors_are_not_remote() {
        assert!(!SeoGeoError::MissingCredential.is_remote());
        assert!(!SeoGeoError::FileNotFound(PathBuf::from("draft.md")).is_remote());
    }
}
