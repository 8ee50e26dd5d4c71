//! Error handling for the updater
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** ([`UpdaterError`]) so callers can tell transport
//!    failures, configuration mistakes and apply failures apart
//! 2. **User-friendly messages** ([`ErrorContext`]) with actionable suggestions
//!    for CLI users
//!
//! # Error Categories
//!
//! - **Transport**: [`UpdaterError::Network`], [`UpdaterError::HttpStatus`],
//!   [`UpdaterError::InvalidResponse`], [`UpdaterError::Cancelled`]
//! - **Configuration**: [`UpdaterError::InvalidRepoUrl`],
//!   [`UpdaterError::UnknownChannel`], [`UpdaterError::UnknownStartupMode`],
//!   [`UpdaterError::Config`]
//! - **Selection**: [`UpdaterError::NoSuitableAsset`]
//! - **Apply**: [`UpdaterError::Apply`] wrapping an [`ApplyError`]
//!
//! "No matching release" is deliberately absent from this list. Sources and
//! the resolver report absence as `Ok(None)` so that an empty channel never
//! looks like a broken network.
//!
//! # Examples
//!
//! ```rust,no_run
//! use updater::core::{UpdaterError, user_friendly_error};
//!
//! let error = UpdaterError::HttpStatus {
//!     url: "https://example.com/latest.json".to_string(),
//!     status: 404,
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // colored error with a suggestion
//! ```

use crate::apply::ApplyError;
use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for update resolution.
///
/// Every variant carries owned strings rather than the underlying library
/// error so the type stays `Clone` and can be rendered after the fact by
/// [`user_friendly_error`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpdaterError {
    /// The request could not be sent or the connection broke mid-transfer.
    #[error("Network error while requesting {url}: {reason}")]
    Network {
        /// The URL that was being requested
        url: String,
        /// Transport-level description of the failure
        reason: String,
    },

    /// The server answered with something other than `200 OK`.
    #[error("Request to {url} failed with HTTP status {status}")]
    HttpStatus {
        /// The URL that was requested
        url: String,
        /// The HTTP status code returned by the server
        status: u16,
    },

    /// The response body could not be decoded or is missing mandatory fields.
    #[error("Invalid response from {url}: {reason}")]
    InvalidResponse {
        /// The URL whose body failed to decode
        url: String,
        /// What was wrong with the body
        reason: String,
    },

    /// The caller's cancellation token fired before the operation completed.
    #[error("Operation cancelled: {operation}")]
    Cancelled {
        /// The operation that was interrupted
        operation: String,
    },

    /// A GitHub repository URL that does not name both an owner and a repository.
    #[error("Invalid repository URL '{url}': {reason}")]
    InvalidRepoUrl {
        /// The URL as supplied by the caller
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// A channel name other than `stable`, `beta` or `alpha`.
    #[error("Unknown release channel '{value}'")]
    UnknownChannel {
        /// The rejected channel string
        value: String,
    },

    /// A startup mode string that does not map to a known mode.
    #[error("Unknown startup check mode '{value}'")]
    UnknownStartupMode {
        /// The rejected startup mode string
        value: String,
    },

    /// Any other configuration problem.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error
        message: String,
    },

    /// No release asset matched the host operating system.
    #[error("No suitable download asset found for {os}/{arch}")]
    NoSuitableAsset {
        /// Host operating system identifier
        os: String,
        /// Host architecture identifier
        arch: String,
    },

    /// The injected applier failed to install the update.
    #[error(transparent)]
    Apply(#[from] ApplyError),
}

impl UpdaterError {
    /// Returns `true` for errors caused by the network or the remote server.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Network { .. }
                | Self::HttpStatus { .. }
                | Self::InvalidResponse { .. }
                | Self::Cancelled { .. }
        )
    }

    /// Returns `true` for errors caused by invalid configuration.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidRepoUrl { .. }
                | Self::UnknownChannel { .. }
                | Self::UnknownStartupMode { .. }
                | Self::Config { .. }
        )
    }

    pub(crate) fn network(url: impl Into<String>, error: &reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            reason: error.to_string(),
        }
    }

    pub(crate) fn cancelled(operation: impl Into<String>) -> Self {
        Self::Cancelled {
            operation: operation.into(),
        }
    }
}

/// Error context wrapper that provides user-friendly error information.
///
/// Couples an [`UpdaterError`] with an optional suggestion (printed in green)
/// and optional details (printed in yellow).
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: UpdaterError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: UpdaterError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`].
///
/// Recognizes [`UpdaterError`] anywhere in the `anyhow` chain (so errors
/// wrapped with `.context(...)` still get tailored suggestions), then falls
/// back to the raw error text with the context chain as details.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(updater_error) = error.chain().find_map(|e| e.downcast_ref::<UpdaterError>()) {
        return create_error_context(updater_error);
    }

    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
    let ctx = ErrorContext::new(UpdaterError::Config {
        message: error.to_string(),
    });
    if chain.is_empty() {
        ctx
    } else {
        ctx.with_details(chain.join(": "))
    }
}

/// Build an [`ErrorContext`] with suggestions tailored to the error variant.
#[must_use]
pub fn create_error_context(error: &UpdaterError) -> ErrorContext {
    let ctx = ErrorContext::new(error.clone());
    match error {
        UpdaterError::Network { .. } => ctx
            .with_suggestion("Check your internet connection and try again")
            .with_details("The update server could not be reached"),
        UpdaterError::HttpStatus { status, .. } => match status {
            401 | 403 => ctx
                .with_suggestion("Set GITHUB_TOKEN to a valid token or wait for the API rate limit to reset")
                .with_details("GitHub limits unauthenticated API requests to 60 per hour"),
            404 => ctx
                .with_suggestion("Verify the repository or update server URL")
                .with_details("The requested release listing or latest.json does not exist"),
            _ => ctx.with_suggestion("The update server returned an error; try again later"),
        },
        UpdaterError::InvalidResponse { .. } => ctx
            .with_suggestion("Verify the update server publishes a valid latest.json")
            .with_details(r#"Expected a JSON object like {"version": "1.2.3", "url": "https://..."}"#),
        UpdaterError::Cancelled { .. } => ctx,
        UpdaterError::InvalidRepoUrl { .. } => ctx
            .with_suggestion("Use a URL of the form https://github.com/<owner>/<repo>"),
        UpdaterError::UnknownChannel { .. } => {
            ctx.with_suggestion("Valid channels are: stable, beta, alpha")
        }
        UpdaterError::UnknownStartupMode { .. } => {
            ctx.with_suggestion("Valid startup modes are: no-check, check-only, check-and-apply")
        }
        UpdaterError::Config { .. } => ctx,
        UpdaterError::NoSuitableAsset { os, arch } => ctx
            .with_suggestion("Pass --release-url-format with {tag}, {os} and {arch} placeholders")
            .with_details(format!(
                "No release asset name contains '{os}' (and ideally '{arch}')"
            )),
        UpdaterError::Apply(apply) if apply.is_rollback_failure() => ctx
            .with_suggestion("Reinstall the application manually; the executable may be damaged")
            .with_details("The update failed and restoring the previous executable also failed"),
        UpdaterError::Apply(_) => ctx
            .with_suggestion("Check write permissions on the executable and try again")
            .with_details("The previous executable was restored"),
    }
}
