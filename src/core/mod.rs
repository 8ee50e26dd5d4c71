//! Core types for the updater
//!
//! The error module defines [`UpdaterError`], the strongly-typed error used by
//! every library operation, and [`ErrorContext`]/[`user_friendly_error`] which
//! turn any error into a colored message with a suggestion for the CLI.

pub mod error;

pub use error::{ErrorContext, UpdaterError, create_error_context, user_friendly_error};

/// Result alias used by the update-resolution engine.
pub type Result<T> = std::result::Result<T, UpdaterError>;
