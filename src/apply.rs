//! The boundary to the executable-replacement primitive.
//!
//! Downloading a build and swapping it in for the running executable is not
//! done here. Whoever embeds the updater injects an [`Applier`], which
//! receives the resolved download URL and either succeeds or reports an
//! [`ApplyError`].
//!
//! # Caller obligations
//!
//! Replacing the running executable is not reentrant. The update service
//! calls its applier at most once per `start()`, but nothing stops two
//! services, or two processes, from applying at the same time. Callers must
//! ensure at most one apply is in flight per installed executable.

use std::future::Future;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::info;

/// Failure reported by an [`Applier`].
///
/// A rollback failure is more severe than a plain failure: the previous
/// executable could not be restored and the installation may be broken.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    /// The update failed and the previous executable is intact.
    #[error("update failed: {reason}")]
    Failed {
        /// Why the update failed
        reason: String,
    },

    /// The update failed and restoring the previous executable failed too.
    #[error("failed to rollback from failed update: {rollback} (update error: {reason})")]
    RollbackFailed {
        /// Why the update failed
        reason: String,
        /// Why the rollback failed
        rollback: String,
    },
}

impl ApplyError {
    /// Returns `true` when the rollback failed as well.
    #[must_use]
    pub const fn is_rollback_failure(&self) -> bool {
        matches!(self, Self::RollbackFailed { .. })
    }
}

/// Downloads a build and replaces the running executable with it.
pub trait Applier: Send + Sync {
    /// Install the build published at `download_url`.
    fn apply(&self, download_url: &str) -> impl Future<Output = Result<(), ApplyError>> + Send;
}

impl<T: Applier> Applier for Arc<T> {
    fn apply(&self, download_url: &str) -> impl Future<Output = Result<(), ApplyError>> + Send {
        (**self).apply(download_url)
    }
}

/// An applier that only records and logs the URL it would install from.
///
/// Used by the bundled CLI, and handy for previewing what an update would do.
#[derive(Debug, Default)]
pub struct DryRunApplier {
    applied: Mutex<Vec<String>>,
}

impl DryRunApplier {
    /// Create an applier with an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// URLs passed to [`Applier::apply`] so far, oldest first.
    #[must_use]
    pub fn applied(&self) -> Vec<String> {
        self.applied.lock().map(|urls| urls.clone()).unwrap_or_default()
    }
}

impl Applier for DryRunApplier {
    async fn apply(&self, download_url: &str) -> Result<(), ApplyError> {
        info!("Update would be applied from: {}", download_url);
        self.applied
            .lock()
            .map_err(|_| ApplyError::Failed {
                reason: "dry-run history lock poisoned".to_string(),
            })?
            .push(download_url.to_string());
        Ok(())
    }
}
