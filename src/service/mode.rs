//! What the update service does when started.

use crate::core::UpdaterError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Startup behaviour of an [`UpdateService`](super::UpdateService).
///
/// Parses from the kebab-case name, the snake_case name, or a short alias:
///
/// | Mode | Accepted spellings |
/// |------|--------------------|
/// | `NoCheck` | `no-check`, `no_check`, `none` |
/// | `CheckOnly` | `check-only`, `check_only`, `check` |
/// | `CheckAndApply` | `check-and-apply`, `check_and_apply`, `update` |
///
/// Anything else is [`UpdaterError::UnknownStartupMode`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StartupMode {
    /// Do nothing.
    #[default]
    NoCheck,
    /// Check and report, never apply.
    CheckOnly,
    /// Check and apply an available update.
    CheckAndApply,
}

impl StartupMode {
    /// Canonical kebab-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoCheck => "no-check",
            Self::CheckOnly => "check-only",
            Self::CheckAndApply => "check-and-apply",
        }
    }
}

impl fmt::Display for StartupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StartupMode {
    type Err = UpdaterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "no-check" | "no_check" | "none" => Ok(Self::NoCheck),
            "check-only" | "check_only" | "check" => Ok(Self::CheckOnly),
            "check-and-apply" | "check_and_apply" | "update" => Ok(Self::CheckAndApply),
            _ => Err(UpdaterError::UnknownStartupMode {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for StartupMode {
    type Error = UpdaterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StartupMode> for String {
    fn from(mode: StartupMode) -> Self {
        mode.as_str().to_string()
    }
}
