//! Release channel classification.

use crate::core::UpdaterError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named update track used to filter candidate releases.
///
/// Names parse case-insensitively with surrounding whitespace ignored, both
/// from the command line and from the settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Channel {
    /// Final releases.
    Stable,
    /// Beta releases, and pre-releases that name no other track.
    Beta,
    /// Alpha releases.
    Alpha,
}

impl Channel {
    /// The lowercase channel name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Beta => "beta",
            Self::Alpha => "alpha",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = UpdaterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stable" => Ok(Self::Stable),
            "beta" => Ok(Self::Beta),
            "alpha" => Ok(Self::Alpha),
            _ => Err(UpdaterError::UnknownChannel {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Channel {
    type Error = UpdaterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Channel> for String {
    fn from(channel: Channel) -> Self {
        channel.as_str().to_string()
    }
}

/// Derive the channel of a release from its tag and pre-release flag.
///
/// Checked in order: a tag containing `alpha` (any case) is [`Channel::Alpha`],
/// a tag containing `beta` is [`Channel::Beta`], any other pre-release is
/// [`Channel::Beta`], and everything else is [`Channel::Stable`].
///
/// The running binary's own channel is found by classifying its version with
/// `is_pre_release = false`.
///
/// ```rust
/// use updater::version::{Channel, classify};
///
/// assert_eq!(classify("v1.0.0-rc.1", true), Channel::Beta);
/// assert_eq!(classify("v1.0.0-rc.1", false), Channel::Stable);
/// ```
#[must_use]
pub fn classify(tag: &str, is_pre_release: bool) -> Channel {
    let tag = tag.to_ascii_lowercase();
    if tag.contains("alpha") {
        Channel::Alpha
    } else if tag.contains("beta") || is_pre_release {
        Channel::Beta
    } else {
        Channel::Stable
    }
}
