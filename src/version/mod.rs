//! Version normalization, comparison and display formatting.
//!
//! Release tags are free-form strings: `v1.2.3`, `1.2.3`, `v1.2` and
//! `1.0.0-rc.1+build.5` all show up in the wild. This module compares them
//! under SemVer precedence without ever failing, so a degenerate tag makes
//! the check report "no update" instead of aborting it.
//!
//! # Ordering rules
//!
//! - Both sides are normalized to carry a leading `v` before parsing, which
//!   makes the ordering independent of the prefix
//! - Shorthand cores are padded: `v1` is `v1.0.0`, `v1.2` is `v1.2.0`. A
//!   shorthand core with a pre-release or build suffix is malformed
//! - Pre-release identifiers follow SemVer precedence (`1.0.0-alpha < 1.0.0`)
//! - Build metadata is ignored
//! - A malformed version orders below every valid version, and two malformed
//!   versions compare equal
//!
//! # Examples
//!
//! ```rust
//! use std::cmp::Ordering;
//! use updater::version::{compare, format_for_display};
//!
//! assert_eq!(compare("1.0.0", "v1.1.0"), Ordering::Less);
//! assert_eq!(compare("v2.0.0", "2.0.0"), Ordering::Equal);
//! assert_eq!(format_for_display("1.2.3", true), "v1.2.3");
//! assert_eq!(format_for_display("v1.2.3", false), "1.2.3");
//! ```

pub mod channel;

pub use channel::{Channel, classify};

use semver::Version;
use std::cmp::Ordering;

/// Ensure `version` carries a leading `v`. Empty strings are left empty.
#[must_use]
pub fn normalize(version: &str) -> String {
    if version.is_empty() || version.starts_with('v') {
        version.to_string()
    } else {
        format!("v{version}")
    }
}

/// Parse a `v`-prefixed version string into a [`Version`].
///
/// Returns `None` for anything that is not a SemVer version after padding a
/// shorthand `major` or `major.minor` core with zeros. Shorthand cores are
/// only accepted bare: `v1.2-beta.1` is malformed.
fn parse_normalized(version: &str) -> Option<Version> {
    let bare = version.strip_prefix('v')?;
    if let Ok(parsed) = Version::parse(bare) {
        return Some(parsed);
    }

    let split_at = bare.find(['-', '+']).unwrap_or(bare.len());
    let (core, rest) = bare.split_at(split_at);
    let parts: Vec<&str> = core.split('.').collect();
    if !rest.is_empty() || parts.len() >= 3 || parts.iter().any(|p| p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit())) {
        return None;
    }

    let padded = match parts.len() {
        1 => format!("{core}.0.0{rest}"),
        _ => format!("{core}.0{rest}"),
    };
    Version::parse(&padded).ok()
}

/// Parse a free-form version string, with or without the `v` prefix.
#[must_use]
pub fn parse(version: &str) -> Option<Version> {
    parse_normalized(&normalize(version))
}

/// Compare two version strings under SemVer precedence.
///
/// Never fails; see the module documentation for how malformed input orders.
#[must_use]
pub fn compare(a: &str, b: &str) -> Ordering {
    match (parse(a), parse(b)) {
        (Some(a), Some(b)) => precedence(&a, &b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

fn precedence(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch, &a.pre).cmp(&(b.major, b.minor, b.patch, &b.pre))
}

/// Returns `true` when `candidate` is strictly newer than `current`.
#[must_use]
pub fn is_newer(current: &str, candidate: &str) -> bool {
    compare(current, candidate) == Ordering::Less
}

/// Format a version for display.
///
/// Adds a leading `v` when `force_prefix` is set and the prefix is missing,
/// strips it when `force_prefix` is unset and the prefix is present, and
/// otherwise returns the version unchanged.
#[must_use]
pub fn format_for_display(version: &str, force_prefix: bool) -> String {
    match (force_prefix, version.strip_prefix('v')) {
        (true, None) => format!("v{version}"),
        (false, Some(bare)) => bare.to_string(),
        _ => version.to_string(),
    }
}
