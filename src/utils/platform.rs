//! Host platform identifiers in release-asset vocabulary.
//!
//! Release assets are conventionally named after Go's `GOOS`/`GOARCH`
//! values (`app-darwin-arm64`, `app-linux-amd64`, `app-windows-386.exe`),
//! so Rust's target names are translated before matching.

use std::fmt;

/// The operating system and architecture an artifact is selected for.
///
/// Injected into artifact selection so tests can pretend to run anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Platform {
    /// Operating system identifier, e.g. `linux`, `darwin`, `windows`.
    pub os: String,
    /// Architecture identifier, e.g. `amd64`, `arm64`, `386`.
    pub arch: String,
}

impl Platform {
    /// Create a platform from explicit identifiers.
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// The platform this binary was compiled for.
    #[must_use]
    pub fn current() -> Self {
        Self::new(
            os_identifier(std::env::consts::OS),
            arch_identifier(std::env::consts::ARCH),
        )
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

/// Map a Rust `target_os` value to its asset identifier.
#[must_use]
pub fn os_identifier(os: &str) -> &str {
    match os {
        "macos" => "darwin",
        other => other,
    }
}

/// Map a Rust `target_arch` value to its asset identifier.
#[must_use]
pub fn arch_identifier(arch: &str) -> &str {
    match arch {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "386",
        "powerpc64" => "ppc64",
        "loongarch64" => "loong64",
        other => other,
    }
}
