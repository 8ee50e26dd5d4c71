//! Download URL selection for the host platform.
//!
//! Two strategies, chosen by whether a URL template is configured:
//!
//! 1. **Template**: `{tag}`, `{os}` and `{arch}` are substituted into the
//!    template and the release's assets are never consulted. Unknown
//!    placeholders are left in place; a template that yields a dead URL is
//!    the caller's problem.
//! 2. **Asset search**: the first asset whose lowercased name contains both
//!    the OS and the architecture identifier wins. Failing that, the first
//!    asset naming just the OS. Failing that, [`UpdaterError::NoSuitableAsset`].
//!
//! ```rust
//! use updater::artifact::select_url;
//! use updater::models::Release;
//! use updater::utils::platform::Platform;
//!
//! let release = Release::new("v1.0.0")
//!     .with_asset("app-linux-amd64", "https://x/linux-amd64")
//!     .with_asset("app-windows-amd64", "https://x/windows-amd64");
//! let linux = Platform::new("linux", "amd64");
//!
//! assert_eq!(select_url(&release, None, &linux).unwrap(), "https://x/linux-amd64");
//! assert_eq!(
//!     select_url(&release, Some("http://x/{tag}-{os}-{arch}"), &linux).unwrap(),
//!     "http://x/v1.0.0-linux-amd64"
//! );
//! ```

use crate::core::{Result, UpdaterError};
use crate::models::{Release, ReleaseAsset};
use crate::utils::platform::Platform;
use tracing::debug;

/// Resolve the download URL of `release` for `platform`.
///
/// # Errors
///
/// Returns [`UpdaterError::NoSuitableAsset`] when no template is given and no
/// asset name contains the OS identifier.
pub fn select_url(release: &Release, template: Option<&str>, platform: &Platform) -> Result<String> {
    if let Some(template) = template.filter(|t| !t.is_empty()) {
        let url = expand_template(template, &release.tag_name, platform);
        debug!("Expanded release URL template to {}", url);
        return Ok(url);
    }

    let os = platform.os.to_ascii_lowercase();
    let arch = platform.arch.to_ascii_lowercase();
    let matches = |asset: &&ReleaseAsset, need_arch: bool| {
        let name = asset.name.to_ascii_lowercase();
        name.contains(&os) && (!need_arch || name.contains(&arch))
    };

    let selected = release
        .assets
        .iter()
        .find(|asset| matches(asset, true))
        .or_else(|| {
            debug!("No asset for {} in {}, falling back to OS-only match", platform, release.tag_name);
            release.assets.iter().find(|asset| matches(asset, false))
        });

    match selected {
        Some(asset) => {
            debug!("Selected asset {} for {}", asset.name, platform);
            Ok(asset.download_url.clone())
        }
        None => Err(UpdaterError::NoSuitableAsset {
            os: platform.os.clone(),
            arch: platform.arch.clone(),
        }),
    }
}

/// Substitute `{tag}`, `{os}` and `{arch}` in a URL template.
#[must_use]
pub fn expand_template(template: &str, tag: &str, platform: &Platform) -> String {
    template
        .replace("{tag}", tag)
        .replace("{os}", &platform.os)
        .replace("{arch}", &platform.arch)
}
