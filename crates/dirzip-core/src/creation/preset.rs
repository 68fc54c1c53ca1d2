//! Archive naming and the two-archive theme bundle.

use crate::ArchiveError;
use crate::Result;
use crate::creation::builder::ArchiveBuilder;
use crate::creation::builder::check_source_root;
use crate::creation::config::ArchiveConfig;
use crate::creation::report::BuildReport;
use crate::progress::NoopProgress;
use crate::progress::ProgressCallback;
use std::path::Path;
use std::path::PathBuf;

/// Theme resources subtree, relative to the bundle directory.
pub const THEME_RESOURCES_DIR: &str = "resources/theme/default";

/// Landing page subtree, relative to the bundle directory.
pub const THEME_CONTENT_DIR: &str = "landing";

/// Archive name suffix for the resources subtree.
pub const THEME_RESOURCES_SUFFIX: &str = "resourcesThemeDefault";

/// Archive name suffix for the landing page subtree.
pub const THEME_CONTENT_SUFFIX: &str = "contentHomeLanding";

/// Derives an archive file name from a prefix and a source directory.
///
/// `"."` maps to `this`. Any other directory has its dots removed, its
/// slashes turned into dashes and one trailing dash trimmed.
///
/// # Examples
///
/// ```
/// use dirzip_core::default_archive_name;
///
/// assert_eq!(default_archive_name("acme", "."), "acme_this.zip");
/// assert_eq!(default_archive_name("acme", "themes/dark/"), "acme_themes-dark.zip");
/// assert_eq!(default_archive_name("acme", "v1.2"), "acme_v12.zip");
/// ```
#[must_use]
pub fn default_archive_name(prefix: &str, dir: &str) -> String {
    let name = if dir == "." {
        "this".to_string()
    } else {
        dir.replace('.', "").replace('/', "-")
    };
    let name = name.strip_suffix('-').unwrap_or(&name);
    format!("{prefix}_{name}.zip")
}

/// Result of [`build_theme_bundle`].
#[derive(Debug, Clone)]
pub struct ThemeBundleReport {
    /// Path of the resources archive.
    pub resources_archive: PathBuf,
    /// Build statistics for the resources archive.
    pub resources: BuildReport,
    /// Path of the landing page archive.
    pub content_archive: PathBuf,
    /// Build statistics for the landing page archive.
    pub content: BuildReport,
}

impl ThemeBundleReport {
    /// Files archived across both archives.
    #[must_use]
    pub fn files_added(&self) -> usize {
        self.resources.files_added + self.content.files_added
    }
}

/// Builds the theme bundle for the site checked out at `dir`.
///
/// `dir/resources/theme/default` is archived to
/// `{prefix}_resourcesThemeDefault.zip` and `dir/landing` to
/// `{prefix}_contentHomeLanding.zip`, both inside `out_dir`. Entry names are
/// relative to each subtree. Both subtrees are checked before either archive
/// is created.
///
/// # Errors
///
/// Returns an error if either subtree is missing or not a directory, or if
/// building either archive fails.
pub fn build_theme_bundle<P: AsRef<Path>, Q: AsRef<Path>>(
    prefix: &str,
    dir: P,
    out_dir: Q,
    config: &ArchiveConfig,
) -> Result<ThemeBundleReport> {
    build_theme_bundle_with_progress(prefix, dir, out_dir, config, &mut NoopProgress)
}

/// Like [`build_theme_bundle`], reporting progress for both archives.
pub fn build_theme_bundle_with_progress<P: AsRef<Path>, Q: AsRef<Path>>(
    prefix: &str,
    dir: P,
    out_dir: Q,
    config: &ArchiveConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<ThemeBundleReport> {
    let dir = dir.as_ref();
    let out_dir = out_dir.as_ref();

    let resources_dir = dir.join(THEME_RESOURCES_DIR);
    let content_dir = dir.join(THEME_CONTENT_DIR);
    check_source_root(&resources_dir)?;
    check_source_root(&content_dir)?;

    if !out_dir.is_dir() {
        return Err(ArchiveError::NotADirectory {
            path: out_dir.to_path_buf(),
        });
    }

    let resources_archive = out_dir.join(format!("{prefix}_{THEME_RESOURCES_SUFFIX}.zip"));
    let content_archive = out_dir.join(format!("{prefix}_{THEME_CONTENT_SUFFIX}.zip"));

    let mut builder = ArchiveBuilder::new(config.clone());
    let resources = builder.build_with_progress(&resources_dir, &resources_archive, progress)?;
    let content = builder.build_with_progress(&content_dir, &content_archive, progress)?;

    Ok(ThemeBundleReport {
        resources_archive,
        resources,
        content_archive,
        content,
    })
}
