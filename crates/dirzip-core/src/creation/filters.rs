//! Exclusion matching and archive entry naming.

use crate::ArchiveError;
use crate::Result;
use std::path::Component;
use std::path::Path;

/// Returns `true` if `name` contains any exclusion fragment as a substring.
///
/// Matching is case-sensitive and position-independent. This is a coarse
/// denylist, not a pattern language: `".conf"` excludes `app.conf` and
/// `app.config.json` alike, and `"a"` excludes every name with an `a` in it.
/// An empty fragment matches every name; [`ArchiveConfig::validate`] rejects
/// such configurations.
///
/// [`ArchiveConfig::validate`]: crate::ArchiveConfig::validate
///
/// # Examples
///
/// ```
/// use dirzip_core::creation::filters::is_excluded;
///
/// let exclusions = [".DS_Store", ".zip", ".conf"];
/// assert!(is_excluded("site.conf", &exclusions));
/// assert!(is_excluded("backup.zip.part", &exclusions));
/// assert!(!is_excluded("index.html", &exclusions));
/// assert!(!is_excluded("README.CONF", &exclusions));
/// ```
#[must_use]
pub fn is_excluded<S: AsRef<str>>(name: &str, exclusions: &[S]) -> bool {
    exclusions
        .iter()
        .any(|fragment| name.contains(fragment.as_ref()))
}

/// Returns the final component of `path` as a string, lossily converted.
#[must_use]
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Computes the zip entry name of `path` relative to `root`.
///
/// The root prefix and its trailing separator are stripped and the remaining
/// components are joined with `/` regardless of the host separator. A path
/// equal to the root yields an empty name.
///
/// # Errors
///
/// Returns an error if:
/// - `path` is not under `root`
/// - A component is not valid UTF-8
///
/// # Examples
///
/// ```
/// use dirzip_core::creation::filters::archive_entry_name;
/// use std::path::Path;
///
/// let name = archive_entry_name(
///     Path::new("/srv/site/assets/logo.png"),
///     Path::new("/srv/site"),
/// )?;
/// assert_eq!(name, "assets/logo.png");
/// # Ok::<(), dirzip_core::ArchiveError>(())
/// ```
pub fn archive_entry_name(path: &Path, root: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| ArchiveError::PathOutsideRoot {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        })?;

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                let part = part.to_str().ok_or_else(|| ArchiveError::NonUtf8Path {
                    path: path.to_path_buf(),
                })?;
                parts.push(part);
            }
            Component::CurDir => {}
            _ => {
                return Err(ArchiveError::PathOutsideRoot {
                    path: path.to_path_buf(),
                    root: root.to_path_buf(),
                });
            }
        }
    }

    Ok(parts.join("/"))
}
