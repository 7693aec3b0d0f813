//! Zip extraction with zip-slip protection

use super::MaterializeError;
use std::fs;
use std::io::{self, Cursor};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};
use zip::ZipArchive;

/// Extract a zip archive below `destination`.
///
/// With a non-empty `subpath` only entries under that directory are
/// extracted, with the prefix stripped. Directory entries are created,
/// file entries are written with the unix mode stored in the archive.
///
/// Returns the number of files written.
///
/// # Errors
///
/// - `MaterializeError::Zip` if the bytes are not a readable zip archive
/// - `MaterializeError::IllegalPath` if an entry is absolute or contains `..`;
///   extraction stops at that entry
/// - `MaterializeError::Io` if a directory or file cannot be written
pub fn extract_zip(destination: &Path, subpath: &str, body: &[u8]) -> Result<usize, MaterializeError> {
    let mut archive = ZipArchive::new(Cursor::new(body))?;
    let prefix = Path::new(subpath.trim_matches('/'));

    let mut count = 0usize;
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let name = entry.name().to_string();
        if name.is_empty() {
            continue;
        }
        debug!(entry = %name, "found entry");

        let Some(relative) = strip_subpath(Path::new(&name), prefix) else {
            continue;
        };
        if relative.as_os_str().is_empty() {
            continue;
        }
        validate_entry_path(&relative, &name)?;

        let target = destination.join(&relative);
        debug!(target = %target.display(), "unzip entry");

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(|e| MaterializeError::io(&target, e))?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| MaterializeError::io(parent, e))?;
        }
        let mut out = fs::File::create(&target).map_err(|e| MaterializeError::io(&target, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| MaterializeError::io(&target, e))?;
        drop(out);

        if let Some(mode) = entry.unix_mode() {
            apply_mode(&target, mode)?;
        }

        count += 1;
    }

    info!(destination = %destination.display(), files = count, "unzipped");
    Ok(count)
}

/// Path of `entry` relative to `prefix`, or `None` if it lies outside it.
///
/// Matching is per path component, so `dist` does not match `distro/x`.
fn strip_subpath(entry: &Path, prefix: &Path) -> Option<PathBuf> {
    if prefix.as_os_str().is_empty() {
        return Some(entry.to_path_buf());
    }
    entry.strip_prefix(prefix).ok().map(Path::to_path_buf)
}

#[cfg(unix)]
fn apply_mode(target: &Path, mode: u32) -> Result<(), MaterializeError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(target, fs::Permissions::from_mode(mode & 0o7777))
        .map_err(|e| MaterializeError::io(target, e))
}

#[cfg(not(unix))]
fn apply_mode(_target: &Path, _mode: u32) -> Result<(), MaterializeError> {
    Ok(())
}

fn validate_entry_path(path: &Path, entry_name: &str) -> Result<(), MaterializeError> {
    let escapes = path.is_absolute()
        || path.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
    if escapes {
        return Err(MaterializeError::IllegalPath {
            path: entry_name.to_string(),
        });
    }
    Ok(())
}
