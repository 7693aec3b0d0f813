//! Copy of additional assets from a mounted source directory

use super::MaterializeError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Copy every file below `source` into `mount_root/dest_subdir`.
///
/// An empty `source` means there are no additional assets and is a no-op.
/// The directory structure below `source` is recreated at the destination.
///
/// Returns the number of files copied.
///
/// # Errors
///
/// - `MaterializeError::Walk` if `source` cannot be read
/// - `MaterializeError::Io` if a directory or file cannot be written
pub fn copy_assets(source: &str, dest_subdir: &str, mount_root: &Path) -> Result<usize, MaterializeError> {
    if source.is_empty() {
        return Ok(0);
    }
    info!(source, destination = dest_subdir, "copy additional assets");

    let source = Path::new(source);
    let destination = mount_root.join(dest_subdir.trim_start_matches('/'));
    fs::create_dir_all(&destination).map_err(|e| MaterializeError::io(&destination, e))?;

    let mut count = 0usize;
    for entry in WalkDir::new(source) {
        let entry = entry.map_err(|e| MaterializeError::Walk {
            path: e.path().map_or_else(|| source.to_path_buf(), Path::to_path_buf),
            source: e,
        })?;
        let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
        let target: PathBuf = destination.join(relative);
        debug!(src = %entry.path().display(), dst = %target.display(), "copy entry");

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| MaterializeError::io(&target, e))?;
            continue;
        }

        fs::copy(entry.path(), &target).map_err(|e| MaterializeError::io(&target, e))?;
        count += 1;
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_source_is_noop() {
        let temp = TempDir::new().unwrap();
        let count = copy_assets("", "static", temp.path()).unwrap();
        assert_eq!(count, 0);
        assert!(!temp.path().join("static").exists());
    }

    #[test]
    fn test_copy_flat_directory() {
        let src = TempDir::new().unwrap();
        let volume = TempDir::new().unwrap();
        fs::write(src.path().join("logo.png"), b"png").unwrap();
        fs::write(src.path().join("config.json"), b"{}").unwrap();

        let count = copy_assets(src.path().to_str().unwrap(), "/assets", volume.path()).unwrap();

        assert_eq!(count, 2);
        assert_eq!(fs::read(volume.path().join("assets/logo.png")).unwrap(), b"png");
        assert_eq!(fs::read(volume.path().join("assets/config.json")).unwrap(), b"{}");
    }

    #[test]
    fn test_copy_nested_directory() {
        let src = TempDir::new().unwrap();
        let volume = TempDir::new().unwrap();
        fs::create_dir_all(src.path().join("img/icons")).unwrap();
        fs::write(src.path().join("img/icons/a.svg"), b"<svg/>").unwrap();

        let count = copy_assets(src.path().to_str().unwrap(), "extra", volume.path()).unwrap();

        assert_eq!(count, 1);
        assert!(volume.path().join("extra/img/icons/a.svg").exists());
    }

    #[test]
    fn test_copy_into_volume_root() {
        let src = TempDir::new().unwrap();
        let volume = TempDir::new().unwrap();
        fs::write(src.path().join("robots.txt"), b"User-agent: *").unwrap();

        copy_assets(src.path().to_str().unwrap(), "", volume.path()).unwrap();

        assert!(volume.path().join("robots.txt").exists());
    }

    #[test]
    fn test_missing_source_fails() {
        let volume = TempDir::new().unwrap();
        let missing = volume.path().join("does-not-exist");

        let err = copy_assets(missing.to_str().unwrap(), "assets", volume.path()).unwrap_err();
        assert!(matches!(err, MaterializeError::Walk { .. }));
    }
}
