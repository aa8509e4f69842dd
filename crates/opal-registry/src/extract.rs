use std::fs;
use std::path::Path;

use opal_error::{PackageManagerError, Result};

/// Unpack a gzipped tarball into `target_dir`. npm tarballs wrap their
/// contents in a single `package/` directory, which is collapsed so the
/// manifest sits at the root of `target_dir`.
pub fn extract_tarball(name: &str, tarball_bytes: &[u8], target_dir: &Path) -> Result<()> {
    let temp_dir = tempfile::tempdir()
        .map_err(|e| PackageManagerError::ExtractionFailed(name.to_string(), e.to_string()))?;

    let tar = flate2::read::GzDecoder::new(tarball_bytes);
    let mut archive = tar::Archive::new(tar);
    archive
        .unpack(temp_dir.path())
        .map_err(|e| PackageManagerError::ExtractionFailed(name.to_string(), e.to_string()))?;

    let entries: Vec<_> = fs::read_dir(temp_dir.path())
        .and_then(|dir| dir.collect::<std::io::Result<Vec<_>>>())
        .map_err(|e| PackageManagerError::ExtractionFailed(name.to_string(), e.to_string()))?;

    let content_root = match entries.as_slice() {
        [single] if single.file_type().map(|t| t.is_dir()).unwrap_or(false) => single.path(),
        _ => temp_dir.path().to_path_buf(),
    };

    fs::create_dir_all(target_dir)
        .map_err(|e| PackageManagerError::ExtractionFailed(name.to_string(), e.to_string()))?;

    fs_extra::dir::copy(
        &content_root,
        target_dir,
        &fs_extra::dir::CopyOptions::new()
            .overwrite(true)
            .content_only(true),
    )
    .map_err(|e| PackageManagerError::ExtractionFailed(name.to_string(), e.to_string()))?;

    Ok(())
}
