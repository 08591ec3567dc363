//! Download and archive-extraction collaborators
//!
//! Small file utilities for fetching compressed catalog dumps before
//! handing their contents to the MARCXML parser. The mapper itself
//! performs no I/O.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};

/// Download a URL into a folder, returning the path of the saved file
///
/// The folder is created when missing. The file name is taken from the
/// `filename` argument when given, otherwise from the server's
/// `Content-Disposition` header; when neither is available the download
/// is rejected with [`Error::FilenameUnavailable`].
pub fn download_file(
    url: &str,
    folder: impl AsRef<Path>,
    filename: Option<&str>,
) -> Result<PathBuf> {
    let folder = folder.as_ref();
    std::fs::create_dir_all(folder)?;

    debug!(url, "downloading file");
    let response = reqwest::blocking::get(url)?.error_for_status()?;

    let filename = match filename {
        Some(name) => name.to_string(),
        None => response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_content_disposition)
            .ok_or(Error::FilenameUnavailable)?,
    };

    let path = folder.join(filename);
    std::fs::write(&path, response.bytes()?)?;

    info!(?path, "download complete");
    Ok(path)
}

/// Extract an archive into a folder, returning the primary entry's path
///
/// Supports `.zip`, `.tar`, `.tar.gz`/`.tgz` and `.7z`; anything else is
/// rejected with [`Error::UnsupportedArchive`] naming the extension. The
/// primary entry is the first one listed by the archive.
pub fn extract_archive(
    archive_path: impl AsRef<Path>,
    extract_to: impl AsRef<Path>,
) -> Result<PathBuf> {
    let archive_path = archive_path.as_ref();
    let extract_to = extract_to.as_ref();
    std::fs::create_dir_all(extract_to)?;

    let name = archive_path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let first = if name.ends_with(".zip") {
        extract_zip(archive_path, extract_to)?
    } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        let file = File::open(archive_path)?;
        extract_tar(flate2::read::GzDecoder::new(file), extract_to)?
    } else if name.ends_with(".tar") {
        extract_tar(File::open(archive_path)?, extract_to)?
    } else if name.ends_with(".7z") {
        extract_sevenz(archive_path, extract_to)?
    } else {
        let extension = archive_path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or(name);
        return Err(Error::UnsupportedArchive(extension));
    };

    info!(?archive_path, ?extract_to, "archive extracted");
    Ok(match first {
        Some(entry) => extract_to.join(entry),
        None => extract_to.to_path_buf(),
    })
}

fn extract_zip(archive_path: &Path, extract_to: &Path) -> Result<Option<PathBuf>> {
    let file = File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    let first = if archive.is_empty() {
        None
    } else {
        archive.by_index(0)?.enclosed_name().map(Path::to_path_buf)
    };

    archive.extract(extract_to)?;
    Ok(first)
}

fn extract_tar<R: Read>(reader: R, extract_to: &Path) -> Result<Option<PathBuf>> {
    let mut archive = tar::Archive::new(reader);
    let mut first = None;

    for entry in archive.entries()? {
        let mut entry = entry?;
        if first.is_none() {
            first = Some(entry.path()?.into_owned());
        }
        entry.unpack_in(extract_to)?;
    }
    Ok(first)
}

fn extract_sevenz(archive_path: &Path, extract_to: &Path) -> Result<Option<PathBuf>> {
    let reader = sevenz_rust::SevenZReader::open(archive_path, sevenz_rust::Password::empty())?;
    let first = reader
        .archive()
        .files
        .first()
        .map(|entry| PathBuf::from(entry.name()));
    drop(reader);

    sevenz_rust::decompress_file(archive_path, extract_to)?;
    Ok(first)
}

/// Filename portion of a Content-Disposition header value
fn filename_from_content_disposition(value: &str) -> Option<String> {
    let (_, raw) = value.rsplit_once('=')?;
    let name = raw.trim().trim_matches('"').trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
