//! Source acquisition: download, verify and unpack pinned source archives.
//!
//! A source directory `<stem>.src/` counts as usable only once it contains
//! the extraction marker. Anything else found in the deps directory under the
//! source's names is treated as a remnant of an interrupted run and removed
//! before downloading again.

use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use sha2::{Digest, Sha256};
use tar::Archive;
use tracing::{debug, info};

use crate::error::{DepError, Result};

/// File written inside the source directory once extraction completed.
pub const EXTRACTED_MARKER: &str = "EXTRACTED";
const EXTRACTED_MARKER_CONTENT: &str = "EXTRACTED CHECKER";

/// A pinned upstream source archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceArchive {
  pub name: &'static str,
  pub version: &'static str,
  pub url: &'static str,
  /// Expected SHA256 of the archive (lowercase hex), if pinned.
  pub sha256: Option<&'static str>,
}

/// Outcome of [`acquire`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquired {
  /// Sources were already extracted; nothing was touched.
  Cached,
  /// Sources were downloaded and extracted by this call.
  Downloaded,
}

impl SourceArchive {
  /// Directory name the archive unpacks to, e.g. `zlib-1.2.11`.
  pub fn stem(&self) -> String {
    format!("{}-{}", self.name, self.version)
  }

  /// File name the archive is saved under.
  pub fn archive_name(&self) -> String {
    format!("{}.tar.gz", self.stem())
  }

  /// Canonical source directory inside `deps_path`.
  pub fn src_dir(&self, deps_path: &Path) -> PathBuf {
    deps_path.join(format!("{}.src", self.stem()))
  }

  pub fn marker_path(&self, deps_path: &Path) -> PathBuf {
    self.src_dir(deps_path).join(EXTRACTED_MARKER)
  }

  pub fn is_extracted(&self, deps_path: &Path) -> bool {
    self.marker_path(deps_path).exists()
  }
}

/// Make sure the sources for `source` are extracted under `deps_path`.
///
/// Idempotent: once the extraction marker exists this performs no network
/// access and no filesystem changes.
pub fn acquire(source: &SourceArchive, deps_path: &Path) -> Result<Acquired> {
  if source.is_extracted(deps_path) {
    info!(source = %source.stem(), "sources are already downloaded");
    return Ok(Acquired::Cached);
  }

  info!(source = %source.stem(), "getting sources");
  fs::create_dir_all(deps_path)?;
  clear_remnants(source, deps_path)?;

  let archive = deps_path.join(source.archive_name());
  download(source.url, &archive, source.sha256)?;
  unpack_source(source, deps_path, &archive)?;

  info!(source = %source.stem(), "sources have been downloaded");
  Ok(Acquired::Downloaded)
}

/// Remove a partially downloaded archive and partially extracted trees.
pub fn clear_remnants(source: &SourceArchive, deps_path: &Path) -> Result<()> {
  remove_file_if_exists(&deps_path.join(source.archive_name()))?;
  remove_dir_if_exists(&source.src_dir(deps_path))?;
  remove_dir_if_exists(&deps_path.join(source.stem()))?;
  Ok(())
}

/// Unpack a downloaded archive into its canonical source directory.
///
/// Extracts into `deps_path`, renames `<stem>/` to `<stem>.src/`, deletes the
/// archive and finally writes the extraction marker.
pub fn unpack_source(source: &SourceArchive, deps_path: &Path, archive: &Path) -> Result<()> {
  extract_tar_gz(archive, deps_path)?;

  let extracted = deps_path.join(source.stem());
  let src_dir = source.src_dir(deps_path);
  fs::rename(&extracted, &src_dir)?;
  remove_file_if_exists(archive)?;

  let mut marker = File::create(source.marker_path(deps_path))?;
  marker.write_all(EXTRACTED_MARKER_CONTENT.as_bytes())?;
  debug!(path = ?src_dir, "source extraction marked complete");

  Ok(())
}

/// Download `url` to `dest`, verifying its SHA256 when one is given.
pub fn download(url: &str, dest: &Path, expected_sha256: Option<&str>) -> Result<()> {
  info!(url = %url, "fetching URL");

  let fetch_err = |e: reqwest::Error| DepError::Fetch {
    url: url.to_string(),
    message: e.to_string(),
  };

  let response = reqwest::blocking::get(url).map_err(fetch_err)?;
  if !response.status().is_success() {
    return Err(DepError::Fetch {
      url: url.to_string(),
      message: format!("HTTP {}", response.status()),
    });
  }
  let bytes = response.bytes().map_err(fetch_err)?;

  if let Some(expected) = expected_sha256 {
    let actual = sha256_hex(&bytes);
    if actual != expected {
      return Err(DepError::HashMismatch {
        url: url.to_string(),
        expected: expected.to_string(),
        actual,
      });
    }
    debug!(sha256 = %expected, "hash verified");
  }

  let mut file = File::create(dest)?;
  file.write_all(&bytes)?;
  file.flush()?;

  info!(path = ?dest, size = bytes.len(), "download complete");
  Ok(())
}

/// Unpack a gzip-compressed tarball into `dest`, keeping its top-level directory.
pub fn extract_tar_gz(archive_path: &Path, dest: &Path) -> Result<()> {
  let extract_err = |source: io::Error| DepError::Extract {
    archive: archive_path.to_path_buf(),
    source,
  };

  let file = File::open(archive_path).map_err(extract_err)?;
  let mut archive = Archive::new(GzDecoder::new(BufReader::new(file)));
  archive.unpack(dest).map_err(extract_err)?;

  debug!(archive = ?archive_path, dest = ?dest, "unpacked archive");
  Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
  let mut hasher = Sha256::new();
  hasher.update(bytes);
  hex::encode(hasher.finalize())
}

pub(crate) fn remove_file_if_exists(path: &Path) -> io::Result<()> {
  match fs::remove_file(path) {
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
    other => other,
  }
}

pub(crate) fn remove_dir_if_exists(path: &Path) -> io::Result<()> {
  match fs::remove_dir_all(path) {
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
    other => other,
  }
}
