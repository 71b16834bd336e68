//! Error types for dependency builds.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching, building or installing a dependency.
#[derive(Debug, Error)]
pub enum DepError {
  /// HTTP request for a source archive failed.
  #[error("fetch failed for {url}: {message}")]
  Fetch { url: String, message: String },

  /// SHA256 hash mismatch after download.
  #[error("hash mismatch for {url}: expected {expected}, got {actual}")]
  HashMismatch {
    url: String,
    expected: String,
    actual: String,
  },

  /// Source archive could not be unpacked.
  #[error("failed to extract {archive}: {source}")]
  Extract {
    archive: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// An external build step exited unsuccessfully.
  #[error("{step} failed: {program} exited with code {code:?}")]
  CommandFailed {
    step: String,
    program: String,
    code: Option<i32>,
  },

  /// An external build tool could not be started.
  #[error("failed to run {program}: {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },

  /// The host operating system or architecture is not one we can build for.
  #[error("unsupported host platform: {0}")]
  UnsupportedHost(String),

  /// No dependency is registered under this name.
  #[error("unknown dependency: {0}")]
  UnknownDependency(String),

  /// Copying a build artifact into the install tree failed.
  #[error("failed to copy {from} to {to}: {source}")]
  Copy {
    from: PathBuf,
    to: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// I/O error.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = DepError> = std::result::Result<T, E>;
