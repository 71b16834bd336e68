//! Dependency builders.
//!
//! Each pinned third-party library implements [`Dependency`]. The trait
//! supplies the shared build step: check for finished artifacts, acquire
//! sources, compile, then copy artifacts into the install layout. Builders
//! only describe what differs: their source, their expected artifacts, how
//! they drive CMake and which search paths they export.
//!
//! # Submodules
//!
//! - [`zlib`] - zlib 1.2.11, with a two-phase host/target cross build
//! - [`brotli`] - Brotli 1.0.7, single-phase

pub mod brotli;
pub mod zlib;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::BuildConfig;
use crate::environ::Environ;
use crate::error::{DepError, Result};
use crate::fetch::{self, SourceArchive};
use crate::layout::InstallLayout;
use crate::platform::Os;

pub use brotli::Brotli;
pub use zlib::Zlib;

/// Result of a successful [`Dependency::build`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStatus {
  /// Every expected artifact was already installed; nothing ran.
  AlreadyBuilt,
  /// The dependency was built and installed by this call.
  Built,
}

/// File names a dependency installs, split by destination directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Artifacts {
  pub lib: Vec<String>,
  pub bin: Vec<String>,
}

impl Artifacts {
  /// Absolute paths of every artifact inside `layout`.
  pub fn paths(&self, layout: &InstallLayout) -> Vec<PathBuf> {
    let lib_dir = layout.lib_dir();
    let bin_dir = layout.bin_dir();
    self
      .lib
      .iter()
      .map(|name| lib_dir.join(name))
      .chain(self.bin.iter().map(|name| bin_dir.join(name)))
      .collect()
  }

  /// Copy artifacts from a CMake install prefix (`lib/`, `bin/`) into `layout`.
  pub fn install_from(&self, prefix: &Path, layout: &InstallLayout) -> Result<()> {
    let lib_dir = layout.lib_dir();
    let bin_dir = layout.bin_dir();
    fs::create_dir_all(&lib_dir)?;
    fs::create_dir_all(&bin_dir)?;

    crate::copy::copy_artifacts(&prefix.join("lib"), &lib_dir, &self.lib)?;
    crate::copy::copy_artifacts(&prefix.join("bin"), &bin_dir, &self.bin)?;
    Ok(())
  }
}

/// A pinned third-party library that can be built and installed.
pub trait Dependency: Sync {
  /// Registry name, e.g. `zlib`.
  fn name(&self) -> &'static str;

  fn source(&self) -> &'static SourceArchive;

  /// Artifacts installed for `os`.
  fn artifacts(&self, os: Os) -> Artifacts;

  /// Configure, build and install into the dependency's own install prefix.
  fn compile(&self, config: &BuildConfig) -> Result<()>;

  /// Copy the compiled artifacts into `config.layout`.
  fn install(&self, config: &BuildConfig) -> Result<()>;

  /// Environment for later build steps that need this dependency.
  ///
  /// `base` is left untouched; the overlay is applied to a copy.
  fn dep_environ(&self, deps_path: &Path, target: Option<Os>, host: Os, base: &Environ) -> Environ;

  /// Human readable name with version, e.g. `zlib 1.2.11`.
  fn display_name(&self) -> String {
    let source = self.source();
    format!("{} {}", source.name, source.version)
  }

  /// Whether every expected artifact is already installed.
  fn check_built(&self, config: &BuildConfig) -> bool {
    if config.rpath_update_in_progress() {
      debug!(dependency = self.name(), "RPATH update in progress, treating as not built");
      return false;
    }
    let missing: Vec<PathBuf> = self
      .artifacts(config.effective_os())
      .paths(&config.layout)
      .into_iter()
      .filter(|path| !path.exists())
      .collect();
    if !missing.is_empty() {
      debug!(dependency = self.name(), missing = ?missing, "artifacts missing");
    }
    missing.is_empty()
  }

  /// Build and install the dependency unless it is already installed.
  fn build(&self, config: &BuildConfig) -> Result<BuildStatus> {
    if self.check_built(config) {
      info!(dependency = self.name(), "already built");
      return Ok(BuildStatus::AlreadyBuilt);
    }

    fs::create_dir_all(&config.deps_path)?;
    fs::create_dir_all(config.layout.root())?;

    fetch::acquire(self.source(), &config.deps_path)?;
    self.compile(config)?;
    self.install(config)?;

    info!(dependency = self.name(), os = %config.effective_os(), "installed");
    Ok(BuildStatus::Built)
  }
}

/// All registered dependencies, in build order.
pub static DEPENDENCIES: &[&dyn Dependency] = &[&Zlib, &Brotli];

/// Get a dependency by name.
#[must_use]
pub fn get(name: &str) -> Option<&'static dyn Dependency> {
  DEPENDENCIES.iter().find(|d| d.name() == name).copied()
}

/// Like [`get`], but an unknown name is an error.
pub fn require(name: &str) -> Result<&'static dyn Dependency> {
  get(name).ok_or_else(|| DepError::UnknownDependency(name.to_string()))
}

/// List all dependency names.
pub fn names() -> impl Iterator<Item = &'static str> {
  DEPENDENCIES.iter().map(|d| d.name())
}

/// `<deps>/<stem>.<suffix>`, e.g. `zlib-1.2.11.host.install`.
pub(crate) fn work_dir(deps_path: &Path, source: &SourceArchive, suffix: &str) -> PathBuf {
  deps_path.join(format!("{}.{suffix}", source.stem()))
}
