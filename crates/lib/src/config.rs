//! Per-invocation build configuration.

use std::path::{Path, PathBuf};

use crate::cmake::CmakeTools;
use crate::environ::Environ;
use crate::error::Result;
use crate::layout::InstallLayout;
use crate::platform::{Os, Platform};

/// Directory variable that an external maintenance process uses for its markers.
pub const MAINTENANCE_DIR_VAR: &str = "ALUSUS_TMP_DIR";

/// Marker left by an unfinished RPATH rewrite of the install tree.
pub const UPDATING_RPATHS_MARKER: &str = "UPDATING_RPATHS";

/// Everything a dependency builder needs, passed explicitly.
#[derive(Debug, Clone)]
pub struct BuildConfig {
  /// Working area for sources, build trees and intermediate installs.
  pub deps_path: PathBuf,
  /// Final install tree.
  pub layout: InstallLayout,
  /// Requested target; `None` builds for the host.
  pub target: Option<Os>,
  pub host: Platform,
  /// Base environment for every child process.
  pub env: Environ,
  /// Where the `UPDATING_RPATHS` marker may appear.
  pub maintenance_dir: Option<PathBuf>,
  pub tools: CmakeTools,
}

impl BuildConfig {
  /// Configuration for the detected host with defaults taken from `env`.
  ///
  /// `deps_path` is made absolute since it is handed to child processes that
  /// run in other directories.
  pub fn new(deps_path: impl AsRef<Path>, layout: InstallLayout, env: Environ) -> Result<Self> {
    let host = Platform::host()?;
    let deps_path = std::path::absolute(deps_path.as_ref())?;
    let maintenance_dir = env.get_os(MAINTENANCE_DIR_VAR).map(PathBuf::from);
    let jobs = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);

    Ok(Self {
      deps_path,
      layout,
      target: None,
      host,
      env,
      maintenance_dir,
      tools: CmakeTools {
        cmake: "cmake".to_string(),
        make: host.os.make_program().to_string(),
        jobs,
      },
    })
  }

  pub fn with_target(mut self, target: Option<Os>) -> Self {
    self.target = target;
    self
  }

  pub fn with_jobs(mut self, jobs: usize) -> Self {
    self.tools.jobs = jobs.max(1);
    self
  }

  pub fn with_cmake(mut self, cmake: impl Into<String>) -> Self {
    self.tools.cmake = cmake.into();
    self
  }

  pub fn with_make(mut self, make: impl Into<String>) -> Self {
    self.tools.make = make.into();
    self
  }

  /// The OS the artifacts are built for.
  pub fn effective_os(&self) -> Os {
    self.target.unwrap_or(self.host.os)
  }

  /// Whether the target differs from the host.
  pub fn is_cross(&self) -> bool {
    is_cross(self.target, self.host.os)
  }

  /// True while an external process is rewriting RPATHs in the install tree.
  pub fn rpath_update_in_progress(&self) -> bool {
    self
      .maintenance_dir
      .as_ref()
      .is_some_and(|dir| dir.join(UPDATING_RPATHS_MARKER).exists())
  }
}

/// Whether building for `target` on `host` is a cross build.
pub fn is_cross(target: Option<Os>, host: Os) -> bool {
  target.is_some_and(|t| t != host)
}
