//! Brotli 1.0.7, built in a single stage into `brotli-1.0.7.install`.

use std::path::{Path, PathBuf};

use tracing::info;

use super::{Artifacts, Dependency, work_dir};
use crate::cmake::CmakeArgs;
use crate::config::BuildConfig;
use crate::environ::Environ;
use crate::error::Result;
use crate::fetch::SourceArchive;
use crate::platform::Os;
use crate::toolchain::with_compiler_pair;

pub static SOURCE: SourceArchive = SourceArchive {
  name: "brotli",
  version: "1.0.7",
  url: "https://github.com/google/brotli/archive/v1.0.7.tar.gz",
  sha256: Some("4c61bfb0faca87219ea587326c467b95acb25555b53d1a421ffa3c8a9296ee2c"),
};

/// The three libraries Brotli installs.
const COMPONENTS: [&str; 3] = ["common", "dec", "enc"];

pub struct Brotli;

impl Brotli {
  pub fn build_dir(deps_path: &Path) -> PathBuf {
    work_dir(deps_path, &SOURCE, "build")
  }

  pub fn install_dir(deps_path: &Path) -> PathBuf {
    work_dir(deps_path, &SOURCE, "install")
  }

  /// Configure arguments for a build on `config`.
  ///
  /// Only binutils are passed, whatever the host. There is no MinGW
  /// generator or host-specific tool on Windows and macOS.
  pub fn cmake_args(config: &BuildConfig, env: &Environ) -> CmakeArgs {
    let deps = &config.deps_path;
    let mut args = CmakeArgs::release_with_binutils(SOURCE.src_dir(deps), &Self::install_dir(deps), env);
    args
      .define("CMAKE_SYSTEM_PROCESSOR", config.host.arch.as_str())
      .define("CMAKE_CROSSCOMPILING", "TRUE");
    if let Some(target) = config.target {
      args.define("CMAKE_SYSTEM_NAME", target.cmake_system_name());
    }
    args
  }
}

impl Dependency for Brotli {
  fn name(&self) -> &'static str {
    "brotli"
  }

  fn source(&self) -> &'static SourceArchive {
    &SOURCE
  }

  fn artifacts(&self, os: Os) -> Artifacts {
    let mut artifacts = Artifacts::default();
    for component in COMPONENTS {
      let lib = format!("libbrotli{component}");
      match os {
        Os::Windows => {
          artifacts.bin.push(format!("{lib}.dll"));
          artifacts.lib.push(format!("{lib}.dll.a"));
        }
        Os::Linux => artifacts.lib.extend([
          format!("{lib}.so.1.0.7"),
          format!("{lib}.so.1"),
          format!("{lib}.so"),
        ]),
        Os::MacOs => artifacts.lib.extend([
          format!("{lib}.1.0.7.dylib"),
          format!("{lib}.1.dylib"),
          format!("{lib}.dylib"),
        ]),
      }
    }
    artifacts
  }

  fn compile(&self, config: &BuildConfig) -> Result<()> {
    info!(os = %config.effective_os(), "building brotli 1.0.7");
    let env = with_compiler_pair(&config.env);
    let args = Self::cmake_args(config, &env);
    config
      .tools
      .configure_and_install("brotli", &args, &Self::build_dir(&config.deps_path), &env)
  }

  fn install(&self, config: &BuildConfig) -> Result<()> {
    let prefix = Self::install_dir(&config.deps_path);
    self.artifacts(config.effective_os()).install_from(&prefix, &config.layout)
  }

  fn dep_environ(&self, deps_path: &Path, _target: Option<Os>, host: Os, base: &Environ) -> Environ {
    let sep = host.path_list_separator();
    let install = Self::install_dir(deps_path);
    let mut env = base.clone();
    env.prepend_path("LIBRARY_PATH", &install.join("lib"), sep);
    env.prepend_path("PKG_CONFIG_PATH", &install.join("lib").join("pkgconfig"), sep);
    env.prepend_path("CPATH", &install.join("include"), sep);
    env
  }
}
