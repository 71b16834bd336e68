//! zlib 1.2.11.
//!
//! A native build configures and installs once into `zlib-1.2.11.install`.
//! A cross build runs twice: first for the host into
//! `zlib-1.2.11.host.install`, then for the target into
//! `zlib-1.2.11.target.install`. Only the target install is copied into the
//! project layout; the host install is exported through `ALUSUS_HOST_*`.

use std::path::{Path, PathBuf};

use tracing::info;

use super::{Artifacts, Dependency, work_dir};
use crate::cmake::CmakeArgs;
use crate::config::{BuildConfig, is_cross};
use crate::environ::Environ;
use crate::error::Result;
use crate::fetch::SourceArchive;
use crate::platform::Os;
use crate::toolchain::{HOST_PREFIX, host_environ, with_compiler_pair};

pub static SOURCE: SourceArchive = SourceArchive {
  name: "zlib",
  version: "1.2.11",
  url: "https://sourceforge.net/projects/libpng/files/zlib/1.2.11/zlib-1.2.11.tar.gz",
  sha256: Some("c3e5e9fdd5004dcb542feda5ee4f0ff0744628baf8ed2dd5d66f8ca1197cb1a1"),
};

/// Which install prefix a build phase writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  Native,
  Host,
  Target,
}

impl Phase {
  fn suffix(&self) -> &'static str {
    match self {
      Phase::Native => "",
      Phase::Host => "host.",
      Phase::Target => "target.",
    }
  }

  pub fn build_dir(&self, deps_path: &Path) -> PathBuf {
    work_dir(deps_path, &SOURCE, &format!("{}build", self.suffix()))
  }

  pub fn install_dir(&self, deps_path: &Path) -> PathBuf {
    work_dir(deps_path, &SOURCE, &format!("{}install", self.suffix()))
  }
}

pub struct Zlib;

impl Zlib {
  /// The phase whose install prefix holds the artifacts for the final layout.
  pub fn final_phase(target: Option<Os>, host: Os) -> Phase {
    if is_cross(target, host) { Phase::Target } else { Phase::Native }
  }

  fn compile_native(&self, config: &BuildConfig) -> Result<()> {
    info!("building zlib 1.2.11 for the host");
    let deps = &config.deps_path;
    let env = with_compiler_pair(&config.env);
    let args = CmakeArgs::release(SOURCE.src_dir(deps), &Phase::Native.install_dir(deps), &env, config.host.os);
    config
      .tools
      .configure_and_install("zlib", &args, &Phase::Native.build_dir(deps), &env)
  }

  fn compile_cross(&self, config: &BuildConfig, target: Os) -> Result<()> {
    let deps = &config.deps_path;
    let host = config.host;

    info!("building zlib 1.2.11 for the host");
    let host_env = host_environ(&config.env, host.os);
    let mut args = CmakeArgs::release(SOURCE.src_dir(deps), &Phase::Host.install_dir(deps), &host_env, host.os);
    config
      .tools
      .configure_and_install("zlib (host)", &args, &Phase::Host.build_dir(deps), &host_env)?;

    info!(os = %target, "building zlib 1.2.11 for the target");
    let target_env = with_compiler_pair(&config.env);
    args
      .define("CMAKE_INSTALL_PREFIX", Phase::Target.install_dir(deps).to_string_lossy())
      .define_binutils(&target_env)
      .cross_compile(target, host.arch.as_str());
    match target {
      Os::MacOs => {
        args.define_macos_tools(&target_env);
      }
      Os::Windows => {
        args.define_windows_tools(&target_env);
      }
      Os::Linux => {}
    }
    config
      .tools
      .configure_and_install("zlib (target)", &args, &Phase::Target.build_dir(deps), &target_env)
  }
}

impl Dependency for Zlib {
  fn name(&self) -> &'static str {
    "zlib"
  }

  fn source(&self) -> &'static SourceArchive {
    &SOURCE
  }

  fn artifacts(&self, os: Os) -> Artifacts {
    let names = |names: &[&str]| names.iter().map(|n| n.to_string()).collect::<Vec<_>>();
    match os {
      Os::Windows => Artifacts {
        lib: names(&["libzlib.dll.a", "libz.dll.a"]),
        bin: names(&["libzlib.dll"]),
      },
      Os::Linux => Artifacts {
        lib: names(&["libz.so.1.2.11", "libz.so.1", "libz.so"]),
        bin: Vec::new(),
      },
      Os::MacOs => Artifacts {
        lib: names(&["libz.1.2.11.dylib", "libz.1.dylib", "libz.dylib"]),
        bin: Vec::new(),
      },
    }
  }

  fn compile(&self, config: &BuildConfig) -> Result<()> {
    match config.target {
      Some(target) if config.is_cross() => self.compile_cross(config, target),
      _ => self.compile_native(config),
    }
  }

  fn install(&self, config: &BuildConfig) -> Result<()> {
    let os = config.effective_os();
    let prefix = Self::final_phase(config.target, config.host.os).install_dir(&config.deps_path);

    // MinGW zlib only installs libzlib.dll.a; consumers also link -lz.
    if os == Os::Windows {
      let lib = prefix.join("lib");
      crate::copy::copy_artifact(&lib.join("libzlib.dll.a"), &lib.join("libz.dll.a"))?;
    }

    self.artifacts(os).install_from(&prefix, &config.layout)
  }

  fn dep_environ(&self, deps_path: &Path, target: Option<Os>, host: Os, base: &Environ) -> Environ {
    let sep = host.path_list_separator();
    let mut env = base.clone();

    if is_cross(target, host) {
      let host_install = Phase::Host.install_dir(deps_path);
      let target_install = Phase::Target.install_dir(deps_path);

      env.prepend_path(&format!("{HOST_PREFIX}PATH"), &host_install.join("bin"), sep);
      env.prepend_path(&format!("{HOST_PREFIX}LD_LIBRARY_PATH"), &host_install.join("lib"), sep);
      env.prepend_path(&format!("{HOST_PREFIX}LIBRARY_PATH"), &host_install.join("lib"), sep);
      env.prepend_path(&format!("{HOST_PREFIX}CPATH"), &host_install.join("include"), sep);
      env.prepend_path(
        &format!("{HOST_PREFIX}PKG_CONFIG_PATH"),
        &host_install.join("share").join("pkgconfig"),
        sep,
      );
      env.prepend_path("CPATH", &target_install.join("include"), sep);
      env.prepend_path("LIBRARY_PATH", &target_install.join("lib"), sep);
      env.prepend_path("PKG_CONFIG_PATH", &target_install.join("share").join("pkgconfig"), sep);
      env.set("ZLIB_ROOT_DIR", target_install.into_os_string());
    } else {
      let install = Phase::Native.install_dir(deps_path);
      env.prepend_path("CPATH", &install.join("include"), sep);
      env.prepend_path("LIBRARY_PATH", &install.join("lib"), sep);
      env.prepend_path("PKG_CONFIG_PATH", &install.join("share").join("pkgconfig"), sep);
    }

    env
  }
}
