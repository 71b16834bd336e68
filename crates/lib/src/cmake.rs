//! CMake configure and `make install` invocations.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::environ::Environ;
use crate::error::{DepError, Result};
use crate::platform::Os;
use crate::toolchain::Tool;

/// Arguments for a CMake configure step.
///
/// Cache definitions keep insertion order; defining a key a second time
/// replaces its value in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmakeArgs {
  source_dir: PathBuf,
  defines: Vec<(String, String)>,
  generator: Option<String>,
}

impl CmakeArgs {
  pub fn new(source_dir: impl Into<PathBuf>) -> Self {
    Self {
      source_dir: source_dir.into(),
      defines: Vec::new(),
      generator: None,
    }
  }

  /// Set `-D<key>=<value>`, replacing an existing definition of `key`.
  pub fn define(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
    let value = value.into();
    match self.defines.iter_mut().find(|(k, _)| k == key) {
      Some(entry) => entry.1 = value,
      None => self.defines.push((key.to_string(), value)),
    }
    self
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.defines.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
  }

  pub fn generator(&mut self, generator: &str) -> &mut Self {
    self.generator = Some(generator.to_string());
    self
  }

  /// Release build into `install_prefix`, with the archiver, linker and
  /// strip tool taken from `env`.
  pub fn release_with_binutils(source_dir: impl Into<PathBuf>, install_prefix: &Path, env: &Environ) -> Self {
    let mut args = Self::new(source_dir);
    args
      .define("CMAKE_BUILD_TYPE", "Release")
      .define("CMAKE_INSTALL_PREFIX", install_prefix.to_string_lossy());
    args.define_binutils(env);
    args
  }

  /// [`release_with_binutils`](Self::release_with_binutils) plus the host's
  /// platform tools: Mach-O tools on macOS, the resource compiler and MinGW
  /// makefiles on Windows.
  pub fn release(source_dir: impl Into<PathBuf>, install_prefix: &Path, env: &Environ, host: Os) -> Self {
    let mut args = Self::release_with_binutils(source_dir, install_prefix, env);
    match host {
      Os::MacOs => {
        args.define_macos_tools(env);
      }
      Os::Windows => {
        args
          .define_windows_tools(env)
          .generator("MinGW Makefiles")
          .define("CMAKE_SH", "CMAKE_SH-NOTFOUND");
      }
      Os::Linux => {}
    }
    args
  }

  /// Archiver, ranlib, linker and strip from `env`.
  pub fn define_binutils(&mut self, env: &Environ) -> &mut Self {
    self
      .define("CMAKE_RANLIB", Tool::Ranlib.resolve(env))
      .define("CMAKE_AR", Tool::Ar.resolve(env))
      .define("CMAKE_LINKER", Tool::Ld.resolve(env))
      .define("CMAKE_STRIP", Tool::Strip.resolve(env))
  }

  pub fn define_macos_tools(&mut self, env: &Environ) -> &mut Self {
    self
      .define("CMAKE_INSTALL_NAME_TOOL", Tool::InstallNameTool.resolve(env))
      .define("CMAKE_OTOOL", Tool::Otool.resolve(env))
  }

  pub fn define_windows_tools(&mut self, env: &Environ) -> &mut Self {
    self.define("CMAKE_RC_COMPILER", Tool::Rc.resolve(env))
  }

  /// Mark the build as a cross-compile for `target` on a `processor` CPU.
  pub fn cross_compile(&mut self, target: Os, processor: &str) -> &mut Self {
    self
      .define("CMAKE_CROSSCOMPILING", "TRUE")
      .define("CMAKE_SYSTEM_NAME", target.cmake_system_name())
      .define("CMAKE_SYSTEM_PROCESSOR", processor)
  }

  pub fn to_args(&self) -> Vec<String> {
    let mut args = vec![self.source_dir.to_string_lossy().into_owned()];
    args.extend(self.defines.iter().map(|(k, v)| format!("-D{k}={v}")));
    if let Some(generator) = &self.generator {
      args.push("-G".to_string());
      args.push(generator.clone());
    }
    args
  }
}

/// The programs that run a CMake build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmakeTools {
  pub cmake: String,
  pub make: String,
  pub jobs: usize,
}

impl CmakeTools {
  /// Configure `build_dir` then run `make -j<jobs> install` in it.
  ///
  /// `build_dir` is created if missing. Both children run with exactly
  /// `env` as their environment.
  pub fn configure_and_install(&self, step: &str, args: &CmakeArgs, build_dir: &Path, env: &Environ) -> Result<()> {
    std::fs::create_dir_all(build_dir)?;

    info!(step = %step, build_dir = ?build_dir, "configuring");
    run(step, &self.cmake, &args.to_args(), build_dir, env)?;

    info!(step = %step, jobs = self.jobs, "building and installing");
    let make_args = vec![format!("-j{}", self.jobs), "install".to_string()];
    run(step, &self.make, &make_args, build_dir, env)
  }
}

/// Run `program` in `cwd` with exactly `env`, failing on a non-zero exit.
pub fn run(step: &str, program: &str, args: &[String], cwd: &Path, env: &Environ) -> Result<()> {
  debug!(program = %program, args = ?args, cwd = ?cwd, "spawning process");

  let status = Command::new(program)
    .args(args)
    .current_dir(cwd)
    .env_clear()
    .envs(env.iter())
    .status()
    .map_err(|source| DepError::Spawn {
      program: program.to_string(),
      source,
    })?;

  if !status.success() {
    return Err(DepError::CommandFailed {
      step: step.to_string(),
      program: program.to_string(),
      code: status.code(),
    });
  }

  Ok(())
}
