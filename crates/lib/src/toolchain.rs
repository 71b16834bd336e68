//! Toolchain resolution.
//!
//! Builders pass every tool to CMake explicitly. Each tool is read from its
//! environment variable, falls back to a conventional name, and is then
//! looked up on the `PATH` of the same environment the tool will run in.

use std::path::PathBuf;

use tracing::debug;

use crate::environ::Environ;
use crate::platform::Os;

/// Prefix of the variables that describe the host toolchain during a cross build.
pub const HOST_PREFIX: &str = "ALUSUS_HOST_";

/// Search-path variables that must not leak from the target toolchain into a
/// host build.
pub const SEARCH_PATH_VARS: [&str; 5] = ["LIBRARY_PATH", "CPATH", "C_INCLUDE_PATH", "CPLUS_INCLUDE_PATH", "PKG_CONFIG_PATH"];

/// A build tool that can be overridden through the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
  Cc,
  Cxx,
  Ar,
  As,
  Ranlib,
  Nm,
  Strip,
  Ld,
  /// Windows resource compiler.
  Rc,
  InstallNameTool,
  Otool,
}

impl Tool {
  /// Tools every host build configures.
  pub const COMMON: [Tool; 8] = [
    Tool::Cc,
    Tool::Cxx,
    Tool::Ar,
    Tool::As,
    Tool::Ranlib,
    Tool::Nm,
    Tool::Strip,
    Tool::Ld,
  ];

  /// Environment variable that overrides this tool.
  pub fn var(&self) -> &'static str {
    match self {
      Tool::Cc => "CC",
      Tool::Cxx => "CXX",
      Tool::Ar => "AR",
      Tool::As => "AS",
      Tool::Ranlib => "RANLIB",
      Tool::Nm => "NM",
      Tool::Strip => "STRIP",
      Tool::Ld => "LD",
      Tool::Rc => "RC",
      Tool::InstallNameTool => "INSTALL_NAME_TOOL",
      Tool::Otool => "OTOOL",
    }
  }

  /// Program used when the variable is unset.
  pub fn default_program(&self) -> &'static str {
    match self {
      Tool::Cc => "clang",
      Tool::Cxx => "clang++",
      Tool::Ar => "ar",
      Tool::As => "as",
      Tool::Ranlib => "ranlib",
      Tool::Nm => "nm",
      Tool::Strip => "strip",
      Tool::Ld => "ld",
      Tool::Rc => "windres",
      Tool::InstallNameTool => "install_name_tool",
      Tool::Otool => "otool",
    }
  }

  /// Name of the host-side override variable, e.g. `ALUSUS_HOST_CC`.
  pub fn host_var(&self) -> String {
    format!("{HOST_PREFIX}{}", self.var())
  }

  /// Tools that only exist on some platforms.
  pub fn platform_tools(os: Os) -> &'static [Tool] {
    match os {
      Os::Windows => &[Tool::Rc],
      Os::MacOs => &[Tool::InstallNameTool, Tool::Otool],
      Os::Linux => &[],
    }
  }

  /// The configured program name, before any `PATH` lookup.
  pub fn program<'a>(&self, env: &'a Environ) -> &'a str {
    env.get_or(self.var(), self.default_program())
  }

  /// The configured program, resolved against the `PATH` in `env`.
  pub fn resolve(&self, env: &Environ) -> String {
    resolve_program(self.program(env), env)
  }
}

/// Look a program up on the `PATH` stored in `env`, returning the bare name if
/// it cannot be found so the failure surfaces from the tool that needs it.
pub fn resolve_program(name: &str, env: &Environ) -> String {
  let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
  match which::which_in(name, env.get_os("PATH"), cwd) {
    Ok(path) => path.to_string_lossy().into_owned(),
    Err(err) => {
      debug!(program = %name, error = %err, "program not found on PATH");
      name.to_string()
    }
  }
}

/// Derive the environment for building host tools during a cross build.
///
/// Every tool takes its `ALUSUS_HOST_` override (or the default), search
/// paths are replaced by their host variants or dropped, and the compiler
/// pair is then pinned.
pub fn host_environ(base: &Environ, host: Os) -> Environ {
  let mut env = base.clone();

  for tool in Tool::COMMON.iter().chain(Tool::platform_tools(host)) {
    let program = base.get(&tool.host_var()).unwrap_or(tool.default_program());
    env.set(tool.var(), resolve_program(program, base));
  }

  for var in SEARCH_PATH_VARS {
    match base.get_os(&format!("{HOST_PREFIX}{var}")) {
      Some(value) => env.set(var, value),
      None => {
        env.remove(var);
      }
    }
  }

  with_compiler_pair(&env)
}

/// Pin `CC` and `CXX` to absolute compiler paths.
pub fn with_compiler_pair(base: &Environ) -> Environ {
  let mut env = base.clone();
  for tool in [Tool::Cc, Tool::Cxx] {
    env.set(tool.var(), tool.resolve(base));
  }
  env
}
