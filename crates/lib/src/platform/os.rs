use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Operating systems a dependency can be built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
  Linux,
  MacOs,
  Windows,
}

impl Os {
  pub const ALL: [Os; 3] = [Os::Linux, Os::MacOs, Os::Windows];

  /// Detect the current operating system at runtime
  pub fn current() -> Option<Self> {
    match std::env::consts::OS {
      "linux" => Some(Self::Linux),
      "macos" => Some(Self::MacOs),
      "windows" => Some(Self::Windows),
      _ => None,
    }
  }

  /// Returns the lowercase identifier used on the command line
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Linux => "linux",
      Self::MacOs => "macos",
      Self::Windows => "windows",
    }
  }

  /// Value for `CMAKE_SYSTEM_NAME`.
  pub fn cmake_system_name(&self) -> &'static str {
    match self {
      Self::Linux => "Linux",
      Self::MacOs => "Darwin",
      Self::Windows => "Windows",
    }
  }

  /// Separator for PATH-style variables on this OS.
  pub fn path_list_separator(&self) -> &'static str {
    match self {
      Self::Windows => ";",
      Self::Linux | Self::MacOs => ":",
    }
  }

  /// The make tool that drives CMake-generated makefiles on this OS.
  pub fn make_program(&self) -> &'static str {
    match self {
      Self::Windows => "mingw32-make",
      Self::Linux | Self::MacOs => "make",
    }
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Os {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "linux" => Ok(Self::Linux),
      "macos" | "darwin" => Ok(Self::MacOs),
      "windows" => Ok(Self::Windows),
      other => Err(format!("unknown target system '{other}' (expected linux, macos or windows)")),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn current_returns_supported_os() {
    assert!(Os::current().is_some(), "Current OS should be supported");
  }

  #[test]
  fn parses_cli_names() {
    assert_eq!("linux".parse::<Os>().unwrap(), Os::Linux);
    assert_eq!("macOS".parse::<Os>().unwrap(), Os::MacOs);
    assert_eq!("darwin".parse::<Os>().unwrap(), Os::MacOs);
    assert_eq!("windows".parse::<Os>().unwrap(), Os::Windows);
    assert!("freebsd".parse::<Os>().is_err());
  }

  #[test]
  fn cmake_names_match_cmake_conventions() {
    assert_eq!(Os::MacOs.cmake_system_name(), "Darwin");
    assert_eq!(Os::Windows.cmake_system_name(), "Windows");
    assert_eq!(Os::Linux.cmake_system_name(), "Linux");
  }

  #[test]
  fn windows_uses_semicolon_and_mingw_make() {
    assert_eq!(Os::Windows.path_list_separator(), ";");
    assert_eq!(Os::Windows.make_program(), "mingw32-make");
    assert_eq!(Os::Linux.path_list_separator(), ":");
    assert_eq!(Os::MacOs.make_program(), "make");
  }
}
