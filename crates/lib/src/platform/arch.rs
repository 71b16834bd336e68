use std::fmt;

/// CPU architecture of the build host.
///
/// Only feeds `CMAKE_SYSTEM_PROCESSOR`, so architectures without a variant
/// are carried through by name instead of being rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
  X86_64,
  X86,
  Aarch64,
  Arm,
  Other(&'static str),
}

impl Arch {
  /// Detect the current CPU architecture at runtime
  pub fn current() -> Self {
    Self::from_name(std::env::consts::ARCH)
  }

  /// Map a `std::env::consts::ARCH` value.
  pub fn from_name(name: &'static str) -> Self {
    match name {
      "x86_64" => Self::X86_64,
      "x86" => Self::X86,
      "aarch64" => Self::Aarch64,
      "arm" => Self::Arm,
      other => Self::Other(other),
    }
  }

  /// Processor name as passed to `CMAKE_SYSTEM_PROCESSOR`.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::X86_64 => "x86_64",
      Self::X86 => "i686",
      Self::Aarch64 => "aarch64",
      Self::Arm => "arm",
      Self::Other(name) => name,
    }
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::platform::{Os, Platform};

  #[test]
  fn known_architectures_map_to_cmake_names() {
    assert_eq!(Arch::from_name("x86").as_str(), "i686");
    assert_eq!(Arch::from_name("aarch64"), Arch::Aarch64);
  }

  #[test]
  fn unknown_architecture_is_kept_by_name() {
    let arch = Arch::from_name("riscv64");
    assert_eq!(arch, Arch::Other("riscv64"));
    assert_eq!(arch.as_str(), "riscv64");
    assert_eq!(Platform::new(arch, Os::Linux).triple(), "riscv64-linux");
  }
}
