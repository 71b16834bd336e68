//! Install path descriptor.

use std::path::{Path, PathBuf};

/// Where a dependency's artifacts land in the project install tree.
///
/// `lib` and `bin` are relative to `root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
  pub root: PathBuf,
  pub lib: PathBuf,
  pub bin: PathBuf,
}

impl InstallLayout {
  pub fn new(root: impl Into<PathBuf>, lib: impl Into<PathBuf>, bin: impl Into<PathBuf>) -> Self {
    Self {
      root: root.into(),
      lib: lib.into(),
      bin: bin.into(),
    }
  }

  /// The toolchain project's own convention: `Lib` and `Bin` under the root.
  pub fn conventional(root: impl Into<PathBuf>) -> Self {
    Self::new(root, "Lib", "Bin")
  }

  pub fn lib_dir(&self) -> PathBuf {
    self.root.join(&self.lib)
  }

  pub fn bin_dir(&self) -> PathBuf {
    self.root.join(&self.bin)
  }

  pub fn root(&self) -> &Path {
    &self.root
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn conventional_layout() {
    let layout = InstallLayout::conventional("/work/Install");
    assert_eq!(layout.lib_dir(), PathBuf::from("/work/Install/Lib"));
    assert_eq!(layout.bin_dir(), PathBuf::from("/work/Install/Bin"));
  }

  #[test]
  fn custom_subdirectories() {
    let layout = InstallLayout::new("/opt/tc", "lib64", "libexec/bin");
    assert_eq!(layout.lib_dir(), PathBuf::from("/opt/tc/lib64"));
    assert_eq!(layout.bin_dir(), PathBuf::from("/opt/tc/libexec/bin"));
  }
}
