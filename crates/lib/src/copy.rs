//! Copying build artifacts into the install tree.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{DepError, Result};
use crate::fetch::remove_file_if_exists;

/// Copy a single artifact, replacing whatever is at `to`.
///
/// On Unix a symlink is recreated as a symlink with the same target, so the
/// `libz.so -> libz.so.1` style aliases survive the copy. Elsewhere the link
/// is followed and the file contents copied.
pub fn copy_artifact(from: &Path, to: &Path) -> Result<()> {
  let copy_err = |source: std::io::Error| DepError::Copy {
    from: from.to_path_buf(),
    to: to.to_path_buf(),
    source,
  };

  let meta = fs::symlink_metadata(from).map_err(copy_err)?;

  #[cfg(unix)]
  {
    if meta.file_type().is_symlink() {
      let target = fs::read_link(from).map_err(copy_err)?;
      remove_file_if_exists(to).map_err(copy_err)?;
      std::os::unix::fs::symlink(&target, to).map_err(copy_err)?;
      debug!(from = ?from, to = ?to, target = ?target, "linked artifact");
      return Ok(());
    }
  }

  #[cfg(not(unix))]
  let _ = meta;

  remove_file_if_exists(to).map_err(copy_err)?;
  fs::copy(from, to).map_err(copy_err)?;
  debug!(from = ?from, to = ?to, "copied artifact");
  Ok(())
}

/// Copy each named file from `from_dir` into `to_dir`.
pub fn copy_artifacts(from_dir: &Path, to_dir: &Path, names: &[String]) -> Result<()> {
  for name in names {
    copy_artifact(&from_dir.join(name), &to_dir.join(name))?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn copies_regular_file_over_existing() {
    let temp = TempDir::new().unwrap();
    let from = temp.path().join("libz.dll.a");
    let to = temp.path().join("out.dll.a");
    fs::write(&from, "new").unwrap();
    fs::write(&to, "old").unwrap();

    copy_artifact(&from, &to).unwrap();

    assert_eq!(fs::read_to_string(&to).unwrap(), "new");
  }

  #[test]
  fn missing_source_is_a_copy_error() {
    let temp = TempDir::new().unwrap();
    let err = copy_artifact(&temp.path().join("nope"), &temp.path().join("out")).unwrap_err();
    assert!(matches!(err, DepError::Copy { .. }));
  }

  #[test]
  #[cfg(unix)]
  fn preserves_symlink_aliases() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    let dst = temp.path().join("dst");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir_all(&dst).unwrap();
    fs::write(src.join("libz.so.1.2.11"), "elf").unwrap();
    std::os::unix::fs::symlink("libz.so.1.2.11", src.join("libz.so.1")).unwrap();
    std::os::unix::fs::symlink("libz.so.1", src.join("libz.so")).unwrap();
    // A stale alias in the destination gets replaced.
    std::os::unix::fs::symlink("libz.so.0", dst.join("libz.so")).unwrap();

    let names: Vec<String> = ["libz.so.1.2.11", "libz.so.1", "libz.so"].map(String::from).into();
    copy_artifacts(&src, &dst, &names).unwrap();

    assert!(!fs::symlink_metadata(dst.join("libz.so.1.2.11")).unwrap().file_type().is_symlink());
    assert_eq!(fs::read_link(dst.join("libz.so.1")).unwrap(), Path::new("libz.so.1.2.11"));
    assert_eq!(fs::read_link(dst.join("libz.so")).unwrap(), Path::new("libz.so.1"));
    assert_eq!(fs::read_to_string(dst.join("libz.so")).unwrap(), "elf");
  }
}
