//! Explicit environment snapshots.
//!
//! Builders never read or write the process environment directly. The binary
//! captures it once with [`Environ::from_process`] and every operation takes
//! an `Environ` by reference, returning a new one when it needs changes.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::Path;

/// An owned set of environment variables, ordered by name.
///
/// Names and values are kept as `OsString` so that nothing is lost on the
/// way from the process environment to a child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environ(BTreeMap<OsString, OsString>);

impl Environ {
  pub fn new() -> Self {
    Self::default()
  }

  /// Snapshot the current process environment.
  pub fn from_process() -> Self {
    Self(std::env::vars_os().collect())
  }

  /// Value of `key` if it is set and valid unicode.
  pub fn get(&self, key: &str) -> Option<&str> {
    self.get_os(key).and_then(OsStr::to_str)
  }

  pub fn get_os(&self, key: &str) -> Option<&OsStr> {
    self.0.get(OsStr::new(key)).map(OsString::as_os_str)
  }

  pub fn contains(&self, key: &str) -> bool {
    self.0.contains_key(OsStr::new(key))
  }

  pub fn set(&mut self, key: impl Into<OsString>, value: impl Into<OsString>) {
    self.0.insert(key.into(), value.into());
  }

  pub fn remove(&mut self, key: &str) -> Option<OsString> {
    self.0.remove(OsStr::new(key))
  }

  /// Value of `key`, or `default` when unset.
  pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
    self.get(key).unwrap_or(default)
  }

  /// Prepend `path` to the path list stored in `key`.
  ///
  /// An unset variable becomes just `path`.
  pub fn prepend_path(&mut self, key: &str, path: &Path, separator: &str) {
    let mut value = path.as_os_str().to_os_string();
    if let Some(existing) = self.get_os(key) {
      value.push(separator);
      value.push(existing);
    }
    self.set(key, value);
  }

  /// Variables in `self` that are new or changed relative to `base`.
  pub fn changed_from<'a>(&'a self, base: &'a Environ) -> impl Iterator<Item = (&'a OsStr, &'a OsStr)> + 'a {
    self
      .iter()
      .filter(move |(k, v)| base.0.get(*k).map(OsString::as_os_str) != Some(*v))
  }

  pub fn iter(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
    self.0.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str()))
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl<K: Into<OsString>, V: Into<OsString>> FromIterator<(K, V)> for Environ {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  fn prepend_to_unset_variable() {
    let mut env = Environ::new();
    env.prepend_path("CPATH", Path::new("/deps/include"), ":");
    assert_eq!(env.get("CPATH"), Some("/deps/include"));
  }

  #[test]
  fn prepend_to_existing_variable() {
    let mut env: Environ = [("LIBRARY_PATH", "/usr/lib")].into_iter().collect();
    env.prepend_path("LIBRARY_PATH", Path::new("/deps/lib"), ";");
    assert_eq!(env.get("LIBRARY_PATH"), Some("/deps/lib;/usr/lib"));
  }

  #[test]
  fn changed_from_reports_new_and_modified() {
    let base: Environ = [("A", "1"), ("B", "2")].into_iter().collect();
    let mut next = base.clone();
    next.set("B", "3");
    next.set("C", "4");

    let changed: Vec<_> = next.changed_from(&base).collect();
    assert_eq!(changed, vec![(OsStr::new("B"), OsStr::new("3")), (OsStr::new("C"), OsStr::new("4"))]);
  }

  #[test]
  #[serial]
  fn from_process_captures_variables() {
    temp_env::with_var("BUILDDEPS_ENVIRON_TEST", Some("present"), || {
      let env = Environ::from_process();
      assert_eq!(env.get("BUILDDEPS_ENVIRON_TEST"), Some("present"));
    });
  }

  #[test]
  #[serial]
  fn snapshot_is_detached_from_process() {
    temp_env::with_var("BUILDDEPS_ENVIRON_TEST", None::<&str>, || {
      let mut env = Environ::from_process();
      env.set("BUILDDEPS_ENVIRON_TEST", "local");
      assert!(std::env::var("BUILDDEPS_ENVIRON_TEST").is_err());
    });
  }

  #[test]
  #[serial]
  #[cfg(unix)]
  fn from_process_keeps_non_unicode_values() {
    use std::os::unix::ffi::OsStrExt;

    let raw = OsStr::from_bytes(b"/opt/caf\xe9/bin:/usr/bin");
    temp_env::with_var("BUILDDEPS_NON_UNICODE_PATH", Some(raw), || {
      let mut env = Environ::from_process();
      assert!(env.contains("BUILDDEPS_NON_UNICODE_PATH"));
      assert_eq!(env.get_os("BUILDDEPS_NON_UNICODE_PATH"), Some(raw));
      assert_eq!(env.get("BUILDDEPS_NON_UNICODE_PATH"), None);

      env.prepend_path("BUILDDEPS_NON_UNICODE_PATH", Path::new("/deps/bin"), ":");
      let expected = OsStr::from_bytes(b"/deps/bin:/opt/caf\xe9/bin:/usr/bin");
      assert_eq!(env.get_os("BUILDDEPS_NON_UNICODE_PATH"), Some(expected));
    });
  }
}
