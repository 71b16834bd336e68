//! Test utilities for builddeps-lib.
//!
//! Cross-platform shell helpers, plus fake `cmake`/`make` programs that let
//! the builders run end to end without a real toolchain.

use std::path::{Path, PathBuf};

use crate::environ::Environ;

/// Returns the shell command and args to execute a shell script.
#[cfg(unix)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("/bin/sh", vec!["-c".to_string(), script.to_string()])
}

#[cfg(windows)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), script.to_string()])
}

/// A minimal environment for spawning the fake tools.
pub fn test_environ() -> Environ {
  [("PATH", "/usr/bin:/bin")].into_iter().collect()
}

/// Fake `cmake`: records its arguments and the install prefix in the build dir.
#[cfg(unix)]
const FAKE_CMAKE: &str = r#"#!/bin/sh
printf '%s\n' "$@" > cmake-args.txt
for arg in "$@"; do
  case "$arg" in
    -DCMAKE_INSTALL_PREFIX=*) printf '%s' "${arg#-DCMAKE_INSTALL_PREFIX=}" > install-prefix.txt ;;
  esac
done
"#;

/// Fake `make install`: lays out every artifact zlib and brotli would install
/// on any platform under the recorded prefix.
#[cfg(unix)]
const FAKE_MAKE: &str = r#"#!/bin/sh
printf '%s\n' "$@" > make-args.txt
prefix="$(cat install-prefix.txt)"
mkdir -p "$prefix/lib" "$prefix/bin" "$prefix/include"
cd "$prefix/lib"
for lib in z brotlicommon brotlidec brotlienc; do
  case "$lib" in z) ver=1.2.11 ;; *) ver=1.0.7 ;; esac
  echo elf > "lib$lib.so.$ver"
  ln -sf "lib$lib.so.$ver" "lib$lib.so.1"
  ln -sf "lib$lib.so.1" "lib$lib.so"
  echo macho > "lib$lib.$ver.dylib"
  ln -sf "lib$lib.$ver.dylib" "lib$lib.1.dylib"
  ln -sf "lib$lib.1.dylib" "lib$lib.dylib"
done
for lib in zlib brotlicommon brotlidec brotlienc; do
  echo implib > "lib$lib.dll.a"
  echo pe > "../bin/lib$lib.dll"
done
"#;

/// A fake make that always fails.
#[cfg(unix)]
const FAILING_MAKE: &str = "#!/bin/sh\nexit 2\n";

#[cfg(unix)]
fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
  use std::os::unix::fs::PermissionsExt;

  let path = dir.join(name);
  std::fs::write(&path, body).unwrap();
  std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  path
}

/// Write fake `cmake` and `make` scripts into `dir`, returning their paths.
#[cfg(unix)]
pub fn fake_cmake_tools(dir: &Path) -> (PathBuf, PathBuf) {
  std::fs::create_dir_all(dir).unwrap();
  (write_script(dir, "cmake", FAKE_CMAKE), write_script(dir, "make", FAKE_MAKE))
}

/// Like [`fake_cmake_tools`], but `make` exits with status 2.
#[cfg(unix)]
pub fn failing_cmake_tools(dir: &Path) -> (PathBuf, PathBuf) {
  std::fs::create_dir_all(dir).unwrap();
  (write_script(dir, "cmake", FAKE_CMAKE), write_script(dir, "make", FAILING_MAKE))
}

/// Mark `source` as already extracted so builds skip the download.
pub fn pretend_extracted(source: &crate::fetch::SourceArchive, deps_path: &Path) {
  std::fs::create_dir_all(source.src_dir(deps_path)).unwrap();
  std::fs::write(source.marker_path(deps_path), "EXTRACTED CHECKER").unwrap();
}

/// Read back the arguments the fake cmake recorded in `build_dir`.
pub fn recorded_cmake_args(build_dir: &Path) -> Vec<String> {
  std::fs::read_to_string(build_dir.join("cmake-args.txt"))
    .unwrap()
    .lines()
    .map(str::to_string)
    .collect()
}
