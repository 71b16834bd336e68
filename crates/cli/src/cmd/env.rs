//! Implementation of the `builddeps env` command.
//!
//! Prints only the variables whose value differs from the current
//! environment, so the output can be sourced or merged by a caller.

use std::collections::BTreeMap;

use anyhow::{Context, Result};

use builddeps_lib::Environ;
use builddeps_lib::deps;
use builddeps_lib::platform::Platform;

use crate::DepsArgs;
use crate::output::print_json;

pub fn cmd_env(name: &str, args: &DepsArgs, json: bool) -> Result<()> {
  let dep = deps::require(name)?;
  let host = Platform::host().context("Failed to detect host platform")?;
  let deps_path = std::path::absolute(&args.deps_path).context("Failed to resolve deps path")?;

  let base = Environ::from_process();
  let env = dep.dep_environ(&deps_path, args.target, host.os, &base);
  let changed: BTreeMap<String, String> = env
    .changed_from(&base)
    .map(|(k, v)| (k.to_string_lossy().into_owned(), v.to_string_lossy().into_owned()))
    .collect();

  if json {
    print_json(&changed)?;
  } else {
    for (key, value) in changed {
      println!("{key}={value}");
    }
  }

  Ok(())
}
