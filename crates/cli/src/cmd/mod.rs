mod build;
mod check;
mod env;
mod info;

pub use build::cmd_build;
pub use check::cmd_check;
pub use env::cmd_env;
pub use info::cmd_info;

use anyhow::{Context, Result};

use builddeps_lib::deps::{self, DEPENDENCIES, Dependency};
use builddeps_lib::{BuildConfig, Environ, InstallLayout};

use crate::{LayoutArgs, ToolArgs};

/// Resolve a dependency argument; `all` selects every registered dependency.
fn select(name: &str) -> Result<Vec<&'static dyn Dependency>> {
  if name == "all" {
    return Ok(DEPENDENCIES.to_vec());
  }
  let known = deps::names().collect::<Vec<_>>().join(", ");
  let dep = deps::require(name).with_context(|| format!("known dependencies: {known}, all"))?;
  Ok(vec![dep])
}

fn build_config(layout: &LayoutArgs, tools: Option<&ToolArgs>) -> Result<BuildConfig> {
  let install = InstallLayout::new(&layout.install_root, &layout.lib_dir, &layout.bin_dir);
  let mut config = BuildConfig::new(&layout.deps.deps_path, install, Environ::from_process())
    .context("Failed to set up build configuration")?
    .with_target(layout.deps.target);

  if let Some(tools) = tools {
    if let Some(jobs) = tools.jobs {
      config = config.with_jobs(jobs);
    }
    if let Some(cmake) = &tools.cmake {
      config = config.with_cmake(cmake.as_str());
    }
    if let Some(make) = &tools.make {
      config = config.with_make(make.as_str());
    }
  }

  Ok(config)
}
