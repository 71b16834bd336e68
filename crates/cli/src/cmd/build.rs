//! Implementation of the `builddeps build` command.

use std::time::Instant;

use anyhow::Result;
use tracing::debug;

use builddeps_lib::BuildStatus;

use super::{build_config, select};
use crate::output::{format_duration, print_error, print_info, print_json, print_stat, print_success};
use crate::{LayoutArgs, ToolArgs};

/// Build each selected dependency in order, stopping at the first failure.
pub fn cmd_build(name: &str, layout: &LayoutArgs, tools: &ToolArgs, json: bool) -> Result<()> {
  let selected = select(name)?;
  let config = build_config(layout, Some(tools))?;
  debug!(config = ?config, "build configuration");

  let target = config.effective_os();
  let mut items = Vec::new();
  for dep in selected {
    let label = dep.display_name();
    let start = Instant::now();
    if !json {
      print_info(&format!("Building {label}..."));
    }

    let status = match dep.build(&config) {
      Ok(status) => status,
      Err(e) => {
        print_error(&format!("Building {label}."));
        return Err(anyhow::Error::new(e).context(format!("Failed to build {label}")));
      }
    };

    if json {
      let source = dep.source();
      items.push(serde_json::json!({
        "name": source.name,
        "version": source.version,
        "status": status,
        "duration_ms": start.elapsed().as_millis() as u64,
      }));
      continue;
    }

    match status {
      BuildStatus::AlreadyBuilt => print_success(&format!("{label} is already built.")),
      BuildStatus::Built => {
        print_success(&format!("Built {label}."));
        print_stat("Target", target.as_str());
        print_stat("Duration", &format_duration(start.elapsed()));
      }
    }
  }

  if json {
    print_json(&serde_json::json!({ "target": target, "dependencies": items }))?;
  }

  Ok(())
}
