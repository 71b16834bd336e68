use anyhow::Result;

use super::{build_config, select};
use crate::LayoutArgs;
use crate::output::{print_error, print_json, print_success};

/// Report whether each selected dependency is installed; exits 1 if any is not.
pub fn cmd_check(name: &str, layout: &LayoutArgs, json: bool) -> Result<()> {
  let selected = select(name)?;
  let config = build_config(layout, None)?;
  let target = config.effective_os();

  let mut all_built = true;
  let mut items = Vec::new();
  for dep in selected {
    let built = dep.check_built(&config);
    all_built &= built;

    if json {
      let source = dep.source();
      items.push(serde_json::json!({ "name": source.name, "version": source.version, "built": built }));
    } else if built {
      print_success(&format!("{} is built.", dep.display_name()));
    } else {
      print_error(&format!("{} is not built.", dep.display_name()));
    }
  }

  if json {
    print_json(&serde_json::json!({ "target": target, "all_built": all_built, "dependencies": items }))?;
  }

  if !all_built {
    std::process::exit(1);
  }
  Ok(())
}
