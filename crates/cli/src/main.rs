mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use builddeps_lib::platform::Os;

/// builddeps - Build pinned native dependencies (zlib, Brotli)
#[derive(Parser)]
#[command(name = "builddeps")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

/// Where sources are unpacked and what they are built for.
#[derive(Args, Debug, Clone)]
pub struct DepsArgs {
  /// Working directory for sources, build trees and intermediate installs
  #[arg(long, env = "BUILDDEPS_DEPS_PATH", default_value = "Deps")]
  pub deps_path: PathBuf,

  /// Target platform (linux, macos, windows); defaults to the host
  #[arg(long)]
  pub target: Option<Os>,
}

/// Options shared by commands that look at or produce installed artifacts.
#[derive(Args, Debug, Clone)]
pub struct LayoutArgs {
  #[command(flatten)]
  pub deps: DepsArgs,

  /// Root of the install tree
  #[arg(long, env = "BUILDDEPS_INSTALL_ROOT", default_value = "Install")]
  pub install_root: PathBuf,

  /// Library directory, relative to the install root
  #[arg(long, default_value = "Lib")]
  pub lib_dir: PathBuf,

  /// Binary directory, relative to the install root
  #[arg(long, default_value = "Bin")]
  pub bin_dir: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct ToolArgs {
  /// Parallel make jobs (default: available parallelism)
  #[arg(short, long)]
  pub jobs: Option<usize>,

  /// CMake program
  #[arg(long, env = "BUILDDEPS_CMAKE")]
  pub cmake: Option<String>,

  /// Make program (default: make, or mingw32-make on Windows)
  #[arg(long, env = "BUILDDEPS_MAKE")]
  pub make: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
  /// Download, build and install a dependency unless it is already installed
  Build {
    /// Dependency name, or `all`
    dep: String,

    #[command(flatten)]
    layout: LayoutArgs,

    #[command(flatten)]
    tools: ToolArgs,

    /// Output as JSON
    #[arg(long)]
    json: bool,
  },

  /// Check whether a dependency is installed (exit 1 if not)
  Check {
    /// Dependency name, or `all`
    dep: String,

    #[command(flatten)]
    layout: LayoutArgs,

    /// Output as JSON
    #[arg(long)]
    json: bool,
  },

  /// Print the environment later build steps need for a dependency
  Env {
    /// Dependency name
    dep: String,

    #[command(flatten)]
    deps: DepsArgs,

    /// Output as JSON
    #[arg(long)]
    json: bool,
  },

  /// Show host platform and known dependencies
  Info,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Build {
      dep,
      layout,
      tools,
      json,
    } => cmd::cmd_build(&dep, &layout, &tools, json),
    Commands::Check { dep, layout, json } => cmd::cmd_check(&dep, &layout, json),
    Commands::Env { dep, deps, json } => cmd::cmd_env(&dep, &deps, json),
    Commands::Info => {
      cmd::cmd_info();
      Ok(())
    }
  }
}
