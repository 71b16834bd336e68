//! builddeps-lib: building pinned native dependencies
//!
//! This crate provides everything the `builddeps` binary drives:
//! - `Dependency`: a pinned library (zlib, Brotli) that can be checked, built and installed
//! - `BuildConfig`: the explicit inputs of one build (paths, target, environment, tools)
//! - `Environ`: an environment snapshot passed to child processes instead of mutating our own
//! - `fetch` / `cmake` / `copy`: source acquisition, CMake driving and artifact installation

pub mod cmake;
pub mod config;
pub mod copy;
pub mod deps;
pub mod environ;
pub mod error;
pub mod fetch;
pub mod layout;
pub mod platform;
pub mod toolchain;
pub mod util;

pub use config::BuildConfig;
pub use deps::{BuildStatus, Dependency};
pub use environ::Environ;
pub use error::{DepError, Result};
pub use layout::InstallLayout;
