//! Runtime detection and dependency installation
//!
//! This module provides:
//! - Node.js / npm detection before running installs
//! - The process invoker used to install dependencies into a generated project

pub mod check;
pub mod invoker;

pub use check::{check_install_toolchain, check_node, check_npm, RuntimeInfo};
pub use invoker::{InstallCommand, NpmInvoker, ProcessExit, ProcessInvoker};
