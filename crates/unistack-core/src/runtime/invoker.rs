//! Dependency installation through an external package manager
//!
//! The composition core never spawns processes itself. It produces a list of
//! [`InstallCommand`]s, and a [`ProcessInvoker`] runs them in an explicit
//! working directory. Tests substitute a recording invoker.

use colored::Colorize;
use std::fmt;
use std::io;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command as TokioCommand;

/// Binary used when no override is configured
pub const DEFAULT_NPM: &str = "npm";

/// An `npm install` invocation, optionally for specific packages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallCommand {
    /// Install as a development dependency (`-D`)
    pub dev: bool,
    /// Package specs; empty means "install everything in the manifest"
    pub packages: &'static [&'static str],
}

impl InstallCommand {
    /// Plain `npm install` of the manifest's dependencies
    pub const MANIFEST: InstallCommand = InstallCommand {
        dev: false,
        packages: &[],
    };

    pub fn args(&self) -> Vec<&'static str> {
        let mut args = vec!["install"];
        if self.dev {
            args.push("-D");
        }
        args.extend_from_slice(self.packages);
        args
    }

    /// Render the full command line for a given npm binary
    pub fn command_line(&self, program: &str) -> String {
        std::iter::once(program)
            .chain(self.args())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for InstallCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line(DEFAULT_NPM))
    }
}

/// Exit of an external process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessExit {
    pub success: bool,
    pub code: Option<i32>,
}

impl From<std::process::ExitStatus> for ProcessExit {
    fn from(status: std::process::ExitStatus) -> Self {
        ProcessExit {
            success: status.success(),
            code: status.code(),
        }
    }
}

/// Runs install commands on behalf of the builder.
#[allow(async_fn_in_trait)]
pub trait ProcessInvoker {
    /// Human-readable command line, used in reports and next steps
    fn describe(&self, command: &InstallCommand) -> String;

    /// Run `command` inside `cwd`, blocking until it exits.
    async fn run(&self, cwd: &Path, command: &InstallCommand) -> io::Result<ProcessExit>;
}

/// Invoker that spawns a real npm-compatible binary with inherited stdio.
#[derive(Debug, Clone)]
pub struct NpmInvoker {
    program: String,
}

impl NpmInvoker {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Use the binary named by `env_var`, falling back to `npm`.
    pub fn from_env(env_var: &str) -> Self {
        match std::env::var(env_var) {
            Ok(program) if !program.trim().is_empty() => Self::new(program.trim()),
            _ => Self::new(DEFAULT_NPM),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for NpmInvoker {
    fn default() -> Self {
        Self::new(DEFAULT_NPM)
    }
}

impl ProcessInvoker for NpmInvoker {
    fn describe(&self, command: &InstallCommand) -> String {
        command.command_line(&self.program)
    }

    async fn run(&self, cwd: &Path, command: &InstallCommand) -> io::Result<ProcessExit> {
        println!();
        println!("{} {}", "Running:".dimmed(), self.describe(command).yellow());
        println!();

        let status = TokioCommand::new(&self.program)
            .args(command.args())
            .current_dir(cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await?;

        tracing::debug!(command = %self.describe(command), code = ?status.code(), "install finished");
        Ok(status.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_rendering() {
        let dev = InstallCommand {
            dev: true,
            packages: &["tailwindcss@3.4.13", "postcss"],
        };
        assert_eq!(dev.command_line("npm"), "npm install -D tailwindcss@3.4.13 postcss");
        assert_eq!(InstallCommand::MANIFEST.to_string(), "npm install");
    }

    #[test]
    fn test_describe_uses_configured_program() {
        let invoker = NpmInvoker::new("pnpm");
        assert_eq!(invoker.describe(&InstallCommand::MANIFEST), "pnpm install");
        assert_eq!(NpmInvoker::default().program(), "npm");
    }

    #[test]
    fn test_from_env_falls_back_to_npm() {
        let invoker = NpmInvoker::from_env("UNISTACK_TEST_UNSET_NPM_OVERRIDE");
        assert_eq!(invoker.program(), DEFAULT_NPM);
    }

    #[tokio::test]
    async fn test_missing_binary_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let invoker = NpmInvoker::new("unistack-definitely-not-a-real-binary");
        let result = invoker.run(dir.path(), &InstallCommand::MANIFEST).await;
        assert!(result.is_err());
    }
}
