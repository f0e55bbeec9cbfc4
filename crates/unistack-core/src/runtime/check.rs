//! Runtime detection for Node.js and npm

use anyhow::Result;
use std::process::Command;

/// Runtime detection result
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

fn probe(name: &'static str, program: &str) -> RuntimeInfo {
    let output = Command::new(program).arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            RuntimeInfo {
                name,
                version: Some(version),
                available: true,
            }
        }
        _ => RuntimeInfo {
            name,
            version: None,
            available: false,
        },
    }
}

/// Check if Node.js is available
pub fn check_node() -> RuntimeInfo {
    probe("Node.js", "node")
}

/// Check if the given npm binary is available
pub fn check_npm(program: &str) -> RuntimeInfo {
    probe("npm", program)
}

/// Check everything needed to install dependencies; fails listing whatever is
/// missing.
pub fn check_install_toolchain(npm: &str) -> Result<Vec<RuntimeInfo>> {
    let mut results = Vec::new();
    let mut missing = Vec::new();

    let node = check_node();
    if node.available {
        results.push(node);
    } else {
        missing.push("Node.js (install from https://nodejs.org)");
    }

    let npm = check_npm(npm);
    if npm.available {
        results.push(npm);
    } else {
        missing.push("npm (ships with Node.js, or set UNISTACK_NPM to an npm-compatible client)");
    }

    if !missing.is_empty() {
        anyhow::bail!(
            "Missing required runtimes:\n{}",
            missing
                .iter()
                .map(|m| format!("  - {}", m))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    Ok(results)
}
