//! Product configuration trait for CLI binaries
//!
//! This trait defines the interface a binary implements to brand the
//! generator and configure the parts of its behavior that live outside the
//! composition core.

use std::path::Path;

/// Configuration trait for the CLI product
///
/// The binary implements this trait to define:
/// - Product identity (name, display name)
/// - Help-text links
/// - Environment variable names for overrides
/// - Post-setup instructions
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for the CLI command)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// Source repository, shown in help text
    fn repository_url(&self) -> &'static str;

    /// Issue tracker, shown in help text
    fn issues_url(&self) -> &'static str;

    /// Environment variable naming an npm-compatible binary to install with
    fn npm_env(&self) -> &'static str;

    /// Environment variable holding the diagnostic log filter
    fn log_env(&self) -> &'static str;

    /// Suggested name when prompting for the project
    fn default_project_name(&self) -> &'static str {
        "my-project"
    }

    /// Generate the "next steps" instructions after project creation.
    /// `pending` holds install commands that were not run or did not succeed.
    fn next_steps(&self, dir: &Path, pending: &[String]) -> Vec<String>;
}
