//! Non-interactive project pipeline
//!
//! [`ProjectBuilder`] runs selection, manifest naming and composition entirely
//! in memory. The resulting [`ComposedProject`] is then materialized and,
//! optionally, has its dependencies installed through a [`ProcessInvoker`].

use crate::compose::{self, Selection};
use crate::error::Result;
use crate::features::{FeatureCategory, FeatureModule};
use crate::manifest;
use crate::runtime::{InstallCommand, ProcessExit, ProcessInvoker};
use crate::scaffold::{ScaffoldVariant, VariantId};
use crate::tree::ProjectTree;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ProjectBuilder {
    variant: VariantId,
    selection: Selection,
    project_name: Option<String>,
}

impl ProjectBuilder {
    pub fn new(variant: VariantId) -> Self {
        Self {
            variant,
            selection: Selection::new(),
            project_name: None,
        }
    }

    pub fn selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub fn feature(mut self, category: FeatureCategory, feature_id: impl Into<String>) -> Self {
        self.selection.set(category, feature_id);
        self
    }

    /// Name written into the manifest; the template's own name is kept if unset
    pub fn project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    pub fn build(self) -> Result<ComposedProject> {
        let variant = self.variant.variant();
        let mut tree = variant.base_tree();

        match &self.project_name {
            Some(name) => manifest::set_project_identity(&mut tree, name)?,
            None => manifest::ensure_module_type(&mut tree)?,
        }

        let features = compose::compose(&mut tree, variant, &self.selection)?;
        Ok(ComposedProject {
            variant,
            tree,
            features,
        })
    }
}

/// A fully composed, validated tree that has not been written anywhere yet
#[derive(Debug)]
pub struct ComposedProject {
    pub variant: &'static ScaffoldVariant,
    pub tree: ProjectTree,
    features: Vec<&'static dyn FeatureModule>,
}

impl ComposedProject {
    /// Resolved module per category, in pipeline order
    pub fn features(&self) -> &[&'static dyn FeatureModule] {
        &self.features
    }

    /// Modules that are not `none`
    pub fn active_features(&self) -> impl Iterator<Item = &'static dyn FeatureModule> + '_ {
        self.features.iter().copied().filter(|m| !m.is_none())
    }

    pub async fn materialize(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        self.tree.materialize(dir).await
    }

    /// Feature installs in pipeline order, then a plain install of the manifest
    pub fn install_plan(&self) -> Vec<InstallCommand> {
        self.active_features()
            .filter_map(|m| m.install_command())
            .chain(std::iter::once(InstallCommand::MANIFEST))
            .collect()
    }

    /// Run every command of the install plan inside `dir`. Failures are
    /// collected, not propagated: the project on disk is already complete.
    pub async fn install<I: ProcessInvoker>(&self, invoker: &I, dir: &Path) -> InstallReport {
        let mut report = InstallReport::default();
        for command in self.install_plan() {
            let described = invoker.describe(&command);
            match invoker.run(dir, &command).await {
                Ok(ProcessExit { success: true, .. }) => report.succeeded.push(described),
                Ok(ProcessExit { code, .. }) => {
                    tracing::warn!(command = %described, ?code, "install command failed");
                    report.failures.push(ExternalProcessFailure {
                        command: described,
                        reason: match code {
                            Some(code) => format!("exited with code {code}"),
                            None => "terminated by signal".to_string(),
                        },
                    });
                }
                Err(e) => {
                    tracing::warn!(command = %described, error = %e, "install command could not start");
                    report.failures.push(ExternalProcessFailure {
                        command: described,
                        reason: e.to_string(),
                    });
                }
            }
        }
        report
    }
}

/// A non-zero or unstartable install command. Reported as a warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalProcessFailure {
    pub command: String,
    pub reason: String,
}

impl fmt::Display for ExternalProcessFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` {}", self.command, self.reason)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub succeeded: Vec<String>,
    pub failures: Vec<ExternalProcessFailure>,
}

impl InstallReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scaffold::MANIFEST_PATH;
    use std::io;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingInvoker {
        calls: Mutex<Vec<(PathBuf, String)>>,
        fail_on: Option<&'static str>,
        missing: Option<&'static str>,
    }

    impl ProcessInvoker for RecordingInvoker {
        fn describe(&self, command: &InstallCommand) -> String {
            command.command_line("npm")
        }

        async fn run(&self, cwd: &Path, command: &InstallCommand) -> io::Result<ProcessExit> {
            let line = self.describe(command);
            self.calls
                .lock()
                .unwrap()
                .push((cwd.to_path_buf(), line.clone()));
            if self.missing.is_some_and(|needle| line.contains(needle)) {
                return Err(io::Error::new(io::ErrorKind::NotFound, "program not found"));
            }
            let failed = self.fail_on.is_some_and(|needle| line.contains(needle));
            Ok(ProcessExit {
                success: !failed,
                code: Some(if failed { 1 } else { 0 }),
            })
        }
    }

    #[test]
    fn test_build_names_project() {
        let project = ProjectBuilder::new(VariantId::NodeExpress)
            .project_name("api")
            .build()
            .unwrap();
        assert!(project.tree.read(MANIFEST_PATH).unwrap().contains("\"name\": \"api\""));
        assert_eq!(project.active_features().count(), 0);
    }

    #[test]
    fn test_unnamed_build_still_declares_module_type() {
        let project = ProjectBuilder::new(VariantId::NextjsTs)
            .feature(FeatureCategory::Styling, "tailwind")
            .build()
            .unwrap();
        let manifest = project.tree.read(MANIFEST_PATH).unwrap();
        assert!(project
            .tree
            .read("postcss.config.js")
            .unwrap()
            .starts_with("export default"));
        assert!(manifest.contains("\"type\": \"module\""));
        assert!(manifest.contains("\"name\": \"nextjs-ts\""));
    }

    #[test]
    fn test_install_plan_order() {
        let project = ProjectBuilder::new(VariantId::ReactTsVite)
            .feature(FeatureCategory::Styling, "tailwind")
            .feature(FeatureCategory::StateManagement, "zustand")
            .build()
            .unwrap();
        let plan: Vec<_> = project.install_plan().iter().map(|c| c.to_string()).collect();
        assert_eq!(
            plan,
            [
                "npm install zustand",
                "npm install -D tailwindcss@3.4.13 postcss autoprefixer",
                "npm install",
            ]
        );
    }

    #[tokio::test]
    async fn test_install_runs_in_project_dir() {
        let project = ProjectBuilder::new(VariantId::NextjsTs)
            .feature(FeatureCategory::StateManagement, "zustand")
            .build()
            .unwrap();
        let invoker = RecordingInvoker::default();
        let dir = PathBuf::from("/tmp/unistack-project");

        let report = project.install(&invoker, &dir).await;

        assert!(report.is_clean());
        let calls = invoker.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|(cwd, _)| cwd == &dir));
        assert_eq!(calls[0].1, "npm install zustand");
    }

    #[tokio::test]
    async fn test_install_failure_is_reported_not_raised() {
        let project = ProjectBuilder::new(VariantId::ReactJsVite)
            .feature(FeatureCategory::Styling, "tailwind")
            .build()
            .unwrap();
        let invoker = RecordingInvoker {
            fail_on: Some("tailwindcss"),
            ..Default::default()
        };

        let report = project.install(&invoker, Path::new("/tmp/x")).await;

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.succeeded, ["npm install"]);
        assert_eq!(
            report.failures[0].to_string(),
            "`npm install -D tailwindcss@3.4.13 postcss autoprefixer` exited with code 1"
        );
    }

    #[tokio::test]
    async fn test_unstartable_command_is_reported_and_install_continues() {
        let project = ProjectBuilder::new(VariantId::ReactTsVite)
            .feature(FeatureCategory::StateManagement, "zustand")
            .build()
            .unwrap();
        let invoker = RecordingInvoker {
            missing: Some("zustand"),
            ..Default::default()
        };

        let report = project.install(&invoker, Path::new("/tmp/y")).await;

        assert_eq!(invoker.calls.lock().unwrap().len(), 2);
        assert_eq!(report.succeeded, ["npm install"]);
        assert_eq!(
            report.failures,
            [ExternalProcessFailure {
                command: "npm install zustand".to_string(),
                reason: "program not found".to_string(),
            }]
        );
    }
}
