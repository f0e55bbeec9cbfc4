//! Charm-style CLI prompts using cliclack

use crate::builder::{ComposedProject, ProjectBuilder};
use crate::compose::Selection;
use crate::error::ScaffoldError;
use crate::features::{self, FeatureCategory, NONE};
use crate::manifest;
use crate::product::ProductConfig;
use crate::runtime::{check, NpmInvoker, ProcessInvoker};
use crate::scaffold::{ScaffoldVariant, VariantId};
use anyhow::Result;
use std::io;
use std::path::{Path, PathBuf};

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Project directory to create (relative to the current directory)
    pub project_name: Option<String>,

    /// Template to scaffold from
    pub template: Option<VariantId>,

    /// State management feature id
    pub state: Option<String>,

    /// Styling feature id
    pub styling: Option<String>,

    /// Whether to install dependencies; prompt when unset
    pub install: Option<bool>,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

impl CreateArgs {
    fn requested(&self, category: FeatureCategory) -> Option<&str> {
        match category {
            FeatureCategory::StateManagement => self.state.as_deref(),
            FeatureCategory::Styling => self.styling.as_deref(),
        }
    }
}

/// Turns an interrupted prompt (Esc / Ctrl+C) into a cancellation.
trait OrCancel<T> {
    fn or_cancel(self) -> Result<T>;
}

impl<T> OrCancel<T> for io::Result<T> {
    fn or_cancel(self) -> Result<T> {
        self.map_err(|e| match e.kind() {
            io::ErrorKind::Interrupted => ScaffoldError::UserCancelled.into(),
            _ => anyhow::Error::from(e),
        })
    }
}

/// Run the CLI with interactive prompts
pub async fn run<C: ProductConfig>(config: &C, args: CreateArgs) -> Result<()> {
    cliclack::intro(format!("✨ Welcome to {} ✨", config.display_name())).or_cancel()?;

    // Step 1: Project name and target directory
    let project_path = select_project_path(config, &args)?;
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let target_dir = current_dir.join(&project_path);
    let project_name = manifest::project_name_for(&target_dir);

    // Step 2: Confirm overwriting an existing directory
    let overwrite = confirm_overwrite(&target_dir, &project_name, &args)?;

    // Step 3: Select template
    let variant = select_variant(&args)?;

    // Step 4: One feature per category
    let selection = select_features(variant.variant(), &args)?;

    // Step 5: Install toggle
    let install = select_install(&args)?;

    // Step 6: Compose and write the project
    let project = create_project(variant, selection, &project_name, &target_dir, overwrite).await?;

    // Step 7: Install dependencies
    let invoker = NpmInvoker::from_env(config.npm_env());
    let pending = if install {
        install_dependencies(&invoker, &project, &target_dir).await?
    } else {
        project
            .install_plan()
            .iter()
            .map(|command| invoker.describe(command))
            .collect()
    };

    // Step 8: Show next steps
    print_next_steps(config, Path::new(&project_path), &pending)?;

    Ok(())
}

fn select_project_path<C: ProductConfig>(config: &C, args: &CreateArgs) -> Result<String> {
    if let Some(name) = args.project_name.as_deref().map(str::trim) {
        if name.is_empty() {
            anyhow::bail!("Project name required");
        }
        cliclack::log::info(format!("Project: {}", name))?;
        return Ok(name.to_string());
    }

    if args.yes {
        return Ok(config.default_project_name().to_string());
    }

    let input: String = cliclack::input("What should your project be called?")
        .placeholder(config.default_project_name())
        .default_input(config.default_project_name())
        .validate(|input: &String| {
            if input.trim().is_empty() {
                Err("Project name required")
            } else {
                Ok(())
            }
        })
        .interact()
        .or_cancel()?;

    Ok(input.trim().to_string())
}

/// Returns whether the existing directory must be removed first.
fn confirm_overwrite(target_dir: &Path, project_name: &str, args: &CreateArgs) -> Result<bool> {
    if !target_dir.exists() {
        return Ok(false);
    }

    // Auto-confirm with --yes flag
    let confirm = if args.yes {
        cliclack::log::warning(format!("Overwriting existing directory \"{}\"", project_name))?;
        true
    } else {
        cliclack::confirm(format!("Directory \"{}\" exists. Overwrite?", project_name))
            .initial_value(false)
            .interact()
            .or_cancel()?
    };

    if !confirm {
        return Err(ScaffoldError::UserCancelled.into());
    }

    Ok(true)
}

fn select_variant(args: &CreateArgs) -> Result<VariantId> {
    if let Some(id) = args.template {
        cliclack::log::info(format!("Using template: {}", id.variant().display_name))?;
        return Ok(id);
    }

    if args.yes {
        return Ok(VariantId::ReactTsVite);
    }

    let mut select = cliclack::select("Choose a template:");
    for id in VariantId::ALL {
        select = select.item(id, id.variant().display_name, id.as_str());
    }

    select.interact().or_cancel()
}

fn select_features(variant: &'static ScaffoldVariant, args: &CreateArgs) -> Result<Selection> {
    let mut selection = Selection::new();

    for category in FeatureCategory::ALL {
        let options = features::available(category, variant);

        let chosen: &'static str = if let Some(requested) = args.requested(category) {
            features::resolve(category, requested, variant)?.id()
        } else if options.len() <= 1 || args.yes {
            NONE
        } else {
            let mut select = cliclack::select(category.prompt());
            for module in &options {
                select = select.item(module.id(), module.display_name(), "");
            }
            select.interact().or_cancel()?
        };

        selection.set(category, chosen);
    }

    Ok(selection)
}

fn select_install(args: &CreateArgs) -> Result<bool> {
    if let Some(install) = args.install {
        return Ok(install);
    }
    if args.yes {
        return Ok(true);
    }

    cliclack::confirm("Run npm install?")
        .initial_value(true)
        .interact()
        .or_cancel()
}

async fn create_project(
    variant: VariantId,
    selection: Selection,
    project_name: &str,
    target_dir: &Path,
    overwrite: bool,
) -> Result<ComposedProject> {
    let spinner = cliclack::spinner();
    spinner.start(format!("Creating project in {} ...", target_dir.display()));

    let project = match ProjectBuilder::new(variant)
        .selection(selection)
        .project_name(project_name)
        .build()
    {
        Ok(project) => project,
        Err(e) => {
            spinner.stop("Failed to compose project");
            return Err(e.into());
        }
    };

    if overwrite {
        if let Err(e) = tokio::fs::remove_dir_all(target_dir).await {
            spinner.stop("Failed to clear existing directory");
            return Err(ScaffoldError::fs(target_dir, e).into());
        }
    }

    let written = match project.materialize(target_dir).await {
        Ok(written) => written,
        Err(e) => {
            spinner.stop("Failed to write project");
            return Err(e.into());
        }
    };

    spinner.stop(format!(
        "Created {} files in {}",
        written.len(),
        target_dir.display()
    ));

    let features: Vec<&str> = project.active_features().map(|m| m.display_name()).collect();
    if !features.is_empty() {
        cliclack::log::success(format!("Features: {}", features.join(", ")))?;
    }

    Ok(project)
}

/// Returns the commands that still need to be run by hand.
async fn install_dependencies(
    invoker: &NpmInvoker,
    project: &ComposedProject,
    target_dir: &Path,
) -> Result<Vec<String>> {
    let plan: Vec<String> = project
        .install_plan()
        .iter()
        .map(|command| invoker.describe(command))
        .collect();

    match check::check_install_toolchain(invoker.program()) {
        Ok(runtimes) => {
            let runtime_info: Vec<String> = runtimes
                .iter()
                .map(|r| format!("{} ({})", r.name, r.version.as_deref().unwrap_or("unknown")))
                .collect();
            cliclack::log::info(format!("Detected runtimes: {}", runtime_info.join(", ")))?;
        }
        Err(e) => {
            cliclack::log::warning(format!("{}\nSkipping dependency installation.", e))?;
            return Ok(plan);
        }
    }

    cliclack::log::step("Installing dependencies...")?;
    let report = project.install(invoker, target_dir).await;

    if report.is_clean() {
        cliclack::log::success("Dependencies installed")?;
    }
    for failure in &report.failures {
        cliclack::log::warning(format!("⚠ {}", failure))?;
    }

    Ok(report
        .failures
        .into_iter()
        .map(|failure| failure.command)
        .collect())
}

fn print_next_steps<C: ProductConfig>(config: &C, project_path: &Path, pending: &[String]) -> Result<()> {
    let steps = config.next_steps(project_path, pending);

    println!();
    println!("  {}", console::style("Next steps").bold());
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}  {}", console::style(format!("{}.", i + 1)).dim(), step);
    }

    cliclack::outro("✔ Project ready!")?;

    Ok(())
}
