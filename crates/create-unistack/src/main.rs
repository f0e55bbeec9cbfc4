//! create-unistack - Composable project generator for full-stack applications

use anyhow::Result;
use clap::{Arg, ArgAction, CommandFactory, FromArgMatches, Parser};
use colored::Colorize;
use std::path::Path;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use unistack_core::tui::CreateArgs;
use unistack_core::{features, FeatureCategory, ProductConfig, ScaffoldError, VariantId, VARIANTS};

/// create-unistack product configuration
#[derive(Clone)]
pub struct UnistackConfig;

impl ProductConfig for UnistackConfig {
    fn name(&self) -> &'static str {
        "create-unistack"
    }

    fn display_name(&self) -> &'static str {
        "create-unistack"
    }

    fn cli_description(&self) -> &'static str {
        "A modern, extensible project generator for full-stack applications"
    }

    fn repository_url(&self) -> &'static str {
        "https://github.com/marcel-poroch/create-unistack"
    }

    fn issues_url(&self) -> &'static str {
        "https://github.com/marcel-poroch/create-unistack/issues"
    }

    fn npm_env(&self) -> &'static str {
        "UNISTACK_NPM"
    }

    fn log_env(&self) -> &'static str {
        "UNISTACK_LOG"
    }

    fn default_project_name(&self) -> &'static str {
        "my-app"
    }

    fn next_steps(&self, dir: &Path, pending: &[String]) -> Vec<String> {
        let mut steps = Vec::new();

        // Step 1: cd into the project unless it is the current directory
        if dir != Path::new(".") {
            steps.push(format!("cd {}", dir.display()));
        }

        // Step 2: Install commands that were skipped or failed
        steps.extend(pending.iter().cloned());

        // Step 3: Start dev server
        steps.push("npm run dev".to_string());

        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "create-unistack")]
#[command(about = "A modern, extensible project generator for full-stack applications")]
#[command(version)]
pub struct Args {
    /// Project directory to create
    pub project_name: Option<String>,

    /// Template to scaffold from
    #[arg(short, long, value_enum)]
    pub template: Option<VariantId>,

    /// State management feature (none, zustand)
    #[arg(long)]
    pub state: Option<String>,

    /// Styling feature (none, tailwind)
    #[arg(long)]
    pub styling: Option<String>,

    /// Install dependencies after generating the project
    #[arg(long, conflicts_with = "no_install")]
    pub install: bool,

    /// Skip dependency installation
    #[arg(long = "no-install")]
    pub no_install: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<Args> for CreateArgs {
    fn from(args: Args) -> Self {
        let install = match (args.install, args.no_install) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        CreateArgs {
            project_name: args.project_name,
            template: args.template,
            state: args.state,
            styling: args.styling,
            install,
            yes: args.yes,
        }
    }
}

/// Help footer listing templates, feature ids and project links.
fn help_footer<C: ProductConfig>(config: &C) -> String {
    let mut footer = String::from("Templates:\n");
    for variant in &VARIANTS {
        footer.push_str(&format!("  {:<16}{}\n", variant.id.as_str(), variant.display_name));
    }

    footer.push_str("\nFeatures:\n");
    for category in FeatureCategory::ALL {
        let ids: Vec<&str> = VARIANTS
            .iter()
            .flat_map(|variant| features::available(category, variant))
            .map(|module| module.id())
            .fold(Vec::new(), |mut ids, id| {
                if !ids.contains(&id) {
                    ids.push(id);
                }
                ids
            });
        footer.push_str(&format!("  --{:<14}{}\n", category.id(), ids.join(", ")));
    }

    footer.push_str(&format!(
        "\nRepository: {}\nIssues:     {}",
        config.repository_url(),
        config.issues_url()
    ));
    footer
}

/// The full command surface: derive args plus `-v/--version` and the help footer.
fn build_command<C: ProductConfig>(config: &C) -> clap::Command {
    Args::command()
        .name(config.name())
        .about(config.cli_description())
        .disable_version_flag(true)
        .arg(
            Arg::new("version")
                .short('v')
                .long("version")
                .help("Print version")
                .action(ArgAction::Version),
        )
        .after_help(help_footer(config))
}

fn parse_args<C: ProductConfig>(config: &C) -> Args {
    let matches = build_command(config).get_matches();
    Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

fn init_tracing<C: ProductConfig>(config: &C) {
    let filter = EnvFilter::try_from_env(config.log_env()).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let config = UnistackConfig;
    let args = parse_args(&config);
    init_tracing(&config);
    tracing::debug!(?args, "parsed arguments");

    let result = unistack_core::run(&config, args.into()).await;
    if let Err(e) = &result {
        tracing::debug!(error = %e, "run finished with error");
    }

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    match result {
        Ok(()) => Ok(()),
        Err(e) if matches!(e.downcast_ref::<ScaffoldError>(), Some(ScaffoldError::UserCancelled)) => {
            eprintln!("{}", "✖ Operation cancelled by user.".red());
            std::process::exit(1);
        }
        Err(e) => Err(e),
    }
}
