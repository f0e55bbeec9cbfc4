//! TailwindCSS styling
//!
//! Writes the Tailwind and PostCSS configs, wires the Tailwind directives into
//! the variant's stylesheet pipeline and drops a styled demo card into the
//! entry component.

use super::{store, FeatureCategory, FeatureModule};
use crate::error::Result;
use crate::rewriter::{self, IntegrationPoint, PointKind};
use crate::runtime::InstallCommand;
use crate::scaffold::{FrameworkFamily, ScaffoldVariant};
use crate::tree::ProjectTree;
use serde::Serialize;

const DIRECTIVES_MARKER: &str = "tailwind:directives";
const GLOBALS_MARKER: &str = "tailwind:globals";
const DEMO_MARKER: &str = "tailwind:demo";

const TAILWIND_CONFIG_PATH: &str = "tailwind.config.js";
const POSTCSS_CONFIG_PATH: &str = "postcss.config.js";
const EDITOR_SETTINGS_PATH: &str = ".vscode/settings.json";
const SERVER_GLOBALS_PATH: &str = "app/globals.css";

const DIRECTIVES: &str = "@tailwind base;\n@tailwind components;\n@tailwind utilities;\n";
const GLOBALS_IMPORT: &str = r#"import "./globals.css";"#;

const POSTCSS_CONFIG: &str = r#"export default {
  plugins: {
    tailwindcss: {},
    autoprefixer: {},
  },
}
"#;

const CLIENT_GLOBS: &[&str] = &["./index.html", "./src/**/*.{js,jsx,ts,tsx}"];
const SERVER_GLOBS: &[&str] = &["./app/**/*.{js,ts,jsx,tsx}"];

const CLIENT_DEMO: &str = r#"<section className="mt-8 rounded-3xl border border-white/10 bg-slate-950 p-6 text-slate-50 shadow-xl shadow-slate-900/40">
  <h2 className="text-2xl font-semibold">Ready for your first component</h2>
  <p className="mt-2 text-sm text-slate-300">
    Start building UI instantly. Tailwind, Vite and your preferred stack are already configured.
  </p>
  <div className="mt-6 grid gap-3 sm:grid-cols-2">
    <div className="rounded-2xl border border-white/10 bg-white/5 p-4">
      <p className="text-sm text-slate-400">Styling</p>
      <p className="text-lg font-semibold">TailwindCSS</p>
    </div>
    <div className="rounded-2xl border border-white/10 bg-white/5 p-4">
      <p className="text-sm text-slate-400">Tooling</p>
      <p className="text-lg font-semibold">Vite</p>
    </div>
  </div>
</section>"#;

const CLIENT_DEMO_WITH_STORE: &str = r#"<section className="mt-8 rounded-3xl border border-white/10 bg-slate-950 p-6 text-slate-50 shadow-xl shadow-slate-900/40">
  <p className="text-xs uppercase tracking-widest text-indigo-300/90">Shared state</p>
  <h2 className="mt-2 text-2xl font-semibold">Zustand Counter Demo</h2>
  <p className="mt-2 text-sm text-slate-300">
    Increment or decrement the counter above to confirm the store works across components.
  </p>
  <div className="mt-6 grid gap-3 sm:grid-cols-2">
    <div className="rounded-2xl border border-white/10 bg-white/5 p-4">
      <p className="text-sm text-slate-400">Styling</p>
      <p className="text-lg font-semibold">TailwindCSS</p>
    </div>
    <div className="rounded-2xl border border-white/10 bg-white/5 p-4">
      <p className="text-sm text-slate-400">State</p>
      <p className="text-lg font-semibold">Zustand</p>
    </div>
  </div>
</section>"#;

const SERVER_DEMO: &str = r#"<section className="mt-8 rounded-3xl border border-white/10 bg-slate-950 p-8 text-slate-50 shadow-2xl shadow-slate-900/50">
  <p className="text-sm uppercase tracking-[0.3em] text-slate-400">Next.js + Tailwind</p>
  <p className="mt-2 text-slate-300">
    A minimal card shows how Tailwind utility classes can bring your UI to life immediately.
  </p>
  <div className="mt-6 flex flex-wrap gap-3">
    <button className="rounded-full bg-indigo-500 px-5 py-2 text-sm font-medium text-white transition hover:bg-indigo-400">
      Explore code
    </button>
    <button className="rounded-full border border-white/20 px-5 py-2 text-sm font-medium text-white/80 transition hover:border-white/40 hover:text-white">
      Read docs
    </button>
  </div>
</section>"#;

const SERVER_DEMO_WITH_STORE: &str = r#"<section className="mt-8 rounded-3xl border border-white/10 bg-slate-950 p-8 text-slate-50 shadow-2xl shadow-slate-900/50">
  <p className="text-sm uppercase tracking-[0.3em] text-slate-400">Next.js + Tailwind + Zustand</p>
  <p className="mt-2 text-slate-300">
    The counter above is a client component reading from a shared Zustand store.
  </p>
  <div className="mt-6 flex flex-wrap gap-3">
    <button className="rounded-full bg-indigo-500 px-5 py-2 text-sm font-medium text-white transition hover:bg-indigo-400">
      Explore code
    </button>
    <button className="rounded-full border border-white/20 px-5 py-2 text-sm font-medium text-white/80 transition hover:border-white/40 hover:text-white">
      Read docs
    </button>
  </div>
</section>"#;

/// Demo card keyed by (family, store present)
const DEMOS: &[(FrameworkFamily, bool, &str)] = &[
    (FrameworkFamily::ClientRendered, false, CLIENT_DEMO),
    (FrameworkFamily::ClientRendered, true, CLIENT_DEMO_WITH_STORE),
    (FrameworkFamily::ServerRendered, false, SERVER_DEMO),
    (FrameworkFamily::ServerRendered, true, SERVER_DEMO_WITH_STORE),
];

fn demo(family: FrameworkFamily, with_store: bool) -> Option<&'static str> {
    DEMOS
        .iter()
        .find(|(f, s, _)| *f == family && *s == with_store)
        .map(|(_, _, card)| *card)
}

/// Content globs Tailwind scans for class names
pub(crate) fn content_globs(family: FrameworkFamily) -> &'static [&'static str] {
    match family {
        FrameworkFamily::ClientRendered => CLIENT_GLOBS,
        FrameworkFamily::ServerRendered => SERVER_GLOBS,
        FrameworkFamily::BackendApi => &[],
    }
}

#[derive(Serialize)]
struct EditorSettings {
    #[serde(rename = "css.lint.unknownAtRules")]
    unknown_at_rules: &'static str,
}

fn tailwind_config(family: FrameworkFamily) -> Result<String> {
    let content = serde_json::to_string(content_globs(family))?;
    Ok(format!(
        "/** @type {{import('tailwindcss').Config}} */\nexport default {{\n  content: {content},\n  theme: {{ extend: {{}} }},\n  plugins: [],\n}}\n"
    ))
}

fn editor_settings() -> Result<String> {
    let mut settings = serde_json::to_string_pretty(&EditorSettings {
        unknown_at_rules: "ignore",
    })?;
    settings.push('\n');
    Ok(settings)
}

#[derive(Debug)]
pub struct TailwindCss;

impl FeatureModule for TailwindCss {
    fn id(&self) -> &'static str {
        "tailwind"
    }

    fn display_name(&self) -> &'static str {
        "TailwindCSS"
    }

    fn category(&self) -> FeatureCategory {
        FeatureCategory::Styling
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["tailwindcss", "utility-css"]
    }

    fn applies_to(&self, variant: &ScaffoldVariant) -> bool {
        variant.family.renders_ui()
    }

    fn forward(&self, tree: &mut ProjectTree, variant: &ScaffoldVariant) -> Result<()> {
        if !self.applies_to(variant) {
            tracing::warn!(variant = %variant.id, "no stylesheet pipeline for variant, skipping");
            return Ok(());
        }

        tree.write(TAILWIND_CONFIG_PATH, tailwind_config(variant.family)?);
        tree.write(POSTCSS_CONFIG_PATH, POSTCSS_CONFIG);
        tree.write(EDITOR_SETTINGS_PATH, editor_settings()?);

        match variant.family {
            FrameworkFamily::ServerRendered => {
                tree.write(SERVER_GLOBALS_PATH, DIRECTIVES);
                if let Some(layout) = variant.integration_point(PointKind::RootLayout) {
                    rewriter::insert_block(tree, &layout, GLOBALS_MARKER, GLOBALS_IMPORT);
                }
            }
            _ => {
                if let Some(stylesheet) = variant.integration_point(PointKind::GlobalStylesheet) {
                    rewriter::insert_block(tree, &stylesheet, DIRECTIVES_MARKER, DIRECTIVES);
                }
            }
        }

        // The card mentions the store, so refresh it on every run.
        if let Some(body) = variant.integration_point(PointKind::EntryComponent) {
            if let Some(card) = demo(variant.family, store::is_present(tree, variant)) {
                rewriter::remove_block(tree, &body, DEMO_MARKER);
                rewriter::insert_block(tree, &body, DEMO_MARKER, card);
            }
        }
        Ok(())
    }

    fn inverse(&self, tree: &mut ProjectTree, variant: &ScaffoldVariant) -> Result<()> {
        if let Some(body) = variant.integration_point(PointKind::EntryComponent) {
            rewriter::remove_block(tree, &body, DEMO_MARKER);
        }
        if let Some(layout) = variant.integration_point(PointKind::RootLayout) {
            rewriter::remove_block(tree, &layout, GLOBALS_MARKER);
        }
        if let Some(stylesheet) = variant.integration_point(PointKind::GlobalStylesheet) {
            rewriter::remove_block(tree, &stylesheet, DIRECTIVES_MARKER);
        }
        for path in self.generated_paths(variant) {
            tree.remove(&path);
        }
        Ok(())
    }

    fn integration_points(&self, variant: &ScaffoldVariant) -> Vec<IntegrationPoint> {
        [
            PointKind::GlobalStylesheet,
            PointKind::RootLayout,
            PointKind::EntryComponent,
        ]
        .into_iter()
        .filter_map(|kind| variant.integration_point(kind))
        .collect()
    }

    fn generated_paths(&self, variant: &ScaffoldVariant) -> Vec<String> {
        let mut paths = vec![
            TAILWIND_CONFIG_PATH.to_string(),
            POSTCSS_CONFIG_PATH.to_string(),
            EDITOR_SETTINGS_PATH.to_string(),
        ];
        if variant.family == FrameworkFamily::ServerRendered {
            paths.push(SERVER_GLOBALS_PATH.to_string());
        }
        paths
    }

    fn install_command(&self) -> Option<InstallCommand> {
        // Pinned to the v3 config format written above
        Some(InstallCommand {
            dev: true,
            packages: &["tailwindcss@3.4.13", "postcss", "autoprefixer"],
        })
    }
}
