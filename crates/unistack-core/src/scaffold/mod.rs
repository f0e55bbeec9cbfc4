//! Scaffold variants and base-tree selection
//!
//! The variant set is closed: every layout the generator can produce is listed
//! in [`VARIANTS`]. Each variant also declares the integration points feature
//! modules may patch.

mod templates;

use crate::error::{Result, ScaffoldError};
use crate::rewriter::{Anchor, CommentStyle, IntegrationPoint, PointKind};
use crate::tree::ProjectTree;
use std::fmt;
use std::str::FromStr;
use templates::TemplateFiles;

/// Path of the dependency manifest in every variant
pub const MANIFEST_PATH: &str = "package.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, clap::ValueEnum)]
pub enum VariantId {
    #[value(name = "react-ts-vite")]
    ReactTsVite,
    #[value(name = "react-js-vite")]
    ReactJsVite,
    #[value(name = "nextjs-ts")]
    NextjsTs,
    #[value(name = "node-express")]
    NodeExpress,
}

impl VariantId {
    pub const ALL: [VariantId; 4] = [
        VariantId::ReactTsVite,
        VariantId::ReactJsVite,
        VariantId::NextjsTs,
        VariantId::NodeExpress,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VariantId::ReactTsVite => "react-ts-vite",
            VariantId::ReactJsVite => "react-js-vite",
            VariantId::NextjsTs => "nextjs-ts",
            VariantId::NodeExpress => "node-express",
        }
    }

    pub fn variant(&self) -> &'static ScaffoldVariant {
        &VARIANTS[*self as usize]
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariantId {
    type Err = ScaffoldError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        VariantId::ALL
            .into_iter()
            .find(|id| id.as_str() == wanted)
            .ok_or_else(|| ScaffoldError::UnknownVariant(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageFlavor {
    Typed,
    Untyped,
}

impl LanguageFlavor {
    /// Extension for plain modules
    pub fn script_ext(&self) -> &'static str {
        match self {
            LanguageFlavor::Typed => "ts",
            LanguageFlavor::Untyped => "js",
        }
    }

    /// Extension for modules containing markup
    pub fn component_ext(&self) -> &'static str {
        match self {
            LanguageFlavor::Typed => "tsx",
            LanguageFlavor::Untyped => "jsx",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameworkFamily {
    ClientRendered,
    ServerRendered,
    BackendApi,
}

impl FrameworkFamily {
    /// Whether the family renders a UI with a stylesheet pipeline
    pub fn renders_ui(&self) -> bool {
        !matches!(self, FrameworkFamily::BackendApi)
    }
}

#[derive(Debug)]
pub struct ScaffoldVariant {
    pub id: VariantId,
    pub display_name: &'static str,
    pub flavor: LanguageFlavor,
    pub family: FrameworkFamily,
    files: TemplateFiles,
}

pub static VARIANTS: [ScaffoldVariant; 4] = [
    ScaffoldVariant {
        id: VariantId::ReactTsVite,
        display_name: "React + Vite (TypeScript)",
        flavor: LanguageFlavor::Typed,
        family: FrameworkFamily::ClientRendered,
        files: templates::REACT_TS_VITE,
    },
    ScaffoldVariant {
        id: VariantId::ReactJsVite,
        display_name: "React + Vite (JavaScript)",
        flavor: LanguageFlavor::Untyped,
        family: FrameworkFamily::ClientRendered,
        files: templates::REACT_JS_VITE,
    },
    ScaffoldVariant {
        id: VariantId::NextjsTs,
        display_name: "Next.js (TypeScript)",
        flavor: LanguageFlavor::Typed,
        family: FrameworkFamily::ServerRendered,
        files: templates::NEXTJS_TS,
    },
    ScaffoldVariant {
        id: VariantId::NodeExpress,
        display_name: "Node.js (Express)",
        flavor: LanguageFlavor::Untyped,
        family: FrameworkFamily::BackendApi,
        files: templates::NODE_EXPRESS,
    },
];

impl ScaffoldVariant {
    /// A fresh copy of this variant's canonical tree.
    pub fn base_tree(&self) -> ProjectTree {
        let mut tree = ProjectTree::new();
        for (path, content) in self.files {
            tree.write(&templates::output_path(path), *content);
        }
        tree
    }

    /// Path of the component rendered as the application's entry page
    pub fn entry_path(&self) -> Option<String> {
        match self.family {
            FrameworkFamily::ClientRendered => {
                Some(format!("src/App.{}", self.flavor.component_ext()))
            }
            FrameworkFamily::ServerRendered => Some("app/page.tsx".to_string()),
            FrameworkFamily::BackendApi => None,
        }
    }

    /// Look up one of the integration points this variant defines.
    pub fn integration_point(&self, kind: PointKind) -> Option<IntegrationPoint> {
        let (path, anchor, indent, comment) = match (kind, self.family) {
            (PointKind::EntryImports, FrameworkFamily::ClientRendered)
            | (PointKind::EntryImports, FrameworkFamily::ServerRendered) => {
                (self.entry_path()?, Anchor::Top, "", CommentStyle::Line)
            }
            (PointKind::EntryComponent, FrameworkFamily::ClientRendered)
            | (PointKind::EntryComponent, FrameworkFamily::ServerRendered) => (
                self.entry_path()?,
                Anchor::Before("</main>"),
                "      ",
                CommentStyle::Jsx,
            ),
            (PointKind::GlobalStylesheet, FrameworkFamily::ClientRendered) => (
                "src/index.css".to_string(),
                Anchor::Top,
                "",
                CommentStyle::Block,
            ),
            (PointKind::RootLayout, FrameworkFamily::ServerRendered) => (
                "app/layout.tsx".to_string(),
                Anchor::Top,
                "",
                CommentStyle::Line,
            ),
            _ => return None,
        };

        Some(IntegrationPoint {
            kind,
            path,
            anchor,
            indent,
            comment,
        })
    }

    pub fn integration_points(&self) -> Vec<IntegrationPoint> {
        PointKind::ALL
            .into_iter()
            .filter_map(|kind| self.integration_point(kind))
            .collect()
    }
}

/// Look up a variant by id.
pub fn lookup(variant_id: &str) -> Result<&'static ScaffoldVariant> {
    variant_id.parse::<VariantId>().map(|id| id.variant())
}

/// Produce the initial working tree for a variant.
pub fn select(variant_id: &str) -> Result<ProjectTree> {
    let variant = lookup(variant_id)?;
    tracing::debug!(variant = %variant.id, "selected scaffold variant");
    Ok(variant.base_tree())
}
