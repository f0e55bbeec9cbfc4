//! Feature categories, feature modules and the static registry
//!
//! Each [`FeatureCategory`] has a closed set of mutually exclusive modules,
//! one of which is always the implicit `none` module. Exactly one module per
//! category is active for a composition.

mod store;
mod styling;

pub use store::ZustandStore;
pub use styling::TailwindCss;

use crate::error::{Result, ScaffoldError};
use crate::rewriter::IntegrationPoint;
use crate::runtime::InstallCommand;
use crate::scaffold::ScaffoldVariant;
use crate::tree::ProjectTree;
use std::fmt;

/// Identifier of the implicit `none` module in every category
pub const NONE: &str = "none";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureCategory {
    StateManagement,
    Styling,
}

impl FeatureCategory {
    /// Categories in pipeline order. Styling runs last because its demo
    /// content depends on whether a store exists.
    pub const ALL: [FeatureCategory; 2] = [FeatureCategory::StateManagement, FeatureCategory::Styling];

    pub fn id(&self) -> &'static str {
        match self {
            FeatureCategory::StateManagement => "state",
            FeatureCategory::Styling => "styling",
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self {
            FeatureCategory::StateManagement => "State manager?",
            FeatureCategory::Styling => "Styling system?",
        }
    }
}

impl fmt::Display for FeatureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureCategory::StateManagement => f.write_str("state management"),
            FeatureCategory::Styling => f.write_str("styling"),
        }
    }
}

/// A category-scoped unit that can be applied to or removed from a tree.
///
/// `forward` must be idempotent and `inverse` must undo everything `forward`
/// added, leaving every touched file byte-identical to a tree `forward` never
/// ran on.
pub trait FeatureModule: Send + Sync + fmt::Debug {
    fn id(&self) -> &'static str;

    fn display_name(&self) -> &'static str;

    fn category(&self) -> FeatureCategory;

    /// Alternative identifiers accepted by [`resolve`]
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    fn applies_to(&self, variant: &ScaffoldVariant) -> bool;

    fn forward(&self, tree: &mut ProjectTree, variant: &ScaffoldVariant) -> Result<()>;

    fn inverse(&self, tree: &mut ProjectTree, variant: &ScaffoldVariant) -> Result<()>;

    /// Integration points this module edits for the given variant
    fn integration_points(&self, variant: &ScaffoldVariant) -> Vec<IntegrationPoint>;

    /// Files this module owns outright for the given variant
    fn generated_paths(&self, variant: &ScaffoldVariant) -> Vec<String>;

    /// Package installation the module needs once the project is on disk
    fn install_command(&self) -> Option<InstallCommand> {
        None
    }

    fn is_none(&self) -> bool {
        false
    }
}

/// The implicit module selected when a category is switched off. Its inverse
/// strips whatever the category's active module may have left in the tree.
#[derive(Debug)]
pub struct NoneModule {
    category: FeatureCategory,
}

impl FeatureModule for NoneModule {
    fn id(&self) -> &'static str {
        NONE
    }

    fn display_name(&self) -> &'static str {
        "None"
    }

    fn category(&self) -> FeatureCategory {
        self.category
    }

    fn applies_to(&self, _variant: &ScaffoldVariant) -> bool {
        true
    }

    fn forward(&self, _tree: &mut ProjectTree, _variant: &ScaffoldVariant) -> Result<()> {
        Ok(())
    }

    fn inverse(&self, tree: &mut ProjectTree, variant: &ScaffoldVariant) -> Result<()> {
        active_module(self.category).inverse(tree, variant)
    }

    fn integration_points(&self, _variant: &ScaffoldVariant) -> Vec<IntegrationPoint> {
        Vec::new()
    }

    fn generated_paths(&self, _variant: &ScaffoldVariant) -> Vec<String> {
        Vec::new()
    }

    fn is_none(&self) -> bool {
        true
    }
}

static NO_STATE: NoneModule = NoneModule {
    category: FeatureCategory::StateManagement,
};
static ZUSTAND: ZustandStore = ZustandStore;
static NO_STYLING: NoneModule = NoneModule {
    category: FeatureCategory::Styling,
};
static TAILWIND: TailwindCss = TailwindCss;

/// Every module, grouped by category, `none` first
static REGISTRY: [&dyn FeatureModule; 4] = [&NO_STATE, &ZUSTAND, &NO_STYLING, &TAILWIND];

fn modules(category: FeatureCategory) -> impl Iterator<Item = &'static dyn FeatureModule> {
    REGISTRY
        .iter()
        .copied()
        .filter(move |m| m.category() == category)
}

/// The single non-`none` module of a category.
pub fn active_module(category: FeatureCategory) -> &'static dyn FeatureModule {
    match category {
        FeatureCategory::StateManagement => &ZUSTAND,
        FeatureCategory::Styling => &TAILWIND,
    }
}

/// Find a module by id within a category and check it applies to the variant.
pub fn resolve(
    category: FeatureCategory,
    feature_id: &str,
    variant: &ScaffoldVariant,
) -> Result<&'static dyn FeatureModule> {
    let wanted = feature_id.trim().to_lowercase();
    let module = modules(category)
        .find(|m| m.id() == wanted || m.aliases().iter().any(|alias| *alias == wanted))
        .ok_or_else(|| ScaffoldError::UnknownFeature {
            category,
            feature: feature_id.to_string(),
        })?;

    if !module.applies_to(variant) {
        return Err(ScaffoldError::IncompatibleFeature {
            category,
            feature: module.id().to_string(),
            variant: variant.id.as_str(),
        });
    }

    Ok(module)
}

/// Modules of a category that apply to the variant, `none` first.
pub fn available(
    category: FeatureCategory,
    variant: &ScaffoldVariant,
) -> Vec<&'static dyn FeatureModule> {
    modules(category).filter(|m| m.applies_to(variant)).collect()
}
