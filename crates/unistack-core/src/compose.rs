//! Composition of feature modules over a project tree
//!
//! Categories are always processed in [`FeatureCategory::ALL`] order, no matter
//! how the caller built the [`Selection`], so the same inputs always produce
//! the same tree.

use crate::error::{Result, ScaffoldError};
use crate::features::{self, FeatureCategory, FeatureModule, NONE};
use crate::scaffold::ScaffoldVariant;
use crate::tree::ProjectTree;
use std::collections::HashMap;

/// One feature id per category; categories left out select `none`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    choices: HashMap<FeatureCategory, String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, category: FeatureCategory, feature_id: impl Into<String>) -> Self {
        self.set(category, feature_id);
        self
    }

    pub fn set(&mut self, category: FeatureCategory, feature_id: impl Into<String>) {
        self.choices.insert(category, feature_id.into());
    }

    pub fn get(&self, category: FeatureCategory) -> &str {
        self.choices.get(&category).map_or(NONE, String::as_str)
    }
}

impl<S: Into<String>> FromIterator<(FeatureCategory, S)> for Selection {
    fn from_iter<I: IntoIterator<Item = (FeatureCategory, S)>>(iter: I) -> Self {
        let mut selection = Selection::new();
        for (category, id) in iter {
            selection.set(category, id);
        }
        selection
    }
}

/// Resolve one module per category, in pipeline order.
pub fn resolve_selection(
    variant: &ScaffoldVariant,
    selection: &Selection,
) -> Result<Vec<&'static dyn FeatureModule>> {
    FeatureCategory::ALL
        .into_iter()
        .map(|category| features::resolve(category, selection.get(category), variant))
        .collect()
}

/// Apply the selection to `tree`. Returns the resolved module of every
/// category in pipeline order.
///
/// All modules are resolved before the tree is touched, so a rejected
/// selection leaves it unmodified.
pub fn compose(
    tree: &mut ProjectTree,
    variant: &ScaffoldVariant,
    selection: &Selection,
) -> Result<Vec<&'static dyn FeatureModule>> {
    let modules = resolve_selection(variant, selection)?;

    for module in &modules {
        if module.is_none() {
            tracing::debug!(category = %module.category(), "removing feature");
            module.inverse(tree, variant)?;
        } else {
            tracing::debug!(category = %module.category(), feature = module.id(), "applying feature");
            module.forward(tree, variant)?;
        }
    }

    validate_references(tree)?;
    Ok(modules)
}

const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "mjs", "cjs"];
const RESOLVE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs", "json", "css"];

/// How a file refers to other files of the project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReferenceSyntax {
    /// `import ... from "./x"` and `import "./x"`
    Module,
    /// `@import "./x.css"` and `@import url("./x.css")`
    Stylesheet,
    /// `src="/x"` and `href="./x"` attributes
    Markup,
}

fn reference_syntax(path: &str) -> Option<ReferenceSyntax> {
    let (_, ext) = path.rsplit_once('.')?;
    match ext {
        "css" => Some(ReferenceSyntax::Stylesheet),
        "html" => Some(ReferenceSyntax::Markup),
        _ if SOURCE_EXTENSIONS.contains(&ext) => Some(ReferenceSyntax::Module),
        _ => None,
    }
}

fn is_comment(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("//") || trimmed.starts_with('*') || trimmed.starts_with("/*")
}

/// Values following each of `patterns`, up to the pattern's closing quote.
fn quoted_after<'a>(line: &'a str, patterns: &[&str]) -> Vec<&'a str> {
    let mut found = Vec::new();
    for pattern in patterns {
        let Some(at) = line.find(pattern) else {
            continue;
        };
        let quote = &pattern[pattern.len() - 1..];
        let rest = &line[at + pattern.len()..];
        if let Some(end) = rest.find(quote) {
            found.push(&rest[..end]);
        }
    }
    found
}

fn is_relative(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../")
}

/// Relative module specifiers imported on a line.
fn relative_specifiers(line: &str) -> Vec<&str> {
    if is_comment(line) {
        return Vec::new();
    }
    quoted_after(line, &["from \"", "from '", "import \"", "import '"])
        .into_iter()
        .filter(|s| is_relative(s))
        .collect()
}

/// Relative stylesheet imports on a line. Package imports are ignored.
fn stylesheet_imports(line: &str) -> Vec<&str> {
    if is_comment(line) {
        return Vec::new();
    }
    quoted_after(
        line,
        &["@import \"", "@import '", "@import url(\"", "@import url('"],
    )
    .into_iter()
    .filter(|s| is_relative(s))
    .collect()
}

/// Local `src`/`href` targets on a markup line. Root-relative paths (`/x`)
/// count as local; URLs and fragments do not.
fn markup_references(line: &str) -> Vec<&str> {
    quoted_after(line, &["src=\"", "href=\"", "src='", "href='"])
        .into_iter()
        .filter(|s| is_relative(s) || (s.starts_with('/') && !s.starts_with("//")))
        .collect()
}

/// Join a relative specifier onto the importing file's directory. `None` if
/// it climbs above the project root.
fn join_relative(importer: &str, specifier: &str) -> Option<String> {
    let mut segments: Vec<&str> = importer.split('/').collect();
    segments.pop();
    for part in specifier.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }
    Some(segments.join("/"))
}

/// Resolve a reference to a tree path; root-relative markup paths start at
/// the project root.
fn target_of(importer: &str, specifier: &str) -> Option<String> {
    match specifier.strip_prefix('/') {
        Some(rooted) => join_relative("", rooted),
        None => join_relative(importer, specifier),
    }
}

fn resolves(tree: &ProjectTree, base: &str) -> bool {
    tree.contains(base)
        || RESOLVE_EXTENSIONS.iter().any(|ext| {
            tree.contains(&format!("{base}.{ext}")) || tree.contains(&format!("{base}/index.{ext}"))
        })
}

/// Check that every relative reference in the tree points at a file the tree
/// contains: module imports in scripts, `@import` in stylesheets and
/// `src`/`href` attributes in HTML.
pub fn validate_references(tree: &ProjectTree) -> Result<()> {
    for (path, content) in tree.files() {
        let Some(syntax) = reference_syntax(path) else {
            continue;
        };
        for line in content.lines() {
            let specifiers = match syntax {
                ReferenceSyntax::Module => relative_specifiers(line),
                ReferenceSyntax::Stylesheet => stylesheet_imports(line),
                ReferenceSyntax::Markup => markup_references(line),
            };
            for specifier in specifiers {
                let ok = target_of(path, specifier).is_some_and(|base| resolves(tree, &base));
                if !ok {
                    return Err(ScaffoldError::DanglingReference {
                        file: path.to_string(),
                        specifier: specifier.to_string(),
                    });
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scaffold::VariantId;

    #[test]
    fn test_selection_defaults_to_none() {
        let selection = Selection::new().with(FeatureCategory::Styling, "tailwind");
        assert_eq!(selection.get(FeatureCategory::StateManagement), NONE);
        assert_eq!(selection.get(FeatureCategory::Styling), "tailwind");
    }

    #[test]
    fn test_selection_order_is_irrelevant() {
        let a: Selection = [
            (FeatureCategory::Styling, "tailwind"),
            (FeatureCategory::StateManagement, "zustand"),
        ]
        .into_iter()
        .collect();
        let b: Selection = [
            (FeatureCategory::StateManagement, "zustand"),
            (FeatureCategory::Styling, "tailwind"),
        ]
        .into_iter()
        .collect();

        let variant = VariantId::ReactTsVite.variant();
        let mut left = variant.base_tree();
        let mut right = variant.base_tree();
        compose(&mut left, variant, &a).unwrap();
        compose(&mut right, variant, &b).unwrap();
        assert_eq!(left, right);
    }

    #[test]
    fn test_resolve_selection_is_in_pipeline_order() {
        let selection = Selection::new()
            .with(FeatureCategory::Styling, "tailwind")
            .with(FeatureCategory::StateManagement, "zustand");
        let modules = resolve_selection(VariantId::NextjsTs.variant(), &selection).unwrap();
        let ids: Vec<_> = modules.iter().map(|m| m.id()).collect();
        assert_eq!(ids, ["zustand", "tailwind"]);
    }

    #[test]
    fn test_relative_specifiers() {
        assert_eq!(
            relative_specifiers(r#"import { Counter } from "./components/Counter";"#),
            ["./components/Counter"]
        );
        assert_eq!(relative_specifiers(r#"import "./index.css";"#), ["./index.css"]);
        assert_eq!(relative_specifiers("import homeRoutes from '../routes/home.js';"), ["../routes/home.js"]);
        assert!(relative_specifiers(r#"import { create } from "zustand";"#).is_empty());
        assert!(relative_specifiers(r#"// import x from "./gone";"#).is_empty());
    }

    #[test]
    fn test_join_relative() {
        assert_eq!(
            join_relative("app/components/Counter.tsx", "../../lib/store/useAppStore").as_deref(),
            Some("lib/store/useAppStore")
        );
        assert_eq!(join_relative("src/App.tsx", "./index.css").as_deref(), Some("src/index.css"));
        assert_eq!(join_relative("main.js", "../outside"), None);
    }

    #[test]
    fn test_base_trees_have_no_dangling_references() {
        for id in VariantId::ALL {
            validate_references(&id.variant().base_tree()).unwrap();
        }
    }

    #[test]
    fn test_dangling_reference_is_reported() {
        let mut tree = ProjectTree::new();
        tree.write("src/App.tsx", "import { Counter } from \"./components/Counter\";\n");
        let err = validate_references(&tree).unwrap_err();
        assert!(matches!(
            err,
            ScaffoldError::DanglingReference { ref file, ref specifier }
                if file == "src/App.tsx" && specifier == "./components/Counter"
        ));

        tree.write("src/components/Counter/index.tsx", "export function Counter() {}\n");
        validate_references(&tree).unwrap();
    }

    #[test]
    fn test_reference_syntax_by_extension() {
        assert_eq!(reference_syntax("src/App.tsx"), Some(ReferenceSyntax::Module));
        assert_eq!(reference_syntax("next.config.mjs"), Some(ReferenceSyntax::Module));
        assert_eq!(reference_syntax("src/index.css"), Some(ReferenceSyntax::Stylesheet));
        assert_eq!(reference_syntax("index.html"), Some(ReferenceSyntax::Markup));
        assert_eq!(reference_syntax("package.json"), None);
    }

    #[test]
    fn test_stylesheet_and_markup_references() {
        assert_eq!(stylesheet_imports(r#"@import "./theme.css";"#), ["./theme.css"]);
        assert_eq!(stylesheet_imports("@import url('../base.css');"), ["../base.css"]);
        assert!(stylesheet_imports(r#"@import "tailwindcss";"#).is_empty());
        assert!(stylesheet_imports("@tailwind base;").is_empty());

        assert_eq!(
            markup_references(r#"<script type="module" src="/src/main.tsx"></script>"#),
            ["/src/main.tsx"]
        );
        assert!(markup_references(r#"<link href="https://fonts.example.com/a.css" />"#).is_empty());
        assert!(markup_references(r#"<script src="//cdn.example.com/x.js"></script>"#).is_empty());
    }

    #[test]
    fn test_dangling_stylesheet_import_is_reported() {
        let mut tree = ProjectTree::new();
        tree.write("src/index.css", "@import \"./theme.css\";\nbody {}\n");
        assert!(matches!(
            validate_references(&tree),
            Err(ScaffoldError::DanglingReference { ref file, .. }) if file == "src/index.css"
        ));

        tree.write("src/theme.css", ":root {}\n");
        validate_references(&tree).unwrap();
    }

    #[test]
    fn test_dangling_markup_reference_is_reported() {
        let variant = VariantId::ReactTsVite.variant();
        let mut tree = variant.base_tree();
        tree.remove("src/main.tsx");
        assert!(matches!(
            validate_references(&tree),
            Err(ScaffoldError::DanglingReference { ref file, ref specifier })
                if file == "index.html" && specifier == "/src/main.tsx"
        ));
    }

    #[test]
    fn test_rejected_selection_leaves_tree_untouched() {
        let variant = VariantId::ReactTsVite.variant();
        let mut tree = variant.base_tree();
        let selection = Selection::new()
            .with(FeatureCategory::StateManagement, "zustand")
            .with(FeatureCategory::Styling, "bootstrap");

        assert!(compose(&mut tree, variant, &selection).is_err());
        assert_eq!(tree, variant.base_tree());
    }
}
