//! Dependency manifest (package.json) updates

use crate::error::{Result, ScaffoldError};
use crate::scaffold::MANIFEST_PATH;
use crate::tree::ProjectTree;
use serde_json::{Map, Value};
use std::path::Path;

const FALLBACK_NAME: &str = "my-project";

/// Project name derived from the target directory's base name
pub fn project_name_for(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_NAME.to_string())
}

/// Absent, `null` and `""` count as unset; any other value was chosen on
/// purpose and is kept.
fn is_unset(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        _ => false,
    }
}

/// Parse the manifest, apply `edit` and write it back with two-space
/// indentation and a trailing newline. Key order is preserved. A tree without
/// a manifest is left alone.
fn update_manifest(tree: &mut ProjectTree, edit: impl FnOnce(&mut Map<String, Value>)) -> Result<()> {
    let Some(raw) = tree.read(MANIFEST_PATH) else {
        tracing::warn!(path = MANIFEST_PATH, "no manifest in tree, skipping update");
        return Ok(());
    };

    let mut manifest: Map<String, Value> =
        serde_json::from_str(raw).map_err(ScaffoldError::Manifest)?;
    let before = manifest.clone();
    edit(&mut manifest);
    if manifest == before {
        return Ok(());
    }

    let mut updated = serde_json::to_string_pretty(&manifest)?;
    updated.push('\n');
    tree.write(MANIFEST_PATH, updated);
    Ok(())
}

/// Default `type` to `module`. Feature config files are written as ES
/// modules, so every composed manifest needs it.
pub fn ensure_module_type(tree: &mut ProjectTree) -> Result<()> {
    update_manifest(tree, default_module_type)
}

fn default_module_type(manifest: &mut Map<String, Value>) {
    if is_unset(manifest.get("type")) {
        manifest.insert("type".to_string(), Value::String("module".to_string()));
    }
}

/// Set `name` and default `type` to `module`.
pub fn set_project_identity(tree: &mut ProjectTree, name: &str) -> Result<()> {
    update_manifest(tree, |manifest| {
        manifest.insert("name".to_string(), Value::String(name.to_string()));
        default_module_type(manifest);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scaffold::VariantId;
    use std::path::PathBuf;

    fn tree_with(manifest: &str) -> ProjectTree {
        let mut tree = ProjectTree::new();
        tree.write(MANIFEST_PATH, manifest);
        tree
    }

    #[test]
    fn test_project_name_from_dir() {
        assert_eq!(project_name_for(&PathBuf::from("/tmp/work/my-app")), "my-app");
        assert_eq!(project_name_for(&PathBuf::from("/")), "my-project");
    }

    #[test]
    fn test_sets_name_and_preserves_key_order() {
        let mut tree = tree_with(
            "{\n  \"private\": true,\n  \"name\": \"template\",\n  \"type\": \"commonjs\",\n  \"scripts\": {\n    \"dev\": \"vite\"\n  }\n}\n",
        );
        set_project_identity(&mut tree, "my-app").unwrap();
        assert_eq!(
            tree.read(MANIFEST_PATH),
            Some("{\n  \"private\": true,\n  \"name\": \"my-app\",\n  \"type\": \"commonjs\",\n  \"scripts\": {\n    \"dev\": \"vite\"\n  }\n}\n")
        );
    }

    #[test]
    fn test_defaults_module_type_only_when_absent() {
        let mut tree = tree_with("{\"name\": \"x\"}");
        set_project_identity(&mut tree, "y").unwrap();
        assert_eq!(
            tree.read(MANIFEST_PATH),
            Some("{\n  \"name\": \"y\",\n  \"type\": \"module\"\n}\n")
        );
    }

    #[test]
    fn test_base_templates_keep_their_formatting() {
        for id in [VariantId::ReactTsVite, VariantId::NodeExpress] {
            let mut tree = id.variant().base_tree();
            let before = tree.read(MANIFEST_PATH).unwrap().to_string();
            set_project_identity(&mut tree, id.as_str()).unwrap();
            assert_eq!(tree.read(MANIFEST_PATH), Some(before.as_str()), "{id}");
        }
    }

    #[test]
    fn test_explicit_type_values_are_kept() {
        let mut tree = tree_with("{\"name\": \"x\", \"type\": false}");
        set_project_identity(&mut tree, "x").unwrap();
        assert!(tree.read(MANIFEST_PATH).unwrap().contains("\"type\": false"));

        let mut tree = tree_with("{\"name\": \"x\", \"type\": \"\"}");
        ensure_module_type(&mut tree).unwrap();
        assert!(tree.read(MANIFEST_PATH).unwrap().contains("\"type\": \"module\""));
    }

    #[test]
    fn test_ensure_module_type_adds_missing_type() {
        let mut tree = VariantId::NextjsTs.variant().base_tree();
        assert!(!tree.read(MANIFEST_PATH).unwrap().contains("\"type\""));
        ensure_module_type(&mut tree).unwrap();
        let manifest = tree.read(MANIFEST_PATH).unwrap();
        assert!(manifest.contains("\"name\": \"nextjs-ts\""));
        assert!(manifest.contains("\"type\": \"module\""));
        assert!(manifest.ends_with("}\n"));
    }

    #[test]
    fn test_malformed_manifest_is_an_error() {
        let mut tree = tree_with("{ not json");
        assert!(matches!(
            set_project_identity(&mut tree, "x"),
            Err(ScaffoldError::Manifest(_))
        ));
    }

    #[test]
    fn test_missing_manifest_is_skipped() {
        let mut tree = ProjectTree::new();
        set_project_identity(&mut tree, "x").unwrap();
        assert!(tree.is_empty());
    }
}
