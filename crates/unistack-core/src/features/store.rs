//! Zustand state store
//!
//! Adds a store module, a `Counter` component consuming it, and renders the
//! counter from the entry component.

use super::{FeatureCategory, FeatureModule};
use crate::error::Result;
use crate::rewriter::{self, IntegrationPoint, PointKind};
use crate::runtime::InstallCommand;
use crate::scaffold::{FrameworkFamily, LanguageFlavor, ScaffoldVariant};
use crate::tree::ProjectTree;

const IMPORT_MARKER: &str = "zustand:import";
const COUNTER_MARKER: &str = "zustand:counter";

const COUNTER_IMPORT: &str = r#"import { Counter } from "./components/Counter";"#;
const COUNTER_USAGE: &str = "<Counter />";

const TYPED_STORE: &str = r#"import { create } from "zustand";

type AppState = {
  count: number;
  increment: () => void;
  decrement: () => void;
};

export const useAppStore = create<AppState>((set) => ({
  count: 0,
  increment: () => set((state) => ({ count: state.count + 1 })),
  decrement: () => set((state) => ({ count: state.count - 1 })),
}));
"#;

const UNTYPED_STORE: &str = r#"import { create } from "zustand";

export const useAppStore = create((set) => ({
  count: 0,
  increment: () => set((state) => ({ count: state.count + 1 })),
  decrement: () => set((state) => ({ count: state.count - 1 })),
}));
"#;

const CLIENT_COUNTER: &str = r#"import { useAppStore } from "../store/useAppStore";

export function Counter() {
  const { count, increment, decrement } = useAppStore();

  return (
    <section style={{ marginTop: "2rem" }}>
      <p style={{ fontSize: "1.25rem", fontWeight: 600 }}>
        Count: <span>{count}</span>
      </p>
      <div style={{ display: "flex", gap: "0.75rem", marginTop: "1rem" }}>
        <button onClick={decrement}>-1</button>
        <button onClick={increment}>+1</button>
      </div>
    </section>
  );
}
"#;

const SERVER_COUNTER: &str = r#""use client";

import { useAppStore } from "../../lib/store/useAppStore";

export function Counter() {
  const { count, increment, decrement } = useAppStore();

  return (
    <section style={{ marginTop: "2rem" }}>
      <p style={{ fontSize: "1.25rem", fontWeight: 600 }}>
        Count: <span>{count}</span>
      </p>
      <div style={{ display: "flex", gap: "0.75rem", marginTop: "1rem" }}>
        <button onClick={decrement}>-1</button>
        <button onClick={increment}>+1</button>
      </div>
    </section>
  );
}
"#;

/// Generated files for one (family, flavor) combination
struct StoreCell {
    family: FrameworkFamily,
    flavor: LanguageFlavor,
    store_path: &'static str,
    store_source: &'static str,
    counter_path: &'static str,
    counter_source: &'static str,
}

const CELLS: &[StoreCell] = &[
    StoreCell {
        family: FrameworkFamily::ClientRendered,
        flavor: LanguageFlavor::Typed,
        store_path: "src/store/useAppStore.ts",
        store_source: TYPED_STORE,
        counter_path: "src/components/Counter.tsx",
        counter_source: CLIENT_COUNTER,
    },
    StoreCell {
        family: FrameworkFamily::ClientRendered,
        flavor: LanguageFlavor::Untyped,
        store_path: "src/store/useAppStore.js",
        store_source: UNTYPED_STORE,
        counter_path: "src/components/Counter.jsx",
        counter_source: CLIENT_COUNTER,
    },
    StoreCell {
        family: FrameworkFamily::ServerRendered,
        flavor: LanguageFlavor::Typed,
        store_path: "lib/store/useAppStore.ts",
        store_source: TYPED_STORE,
        counter_path: "app/components/Counter.tsx",
        counter_source: SERVER_COUNTER,
    },
];

fn cell(variant: &ScaffoldVariant) -> Option<&'static StoreCell> {
    CELLS
        .iter()
        .find(|c| c.family == variant.family && c.flavor == variant.flavor)
}

/// Whether the variant's store module is currently part of the tree.
pub(crate) fn is_present(tree: &ProjectTree, variant: &ScaffoldVariant) -> bool {
    cell(variant).is_some_and(|c| tree.contains(c.store_path))
}

#[derive(Debug)]
pub struct ZustandStore;

impl ZustandStore {
    fn points(variant: &ScaffoldVariant) -> Option<(IntegrationPoint, IntegrationPoint)> {
        Some((
            variant.integration_point(PointKind::EntryImports)?,
            variant.integration_point(PointKind::EntryComponent)?,
        ))
    }
}

impl FeatureModule for ZustandStore {
    fn id(&self) -> &'static str {
        "zustand"
    }

    fn display_name(&self) -> &'static str {
        "Zustand"
    }

    fn category(&self) -> FeatureCategory {
        FeatureCategory::StateManagement
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["store"]
    }

    fn applies_to(&self, variant: &ScaffoldVariant) -> bool {
        variant.family.renders_ui() && cell(variant).is_some()
    }

    fn forward(&self, tree: &mut ProjectTree, variant: &ScaffoldVariant) -> Result<()> {
        let (Some(cell), Some((imports, body))) = (cell(variant), Self::points(variant)) else {
            tracing::warn!(variant = %variant.id, "no store layout for variant, skipping");
            return Ok(());
        };

        tree.write(cell.store_path, cell.store_source);
        tree.write(cell.counter_path, cell.counter_source);
        rewriter::insert_block(tree, &imports, IMPORT_MARKER, COUNTER_IMPORT);
        rewriter::insert_block(tree, &body, COUNTER_MARKER, COUNTER_USAGE);
        Ok(())
    }

    fn inverse(&self, tree: &mut ProjectTree, variant: &ScaffoldVariant) -> Result<()> {
        if let Some((imports, body)) = Self::points(variant) {
            rewriter::remove_block(tree, &body, COUNTER_MARKER);
            rewriter::remove_block(tree, &imports, IMPORT_MARKER);
        }
        for path in self.generated_paths(variant) {
            tree.remove(&path);
        }
        Ok(())
    }

    fn integration_points(&self, variant: &ScaffoldVariant) -> Vec<IntegrationPoint> {
        Self::points(variant)
            .map(|(imports, body)| vec![imports, body])
            .unwrap_or_default()
    }

    fn generated_paths(&self, variant: &ScaffoldVariant) -> Vec<String> {
        cell(variant)
            .map(|c| vec![c.store_path.to_string(), c.counter_path.to_string()])
            .unwrap_or_default()
    }

    fn install_command(&self) -> Option<InstallCommand> {
        Some(InstallCommand {
            dev: false,
            packages: &["zustand"],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scaffold::VariantId;

    #[test]
    fn test_forward_typed_client() {
        let variant = VariantId::ReactTsVite.variant();
        let mut tree = variant.base_tree();
        ZustandStore.forward(&mut tree, variant).unwrap();

        assert!(tree.contains("src/store/useAppStore.ts"));
        assert!(tree.contains("src/components/Counter.tsx"));
        let app = tree.read("src/App.tsx").unwrap();
        assert!(app.starts_with("// unistack:begin zustand:import\n"));
        assert_eq!(app.matches("<Counter />").count(), 1);
        assert!(is_present(&tree, variant));
    }

    #[test]
    fn test_forward_untyped_client_uses_js_extensions() {
        let variant = VariantId::ReactJsVite.variant();
        let mut tree = variant.base_tree();
        ZustandStore.forward(&mut tree, variant).unwrap();

        assert!(tree.contains("src/store/useAppStore.js"));
        assert!(tree.contains("src/components/Counter.jsx"));
        assert!(!tree.read("src/store/useAppStore.js").unwrap().contains("type AppState"));
        assert!(tree.read("src/App.jsx").unwrap().contains(COUNTER_IMPORT));
    }

    #[test]
    fn test_forward_server_rendered_marks_client_component() {
        let variant = VariantId::NextjsTs.variant();
        let mut tree = variant.base_tree();
        ZustandStore.forward(&mut tree, variant).unwrap();

        let counter = tree.read("app/components/Counter.tsx").unwrap();
        assert!(counter.starts_with("\"use client\";"));
        assert!(counter.contains("../../lib/store/useAppStore"));
        assert!(tree.contains("lib/store/useAppStore.ts"));
        assert!(tree.read("app/page.tsx").unwrap().contains(COUNTER_USAGE));
    }

    #[test]
    fn test_inverse_restores_base_tree() {
        for id in [VariantId::ReactTsVite, VariantId::ReactJsVite, VariantId::NextjsTs] {
            let variant = id.variant();
            let base = variant.base_tree();
            let mut tree = base.clone();
            ZustandStore.forward(&mut tree, variant).unwrap();
            ZustandStore.inverse(&mut tree, variant).unwrap();
            assert_eq!(tree, base, "{id}");
        }
    }

    #[test]
    fn test_not_applicable_to_backend() {
        let variant = VariantId::NodeExpress.variant();
        assert!(!ZustandStore.applies_to(variant));
        assert!(ZustandStore.generated_paths(variant).is_empty());
        assert!(ZustandStore.integration_points(variant).is_empty());
    }
}
