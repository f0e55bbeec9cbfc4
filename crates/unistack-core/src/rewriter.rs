//! Marker-delimited text surgery on integration points
//!
//! Every block a feature module adds to a shared file is wrapped in a pair of
//! marker lines:
//!
//! ```text
//! // unistack:begin zustand:import
//! import { Counter } from "./components/Counter";
//! // unistack:end zustand:import
//! ```
//!
//! Insertion only ever adds whole lines and removal deletes exactly the span
//! from the begin line through the end line, so removing a block restores the
//! file byte for byte.

use crate::tree::ProjectTree;
use std::fmt;

const MARKER_PREFIX: &str = "unistack";

/// The named anchors a variant may define
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointKind {
    /// Import section at the top of the entry component
    EntryImports,
    /// Markup rendered by the entry component
    EntryComponent,
    /// The stylesheet every page loads
    GlobalStylesheet,
    /// Root layout wrapping every page (server-rendered only)
    RootLayout,
}

impl PointKind {
    pub const ALL: [PointKind; 4] = [
        PointKind::EntryImports,
        PointKind::EntryComponent,
        PointKind::GlobalStylesheet,
        PointKind::RootLayout,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PointKind::EntryImports => "entry imports",
            PointKind::EntryComponent => "entry component",
            PointKind::GlobalStylesheet => "global stylesheet",
            PointKind::RootLayout => "root layout",
        }
    }
}

impl fmt::Display for PointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where new blocks go within the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Start of the file
    Top,
    /// Directly above the first line whose trimmed text starts with the pattern
    Before(&'static str),
}

/// Comment syntax used for marker lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `// ...`
    Line,
    /// `/* ... */`
    Block,
    /// `{/* ... */}` inside JSX children
    Jsx,
}

impl CommentStyle {
    fn wrap(&self, text: &str) -> String {
        match self {
            CommentStyle::Line => format!("// {text}"),
            CommentStyle::Block => format!("/* {text} */"),
            CommentStyle::Jsx => format!("{{/* {text} */}}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationPoint {
    pub kind: PointKind,
    pub path: String,
    pub anchor: Anchor,
    pub indent: &'static str,
    pub comment: CommentStyle,
}

impl IntegrationPoint {
    fn marker(&self, edge: &str, marker_id: &str) -> String {
        self.comment
            .wrap(&format!("{MARKER_PREFIX}:{edge} {marker_id}"))
    }
}

/// Result of a single rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rewrite {
    Applied,
    /// Already in the requested state
    Unchanged,
    /// Target file or anchor missing; nothing was done
    Skipped,
}

/// Byte span of a located block, end exclusive
struct BlockSpan {
    start: usize,
    end: Option<usize>,
}

fn find_block(content: &str, begin: &str, end: &str) -> Option<BlockSpan> {
    let mut offset = 0;
    let mut start = None;
    for line in content.split_inclusive('\n') {
        let trimmed = line.trim();
        match start {
            None if trimmed == begin => start = Some(offset),
            Some(s) if trimmed == end => {
                return Some(BlockSpan {
                    start: s,
                    end: Some(offset + line.len()),
                })
            }
            _ => {}
        }
        offset += line.len();
    }
    start.map(|start| BlockSpan { start, end: None })
}

fn anchor_offset(content: &str, anchor: Anchor) -> Option<usize> {
    match anchor {
        Anchor::Top => Some(0),
        Anchor::Before(pattern) => {
            let mut offset = 0;
            for line in content.split_inclusive('\n') {
                if line.trim_start().starts_with(pattern) {
                    return Some(offset);
                }
                offset += line.len();
            }
            None
        }
    }
}

fn render_block(point: &IntegrationPoint, marker_id: &str, content: &str) -> String {
    let mut block = String::new();
    block.push_str(point.indent);
    block.push_str(&point.marker("begin", marker_id));
    block.push('\n');
    for line in content.lines() {
        if !line.is_empty() {
            block.push_str(point.indent);
            block.push_str(line);
        }
        block.push('\n');
    }
    block.push_str(point.indent);
    block.push_str(&point.marker("end", marker_id));
    block.push('\n');
    block
}

/// Whether the point's file carries a block tagged `marker_id`.
pub fn has_block(tree: &ProjectTree, point: &IntegrationPoint, marker_id: &str) -> bool {
    tree.read(&point.path).is_some_and(|content| {
        find_block(
            content,
            &point.marker("begin", marker_id),
            &point.marker("end", marker_id),
        )
        .is_some()
    })
}

/// Insert `content` at the point's anchor, wrapped in markers. No-op when a
/// block with the same tag already exists.
pub fn insert_block(
    tree: &mut ProjectTree,
    point: &IntegrationPoint,
    marker_id: &str,
    content: &str,
) -> Rewrite {
    let Some(existing) = tree.read(&point.path) else {
        tracing::warn!(path = %point.path, point = %point.kind, marker = marker_id, "integration file missing, skipping insert");
        return Rewrite::Skipped;
    };

    if find_block(
        existing,
        &point.marker("begin", marker_id),
        &point.marker("end", marker_id),
    )
    .is_some()
    {
        return Rewrite::Unchanged;
    }

    let Some(at) = anchor_offset(existing, point.anchor) else {
        tracing::warn!(path = %point.path, point = %point.kind, marker = marker_id, "anchor not found, skipping insert");
        return Rewrite::Skipped;
    };

    let mut updated = String::with_capacity(existing.len() + content.len() + 64);
    updated.push_str(&existing[..at]);
    updated.push_str(&render_block(point, marker_id, content));
    updated.push_str(&existing[at..]);
    tree.write(&point.path, updated);

    tracing::debug!(path = %point.path, marker = marker_id, "inserted block");
    Rewrite::Applied
}

/// Delete the block tagged `marker_id`, markers included. Absence is not an
/// error.
pub fn remove_block(tree: &mut ProjectTree, point: &IntegrationPoint, marker_id: &str) -> Rewrite {
    let Some(existing) = tree.read(&point.path) else {
        tracing::debug!(path = %point.path, marker = marker_id, "integration file missing, nothing to remove");
        return Rewrite::Skipped;
    };

    let span = find_block(
        existing,
        &point.marker("begin", marker_id),
        &point.marker("end", marker_id),
    );

    match span {
        None => Rewrite::Unchanged,
        Some(BlockSpan { end: None, .. }) => {
            tracing::warn!(path = %point.path, marker = marker_id, "begin marker without end marker, leaving file untouched");
            Rewrite::Skipped
        }
        Some(BlockSpan {
            start,
            end: Some(end),
        }) => {
            let updated = format!("{}{}", &existing[..start], &existing[end..]);
            tree.write(&point.path, updated);
            tracing::debug!(path = %point.path, marker = marker_id, "removed block");
            Rewrite::Applied
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const APP: &str = "export default function App() {\n  return (\n    <main>\n      <h1>Hi</h1>\n    </main>\n  );\n}\n";

    fn imports() -> IntegrationPoint {
        IntegrationPoint {
            kind: PointKind::EntryImports,
            path: "src/App.tsx".into(),
            anchor: Anchor::Top,
            indent: "",
            comment: CommentStyle::Line,
        }
    }

    fn body() -> IntegrationPoint {
        IntegrationPoint {
            kind: PointKind::EntryComponent,
            path: "src/App.tsx".into(),
            anchor: Anchor::Before("</main>"),
            indent: "      ",
            comment: CommentStyle::Jsx,
        }
    }

    fn tree() -> ProjectTree {
        let mut tree = ProjectTree::new();
        tree.write("src/App.tsx", APP);
        tree
    }

    #[test]
    fn test_insert_at_top() {
        let mut tree = tree();
        let outcome = insert_block(&mut tree, &imports(), "zustand:import", "import { Counter } from \"./components/Counter\";");
        assert_eq!(outcome, Rewrite::Applied);
        let content = tree.read("src/App.tsx").unwrap();
        assert!(content.starts_with(
            "// unistack:begin zustand:import\nimport { Counter } from \"./components/Counter\";\n// unistack:end zustand:import\nexport default"
        ));
    }

    #[test]
    fn test_insert_before_anchor_is_indented() {
        let mut tree = tree();
        insert_block(&mut tree, &body(), "zustand:counter", "<Counter />");
        let content = tree.read("src/App.tsx").unwrap();
        assert!(content.contains(
            "      <h1>Hi</h1>\n      {/* unistack:begin zustand:counter */}\n      <Counter />\n      {/* unistack:end zustand:counter */}\n    </main>\n"
        ));
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut tree = tree();
        insert_block(&mut tree, &body(), "zustand:counter", "<Counter />");
        let once = tree.clone();
        assert_eq!(
            insert_block(&mut tree, &body(), "zustand:counter", "<Other />"),
            Rewrite::Unchanged
        );
        assert_eq!(tree, once);
    }

    #[test]
    fn test_remove_restores_original_bytes() {
        let mut tree = tree();
        insert_block(&mut tree, &imports(), "zustand:import", "import a from \"./a\";");
        insert_block(&mut tree, &body(), "zustand:counter", "<div>\n  <Counter />\n</div>");
        assert!(has_block(&tree, &body(), "zustand:counter"));

        assert_eq!(remove_block(&mut tree, &body(), "zustand:counter"), Rewrite::Applied);
        assert_eq!(remove_block(&mut tree, &imports(), "zustand:import"), Rewrite::Applied);
        assert_eq!(tree.read("src/App.tsx"), Some(APP));
    }

    #[test]
    fn test_remove_survives_surrounding_edits() {
        let mut tree = tree();
        insert_block(&mut tree, &body(), "zustand:counter", "<Counter />");
        let edited = tree
            .read("src/App.tsx")
            .unwrap()
            .replace("<h1>Hi</h1>", "<h1>Hello there</h1>");
        tree.write("src/App.tsx", edited);

        remove_block(&mut tree, &body(), "zustand:counter");
        assert_eq!(
            tree.read("src/App.tsx"),
            Some(APP.replace("<h1>Hi</h1>", "<h1>Hello there</h1>").as_str())
        );
    }

    #[test]
    fn test_remove_absent_block_is_unchanged() {
        let mut tree = tree();
        assert_eq!(remove_block(&mut tree, &body(), "tailwind:demo"), Rewrite::Unchanged);
        assert_eq!(tree.read("src/App.tsx"), Some(APP));
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let mut tree = ProjectTree::new();
        assert_eq!(insert_block(&mut tree, &imports(), "x", "y"), Rewrite::Skipped);
        assert_eq!(remove_block(&mut tree, &imports(), "x"), Rewrite::Skipped);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_missing_anchor_is_skipped() {
        let mut tree = ProjectTree::new();
        tree.write("src/App.tsx", "export const x = 1;\n");
        assert_eq!(insert_block(&mut tree, &body(), "x", "<p />"), Rewrite::Skipped);
        assert_eq!(tree.read("src/App.tsx"), Some("export const x = 1;\n"));
    }

    #[test]
    fn test_unterminated_block_is_left_alone() {
        let mut tree = ProjectTree::new();
        let broken = "// unistack:begin zustand:import\nimport a from \"./a\";\n";
        tree.write("src/App.tsx", broken);
        assert_eq!(remove_block(&mut tree, &imports(), "zustand:import"), Rewrite::Skipped);
        assert_eq!(tree.read("src/App.tsx"), Some(broken));
    }

    #[test]
    fn test_blocks_with_different_tags_are_independent() {
        let mut tree = tree();
        insert_block(&mut tree, &body(), "zustand:counter", "<Counter />");
        insert_block(&mut tree, &body(), "tailwind:demo", "<section />");
        remove_block(&mut tree, &body(), "zustand:counter");
        assert!(has_block(&tree, &body(), "tailwind:demo"));
        assert!(!has_block(&tree, &body(), "zustand:counter"));
    }
}
