//! Canonical base templates, embedded at compile time
//!
//! Files named `_gitignore` are stored under that name so they don't affect
//! this repository's own ignore rules; they are renamed on selection.

pub(crate) type TemplateFiles = &'static [(&'static str, &'static str)];

macro_rules! embed {
    ($variant:literal => [$($path:literal),* $(,)?]) => {
        &[$((
            $path,
            include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/", $variant, "/", $path)),
        )),*]
    };
}

pub(crate) const REACT_TS_VITE: TemplateFiles = embed!("react-ts-vite" => [
    "_gitignore",
    "index.html",
    "package.json",
    "tsconfig.json",
    "vite.config.ts",
    "src/App.tsx",
    "src/index.css",
    "src/main.tsx",
    "src/vite-env.d.ts",
]);

pub(crate) const REACT_JS_VITE: TemplateFiles = embed!("react-js-vite" => [
    "_gitignore",
    "index.html",
    "package.json",
    "vite.config.js",
    "src/App.jsx",
    "src/index.css",
    "src/main.jsx",
]);

pub(crate) const NEXTJS_TS: TemplateFiles = embed!("nextjs-ts" => [
    "_gitignore",
    "next-env.d.ts",
    "next.config.mjs",
    "package.json",
    "tsconfig.json",
    "app/layout.tsx",
    "app/page.tsx",
]);

pub(crate) const NODE_EXPRESS: TemplateFiles = embed!("node-express" => [
    "_gitignore",
    "package.json",
    "server.js",
    "src/server.js",
    "src/routes/home.js",
    "src/services/homeService.js",
]);

/// Map a stored template path to the path it gets in the generated project.
pub(crate) fn output_path(stored: &str) -> String {
    match stored.rsplit_once('/') {
        Some((dir, "_gitignore")) => format!("{dir}/.gitignore"),
        None if stored == "_gitignore" => ".gitignore".to_string(),
        _ => stored.to_string(),
    }
}
