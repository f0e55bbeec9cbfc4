//! Unistack Core - composable project generation
//!
//! This library turns a base project variant plus one feature module per
//! category into a complete, internally consistent project tree. Everything up
//! to writing files happens in memory.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Embedded variant trees, the marker-block
//!   rewriter, feature modules and the composition pass
//! - **Layer 2: Workflow Orchestration** - `ProductConfig` trait and `ProjectBuilder`
//!   for custom UIs, plus the process invoker used for installs
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use unistack_core::{FeatureCategory, ProjectBuilder, VariantId};
//!
//! let project = ProjectBuilder::new(VariantId::NextjsTs)
//!     .project_name("my-app")
//!     .feature(FeatureCategory::StateManagement, "zustand")
//!     .feature(FeatureCategory::Styling, "tailwind")
//!     .build()?;
//! project.materialize(Path::new("my-app")).await?;
//! ```

pub mod builder;
pub mod compose;
pub mod error;
pub mod features;
pub mod manifest;
pub mod product;
pub mod rewriter;
pub mod runtime;
pub mod scaffold;
pub mod tree;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use builder::{ComposedProject, ExternalProcessFailure, InstallReport, ProjectBuilder};
pub use compose::{compose, validate_references, Selection};
pub use error::{Result, ScaffoldError};
pub use features::{FeatureCategory, FeatureModule, NONE};
pub use product::ProductConfig;
pub use rewriter::{IntegrationPoint, PointKind, Rewrite};
pub use runtime::{InstallCommand, NpmInvoker, ProcessInvoker};
pub use scaffold::{select, ScaffoldVariant, VariantId, VARIANTS};
pub use tree::ProjectTree;

#[cfg(feature = "tui")]
pub use tui::run;
