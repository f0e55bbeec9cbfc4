//! Error taxonomy for scaffolding and composition

use crate::features::FeatureCategory;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = ScaffoldError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// The interactive flow was interrupted or a confirmation was declined
    #[error("Operation cancelled by user.")]
    UserCancelled,

    #[error("Unknown template '{0}'. Available templates: react-ts-vite, react-js-vite, nextjs-ts, node-express")]
    UnknownVariant(String),

    #[error("Unknown {category} feature '{feature}'")]
    UnknownFeature {
        category: FeatureCategory,
        feature: String,
    },

    #[error("Feature '{feature}' ({category}) is not available for the {variant} template")]
    IncompatibleFeature {
        category: FeatureCategory,
        feature: String,
        variant: &'static str,
    },

    /// A composed file imports a path the tree does not contain. Never caused by
    /// user input; indicates a broken feature module.
    #[error("'{file}' references '{specifier}', which is not part of the generated project")]
    DanglingReference { file: String, specifier: String },

    #[error("Invalid package.json: {0}")]
    Manifest(#[source] serde_json::Error),

    #[error("Failed to serialize generated file: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write {}: {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScaffoldError {
    pub(crate) fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScaffoldError::FileSystem {
            path: path.into(),
            source,
        }
    }
}
