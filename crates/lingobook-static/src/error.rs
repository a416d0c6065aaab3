//! Build error taxonomy.

use std::path::PathBuf;

use lingobook_engines::EngineError;
use lingobook_lang::RegistryError;

/// Errors that can occur during a multi-language build.
///
/// Only registry errors, a missing typesetter and interrupts abort a run;
/// everything else is contained to the variant (or file) it happened in.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Content directory for '{code}' not found: {}", .path.display())]
    ContentMissing { code: String, path: PathBuf },

    #[error("{diagnostic}")]
    ExternalToolFailure { code: String, diagnostic: String },

    #[error("No build output for '{code}' (looked in: {candidates})")]
    OutputNotFound { code: String, candidates: String },

    #[error("No .{kind} file for '{code}' in {}", .dir.display())]
    ArtifactMissing {
        code: String,
        kind: &'static str,
        dir: PathBuf,
    },

    #[error("Failed to copy {}: {source}", .path.display())]
    AssetCopyFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render template: {0}")]
    Template(String),

    #[error(transparent)]
    Engine(EngineError),

    #[error("Build interrupted during {0}")]
    Interrupted(String),
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error ends the whole run rather than one variant.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BuildError::Registry(_)
                | BuildError::Interrupted(_)
                | BuildError::Engine(EngineError::TypesetterNotFound(_))
        )
    }
}

impl From<EngineError> for BuildError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Interrupted(name) => BuildError::Interrupted(name),
            other => BuildError::Engine(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_fatal_errors() {
        let missing = BuildError::from(RegistryError::ConfigurationMissing(PathBuf::from("book")));
        let interrupted = BuildError::from(EngineError::Interrupted("jupyter-book".to_string()));
        let content = BuildError::ContentMissing {
            code: "fr".to_string(),
            path: PathBuf::from("book/fr"),
        };

        assert!(missing.is_fatal());
        assert!(interrupted.is_fatal());
        assert!(matches!(interrupted, BuildError::Interrupted(_)));
        assert!(!content.is_fatal());
    }
}
