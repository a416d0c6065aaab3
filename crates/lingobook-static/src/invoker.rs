//! Running the site generator against a workspace.

use std::path::PathBuf;

use lingobook_engines::{process, BuildRequest, EngineError, OutputFormat, SiteGenerator};
use lingobook_lang::LanguageVariant;

use crate::builder::Phase;
use crate::error::BuildError;
use crate::workspace::Workspace;

/// Result of building one variant.
#[derive(Debug, Clone)]
pub struct BuildResult {
    pub variant: LanguageVariant,
    pub succeeded: bool,
    /// Where the variant's output was published (pages directory or PDF)
    pub output: Option<PathBuf>,
    /// What went wrong, for failed builds
    pub diagnostic: Option<String>,
    /// Phase the build failed in
    pub failed_phase: Option<Phase>,
}

impl BuildResult {
    pub fn success(variant: &LanguageVariant, output: Option<PathBuf>) -> Self {
        Self {
            variant: variant.clone(),
            succeeded: true,
            output,
            diagnostic: None,
            failed_phase: None,
        }
    }

    pub fn failure(variant: &LanguageVariant, phase: Phase, error: &BuildError) -> Self {
        Self {
            variant: variant.clone(),
            succeeded: false,
            output: None,
            diagnostic: Some(error.to_string()),
            failed_phase: Some(phase),
        }
    }
}

/// Runs a [`SiteGenerator`] inside workspaces.
pub struct BuildInvoker<'a> {
    generator: &'a dyn SiteGenerator,
}

impl<'a> BuildInvoker<'a> {
    pub fn new(generator: &'a dyn SiteGenerator) -> Self {
        Self { generator }
    }

    /// Build the workspace's variant in `format`.
    ///
    /// A generator that cannot be started or exits non-zero produces a
    /// failed [`BuildResult`] carrying its output. Only an interrupt is
    /// returned as an error.
    pub async fn invoke(
        &self,
        workspace: &Workspace,
        format: OutputFormat,
    ) -> Result<BuildResult, BuildError> {
        let variant = workspace.variant();
        let request = BuildRequest {
            root: workspace.root(),
            variant,
            format,
        };
        let spec = self.generator.command(&request);
        tracing::info!("Building {} with {}", variant, self.generator.name());
        tracing::debug!("{}", spec.display());

        let failure = |diagnostic: String| {
            let err = BuildError::ExternalToolFailure {
                code: variant.code.clone(),
                diagnostic,
            };
            BuildResult::failure(variant, Phase::Building, &err)
        };

        match process::run(&spec).await {
            Ok(output) if output.success() => {
                let log = output.combined();
                if !log.is_empty() {
                    tracing::debug!("{}", log);
                }
                Ok(BuildResult::success(variant, None))
            }
            Ok(output) => Ok(failure(output.diagnostic(&spec.name()))),
            Err(EngineError::Interrupted(name)) => Err(BuildError::Interrupted(name)),
            Err(e) => Ok(failure(e.to_string())),
        }
    }
}
