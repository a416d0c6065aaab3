//! PDF export.
//!
//! The generator renders LaTeX sources in the variant's workspace, custom
//! templates are laid over them and a typesetter turns them into a PDF that
//! lands in the book's static source, where the HTML build picks it up for
//! the download button.

use std::fs;
use std::path::Path;

use lingobook_engines::{find_main_tex, find_pdf, process, OutputFormat, SiteGenerator, Typesetter};
use lingobook_lang::LanguageVariant;

use crate::assets::merge;
use crate::builder::{contain, Phase};
use crate::error::BuildError;
use crate::invoker::{BuildInvoker, BuildResult};
use crate::layout::BookLayout;
use crate::workspace::Stager;

/// Exports variants to PDF.
pub struct PdfExporter<'a> {
    layout: &'a BookLayout,
    generator: &'a dyn SiteGenerator,
    typesetter: &'a dyn Typesetter,
}

impl<'a> PdfExporter<'a> {
    pub fn new(
        layout: &'a BookLayout,
        generator: &'a dyn SiteGenerator,
        typesetter: &'a dyn Typesetter,
    ) -> Self {
        Self {
            layout,
            generator,
            typesetter,
        }
    }

    /// Export one variant, containing failures in the returned result.
    pub async fn export(&self, variant: &LanguageVariant) -> Result<BuildResult, BuildError> {
        let mut phase = Phase::Staging;
        let outcome = self.try_export(variant, &mut phase).await;
        contain(variant, phase, outcome)
    }

    async fn try_export(
        &self,
        variant: &LanguageVariant,
        phase: &mut Phase,
    ) -> Result<BuildResult, BuildError> {
        let workspace = Stager::new(self.layout).stage(variant)?;

        *phase = Phase::Building;
        let built = BuildInvoker::new(self.generator)
            .invoke(&workspace, OutputFormat::Latex)
            .await?;
        if !built.succeeded {
            return Ok(built);
        }

        *phase = Phase::Typesetting;
        let latex_dir = self
            .layout
            .generator_output(workspace.root(), OutputFormat::Latex);
        if !latex_dir.is_dir() {
            return Err(BuildError::OutputNotFound {
                code: variant.code.clone(),
                candidates: latex_dir.display().to_string(),
            });
        }

        if let Some(templates) = &self.layout.latex_templates {
            let report = merge(templates, &latex_dir);
            tracing::info!("Applied {} LaTeX templates", report.copied);
        }

        let main_tex = find_main_tex(&latex_dir)
            .map_err(|e| BuildError::io(&latex_dir, e))?
            .ok_or_else(|| missing(variant, "tex", &latex_dir))?;
        let main_name = main_tex.file_name().map(Path::new).unwrap_or(main_tex.as_path());

        let spec = self.typesetter.command(&latex_dir, main_name);
        tracing::info!("Typesetting {} with {}", main_name.display(), self.typesetter.name());
        let output = process::run(&spec).await?;
        if !output.success() {
            return Err(BuildError::ExternalToolFailure {
                code: variant.code.clone(),
                diagnostic: output.diagnostic(self.typesetter.name()),
            });
        }

        let pdf = find_pdf(&latex_dir)
            .map_err(|e| BuildError::io(&latex_dir, e))?
            .ok_or_else(|| missing(variant, "pdf", &latex_dir))?;

        let static_dir = self.layout.static_source();
        fs::create_dir_all(&static_dir).map_err(|e| BuildError::io(&static_dir, e))?;
        let dest = static_dir.join(self.layout.pdf_filename(variant));
        fs::copy(&pdf, &dest).map_err(|e| BuildError::io(&dest, e))?;

        tracing::info!("Exported {} to {}", variant, dest.display());
        Ok(BuildResult::success(variant, Some(dest)))
    }
}

fn missing(variant: &LanguageVariant, kind: &'static str, dir: &Path) -> BuildError {
    BuildError::ArtifactMissing {
        code: variant.code.clone(),
        kind,
        dir: dir.to_path_buf(),
    }
}
