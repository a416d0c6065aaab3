//! Multi-language build command.

use anyhow::{Context, Result};
use lingobook_engines::LatexTypesetter;
use lingobook_static::MultiBuilder;

use crate::config::ConfigFile;

/// Run the build command.
///
/// Returns whether every language built.
pub async fn run(config: &ConfigFile, lang: Option<String>, pdf: bool) -> Result<bool> {
    let builder = MultiBuilder::new(config.layout(), config.generator())
        .with_display_names(config.display_names())
        .only_language(lang);

    let report = if pdf {
        let typesetter = LatexTypesetter::detect(config.pdf.engine.as_deref())
            .context("PDF export needs tectonic, make or latexmk on PATH")?;
        tracing::info!("Exporting PDFs with {}", typesetter.engine().name());
        builder.export_pdfs(&typesetter).await?
    } else {
        tracing::info!("Building {}...", builder.layout().book_dir.display());
        builder.build().await?
    };

    for failure in report.failed() {
        tracing::error!(
            "{}: {}",
            failure.variant.code,
            failure.diagnostic.as_deref().unwrap_or("unknown error")
        );
    }

    tracing::info!("{} in {}ms", report.summary(), report.duration_ms);
    tracing::info!("Output: {}", report.output_dir.display());

    Ok(report.is_success())
}
