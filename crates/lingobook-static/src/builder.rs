//! Multi-language build orchestration.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use lingobook_engines::{InterruptWatch, OutputFormat, SiteGenerator, Typesetter};
use lingobook_lang::{DisplayNames, LanguageManifest, LanguageRegistry, LanguageVariant};

use crate::assets::merge;
use crate::error::BuildError;
use crate::invoker::{BuildInvoker, BuildResult};
use crate::layout::BookLayout;
use crate::links::fix_download_links;
use crate::pdf::PdfExporter;
use crate::redirect::write_redirect;
use crate::relocate::Relocator;
use crate::workspace::Stager;

/// Stage of a run, reported with failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Discovering,
    Staging,
    Building,
    FixingLinks,
    Relocating,
    Typesetting,
    MergingAssets,
    GeneratingRedirect,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Discovering => "discovering",
            Phase::Staging => "staging",
            Phase::Building => "building",
            Phase::FixingLinks => "fixing links",
            Phase::Relocating => "relocating",
            Phase::Typesetting => "typesetting",
            Phase::MergingAssets => "merging assets",
            Phase::GeneratingRedirect => "generating redirect",
            Phase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Outcome of a whole run.
#[derive(Debug)]
pub struct RunReport {
    /// One result per selected variant, in build order
    pub results: Vec<BuildResult>,

    /// Total run time in milliseconds
    pub duration_ms: u64,

    /// Root of the unified output tree
    pub output_dir: PathBuf,

    /// Root redirect, when one was written
    pub redirect: Option<PathBuf>,
}

impl RunReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &BuildResult> {
        self.results.iter().filter(|r| r.succeeded)
    }

    pub fn failed(&self) -> impl Iterator<Item = &BuildResult> {
        self.results.iter().filter(|r| !r.succeeded)
    }

    /// Whether every variant built.
    pub fn is_success(&self) -> bool {
        self.failed().next().is_none()
    }

    /// One-line tally such as `2 of 3 languages built (failed: fr)`.
    pub fn summary(&self) -> String {
        let ok = self.succeeded().count();
        let total = self.results.len();
        let failed: Vec<&str> = self.failed().map(|r| r.variant.code.as_str()).collect();

        if failed.is_empty() {
            format!("{ok} of {total} languages built")
        } else {
            format!("{ok} of {total} languages built (failed: {})", failed.join(", "))
        }
    }
}

/// Discover a book's languages and refresh its `languages.json`.
///
/// The manifest is written into the book's static source so every staged
/// workspace carries it. Failing to write it is not fatal.
pub fn discover_languages(
    layout: &BookLayout,
    names: &DisplayNames,
) -> Result<LanguageRegistry, BuildError> {
    let registry = LanguageRegistry::discover(&layout.book_dir, names)?;
    tracing::info!("Detected languages: {}", registry.codes().join(", "));

    if registry.default_variant().is_none() {
        let manifest = LanguageManifest::from_variants(registry.variants());
        match manifest.write(&layout.static_source()) {
            Ok(path) => tracing::debug!("Wrote {}", path.display()),
            Err(e) => tracing::warn!("Failed to write language manifest: {}", e),
        }
    }

    Ok(registry)
}

/// Builds every language variant of a book into one output tree.
pub struct MultiBuilder {
    layout: BookLayout,
    names: DisplayNames,
    generator: Box<dyn SiteGenerator>,
    only: Option<String>,
    interrupts: Option<InterruptWatch>,
}

impl MultiBuilder {
    pub fn new(layout: BookLayout, generator: impl SiteGenerator + 'static) -> Self {
        Self {
            layout,
            names: DisplayNames::default(),
            generator: Box::new(generator),
            only: None,
            interrupts: None,
        }
    }

    pub fn with_display_names(mut self, names: DisplayNames) -> Self {
        self.names = names;
        self
    }

    /// Restrict the run to one language code.
    pub fn only_language(mut self, code: Option<String>) -> Self {
        self.only = code;
        self
    }

    /// Use `watch` instead of listening for Ctrl-C during each run.
    pub fn with_interrupts(mut self, watch: InterruptWatch) -> Self {
        self.interrupts = Some(watch);
        self
    }

    pub fn layout(&self) -> &BookLayout {
        &self.layout
    }

    /// Build the HTML output of every selected variant.
    ///
    /// Per-variant failures are recorded in the report and do not stop the
    /// run. Discovery errors and interrupts do. An interrupt received between
    /// subprocesses stops the run at the next variant or phase boundary.
    pub async fn build(&self) -> Result<RunReport, BuildError> {
        let start = Instant::now();
        let listening;
        let interrupts = match &self.interrupts {
            Some(watch) => watch,
            None => {
                listening = InterruptWatch::listen();
                &listening
            }
        };

        let registry = discover_languages(&self.layout, &self.names)?;
        let selected = self.select(&registry)?;

        fs::create_dir_all(&self.layout.output_dir)
            .map_err(|e| BuildError::io(&self.layout.output_dir, e))?;

        let mut results = Vec::with_capacity(selected.len());
        for variant in selected.variants() {
            interrupts.check(format_args!("{} of {}", Phase::Staging, variant.code))?;
            let mut phase = Phase::Staging;
            let outcome = self.build_variant(variant, &mut phase).await;
            results.push(contain(variant, phase, outcome)?);
        }

        interrupts.check(Phase::MergingAssets)?;
        tracing::debug!("{}", Phase::MergingAssets);
        let custom = self.layout.static_source();
        let report = merge(&custom, &self.layout.shared_static());
        if !report.is_complete() {
            tracing::warn!("{} static assets could not be published", report.skipped.len());
        }

        interrupts.check(Phase::GeneratingRedirect)?;
        tracing::debug!("{}", Phase::GeneratingRedirect);
        let redirect = match registry.redirect_language(self.layout.default_language.as_deref()) {
            Some(target) => {
                let page = target.entry_page.as_deref().unwrap_or(&self.layout.entry_page);
                Some(write_redirect(&self.layout.output_dir, &target.code, page)?)
            }
            None => None,
        };

        tracing::debug!("{}", Phase::Done);
        Ok(RunReport {
            results,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: self.layout.output_dir.clone(),
            redirect,
        })
    }

    /// Export one PDF per selected variant into the book's static source.
    pub async fn export_pdfs(&self, typesetter: &dyn Typesetter) -> Result<RunReport, BuildError> {
        let start = Instant::now();
        let listening;
        let interrupts = match &self.interrupts {
            Some(watch) => watch,
            None => {
                listening = InterruptWatch::listen();
                &listening
            }
        };

        let registry = discover_languages(&self.layout, &self.names)?;
        let selected = self.select(&registry)?;
        let exporter = PdfExporter::new(&self.layout, self.generator.as_ref(), typesetter);

        let mut results = Vec::with_capacity(selected.len());
        for variant in selected.variants() {
            interrupts.check(format_args!("{} of {}", Phase::Staging, variant.code))?;
            results.push(exporter.export(variant).await?);
        }

        Ok(RunReport {
            results,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: self.layout.static_source(),
            redirect: None,
        })
    }

    fn select(&self, registry: &LanguageRegistry) -> Result<LanguageRegistry, BuildError> {
        let mut selected = registry.clone();
        if let Some(code) = &self.only {
            selected.retain_only(code)?;
        }
        Ok(selected)
    }

    /// Stage, build, link-fix and relocate one variant.
    ///
    /// `phase` tracks how far the variant got, for failure reports.
    async fn build_variant(
        &self,
        variant: &LanguageVariant,
        phase: &mut Phase,
    ) -> Result<BuildResult, BuildError> {
        enter(phase, Phase::Staging, variant);
        let workspace = Stager::new(&self.layout).stage(variant)?;

        enter(phase, Phase::Building, variant);
        let built = BuildInvoker::new(self.generator.as_ref())
            .invoke(&workspace, OutputFormat::Html)
            .await?;
        if !built.succeeded {
            return Ok(built);
        }

        // Pages are fixed in the workspace so nothing half-rewritten is published
        enter(phase, Phase::FixingLinks, variant);
        let relocator = Relocator::new(&self.layout);
        let generated = relocator.locate(&workspace)?;
        let pdf = self.layout.pdf_filename(variant);
        fix_download_links(&generated, &self.layout.static_dir, &pdf)?;

        enter(phase, Phase::Relocating, variant);
        let output_dir = relocator.relocate(&workspace)?;
        if workspace.is_isolated() {
            let report = merge(&relocator.theme_assets(&workspace), &self.layout.shared_static());
            if !report.is_complete() {
                tracing::warn!(
                    "{} theme assets of {} could not be published",
                    report.skipped.len(),
                    variant.code
                );
            }
        }
        drop(workspace);

        tracing::info!("Built {} into {}", variant, output_dir.display());
        Ok(BuildResult::success(variant, Some(output_dir)))
    }
}

fn enter(current: &mut Phase, next: Phase, variant: &LanguageVariant) {
    tracing::debug!("{}: {}", variant.code, next);
    *current = next;
}

/// Turn a contained error into a failed result, passing fatal ones through.
pub(crate) fn contain(
    variant: &LanguageVariant,
    phase: Phase,
    outcome: Result<BuildResult, BuildError>,
) -> Result<BuildResult, BuildError> {
    let result = match outcome {
        Ok(result) => result,
        Err(e) if e.is_fatal() => return Err(e),
        Err(e) => BuildResult::failure(variant, phase, &e),
    };

    if !result.succeeded {
        tracing::error!(
            "{} failed while {}: {}",
            variant,
            result.failed_phase.unwrap_or(phase),
            result.diagnostic.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{book_with, ScriptGenerator, FAILING, FLAT, NESTED};
    use lingobook_lang::RegistryError;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn layout_for(book: &std::path::Path) -> BookLayout {
        let mut layout = BookLayout::new(book);
        layout.output_dir = book.parent().unwrap().join("site");
        layout
    }

    #[tokio::test]
    async fn builds_every_language_into_one_tree() {
        let temp = tempdir().unwrap();
        let book = book_with(temp.path(), &["en", "es"]);
        let layout = layout_for(&book);
        let out = layout.output_dir.clone();

        let report = MultiBuilder::new(layout, ScriptGenerator::new(NESTED))
            .build()
            .await
            .unwrap();

        assert!(report.is_success());
        assert_eq!(report.summary(), "2 of 2 languages built");
        for code in ["en", "es"] {
            assert!(out.join(code).join("intro.html").is_file());
            assert!(!book.join(format!("temp_build_{code}")).exists());
        }
        assert!(out.join("_static/theme.css").is_file());
        assert!(out.join("_static/custom.js").is_file());
        assert!(out.join("_static/languages.json").is_file());
        assert_eq!(report.redirect, Some(out.join("index.html")));
        let index = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(index.contains("es/intro.html"));
    }

    #[tokio::test]
    async fn fixes_download_links_in_nested_pages() {
        let temp = tempdir().unwrap();
        let book = book_with(temp.path(), &["en"]);
        let layout = layout_for(&book);
        let out = layout.output_dir.clone();

        MultiBuilder::new(layout, ScriptGenerator::new(FLAT))
            .build()
            .await
            .unwrap();

        let top = fs::read_to_string(out.join("en/intro.html")).unwrap();
        let nested = fs::read_to_string(out.join("en/part/one.html")).unwrap();
        assert!(top.contains(r#"href="_static/teachbook_en.pdf""#));
        assert!(nested.contains(r#"href="../_static/teachbook_en.pdf""#));
    }

    #[tokio::test]
    async fn nested_output_is_published_with_fixed_links() {
        let temp = tempdir().unwrap();
        let book = book_with(temp.path(), &["en"]);
        let layout = layout_for(&book);
        let out = layout.output_dir.clone();

        MultiBuilder::new(layout, ScriptGenerator::new(NESTED))
            .build()
            .await
            .unwrap();

        let nested = fs::read_to_string(out.join("en/part/one.html")).unwrap();
        assert_eq!(nested, r#"<a href="../_static/teachbook_en.pdf">en</a>"#);
        assert!(!book.join("temp_build_en").exists());
    }

    #[tokio::test]
    async fn pending_interrupt_stops_before_the_next_variant() {
        let temp = tempdir().unwrap();
        let book = book_with(temp.path(), &["en", "es"]);
        let layout = layout_for(&book);
        let out = layout.output_dir.clone();
        let watch = InterruptWatch::detached();
        watch.trip();

        let err = MultiBuilder::new(layout, ScriptGenerator::new(NESTED))
            .with_interrupts(watch)
            .build()
            .await
            .unwrap_err();

        assert!(err.is_fatal());
        assert_eq!(err.to_string(), "Build interrupted during staging of en");
        assert!(!out.join("en").exists());
        assert!(!out.join("index.html").exists());
    }

    #[tokio::test]
    async fn missing_content_fails_only_that_language() {
        let temp = tempdir().unwrap();
        let book = book_with(temp.path(), &["de", "en", "fr"]);
        fs::remove_dir_all(book.join("en")).unwrap();
        let layout = layout_for(&book);
        let out = layout.output_dir.clone();

        let report = MultiBuilder::new(layout, ScriptGenerator::new(NESTED))
            .build()
            .await
            .unwrap();

        assert!(!report.is_success());
        let failed: Vec<_> = report.failed().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].variant.code, "en");
        assert_eq!(failed[0].failed_phase, Some(Phase::Staging));
        assert!(out.join("de/intro.html").is_file());
        assert!(out.join("fr/intro.html").is_file());
        assert!(!out.join("en").exists());
        assert_eq!(report.summary(), "2 of 3 languages built (failed: en)");
    }

    #[tokio::test]
    async fn generator_failure_is_reported_with_diagnostic() {
        let temp = tempdir().unwrap();
        let book = book_with(temp.path(), &["en"]);
        let layout = layout_for(&book);

        let report = MultiBuilder::new(layout, ScriptGenerator::new(FAILING))
            .build()
            .await
            .unwrap();

        let failure = report.failed().next().unwrap();
        assert_eq!(failure.failed_phase, Some(Phase::Building));
        let diagnostic = failure.diagnostic.as_deref().unwrap();
        assert!(diagnostic.contains("toc error in en"));
        assert!(diagnostic.contains("building en"));
        assert!(!book.join("temp_build_en").exists());
    }

    #[tokio::test]
    async fn single_language_run_keeps_other_output() {
        let temp = tempdir().unwrap();
        let book = book_with(temp.path(), &["en", "es"]);
        let layout = layout_for(&book);
        let out = layout.output_dir.clone();
        fs::create_dir_all(out.join("es")).unwrap();
        fs::write(out.join("es/intro.html"), "previous").unwrap();

        let report = MultiBuilder::new(layout, ScriptGenerator::new(NESTED))
            .only_language(Some("en".to_string()))
            .build()
            .await
            .unwrap();

        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].variant.code, "en");
        assert_eq!(fs::read_to_string(out.join("es/intro.html")).unwrap(), "previous");
        assert!(fs::read_to_string(out.join("index.html")).unwrap().contains("es/intro.html"));
    }

    #[tokio::test]
    async fn unknown_language_is_fatal() {
        let temp = tempdir().unwrap();
        let book = book_with(temp.path(), &["en"]);

        let err = MultiBuilder::new(layout_for(&book), ScriptGenerator::new(NESTED))
            .only_language(Some("xx".to_string()))
            .build()
            .await
            .unwrap_err();

        assert!(matches!(err, BuildError::Registry(RegistryError::UnknownLanguage { .. })));
    }

    #[tokio::test]
    async fn missing_configuration_aborts() {
        let temp = tempdir().unwrap();
        let book = temp.path().join("book");
        fs::create_dir_all(&book).unwrap();

        let err = MultiBuilder::new(layout_for(&book), ScriptGenerator::new(NESTED))
            .build()
            .await
            .unwrap_err();

        assert!(err.is_fatal());
        assert!(matches!(err, BuildError::Registry(RegistryError::ConfigurationMissing(_))));
    }

    #[tokio::test]
    async fn default_book_is_published_at_root_without_redirect() {
        let temp = tempdir().unwrap();
        let book = temp.path().join("book");
        fs::create_dir_all(&book).unwrap();
        fs::write(book.join("_config.yml"), "title: Book").unwrap();
        fs::write(book.join("_toc.yml"), "root: intro").unwrap();
        let layout = layout_for(&book);
        let out = layout.output_dir.clone();

        let report = MultiBuilder::new(layout, ScriptGenerator::new(FLAT))
            .build()
            .await
            .unwrap();

        assert!(report.is_success());
        assert_eq!(report.redirect, None);
        assert!(out.join("intro.html").is_file());
        assert!(out.join("_static/theme.css").is_file());
        assert!(!out.join("index.html").exists());
    }

    #[tokio::test]
    async fn unpublishable_theme_asset_only_warns() {
        let temp = tempdir().unwrap();
        let book = book_with(temp.path(), &["en"]);
        let layout = layout_for(&book);
        let out = layout.output_dir.clone();
        // A directory where the theme stylesheet should land
        fs::create_dir_all(out.join("_static/theme.css")).unwrap();

        let report = MultiBuilder::new(layout, ScriptGenerator::new(NESTED))
            .build()
            .await
            .unwrap();

        assert!(report.is_success());
        assert!(out.join("en/intro.html").is_file());
        assert!(out.join("_static/theme.css").is_dir());
        assert!(out.join("_static/custom.js").is_file());
    }

    #[tokio::test]
    async fn custom_static_overrides_theme_assets() {
        let temp = tempdir().unwrap();
        let book = book_with(temp.path(), &["en"]);
        fs::write(book.join("_static/theme.css"), "custom").unwrap();
        let layout = layout_for(&book);
        let out = layout.output_dir.clone();

        MultiBuilder::new(layout, ScriptGenerator::new(NESTED))
            .build()
            .await
            .unwrap();

        assert_eq!(fs::read_to_string(out.join("_static/theme.css")).unwrap(), "custom");
    }

    #[test]
    fn discovery_writes_manifest_into_static_source() {
        let temp = tempdir().unwrap();
        let book = book_with(temp.path(), &["es", "en"]);
        let layout = layout_for(&book);

        let registry = discover_languages(&layout, &DisplayNames::default()).unwrap();

        assert_eq!(registry.codes(), vec!["en", "es"]);
        let json = fs::read_to_string(book.join("_static/languages.json")).unwrap();
        assert!(json.contains("Español"));
        assert!(json.contains("English"));
    }
}
