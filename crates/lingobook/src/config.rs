//! Configuration file (lingobook.toml).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lingobook_engines::JupyterBook;
use lingobook_lang::DisplayNames;
use lingobook_static::BookLayout;
use serde::Deserialize;

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub book: BookConfig,
    /// Display name overrides, `code = "Name"`
    #[serde(default)]
    pub languages: BTreeMap<String, String>,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub pdf: PdfConfig,
}

#[derive(Debug, Deserialize)]
pub struct BookConfig {
    #[serde(default = "default_book_dir")]
    pub dir: String,
    /// Defaults to `<dir>/_build/html`
    pub output: Option<String>,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    #[serde(default = "default_build_dir")]
    pub build_dir: String,
    /// Defaults to the book directory
    pub workspace_dir: Option<String>,
    #[serde(default = "default_language")]
    pub default_language: Option<String>,
    #[serde(default = "default_entry_page")]
    pub entry_page: String,
    #[serde(default = "default_pdf_name")]
    pub pdf_name: String,
}

#[derive(Debug, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_program")]
    pub program: String,
    #[serde(default)]
    pub extra_args: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PdfConfig {
    /// LaTeX templates laid over the generated sources
    pub templates: Option<String>,
    /// Force a typesetter (tectonic, make, latexmk)
    pub engine: Option<String>,
}

fn default_book_dir() -> String {
    "book".to_string()
}
fn default_static_dir() -> String {
    "_static".to_string()
}
fn default_build_dir() -> String {
    "_build".to_string()
}
fn default_language() -> Option<String> {
    Some("es".to_string())
}
fn default_entry_page() -> String {
    "intro.html".to_string()
}
fn default_pdf_name() -> String {
    "teachbook".to_string()
}
fn default_program() -> String {
    "jupyter-book".to_string()
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            dir: default_book_dir(),
            output: None,
            static_dir: default_static_dir(),
            build_dir: default_build_dir(),
            workspace_dir: None,
            default_language: default_language(),
            entry_page: default_entry_page(),
            pdf_name: default_pdf_name(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            extra_args: Vec::new(),
        }
    }
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }

    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let config = parse(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

pub(crate) fn parse(content: &str) -> Result<ConfigFile> {
    Ok(toml::from_str(content)?)
}

impl ConfigFile {
    /// The immutable layout every build stage shares.
    pub fn layout(&self) -> BookLayout {
        let mut layout = BookLayout::new(&self.book.dir);
        if let Some(output) = &self.book.output {
            layout.output_dir = PathBuf::from(output);
        }
        if let Some(workspace_dir) = &self.book.workspace_dir {
            layout.workspace_dir = PathBuf::from(workspace_dir);
        }
        layout.static_dir = self.book.static_dir.clone();
        layout.build_dir = self.book.build_dir.clone();
        layout.default_language = self.book.default_language.clone();
        layout.entry_page = self.book.entry_page.clone();
        layout.pdf_name = self.book.pdf_name.clone();
        layout.latex_templates = self.pdf.templates.as_ref().map(PathBuf::from);
        layout
    }

    pub fn output_dir(&self) -> PathBuf {
        self.layout().output_dir
    }

    pub fn display_names(&self) -> DisplayNames {
        DisplayNames::builtin().with_overrides(self.languages.clone())
    }

    pub fn generator(&self) -> JupyterBook {
        JupyterBook::new()
            .with_program(&self.generator.program)
            .with_extra_args(self.generator.extra_args.clone())
    }
}
