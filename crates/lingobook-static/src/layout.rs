//! Directory layout of a book and its published output.

use std::path::{Path, PathBuf};

use lingobook_engines::OutputFormat;
use lingobook_lang::LanguageVariant;

/// Immutable description of where everything lives.
///
/// Built once at start-up and shared by every stage of a run.
#[derive(Debug, Clone)]
pub struct BookLayout {
    /// Book source directory
    pub book_dir: PathBuf,

    /// Root of the unified output tree
    pub output_dir: PathBuf,

    /// Directory under which per-variant workspaces are created
    pub workspace_dir: PathBuf,

    /// Name of the static-asset directory (in the book, workspaces and output)
    pub static_dir: String,

    /// Name of the generator's build directory inside a project root
    pub build_dir: String,

    /// Language the root redirect should prefer
    pub default_language: Option<String>,

    /// Page the root redirect forwards to when the toc declares none
    pub entry_page: String,

    /// Stem of the exported PDF (`teachbook` → `teachbook_en.pdf`)
    pub pdf_name: String,

    /// LaTeX templates overlaid onto generated LaTeX sources
    pub latex_templates: Option<PathBuf>,
}

impl BookLayout {
    /// Layout with defaults derived from `book_dir`.
    pub fn new(book_dir: impl Into<PathBuf>) -> Self {
        let book_dir = book_dir.into();
        Self {
            output_dir: book_dir.join("_build").join("html"),
            workspace_dir: book_dir.clone(),
            book_dir,
            static_dir: "_static".to_string(),
            build_dir: "_build".to_string(),
            default_language: Some("es".to_string()),
            entry_page: "intro.html".to_string(),
            pdf_name: "teachbook".to_string(),
            latex_templates: None,
        }
    }

    /// The book's own static assets.
    pub fn static_source(&self) -> PathBuf {
        self.book_dir.join(&self.static_dir)
    }

    /// The shared static-asset directory of the output tree.
    pub fn shared_static(&self) -> PathBuf {
        self.output_dir.join(&self.static_dir)
    }

    /// Workspace directory for a localized variant.
    pub fn workspace_root(&self, variant: &LanguageVariant) -> PathBuf {
        self.workspace_dir.join(format!("temp_build_{}", variant.code))
    }

    /// Where a variant's pages end up in the output tree.
    pub fn variant_output(&self, variant: &LanguageVariant) -> PathBuf {
        if variant.is_default {
            self.output_dir.clone()
        } else {
            self.output_dir.join(&variant.code)
        }
    }

    /// Directory the generator writes `format` to under `root`.
    pub fn generator_output(&self, root: &Path, format: OutputFormat) -> PathBuf {
        root.join(&self.build_dir).join(format.dir_name())
    }

    /// File name of the exported PDF for a variant.
    pub fn pdf_filename(&self, variant: &LanguageVariant) -> String {
        format!("{}{}.pdf", self.pdf_name, variant.artifact_suffix())
    }
}

impl Default for BookLayout {
    fn default() -> Self {
        Self::new("book")
    }
}
