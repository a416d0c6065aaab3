//! Language registry.
//!
//! Scans a book directory for per-language configuration pairs and
//! provides lookup of the discovered variants.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use walkdir::WalkDir;

use crate::names::DisplayNames;
use crate::variant::LanguageVariant;

/// The discovered language variants of a book.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    book_dir: PathBuf,
    /// Localized variants sorted by code, or a single default variant
    variants: Vec<LanguageVariant>,
}

/// Only the `root` key of a toc file is of interest here.
#[derive(Debug, Deserialize)]
struct TocRoot {
    root: Option<String>,
}

fn config_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^_config_([A-Za-z0-9][A-Za-z0-9_-]*)\.yml$").expect("valid config pattern")
    })
}

impl LanguageRegistry {
    /// Discover the language variants declared in `book_dir`.
    ///
    /// Suffixed `_config_<code>.yml` files with a matching `_toc_<code>.yml`
    /// produce localized variants sorted by code. Without any, the unsuffixed
    /// `_config.yml` backs a single default variant.
    pub fn discover(book_dir: &Path, names: &DisplayNames) -> Result<Self, RegistryError> {
        if !book_dir.is_dir() {
            return Err(RegistryError::BookNotFound(book_dir.to_path_buf()));
        }

        let mut variants = Vec::new();

        for entry in WalkDir::new(book_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }

            let filename = entry.file_name().to_string_lossy();
            let Some(caps) = config_pattern().captures(&filename) else {
                continue;
            };
            let code = &caps[1];

            let variant = LanguageVariant::localized(book_dir, code, names.name_for(code));
            if !variant.toc_file.is_file() {
                tracing::warn!(
                    "Ignoring {}: no matching {}",
                    variant.config_file.display(),
                    variant.toc_file.display()
                );
                continue;
            }

            let entry_page = read_entry_page(&variant.toc_file, Some(code));
            variants.push(variant.with_entry_page(entry_page));
        }

        if variants.is_empty() {
            let variant = LanguageVariant::default_for(book_dir);
            if !variant.config_file.is_file() {
                return Err(RegistryError::ConfigurationMissing(book_dir.to_path_buf()));
            }
            let entry_page = read_entry_page(&variant.toc_file, None);
            variants.push(variant.with_entry_page(entry_page));
        } else {
            variants.sort_by(|a, b| a.code.cmp(&b.code));
        }

        Ok(Self {
            book_dir: book_dir.to_path_buf(),
            variants,
        })
    }

    /// The book directory this registry was discovered from.
    pub fn book_dir(&self) -> &Path {
        &self.book_dir
    }

    /// All variants in build order.
    pub fn variants(&self) -> &[LanguageVariant] {
        &self.variants
    }

    /// Look up a variant by code.
    pub fn get(&self, code: &str) -> Option<&LanguageVariant> {
        self.variants.iter().find(|v| v.code == code)
    }

    /// Check if a variant exists.
    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Codes of all variants, in build order.
    pub fn codes(&self) -> Vec<&str> {
        self.variants.iter().map(|v| v.code.as_str()).collect()
    }

    /// The default variant, present only for single-language books.
    pub fn default_variant(&self) -> Option<&LanguageVariant> {
        self.variants.iter().find(|v| v.is_default)
    }

    /// Pick the language the root redirect should forward to.
    ///
    /// Returns `None` for single-language books, whose pages already live
    /// at the output root.
    pub fn redirect_language(&self, preferred: Option<&str>) -> Option<&LanguageVariant> {
        if self.default_variant().is_some() {
            return None;
        }
        preferred
            .and_then(|code| self.get(code))
            .or_else(|| self.variants.first())
    }

    /// Restrict the registry to a single variant.
    pub fn retain_only(&mut self, code: &str) -> Result<(), RegistryError> {
        if !self.contains(code) {
            return Err(RegistryError::UnknownLanguage {
                code: code.to_string(),
                available: self.codes().join(", "),
            });
        }
        self.variants.retain(|v| v.code == code);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

/// Read the toc's `root` entry and turn it into an HTML page name.
///
/// `en/intro` under code `en` becomes `intro.html`; a missing or unreadable
/// toc yields `None`.
fn read_entry_page(toc_file: &Path, code: Option<&str>) -> Option<String> {
    let content = fs::read_to_string(toc_file).ok()?;
    let toc: TocRoot = match serde_yaml::from_str(&content) {
        Ok(toc) => toc,
        Err(e) => {
            tracing::debug!("Could not read root from {}: {}", toc_file.display(), e);
            return None;
        }
    };

    let root = toc.root?;
    let root = root.trim().trim_start_matches("./");
    let page = code
        .and_then(|c| root.strip_prefix(c))
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(root);

    let stem = Path::new(page).with_extension("");
    let stem = stem.to_string_lossy().replace('\\', "/");
    if stem.is_empty() {
        return None;
    }
    Some(format!("{stem}.html"))
}

/// Errors that can occur during language discovery.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Book directory not found: {}", .0.display())]
    BookNotFound(PathBuf),

    #[error("No language configuration found in {}: expected _config_<code>.yml files or _config.yml", .0.display())]
    ConfigurationMissing(PathBuf),

    #[error("Unknown language '{code}' (available: {available})")]
    UnknownLanguage { code: String, available: String },
}
