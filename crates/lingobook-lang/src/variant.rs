//! Language variant model.

use std::path::{Path, PathBuf};

/// Canonical config file name expected by the site generator.
pub const CONFIG_FILE: &str = "_config.yml";

/// Canonical table-of-contents file name expected by the site generator.
pub const TOC_FILE: &str = "_toc.yml";

/// Code reported for the unsuffixed variant of a single-language book.
pub const DEFAULT_CODE: &str = "default";

/// One language edition of the book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageVariant {
    /// Language code (e.g. "es"), or [`DEFAULT_CODE`] for the default variant
    pub code: String,

    /// Human readable name shown by the language switcher
    pub display_name: String,

    /// Whether this is the unsuffixed, single-language variant
    pub is_default: bool,

    /// Directory holding this variant's content
    pub content_dir: PathBuf,

    /// Source config file (`_config_<code>.yml` or `_config.yml`)
    pub config_file: PathBuf,

    /// Source toc file (`_toc_<code>.yml` or `_toc.yml`)
    pub toc_file: PathBuf,

    /// Entry page declared by the toc's `root`, as an HTML file name
    pub entry_page: Option<String>,
}

impl LanguageVariant {
    /// Create a localized variant whose content lives under `book_dir/<code>`.
    pub fn localized(book_dir: &Path, code: &str, display_name: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            display_name: display_name.into(),
            is_default: false,
            content_dir: book_dir.join(code),
            config_file: book_dir.join(format!("_config_{code}.yml")),
            toc_file: book_dir.join(format!("_toc_{code}.yml")),
            entry_page: None,
        }
    }

    /// Create the default variant backed by the unsuffixed config pair.
    pub fn default_for(book_dir: &Path) -> Self {
        Self {
            code: DEFAULT_CODE.to_string(),
            display_name: DEFAULT_CODE.to_string(),
            is_default: true,
            content_dir: book_dir.to_path_buf(),
            config_file: book_dir.join(CONFIG_FILE),
            toc_file: book_dir.join(TOC_FILE),
            entry_page: None,
        }
    }

    /// Attach the entry page read from the toc.
    pub fn with_entry_page(mut self, entry_page: Option<String>) -> Self {
        self.entry_page = entry_page;
        self
    }

    /// Suffix used for per-variant artifacts such as `teachbook_en.pdf`.
    ///
    /// Empty for the default variant.
    pub fn artifact_suffix(&self) -> String {
        if self.is_default {
            String::new()
        } else {
            format!("_{}", self.code)
        }
    }
}

impl std::fmt::Display for LanguageVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_default {
            f.write_str(DEFAULT_CODE)
        } else {
            write!(f, "{} ({})", self.code, self.display_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localized_paths_follow_suffix_convention() {
        let variant = LanguageVariant::localized(Path::new("book"), "en", "English");

        assert_eq!(variant.content_dir, PathBuf::from("book/en"));
        assert_eq!(variant.config_file, PathBuf::from("book/_config_en.yml"));
        assert_eq!(variant.toc_file, PathBuf::from("book/_toc_en.yml"));
        assert!(!variant.is_default);
        assert_eq!(variant.artifact_suffix(), "_en");
    }

    #[test]
    fn default_variant_uses_book_root() {
        let variant = LanguageVariant::default_for(Path::new("book"));

        assert!(variant.is_default);
        assert_eq!(variant.content_dir, PathBuf::from("book"));
        assert_eq!(variant.config_file, PathBuf::from("book/_config.yml"));
        assert_eq!(variant.artifact_suffix(), "");
        assert_eq!(variant.to_string(), "default");
    }
}
