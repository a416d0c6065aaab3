//! Language variant discovery for multi-language books.
//!
//! A book directory declares its languages through pairs of configuration
//! files (`_config_<code>.yml` / `_toc_<code>.yml`). This crate turns those
//! files into an ordered set of [`LanguageVariant`]s and produces the
//! `languages.json` manifest consumed by the language switcher.

pub mod manifest;
pub mod names;
pub mod registry;
pub mod variant;

pub use manifest::{LanguageEntry, LanguageManifest, MANIFEST_FILE};
pub use names::DisplayNames;
pub use registry::{LanguageRegistry, RegistryError};
pub use variant::{LanguageVariant, CONFIG_FILE, DEFAULT_CODE, TOC_FILE};
