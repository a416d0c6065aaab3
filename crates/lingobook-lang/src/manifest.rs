//! `languages.json` manifest for the client-side language switcher.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::variant::LanguageVariant;

/// File name of the manifest inside the static-asset directory.
pub const MANIFEST_FILE: &str = "languages.json";

/// One entry of the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub code: String,
    pub name: String,
}

/// List of localized variants, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageManifest {
    entries: Vec<LanguageEntry>,
}

impl LanguageManifest {
    /// Build the manifest from discovered variants, skipping the default sentinel.
    pub fn from_variants<'a>(variants: impl IntoIterator<Item = &'a LanguageVariant>) -> Self {
        let entries = variants
            .into_iter()
            .filter(|v| !v.is_default)
            .map(|v| LanguageEntry {
                code: v.code.clone(),
                name: v.display_name.clone(),
            })
            .collect();

        Self { entries }
    }

    pub fn entries(&self) -> &[LanguageEntry] {
        &self.entries
    }

    /// Serialize as pretty JSON. Non-ASCII names are kept verbatim.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.entries)
    }

    /// Write the manifest into `static_dir`, creating the directory if needed.
    pub fn write(&self, static_dir: &Path) -> io::Result<PathBuf> {
        fs::create_dir_all(static_dir)?;
        let path = static_dir.join(MANIFEST_FILE);
        let json = self.to_json().map_err(io::Error::other)?;
        fs::write(&path, json)?;
        Ok(path)
    }
}
