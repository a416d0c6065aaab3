//! Display names for language codes.

use std::collections::BTreeMap;

const BUILTIN_NAMES: &[(&str, &str)] = &[
    ("ca", "Català"),
    ("de", "Deutsch"),
    ("en", "English"),
    ("es", "Español"),
    ("eu", "Euskara"),
    ("fr", "Français"),
    ("gl", "Galego"),
    ("it", "Italiano"),
    ("pt", "Português"),
];

/// Lookup table from language code to display name.
#[derive(Debug, Clone)]
pub struct DisplayNames {
    names: BTreeMap<String, String>,
}

impl DisplayNames {
    /// Table with the built-in names only.
    pub fn builtin() -> Self {
        Self {
            names: BUILTIN_NAMES
                .iter()
                .map(|(code, name)| (code.to_string(), name.to_string()))
                .collect(),
        }
    }

    /// Layer user-provided names over the current table.
    pub fn with_overrides<I, K, V>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (code, name) in overrides {
            self.names.insert(code.into(), name.into());
        }
        self
    }

    /// Display name for `code`; unknown codes fall back to the upper-cased code.
    pub fn name_for(&self, code: &str) -> String {
        self.names
            .get(code)
            .cloned()
            .unwrap_or_else(|| code.to_uppercase())
    }
}

impl Default for DisplayNames {
    fn default() -> Self {
        Self::builtin()
    }
}
