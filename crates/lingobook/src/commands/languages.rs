//! Language detection command.

use anyhow::Result;
use lingobook_static::discover_languages;

use crate::config::ConfigFile;

/// Print the detected languages and refresh `languages.json`.
pub fn run(config: &ConfigFile) -> Result<()> {
    let layout = config.layout();
    let registry = discover_languages(&layout, &config.display_names())?;

    if registry.default_variant().is_some() {
        println!("Single-language book (no _config_<code>.yml files)");
        return Ok(());
    }

    for variant in registry.variants() {
        println!("{}\t{}", variant.code, variant.display_name);
    }

    Ok(())
}
