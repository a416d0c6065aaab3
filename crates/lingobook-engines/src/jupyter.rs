//! Jupyter Book site generator.

use lingobook_lang::{CONFIG_FILE, TOC_FILE};

use crate::traits::{BuildRequest, CommandSpec, OutputFormat, SiteGenerator};

/// Runs `jupyter-book build` against a project root.
#[derive(Debug, Clone)]
pub struct JupyterBook {
    program: String,
    extra_args: Vec<String>,
}

impl JupyterBook {
    /// Create a generator using the `jupyter-book` executable on PATH.
    pub fn new() -> Self {
        Self {
            program: "jupyter-book".to_string(),
            extra_args: Vec::new(),
        }
    }

    /// Use a different executable (e.g. a virtualenv path).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Append arguments to every build invocation.
    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }
}

impl Default for JupyterBook {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteGenerator for JupyterBook {
    fn name(&self) -> &'static str {
        "jupyter-book"
    }

    fn command(&self, request: &BuildRequest<'_>) -> CommandSpec {
        // `--all` forces a full rebuild; workspaces never share a cache
        let mut spec = CommandSpec::new(&self.program, request.root).args(["build", ".", "--all"]);

        if request.variant.is_default {
            spec = spec.args(["--config", CONFIG_FILE, "--toc", TOC_FILE]);
        }

        if request.format == OutputFormat::Latex {
            spec = spec.args(["--builder", "latex"]);
        }

        spec.args(&self.extra_args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use lingobook_lang::LanguageVariant;

    #[test]
    fn localized_html_build() {
        let variant = LanguageVariant::localized(Path::new("book"), "en", "English");
        let request = BuildRequest {
            root: Path::new("book/temp_build_en"),
            variant: &variant,
            format: OutputFormat::Html,
        };

        let spec = JupyterBook::new().command(&request);

        assert_eq!(spec.display(), "jupyter-book build . --all");
        assert_eq!(spec.cwd, Path::new("book/temp_build_en"));
    }

    #[test]
    fn default_latex_build_names_config() {
        let variant = LanguageVariant::default_for(Path::new("book"));
        let request = BuildRequest {
            root: Path::new("book"),
            variant: &variant,
            format: OutputFormat::Latex,
        };

        let spec = JupyterBook::new()
            .with_program("/opt/venv/bin/jupyter-book")
            .with_extra_args(vec!["--quiet".to_string()])
            .command(&request);

        assert_eq!(
            spec.display(),
            "/opt/venv/bin/jupyter-book build . --all --config _config.yml --toc _toc.yml --builder latex --quiet"
        );
    }
}
