//! Trait definitions for external engines.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use lingobook_lang::LanguageVariant;

/// Output format requested from the site generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Browsable HTML tree
    Html,
    /// LaTeX sources for the typesetter
    Latex,
}

impl OutputFormat {
    /// Directory name the generator writes this format to, under its build dir.
    pub fn dir_name(&self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Latex => "latex",
        }
    }
}

/// A request to build one variant.
#[derive(Debug, Clone, Copy)]
pub struct BuildRequest<'a> {
    /// Project root the generator runs in (a workspace or the book itself)
    pub root: &'a Path,

    /// The variant being built
    pub variant: &'a LanguageVariant,

    /// Requested output format
    pub format: OutputFormat,
}

/// A fully resolved subprocess invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: OsString,
    pub args: Vec<OsString>,
    pub cwd: PathBuf,
}

impl CommandSpec {
    pub fn new(program: impl Into<OsString>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Program name for log and error messages.
    pub fn name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    /// Full command line for log messages.
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|s| s.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Errors raised while driving an external engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Interrupted during {0}")]
    Interrupted(String),

    #[error("No typesetter found on PATH (tried: {0})")]
    TypesetterNotFound(String),
}

/// Trait for static-site generators.
pub trait SiteGenerator: Send + Sync {
    /// Generator identifier (e.g., "jupyter-book")
    fn name(&self) -> &'static str;

    /// Command that fully rebuilds `request.variant` rooted at `request.root`.
    ///
    /// The command must not reuse caches from previous builds.
    fn command(&self, request: &BuildRequest<'_>) -> CommandSpec;
}

/// Trait for document typesetters turning LaTeX sources into a PDF.
pub trait Typesetter: Send + Sync {
    /// Typesetter identifier (e.g., "tectonic")
    fn name(&self) -> &'static str;

    /// Command that compiles `main_tex` inside `latex_dir`.
    fn command(&self, latex_dir: &Path, main_tex: &Path) -> CommandSpec;
}
