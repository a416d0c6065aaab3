//! LaTeX typesetters.
//!
//! Detection order follows what produces a PDF with the least setup:
//! tectonic fetches packages on demand, the generator's Makefile drives a
//! local TeX install, and latexmk is the last resort.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::traits::{CommandSpec, EngineError, Typesetter};

/// A typesetting tool found on PATH.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LatexEngine {
    Tectonic(PathBuf),
    Make(PathBuf),
    Latexmk(PathBuf),
}

const CANDIDATES: &[&str] = &["tectonic", "make", "latexmk"];

impl LatexEngine {
    fn from_name(name: &str, path: PathBuf) -> Option<Self> {
        match name {
            "tectonic" => Some(LatexEngine::Tectonic(path)),
            "make" => Some(LatexEngine::Make(path)),
            "latexmk" => Some(LatexEngine::Latexmk(path)),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LatexEngine::Tectonic(_) => "tectonic",
            LatexEngine::Make(_) => "make",
            LatexEngine::Latexmk(_) => "latexmk",
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            LatexEngine::Tectonic(p) | LatexEngine::Make(p) | LatexEngine::Latexmk(p) => p,
        }
    }
}

/// Typesetter backed by a detected [`LatexEngine`].
#[derive(Debug, Clone)]
pub struct LatexTypesetter {
    engine: LatexEngine,
}

impl LatexTypesetter {
    pub fn new(engine: LatexEngine) -> Self {
        Self { engine }
    }

    /// Find a typesetter on PATH, honoring `preferred` when given.
    pub fn detect(preferred: Option<&str>) -> Result<Self, EngineError> {
        let candidates: Vec<&str> = match preferred {
            Some(name) => vec![name],
            None => CANDIDATES.to_vec(),
        };

        for name in &candidates {
            if let Ok(path) = which::which(name) {
                if let Some(engine) = LatexEngine::from_name(name, path) {
                    tracing::debug!("Using {} at {}", engine.name(), engine.path().display());
                    return Ok(Self::new(engine));
                }
            }
        }

        Err(EngineError::TypesetterNotFound(candidates.join(", ")))
    }

    pub fn engine(&self) -> &LatexEngine {
        &self.engine
    }
}

impl Typesetter for LatexTypesetter {
    fn name(&self) -> &'static str {
        self.engine.name()
    }

    fn command(&self, latex_dir: &Path, main_tex: &Path) -> CommandSpec {
        let spec = CommandSpec::new(self.engine.path(), latex_dir);
        match &self.engine {
            LatexEngine::Tectonic(_) => spec.args(["-X", "compile"]).arg(main_tex),
            LatexEngine::Make(_) => spec,
            LatexEngine::Latexmk(_) => spec
                .args(["-pdf", "-f", "-interaction=nonstopmode"])
                .arg(main_tex),
        }
    }
}

/// First `.tex` file (by name) directly inside `latex_dir`.
pub fn find_main_tex(latex_dir: &Path) -> io::Result<Option<PathBuf>> {
    first_with_extension(latex_dir, "tex")
}

/// First `.pdf` file (by name) directly inside `latex_dir`.
pub fn find_pdf(latex_dir: &Path) -> io::Result<Option<PathBuf>> {
    first_with_extension(latex_dir, "pdf")
}

fn first_with_extension(dir: &Path, ext: &str) -> io::Result<Option<PathBuf>> {
    let mut matches: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().and_then(|e| e.to_str()) == Some(ext))
        .collect();
    matches.sort();
    Ok(matches.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn tectonic_compiles_main_file() {
        let typesetter = LatexTypesetter::new(LatexEngine::Tectonic(PathBuf::from("/usr/bin/tectonic")));

        let spec = typesetter.command(Path::new("/b/_build/latex"), Path::new("book.tex"));

        assert_eq!(spec.display(), "/usr/bin/tectonic -X compile book.tex");
        assert_eq!(spec.cwd, Path::new("/b/_build/latex"));
    }

    #[test]
    fn make_runs_without_arguments() {
        let typesetter = LatexTypesetter::new(LatexEngine::Make(PathBuf::from("make")));

        let spec = typesetter.command(Path::new("latex"), Path::new("book.tex"));

        assert!(spec.args.is_empty());
        assert_eq!(typesetter.name(), "make");
    }

    #[test]
    fn latexmk_runs_non_interactive() {
        let typesetter = LatexTypesetter::new(LatexEngine::Latexmk(PathBuf::from("latexmk")));

        let spec = typesetter.command(Path::new("latex"), Path::new("book.tex"));

        assert_eq!(spec.display(), "latexmk -pdf -f -interaction=nonstopmode book.tex");
    }

    #[test]
    fn unknown_preferred_engine_is_not_found() {
        let err = LatexTypesetter::detect(Some("lingobook-no-such-tex")).unwrap_err();

        assert!(matches!(err, EngineError::TypesetterNotFound(_)));
    }

    #[test]
    fn finds_first_tex_and_pdf_by_name() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("zeta.tex"), "").unwrap();
        fs::write(temp.path().join("alpha.tex"), "").unwrap();
        fs::write(temp.path().join("alpha.aux"), "").unwrap();

        assert_eq!(
            find_main_tex(temp.path()).unwrap(),
            Some(temp.path().join("alpha.tex"))
        );
        assert_eq!(find_pdf(temp.path()).unwrap(), None);
    }
}
