//! Test doubles for the external engines.

use std::fs;
use std::path::{Path, PathBuf};

use lingobook_engines::{BuildRequest, CommandSpec, SiteGenerator, Typesetter};

/// Generator that writes pages nested under `_build/html/<code>`.
///
/// Fails unless the variant's content was staged under `<code>/`.
pub(crate) const NESTED: &str = r#"set -e
cat "$1/intro.md" > /dev/null
out="_build/$2/$1"
mkdir -p "$out/part" "_build/$2/_static"
printf '<a href="_static/teachbook_%s.pdf">%s</a>' "$1" "$1" > "$out/intro.html"
printf '<a href="_static/teachbook_%s.pdf">%s</a>' "$1" "$1" > "$out/part/one.html"
echo "theme $1" > "_build/$2/_static/theme.css"
"#;

/// Generator that writes pages straight into `_build/html`.
pub(crate) const FLAT: &str = r#"set -e
out="_build/$2"
mkdir -p "$out/part" "$out/_static"
printf '<a href="_static/teachbook_%s.pdf">%s</a>' "$1" "$1" > "$out/intro.html"
printf '<a href="_static/teachbook_%s.pdf">%s</a>' "$1" "$1" > "$out/part/one.html"
echo "theme $1" > "$out/_static/theme.css"
"#;

/// Generator that emits LaTeX sources.
pub(crate) const LATEX: &str = r#"set -e
mkdir -p "_build/$2"
echo "\documentclass{book} % $1" > "_build/$2/book.tex"
"#;

/// Generator that always fails with a diagnostic.
pub(crate) const FAILING: &str = r#"echo "building $1" ; echo "toc error in $1" >&2 ; exit 2"#;

/// Runs a shell script as the site generator.
///
/// The script receives the variant code as `$1` and the output format
/// directory name (`html`, `latex`) as `$2`.
pub(crate) struct ScriptGenerator {
    script: String,
}

impl ScriptGenerator {
    pub(crate) fn new(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
        }
    }
}

impl SiteGenerator for ScriptGenerator {
    fn name(&self) -> &'static str {
        "script"
    }

    fn command(&self, request: &BuildRequest<'_>) -> CommandSpec {
        CommandSpec::new("sh", request.root)
            .arg("-c")
            .arg(&self.script)
            .arg("script")
            .arg(&request.variant.code)
            .arg(request.format.dir_name())
    }
}

/// Typesetter that "compiles" by copying the main file to a PDF.
pub(crate) struct ScriptTypesetter {
    script: String,
}

impl ScriptTypesetter {
    pub(crate) fn copying() -> Self {
        Self {
            script: r#"cp "$1" "${1%.tex}.pdf""#.to_string(),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            script: r#"echo "! Undefined control sequence." ; exit 1"#.to_string(),
        }
    }
}

impl Typesetter for ScriptTypesetter {
    fn name(&self) -> &'static str {
        "script-tex"
    }

    fn command(&self, latex_dir: &Path, main_tex: &Path) -> CommandSpec {
        CommandSpec::new("sh", latex_dir)
            .arg("-c")
            .arg(&self.script)
            .arg("script-tex")
            .arg(main_tex)
    }
}

/// A book with one content directory and config pair per code.
pub(crate) fn book_with(root: &Path, codes: &[&str]) -> PathBuf {
    let book = root.join("book");
    for code in codes {
        fs::create_dir_all(book.join(code)).unwrap();
        fs::write(book.join(code).join("intro.md"), format!("# {code}")).unwrap();
        fs::write(book.join(format!("_config_{code}.yml")), format!("title: {code}")).unwrap();
        fs::write(
            book.join(format!("_toc_{code}.yml")),
            format!("format: jb-book\nroot: {code}/intro\n"),
        )
        .unwrap();
    }
    fs::create_dir_all(book.join("_static")).unwrap();
    fs::write(book.join("_static/custom.js"), "// switcher").unwrap();
    book
}
