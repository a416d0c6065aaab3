//! Root redirect for multi-language output.

use std::fs;
use std::path::{Path, PathBuf};

use minijinja::{context, Environment};

use crate::error::BuildError;

/// Render the redirect document pointing at `<code>/<entry_page>`.
pub fn render_redirect(code: &str, entry_page: &str) -> Result<String, BuildError> {
    let target = format!("{}/{}", code, entry_page.trim_start_matches('/'));
    let env = Environment::new();

    // Rendered from an unnamed source so the target is not HTML-escaped
    env.render_str(
        REDIRECT_TEMPLATE,
        context! {
            target => target,
            language => code,
        },
    )
    .map_err(|e| BuildError::Template(e.to_string()))
}

/// Write `index.html` at the output root, replacing any existing one.
pub fn write_redirect(
    output_root: &Path,
    code: &str,
    entry_page: &str,
) -> Result<PathBuf, BuildError> {
    let html = render_redirect(code, entry_page)?;

    fs::create_dir_all(output_root).map_err(|e| BuildError::io(output_root, e))?;
    let index = output_root.join("index.html");
    fs::write(&index, html).map_err(|e| BuildError::io(&index, e))?;

    tracing::info!("Redirecting {} to {}/{}", index.display(), code, entry_page);
    Ok(index)
}

const REDIRECT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="{{ language }}">
<head>
  <meta charset="utf-8">
  <title>Redirecting...</title>
  <meta http-equiv="refresh" content="0; url={{ target }}">
  <link rel="canonical" href="{{ target }}">
  <script>window.location.href = "{{ target }}";</script>
</head>
<body>
  <p>Redirecting to <a href="{{ target }}">{{ target }}</a>.</p>
</body>
</html>
"#;
