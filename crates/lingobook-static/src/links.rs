//! Depth correction for download links.
//!
//! The generator renders the PDF download button with a root-relative
//! `href="_static/<pdf>"` on every page, which only resolves for pages at
//! the top of the output. Pages further down need one `../` per level.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::error::BuildError;

/// Relative prefix from a page back to `output_dir` (`""`, `"../"`, `"../../"`, ...).
pub fn depth_prefix(output_dir: &Path, page: &Path) -> String {
    let depth = page
        .parent()
        .and_then(|dir| dir.strip_prefix(output_dir).ok())
        .map_or(0, |rel| rel.components().count());
    "../".repeat(depth)
}

/// Rewrite the anchor in a single page's markup.
///
/// Returns `None` when the page has nothing to rewrite.
pub fn rewrite_anchor(html: &str, prefix: &str, static_dir: &str, asset: &str) -> Option<String> {
    if prefix.is_empty() {
        return None;
    }
    let anchor = format!("href=\"{static_dir}/{asset}\"");
    if !html.contains(&anchor) {
        return None;
    }
    let fixed = format!("href=\"{prefix}{static_dir}/{asset}\"");
    Some(html.replace(&anchor, &fixed))
}

/// Fix download links to `asset` in every HTML page under `output_dir`.
///
/// Idempotent: rewritten anchors are no longer root-relative and are left
/// alone on later runs. Returns the number of pages rewritten.
pub fn fix_download_links(
    output_dir: &Path,
    static_dir: &str,
    asset: &str,
) -> Result<usize, BuildError> {
    let pages: Vec<PathBuf> = WalkDir::new(output_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("html"))
        .collect();

    let results: Vec<Result<bool, BuildError>> = pages
        .par_iter()
        .map(|page| fix_page(output_dir, page, static_dir, asset))
        .collect();

    let mut fixed = 0;
    for result in results {
        if result? {
            fixed += 1;
        }
    }

    if fixed > 0 {
        tracing::debug!("Fixed {} links to {} in {}", fixed, asset, output_dir.display());
    }
    Ok(fixed)
}

fn fix_page(output_dir: &Path, page: &Path, static_dir: &str, asset: &str) -> Result<bool, BuildError> {
    let prefix = depth_prefix(output_dir, page);
    if prefix.is_empty() {
        return Ok(false);
    }

    let html = match fs::read_to_string(page) {
        Ok(html) => html,
        Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
            tracing::debug!("Skipping non UTF-8 page {}", page.display());
            return Ok(false);
        }
        Err(e) => return Err(BuildError::io(page, e)),
    };

    match rewrite_anchor(&html, &prefix, static_dir, asset) {
        Some(fixed) => {
            fs::write(page, fixed).map_err(|e| BuildError::io(page, e))?;
            Ok(true)
        }
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    const PAGE: &str = r#"<a class="btn" href="_static/teachbook_en.pdf">PDF</a><a href="_static/other.pdf">x</a>"#;

    #[test]
    fn prefix_matches_depth() {
        let root = Path::new("/site/en");

        assert_eq!(depth_prefix(root, &root.join("intro.html")), "");
        assert_eq!(depth_prefix(root, &root.join("part/one.html")), "../");
        assert_eq!(depth_prefix(root, &root.join("a/b/c/page.html")), "../../../");
    }

    #[test]
    fn rewrites_only_the_exact_anchor() {
        let fixed = rewrite_anchor(PAGE, "../../", "_static", "teachbook_en.pdf").unwrap();

        assert_eq!(
            fixed,
            r#"<a class="btn" href="../../_static/teachbook_en.pdf">PDF</a><a href="_static/other.pdf">x</a>"#
        );
    }

    #[test]
    fn root_pages_are_untouched() {
        assert_eq!(rewrite_anchor(PAGE, "", "_static", "teachbook_en.pdf"), None);
    }

    #[test]
    fn fixes_pages_at_every_depth_once() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("en");
        fs::create_dir_all(out.join("part/deep")).unwrap();
        fs::write(out.join("intro.html"), PAGE).unwrap();
        fs::write(out.join("part/one.html"), PAGE).unwrap();
        fs::write(out.join("part/deep/two.html"), PAGE).unwrap();
        fs::write(out.join("part/notes.txt"), PAGE).unwrap();

        let fixed = fix_download_links(&out, "_static", "teachbook_en.pdf").unwrap();
        let again = fix_download_links(&out, "_static", "teachbook_en.pdf").unwrap();

        assert_eq!(fixed, 2);
        assert_eq!(again, 0);
        assert_eq!(fs::read_to_string(out.join("intro.html")).unwrap(), PAGE);
        assert!(fs::read_to_string(out.join("part/one.html"))
            .unwrap()
            .contains(r#"href="../_static/teachbook_en.pdf""#));
        assert!(fs::read_to_string(out.join("part/deep/two.html"))
            .unwrap()
            .contains(r#"href="../../_static/teachbook_en.pdf""#));
        assert_eq!(fs::read_to_string(out.join("part/notes.txt")).unwrap(), PAGE);
    }
}
