//! Preview server command.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use axum::Router;
use tower_http::services::ServeDir;

/// Run the serve command.
///
/// Serves a unified output tree and opens the browser on its landing page:
/// the root language redirect when there is one, otherwise the first
/// language's entry page.
pub async fn run(port: u16, dir: PathBuf, static_dir: &str, entry_page: &str) -> Result<()> {
    if !dir.exists() {
        anyhow::bail!(
            "Directory not found: {}. Run 'lingobook build' first.",
            dir.display()
        );
    }

    let landing = landing_page(&dir, entry_page).with_context(|| {
        format!(
            "No built book in {}. Run 'lingobook build' first.",
            dir.display()
        )
    })?;
    if !dir.join(static_dir).is_dir() {
        tracing::warn!(
            "No shared {} in {}, pages will render without theme assets",
            static_dir,
            dir.display()
        );
    }

    let addr: SocketAddr = format!("127.0.0.1:{}", port)
        .parse()
        .context("Invalid address")?;

    tracing::info!("Serving {} at http://{}", dir.display(), addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    let url = format!("http://{}/{}", addr, landing);
    if let Err(e) = open::that(&url) {
        tracing::debug!("Could not open browser: {}", e);
    }

    axum::serve(listener, router(&dir)).await?;

    Ok(())
}

fn router(dir: &Path) -> Router {
    Router::new().fallback_service(ServeDir::new(dir))
}

/// Page to open first, relative to the served root.
///
/// An empty path means the root `index.html`. Language folders are tried in
/// code order, and underscore folders (`_static`, `_sources`) never count.
pub fn landing_page(dir: &Path, entry_page: &str) -> Option<String> {
    if dir.join("index.html").is_file() {
        return Some(String::new());
    }

    let mut languages: Vec<String> = fs::read_dir(dir)
        .ok()?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|name| !name.starts_with('_') && !name.starts_with('.'))
        .collect();
    languages.sort();

    languages.into_iter().find_map(|code| {
        ["index.html", entry_page]
            .into_iter()
            .find(|page| dir.join(&code).join(page).is_file())
            .map(|page| format!("{code}/{page}"))
    })
}
