//! Per-variant build workspaces.

use std::fs;
use std::path::{Path, PathBuf};

use lingobook_lang::{LanguageVariant, CONFIG_FILE, TOC_FILE};

use crate::assets::{copy_file, copy_tree};
use crate::error::BuildError;
use crate::layout::BookLayout;

/// An isolated project directory for building exactly one variant.
///
/// Workspaces of localized variants are owned: the directory is removed
/// when the workspace is dropped, whichever way the build ended. The
/// default variant builds in the book directory itself, which is never
/// removed.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    variant: LanguageVariant,
    owned: bool,
}

impl Workspace {
    /// Project root the generator runs in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn variant(&self) -> &LanguageVariant {
        &self.variant
    }

    /// Whether this workspace is a disposable copy (as opposed to the book itself).
    pub fn is_isolated(&self) -> bool {
        self.owned
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if !self.owned || !self.root.exists() {
            return;
        }
        match fs::remove_dir_all(&self.root) {
            Ok(()) => tracing::debug!("Removed workspace {}", self.root.display()),
            Err(e) => tracing::warn!("Failed to remove workspace {}: {}", self.root.display(), e),
        }
    }
}

/// Builds workspaces from a book layout.
pub struct Stager<'a> {
    layout: &'a BookLayout,
}

impl<'a> Stager<'a> {
    pub fn new(layout: &'a BookLayout) -> Self {
        Self { layout }
    }

    /// Prepare the workspace for `variant`.
    ///
    /// For a localized variant this creates `<workspace_dir>/temp_build_<code>`
    /// (replacing any stale leftover) holding:
    /// - the variant's content nested under `<code>/`, so relative links keep working
    /// - a copy of the book's static assets
    /// - the variant's config and toc under their canonical names
    pub fn stage(&self, variant: &LanguageVariant) -> Result<Workspace, BuildError> {
        if variant.is_default {
            return Ok(Workspace {
                root: self.layout.book_dir.clone(),
                variant: variant.clone(),
                owned: false,
            });
        }

        if !variant.content_dir.is_dir() {
            return Err(BuildError::ContentMissing {
                code: variant.code.clone(),
                path: variant.content_dir.clone(),
            });
        }

        let root = self.layout.workspace_root(variant);
        if root.exists() {
            tracing::debug!("Removing stale workspace {}", root.display());
            fs::remove_dir_all(&root).map_err(|e| BuildError::io(&root, e))?;
        }
        fs::create_dir_all(&root).map_err(|e| BuildError::io(&root, e))?;

        // From here on the directory is cleaned up on every exit path
        let workspace = Workspace {
            root,
            variant: variant.clone(),
            owned: true,
        };

        let files = copy_tree(&variant.content_dir, &workspace.root.join(&variant.code))?;
        tracing::debug!("Staged {} content files for {}", files, variant.code);

        let static_source = self.layout.static_source();
        if static_source.is_dir() {
            copy_tree(&static_source, &workspace.root.join(&self.layout.static_dir))?;
        }

        for (source, canonical) in [(&variant.config_file, CONFIG_FILE), (&variant.toc_file, TOC_FILE)] {
            let target = workspace.root.join(canonical);
            copy_file(source, &target).map_err(|e| BuildError::io(source, e))?;
        }

        Ok(workspace)
    }
}
