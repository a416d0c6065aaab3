//! Moving generator output into the unified output tree.
//!
//! Where the generator puts a variant's pages depends on how it infers the
//! site root: nested under `_build/html/<code>` (mirroring the content
//! layout) or flat in `_build/html`. Both shapes occur, so candidates are
//! probed in order rather than assuming one.

use std::fs;
use std::path::PathBuf;

use lingobook_engines::OutputFormat;

use crate::assets::{copy_tree, merge, same_dir};
use crate::error::BuildError;
use crate::layout::BookLayout;
use crate::workspace::Workspace;

/// Locates and relocates a workspace's HTML output.
pub struct Relocator<'a> {
    layout: &'a BookLayout,
}

impl<'a> Relocator<'a> {
    pub fn new(layout: &'a BookLayout) -> Self {
        Self { layout }
    }

    /// Candidate output directories, in priority order.
    pub fn candidates(&self, workspace: &Workspace) -> Vec<PathBuf> {
        let html = self
            .layout
            .generator_output(workspace.root(), OutputFormat::Html);
        let variant = workspace.variant();

        if variant.is_default {
            vec![html]
        } else {
            vec![html.join(&variant.code), html]
        }
    }

    /// First candidate that exists.
    pub fn locate(&self, workspace: &Workspace) -> Result<PathBuf, BuildError> {
        let candidates = self.candidates(workspace);

        candidates
            .iter()
            .find(|c| c.is_dir())
            .cloned()
            .ok_or_else(|| BuildError::OutputNotFound {
                code: workspace.variant().code.clone(),
                candidates: candidates
                    .iter()
                    .map(|c| c.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// Locate the workspace output and move it to its place in the output tree.
    ///
    /// A localized variant's subdirectory is replaced wholesale. The default
    /// variant's pages are merged into the output root, which is never wiped.
    /// Returns the variant's directory in the output tree.
    pub fn relocate(&self, workspace: &Workspace) -> Result<PathBuf, BuildError> {
        let source = self.locate(workspace)?;
        let variant = workspace.variant();
        let dest = self.layout.variant_output(variant);

        if variant.is_default {
            if same_dir(&source, &dest) {
                tracing::debug!("Output already in place at {}", dest.display());
            } else {
                let report = merge(&source, &dest);
                tracing::debug!("Merged {} default pages into {}", report.copied, dest.display());
            }
            return Ok(dest);
        }

        tracing::info!("Moving {} to {}", source.display(), dest.display());
        if dest.exists() {
            fs::remove_dir_all(&dest).map_err(|e| BuildError::io(&dest, e))?;
        }
        copy_tree(&source, &dest)?;

        Ok(dest)
    }

    /// The generator's own static directory inside the workspace output.
    ///
    /// With nested output this sits beside the relocated pages and would be
    /// lost with the workspace, so it is merged into the shared tree.
    pub fn theme_assets(&self, workspace: &Workspace) -> PathBuf {
        self.layout
            .generator_output(workspace.root(), OutputFormat::Html)
            .join(&self.layout.static_dir)
    }
}
