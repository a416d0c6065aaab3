//! Static-asset tree copying and merging.
//!
//! [`merge`] is the additive, last-writer-wins merge used to converge every
//! variant's assets on one shared tree. It never deletes a destination entry
//! and never fails as a whole: files that cannot be written are logged and
//! skipped. [`copy_tree`] is its strict sibling for freshly created
//! directories, where any failure is an error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::error::BuildError;

/// Outcome of a [`merge`].
#[derive(Debug, Default)]
pub struct MergeReport {
    /// Number of files written to the destination
    pub copied: usize,

    /// Destination files that could not be written
    pub skipped: Vec<PathBuf>,
}

impl MergeReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Merge every file under `source` into `dest`.
///
/// Mirrors the directory structure, copies files with their permissions and
/// modification times, overwrites same-path files and leaves everything else
/// in `dest` alone. Safe to call repeatedly and from concurrent callers.
pub fn merge(source: &Path, dest: &Path) -> MergeReport {
    let mut report = MergeReport::default();

    if !source.is_dir() {
        tracing::debug!("Nothing to merge from {}", source.display());
        return report;
    }
    if same_dir(source, dest) {
        return report;
    }

    let skipped = Mutex::new(Vec::new());
    let files = collect_files(source, dest, |dir| {
        if let Err(e) = fs::create_dir_all(dir) {
            tracing::warn!("Failed to create {}: {}", dir.display(), e);
        }
    });

    let copied = files
        .par_iter()
        .filter(|(src, dst)| match copy_file(src, dst) {
            Ok(()) => true,
            Err(e) => {
                let err = BuildError::AssetCopyFailure {
                    path: dst.clone(),
                    source: e,
                };
                tracing::warn!("Skipping asset: {}", err);
                if let Ok(mut skipped) = skipped.lock() {
                    skipped.push(dst.clone());
                }
                false
            }
        })
        .count();

    report.copied = copied;
    report.skipped = skipped.into_inner().unwrap_or_default();
    report.skipped.sort();

    tracing::debug!(
        "Merged {} files from {} into {} ({} skipped)",
        report.copied,
        source.display(),
        dest.display(),
        report.skipped.len()
    );

    report
}

/// Copy the tree under `source` into `dest`, failing on the first error.
///
/// Returns the number of files copied.
pub fn copy_tree(source: &Path, dest: &Path) -> Result<usize, BuildError> {
    if !source.is_dir() {
        return Err(BuildError::io(
            source,
            io::Error::new(io::ErrorKind::NotFound, "source directory not found"),
        ));
    }

    fs::create_dir_all(dest).map_err(|e| BuildError::io(dest, e))?;

    let mut count = 0;
    for entry in WalkDir::new(source).min_depth(1).follow_links(true) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source).to_path_buf();
            BuildError::io(path, io::Error::other(e))
        })?;

        let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| BuildError::io(&target, e))?;
        } else {
            copy_file(entry.path(), &target).map_err(|e| BuildError::AssetCopyFailure {
                path: target.clone(),
                source: e,
            })?;
            count += 1;
        }
    }

    Ok(count)
}

/// Copy one file, preserving permissions and timestamps.
///
/// The copy is staged in a temporary file beside `dest` and renamed over
/// it, so concurrent writers never interleave: the last rename wins whole.
pub(crate) fn copy_file(source: &Path, dest: &Path) -> io::Result<()> {
    let parent = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let meta = fs::metadata(source)?;
    let mut staged = tempfile::NamedTempFile::new_in(parent)?;
    io::copy(&mut fs::File::open(source)?, staged.as_file_mut())?;
    staged.as_file().set_permissions(meta.permissions())?;

    let atime = filetime::FileTime::from_last_access_time(&meta);
    let mtime = filetime::FileTime::from_last_modification_time(&meta);
    filetime::set_file_times(staged.path(), atime, mtime)?;

    staged.persist(dest).map_err(|e| e.error)?;
    Ok(())
}

/// Walk `source`, creating mirrored directories and collecting file pairs.
///
/// A `dest` nested inside `source` is not descended into.
fn collect_files(
    source: &Path,
    dest: &Path,
    mut on_dir: impl FnMut(&Path),
) -> Vec<(PathBuf, PathBuf)> {
    let dest_canonical = fs::canonicalize(dest).ok();
    let mut files = Vec::new();

    on_dir(dest);

    let walker = WalkDir::new(source)
        .min_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| match &dest_canonical {
            Some(d) => fs::canonicalize(e.path()).map_or(true, |p| &p != d),
            None => true,
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable asset entry: {}", e);
                continue;
            }
        };

        let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            on_dir(&target);
        } else {
            files.push((entry.path().to_path_buf(), target));
        }
    }

    files
}

/// Whether two paths name the same existing directory.
pub(crate) fn same_dir(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
