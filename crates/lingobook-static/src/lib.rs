//! Multi-language book builds.
//!
//! Builds every language variant of a book in its own isolated workspace and
//! composes the results into a single published tree with one shared
//! static-asset directory and a root redirect.

pub mod assets;
pub mod builder;
pub mod error;
pub mod invoker;
pub mod layout;
pub mod links;
pub mod pdf;
pub mod redirect;
pub mod relocate;
pub mod workspace;

#[cfg(test)]
pub(crate) mod testing;

pub use assets::{copy_tree, merge, MergeReport};
pub use builder::{discover_languages, MultiBuilder, Phase, RunReport};
pub use error::BuildError;
pub use invoker::{BuildInvoker, BuildResult};
pub use layout::BookLayout;
pub use links::fix_download_links;
pub use pdf::PdfExporter;
pub use redirect::write_redirect;
pub use relocate::Relocator;
pub use workspace::{Stager, Workspace};
