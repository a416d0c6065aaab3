//! External engines driven by lingobook.
//!
//! The site generator and the typesetter are black boxes run as
//! subprocesses. This crate defines the seams ([`SiteGenerator`],
//! [`Typesetter`]), the stock implementations and the process runner.

pub mod interrupt;
pub mod jupyter;
pub mod latex;
pub mod process;
pub mod traits;

pub use interrupt::InterruptWatch;
pub use jupyter::JupyterBook;
pub use latex::{find_main_tex, find_pdf, LatexEngine, LatexTypesetter};
pub use process::{run, ProcessOutput};
pub use traits::{BuildRequest, CommandSpec, EngineError, OutputFormat, SiteGenerator, Typesetter};
