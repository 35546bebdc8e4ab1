#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! Template expansion core: turns one source template into one generated file
//! per filter property file.
//!
//! # Design
//! - `BatchRunner` validates the whole run before any IO, then runs each
//!   `TemplateJob` in order and stops at the first error.
//! - Per filter file: build a `PropertyBag`, expand the output name, expand
//!   the content, normalise line endings, write.
//! - Single-threaded and synchronous; nothing is shared between jobs.

pub mod batch;
pub mod error;
pub mod expand;
pub mod job;
pub mod line_ending;
pub mod properties;

pub use batch::{BatchReport, BatchRunner};
pub use error::{EngineError, EngineResult};
pub use expand::{Expander, NameExpander, UnresolvedKey};
pub use job::{ExpansionResult, TemplateJob, TemplateReport};
pub use line_ending::normalize_line_endings;
pub use properties::{PropertyBag, PropertyBagBuilder, base_name, extension};
