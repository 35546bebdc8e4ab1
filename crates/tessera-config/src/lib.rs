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

//! Run configuration for the tessera template expander.
//!
//! Layout: `model.rs` (loose documents and the validated plan), `loader.rs`
//! (YAML loading and path resolution), `validate.rs` (the up-front validation
//! pass), `defaults.rs` (default patterns and indicators).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::load_run_config;
pub use model::{
    FilterSet, LineEnding, RunConfig, RunPlan, TemplateConfig, TemplateSpec, UnresolvedPolicy,
};
