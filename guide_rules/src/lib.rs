//! # Guide Rules
//!
//! The static side of the contextual assistant: lookup tables that turn a
//! location path into a context tag and an external role identifier into a
//! presentation role, the content catalog that names what to play for each
//! pair, and the configuration that assembles them.
//!
//! This crate holds no session state and performs no persistence; the engine
//! lives in `guide_core`.

pub mod catalog;
pub mod config;
pub mod context_table;
pub mod error;
pub mod role_table;
pub mod tags;

pub use catalog::*;
pub use config::*;
pub use context_table::*;
pub use error::*;
pub use role_table::*;
pub use tags::*;
