//! User declared symbol registries
//!
//! `%token` and `%state` directives grow these lists while the grammar is
//! being read; the classifier consults them for every identifier that is not
//! a reserved keyword.

pub mod registry;

pub use registry::{Registries, SymbolKind, DEFAULT_STATE};
