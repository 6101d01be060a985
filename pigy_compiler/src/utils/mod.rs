//! Shared primitive types used across the lexer, sinks and logging.

pub mod position;

pub use position::Position;
