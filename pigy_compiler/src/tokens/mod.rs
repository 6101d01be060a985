//! Token system for PigYacc lexical analysis
//!
//! Every token is a category plus a text payload. Categories map onto a
//! numeric id space shared with downstream generators:
//!
//! - `0..=255` and beyond for single raw characters (the code point itself)
//! - `256..=267` for structural tokens (comments, directives, rule parts)
//! - `268..=273` for the reserved keywords
//! - `274`, `275` for user declared tokens and states
//! - `276` for identifiers nothing could classify

pub mod token;
pub mod token_stream;

pub use token::{Token, TokenCategory, EOF_PAYLOAD, ERROR_PREFIX, STRUCTURAL_BASE};
pub use token_stream::TokenStream;
