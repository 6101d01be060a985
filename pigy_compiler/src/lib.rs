// Internal modules
pub mod config;
pub mod file_processor;
pub mod grammar;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod sink;
pub mod symbols;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use lexical::{tokenize, tokenize_str, LexerError, TokenizeOutcome};
pub use pipeline::{PipelineError, PipelineResult};
pub use sink::{TokenConsumer, TokenEmitter};
pub use tokens::{Token, TokenCategory, TokenStream};
