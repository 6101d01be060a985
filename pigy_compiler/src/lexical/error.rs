use super::stack::StateTag;
use crate::logging::codes;
use crate::sink::SinkError;
use crate::utils::Position;

/// Lexical analysis errors
#[derive(Debug, thiserror::Error)]
pub enum LexerError {
    /// Normal termination; the driver swallows it
    #[error("end of input")]
    EndOfInput,

    #[error("failed to read input at {position}: {source}")]
    Io {
        position: Position,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid UTF-8 sequence at byte offset {offset}")]
    InvalidEncoding { offset: usize },

    #[error("context stack underflow leaving {state} state")]
    StackUnderflow { state: StateTag },

    #[error("context stack overflow: depth {depth} exceeds maximum {max}")]
    StackOverflow { depth: usize, max: usize },

    #[error("lexer halted at {position}: {lexeme}")]
    Halted { lexeme: String, position: Position },

    #[error("too many tokens: more than {max}")]
    TooManyTokens { max: usize },

    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::EndOfInput => codes::success::TOKENIZATION_COMPLETE,
            LexerError::Io { .. } => codes::lexical::INPUT_READ_FAILURE,
            LexerError::InvalidEncoding { .. } => codes::lexical::INVALID_ENCODING,
            LexerError::StackUnderflow { .. } => codes::lexical::STACK_UNDERFLOW,
            LexerError::StackOverflow { .. } => codes::lexical::STACK_OVERFLOW,
            LexerError::Halted { .. } => codes::lexical::HALTED,
            LexerError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
            LexerError::Sink(e) => e.error_code(),
        }
    }

    pub fn is_end_of_input(&self) -> bool {
        matches!(self, LexerError::EndOfInput)
    }
}
