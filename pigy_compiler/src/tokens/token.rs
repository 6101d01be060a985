//! Token types emitted by the lexical analyzer
use crate::grammar::keywords::Keyword;
use serde::{Deserialize, Serialize};
use std::fmt;

/// First id past the single-character range
pub const STRUCTURAL_BASE: u32 = 256;

/// Payload carried by the end-of-input token
pub const EOF_PAYLOAD: &str = "EOF";

/// Prefix of the payload of an unclassifiable identifier
pub const ERROR_PREFIX: &str = "ERR: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenCategory {
    /// Single raw character; its id is the code point
    Char(char),

    DoubleSlash,
    SlashStar,
    StarSlash,
    Percent,
    CommentLine,
    Instruction,
    Eof,
    RulePattern,
    BlockStart,
    ActionText,
    BlockEnd,

    Keyword(Keyword),

    /// Identifier found in the declared-token registry
    DeclaredToken,
    /// Identifier found in the declared-state registry
    DeclaredState,
    /// Identifier the classifier could not resolve
    Error,
}

impl TokenCategory {
    /// Numeric id as seen by a downstream consumer
    pub fn id(&self) -> u32 {
        match self {
            Self::Char(c) => *c as u32,
            Self::DoubleSlash => STRUCTURAL_BASE,
            Self::SlashStar => STRUCTURAL_BASE + 1,
            Self::StarSlash => STRUCTURAL_BASE + 2,
            Self::Percent => STRUCTURAL_BASE + 3,
            Self::CommentLine => STRUCTURAL_BASE + 4,
            Self::Instruction => STRUCTURAL_BASE + 5,
            Self::Eof => STRUCTURAL_BASE + 6,
            Self::RulePattern => STRUCTURAL_BASE + 7,
            Self::BlockStart => STRUCTURAL_BASE + 8,
            // 265 is reserved for whole action blocks
            Self::ActionText => STRUCTURAL_BASE + 10,
            Self::BlockEnd => STRUCTURAL_BASE + 11,
            Self::Keyword(k) => k.token_id(),
            Self::DeclaredToken => 274,
            Self::DeclaredState => 275,
            Self::Error => 276,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Char(_) => "char",
            Self::DoubleSlash => "double_slash",
            Self::SlashStar => "slash_star",
            Self::StarSlash => "star_slash",
            Self::Percent => "percent",
            Self::CommentLine => "comment_line",
            Self::Instruction => "instruction",
            Self::Eof => "eof",
            Self::RulePattern => "rule_pattern",
            Self::BlockStart => "block_start",
            Self::ActionText => "action_text",
            Self::BlockEnd => "block_end",
            Self::Keyword(_) => "keyword",
            Self::DeclaredToken => "declared_token",
            Self::DeclaredState => "declared_state",
            Self::Error => "error",
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(
            self,
            Self::CommentLine | Self::StarSlash | Self::DoubleSlash | Self::SlashStar
        )
    }
}

/// A fully formed token. Immutable once emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub category: TokenCategory,
    pub literal: Option<char>,
    pub payload: String,
}

impl Token {
    pub fn new(category: TokenCategory, payload: impl Into<String>) -> Self {
        Self {
            category,
            literal: None,
            payload: payload.into(),
        }
    }

    /// Single raw character token
    pub fn raw(c: char) -> Self {
        Self {
            category: TokenCategory::Char(c),
            literal: Some(c),
            payload: c.to_string(),
        }
    }

    pub fn eof() -> Self {
        Self::new(TokenCategory::Eof, EOF_PAYLOAD)
    }

    /// Error token for an identifier no table or registry knows
    pub fn unclassified(word: &str) -> Self {
        Self::new(TokenCategory::Error, format!("{}{}", ERROR_PREFIX, word))
    }

    /// Attach the character that terminated or formed this token
    pub fn with_literal(mut self, c: char) -> Self {
        self.literal = Some(c);
        self
    }

    pub fn id(&self) -> u32 {
        self.category.id()
    }

    pub fn is_eof(&self) -> bool {
        self.category == TokenCategory::Eof
    }

    pub fn is_error(&self) -> bool {
        self.category == TokenCategory::Error
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}: {}]", self.id(), self.payload)
    }
}
