//! Word classification inside rule actions

use super::analyzer::LexicalAnalyzer;
use super::error::LexerError;
use crate::grammar::Keyword;
use crate::log_warning;
use crate::logging::codes;
use crate::sink::TokenEmitter;
use crate::symbols::{Registries, SymbolKind};
use crate::tokens::{Token, TokenCategory};
use std::io::BufRead;

/// Resolve `word` against the reserved keywords, then declared tokens, then
/// declared states. Anything else becomes an error token.
pub fn classify(word: &str, registries: &Registries) -> Token {
    if let Some(keyword) = Keyword::from_str(word) {
        return Token::new(TokenCategory::Keyword(keyword), word);
    }

    match registries.resolve(word) {
        Some(SymbolKind::Token) => Token::new(TokenCategory::DeclaredToken, word),
        Some(SymbolKind::State) => Token::new(TokenCategory::DeclaredState, word),
        None => Token::unclassified(word),
    }
}

impl<R: BufRead, E: TokenEmitter> LexicalAnalyzer<R, E> {
    /// Classify and emit the active frame's pending word, if any
    pub(super) fn classify_pending(&mut self) -> Result<(), LexerError> {
        let word = self.stack.take_lexeme();
        if word.is_empty() {
            return Ok(());
        }

        let token = classify(&word, &self.registries);
        if token.is_error() {
            log_warning!(code = codes::lexical::UNCLASSIFIED_IDENTIFIER, "Unclassified identifier",
                position = self.cursor.position(),
                "word" => &word);
        }
        self.emit(token)
    }
}
