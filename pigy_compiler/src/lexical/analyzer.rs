//! Lexical analyzer core: owns the cursor, context stack, registries and
//! token emitter, and drives the state handlers one character at a time.

use super::cursor::CharCursor;
use super::error::LexerError;
use super::stack::{ContextStack, StateTag};
use crate::config::compile_time::lexical::MAX_LEXEME_LENGTH;
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::sink::TokenEmitter;
use crate::symbols::Registries;
use crate::tokens::{Token, TokenCategory};
use crate::{log_debug, log_error, log_success};
use serde::Serialize;
use std::io::BufRead;

/// Counters collected over one run
#[derive(Debug, Default, Clone, Serialize)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub characters_read: usize,
    pub max_stack_depth: usize,

    pub raw_chars: usize,
    pub comments: usize,
    pub directives: usize,
    pub rule_patterns: usize,
    pub action_blocks: usize,
    pub action_text: usize,
    pub keywords: usize,
    pub declared_token_hits: usize,
    pub declared_state_hits: usize,
    pub classifier_errors: usize,
}

impl LexicalMetrics {
    pub(crate) fn record_token(&mut self, token: &Token, preferences: &LexicalPreferences) {
        self.total_tokens += 1;

        if !preferences.collect_detailed_metrics {
            return;
        }

        match token.category {
            TokenCategory::Char(_) => self.raw_chars += 1,
            TokenCategory::CommentLine | TokenCategory::StarSlash => self.comments += 1,
            TokenCategory::Instruction => self.directives += 1,
            TokenCategory::RulePattern => self.rule_patterns += 1,
            TokenCategory::BlockStart => self.action_blocks += 1,
            TokenCategory::ActionText => self.action_text += 1,
            TokenCategory::Keyword(_) => self.keywords += 1,
            TokenCategory::DeclaredToken => self.declared_token_hits += 1,
            TokenCategory::DeclaredState => self.declared_state_hits += 1,
            TokenCategory::Error => self.classifier_errors += 1,
            _ => {}
        }
    }
}

pub struct LexicalAnalyzer<R, E> {
    pub(super) cursor: CharCursor<R>,
    pub(super) stack: ContextStack,
    pub(super) registries: Registries,
    pub(super) emitter: E,
    pub(super) metrics: LexicalMetrics,
    pub(super) preferences: LexicalPreferences,
    announced: Option<StateTag>,
}

impl<R: BufRead, E: TokenEmitter> LexicalAnalyzer<R, E> {
    pub fn new(reader: R, emitter: E) -> Self {
        Self::with_preferences(reader, emitter, LexicalPreferences::default())
    }

    pub fn with_preferences(reader: R, emitter: E, preferences: LexicalPreferences) -> Self {
        Self {
            cursor: CharCursor::new(reader),
            stack: ContextStack::new(StateTag::Preamble),
            registries: Registries::new(),
            emitter,
            metrics: LexicalMetrics::default(),
            preferences,
            announced: None,
        }
    }

    /// Run until end of input or the terminal state. End of input is a
    /// normal stop; every other failure aborts the run.
    pub fn run(&mut self) -> Result<(), LexerError> {
        log_debug!("Starting lexical analysis",
            "max_tokens" => self.preferences.max_token_count,
            "max_lexeme_length" => MAX_LEXEME_LENGTH);

        while !self.stack.finished() {
            match self.step() {
                Ok(()) => {}
                Err(e) if e.is_end_of_input() => break,
                Err(e) => {
                    self.report(&e);
                    return Err(e);
                }
            }
        }

        self.metrics.characters_read = self.cursor.chars_read();
        log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization complete",
            "tokens" => self.metrics.total_tokens,
            "characters" => self.metrics.characters_read,
            "directives" => self.metrics.directives,
            "rule_patterns" => self.metrics.rule_patterns,
            "classifier_errors" => self.metrics.classifier_errors,
            "max_stack_depth" => self.metrics.max_stack_depth);

        Ok(())
    }

    /// Consume one character in the active state
    pub fn step(&mut self) -> Result<(), LexerError> {
        let tag = self.stack.top_tag();
        self.announce(tag);

        match tag {
            StateTag::Error => {
                return Err(LexerError::Halted {
                    lexeme: self.stack.lexeme().to_string(),
                    position: self.cursor.position(),
                })
            }
            StateTag::Finished => return Ok(()),
            _ => {}
        }

        let c = self.next_char()?;
        if tag.intercepts_comments() && self.intercept_comment(c)? {
            self.track_depth();
            return Ok(());
        }

        self.dispatch(tag, c)?;
        self.track_depth();
        self.check_lexeme_length();
        Ok(())
    }

    /// Read the next character; at end of input emit the EOF token first
    pub(super) fn next_char(&mut self) -> Result<char, LexerError> {
        match self.cursor.next_char()? {
            Some(c) => Ok(c),
            None => {
                self.emit(Token::eof())?;
                Err(LexerError::EndOfInput)
            }
        }
    }

    pub(super) fn emit(&mut self, token: Token) -> Result<(), LexerError> {
        let max = self.preferences.max_token_count;
        if !token.is_eof() && self.metrics.total_tokens >= max {
            return Err(LexerError::TooManyTokens { max });
        }

        self.metrics.record_token(&token, &self.preferences);
        if self.preferences.log_token_events {
            log_debug!("Token", "id" => token.id(), "payload" => &token.payload);
        }

        self.emitter.emit(token)?;
        Ok(())
    }

    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn stack(&self) -> &ContextStack {
        &self.stack
    }

    /// Tear down, returning the emitter and what the run learned
    pub fn into_parts(self) -> (E, Registries, LexicalMetrics) {
        (self.emitter, self.registries, self.metrics)
    }

    fn announce(&mut self, tag: StateTag) {
        if self.announced == Some(tag) {
            return;
        }
        self.announced = Some(tag);
        if let Some(banner) = tag.banner() {
            log_debug!(banner, "depth" => self.stack.depth());
        }
    }

    fn track_depth(&mut self) {
        self.metrics.max_stack_depth = self.metrics.max_stack_depth.max(self.stack.depth());
    }

    /// An overlong lexeme sends the active frame to the Error state, which
    /// halts the run on the next step
    fn check_lexeme_length(&mut self) {
        let length = self.stack.lexeme().len();
        if length <= MAX_LEXEME_LENGTH {
            return;
        }

        let state = self.stack.top_tag();
        log_error!(codes::lexical::LEXEME_TOO_LONG, "Pending lexeme exceeds maximum length",
            position = self.cursor.position(),
            "state" => state,
            "length" => length,
            "max" => MAX_LEXEME_LENGTH);

        self.stack.set_top_tag(StateTag::Error);
        self.stack.set_lexeme(format!(
            "lexeme of {} bytes in {} state exceeds maximum of {}",
            length, state, MAX_LEXEME_LENGTH
        ));
    }

    fn report(&self, error: &LexerError) {
        if self.preferences.include_position_in_errors {
            log_error!(error.error_code(), &error.to_string(),
                position = self.cursor.position(),
                "state" => self.stack.top_tag(),
                "depth" => self.stack.depth());
        } else {
            log_error!(error.error_code(), &error.to_string(),
                "state" => self.stack.top_tag());
        }
    }
}
