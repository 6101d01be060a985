//! Comment interception and the comment states
//!
//! `/` and `#` can open a comment from any line-oriented state. The
//! interrupted frame stays on the stack untouched and is resumed once the
//! comment closes.

use super::analyzer::LexicalAnalyzer;
use super::error::LexerError;
use super::stack::{Frame, StateTag};
use crate::sink::TokenEmitter;
use crate::tokens::{Token, TokenCategory};
use std::io::BufRead;

impl<R: BufRead, E: TokenEmitter> LexicalAnalyzer<R, E> {
    /// Returns true when `c` opened a comment context
    pub(super) fn intercept_comment(&mut self, c: char) -> Result<bool, LexerError> {
        match c {
            '/' => self
                .stack
                .push(Frame::with_lexeme(StateTag::SlashAmbiguous, "/"))?,
            '#' => self
                .stack
                .push(Frame::with_lexeme(StateTag::LineComment, "#"))?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    pub(super) fn slash_ambiguous(&mut self, c: char) -> Result<(), LexerError> {
        match c {
            '/' => {
                self.stack.replace(Frame::with_lexeme(StateTag::LineComment, "//"));
            }
            '*' => {
                self.stack.replace(Frame::with_lexeme(StateTag::BlockComment, "/*"));
            }
            ' ' | '\t' => {}
            c => {
                // Not a comment: the slash belongs to the interrupted frame,
                // and `c` is read again in that frame's context.
                self.stack.pop()?;
                let resumed = self.stack.top_tag();
                self.dispatch(resumed, '/')?;
                self.cursor.replay(c);
            }
        }
        Ok(())
    }

    pub(super) fn block_comment(&mut self, c: char) -> Result<(), LexerError> {
        self.stack.push_char(c);
        if c == '*' {
            let run = self.stack.lexeme().to_string();
            self.stack.push(Frame::with_lexeme(StateTag::StarRun, run))?;
        }
        Ok(())
    }

    pub(super) fn star_run(&mut self, c: char) -> Result<(), LexerError> {
        match c {
            '/' => {
                let mut text = self.stack.take_lexeme();
                text.push('/');
                self.emit(Token::new(TokenCategory::StarSlash, text))?;
                self.stack.pop()?;
                self.stack.pop()?;
            }
            '*' => self.stack.push_char(c),
            c => {
                let mut text = self.stack.take_lexeme();
                text.push(c);
                self.stack.pop()?;
                self.stack.set_lexeme(text);
            }
        }
        Ok(())
    }

    pub(super) fn line_comment(&mut self, c: char) -> Result<(), LexerError> {
        match c {
            '\r' => {}
            '\n' => {
                self.cursor.reset_column();
                let text = self.stack.take_lexeme();
                self.emit(Token::new(TokenCategory::CommentLine, text))?;
                self.stack.pop()?;
                // the interrupted state still needs to see the end of line
                self.cursor.replay('\n');
            }
            c => self.stack.push_char(c),
        }
        Ok(())
    }
}
