//! Context stack of lexing frames
//!
//! The active frame is stored apart from the frames it interrupted, so the
//! stack can never be empty: popping the last frame is reported as an
//! underflow instead.

use super::error::LexerError;
use crate::config::compile_time::lexical::MAX_STACK_DEPTH;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StateTag {
    /// Directive preamble before `%yacc`
    Preamble,
    /// Inside a `%` instruction line
    Directive,
    GrammarRules,
    Action,
    ActionBlock,
    /// After the closing brace of an action block
    ActionEnd,
    /// A `/` that may open a comment
    SlashAmbiguous,
    BlockComment,
    /// One or more `*` inside a block comment
    StarRun,
    LineComment,
    Error,
    Finished,
}

impl StateTag {
    /// States in which `/` and `#` may open a comment
    pub fn intercepts_comments(self) -> bool {
        matches!(
            self,
            StateTag::Preamble
                | StateTag::Directive
                | StateTag::GrammarRules
                | StateTag::Action
                | StateTag::ActionBlock
                | StateTag::ActionEnd
        )
    }

    /// Debug banner printed when the state becomes active
    pub fn banner(self) -> Option<&'static str> {
        match self {
            StateTag::Preamble => Some("=== INITIAL STATE ==="),
            StateTag::Directive => Some("=== INSTRUCTION STATE ==="),
            StateTag::GrammarRules => Some("=== YACC RULES STATE ==="),
            StateTag::Action => Some("=== YACC ACTION STATE ==="),
            StateTag::ActionBlock => Some("=== YACC ACTION BLOCK STATE ==="),
            StateTag::ActionEnd => Some("=== YACC ACTION END STATE ==="),
            StateTag::BlockComment => Some("=== C COMMENT ==="),
            StateTag::LineComment => Some("=== INLINE COMMENT ==="),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StateTag::Preamble => "preamble",
            StateTag::Directive => "directive",
            StateTag::GrammarRules => "grammar-rules",
            StateTag::Action => "action",
            StateTag::ActionBlock => "action-block",
            StateTag::ActionEnd => "action-end",
            StateTag::SlashAmbiguous => "slash",
            StateTag::BlockComment => "block-comment",
            StateTag::StarRun => "star-run",
            StateTag::LineComment => "line-comment",
            StateTag::Error => "error",
            StateTag::Finished => "finished",
        }
    }
}

impl fmt::Display for StateTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One lexing context: a state and the lexeme it is assembling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub tag: StateTag,
    pub lexeme: String,
}

impl Frame {
    pub fn new(tag: StateTag) -> Self {
        Self {
            tag,
            lexeme: String::new(),
        }
    }

    pub fn with_lexeme(tag: StateTag, lexeme: impl Into<String>) -> Self {
        Self {
            tag,
            lexeme: lexeme.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContextStack {
    below: Vec<Frame>,
    top: Frame,
    max_depth: usize,
}

impl ContextStack {
    pub fn new(initial: StateTag) -> Self {
        Self::with_max_depth(initial, MAX_STACK_DEPTH)
    }

    pub fn with_max_depth(initial: StateTag, max_depth: usize) -> Self {
        Self {
            below: Vec::new(),
            top: Frame::new(initial),
            max_depth,
        }
    }

    pub fn depth(&self) -> usize {
        self.below.len() + 1
    }

    pub fn push(&mut self, frame: Frame) -> Result<(), LexerError> {
        if self.depth() >= self.max_depth {
            return Err(LexerError::StackOverflow {
                depth: self.depth() + 1,
                max: self.max_depth,
            });
        }
        let interrupted = std::mem::replace(&mut self.top, frame);
        self.below.push(interrupted);
        Ok(())
    }

    /// Remove the active frame and resume the one beneath it
    pub fn pop(&mut self) -> Result<Frame, LexerError> {
        match self.below.pop() {
            Some(resumed) => Ok(std::mem::replace(&mut self.top, resumed)),
            None => Err(LexerError::StackUnderflow {
                state: self.top.tag,
            }),
        }
    }

    /// Same-level transition: the active frame is discarded for `frame`
    pub fn replace(&mut self, frame: Frame) -> Frame {
        std::mem::replace(&mut self.top, frame)
    }

    pub fn top(&self) -> &Frame {
        &self.top
    }

    pub fn top_tag(&self) -> StateTag {
        self.top.tag
    }

    pub fn set_top_tag(&mut self, tag: StateTag) {
        self.top.tag = tag;
    }

    pub fn lexeme(&self) -> &str {
        &self.top.lexeme
    }

    pub fn set_lexeme(&mut self, lexeme: String) {
        self.top.lexeme = lexeme;
    }

    pub fn push_char(&mut self, c: char) {
        self.top.lexeme.push(c);
    }

    /// Take the pending lexeme, leaving it empty
    pub fn take_lexeme(&mut self) -> String {
        std::mem::take(&mut self.top.lexeme)
    }

    pub fn clear_lexeme(&mut self) {
        self.top.lexeme.clear();
    }

    pub fn finished(&self) -> bool {
        self.top.tag == StateTag::Finished
    }

    /// Tags from bottom to top
    pub fn tags(&self) -> Vec<StateTag> {
        self.below
            .iter()
            .chain(std::iter::once(&self.top))
            .map(|f| f.tag)
            .collect()
    }
}
