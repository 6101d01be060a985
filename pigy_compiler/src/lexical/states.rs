//! Per-state character handlers
//!
//! Each handler receives one character already read by the driver (and
//! already offered to the comment interceptor) and applies the state's
//! transition table to the active frame.

use super::analyzer::LexicalAnalyzer;
use super::error::LexerError;
use super::stack::{Frame, StateTag};
use crate::log_debug;
use crate::sink::TokenEmitter;
use crate::tokens::{Token, TokenCategory};
use std::io::BufRead;

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Characters that make up a classifiable word inside actions
pub(super) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl<R: BufRead, E: TokenEmitter> LexicalAnalyzer<R, E> {
    pub(super) fn dispatch(&mut self, tag: StateTag, c: char) -> Result<(), LexerError> {
        match tag {
            StateTag::Preamble => self.preamble(c),
            StateTag::Directive => self.directive(c),
            StateTag::GrammarRules => self.grammar_rules(c),
            StateTag::Action => self.action(c),
            StateTag::ActionBlock => self.action_block(c),
            StateTag::ActionEnd => {
                self.action_end(c);
                Ok(())
            }
            StateTag::SlashAmbiguous => self.slash_ambiguous(c),
            StateTag::BlockComment => self.block_comment(c),
            StateTag::StarRun => self.star_run(c),
            StateTag::LineComment => self.line_comment(c),
            // handled by the driver before a character is read
            StateTag::Error | StateTag::Finished => Ok(()),
        }
    }

    fn preamble(&mut self, c: char) -> Result<(), LexerError> {
        match c {
            '%' if self.cursor.at_line_start() => self.stack.push(Frame::new(StateTag::Directive)),
            '\r' => Ok(()),
            '\n' => {
                self.cursor.reset_column();
                Ok(())
            }
            c if is_blank(c) => Ok(()),
            c => self.emit(Token::raw(c)),
        }
    }

    fn directive(&mut self, c: char) -> Result<(), LexerError> {
        match c {
            '\r' => Ok(()),
            '\n' => {
                self.cursor.reset_column();
                self.run_directive()
            }
            c => {
                self.stack.push_char(c);
                Ok(())
            }
        }
    }

    fn grammar_rules(&mut self, c: char) -> Result<(), LexerError> {
        match c {
            '%' if self.cursor.at_line_start() => self.stack.push(Frame::new(StateTag::Directive)),
            '\r' => Ok(()),
            '\t' | '\n' if !self.stack.lexeme().is_empty() => {
                if c == '\n' {
                    self.cursor.reset_column();
                }
                let pattern = self.stack.take_lexeme();
                self.emit(Token::new(TokenCategory::RulePattern, pattern).with_literal(c))?;
                self.stack.replace(Frame::new(StateTag::Action));
                Ok(())
            }
            '\n' => {
                self.stack.clear_lexeme();
                self.cursor.reset_column();
                Ok(())
            }
            // leading tabs before any pattern text
            '\t' => Ok(()),
            c => {
                self.stack.push_char(c);
                Ok(())
            }
        }
    }

    fn action(&mut self, c: char) -> Result<(), LexerError> {
        match c {
            '\r' => Ok(()),
            '\n' => {
                self.classify_pending()?;
                self.cursor.reset_column();
                self.stack.replace(Frame::new(StateTag::GrammarRules));
                Ok(())
            }
            '{' => {
                self.classify_pending()?;
                self.emit(Token::new(TokenCategory::BlockStart, "{").with_literal('{'))?;
                self.stack.replace(Frame::new(StateTag::ActionBlock));
                Ok(())
            }
            c if is_blank(c) => self.classify_pending(),
            c if is_word_char(c) => {
                self.stack.push_char(c);
                Ok(())
            }
            c => self.action_punctuation(c),
        }
    }

    fn action_block(&mut self, c: char) -> Result<(), LexerError> {
        match c {
            '\r' => Ok(()),
            '\n' => {
                self.cursor.reset_column();
                self.classify_pending()
            }
            '}' => {
                let mut closing = self.stack.take_lexeme();
                closing.push('}');
                self.emit(Token::new(TokenCategory::BlockEnd, closing).with_literal('}'))?;
                self.stack.replace(Frame::new(StateTag::ActionEnd));
                Ok(())
            }
            c if is_blank(c) => self.classify_pending(),
            c if is_word_char(c) => {
                self.stack.push_char(c);
                Ok(())
            }
            c => self.action_punctuation(c),
        }
    }

    fn action_end(&mut self, c: char) {
        match c {
            '\n' => {
                self.cursor.reset_column();
                self.stack.replace(Frame::new(StateTag::GrammarRules));
            }
            '\r' => {}
            c if is_blank(c) => {}
            c => log_debug!("Ignoring text after action block",
                "char" => c,
                "position" => self.cursor.position()),
        }
    }

    /// Operators and punctuation inside action code end the pending word
    /// and pass through as action text
    fn action_punctuation(&mut self, c: char) -> Result<(), LexerError> {
        self.classify_pending()?;
        self.emit(Token::new(TokenCategory::ActionText, c.to_string()).with_literal(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Keyword;

    fn run(source: &str) -> Vec<Token> {
        let mut lexer = LexicalAnalyzer::new(source.as_bytes(), Vec::<Token>::new());
        lexer.run().unwrap();
        lexer.into_parts().0
    }

    fn categories(tokens: &[Token]) -> Vec<TokenCategory> {
        tokens.iter().map(|t| t.category).collect()
    }

    #[test]
    fn test_preamble_emits_raw_characters_skipping_blanks() {
        let tokens = run("a b\r\n;=\t!\n");
        let payloads: Vec<&str> = tokens.iter().map(|t| t.payload.as_str()).collect();
        assert_eq!(payloads, vec!["a", "b", ";", "=", "!", "EOF"]);
        assert_eq!(tokens[2].id(), ';' as u32);
    }

    #[test]
    fn test_percent_mid_line_is_a_raw_character() {
        let tokens = run("a%yacc\n");
        assert_eq!(tokens[1], Token::raw('%'));
        assert_eq!(tokens.len(), 7);
    }

    #[test]
    fn test_blank_rule_lines_are_skipped() {
        let tokens = run("%yacc\n\n\nabc\tfoo\n");
        assert_eq!(tokens[1].category, TokenCategory::RulePattern);
        assert_eq!(tokens[1].payload, "abc");
        assert_eq!(tokens[1].literal, Some('\t'));
    }

    #[test]
    fn test_single_character_pattern_is_kept() {
        let tokens = run("%yacc\nx\tfoo\n");
        assert_eq!(tokens[1].payload, "x");
        assert_eq!(tokens[1].category, TokenCategory::RulePattern);
    }

    #[test]
    fn test_pattern_ended_by_newline_takes_action_from_next_line() {
        let tokens = run("%yacc\n[0-9]+\nreturn\n");
        assert_eq!(tokens[1].payload, "[0-9]+");
        assert_eq!(tokens[1].literal, Some('\n'));
        assert_eq!(tokens[2].category, TokenCategory::Keyword(Keyword::Return));
    }

    #[test]
    fn test_inline_action_punctuation_is_action_text() {
        let tokens = run("%yacc\nabc\treturn;\n");
        assert_eq!(
            categories(&tokens[1..]),
            vec![
                TokenCategory::RulePattern,
                TokenCategory::Keyword(Keyword::Return),
                TokenCategory::ActionText,
                TokenCategory::Eof,
            ]
        );
        assert_eq!(tokens[3].payload, ";");
    }

    #[test]
    fn test_brace_classifies_pending_word() {
        let tokens = run("%yacc\nabc\tlen{}\n");
        assert_eq!(
            categories(&tokens[1..]),
            vec![
                TokenCategory::RulePattern,
                TokenCategory::Keyword(Keyword::Len),
                TokenCategory::BlockStart,
                TokenCategory::BlockEnd,
                TokenCategory::Eof,
            ]
        );
    }

    #[test]
    fn test_multiline_action_block() {
        let tokens = run("%yacc\nabc\t{\n  value\n  error\n}\nnext\tstate\n");
        assert_eq!(
            categories(&tokens[1..]),
            vec![
                TokenCategory::RulePattern,
                TokenCategory::BlockStart,
                TokenCategory::Keyword(Keyword::Value),
                TokenCategory::Keyword(Keyword::Error),
                TokenCategory::BlockEnd,
                TokenCategory::RulePattern,
                TokenCategory::Keyword(Keyword::State),
                TokenCategory::Eof,
            ]
        );
        assert_eq!(tokens[6].payload, "next");
    }

    #[test]
    fn test_word_touching_closing_brace_joins_block_end() {
        let tokens = run("%yacc\na\t{ return X}\n");
        assert_eq!(
            categories(&tokens[1..]),
            vec![
                TokenCategory::RulePattern,
                TokenCategory::BlockStart,
                TokenCategory::Keyword(Keyword::Return),
                TokenCategory::BlockEnd,
                TokenCategory::Eof,
            ]
        );
        assert_eq!(tokens[4].payload, "X}");
        assert!(!tokens.iter().any(Token::is_error));
    }

    #[test]
    fn test_block_may_open_at_start_of_action_line() {
        let tokens = run("%yacc\nabc\n{ value }\n");
        assert_eq!(
            categories(&tokens[1..]),
            vec![
                TokenCategory::RulePattern,
                TokenCategory::BlockStart,
                TokenCategory::Keyword(Keyword::Value),
                TokenCategory::BlockEnd,
                TokenCategory::Eof,
            ]
        );
        assert_eq!(tokens[1].literal, Some('\n'));
        assert_eq!(tokens[4].payload, "}");
    }

    #[test]
    fn test_text_after_block_is_ignored() {
        let tokens = run("%yacc\na\t{ }  trailing junk\nb\ttoken\n");
        let payloads: Vec<&str> = tokens.iter().map(|t| t.payload.as_str()).collect();
        assert_eq!(payloads, vec!["yacc", "a", "{", "}", "b", "token", "EOF"]);
    }
}
