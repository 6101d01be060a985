//! `%` instruction lines

use super::analyzer::LexicalAnalyzer;
use super::error::LexerError;
use super::stack::{Frame, StateTag};
use crate::logging::codes;
use crate::sink::TokenEmitter;
use crate::tokens::{Token, TokenCategory};
use crate::{log_debug, log_info, log_success, log_warning};
use std::io::BufRead;

/// A parsed instruction line, without the leading `%`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Ends the preamble and enters grammar rules
    Yacc,
    Token(Vec<String>),
    State(Vec<String>),
    Only(Vec<String>),
    Except(Vec<String>),
    Include(Vec<String>),
    Output(Vec<String>),
    Alias { old: String, new: String },
    /// `%alias` without both names
    MalformedAlias(Vec<String>),
    Unknown(String),
    /// Only whitespace after the `%`
    Empty,
}

impl Directive {
    pub fn parse(line: &str) -> Self {
        let mut fields = line.split_whitespace();
        let Some(command) = fields.next() else {
            return Directive::Empty;
        };
        let args: Vec<&str> = fields.collect();

        match command {
            "yacc" => Directive::Yacc,
            "token" => Directive::Token(parse_name_list(&args)),
            "state" => Directive::State(parse_name_list(&args)),
            "only" => Directive::Only(owned(&args)),
            "except" => Directive::Except(owned(&args)),
            "include" => Directive::Include(owned(&args)),
            "output" => Directive::Output(owned(&args)),
            "alias" => match args.as_slice() {
                [old, new, ..] => Directive::Alias {
                    old: old.to_string(),
                    new: new.to_string(),
                },
                _ => Directive::MalformedAlias(owned(&args)),
            },
            other => Directive::Unknown(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Directive::Yacc => "yacc",
            Directive::Token(_) => "token",
            Directive::State(_) => "state",
            Directive::Only(_) => "only",
            Directive::Except(_) => "except",
            Directive::Include(_) => "include",
            Directive::Output(_) => "output",
            Directive::Alias { .. } | Directive::MalformedAlias(_) => "alias",
            Directive::Unknown(name) => name.as_str(),
            Directive::Empty => "",
        }
    }
}

/// Names separated by commas, spaces or both. Empty entries are dropped.
pub fn parse_name_list(fields: &[&str]) -> Vec<String> {
    fields
        .join(",")
        .replace(' ', "")
        .split(',')
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn owned(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| f.to_string()).collect()
}

impl<R: BufRead, E: TokenEmitter> LexicalAnalyzer<R, E> {
    /// Apply the pending instruction line and leave the Directive frame
    pub(super) fn run_directive(&mut self) -> Result<(), LexerError> {
        let line = self.stack.take_lexeme();
        if line.is_empty() {
            self.stack.pop()?;
            return Ok(());
        }

        self.emit(Token::new(TokenCategory::Instruction, line.as_str()))?;
        let directive = Directive::parse(&line);

        match &directive {
            Directive::Yacc => {
                self.stack.pop()?;
                self.stack.replace(Frame::new(StateTag::GrammarRules));
                log_success!(codes::success::GRAMMAR_SECTION_ENTERED, "Entering grammar rules",
                    "line" => self.cursor.position().line);
                return Ok(());
            }
            Directive::Token(names) => {
                let added = self.registries.declare_tokens(names.iter().cloned());
                log_info!("Declared tokens",
                    "code" => codes::success::DIRECTIVE_APPLIED,
                    "added" => added,
                    "names" => names.join(","));
            }
            Directive::State(names) => {
                let added = self.registries.declare_states(names.iter().cloned());
                log_info!("Declared states",
                    "code" => codes::success::DIRECTIVE_APPLIED,
                    "added" => added,
                    "names" => names.join(","));
            }
            Directive::Only(args)
            | Directive::Except(args)
            | Directive::Include(args)
            | Directive::Output(args) => {
                log_info!("Instruction acknowledged",
                    "directive" => directive.name(),
                    "args" => args.join(" "));
            }
            Directive::Alias { old, new } => {
                log_info!("Alias acknowledged", "old" => old, "new" => new);
            }
            Directive::MalformedAlias(args) => {
                log_warning!(code = codes::lexical::MALFORMED_DIRECTIVE, "%alias needs an old and a new name",
                    position = self.cursor.position(),
                    "args" => args.join(" "));
            }
            Directive::Unknown(name) => {
                log_warning!(code = codes::lexical::UNKNOWN_DIRECTIVE, "Unknown instruction",
                    position = self.cursor.position(),
                    "directive" => name);
            }
            Directive::Empty => {
                log_warning!(code = codes::lexical::MALFORMED_DIRECTIVE, "Instruction line has no command",
                    position = self.cursor.position());
            }
        }

        log_debug!("Instruction processed", "line" => &line);
        self.stack.pop()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::Registries;

    fn lex(source: &str) -> (Vec<Token>, Registries, Vec<StateTag>) {
        let mut lexer = LexicalAnalyzer::new(source.as_bytes(), Vec::<Token>::new());
        lexer.run().unwrap();
        let tags = lexer.stack().tags();
        let (tokens, registries, _) = lexer.into_parts();
        (tokens, registries, tags)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Directive::parse("yacc"), Directive::Yacc);
        assert_eq!(
            Directive::parse("token a, b,c"),
            Directive::Token(vec!["a".into(), "b".into(), "c".into()])
        );
        assert_eq!(
            Directive::parse("alias old new"),
            Directive::Alias {
                old: "old".into(),
                new: "new".into()
            }
        );
        assert_eq!(
            Directive::parse("alias lonely"),
            Directive::MalformedAlias(vec!["lonely".into()])
        );
        assert_eq!(Directive::parse("frobnicate x"), Directive::Unknown("frobnicate".into()));
        assert_eq!(Directive::parse("   "), Directive::Empty);
    }

    #[test]
    fn test_name_list_separators() {
        assert_eq!(parse_name_list(&["a,", "b", ",,c,"]), vec!["a", "b", "c"]);
        assert_eq!(parse_name_list(&["A,B"]), vec!["A", "B"]);
        assert!(parse_name_list(&[]).is_empty());
    }

    #[test]
    fn test_token_declarations_accumulate_in_order() {
        let (tokens, registries, _) = lex("%token a, b\n%token c\n%token a\n");
        assert_eq!(registries.tokens(), &["a", "b", "c", "a"]);
        assert_eq!(tokens[0], Token::new(TokenCategory::Instruction, "token a, b"));
        assert_eq!(tokens[1].payload, "token c");
    }

    #[test]
    fn test_state_declarations_follow_default_state() {
        let (_, registries, _) = lex("%state COMMENT,STRING\n");
        assert_eq!(registries.states(), &["_INIT", "COMMENT", "STRING"]);
        assert!(registries.tokens().is_empty());
    }

    #[test]
    fn test_yacc_leaves_only_grammar_rules() {
        let (_, _, tags) = lex("%token X\n%yacc\n");
        assert_eq!(tags, vec![StateTag::GrammarRules]);
    }

    #[test]
    fn test_directive_inside_grammar_rules_returns_to_rules() {
        let (tokens, registries, tags) = lex("%yacc\n%token LATE\nx\tLATE\n");
        assert_eq!(tags, vec![StateTag::GrammarRules]);
        assert_eq!(registries.tokens(), &["LATE"]);
        assert_eq!(tokens[3].category, TokenCategory::DeclaredToken);
    }

    #[test]
    fn test_acknowledged_and_malformed_directives_do_not_halt() {
        let (tokens, registries, tags) =
            lex("%only x\n%except y\n%include z.h\n%output out.c\n%alias a\n%\n%bogus\nq\n");
        let instructions = tokens
            .iter()
            .filter(|t| t.category == TokenCategory::Instruction)
            .count();
        assert_eq!(instructions, 6);
        assert_eq!(registries.tokens().len(), 0);
        assert_eq!(tags, vec![StateTag::Preamble]);
        assert_eq!(tokens[tokens.len() - 2], Token::raw('q'));
    }

    #[test]
    fn test_blank_instruction_line_is_still_emitted() {
        let (tokens, registries, tags) = lex("%   \nq\n");
        assert_eq!(tokens[0], Token::new(TokenCategory::Instruction, "   "));
        assert_eq!(tokens[1], Token::raw('q'));
        assert_eq!(tokens.len(), 3);
        assert!(registries.tokens().is_empty());
        assert_eq!(tags, vec![StateTag::Preamble]);
    }

    #[test]
    fn test_comment_inside_directive_line() {
        let (tokens, registries, _) = lex("%token A # trailing note\n");
        assert_eq!(registries.tokens(), &["A"]);
        assert_eq!(tokens[0].category, TokenCategory::CommentLine);
        assert_eq!(tokens[1].payload, "token A ");
    }
}
