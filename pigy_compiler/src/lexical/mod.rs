//! Lexical analysis of PigYacc grammar files
//!
//! A stack of lexing contexts driven one character at a time. The active
//! frame decides what each character means; comments interrupt any
//! line-oriented frame and hand control back when they close. Tokens are
//! pushed to a [`TokenEmitter`](crate::sink::TokenEmitter) as soon as they
//! are complete, normally the channel of a consumer thread.

pub mod analyzer;
pub mod classifier;
mod comments;
pub mod cursor;
pub mod directive;
pub mod error;
pub mod stack;
mod states;

use crate::config::compile_time::lexical::{MAX_LEXEME_LENGTH, MAX_STACK_DEPTH, MAX_TOKEN_COUNT};
use crate::config::compile_time::sink::CHANNEL_CAPACITY;
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::sink::{spawn_consumer, CollectedTokens, TokenCollector, TokenConsumer};
use crate::symbols::Registries;
use std::io::BufRead;

pub use analyzer::{LexicalAnalyzer, LexicalMetrics};
pub use classifier::classify;
pub use directive::Directive;
pub use error::LexerError;
pub use stack::{ContextStack, Frame, StateTag};

/// What a completed run hands back to the caller
#[derive(Debug)]
pub struct TokenizeOutcome<O> {
    /// Whatever the consumer produced from the token stream
    pub output: O,
    pub registries: Registries,
    pub metrics: LexicalMetrics,
}

/// Tokenize `reader`, feeding every token to `consumer` on its own thread
pub fn tokenize<R, C>(reader: R, consumer: C) -> Result<TokenizeOutcome<C::Output>, LexerError>
where
    R: BufRead,
    C: TokenConsumer,
{
    tokenize_with(reader, consumer, LexicalPreferences::default())
}

pub fn tokenize_with<R, C>(
    reader: R,
    consumer: C,
    preferences: LexicalPreferences,
) -> Result<TokenizeOutcome<C::Output>, LexerError>
where
    R: BufRead,
    C: TokenConsumer,
{
    let (sink, handle) = spawn_consumer(consumer, CHANNEL_CAPACITY)?;

    let mut analyzer = LexicalAnalyzer::with_preferences(reader, sink, preferences);
    let run = analyzer.run();
    let (sink, registries, metrics) = analyzer.into_parts();

    // The consumer is always told how the stream ended so its thread exits
    let signalled = match &run {
        Ok(()) => sink.complete(),
        Err(e) => sink.abort(&e.to_string()),
    };

    let output = handle.join()?;
    run?;
    signalled?;

    Ok(TokenizeOutcome {
        output,
        registries,
        metrics,
    })
}

/// Tokenize in-memory grammar text into a collected stream
pub fn tokenize_str(source: &str) -> Result<TokenizeOutcome<CollectedTokens>, LexerError> {
    tokenize(source.as_bytes(), TokenCollector::new())
}

/// Compile-time lexical limits in effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexicalLimits {
    pub max_lexeme_length: usize,
    pub max_token_count: usize,
    pub max_stack_depth: usize,
    pub channel_capacity: usize,
}

pub fn get_lexical_limits() -> LexicalLimits {
    LexicalLimits {
        max_lexeme_length: MAX_LEXEME_LENGTH,
        max_token_count: MAX_TOKEN_COUNT,
        max_stack_depth: MAX_STACK_DEPTH,
        channel_capacity: CHANNEL_CAPACITY,
    }
}

/// Check that every lexical code is registered and the limits can hold a
/// minimal grammar. Run once at startup.
pub fn validate_tokenization() -> Result<(), String> {
    let lexical_codes = [
        codes::lexical::INVALID_ENCODING,
        codes::lexical::INPUT_READ_FAILURE,
        codes::lexical::STACK_UNDERFLOW,
        codes::lexical::STACK_OVERFLOW,
        codes::lexical::LEXEME_TOO_LONG,
        codes::lexical::UNCLASSIFIED_IDENTIFIER,
        codes::lexical::HALTED,
        codes::lexical::TOO_MANY_TOKENS,
        codes::lexical::UNKNOWN_DIRECTIVE,
        codes::lexical::MALFORMED_DIRECTIVE,
    ];

    for code in &lexical_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Lexical error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    let limits = get_lexical_limits();
    if limits.max_token_count == 0 {
        return Err("MAX_TOKEN_COUNT cannot be zero".to_string());
    }
    if limits.max_lexeme_length == 0 {
        return Err("MAX_LEXEME_LENGTH cannot be zero".to_string());
    }
    // base frame, directive, slash/line comment and star run
    if limits.max_stack_depth < 4 {
        return Err(format!(
            "MAX_STACK_DEPTH of {} cannot hold a comment inside a directive",
            limits.max_stack_depth
        ));
    }

    crate::log_debug!("Lexical limits validated",
        "max_lexeme_length" => limits.max_lexeme_length,
        "max_token_count" => limits.max_token_count,
        "max_stack_depth" => limits.max_stack_depth,
        "channel_capacity" => limits.channel_capacity);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Keyword;
    use crate::sink::{Completion, SinkError};
    use crate::tokens::{Token, TokenCategory};
    use assert_matches::assert_matches;
    use std::io::{self, BufReader, Read};
    use std::sync::{Arc, Mutex};

    fn collect(source: &str) -> TokenizeOutcome<CollectedTokens> {
        tokenize_str(source).unwrap()
    }

    fn categories(outcome: &TokenizeOutcome<CollectedTokens>) -> Vec<TokenCategory> {
        outcome.output.stream.iter().map(|t| t.category).collect()
    }

    const CALC: &str = "\
// calculator grammar
%token NUMBER, PLUS
%state COMMENT
%yacc
[0-9]+\t{ value = len; return NUMBER; }
\\+\treturn PLUS;
/* skip blanks */
[ \\t]+\tstate COMMENT
";

    #[test]
    fn test_preamble_characters_in_order() {
        let outcome = collect("ab c;\n=  d\r\n");
        let payloads = outcome.output.stream.payloads();
        assert_eq!(payloads, vec!["a", "b", "c", ";", "=", "d", "EOF"]);
        assert!(outcome
            .output
            .stream
            .iter()
            .take(6)
            .all(|t| matches!(t.category, TokenCategory::Char(_))));
    }

    #[test]
    fn test_token_registry_keeps_order_and_duplicates() {
        let outcome = collect("%token a, b\n%token c\n%token b\n");
        assert_eq!(outcome.registries.tokens(), &["a", "b", "c", "b"]);
    }

    #[test]
    fn test_block_comment_between_rules() {
        let outcome = collect("%yacc\na\treturn\n/* text */\nb\tlen\n");
        let structural: Vec<TokenCategory> = outcome
            .output
            .stream
            .iter_significant()
            .map(|t| t.category)
            .collect();
        assert_eq!(
            structural,
            vec![
                TokenCategory::Instruction,
                TokenCategory::RulePattern,
                TokenCategory::Keyword(Keyword::Return),
                TokenCategory::RulePattern,
                TokenCategory::Keyword(Keyword::Len),
                TokenCategory::Eof,
            ]
        );
        assert_eq!(outcome.output.stream.count_of(TokenCategory::StarSlash), 1);
    }

    #[test]
    fn test_block_comment_resumes_inline_action() {
        let outcome = collect("%yacc\na\tvalue /* note */ len\n");
        let payloads = outcome.output.stream.payloads();
        assert_eq!(payloads, vec!["yacc", "a", "value", "/* note */", "len", "EOF"]);
    }

    #[test]
    fn test_rule_with_inline_return() {
        let outcome = collect("%yacc\nabc\treturn;\n");
        let tokens = outcome.output.stream.tokens();
        assert_eq!(tokens[1], Token::new(TokenCategory::RulePattern, "abc").with_literal('\t'));
        assert_eq!(tokens[2], Token::new(TokenCategory::Keyword(Keyword::Return), "return"));
    }

    #[test]
    fn test_action_block_keywords() {
        let outcome = collect("%yacc\np\t{ value + len }\n");
        assert_eq!(
            categories(&outcome)[1..],
            [
                TokenCategory::RulePattern,
                TokenCategory::BlockStart,
                TokenCategory::Keyword(Keyword::Value),
                TokenCategory::ActionText,
                TokenCategory::Keyword(Keyword::Len),
                TokenCategory::BlockEnd,
                TokenCategory::Eof,
            ]
        );
        let block_end = &outcome.output.stream.tokens()[6];
        assert!(block_end.payload.ends_with('}'));
    }

    #[test]
    fn test_unclassified_identifier_continues() {
        let outcome = collect("%yacc\na\tmystery\nb\treturn\n");
        let errors: Vec<&str> = outcome
            .output
            .stream
            .errors()
            .map(|t| t.payload.as_str())
            .collect();
        assert_eq!(errors, vec!["ERR: mystery"]);
        assert!(categories(&outcome).contains(&TokenCategory::Keyword(Keyword::Return)));
        assert_eq!(outcome.output.completion, Completion::Complete);
    }

    #[test]
    fn test_eof_is_delivered_last_from_every_state() {
        for source in ["", "abc", "%tok", "%yacc\nabc", "%yacc\na\t{ value", "/* open", "# open"] {
            let outcome = collect(source);
            let last = outcome.output.stream.tokens().last().unwrap();
            assert!(last.is_eof(), "no EOF for {:?}", source);
            assert_eq!(outcome.output.stream.count_of(TokenCategory::Eof), 1);
            assert_eq!(outcome.output.completion, Completion::Complete);
        }
    }

    #[test]
    fn test_directive_on_first_line() {
        let outcome = collect("%token FIRST\n");
        assert_eq!(outcome.registries.tokens(), &["FIRST"]);
        assert_eq!(outcome.output.stream.tokens()[0].category, TokenCategory::Instruction);
    }

    #[test]
    fn test_full_grammar() {
        let outcome = collect(CALC);
        let registries = &outcome.registries;
        assert_eq!(registries.tokens(), &["NUMBER", "PLUS"]);
        assert_eq!(registries.states(), &["_INIT", "COMMENT"]);

        let payloads = outcome.output.stream.payloads();
        assert_eq!(
            payloads,
            vec![
                "// calculator grammar",
                "token NUMBER, PLUS",
                "state COMMENT",
                "yacc",
                "[0-9]+",
                "{",
                "value",
                "=",
                "len",
                ";",
                "return",
                "NUMBER",
                ";",
                "}",
                "\\+",
                "return",
                "PLUS",
                ";",
                "/* skip blanks */",
                "[ \\t]+",
                "state",
                "COMMENT",
                "EOF",
            ]
        );
        assert_eq!(outcome.metrics.declared_token_hits, 2);
        assert_eq!(outcome.metrics.declared_state_hits, 1);
        assert_eq!(outcome.metrics.classifier_errors, 0);
    }

    #[test]
    fn test_collected_text_concatenates_payloads() {
        let outcome = collect("%yacc\na\tb\n");
        assert_eq!(outcome.output.text, "yaccaERR: bEOF");
    }

    #[test]
    fn test_invalid_encoding_aborts_run() {
        let bytes: &[u8] = &[b'%', b'y', 0xC0, b'\n'];
        let err = tokenize(bytes, TokenCollector::new()).unwrap_err();
        assert_matches!(err, LexerError::InvalidEncoding { offset: 2 });
    }

    struct Panicking;

    impl TokenConsumer for Panicking {
        type Output = ();

        fn consume(&mut self, _token: Token) {
            panic!("consumer failure");
        }

        fn finish(self, _completion: Completion) {}
    }

    #[test]
    fn test_consumer_panic_is_reported() {
        let err = tokenize("abc".as_bytes(), Panicking).unwrap_err();
        assert_matches!(err, LexerError::Sink(SinkError::ConsumerPanicked));
    }

    /// Yields `data`, then fails every read
    struct FailingAfter {
        data: &'static [u8],
    }

    impl Read for FailingAfter {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.data.is_empty() {
                return Err(io::Error::new(io::ErrorKind::Other, "disk gone"));
            }
            let n = self.data.len().min(buf.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    /// Shares what it saw with the test, since a failed run drops the output
    #[derive(Clone, Default)]
    struct Recording {
        seen: Arc<Mutex<(Vec<Token>, Option<Completion>)>>,
    }

    impl TokenConsumer for Recording {
        type Output = ();

        fn consume(&mut self, token: Token) {
            self.seen.lock().unwrap().0.push(token);
        }

        fn finish(self, completion: Completion) {
            self.seen.lock().unwrap().1 = Some(completion);
        }
    }

    #[test]
    fn test_read_failure_aborts_consumer() {
        let recording = Recording::default();
        let reader = BufReader::new(FailingAfter { data: b"ab" });

        let err = tokenize(reader, recording.clone()).unwrap_err();
        assert_matches!(&err, LexerError::Io { position, .. } if position.line == 1 && position.column == 3);
        assert_eq!(err.error_code(), codes::lexical::INPUT_READ_FAILURE);

        let seen = recording.seen.lock().unwrap();
        assert_eq!(seen.0, vec![Token::raw('a'), Token::raw('b')]);
        assert_matches!(seen.1, Some(Completion::Aborted(ref reason)) if reason.contains("disk gone"));
    }

    #[test]
    fn test_token_limit_aborts_consumer() {
        let recording = Recording::default();
        let mut preferences = LexicalPreferences::default();
        preferences.max_token_count = 3;

        let err = tokenize_with("abcdef".as_bytes(), recording.clone(), preferences).unwrap_err();
        assert_matches!(err, LexerError::TooManyTokens { max: 3 });
        assert_eq!(err.error_code(), codes::lexical::TOO_MANY_TOKENS);

        let seen = recording.seen.lock().unwrap();
        assert_eq!(seen.0.len(), 3);
        assert!(!seen.0.iter().any(Token::is_eof));
        assert_matches!(seen.1, Some(Completion::Aborted(_)));
    }

    #[test]
    fn test_limits_validate() {
        assert!(validate_tokenization().is_ok());
        assert!(get_lexical_limits().max_stack_depth >= 4);
    }
}
