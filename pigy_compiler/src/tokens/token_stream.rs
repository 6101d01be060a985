//! Ordered token buffer accumulated by the collecting consumer
use super::token::{Token, TokenCategory};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    /// Tokens other than comments
    pub fn iter_significant(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|t| !t.category.is_comment())
    }

    pub fn payloads(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.payload.as_str()).collect()
    }

    pub fn count_of(&self, category: TokenCategory) -> usize {
        self.tokens.iter().filter(|t| t.category == category).count()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|t| t.is_error())
    }

    pub fn has_eof(&self) -> bool {
        self.tokens.last().is_some_and(Token::is_eof)
    }
}

impl IntoIterator for TokenStream {
    type Item = Token;
    type IntoIter = std::vec::IntoIter<Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

impl FromIterator<Token> for TokenStream {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TokenStream {
        vec![
            Token::new(TokenCategory::CommentLine, "# header"),
            Token::new(TokenCategory::RulePattern, "abc"),
            Token::unclassified("x"),
            Token::eof(),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_significant_skips_comments() {
        let stream = sample();
        assert_eq!(stream.len(), 4);
        assert_eq!(stream.iter_significant().count(), 3);
        assert_eq!(stream.count_of(TokenCategory::RulePattern), 1);
        assert_eq!(stream.errors().count(), 1);
        assert!(stream.has_eof());
    }

    #[test]
    fn test_tokens_display_with_ids() {
        let stream = sample();
        let lines: Vec<String> = stream.iter().map(ToString::to_string).collect();
        assert_eq!(lines[1], "[263: abc]");
        assert_eq!(lines[3], "[262: EOF]");
    }
}
