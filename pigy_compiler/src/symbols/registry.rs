use serde::Serialize;

/// Sentinel state every grammar starts with
pub const DEFAULT_STATE: &str = "_INIT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SymbolKind {
    Token,
    State,
}

/// Append-only, ordered name lists. Duplicates are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registries {
    tokens: Vec<String>,
    states: Vec<String>,
}

impl Registries {
    pub fn new() -> Self {
        Self {
            tokens: Vec::new(),
            states: vec![DEFAULT_STATE.to_string()],
        }
    }

    /// Append names to the declared-token list, returning how many were added
    pub fn declare_tokens<I, S>(&mut self, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::append(&mut self.tokens, names)
    }

    pub fn declare_states<I, S>(&mut self, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::append(&mut self.states, names)
    }

    fn append<I, S>(list: &mut Vec<String>, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = list.len();
        list.extend(
            names
                .into_iter()
                .map(Into::into)
                .filter(|name: &String| !name.is_empty()),
        );
        list.len() - before
    }

    /// Tokens are searched before states
    pub fn resolve(&self, word: &str) -> Option<SymbolKind> {
        if self.tokens.iter().any(|t| t == word) {
            Some(SymbolKind::Token)
        } else if self.states.iter().any(|s| s == word) {
            Some(SymbolKind::State)
        } else {
            None
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }
}

impl Default for Registries {
    fn default() -> Self {
        Self::new()
    }
}
