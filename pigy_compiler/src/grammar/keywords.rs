//! Reserved keyword table
//!
//! Six words are reserved inside rule actions. The table is fixed at compile
//! time; user declared tokens and states never shadow it.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    Return,
    State,
    Token,
    Len,
    Value,
    Error,
}

impl Keyword {
    pub const ALL: [Keyword; 6] = [
        Keyword::Return,
        Keyword::State,
        Keyword::Token,
        Keyword::Len,
        Keyword::Value,
        Keyword::Error,
    ];

    /// Parse keyword from string with exact case matching
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "return" => Some(Self::Return),
            "state" => Some(Self::State),
            "token" => Some(Self::Token),
            "len" => Some(Self::Len),
            "value" => Some(Self::Value),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Return => "return",
            Self::State => "state",
            Self::Token => "token",
            Self::Len => "len",
            Self::Value => "value",
            Self::Error => "error",
        }
    }

    /// Numeric token id, continuing the structural numbering after block-end
    pub const fn token_id(self) -> u32 {
        match self {
            Self::Return => 268,
            Self::State => 269,
            Self::Token => 270,
            Self::Len => 271,
            Self::Value => 272,
            Self::Error => 273,
        }
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_table() {
        for keyword in Keyword::ALL {
            assert_eq!(Keyword::from_str(keyword.as_str()), Some(keyword));
        }
        assert_eq!(Keyword::ALL.len(), 6);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert_eq!(Keyword::from_str("return"), Some(Keyword::Return));
        assert_eq!(Keyword::from_str("Return"), None);
        assert_eq!(Keyword::from_str("RETURN"), None);
        assert_eq!(Keyword::from_str("returns"), None);
    }

    #[test]
    fn test_ids_are_contiguous() {
        let ids: Vec<u32> = Keyword::ALL.iter().map(|k| k.token_id()).collect();
        assert_eq!(ids, vec![268, 269, 270, 271, 272, 273]);
    }
}
