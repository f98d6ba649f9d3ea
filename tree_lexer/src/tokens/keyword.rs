//! Reserved words
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    If,
    Else,
    While,
    True,
    False,
    Null,
    Def,
    For,
    In,
}

impl Keyword {
    pub const ALL: [Keyword; 9] = [
        Self::If,
        Self::Else,
        Self::While,
        Self::True,
        Self::False,
        Self::Null,
        Self::Def,
        Self::For,
        Self::In,
    ];

    /// Spelling in source text
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::If => "if",
            Self::Else => "else",
            Self::While => "while",
            Self::True => "true",
            Self::False => "false",
            Self::Null => "null",
            Self::Def => "def",
            Self::For => "for",
            Self::In => "in",
        }
    }

    /// Exact, case-sensitive lookup
    pub fn from_word(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|keyword| keyword.as_str() == word)
    }

    /// `true`, `false` and `null` stand for values rather than control flow
    pub const fn is_literal(self) -> bool {
        matches!(self, Self::True | Self::False | Self::Null)
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn is_reserved_keyword(word: &str) -> bool {
    Keyword::from_word(word).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_round_trip() {
        for keyword in Keyword::ALL {
            assert_eq!(Keyword::from_word(keyword.as_str()), Some(keyword));
        }
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(Keyword::from_word("If"), None);
        assert!(!is_reserved_keyword("WHILE"));
        assert!(is_reserved_keyword("while"));
    }

    #[test]
    fn test_literal_keywords() {
        assert!(Keyword::Null.is_literal());
        assert!(!Keyword::Def.is_literal());
    }
}
