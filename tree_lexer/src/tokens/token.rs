//! Token model
//!
//! Containers own children in the tree; every other token is a leaf. A
//! `StringLiteral` is entered and left like a container but never holds
//! children, its value is set when the closing quote is seen.
use super::keyword::Keyword;
use super::operator::Operator;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Token {
    // === CONTAINERS ===
    /// `[ ... ]`, also the tree root
    Block,
    /// `( ... )`
    Parentheses,
    /// Opened by `=`, holds the value tokens; the target is the preceding sibling
    Assignment,

    // === STRING ===
    StringLiteral(String),

    // === LEAVES ===
    Identifier(String),
    NumberLiteral(f64),
    Keyword(Keyword),
    Comma,
    Operator(Operator),
}

/// Coarse grouping used for metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TokenClass {
    Container,
    String,
    Identifier,
    Number,
    Keyword,
    Punctuation,
    Operator,
}

impl Token {
    /// Name used in diagnostics such as "Unclosed Parentheses."
    pub fn kind_name(&self) -> &'static str {
        match self {
            Token::Block => "Block",
            Token::Parentheses => "Parentheses",
            Token::Assignment => "Assignment",
            Token::StringLiteral(_) => "StringLiteral",
            Token::Identifier(_) => "Identifier",
            Token::NumberLiteral(_) => "NumberLiteral",
            Token::Keyword(_) => "Keyword",
            Token::Comma => "Comma",
            Token::Operator(_) => "Operator",
        }
    }

    /// Containers accept children; string literals do not
    pub fn is_container(&self) -> bool {
        matches!(self, Token::Block | Token::Parentheses | Token::Assignment)
    }

    pub fn is_string_literal(&self) -> bool {
        matches!(self, Token::StringLiteral(_))
    }

    pub fn class(&self) -> TokenClass {
        match self {
            Token::Block | Token::Parentheses | Token::Assignment => TokenClass::Container,
            Token::StringLiteral(_) => TokenClass::String,
            Token::Identifier(_) => TokenClass::Identifier,
            Token::NumberLiteral(_) => TokenClass::Number,
            Token::Keyword(_) => TokenClass::Keyword,
            Token::Comma => TokenClass::Punctuation,
            Token::Operator(_) => TokenClass::Operator,
        }
    }

    pub fn as_operator(&self) -> Option<Operator> {
        match self {
            Token::Operator(op) => Some(*op),
            _ => None,
        }
    }

    /// Classify a completed character sequence. Whitespace-only input yields
    /// nothing. Order: keyword, comma, symbolic operator, word operator,
    /// number, identifier.
    pub fn from_sequence(sequence: &str) -> Option<Token> {
        if sequence.trim().is_empty() {
            return None;
        }

        if let Some(keyword) = Keyword::from_word(sequence) {
            return Some(Token::Keyword(keyword));
        }

        if sequence == "," {
            return Some(Token::Comma);
        }

        if let Some(op) = Operator::from_symbol(sequence).or_else(|| Operator::from_word(sequence))
        {
            return Some(Token::Operator(op));
        }

        if let Some(value) = parse_number(sequence) {
            return Some(Token::NumberLiteral(value));
        }

        Some(Token::Identifier(sequence.to_string()))
    }
}

/// Decimal literal such as `42`, `3.5`, `.5` or `1e3`. Spellings that do not
/// start with a digit or `.` (`inf`, `Infinity`, `NaN`) stay identifiers.
// Deliberately stricter than a general float parse: named non-finite values
// are never number literals.
fn parse_number(sequence: &str) -> Option<f64> {
    let first = sequence.chars().next()?;
    if !(first.is_ascii_digit() || first == '.') {
        return None;
    }
    sequence.parse::<f64>().ok()
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::StringLiteral(value) => write!(f, "{:?}", value),
            Token::Identifier(name) => f.write_str(name),
            Token::NumberLiteral(value) => write!(f, "{}", value),
            Token::Keyword(keyword) => f.write_str(keyword.as_str()),
            Token::Comma => f.write_str(","),
            Token::Operator(op) => f.write_str(op.symbol()),
            container => f.write_str(container.kind_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_classification() {
        assert_eq!(Token::from_sequence("42"), Some(Token::NumberLiteral(42.0)));
        assert_eq!(Token::from_sequence("3.25"), Some(Token::NumberLiteral(3.25)));
        assert_eq!(Token::from_sequence(".5"), Some(Token::NumberLiteral(0.5)));
        assert_eq!(
            Token::from_sequence("42abc"),
            Some(Token::Identifier("42abc".to_string()))
        );
        for spelling in ["inf", "Infinity", "NaN"] {
            assert_eq!(
                Token::from_sequence(spelling),
                Some(Token::Identifier(spelling.to_string()))
            );
        }
    }

    #[test]
    fn test_keyword_precedence() {
        assert_eq!(Token::from_sequence("if"), Some(Token::Keyword(Keyword::If)));
        assert_eq!(
            Token::from_sequence("iffy"),
            Some(Token::Identifier("iffy".to_string()))
        );
    }

    #[test]
    fn test_word_and_symbol_operators() {
        assert_eq!(
            Token::from_sequence("and"),
            Some(Token::Operator(Operator::And))
        );
        assert_eq!(
            Token::from_sequence("not"),
            Some(Token::Operator(Operator::Not))
        );
        assert_eq!(
            Token::from_sequence("=="),
            Some(Token::Operator(Operator::Equals))
        );
        assert_eq!(Token::from_sequence(","), Some(Token::Comma));
    }

    #[test]
    fn test_bare_equals_is_identifier() {
        assert_eq!(
            Token::from_sequence("="),
            Some(Token::Identifier("=".to_string()))
        );
    }

    #[test]
    fn test_whitespace_sequence_discarded() {
        assert_eq!(Token::from_sequence(""), None);
        assert_eq!(Token::from_sequence(" \t"), None);
    }

    #[test]
    fn test_container_flags() {
        assert!(Token::Assignment.is_container());
        assert!(!Token::StringLiteral(String::new()).is_container());
        assert_eq!(Token::Parentheses.kind_name(), "Parentheses");
        assert_eq!(Token::Comma.class(), TokenClass::Punctuation);
    }

    #[test]
    fn test_display() {
        assert_eq!(Token::Block.to_string(), "Block");
        assert_eq!(Token::StringLiteral("a b".into()).to_string(), "\"a b\"");
        assert_eq!(Token::Operator(Operator::Range).to_string(), "..");
    }
}
