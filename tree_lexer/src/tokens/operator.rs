//! Operator tokens and the symbol table used for prefix matching
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Operator {
    Equals,
    NotEquals,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Range,
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Remainder,
    And,
    Or,
    Not,
}

/// Symbolic operators, longest spelling first. Matching walks this table in
/// order so `>=` wins over `>`.
pub const SYMBOL_TABLE: [(&str, Operator); 12] = [
    ("==", Operator::Equals),
    ("!=", Operator::NotEquals),
    (">=", Operator::GreaterEqual),
    ("<=", Operator::LessEqual),
    ("..", Operator::Range),
    (">", Operator::Greater),
    ("<", Operator::Less),
    ("+", Operator::Addition),
    ("-", Operator::Subtraction),
    ("*", Operator::Multiplication),
    ("/", Operator::Division),
    ("%", Operator::Remainder),
];

/// Operators spelled as words; only recognised when a whole sequence matches
pub const WORD_TABLE: [(&str, Operator); 3] = [
    ("and", Operator::And),
    ("or", Operator::Or),
    ("not", Operator::Not),
];

impl Operator {
    /// Spelling in source text
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Equals => "==",
            Self::NotEquals => "!=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Range => "..",
            Self::Addition => "+",
            Self::Subtraction => "-",
            Self::Multiplication => "*",
            Self::Division => "/",
            Self::Remainder => "%",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
        }
    }

    /// Longest operator symbol that `rest` starts with
    pub fn match_prefix(rest: &str) -> Option<(Operator, usize)> {
        SYMBOL_TABLE
            .iter()
            .find(|(symbol, _)| rest.starts_with(symbol))
            .map(|&(symbol, op)| (op, symbol.len()))
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        SYMBOL_TABLE
            .iter()
            .find(|(candidate, _)| *candidate == symbol)
            .map(|&(_, op)| op)
    }

    pub fn from_word(word: &str) -> Option<Self> {
        WORD_TABLE
            .iter()
            .find(|(candidate, _)| *candidate == word)
            .map(|&(_, op)| op)
    }

    pub const fn is_word(self) -> bool {
        matches!(self, Self::And | Self::Or | Self::Not)
    }

    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Equals
                | Self::NotEquals
                | Self::Greater
                | Self::GreaterEqual
                | Self::Less
                | Self::LessEqual
        )
    }

    pub const fn is_arithmetic(self) -> bool {
        matches!(
            self,
            Self::Addition
                | Self::Subtraction
                | Self::Multiplication
                | Self::Division
                | Self::Remainder
        )
    }

    /// `not` takes a single operand
    pub const fn is_unary(self) -> bool {
        matches!(self, Self::Not)
    }

    /// Verb used in "Cannot <verb> a and b." messages
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Addition => "add",
            Self::Subtraction => "subtract",
            Self::Multiplication => "multiply",
            Self::Division => "divide",
            Self::Remainder => "take the remainder of",
            Self::Equals | Self::NotEquals => "test equality of",
            Self::Greater | Self::GreaterEqual | Self::Less | Self::LessEqual => "compare",
            Self::Range => "make a range from",
            Self::And => "apply 'and' to",
            Self::Or => "apply 'or' to",
            Self::Not => "apply 'not' to",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
