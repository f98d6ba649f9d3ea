//! Tree build failures

use crate::config::compile_time::lexical::*;
use crate::logging::{codes, Code};
use crate::utils::{Position, SourceMap, Span};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    /// Tried to leave the root block
    #[error("Mismatched braces.")]
    MismatchedBraces { position: Position },

    #[error("Cannot nest within non-container tokens.")]
    NestOutsideContainer { position: Position },

    #[error("Cannot close parentheses outside of parentheses.")]
    UnmatchedClosingParenthesis { position: Position },

    /// `]` while the innermost open container is not a block
    #[error("Too many closing braces.")]
    TooManyClosingBraces { position: Position },

    /// Input ended with a container still open; `opened_at` is its opener
    #[error("Unclosed {kind}.")]
    Unclosed {
        kind: &'static str,
        opened_at: Position,
    },

    #[error("Source too large: {size} bytes (max {MAX_SOURCE_SIZE})")]
    SourceTooLarge { size: usize },

    #[error("Too many tokens (max {MAX_TOKEN_COUNT})")]
    TooManyTokens { position: Position },

    #[error("Nesting too deep: {depth} levels (max {MAX_NESTING_DEPTH})")]
    NestingTooDeep { depth: usize, position: Position },

    #[error("String literal too large: {size} bytes (max {MAX_STRING_SIZE})")]
    StringTooLarge { size: usize, position: Position },

    #[error("Identifier too long: {length} characters (max {MAX_IDENTIFIER_LENGTH})")]
    IdentifierTooLong { length: usize, position: Position },
}

impl BuildError {
    pub fn error_code(&self) -> Code {
        match self {
            BuildError::MismatchedBraces { .. } => codes::structure::MISMATCHED_BRACES,
            BuildError::NestOutsideContainer { .. } => codes::structure::NEST_OUTSIDE_CONTAINER,
            BuildError::UnmatchedClosingParenthesis { .. } => {
                codes::structure::UNMATCHED_CLOSING_PARENTHESIS
            }
            BuildError::TooManyClosingBraces { .. } => codes::structure::TOO_MANY_CLOSING_BRACES,
            BuildError::Unclosed { .. } => codes::structure::UNCLOSED_CONTAINER,
            BuildError::SourceTooLarge { .. } => codes::limits::SOURCE_TOO_LARGE,
            BuildError::TooManyTokens { .. } => codes::limits::TOO_MANY_TOKENS,
            BuildError::NestingTooDeep { .. } => codes::limits::NESTING_TOO_DEEP,
            BuildError::StringTooLarge { .. } => codes::limits::STRING_TOO_LARGE,
            BuildError::IdentifierTooLong { .. } => codes::limits::IDENTIFIER_TOO_LONG,
        }
    }

    /// Where the problem was detected, when it has a location
    pub fn position(&self) -> Option<Position> {
        match self {
            BuildError::MismatchedBraces { position }
            | BuildError::NestOutsideContainer { position }
            | BuildError::UnmatchedClosingParenthesis { position }
            | BuildError::TooManyClosingBraces { position }
            | BuildError::TooManyTokens { position }
            | BuildError::NestingTooDeep { position, .. }
            | BuildError::StringTooLarge { position, .. }
            | BuildError::IdentifierTooLong { position, .. } => Some(*position),
            BuildError::Unclosed { opened_at, .. } => Some(*opened_at),
            BuildError::SourceTooLarge { .. } => None,
        }
    }

    pub fn span(&self) -> Option<Span> {
        self.position().map(|p| Span::new(p, p))
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    /// Nesting errors as opposed to resource limit errors
    pub fn is_structural(&self) -> bool {
        codes::get_category(self.error_code().as_str()) == "Structure"
    }

    /// Message with the offending source line underneath
    pub fn render(&self, source: &str) -> String {
        match self.span() {
            Some(span) => SourceMap::new(source).format_error(&span, &self.to_string()),
            None => format!("error: {}\n", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let at = Position::start();
        assert_eq!(
            BuildError::UnmatchedClosingParenthesis { position: at }.to_string(),
            "Cannot close parentheses outside of parentheses."
        );
        assert_eq!(
            BuildError::Unclosed {
                kind: "Parentheses",
                opened_at: at
            }
            .to_string(),
            "Unclosed Parentheses."
        );
    }

    #[test]
    fn test_codes_and_categories() {
        let structural = BuildError::TooManyClosingBraces {
            position: Position::start(),
        };
        assert_eq!(structural.error_code().as_str(), "E043");
        assert!(structural.is_structural());
        assert!(structural.requires_halt());

        let limit = BuildError::SourceTooLarge { size: 1 };
        assert!(!limit.is_structural());
        assert_eq!(limit.position(), None);
    }

    #[test]
    fn test_render_points_at_opener() {
        let error = BuildError::Unclosed {
            kind: "Block",
            opened_at: Position::new(4, 1, 5),
        };
        let rendered = error.render("x = [1, 2");
        assert!(rendered.starts_with("error: Unclosed Block."));
        assert!(rendered.contains("--> 1:5"));
    }
}
