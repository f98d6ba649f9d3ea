//! Diagnostic codes and their classification metadata
//!
//! Every error or success event carries a [`Code`]. The registry below maps
//! each code to its category, severity and recovery behaviour.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Code wrapper shared by error and success events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Nesting and structure errors raised while building the tree
pub mod structure {
    use super::Code;

    pub const MISMATCHED_BRACES: Code = Code::new("E040");
    pub const NEST_OUTSIDE_CONTAINER: Code = Code::new("E041");
    pub const UNMATCHED_CLOSING_PARENTHESIS: Code = Code::new("E042");
    pub const TOO_MANY_CLOSING_BRACES: Code = Code::new("E043");
    pub const UNCLOSED_CONTAINER: Code = Code::new("E044");
}

/// Resource limit violations
pub mod limits {
    use super::Code;

    pub const SOURCE_TOO_LARGE: Code = Code::new("E060");
    pub const TOO_MANY_TOKENS: Code = Code::new("E061");
    pub const NESTING_TOO_DEEP: Code = Code::new("E062");
    pub const STRING_TOO_LARGE: Code = Code::new("E063");
    pub const IDENTIFIER_TOO_LONG: Code = Code::new("E064");
}

/// Operator dispatch failures
pub mod dispatch {
    use super::Code;

    pub const TYPE_MISMATCH: Code = Code::new("E080");
    pub const ARITY_MISMATCH: Code = Code::new("E081");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const TREE_BUILD_COMPLETE: Code = Code::new("I020");
}

/// Codes for events logged without a specific code
pub mod generic {
    use super::Code;

    pub const WARNING: Code = Code::new("W000");
    pub const INFO: Code = Code::new("I000");
    pub const DEBUG: Code = Code::new("D000");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

type Row = (
    Code,
    &'static str,
    Severity,
    bool,
    bool,
    &'static str,
    &'static str,
);

const REGISTRY_ROWS: &[Row] = &[
    (
        system::INTERNAL_ERROR,
        "System",
        Severity::Critical,
        false,
        true,
        "Internal error in the tree builder",
        "File a bug report with the failing input",
    ),
    (
        system::INITIALIZATION_FAILURE,
        "System",
        Severity::Critical,
        false,
        true,
        "Logging or configuration initialization failure",
        "Check TREE_LEXER_* environment variables and configuration",
    ),
    (
        structure::MISMATCHED_BRACES,
        "Structure",
        Severity::High,
        false,
        true,
        "Attempted to leave the root block",
        "Remove the extra closing delimiter",
    ),
    (
        structure::NEST_OUTSIDE_CONTAINER,
        "Structure",
        Severity::High,
        false,
        true,
        "Attempted to open a token inside a non-container token",
        "Close the enclosing string literal first",
    ),
    (
        structure::UNMATCHED_CLOSING_PARENTHESIS,
        "Structure",
        Severity::High,
        false,
        true,
        "Closing parenthesis without a matching open parenthesis",
        "Remove the ')' or add the missing '('",
    ),
    (
        structure::TOO_MANY_CLOSING_BRACES,
        "Structure",
        Severity::High,
        false,
        true,
        "Closing bracket without a matching open block",
        "Remove the ']' or add the missing '['",
    ),
    (
        structure::UNCLOSED_CONTAINER,
        "Structure",
        Severity::High,
        false,
        true,
        "Input ended while a container was still open",
        "Add the missing closing delimiter",
    ),
    (
        limits::SOURCE_TOO_LARGE,
        "Limits",
        Severity::High,
        false,
        true,
        "Source text exceeds the configured size limit",
        "Split the source or raise max_source_size",
    ),
    (
        limits::TOO_MANY_TOKENS,
        "Limits",
        Severity::High,
        false,
        true,
        "Token count exceeds the configured limit",
        "Split the source or raise max_token_count",
    ),
    (
        limits::NESTING_TOO_DEEP,
        "Limits",
        Severity::High,
        false,
        true,
        "Container nesting exceeds the configured depth",
        "Flatten the nested blocks or raise max_nesting_depth",
    ),
    (
        limits::STRING_TOO_LARGE,
        "Limits",
        Severity::Medium,
        false,
        true,
        "String literal exceeds the configured size limit",
        "Shorten the literal or raise max_string_size",
    ),
    (
        limits::IDENTIFIER_TOO_LONG,
        "Limits",
        Severity::Medium,
        false,
        true,
        "Identifier exceeds the configured length limit",
        "Use a shorter name or raise max_identifier_length",
    ),
    (
        dispatch::TYPE_MISMATCH,
        "Dispatch",
        Severity::Medium,
        true,
        false,
        "Operator is not defined for the operand types",
        "Convert one operand so both have a supported type",
    ),
    (
        dispatch::ARITY_MISMATCH,
        "Dispatch",
        Severity::Medium,
        true,
        false,
        "Operator applied with the wrong number of operands",
        "Use the unary form for 'not'",
    ),
    (
        success::SYSTEM_INITIALIZATION_COMPLETED,
        "System",
        Severity::Low,
        true,
        false,
        "Logging system initialized",
        "None",
    ),
    (
        success::TREE_BUILD_COMPLETE,
        "Structure",
        Severity::Low,
        true,
        false,
        "Token tree built successfully",
        "None",
    ),
];

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        REGISTRY_ROWS
            .iter()
            .map(
                |&(code, category, severity, recoverable, requires_halt, description, action)| {
                    (
                        code.as_str(),
                        ErrorMetadata {
                            code: code.as_str(),
                            category,
                            severity,
                            recoverable,
                            requires_halt,
                            description,
                            recommended_action: action,
                        },
                    )
                },
            )
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_row_registered_once() {
        assert_eq!(get_error_registry().len(), REGISTRY_ROWS.len());
    }

    #[test]
    fn test_structure_codes_halt() {
        assert!(requires_halt(structure::UNCLOSED_CONTAINER.as_str()));
        assert!(!is_recoverable(structure::MISMATCHED_BRACES.as_str()));
        assert_eq!(get_category("E042"), "Structure");
    }

    #[test]
    fn test_dispatch_codes_recoverable() {
        assert!(is_recoverable(dispatch::TYPE_MISMATCH.as_str()));
        assert!(!requires_halt(dispatch::TYPE_MISMATCH.as_str()));
        assert_eq!(get_severity("E080"), Severity::Medium);
    }

    #[test]
    fn test_unknown_code_defaults() {
        assert_eq!(get_description("E999"), "Unknown error");
        assert_eq!(get_category("E999"), "Unknown");
        assert!(get_error_metadata("E999").is_none());
    }
}
