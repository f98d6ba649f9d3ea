//! Token tree construction
//!
//! Turns source text into a [`TokenTree`] in a single pass. Resource limits
//! are compile-time constants; runtime preferences only affect metrics and
//! diagnostics.

pub mod builder;
pub mod error;
pub mod metrics;

use crate::config::compile_time::lexical::*;
use crate::config::runtime::BuilderPreferences;
use crate::logging::codes;
use crate::tokens::TokenTree;

pub use builder::TreeBuilder;
pub use error::BuildError;
pub use metrics::BuildMetrics;

// ============================================================================
// MODULE API
// ============================================================================

/// Build the token tree for `source` with default preferences
pub fn build(source: &str) -> Result<TokenTree, BuildError> {
    TreeBuilder::new().build(source)
}

pub fn build_with_preferences(
    source: &str,
    preferences: BuilderPreferences,
) -> Result<TokenTree, BuildError> {
    TreeBuilder::with_preferences(preferences).build(source)
}

pub fn create_builder() -> TreeBuilder {
    TreeBuilder::new()
}

pub fn create_builder_with_preferences(preferences: BuilderPreferences) -> TreeBuilder {
    TreeBuilder::with_preferences(preferences)
}

// ============================================================================
// MODULE VALIDATION
// ============================================================================

/// Check that every build error code is registered with metadata
pub fn validate_error_codes() -> Result<(), String> {
    let build_codes = [
        codes::structure::MISMATCHED_BRACES,
        codes::structure::NEST_OUTSIDE_CONTAINER,
        codes::structure::UNMATCHED_CLOSING_PARENTHESIS,
        codes::structure::TOO_MANY_CLOSING_BRACES,
        codes::structure::UNCLOSED_CONTAINER,
        codes::limits::SOURCE_TOO_LARGE,
        codes::limits::TOO_MANY_TOKENS,
        codes::limits::NESTING_TOO_DEEP,
        codes::limits::STRING_TOO_LARGE,
        codes::limits::IDENTIFIER_TOO_LONG,
    ];

    for code in &build_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Build error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    crate::log_debug!("Tree builder limits",
        "max_source_size" => MAX_SOURCE_SIZE,
        "max_token_count" => MAX_TOKEN_COUNT,
        "max_nesting_depth" => MAX_NESTING_DEPTH,
        "max_string_size" => MAX_STRING_SIZE,
        "max_identifier_length" => MAX_IDENTIFIER_LENGTH
    );

    Ok(())
}

/// Compile-time limits in effect, for reporting
pub fn get_build_limits() -> BuildLimits {
    BuildLimits {
        max_source_size: MAX_SOURCE_SIZE,
        max_token_count: MAX_TOKEN_COUNT,
        max_nesting_depth: MAX_NESTING_DEPTH,
        max_string_size: MAX_STRING_SIZE,
        max_identifier_length: MAX_IDENTIFIER_LENGTH,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildLimits {
    pub max_source_size: usize,
    pub max_token_count: usize,
    pub max_nesting_depth: usize,
    pub max_string_size: usize,
    pub max_identifier_length: usize,
}
