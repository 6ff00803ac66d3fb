//! Error types for filter and metric parsing.

use thiserror::Error;

/// Errors that can occur while lexing, parsing, or resolving a query request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// Character the lexer has no rule for (strict mode only).
    #[error("unrecognized character '{character}' at byte {position}")]
    LexicalGap {
        /// The offending character.
        character: char,
        /// Byte offset in the input where it occurred.
        position: usize,
    },

    /// Unexpected token during recursive descent.
    #[error("syntax error at token {position}: expected {expected}, found '{found}'")]
    SyntaxError {
        /// What the parser was looking for.
        expected: &'static str,
        /// Literal text of the token it found instead.
        found: String,
        /// Ordinal index of the offending token.
        position: usize,
    },

    /// Text did not match any member of an alias family.
    #[error("'{value}' is not a known {family}")]
    UnknownAlias {
        /// Name of the enum family that was searched.
        family: &'static str,
        /// The text that failed to resolve.
        value: String,
    },

    /// Condition identifier matched no dispatch rule.
    #[error("unknown identifier or unsupported filter: {0}")]
    UnknownIdentifier(String),

    /// Metric name matched no KPI.
    #[error("unknown KPI/metric '{0}'")]
    UnknownKpi(String),

    /// Group-by name matched no grouping dimension.
    #[error("unknown group: {0}")]
    UnknownGroupBy(String),

    /// Malformed `KPI:bins:lower:upper` distribution spec.
    #[error("invalid distribution spec '{spec}': {reason}")]
    InvalidDistributionSpec {
        /// The offending spec text.
        spec: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Construction-time invariant violated (distribution bounds, logical arity).
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// Value token where an integer was required.
    #[error("invalid integer literal '{0}'")]
    InvalidNumber(String),

    /// Value token where an ISO-8601 calendar date was required.
    #[error("invalid date literal '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),
}

/// Result type for filter and metric operations.
pub type FilterResult<T> = std::result::Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_display() {
        let err = FilterError::SyntaxError {
            expected: "COMPARISON",
            found: ")".to_string(),
            position: 3,
        };
        assert_eq!(
            err.to_string(),
            "syntax error at token 3: expected COMPARISON, found ')'"
        );
    }

    #[test]
    fn test_unknown_alias_display() {
        let err = FilterError::UnknownAlias {
            family: "sex",
            value: "MARTIAN".to_string(),
        };
        assert_eq!(err.to_string(), "'MARTIAN' is not a known sex");
    }

    #[test]
    fn test_invalid_distribution_spec_display() {
        let err = FilterError::InvalidDistributionSpec {
            spec: "DTN:12:0".to_string(),
            reason: "expected 4 colon-separated fields, got 3".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid distribution spec 'DTN:12:0': expected 4 colon-separated fields, got 3"
        );
    }
}
