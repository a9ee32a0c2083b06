//! Error types for the decompose crate.

/// The input is not a well-formed hierarchical document.
///
/// This is the only error the decomposition engine produces: well-formed
/// input with an unexpected shape is preserved, never rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The XML parser rejected the input.
    #[error("malformed document at line {line}, column {column}: {reason}")]
    Malformed {
        line: u32,
        column: u32,
        reason: String,
    },
}

impl From<roxmltree::Error> for ParseError {
    fn from(err: roxmltree::Error) -> Self {
        let pos = err.pos();
        ParseError::Malformed {
            line: pos.row,
            column: pos.col,
            reason: err.to_string(),
        }
    }
}

/// Convenience alias for decomposition results.
pub type ParseResult<T> = Result<T, ParseError>;
