//! Parse errors
//!
//! Every error is fatal for the whole description. Each variant records the line it
//! was raised on and the offending text.

/// Error raised while parsing a pipeline description
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A keyword was expected but the text is not one the current block accepts
    #[error("line {line}: unknown token `{token}`")]
    UnknownToken { token: String, line: usize },

    /// A field line has no `:` separator
    #[error("line {line}: expected `keyword: value`, found `{text}`")]
    MissingColon { text: String, line: usize },

    /// A boolean field is not one of `yes`, `no`, `true`, `false`
    #[error("line {line}: `{value}` is not a boolean for `{field}`")]
    MalformedBoolean { field: String, value: String, line: usize },

    /// A bracketed list is unterminated or contains an entry of the wrong shape
    #[error("line {line}: malformed {context} list at `{token}`")]
    MalformedList { context: &'static str, token: String, line: usize },

    /// A scalar field value does not name a known literal or number
    #[error("line {line}: invalid value `{value}` for `{field}`")]
    MalformedValue { field: String, value: String, line: usize },

    /// `source:` is not followed by an opening backtick fence
    #[error("line {line}: expected a backtick fence after `source:`, found `{found}`")]
    MissingFence { found: String, line: usize },

    /// A `vsh:` or `fsh:` block ended without a `source:` field
    #[error("line {line}: `{stage}` block has no `source:` field")]
    MissingSource { stage: String, line: usize },

    /// The input ended inside a construct that needs a terminator
    #[error("line {line}: unexpected end of input in {context}")]
    UnexpectedEndOfInput { context: &'static str, line: usize },
}

impl ParseError {
    /// Line on which the error was raised, 1-based
    pub fn line(&self) -> usize {
        match self {
            Self::UnknownToken { line, .. }
            | Self::MissingColon { line, .. }
            | Self::MalformedBoolean { line, .. }
            | Self::MalformedList { line, .. }
            | Self::MalformedValue { line, .. }
            | Self::MissingFence { line, .. }
            | Self::MissingSource { line, .. }
            | Self::UnexpectedEndOfInput { line, .. } => *line,
        }
    }
}
