//! Errors raised while parsing templates and encoding fields.

/// Everything that can go wrong between a template string and a raw buffer.
///
/// `MissingBrackets`, `InvalidSize`, `InvalidDefault` and `Syntax` are the
/// format errors of a single token; [`TemplateError::Token`] wraps one of them
/// with the token text and line it came from.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("missing size brackets in `{0}`")]
    MissingBrackets(String),
    #[error("invalid size `{size}` in `{token}`")]
    InvalidSize { token: String, size: String },
    #[error("invalid default value `{value}` in `{token}`")]
    InvalidDefault { token: String, value: String },
    #[error("malformed field `{token}`: {message}")]
    Syntax { token: String, message: String },
    #[error("failed to read `{token}` at line {line}: {source}")]
    Token {
        token: String,
        line: usize,
        #[source]
        source: Box<TemplateError>,
    },
    #[error("field `{name}` is {size} bytes wide, above the {max} byte limit")]
    FieldTooLarge { name: String, size: usize, max: usize },
    #[error("encoded length overflows")]
    LengthOverflow,
    #[error("field `{0}` has no value")]
    Unset(String),
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
}

impl TemplateError {
    /// True for malformed template text (with or without location).
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            TemplateError::MissingBrackets(_)
                | TemplateError::InvalidSize { .. }
                | TemplateError::InvalidDefault { .. }
                | TemplateError::Syntax { .. }
                | TemplateError::Token { .. }
        )
    }

    /// Line of the offending token, when the error came from a whole template.
    pub fn line(&self) -> Option<usize> {
        match self {
            TemplateError::Token { line, .. } => Some(*line),
            _ => None,
        }
    }
}
