mod datetime;
mod decimal128;
mod oid;

use thiserror::Error;

use crate::spec::ElementType;

pub use self::{
    datetime::DateTimeErrorKind,
    decimal128::Decimal128ErrorKind,
    oid::ObjectIdErrorKind,
};

pub type Result<T> = std::result::Result<T, Error>;

/// An error that can occur in the `mongoextjson` crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,

    /// The document key associated with the error, if any.
    pub key: Option<String>,

    /// The array index associated with the error, if any.
    pub index: Option<usize>,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(key) = self.key.as_deref() {
            write!(f, "Error at key \"{key}\": ")?;
        } else if let Some(index) = self.index {
            write!(f, "Error at array index {index}: ")?;
        }

        write!(f, "{}", self.kind)
    }
}

/// The types of errors that can occur in the `mongoextjson` crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The input violated the extended JSON grammar.
    #[error("syntax error at offset {offset}: {reason}")]
    #[non_exhaustive]
    Syntax {
        /// Byte offset of the offending token in the input.
        offset: usize,

        /// What went wrong.
        reason: String,
    },

    /// A decoded value did not have the shape the caller asked for.
    #[error("type mismatch: expected {expected}, found {actual}")]
    #[non_exhaustive]
    TypeMismatch {
        /// The requested shape.
        expected: String,

        /// The shape that was actually decoded.
        actual: String,
    },

    /// A hook recognized its trigger but the literal it was handed is invalid, e.g. a
    /// malformed date string or a `$minKey` value other than `1`.
    #[error("invalid {hook} literal `{raw}`: {message}")]
    #[non_exhaustive]
    InvalidLiteral {
        /// The key or constructor name of the hook that rejected the literal.
        hook: String,

        /// The literal text the hook was given.
        raw: String,

        /// A message describing the error.
        message: String,

        /// The underlying error, if the literal failed while being re-decoded.
        #[source]
        source: Option<Box<Error>>,
    },

    /// A value could not be written as extended JSON.
    #[error("cannot encode {type_name}: {message}")]
    #[non_exhaustive]
    Encode {
        /// The kind of value that could not be encoded.
        type_name: String,

        /// A message describing the error.
        message: String,
    },

    /// A key looked up in a document was not present.
    #[error("the key was not present in the document")]
    NotPresent,

    /// An error related to the [`ObjectId`](crate::oid::ObjectId) type occurred.
    #[error("An ObjectId-related error occurred: {kind}")]
    #[non_exhaustive]
    ObjectId {
        /// The kind of error that occurred.
        kind: ObjectIdErrorKind,
    },

    /// An error related to the [`Decimal128`](crate::Decimal128) type occurred.
    #[error("A Decimal128-related error occurred: {kind}")]
    #[non_exhaustive]
    Decimal128 {
        /// The kind of error that occurred.
        kind: Decimal128ErrorKind,
    },

    /// An error related to the [`DateTime`](crate::DateTime) type occurred.
    #[error("A DateTime-related error occurred: {kind}")]
    #[non_exhaustive]
    DateTime {
        /// The kind of error that occurred.
        kind: DateTimeErrorKind,
    },

    /// A general error raised while binding a [`Bson`](crate::Bson) into a target type.
    #[error("Deserialization error: {message}")]
    #[non_exhaustive]
    DeError {
        /// A message describing the error.
        message: String,
    },

    /// A general error raised while converting a value into [`Bson`](crate::Bson).
    #[error("Serialization error: {message}")]
    #[non_exhaustive]
    SerializationError {
        /// A message describing the error.
        message: String,
    },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self {
            kind,
            key: None,
            index: None,
        }
    }
}

impl Error {
    pub(crate) fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub(crate) fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub(crate) fn syntax(offset: usize, reason: impl ToString) -> Self {
        ErrorKind::Syntax {
            offset,
            reason: reason.to_string(),
        }
        .into()
    }

    pub(crate) fn type_mismatch(expected: impl ToString, actual: impl ToString) -> Self {
        ErrorKind::TypeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
        .into()
    }

    pub(crate) fn unexpected_type(expected: ElementType, actual: ElementType) -> Self {
        Self::type_mismatch(format!("{expected:?}"), format!("{actual:?}"))
    }

    pub(crate) fn invalid_literal(hook: impl ToString, raw: impl ToString, message: impl ToString) -> Self {
        ErrorKind::InvalidLiteral {
            hook: hook.to_string(),
            raw: raw.to_string(),
            message: message.to_string(),
            source: None,
        }
        .into()
    }

    /// Wraps this error as an `InvalidLiteral` raised by `hook` for `raw`. Errors that
    /// already are `InvalidLiteral` pass through untouched so the innermost hook is reported.
    pub(crate) fn into_invalid_literal(self, hook: &str, raw: &[u8]) -> Self {
        if matches!(self.kind, ErrorKind::InvalidLiteral { .. }) {
            return self;
        }
        ErrorKind::InvalidLiteral {
            hook: hook.to_string(),
            raw: String::from_utf8_lossy(raw).into_owned(),
            message: self.to_string(),
            source: Some(Box::new(self)),
        }
        .into()
    }

    /// Maps the offsets of syntax errors, including those wrapped by a hook, from a re-decoded
    /// span back into the buffer it was cut from.
    pub(crate) fn relocate(self, map: &dyn Fn(usize) -> usize) -> Self {
        let Error { kind, key, index } = self;
        let kind = match kind {
            ErrorKind::Syntax { offset, reason } => ErrorKind::Syntax {
                offset: map(offset),
                reason,
            },
            ErrorKind::InvalidLiteral {
                hook,
                raw,
                source: Some(source),
                ..
            } => {
                let source = source.relocate(map);
                ErrorKind::InvalidLiteral {
                    hook,
                    raw,
                    message: source.to_string(),
                    source: Some(Box::new(source)),
                }
            }
            other => other,
        };
        Error { kind, key, index }
    }

    pub(crate) fn encode(type_name: impl ToString, message: impl ToString) -> Self {
        ErrorKind::Encode {
            type_name: type_name.to_string(),
            message: message.to_string(),
        }
        .into()
    }

    pub(crate) fn not_present() -> Self {
        ErrorKind::NotPresent.into()
    }

    pub(crate) fn deserialization(message: impl ToString) -> Self {
        ErrorKind::DeError {
            message: message.to_string(),
        }
        .into()
    }

    pub(crate) fn serialization(message: impl ToString) -> Self {
        ErrorKind::SerializationError {
            message: message.to_string(),
        }
        .into()
    }

    /// Whether this error is a grammar violation.
    pub fn is_syntax(&self) -> bool {
        matches!(self.kind, ErrorKind::Syntax { .. })
    }

    /// Whether this error is a shape mismatch between the decoded value and the target.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self.kind, ErrorKind::TypeMismatch { .. })
    }

    /// Whether this error was raised by a hook rejecting its literal.
    pub fn is_invalid_literal(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidLiteral { .. })
    }
}
