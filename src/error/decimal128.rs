use thiserror::Error as ThisError;

use crate::error::{Error, ErrorKind};

/// The kinds of errors that can occur when parsing a [`Decimal128`](crate::Decimal128) from a
/// string.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[non_exhaustive]
pub enum Decimal128ErrorKind {
    /// An exponent marker was not followed by any digits.
    #[error("empty exponent")]
    EmptyExponent,

    /// The exponent could not be parsed.
    #[error("invalid exponent: {message}")]
    #[non_exhaustive]
    InvalidExponent {
        /// A message describing the error.
        message: String,
    },

    /// The coefficient could not be parsed.
    #[error("invalid coefficient: {message}")]
    #[non_exhaustive]
    InvalidCoefficient {
        /// A message describing the error.
        message: String,
    },

    /// The value is too large to be represented.
    #[error("overflow")]
    Overflow,

    /// The value is too small to be represented.
    #[error("underflow")]
    Underflow,

    /// Representing the value would require dropping non-zero digits.
    #[error("inexact rounding")]
    InexactRounding,

    /// The string is not a decimal number.
    #[error("unparseable")]
    Unparseable,
}

impl Error {
    pub(crate) fn decimal128(kind: Decimal128ErrorKind) -> Self {
        ErrorKind::Decimal128 { kind }.into()
    }

    #[cfg(test)]
    pub(crate) fn decimal128_kind(&self) -> Option<&Decimal128ErrorKind> {
        match &self.kind {
            ErrorKind::Decimal128 { kind } => Some(kind),
            _ => None,
        }
    }
}
