use std::fmt::{self, Display};

use crate::{
    base64,
    error::{Error, Result},
    spec::BinarySubtype,
};

/// Represents a binary value: a subtype tag and a byte payload.
///
/// Canonical extended JSON always writes the subtype, as a lowercase hex string:
/// `{"$binary":"Zm9v","$type":"0x2"}`. Shell mode writes it in decimal: `BinData(2,"Zm9v")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binary {
    /// The subtype of the bytes.
    pub subtype: BinarySubtype,

    /// The binary bytes.
    pub bytes: Vec<u8>,
}

impl Display for Binary {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(
            fmt,
            "Binary({:#x}, {})",
            u8::from(self.subtype),
            base64::encode(&self.bytes)
        )
    }
}

impl Binary {
    /// Creates a [`Binary`] from a base64 string and optional [`BinarySubtype`]. If the
    /// `subtype` argument is [`None`], the [`Binary`] constructed will default to
    /// [`BinarySubtype::Generic`].
    ///
    /// ```rust
    /// # use mongoextjson::{Binary, error::Result};
    /// # fn example() -> Result<()> {
    /// let binary = Binary::from_base64("aGVsbG8=", None)?;
    /// assert_eq!(binary.bytes, b"hello");
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_base64(
        input: impl AsRef<str>,
        subtype: impl Into<Option<BinarySubtype>>,
    ) -> Result<Self> {
        let input = input.as_ref();
        let bytes = base64::decode(input)
            .map_err(|e| Error::invalid_literal("$binary", input, e))?;
        let subtype = subtype.into().unwrap_or(BinarySubtype::Generic);
        Ok(Binary { subtype, bytes })
    }

    /// Creates a generic-subtype [`Binary`] owning `bytes`.
    pub fn generic(bytes: impl Into<Vec<u8>>) -> Self {
        Binary {
            subtype: BinarySubtype::Generic,
            bytes: bytes.into(),
        }
    }

    /// The payload as a standard-alphabet, padded base64 string.
    pub fn to_base64(&self) -> String {
        base64::encode(&self.bytes)
    }
}
