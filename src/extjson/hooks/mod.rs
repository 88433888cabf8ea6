//! The built-in literal types. Each module bundles the keyed hooks, the constructor and
//! constant registrations, and the two output formats of one type.

pub(crate) mod binary;
pub(crate) mod date;
pub(crate) mod dbref;
pub(crate) mod decimal;
pub(crate) mod key;
pub(crate) mod number;
pub(crate) mod oid;
pub(crate) mod regex;
pub(crate) mod timestamp;
pub(crate) mod undefined;

use std::fmt;

use serde::{
    Deserialize,
    de::{self, Visitor},
};

use crate::{
    document::Document,
    error::{Error, Result},
    extjson::registry::RegistryBuilder,
};

/// Adds every built-in hook to `builder`.
pub(crate) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    let builder = oid::register(builder);
    let builder = date::register(builder);
    let builder = binary::register(builder);
    let builder = timestamp::register(builder);
    let builder = number::register(builder);
    let builder = decimal::register(builder);
    let builder = regex::register(builder);
    let builder = key::register(builder);
    let builder = undefined::register(builder);
    dbref::register(builder)
}

/// Binds a hook body to its model, reporting failures against `hook`.
pub(super) fn model<T>(hook: &str, doc: Document) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let raw = doc.to_string();
    crate::de::from_document(doc).map_err(|e| Error::invalid_literal(hook, raw, e))
}

/// A number that may be written bare or quoted, as tools disagree on which one to use for the
/// numeric wrappers.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Lenient {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Lenient {
    pub(super) fn to_i64(&self) -> std::result::Result<i64, String> {
        match self {
            Lenient::Integer(n) => Ok(*n),
            Lenient::Float(f) => Err(format!("expected an integer, found {f:?}")),
            Lenient::Text(s) => s
                .parse()
                .map_err(|e| format!("cannot parse {s:?} as an integer: {e}")),
        }
    }

    /// The literal as decimal text.
    pub(super) fn to_text(&self) -> String {
        match self {
            Lenient::Integer(n) => n.to_string(),
            Lenient::Float(f) => format!("{f:?}"),
            Lenient::Text(s) => s.clone(),
        }
    }
}

impl<'de> Deserialize<'de> for Lenient {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct LenientVisitor;

        impl Visitor<'_> for LenientVisitor {
            type Value = Lenient;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a number or a string holding a number")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Lenient, E> {
                Ok(Lenient::Integer(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Lenient, E> {
                match i64::try_from(v) {
                    Ok(n) => Ok(Lenient::Integer(n)),
                    Err(_) => Ok(Lenient::Text(v.to_string())),
                }
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Lenient, E> {
                Ok(Lenient::Float(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Lenient, E> {
                Ok(Lenient::Text(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Lenient, E> {
                Ok(Lenient::Text(v))
            }
        }

        deserializer.deserialize_any(LenientVisitor)
    }
}

/// Parses an integer literal whose radix is given by its prefix: `0x` hex, `0o` or a bare
/// leading `0` octal, `0b` binary, decimal otherwise. A sign may precede the prefix.
pub(super) fn parse_prefixed_int(s: &str) -> Option<i64> {
    let (negative, digits) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, digits) = match digits.as_bytes() {
        [b'0', b'x' | b'X', ..] => (16, &digits[2..]),
        [b'0', b'o' | b'O', ..] => (8, &digits[2..]),
        [b'0', b'b' | b'B', ..] => (2, &digits[2..]),
        [b'0', _, ..] => (8, &digits[1..]),
        _ => (10, digits),
    };
    // from_str_radix would accept a second sign here.
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }
    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
