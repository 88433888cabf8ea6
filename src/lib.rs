// The MIT License (MIT)

// Copyright (c) 2015 Y. T. Chung <zonyitoo@gmail.com>

// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:

// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! MongoDB Extended JSON v1 is JSON extended with the BSON types plain JSON has no room for:
//! object ids, dates, binary data, 64-bit and decimal numbers and a few sentinels. The MongoDB
//! shell prints the same values as constructor literals such as `ObjectId("...")`.
//!
//! This crate reads both spellings into a [`Bson`] value and writes values back out in either
//! of the two [`Mode`](extjson::Mode)s. The format itself is described in [`extjson`].
//!
//! ## Basic usage
//!
//! ```rust
//! # fn main() -> mongoextjson::error::Result<()> {
//! use mongoextjson::{Bson, oid::ObjectId};
//!
//! let doc = mongoextjson::decode_document(
//!     br#"{_id: ObjectId("5a934e000102030405000000"), tags: ["a", "b",], n: NumberInt(3)}"#,
//! )?;
//!
//! assert_eq!(doc.get_object_id("_id")?, ObjectId::parse_str("5a934e000102030405000000")?);
//! assert_eq!(doc.get("n"), Some(&Bson::Int32(3)));
//!
//! let json = mongoextjson::encode_canonical(&doc)?;
//! assert_eq!(
//!     json,
//!     br#"{"_id":{"$oid":"5a934e000102030405000000"},"tags":["a","b"],"n":{"$numberInt":3}}"#
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Typed targets
//!
//! Any [`serde`] type can be decoded into or encoded from, with the BSON types in this crate
//! standing in for fields that need them:
//!
//! ```rust
//! # fn main() -> mongoextjson::error::Result<()> {
//! use serde::{Deserialize, Serialize};
//! use mongoextjson::{DateTime, oid::ObjectId};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Event {
//!     _id: ObjectId,
//!     at: DateTime,
//!     count: i64,
//! }
//!
//! let event: Event = mongoextjson::decode(
//!     br#"{"_id": {"$oid": "5a934e000102030405000000"}, "at": ISODate("2020-01-02T03:04:05.006Z"), "count": NumberLong(7)}"#,
//! )?;
//! assert_eq!(event.count, 7);
//! assert_eq!(event.at.timestamp_millis(), 1_577_934_245_006);
//!
//! let shell = mongoextjson::encode_extended(&event)?;
//! assert_eq!(
//!     String::from_utf8_lossy(&shell),
//!     r#"{"_id":ObjectId("5a934e000102030405000000"),"at":ISODate("2020-01-02T03:04:05.006Z"),"count":NumberLong(7)}"#
//! );
//! # Ok(())
//! # }
//! ```

#![allow(clippy::cognitive_complexity, clippy::derive_partial_eq_without_eq)]
#![doc(html_root_url = "https://docs.rs/mongoextjson/0.1.0")]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

use serde::{Serialize, de::DeserializeOwned};

#[doc(inline)]
pub use self::{
    binary::Binary,
    bson::{Array, Bson, Document, Regex, Timestamp},
    datetime::DateTime,
    de::{Deserializer, from_bson, from_document},
    decimal128::Decimal128,
    extjson::{
        de::{decode_document_with, decode_with},
        registry::{Registry, RegistryBuilder},
        ser::Mode,
    },
    ser::{Serializer, to_bson, to_document},
};

#[macro_use]
mod macros;
mod base64;
pub mod binary;
mod bson;
pub mod datetime;
pub mod de;
pub mod decimal128;
pub mod document;
pub mod error;
pub mod extjson;
pub mod oid;
pub mod ser;
pub mod spec;

#[cfg(test)]
mod tests;

/// Decodes extended JSON in either spelling into a [`Bson`] value. Any value is accepted at the
/// top level.
pub fn decode_bson(bytes: &[u8]) -> error::Result<Bson> {
    decode_with(bytes, Registry::outer())
}

/// Decodes extended JSON whose top level is an object.
pub fn decode_document(bytes: &[u8]) -> error::Result<Document> {
    decode_document_with(bytes, Registry::outer())
}

/// Decodes extended JSON and binds the result to `T`. A value whose shape does not fit `T` is
/// reported as [`ErrorKind::TypeMismatch`](error::ErrorKind::TypeMismatch).
pub fn decode<T>(bytes: &[u8]) -> error::Result<T>
where
    T: DeserializeOwned,
{
    from_bson(decode_bson(bytes)?)
}

/// Encodes `value` as canonical extended JSON: strict, whitespace-free JSON.
pub fn encode_canonical<T>(value: &T) -> error::Result<Vec<u8>>
where
    T: Serialize + ?Sized,
{
    encode(value, Mode::Canonical)
}

/// Encodes `value` in the shell's constructor-literal syntax. The output is not JSON.
pub fn encode_extended<T>(value: &T) -> error::Result<Vec<u8>>
where
    T: Serialize + ?Sized,
{
    encode(value, Mode::Extended)
}

fn encode<T>(value: &T, mode: Mode) -> error::Result<Vec<u8>>
where
    T: Serialize + ?Sized,
{
    let bson = to_bson(value)?;
    let out = extjson::ser::to_string(&bson, mode)?;
    tracing::trace!(?mode, len = out.len(), "encoded extended JSON");
    Ok(out.into_bytes())
}
