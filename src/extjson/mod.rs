//! Decoding and encoding of [MongoDB Extended JSON v1](https://www.mongodb.com/docs/manual/reference/mongodb-extended-json-v1/),
//! including the literals printed by the MongoDB shell.
//!
//! ## Overview
//!
//! Extended JSON adds the BSON types that plain JSON lacks. They can be spelled two ways: as
//! `$`-keyed wrapper objects, which are still valid JSON, or as constructor calls and bare
//! constants in the style of the shell:
//!
//! ```text
//! {"_id": {"$oid": "5a934e000102030405000000"}, "n": {"$numberLong": "9007199254740993"}}
//! {_id: ObjectId("5a934e000102030405000000"), n: NumberLong(9007199254740993), k: MinKey,}
//! ```
//!
//! The decoder accepts both spellings, mixed freely, along with unquoted keys and trailing
//! commas. The encoder writes one of two [`Mode`]s:
//!   - [`Mode::Canonical`] produces strict JSON with wrapper objects.
//!   - [`Mode::Extended`] produces shell literals. This output is not JSON.
//!
//! Output never contains whitespace.
//!
//! ```rust
//! # fn main() -> mongoextjson::error::Result<()> {
//! use mongoextjson::{doc, oid::ObjectId};
//!
//! let id = ObjectId::parse_str("5a934e000102030405000000")?;
//! let doc = doc! { "_id": id, "n": 10_i64 };
//!
//! assert_eq!(
//!     doc.to_canonical_string()?,
//!     r#"{"_id":{"$oid":"5a934e000102030405000000"},"n":{"$numberLong":10}}"#
//! );
//! assert_eq!(
//!     doc.to_extended_string()?,
//!     r#"{"_id":ObjectId("5a934e000102030405000000"),"n":NumberLong(10)}"#
//! );
//! assert_eq!(mongoextjson::decode_document(doc.to_extended_string()?.as_bytes())?, doc);
//! # Ok(())
//! # }
//! ```
//!
//! ## Hooks
//!
//! Everything beyond plain JSON is driven by a [`Registry`](registry::Registry) of hooks:
//!   - a *keyed hook* fires when the first key of an object matches, e.g. `$oid`;
//!   - a *constructor* rewrites `Name(a, b)` into the object form of a keyed hook;
//!   - a *constant* gives a bare identifier such as `MinKey` its value.
//!
//! A keyed hook decodes its own object with a restricted registry that has no keyed hooks, which
//! keeps a hook from being re-entered by the literal it is parsing.

pub mod de;
pub(crate) mod hooks;
pub(crate) mod lexer;
pub mod registry;
pub mod ser;

pub use self::ser::Mode;
