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

//! Serializer
//! Serializer

mod serde;

pub use self::serde::Serializer;

use std::fmt::Display;

#[rustfmt::skip]
use ::serde::{ser::Error as SerdeError, Serialize};

use crate::{
    bson::{Bson, Document},
    error::{Error, Result},
};

/// The newtype name [`Bson::Integer`] serializes under, so that [`Serializer`] can tell it
/// apart from a 64-bit integer. Other serializers see a plain number.
pub(crate) const INTEGER_NEWTYPE_NAME: &str = "$__extjson_integer";

/// The newtype name a typed value such as [`Bson::ObjectId`] serializes its wrapper document
/// under. [`Serializer`] turns the wrapper back into the typed value; other serializers see
/// the wrapper document.
pub(crate) const WRAPPER_NEWTYPE_NAME: &str = "$__extjson_wrapper";

/// Encode a `T` Serializable into a [`Bson`] value.
///
/// Signed integers of up to 32 bits become [`Bson::Int32`], wider ones [`Bson::Int64`]. Maps
/// and structs always become documents, even when their first key looks like a wrapper such
/// as `{"$oid": "..."}`.
pub fn to_bson<T>(value: &T) -> Result<Bson>
where
    T: Serialize + ?Sized,
{
    let ser = Serializer::new();
    value.serialize(ser)
}

/// Serialize a `T` Serializable into a [`Document`].
///
/// ```
/// # fn main() -> mongoextjson::error::Result<()> {
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let doc = mongoextjson::to_document(&Point { x: 1, y: -1 })?;
/// assert_eq!(doc, mongoextjson::doc! { "x": 1, "y": -1 });
/// # Ok(())
/// # }
/// ```
pub fn to_document<T>(value: &T) -> Result<Document>
where
    T: Serialize + ?Sized,
{
    match to_bson(value)? {
        Bson::Document(doc) => Ok(doc),
        bson => Err(Error::serialization(format!(
            "expected to serialize document, got type {:?} instead",
            bson.element_type()
        ))),
    }
}

impl SerdeError for Error {
    fn custom<T: Display>(msg: T) -> Error {
        Error::serialization(msg)
    }
}
