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

//! Deserializer

mod serde;

pub use self::serde::Deserializer;

use std::fmt::Display;

#[rustfmt::skip]
use ::serde::de::{self as serde_de, DeserializeOwned, Deserialize, Expected, Unexpected};

use crate::{
    bson::{Bson, Document},
    error::{Error, Result},
};

/// Deserialize a `T` from the provided [`Bson`] value.
///
/// Values with no JSON counterpart are presented to `T` as their canonical `$`-keyed wrapper
/// documents, except where `T` asks for a plain number, string or byte buffer that the value
/// can supply directly.
///
/// ```
/// # fn main() -> mongoextjson::error::Result<()> {
/// use serde::Deserialize;
/// use mongoextjson::{doc, oid::ObjectId};
///
/// #[derive(Deserialize)]
/// struct Item {
///     _id: ObjectId,
///     count: i32,
/// }
///
/// let id = ObjectId::new();
/// let item: Item = mongoextjson::from_document(doc! { "_id": id, "count": 3 })?;
/// assert_eq!(item._id, id);
/// assert_eq!(item.count, 3);
/// # Ok(())
/// # }
/// ```
pub fn from_bson<T>(bson: Bson) -> Result<T>
where
    T: DeserializeOwned,
{
    let de = Deserializer::new(bson);
    Deserialize::deserialize(de)
}

/// Deserialize a `T` from the provided [`Document`].
pub fn from_document<T>(doc: Document) -> Result<T>
where
    T: DeserializeOwned,
{
    from_bson(Bson::Document(doc))
}

impl serde_de::Error for Error {
    fn custom<T: Display>(msg: T) -> Error {
        Error::deserialization(msg)
    }

    fn invalid_type(unexp: Unexpected, exp: &dyn Expected) -> Error {
        Error::type_mismatch(exp, unexp)
    }
}
