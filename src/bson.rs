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

//! The value model shared by the decoder and the encoder.

use std::fmt::{self, Display};

pub use crate::document::Document;
use crate::{
    Binary,
    DateTime,
    Decimal128,
    error::Result,
    extjson::{
        registry::Registry,
        ser::{self, Mode},
    },
    oid::ObjectId,
    spec::ElementType,
};

/// Possible extended JSON value types.
///
/// Every kind of value the codec can read or write is one variant here, so encoding is an
/// exhaustive match rather than a lookup by runtime type.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Bson {
    /// JSON `null`
    #[default]
    Null,
    /// Boolean value
    Boolean(bool),
    /// 32-bit signed integer (`NumberInt`, `$numberInt`)
    Int32(i32),
    /// 64-bit signed integer (`NumberLong`, `$numberLong`)
    Int64(i64),
    /// A plain integer literal without a width. Encoded bare up to 2^53 and as
    /// `{"$numberLong":"..."}` above that, in both modes.
    Integer(i64),
    /// 64-bit binary floating point
    Double(f64),
    /// [128-bit decimal floating point](https://github.com/mongodb/specifications/blob/master/source/bson-decimal128/decimal128.md)
    Decimal128(Decimal128),
    /// UTF-8 string
    String(String),
    /// Binary data
    Binary(Binary),
    /// UTC datetime
    DateTime(DateTime),
    /// Timestamp
    Timestamp(Timestamp),
    /// [ObjectId](http://dochub.mongodb.org/core/objectids)
    ObjectId(ObjectId),
    /// Regular expression
    RegularExpression(Regex),
    /// Undefined value
    Undefined,
    /// Min key
    MinKey,
    /// Max key
    MaxKey,
    /// Array
    Array(Array),
    /// Embedded document
    Document(Document),
}

/// Alias for `Vec<Bson>`.
pub type Array = Vec<Bson>;

impl Display for Bson {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Bson::Double(f) => write!(fmt, "{}", f),
            Bson::String(ref s) => write!(fmt, "\"{}\"", s),
            Bson::Array(ref vec) => {
                fmt.write_str("[")?;

                let mut first = true;
                for bson in vec {
                    if !first {
                        fmt.write_str(", ")?;
                    }

                    write!(fmt, "{}", bson)?;
                    first = false;
                }

                fmt.write_str("]")
            }
            Bson::Document(ref doc) => write!(fmt, "{}", doc),
            Bson::Boolean(b) => write!(fmt, "{}", b),
            Bson::Null => write!(fmt, "null"),
            Bson::RegularExpression(ref regex) => write!(fmt, "{}", regex),
            Bson::Int32(i) => write!(fmt, "NumberInt({})", i),
            Bson::Int64(i) => write!(fmt, "NumberLong({})", i),
            Bson::Integer(i) => write!(fmt, "{}", i),
            Bson::Timestamp(ref ts) => write!(fmt, "{}", ts),
            Bson::Binary(ref binary) => write!(
                fmt,
                "BinData({}, {})",
                u8::from(binary.subtype),
                binary.to_base64()
            ),
            Bson::ObjectId(ref id) => write!(fmt, "ObjectId(\"{}\")", id),
            Bson::DateTime(date_time) => write!(fmt, "ISODate(\"{}\")", date_time),
            Bson::Decimal128(ref d) => write!(fmt, "NumberDecimal(\"{}\")", d),
            Bson::Undefined => write!(fmt, "undefined"),
            Bson::MinKey => write!(fmt, "MinKey"),
            Bson::MaxKey => write!(fmt, "MaxKey"),
        }
    }
}

impl From<f32> for Bson {
    fn from(a: f32) -> Bson {
        Bson::Double(a as f64)
    }
}

impl From<f64> for Bson {
    fn from(a: f64) -> Bson {
        Bson::Double(a)
    }
}

impl From<&str> for Bson {
    fn from(s: &str) -> Bson {
        Bson::String(s.to_owned())
    }
}

impl From<String> for Bson {
    fn from(a: String) -> Bson {
        Bson::String(a)
    }
}

impl From<Document> for Bson {
    fn from(a: Document) -> Bson {
        Bson::Document(a)
    }
}

impl From<bool> for Bson {
    fn from(a: bool) -> Bson {
        Bson::Boolean(a)
    }
}

impl From<Regex> for Bson {
    fn from(regex: Regex) -> Bson {
        Bson::RegularExpression(regex)
    }
}

impl From<Binary> for Bson {
    fn from(binary: Binary) -> Bson {
        Bson::Binary(binary)
    }
}

impl From<Timestamp> for Bson {
    fn from(ts: Timestamp) -> Bson {
        Bson::Timestamp(ts)
    }
}

impl From<Decimal128> for Bson {
    fn from(d: Decimal128) -> Bson {
        Bson::Decimal128(d)
    }
}

impl From<DateTime> for Bson {
    fn from(dt: DateTime) -> Bson {
        Bson::DateTime(dt)
    }
}

impl<T> From<&T> for Bson
where
    T: Clone + Into<Bson>,
{
    fn from(t: &T) -> Bson {
        t.clone().into()
    }
}

impl<T> From<Vec<T>> for Bson
where
    T: Into<Bson>,
{
    fn from(v: Vec<T>) -> Bson {
        Bson::Array(v.into_iter().map(|val| val.into()).collect())
    }
}

impl<T> From<Option<T>> for Bson
where
    T: Into<Bson>,
{
    fn from(v: Option<T>) -> Bson {
        v.map(Into::into).unwrap_or(Bson::Null)
    }
}

impl<T: Into<Bson>> ::std::iter::FromIterator<T> for Bson {
    /// # Examples
    ///
    /// ```
    /// use std::iter::FromIterator;
    /// use mongoextjson::Bson;
    ///
    /// let x: Bson = Bson::from_iter(vec!["lorem", "ipsum", "dolor"]);
    /// // or
    /// let x: Bson = vec!["lorem", "ipsum", "dolor"].into_iter().collect();
    /// ```
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Bson::Array(iter.into_iter().map(Into::into).collect())
    }
}

impl From<i32> for Bson {
    fn from(a: i32) -> Bson {
        Bson::Int32(a)
    }
}

impl From<i64> for Bson {
    fn from(a: i64) -> Bson {
        Bson::Int64(a)
    }
}

impl From<[u8; 12]> for Bson {
    fn from(a: [u8; 12]) -> Bson {
        Bson::ObjectId(ObjectId::from_bytes(a))
    }
}

impl From<ObjectId> for Bson {
    fn from(a: ObjectId) -> Bson {
        Bson::ObjectId(a)
    }
}

impl Bson {
    /// Get the [`ElementType`] of this value.
    pub fn element_type(&self) -> ElementType {
        match *self {
            Bson::Null => ElementType::Null,
            Bson::Boolean(..) => ElementType::Boolean,
            Bson::Int32(..) => ElementType::Int32,
            Bson::Int64(..) => ElementType::Int64,
            Bson::Integer(..) => ElementType::Integer,
            Bson::Double(..) => ElementType::Double,
            Bson::Decimal128(..) => ElementType::Decimal128,
            Bson::String(..) => ElementType::String,
            Bson::Binary(..) => ElementType::Binary,
            Bson::DateTime(..) => ElementType::DateTime,
            Bson::Timestamp(..) => ElementType::Timestamp,
            Bson::ObjectId(..) => ElementType::ObjectId,
            Bson::RegularExpression(..) => ElementType::RegularExpression,
            Bson::Undefined => ElementType::Undefined,
            Bson::MinKey => ElementType::MinKey,
            Bson::MaxKey => ElementType::MaxKey,
            Bson::Array(..) => ElementType::Array,
            Bson::Document(..) => ElementType::Document,
        }
    }

    /// Encodes this value as canonical extended JSON: strict JSON with `$`-prefixed wrappers
    /// for the non-JSON kinds.
    ///
    /// ```
    /// # fn main() -> mongoextjson::error::Result<()> {
    /// use mongoextjson::Bson;
    ///
    /// assert_eq!(Bson::Undefined.to_canonical_string()?, r#"{"$undefined":true}"#);
    /// # Ok(())
    /// # }
    /// ```
    pub fn to_canonical_string(&self) -> Result<String> {
        ser::to_string(self, Mode::Canonical)
    }

    /// Encodes this value the way the MongoDB shell prints it, e.g. `ObjectId("...")`. The
    /// output is not JSON.
    pub fn to_extended_string(&self) -> Result<String> {
        ser::to_string(self, Mode::Extended)
    }

    /// The canonical `$`-keyed wrapper document standing for this value. Values that JSON can
    /// express directly have none.
    pub(crate) fn to_extended_document(&self) -> Option<Document> {
        let doc = match self {
            Bson::Int64(n) => crate::doc! { "$numberLong": n.to_string() },
            Bson::Decimal128(d) => crate::doc! { "$numberDecimal": d.to_string() },
            Bson::Binary(binary) => crate::doc! {
                "$binary": binary.to_base64(),
                "$type": format!("{:#x}", u8::from(binary.subtype)),
            },
            Bson::DateTime(date) => crate::doc! {
                "$date": { "$numberLong": date.timestamp_millis().to_string() }
            },
            Bson::Timestamp(ts) => crate::doc! {
                "$timestamp": {
                    "t": Bson::Integer(ts.time.into()),
                    "i": Bson::Integer(ts.increment.into()),
                }
            },
            Bson::ObjectId(oid) => crate::doc! { "$oid": oid.to_hex() },
            Bson::RegularExpression(regex) => crate::doc! {
                "$regex": regex.pattern.clone(),
                "$options": regex.options.clone(),
            },
            Bson::Undefined => crate::doc! { "$undefined": true },
            Bson::MinKey => crate::doc! { "$minKey": Bson::Integer(1) },
            Bson::MaxKey => crate::doc! { "$maxKey": Bson::Integer(1) },
            _ => return None,
        };
        Some(doc)
    }

    /// Turns a `$`-keyed wrapper document back into the value it stands for. Documents whose
    /// first key is not a wrapper key come back unchanged.
    pub(crate) fn from_extended_document(doc: Document) -> Result<Bson> {
        Registry::outer().interpret(doc)
    }
}

/// Value helpers
impl Bson {
    /// If `self` is [`Double`](Bson::Double), return its value as an `f64`. Returns [`None`]
    /// otherwise.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Bson::Double(v) => Some(v),
            _ => None,
        }
    }

    /// If `self` is [`String`](Bson::String), return its value as a `&str`. Returns [`None`]
    /// otherwise.
    pub fn as_str(&self) -> Option<&str> {
        match *self {
            Bson::String(ref s) => Some(s),
            _ => None,
        }
    }

    /// If `self` is [`Array`](Bson::Array), return its value. Returns [`None`] otherwise.
    pub fn as_array(&self) -> Option<&Array> {
        match *self {
            Bson::Array(ref v) => Some(v),
            _ => None,
        }
    }

    /// If `self` is [`Document`](Bson::Document), return its value. Returns [`None`] otherwise.
    pub fn as_document(&self) -> Option<&Document> {
        match *self {
            Bson::Document(ref v) => Some(v),
            _ => None,
        }
    }

    /// If `self` is [`Boolean`](Bson::Boolean), return its value. Returns [`None`] otherwise.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Bson::Boolean(v) => Some(v),
            _ => None,
        }
    }

    /// If `self` is [`Int32`](Bson::Int32), return its value. Returns [`None`] otherwise.
    pub fn as_i32(&self) -> Option<i32> {
        match *self {
            Bson::Int32(v) => Some(v),
            _ => None,
        }
    }

    /// If `self` is [`Int64`](Bson::Int64), return its value. Returns [`None`] otherwise.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Bson::Int64(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the value of any integer variant ([`Integer`](Bson::Integer),
    /// [`Int32`](Bson::Int32) or [`Int64`](Bson::Int64)) widened to `i64`.
    pub fn as_integer(&self) -> Option<i64> {
        match *self {
            Bson::Integer(v) | Bson::Int64(v) => Some(v),
            Bson::Int32(v) => Some(v.into()),
            _ => None,
        }
    }

    /// If `self` is [`ObjectId`](Bson::ObjectId), return its value. Returns [`None`] otherwise.
    pub fn as_object_id(&self) -> Option<ObjectId> {
        match *self {
            Bson::ObjectId(v) => Some(v),
            _ => None,
        }
    }

    /// If `self` is [`DateTime`](Bson::DateTime), return its value. Returns [`None`] otherwise.
    pub fn as_datetime(&self) -> Option<&DateTime> {
        match *self {
            Bson::DateTime(ref v) => Some(v),
            _ => None,
        }
    }

    /// If `self` is [`Timestamp`](Bson::Timestamp), return its value. Returns [`None`]
    /// otherwise.
    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match *self {
            Bson::Timestamp(timestamp) => Some(timestamp),
            _ => None,
        }
    }

    /// If `self` is [`Null`](Bson::Null), return `()`. Returns [`None`] otherwise.
    pub fn as_null(&self) -> Option<()> {
        match *self {
            Bson::Null => Some(()),
            _ => None,
        }
    }
}

/// Represents a BSON timestamp value.
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash)]
pub struct Timestamp {
    /// The number of seconds since the Unix epoch.
    pub time: u32,

    /// An incrementing value to order timestamps with the same number of seconds in the `time`
    /// field.
    pub increment: u32,
}

impl Display for Timestamp {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "Timestamp({}, {})", self.time, self.increment)
    }
}

/// Represents a regular expression. Only its textual form is carried; nothing here compiles
/// or validates the pattern.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Regex {
    /// The regex pattern to match.
    pub pattern: String,

    /// The options for the regex, kept exactly as written: 'i' for case insensitive
    /// matching, 'm' for multiline matching, 'x' for verbose mode, 'l' to make \w, \W, etc.
    /// locale dependent, 's' for dotall mode ('.' matches everything), and 'u' to make \w,
    /// \W, etc. match unicode.
    pub options: String,
}

impl Regex {
    /// Creates a new [`Regex`] from a pattern and an option string.
    pub fn new(pattern: impl AsRef<str>, options: impl AsRef<str>) -> Self {
        Self {
            pattern: pattern.as_ref().to_string(),
            options: options.as_ref().to_string(),
        }
    }
}

impl Display for Regex {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "/{}/{}", self.pattern, self.options)
    }
}
