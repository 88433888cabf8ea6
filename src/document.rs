//! A document represented as an associative map with insertion ordering.

use std::{
    fmt::{self, Debug, Display, Formatter},
    iter::{Extend, FromIterator, IntoIterator},
};

use ahash::RandomState;
use indexmap::IndexMap;

use crate::{
    bson::{Array, Bson, Timestamp},
    error::{Error, Result},
    extjson::ser::{self, Mode},
    oid::ObjectId,
    spec::ElementType,
    Binary,
    DateTime,
    Decimal128,
};

/// An ordered map of `String` keys to [`Bson`] values.
///
/// Keys keep the order in which they were first inserted; replacing the value of an existing key
/// keeps its position. This is what lets a decoded object encode back with its keys in the same
/// order.
#[derive(Clone, PartialEq)]
pub struct Document {
    inner: IndexMap<String, Bson, RandomState>,
}

impl Default for Document {
    fn default() -> Self {
        Document::new()
    }
}

impl Display for Document {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        fmt.write_str("{")?;

        let mut first = true;
        for (k, v) in self {
            if first {
                first = false;
                fmt.write_str(" ")?;
            } else {
                fmt.write_str(", ")?;
            }

            write!(fmt, "\"{}\": {}", k, v)?;
        }

        write!(fmt, "{}}}", if !first { " " } else { "" })
    }
}

impl Debug for Document {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        write!(fmt, "Document(")?;
        Debug::fmt(&self.inner, fmt)?;
        write!(fmt, ")")
    }
}

/// An owning iterator over Document entries.
pub struct IntoIter {
    inner: indexmap::map::IntoIter<String, Bson>,
}

/// An iterator over Document entries.
pub struct Iter<'a> {
    inner: indexmap::map::Iter<'a, String, Bson>,
}

/// An iterator over a Document's keys.
pub struct Keys<'a> {
    inner: indexmap::map::Keys<'a, String, Bson>,
}

/// An iterator over a Document's values.
pub struct Values<'a> {
    inner: indexmap::map::Values<'a, String, Bson>,
}

impl<'a> Iterator for Keys<'a> {
    type Item = &'a String;

    fn next(&mut self) -> Option<&'a String> {
        self.inner.next()
    }
}

impl<'a> Iterator for Values<'a> {
    type Item = &'a Bson;

    fn next(&mut self) -> Option<&'a Bson> {
        self.inner.next()
    }
}

impl IntoIterator for Document {
    type Item = (String, Bson);
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.inner.into_iter(),
        }
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Bson);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            inner: self.inner.iter(),
        }
    }
}

impl FromIterator<(String, Bson)> for Document {
    fn from_iter<T: IntoIterator<Item = (String, Bson)>>(iter: T) -> Self {
        let mut doc = Document::new();
        for (k, v) in iter {
            doc.insert(k, v);
        }
        doc
    }
}

impl Iterator for IntoIter {
    type Item = (String, Bson);

    fn next(&mut self) -> Option<(String, Bson)> {
        self.inner.next()
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a String, &'a Bson);

    fn next(&mut self) -> Option<(&'a String, &'a Bson)> {
        self.inner.next()
    }
}

impl Document {
    /// Creates a new empty Document.
    pub fn new() -> Document {
        Document {
            inner: IndexMap::default(),
        }
    }

    /// Gets an iterator over the entries of the map.
    pub fn iter(&self) -> Iter<'_> {
        self.into_iter()
    }

    /// Clears the document, removing all values.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Returns a reference to the Bson corresponding to the key.
    pub fn get(&self, key: impl AsRef<str>) -> Option<&Bson> {
        self.inner.get(key.as_ref())
    }

    /// Gets a mutable reference to the Bson corresponding to the key
    pub fn get_mut(&mut self, key: impl AsRef<str>) -> Option<&mut Bson> {
        self.inner.get_mut(key.as_ref())
    }

    /// The first key in insertion order, the one that selects a keyed hook.
    pub fn first_key(&self) -> Option<&str> {
        self.inner.first().map(|(k, _)| k.as_str())
    }

    fn get_typed<'a, T>(
        &'a self,
        key: &str,
        expected: ElementType,
        accessor: impl FnOnce(&'a Bson) -> Option<T>,
    ) -> Result<T> {
        match self.get(key) {
            Some(value) => accessor(value)
                .ok_or_else(|| Error::unexpected_type(expected, value.element_type()).with_key(key)),
            None => Err(Error::not_present().with_key(key)),
        }
    }

    /// Get a floating point value for this key if it exists and has the correct type.
    pub fn get_f64(&self, key: impl AsRef<str>) -> Result<f64> {
        self.get_typed(key.as_ref(), ElementType::Double, Bson::as_f64)
    }

    /// Get a reference to a Decimal128 value for key, if it exists.
    pub fn get_decimal128(&self, key: impl AsRef<str>) -> Result<&Decimal128> {
        self.get_typed(key.as_ref(), ElementType::Decimal128, |v| match v {
            Bson::Decimal128(d) => Some(d),
            _ => None,
        })
    }

    /// Get a string slice this key if it exists and has the correct type.
    pub fn get_str(&self, key: impl AsRef<str>) -> Result<&str> {
        self.get_typed(key.as_ref(), ElementType::String, Bson::as_str)
    }

    /// Get a reference to an array for this key if it exists and has the correct type.
    pub fn get_array(&self, key: impl AsRef<str>) -> Result<&Array> {
        self.get_typed(key.as_ref(), ElementType::Array, Bson::as_array)
    }

    /// Get a reference to a document for this key if it exists and has the correct type.
    pub fn get_document(&self, key: impl AsRef<str>) -> Result<&Document> {
        self.get_typed(key.as_ref(), ElementType::Document, Bson::as_document)
    }

    /// Get a bool value for this key if it exists and has the correct type.
    pub fn get_bool(&self, key: impl AsRef<str>) -> Result<bool> {
        self.get_typed(key.as_ref(), ElementType::Boolean, Bson::as_bool)
    }

    /// Returns whether this key has a null value
    pub fn is_null(&self, key: impl AsRef<str>) -> bool {
        self.get(key) == Some(&Bson::Null)
    }

    /// Get an i32 value for this key if it exists and has the correct type.
    pub fn get_i32(&self, key: impl AsRef<str>) -> Result<i32> {
        self.get_typed(key.as_ref(), ElementType::Int32, Bson::as_i32)
    }

    /// Get an i64 value for this key if it exists and is a 64-bit integer.
    pub fn get_i64(&self, key: impl AsRef<str>) -> Result<i64> {
        self.get_typed(key.as_ref(), ElementType::Int64, |v| match v {
            Bson::Int64(n) => Some(*n),
            _ => None,
        })
    }

    /// Get an integer for this key whatever its width: a plain literal, a 32-bit or a 64-bit
    /// integer.
    pub fn get_integer(&self, key: impl AsRef<str>) -> Result<i64> {
        self.get_typed(key.as_ref(), ElementType::Integer, Bson::as_integer)
    }

    /// Get a time stamp value for this key if it exists and has the correct type.
    pub fn get_timestamp(&self, key: impl AsRef<str>) -> Result<Timestamp> {
        self.get_typed(key.as_ref(), ElementType::Timestamp, Bson::as_timestamp)
    }

    /// Get a reference to a binary value for this key if it exists and has the correct type.
    pub fn get_binary(&self, key: impl AsRef<str>) -> Result<&Binary> {
        self.get_typed(key.as_ref(), ElementType::Binary, |v| match v {
            Bson::Binary(b) => Some(b),
            _ => None,
        })
    }

    /// Get an object id value for this key if it exists and has the correct type.
    pub fn get_object_id(&self, key: impl AsRef<str>) -> Result<ObjectId> {
        self.get_typed(key.as_ref(), ElementType::ObjectId, Bson::as_object_id)
    }

    /// Get a date value for this key if it exists and has the correct type.
    pub fn get_datetime(&self, key: impl AsRef<str>) -> Result<&DateTime> {
        self.get_typed(key.as_ref(), ElementType::DateTime, Bson::as_datetime)
    }

    /// Returns true if the map contains a value for the specified key.
    pub fn contains_key(&self, key: impl AsRef<str>) -> bool {
        self.inner.contains_key(key.as_ref())
    }

    /// Gets a collection of all keys in the document.
    pub fn keys(&self) -> Keys<'_> {
        Keys {
            inner: self.inner.keys(),
        }
    }

    /// Gets a collection of all values in the document.
    pub fn values(&self) -> Values<'_> {
        Values {
            inner: self.inner.values(),
        }
    }

    /// Returns the number of elements in the document.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if the document contains no elements
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Sets the value of the entry with the key, and returns the entry's old value. A key that
    /// is already present keeps its position.
    pub fn insert<KT: Into<String>, BT: Into<Bson>>(&mut self, key: KT, val: BT) -> Option<Bson> {
        self.inner.insert(key.into(), val.into())
    }

    /// Takes the value of the entry out of the document, and returns it.
    /// Computes in **O(n)** time (average).
    pub fn remove(&mut self, key: impl AsRef<str>) -> Option<Bson> {
        self.inner.shift_remove(key.as_ref())
    }

    /// Encodes this document as canonical extended JSON.
    ///
    /// ```
    /// # fn main() -> mongoextjson::error::Result<()> {
    /// use mongoextjson::doc;
    ///
    /// let doc = doc! { "n": 10_i64 };
    /// assert_eq!(doc.to_canonical_string()?, r#"{"n":{"$numberLong":10}}"#);
    /// # Ok(())
    /// # }
    /// ```
    pub fn to_canonical_string(&self) -> Result<String> {
        ser::document_to_string(self, Mode::Canonical)
    }

    /// Encodes this document as shell-mode extended JSON.
    pub fn to_extended_string(&self) -> Result<String> {
        ser::document_to_string(self, Mode::Extended)
    }
}

impl Extend<(String, Bson)> for Document {
    fn extend<T: IntoIterator<Item = (String, Bson)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}
