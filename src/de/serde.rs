use std::{fmt, vec};

use serde::de::{
    self,
    Deserialize,
    DeserializeSeed,
    Deserializer as _,
    EnumAccess,
    Error as _,
    MapAccess,
    SeqAccess,
    Unexpected,
    VariantAccess,
    Visitor,
};

use crate::{
    binary::Binary,
    bson::{Bson, Regex, Timestamp},
    datetime::DateTime,
    decimal128::Decimal128,
    document::{Document, IntoIter},
    error::{Error, Result},
    oid::ObjectId,
    spec::BinarySubtype,
};

struct BsonVisitor;

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer
            .deserialize_any(BsonVisitor)
            .and_then(|bson| match bson {
                Bson::String(oid) => ObjectId::parse_str(&oid).map_err(de::Error::custom),
                Bson::ObjectId(oid) => Ok(oid),
                other => Err(de::Error::invalid_type(
                    unexpected(&other),
                    &"an ObjectId or a hex string",
                )),
            })
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_map(BsonVisitor).and_then(|bson| {
            if let Bson::Document(doc) = bson {
                Ok(doc)
            } else {
                Err(de::Error::invalid_type(unexpected(&bson), &"a document"))
            }
        })
    }
}

impl<'de> Deserialize<'de> for Bson {
    #[inline]
    fn deserialize<D>(deserializer: D) -> std::result::Result<Bson, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_any(BsonVisitor)
    }
}

/// How a value shows up in a serde error message.
fn unexpected(value: &Bson) -> Unexpected<'_> {
    match value {
        Bson::Null => Unexpected::Unit,
        Bson::Boolean(b) => Unexpected::Bool(*b),
        Bson::Int32(n) => Unexpected::Signed((*n).into()),
        Bson::Int64(n) | Bson::Integer(n) => Unexpected::Signed(*n),
        Bson::Double(f) => Unexpected::Float(*f),
        Bson::String(s) => Unexpected::Str(s),
        Bson::Array(_) => Unexpected::Seq,
        Bson::Document(_) => Unexpected::Map,
        Bson::Binary(b) => Unexpected::Bytes(&b.bytes),
        Bson::Undefined => Unexpected::Other("undefined"),
        Bson::MinKey => Unexpected::Other("MinKey"),
        Bson::MaxKey => Unexpected::Other("MaxKey"),
        Bson::Decimal128(_) => Unexpected::Other("128-bit decimal"),
        Bson::DateTime(_) => Unexpected::Other("date"),
        Bson::Timestamp(_) => Unexpected::Other("timestamp"),
        Bson::ObjectId(_) => Unexpected::Other("ObjectId"),
        Bson::RegularExpression(_) => Unexpected::Other("regular expression"),
    }
}

impl<'de> Visitor<'de> for BsonVisitor {
    type Value = Bson;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an extended JSON value")
    }

    #[inline]
    fn visit_bool<E>(self, value: bool) -> std::result::Result<Bson, E>
    where
        E: de::Error,
    {
        Ok(Bson::Boolean(value))
    }

    #[inline]
    fn visit_i8<E>(self, value: i8) -> std::result::Result<Bson, E>
    where
        E: de::Error,
    {
        Ok(Bson::Int32(value.into()))
    }

    #[inline]
    fn visit_u8<E>(self, value: u8) -> std::result::Result<Bson, E>
    where
        E: de::Error,
    {
        Ok(Bson::Int32(value.into()))
    }

    #[inline]
    fn visit_i16<E>(self, value: i16) -> std::result::Result<Bson, E>
    where
        E: de::Error,
    {
        Ok(Bson::Int32(value.into()))
    }

    #[inline]
    fn visit_u16<E>(self, value: u16) -> std::result::Result<Bson, E>
    where
        E: de::Error,
    {
        Ok(Bson::Int32(value.into()))
    }

    #[inline]
    fn visit_i32<E>(self, value: i32) -> std::result::Result<Bson, E>
    where
        E: de::Error,
    {
        Ok(Bson::Int32(value))
    }

    #[inline]
    fn visit_u32<E>(self, value: u32) -> std::result::Result<Bson, E>
    where
        E: de::Error,
    {
        Ok(Bson::Int64(value.into()))
    }

    /// A bare 64-bit number carries no width, which is what [`Bson::Integer`] stands for.
    #[inline]
    fn visit_i64<E>(self, value: i64) -> std::result::Result<Bson, E>
    where
        E: de::Error,
    {
        Ok(Bson::Integer(value))
    }

    #[inline]
    fn visit_u64<E>(self, value: u64) -> std::result::Result<Bson, E>
    where
        E: de::Error,
    {
        match i64::try_from(value) {
            Ok(n) => Ok(Bson::Integer(n)),
            Err(_) => Err(E::custom(format!(
                "cannot represent {value} as a signed number"
            ))),
        }
    }

    #[inline]
    fn visit_f64<E>(self, value: f64) -> std::result::Result<Bson, E> {
        Ok(Bson::Double(value))
    }

    #[inline]
    fn visit_str<E>(self, value: &str) -> std::result::Result<Bson, E>
    where
        E: de::Error,
    {
        self.visit_string(String::from(value))
    }

    #[inline]
    fn visit_string<E>(self, value: String) -> std::result::Result<Bson, E> {
        Ok(Bson::String(value))
    }

    #[inline]
    fn visit_none<E>(self) -> std::result::Result<Bson, E> {
        Ok(Bson::Null)
    }

    #[inline]
    fn visit_some<D>(self, deserializer: D) -> std::result::Result<Bson, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    #[inline]
    fn visit_unit<E>(self) -> std::result::Result<Bson, E> {
        Ok(Bson::Null)
    }

    #[inline]
    fn visit_newtype_struct<D>(self, deserializer: D) -> std::result::Result<Bson, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    #[inline]
    fn visit_seq<V>(self, mut visitor: V) -> std::result::Result<Bson, V::Error>
    where
        V: SeqAccess<'de>,
    {
        let mut values = Vec::with_capacity(visitor.size_hint().unwrap_or(0));

        while let Some(elem) = visitor.next_element()? {
            values.push(elem);
        }

        Ok(Bson::Array(values))
    }

    /// Maps are read into a [`Document`] and then given to the keyed hooks, so a wrapper such
    /// as `{"$oid": "..."}` becomes the value it stands for.
    fn visit_map<V>(self, mut visitor: V) -> std::result::Result<Bson, V::Error>
    where
        V: MapAccess<'de>,
    {
        let mut doc = Document::new();
        while let Some((key, value)) = visitor.next_entry::<String, Bson>()? {
            doc.insert(key, value);
        }
        if !doc.first_key().is_some_and(|k| k.starts_with('$')) {
            return Ok(Bson::Document(doc));
        }
        Bson::from_extended_document(doc).map_err(V::Error::custom)
    }

    #[inline]
    fn visit_bytes<E>(self, v: &[u8]) -> std::result::Result<Bson, E>
    where
        E: de::Error,
    {
        Ok(Bson::Binary(Binary {
            subtype: BinarySubtype::Generic,
            bytes: v.to_vec(),
        }))
    }

    #[inline]
    fn visit_byte_buf<E>(self, v: Vec<u8>) -> std::result::Result<Bson, E>
    where
        E: de::Error,
    {
        Ok(Bson::Binary(Binary {
            subtype: BinarySubtype::Generic,
            bytes: v,
        }))
    }
}

/// Serde Deserializer
pub struct Deserializer {
    value: Option<Bson>,
}

impl Deserializer {
    /// A deserializer reading `value`.
    pub fn new(value: Bson) -> Deserializer {
        Deserializer { value: Some(value) }
    }

    fn take(&mut self) -> Result<Bson> {
        self.value
            .take()
            .ok_or_else(|| Error::deserialization("end of stream"))
    }

    /// Serves numeric requests straight from any integer width, so that a 64-bit integer binds
    /// to an `i64` field without going through its wrapper document.
    fn deserialize_number<'de, V>(mut self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Some(Bson::Int64(n)) => {
                self.value = None;
                visitor.visit_i64(n)
            }
            _ => self.deserialize_any(visitor),
        }
    }
}

macro_rules! forward_to_deserialize {
    ($(
        $name:ident ( $( $arg:ident : $ty:ty ),* ) => $target:ident;
    )*) => {
        $(
            #[inline]
            fn $name<V>(
                self,
                $(_: $ty,)*
                visitor: V,
            ) -> Result<V::Value>
                where V: Visitor<'de>
            {
                self.$target(visitor)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for Deserializer {
    type Error = Error;

    #[inline]
    fn deserialize_any<V>(mut self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let value = self.take()?;

        match value {
            Bson::Null => visitor.visit_unit(),
            Bson::Boolean(v) => visitor.visit_bool(v),
            Bson::Int32(v) => visitor.visit_i32(v),
            Bson::Integer(v) => visitor.visit_i64(v),
            Bson::Double(v) => visitor.visit_f64(v),
            Bson::String(v) => visitor.visit_string(v),
            Bson::Array(v) => {
                let len = v.len();
                visitor.visit_seq(SeqDeserializer {
                    iter: v.into_iter(),
                    len,
                    index: 0,
                })
            }
            Bson::Document(v) => {
                let len = v.len();
                visitor.visit_map(MapDeserializer {
                    iter: v.into_iter(),
                    value: None,
                    len,
                })
            }
            other => {
                let doc = other.to_extended_document().ok_or_else(|| {
                    Error::deserialization(format!("{other} has no wrapper document"))
                })?;
                let len = doc.len();
                visitor.visit_map(MapDeserializer {
                    iter: doc.into_iter(),
                    value: None,
                    len,
                })
            }
        }
    }

    #[inline]
    fn deserialize_bytes<V>(mut self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value.take() {
            Some(Bson::Binary(binary)) => visitor.visit_byte_buf(binary.bytes),
            value => Deserializer { value }.deserialize_any(visitor),
        }
    }

    #[inline]
    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    #[inline]
    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Some(Bson::Null) => visitor.visit_none(),
            Some(_) => visitor.visit_some(self),
            None => Err(Error::deserialization("end of stream")),
        }
    }

    #[inline]
    fn deserialize_enum<V>(
        mut self,
        _name: &str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let value = match self.take()? {
            Bson::Document(value) => value,
            Bson::String(variant) => {
                return visitor.visit_enum(EnumDeserializer {
                    val: Bson::String(variant),
                    deserializer: VariantDeserializer { val: None },
                });
            }
            other => {
                return Err(Error::invalid_type(unexpected(&other), &"an enum"));
            }
        };

        let mut iter = value.into_iter();

        let (variant, value) = match iter.next() {
            Some(v) => v,
            None => {
                return Err(Error::invalid_value(
                    Unexpected::Other("empty document"),
                    &"variant name",
                ));
            }
        };

        // An enum with data is a document with a single key.
        match iter.next() {
            Some((k, _)) => Err(Error::invalid_value(
                Unexpected::Map,
                &format!("a map with a single key, got extra key \"{k}\"").as_str(),
            )),
            None => visitor.visit_enum(EnumDeserializer {
                val: Bson::String(variant),
                deserializer: VariantDeserializer { val: Some(value) },
            }),
        }
    }

    #[inline]
    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    forward_to_deserialize! {
        deserialize_bool() => deserialize_any;
        deserialize_u8() => deserialize_number;
        deserialize_u16() => deserialize_number;
        deserialize_u32() => deserialize_number;
        deserialize_u64() => deserialize_number;
        deserialize_i8() => deserialize_number;
        deserialize_i16() => deserialize_number;
        deserialize_i32() => deserialize_number;
        deserialize_i64() => deserialize_number;
        deserialize_f32() => deserialize_number;
        deserialize_f64() => deserialize_number;
        deserialize_char() => deserialize_any;
        deserialize_str() => deserialize_any;
        deserialize_string() => deserialize_any;
        deserialize_unit() => deserialize_any;
        deserialize_seq() => deserialize_any;
        deserialize_map() => deserialize_any;
        deserialize_unit_struct(name: &'static str) => deserialize_any;
        deserialize_tuple_struct(name: &'static str, len: usize) => deserialize_any;
        deserialize_struct(name: &'static str, fields: &'static [&'static str]) => deserialize_any;
        deserialize_tuple(len: usize) => deserialize_any;
        deserialize_identifier() => deserialize_any;
        deserialize_ignored_any() => deserialize_any;
    }
}

struct EnumDeserializer {
    val: Bson,
    deserializer: VariantDeserializer,
}

impl<'de> EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: DeserializeSeed<'de>,
    {
        let dec = Deserializer::new(self.val);
        let value = seed.deserialize(dec)?;
        Ok((value, self.deserializer))
    }
}

struct VariantDeserializer {
    val: Option<Bson>,
}

impl VariantDeserializer {
    fn take(&mut self) -> Result<Bson> {
        self.val
            .take()
            .ok_or_else(|| Error::deserialization("end of stream"))
    }
}

impl<'de> VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(mut self) -> Result<()> {
        match self.val.take() {
            None => Ok(()),
            Some(val) => Bson::deserialize(Deserializer::new(val)).map(|_| ()),
        }
    }

    fn newtype_variant_seed<T>(mut self, seed: T) -> Result<T::Value>
    where
        T: DeserializeSeed<'de>,
    {
        seed.deserialize(Deserializer::new(self.take()?))
    }

    fn tuple_variant<V>(mut self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.take()? {
            Bson::Array(fields) => {
                let de = SeqDeserializer {
                    len: fields.len(),
                    iter: fields.into_iter(),
                    index: 0,
                };
                de.deserialize_any(visitor)
            }
            other => Err(Error::invalid_type(unexpected(&other), &"a tuple")),
        }
    }

    fn struct_variant<V>(
        mut self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.take()? {
            Bson::Document(fields) => {
                let de = MapDeserializer {
                    len: fields.len(),
                    iter: fields.into_iter(),
                    value: None,
                };
                de.deserialize_any(visitor)
            }
            other => Err(Error::invalid_type(unexpected(&other), &"a struct")),
        }
    }
}

struct SeqDeserializer {
    iter: vec::IntoIter<Bson>,
    len: usize,
    index: usize,
}

impl<'de> de::Deserializer<'de> for SeqDeserializer {
    type Error = Error;

    #[inline]
    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if self.len == 0 {
            visitor.visit_unit()
        } else {
            visitor.visit_seq(self)
        }
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}

impl<'de> SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        match self.iter.next() {
            None => Ok(None),
            Some(value) => {
                self.len -= 1;
                let index = self.index;
                self.index += 1;
                seed.deserialize(Deserializer::new(value))
                    .map(Some)
                    .map_err(|e| locate(e, |e| e.with_index(index)))
            }
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.len)
    }
}

struct MapDeserializer {
    iter: IntoIter,
    value: Option<(String, Bson)>,
    len: usize,
}

impl<'de> MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.len -= 1;
                let de = Deserializer::new(Bson::String(key.clone()));
                self.value = Some((key, value));
                seed.deserialize(de).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        let (key, value) = self
            .value
            .take()
            .ok_or_else(|| Error::deserialization("end of stream"))?;
        seed.deserialize(Deserializer::new(value))
            .map_err(|e| locate(e, |e| e.with_key(key)))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.len)
    }
}

impl<'de> de::Deserializer<'de> for MapDeserializer {
    type Error = Error;

    #[inline]
    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(self)
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}

/// Attaches a position to an error raised by a nested value, keeping the innermost one.
fn locate(error: Error, at: impl FnOnce(Error) -> Error) -> Error {
    if error.key.is_some() || error.index.is_some() {
        error
    } else {
        at(error)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        match Bson::deserialize(deserializer)? {
            Bson::Timestamp(timestamp) => Ok(timestamp),
            other => Err(D::Error::invalid_type(unexpected(&other), &"a timestamp")),
        }
    }
}

impl<'de> Deserialize<'de> for Regex {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        match Bson::deserialize(deserializer)? {
            Bson::RegularExpression(regex) => Ok(regex),
            other => Err(D::Error::invalid_type(
                unexpected(&other),
                &"a regular expression",
            )),
        }
    }
}

impl<'de> Deserialize<'de> for Binary {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        match Bson::deserialize(deserializer)? {
            Bson::Binary(binary) => Ok(binary),
            other => Err(D::Error::invalid_type(unexpected(&other), &"binary data")),
        }
    }
}

impl<'de> Deserialize<'de> for Decimal128 {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        match Bson::deserialize(deserializer)? {
            Bson::Decimal128(d128) => Ok(d128),
            other => Err(D::Error::invalid_type(
                unexpected(&other),
                &"a 128-bit decimal",
            )),
        }
    }
}

impl<'de> Deserialize<'de> for DateTime {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        match Bson::deserialize(deserializer)? {
            Bson::DateTime(dt) => Ok(dt),
            other => Err(D::Error::invalid_type(unexpected(&other), &"a date")),
        }
    }
}
