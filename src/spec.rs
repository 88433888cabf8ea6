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

//! Value kinds understood by the extended JSON codec.
/// http://bsonspec.org/spec.html

use std::{convert::From, fmt};

pub const BINARY_SUBTYPE_GENERIC                    : u8 = 0x00;
pub const BINARY_SUBTYPE_FUNCTION                   : u8 = 0x01;
pub const BINARY_SUBTYPE_BINARY_OLD                 : u8 = 0x02;
pub const BINARY_SUBTYPE_UUID_OLD                   : u8 = 0x03;
pub const BINARY_SUBTYPE_UUID                       : u8 = 0x04;
pub const BINARY_SUBTYPE_MD5                        : u8 = 0x05;
pub const BINARY_SUBTYPE_ENCRYPTED                  : u8 = 0x06;

/// The tag of a [`Bson`](crate::Bson) value. Reported in type mismatch errors.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ElementType {
    Null,
    Boolean,
    Int32,
    Int64,
    /// A plain integer literal that carries no BSON width.
    Integer,
    Double,
    Decimal128,
    String,
    Binary,
    DateTime,
    Timestamp,
    ObjectId,
    RegularExpression,
    Undefined,
    MinKey,
    MaxKey,
    Array,
    Document,
}

impl ElementType {
    /// Whether values of this kind are written by a dedicated formatter rather than as plain
    /// JSON structure.
    #[inline]
    pub fn is_extended(self) -> bool {
        use self::ElementType::*;
        !matches!(self, Null | Boolean | Integer | Double | String | Array | Document)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use self::ElementType::*;
        f.write_str(match self {
            Null                => "null",
            Boolean             => "boolean",
            Int32               => "32-bit integer",
            Int64               => "64-bit integer",
            Integer             => "integer",
            Double              => "double",
            Decimal128          => "decimal128",
            String              => "string",
            Binary              => "binary",
            DateTime            => "date",
            Timestamp           => "timestamp",
            ObjectId            => "object id",
            RegularExpression   => "regular expression",
            Undefined           => "undefined",
            MinKey              => "min key",
            MaxKey              => "max key",
            Array               => "array",
            Document            => "document",
        })
    }
}

/// The subtype of a [`Binary`](crate::Binary) value.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BinarySubtype {
    Generic,
    Function,
    BinaryOld,
    UuidOld,
    Uuid,
    Md5,
    Encrypted,
    UserDefined(u8),
}

impl From<BinarySubtype> for u8 {
    #[inline]
    fn from(t : BinarySubtype) -> u8 {
        match t {
            BinarySubtype::Generic         => BINARY_SUBTYPE_GENERIC,
            BinarySubtype::Function        => BINARY_SUBTYPE_FUNCTION,
            BinarySubtype::BinaryOld       => BINARY_SUBTYPE_BINARY_OLD,
            BinarySubtype::UuidOld         => BINARY_SUBTYPE_UUID_OLD,
            BinarySubtype::Uuid            => BINARY_SUBTYPE_UUID,
            BinarySubtype::Md5             => BINARY_SUBTYPE_MD5,
            BinarySubtype::Encrypted       => BINARY_SUBTYPE_ENCRYPTED,
            BinarySubtype::UserDefined(x)  => x,
        }
    }
}

impl From<u8> for BinarySubtype {
    #[inline]
    fn from(t : u8) -> BinarySubtype {
        match t {
            BINARY_SUBTYPE_GENERIC      => BinarySubtype::Generic,
            BINARY_SUBTYPE_FUNCTION     => BinarySubtype::Function,
            BINARY_SUBTYPE_BINARY_OLD   => BinarySubtype::BinaryOld,
            BINARY_SUBTYPE_UUID_OLD     => BinarySubtype::UuidOld,
            BINARY_SUBTYPE_UUID         => BinarySubtype::Uuid,
            BINARY_SUBTYPE_MD5          => BinarySubtype::Md5,
            BINARY_SUBTYPE_ENCRYPTED    => BinarySubtype::Encrypted,
            _                           => BinarySubtype::UserDefined(t),
        }
    }
}
