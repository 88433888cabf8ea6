//! [BSON Decimal128](https://github.com/mongodb/specifications/blob/master/source/bson-decimal128/decimal128.md) data type representation

use std::{fmt, str::FromStr};

use bigdecimal::{BigDecimal, ParseBigDecimalError, ToPrimitive, Zero, num_bigint::BigInt};

use crate::error::{Decimal128ErrorKind, Error, Result};

const EXPONENT_BIAS: i32 = 6176;
const EXPONENT_MAX: i32 = 6111;
const EXPONENT_MIN: i32 = -6176;
const MAX_DIGITS: u64 = 34;

const COEFFICIENT_HIGH_MASK: u64 = (1 << 49) - 1;
/// 10^34 - 1, the largest coefficient with 34 digits.
const MAX_COEFFICIENT: u128 = 9_999_999_999_999_999_999_999_999_999_999_999;

const NAN_HIGH: u64 = 0x7c00_0000_0000_0000;
const INFINITY_HIGH: u64 = 0x7800_0000_0000_0000;
const SIGN_BIT: u64 = 1 << 63;

/// Struct representing a BSON Decimal128 type.
///
/// The value is kept as its 16-byte IEEE 754-2008 binary integer decimal encoding. Conversion to
/// and from strings follows the BSON decimal128 string rules, so `"1.0"` and `"1.00"` are distinct
/// values that print back unchanged.
///
/// ```
/// # fn main() -> mongoextjson::error::Result<()> {
/// let d: mongoextjson::Decimal128 = "-12.50E+3".parse()?;
/// assert_eq!(d.to_string(), "-1.250E+4");
/// # Ok(())
/// # }
/// ```
#[derive(Copy, Clone, Hash, PartialEq, Eq)]
pub struct Decimal128 {
    /// BSON bytes containing the decimal128. Stored for round tripping.
    pub(crate) bytes: [u8; 16],
}

impl Decimal128 {
    /// Constructs a new `Decimal128` from the provided raw byte representation.
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self { bytes }
    }

    /// Constructs a `Decimal128` from the high and low 64-bit halves of its encoding.
    pub fn from_parts(high: u64, low: u64) -> Self {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&low.to_le_bytes());
        bytes[8..].copy_from_slice(&high.to_le_bytes());
        Self { bytes }
    }

    /// Returns the raw byte representation of this `Decimal128`.
    pub fn bytes(&self) -> [u8; 16] {
        self.bytes
    }

    fn high(&self) -> u64 {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&self.bytes[8..]);
        u64::from_le_bytes(buf)
    }

    fn low(&self) -> u64 {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&self.bytes[..8]);
        u64::from_le_bytes(buf)
    }

    fn unpack(&self) -> Unpacked {
        let high = self.high();
        let sign = high & SIGN_BIT != 0;

        if (high >> 61) & 0b11 == 0b11 {
            match (high >> 58) & 0b1_1111 {
                0b1_1111 => return Unpacked::NaN,
                0b1_1110 => return Unpacked::Infinity { sign },
                _ => {}
            }
            // The implied coefficient of the alternate form is always larger than the largest
            // legal coefficient, so it reads as zero.
            let exponent = ((high >> 47) & 0x3fff) as i32 - EXPONENT_BIAS;
            return Unpacked::Finite {
                sign,
                exponent,
                coefficient: 0,
            };
        }

        let exponent = ((high >> 49) & 0x3fff) as i32 - EXPONENT_BIAS;
        let mut coefficient = (u128::from(high & COEFFICIENT_HIGH_MASK) << 64) | u128::from(self.low());
        if coefficient > MAX_COEFFICIENT {
            coefficient = 0;
        }
        Unpacked::Finite {
            sign,
            exponent,
            coefficient,
        }
    }

    /// Whether this value is `NaN`.
    pub fn is_nan(&self) -> bool {
        matches!(self.unpack(), Unpacked::NaN)
    }

    /// Whether this value is positive or negative infinity.
    pub fn is_infinite(&self) -> bool {
        matches!(self.unpack(), Unpacked::Infinity { .. })
    }

    /// Whether the coefficient of this value is zero.
    pub fn is_zero(&self) -> bool {
        matches!(self.unpack(), Unpacked::Finite { coefficient: 0, .. })
    }
}

enum Unpacked {
    NaN,
    Infinity {
        sign: bool,
    },
    Finite {
        sign: bool,
        exponent: i32,
        coefficient: u128,
    },
}

impl fmt::Debug for Decimal128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decimal128({self})")
    }
}

impl fmt::Display for Decimal128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sign, exponent, coefficient) = match self.unpack() {
            Unpacked::NaN => return f.write_str("NaN"),
            Unpacked::Infinity { sign } => {
                return f.write_str(if sign { "-Infinity" } else { "Infinity" });
            }
            Unpacked::Finite {
                sign,
                exponent,
                coefficient,
            } => (sign, exponent, coefficient),
        };

        let mut out = String::new();
        if sign {
            out.push('-');
        }

        let digits = coefficient.to_string();
        let ndigits = digits.len() as i32;
        let adjusted = exponent + (ndigits - 1);

        if exponent <= 0 && adjusted >= -6 {
            let plain = BigDecimal::new(BigInt::from(coefficient), i64::from(-exponent));
            out.push_str(&plain.to_plain_string());
        } else {
            out.push_str(&digits[..1]);
            if ndigits > 1 {
                out.push('.');
                out.push_str(&digits[1..]);
            }
            out.push('E');
            if adjusted >= 0 {
                out.push('+');
            }
            out.push_str(&adjusted.to_string());
        }

        f.write_str(&out)
    }
}

impl FromStr for Decimal128 {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (sign, body) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let sign_bit = if sign { SIGN_BIT } else { 0 };

        if body.eq_ignore_ascii_case("nan") {
            return Ok(Self::from_parts(NAN_HIGH, 0));
        }
        if body.eq_ignore_ascii_case("inf") || body.eq_ignore_ascii_case("infinity") {
            return Ok(Self::from_parts(INFINITY_HIGH | sign_bit, 0));
        }

        validate(body)?;
        let parsed: BigDecimal = body.parse().map_err(|e| match e {
            ParseBigDecimalError::ParseInt(e) => invalid_exponent(e),
            ParseBigDecimalError::Other(message) => invalid_exponent(message),
            _ => Error::decimal128(Decimal128ErrorKind::Unparseable),
        })?;

        let mut ndigits = parsed.digits();
        let (mut digits, scale) = parsed.into_bigint_and_exponent();
        let mut exponent = scale
            .checked_neg()
            .ok_or_else(|| invalid_exponent("exponent out of range"))?;

        while ndigits > MAX_DIGITS {
            if !(&digits % 10u32).is_zero() {
                return Err(Error::decimal128(Decimal128ErrorKind::InexactRounding));
            }
            digits /= 10u32;
            ndigits -= 1;
            exponent = exponent.saturating_add(1);
        }
        let mut coefficient = digits.to_u128().ok_or_else(|| {
            Error::decimal128(Decimal128ErrorKind::InvalidCoefficient {
                message: format!("{digits} does not fit in 34 digits"),
            })
        })?;

        let (min, max) = (i64::from(EXPONENT_MIN), i64::from(EXPONENT_MAX));
        if exponent > max {
            if coefficient == 0 {
                exponent = max;
            } else {
                while exponent > max && coefficient <= MAX_COEFFICIENT / 10 {
                    coefficient *= 10;
                    exponent -= 1;
                }
                if exponent > max {
                    return Err(Error::decimal128(Decimal128ErrorKind::Overflow));
                }
            }
        }

        if exponent < min {
            if coefficient == 0 {
                exponent = min;
            } else {
                while exponent < min {
                    if coefficient % 10 != 0 {
                        return Err(Error::decimal128(Decimal128ErrorKind::Underflow));
                    }
                    coefficient /= 10;
                    exponent += 1;
                }
            }
        }

        let biased = (exponent + i64::from(EXPONENT_BIAS)) as u64;
        let high = sign_bit | (biased << 49) | (coefficient >> 64) as u64;
        Ok(Self::from_parts(high, coefficient as u64))
    }
}

fn invalid_exponent(message: impl ToString) -> Error {
    Error::decimal128(Decimal128ErrorKind::InvalidExponent {
        message: message.to_string(),
    })
}

/// Checks `body` is `digits[.digits][(e|E)[sign]digits]` with at least one coefficient digit.
fn validate(body: &str) -> Result<()> {
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(i) => (&body[..i], Some(&body[i + 1..])),
        None => (body, None),
    };

    if let Some(exponent) = exponent {
        let digits = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
        if digits.is_empty() {
            return Err(Error::decimal128(Decimal128ErrorKind::EmptyExponent));
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid_exponent(format!("{exponent:?} is not a number")));
        }
    }

    let mut points = 0;
    let mut has_digit = false;
    for b in mantissa.bytes() {
        match b {
            b'0'..=b'9' => has_digit = true,
            b'.' if points == 0 => points += 1,
            _ => return Err(Error::decimal128(Decimal128ErrorKind::Unparseable)),
        }
    }
    if !has_digit {
        return Err(Error::decimal128(Decimal128ErrorKind::InvalidCoefficient {
            message: "no digits".to_string(),
        }));
    }
    Ok(())
}

impl From<i64> for Decimal128 {
    fn from(n: i64) -> Self {
        let sign_bit = if n < 0 { SIGN_BIT } else { 0 };
        let biased = EXPONENT_BIAS as u64;
        Self::from_parts(sign_bit | (biased << 49), n.unsigned_abs())
    }
}

impl From<i32> for Decimal128 {
    fn from(n: i32) -> Self {
        Self::from(i64::from(n))
    }
}
