use serde::Deserialize;

use crate::{
    bson::Bson,
    document::Document,
    error::{Error, Result},
    extjson::{registry::RegistryBuilder, ser::Encoder, Mode},
};

use super::{Lenient, model};

/// Integers up to this value are written bare. Larger ones are quoted so no reader parses them
/// into a double and loses precision.
const LONG_BARE_LIMIT: i64 = 1 << 53;

/// The 32-bit counterpart of [`LONG_BARE_LIMIT`].
const INT_BARE_LIMIT: i32 = 1 << 21;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NumberLong {
    #[serde(rename = "$numberLong")]
    value: Lenient,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NumberLongFunc {
    #[serde(rename = "$numberLongFunc")]
    body: FuncBody,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NumberInt {
    #[serde(rename = "$numberInt")]
    value: Lenient,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NumberIntFunc {
    #[serde(rename = "$numberIntFunc")]
    body: FuncBody,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct FuncBody {
    #[serde(rename = "N")]
    pub(super) value: Lenient,
}

fn parse_i64(hook: &str, value: &Lenient) -> Result<i64> {
    value
        .to_i64()
        .map_err(|message| Error::invalid_literal(hook, value.to_text(), message))
}

fn parse_i32(hook: &str, value: &Lenient) -> Result<i32> {
    let n = parse_i64(hook, value)?;
    i32::try_from(n).map_err(|_| {
        Error::invalid_literal(hook, value.to_text(), "out of range for a 32-bit integer")
    })
}

fn decode_long(doc: Document) -> Result<Bson> {
    let model: NumberLong = model("$numberLong", doc)?;
    parse_i64("$numberLong", &model.value).map(Bson::Int64)
}

fn decode_long_func(doc: Document) -> Result<Bson> {
    let model: NumberLongFunc = model("NumberLong", doc)?;
    parse_i64("NumberLong", &model.body.value).map(Bson::Int64)
}

fn decode_int(doc: Document) -> Result<Bson> {
    let model: NumberInt = model("$numberInt", doc)?;
    parse_i32("$numberInt", &model.value).map(Bson::Int32)
}

fn decode_int_func(doc: Document) -> Result<Bson> {
    let model: NumberIntFunc = model("NumberInt", doc)?;
    parse_i32("NumberInt", &model.body.value).map(Bson::Int32)
}

pub(super) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .keyed("$numberLong", decode_long)
        .keyed("$numberLongFunc", decode_long_func)
        .keyed("$numberInt", decode_int)
        .keyed("$numberIntFunc", decode_int_func)
        .constructor("NumberLong", "$numberLongFunc", &["N"])
        .constructor("NumberInt", "$numberIntFunc", &["N"])
}

/// Writes `{"<key>":N}` when `bare` and `{"<key>":"N"}` otherwise.
fn write_wrapped(encoder: &mut Encoder, key: &str, n: i64, bare: bool) {
    encoder.open_wrapper(key);
    if bare {
        encoder.push_display(n);
    } else {
        encoder.write_string(&n.to_string());
    }
    encoder.push_str("}");
}

/// A plain integer has no shell literal of its own; both modes write it bare up to the 64-bit
/// limit and as a quoted `$numberLong` above it.
pub(crate) fn write_integer(encoder: &mut Encoder, n: i64) {
    if n <= LONG_BARE_LIMIT {
        encoder.push_display(n);
    } else {
        write_wrapped(encoder, "$numberLong", n, false);
    }
}

pub(crate) fn write_int64(encoder: &mut Encoder, n: i64) {
    match encoder.mode() {
        Mode::Canonical => {
            write_wrapped(encoder, "$numberLong", n, n <= LONG_BARE_LIMIT)
        }
        Mode::Extended => encoder.push_display(format_args!("NumberLong({n})")),
    }
}

pub(crate) fn write_int32(encoder: &mut Encoder, n: i32) {
    match encoder.mode() {
        Mode::Canonical => write_wrapped(
            encoder,
            "$numberInt",
            n.into(),
            n <= INT_BARE_LIMIT,
        ),
        Mode::Extended => encoder.push_display(n),
    }
}

/// Doubles are written in their shortest round-tripping form, always with a fraction or an
/// exponent so they decode as doubles again.
pub(crate) fn write_double(encoder: &mut Encoder, f: f64) -> Result<()> {
    if !f.is_finite() {
        return Err(Error::encode(
            "double",
            format!("{f} has no extended JSON representation"),
        ));
    }
    encoder.push_display(format_args!("{f:?}"));
    Ok(())
}
