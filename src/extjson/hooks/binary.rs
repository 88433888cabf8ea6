use serde::Deserialize;

use crate::{
    binary::Binary,
    bson::Bson,
    document::Document,
    error::{Error, Result},
    extjson::{registry::RegistryBuilder, ser::Encoder, Mode},
    spec::BinarySubtype,
};

use super::{Lenient, model, parse_prefixed_int};

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct BinaryLiteral {
    #[serde(rename = "$binary")]
    base64: String,

    #[serde(rename = "$type", default)]
    subtype: Option<Lenient>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct BinaryFunc {
    #[serde(rename = "$binaryFunc")]
    body: BinaryLiteral,
}

impl BinaryLiteral {
    fn parse(self, hook: &str) -> Result<Bson> {
        let subtype = match self.subtype {
            None => BinarySubtype::Generic,
            Some(subtype) => parse_subtype(hook, &subtype)?,
        };
        Ok(Bson::Binary(Binary::from_base64(&self.base64, subtype)?))
    }
}

/// A subtype is a number or a string holding an integer literal (`"0x80"`, `"2"`), in
/// `0..=255`.
fn parse_subtype(hook: &str, subtype: &Lenient) -> Result<BinarySubtype> {
    let value = match subtype {
        Lenient::Integer(n) => Some(*n),
        Lenient::Text(s) => parse_prefixed_int(s),
        Lenient::Float(_) => None,
    };
    value
        .and_then(|n| u8::try_from(n).ok())
        .map(BinarySubtype::from)
        .ok_or_else(|| {
            Error::invalid_literal(
                hook,
                subtype.to_text(),
                "binary subtype must be an integer in 0..=255",
            )
        })
}

fn decode_binary(doc: Document) -> Result<Bson> {
    let model: BinaryLiteral = model("$binary", doc)?;
    model.parse("$binary")
}

fn decode_binary_func(doc: Document) -> Result<Bson> {
    let model: BinaryFunc = model("BinData", doc)?;
    if model.body.subtype.is_none() {
        return Err(Error::invalid_literal(
            "BinData",
            &model.body.base64,
            "missing subtype",
        ));
    }
    model.body.parse("BinData")
}

pub(super) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .keyed("$binary", decode_binary)
        .keyed("$binaryFunc", decode_binary_func)
        .constructor("BinData", "$binaryFunc", &["$type", "$binary"])
}

pub(crate) fn write(encoder: &mut Encoder, binary: &Binary) {
    let subtype = u8::from(binary.subtype);
    match encoder.mode() {
        Mode::Canonical => {
            encoder.open_wrapper("$binary");
            encoder.write_string(&binary.to_base64());
            encoder.push_str(",");
            encoder.write_string("$type");
            encoder.push_str(":");
            encoder.write_string(&format!("{subtype:#x}"));
            encoder.push_str("}");
        }
        Mode::Extended => {
            encoder.push_str("BinData(");
            encoder.push_display(subtype);
            encoder.push_str(",");
            encoder.write_string(&binary.to_base64());
            encoder.push_str(")");
        }
    }
}
