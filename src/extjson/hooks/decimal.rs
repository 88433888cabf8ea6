use serde::Deserialize;

use crate::{
    bson::Bson,
    decimal128::Decimal128,
    document::Document,
    error::{Error, Result},
    extjson::{registry::RegistryBuilder, ser::Encoder, Mode},
};

use super::{Lenient, model, number::FuncBody};

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NumberDecimal {
    #[serde(rename = "$numberDecimal")]
    value: Lenient,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NumberDecimalFunc {
    #[serde(rename = "$numberDecimalFunc")]
    body: FuncBody,
}

fn parse(hook: &str, value: &Lenient) -> Result<Bson> {
    let text = value.to_text();
    text.parse::<Decimal128>()
        .map(Bson::Decimal128)
        .map_err(|e| Error::invalid_literal(hook, text, e))
}

fn decode_decimal(doc: Document) -> Result<Bson> {
    let model: NumberDecimal = model("$numberDecimal", doc)?;
    parse("$numberDecimal", &model.value)
}

fn decode_decimal_func(doc: Document) -> Result<Bson> {
    let model: NumberDecimalFunc = model("NumberDecimal", doc)?;
    parse("NumberDecimal", &model.body.value)
}

pub(super) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .keyed("$numberDecimal", decode_decimal)
        .keyed("$numberDecimalFunc", decode_decimal_func)
        .constructor("NumberDecimal", "$numberDecimalFunc", &["N"])
}

pub(crate) fn write(encoder: &mut Encoder, decimal: &Decimal128) {
    match encoder.mode() {
        Mode::Canonical => {
            encoder.open_wrapper("$numberDecimal");
            encoder.write_string(&decimal.to_string());
            encoder.push_str("}");
        }
        Mode::Extended => {
            encoder.push_str("NumberDecimal(");
            encoder.write_string(&decimal.to_string());
            encoder.push_str(")");
        }
    }
}
