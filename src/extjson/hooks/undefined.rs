use serde::Deserialize;

use crate::{
    bson::Bson,
    document::Document,
    error::{Error, Result},
    extjson::{registry::RegistryBuilder, ser::Encoder, Mode},
};

use super::model;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Undefined {
    #[serde(rename = "$undefined")]
    value: bool,
}

fn decode_undefined(doc: Document) -> Result<Bson> {
    let model: Undefined = model("$undefined", doc)?;
    if !model.value {
        return Err(Error::invalid_literal(
            "$undefined",
            "false",
            "$undefined must be true",
        ));
    }
    Ok(Bson::Undefined)
}

pub(super) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .keyed("$undefined", decode_undefined)
        .constant("undefined", Bson::Undefined)
}

pub(crate) fn write(encoder: &mut Encoder) {
    match encoder.mode() {
        Mode::Canonical => encoder.push_str(r#"{"$undefined":true}"#),
        Mode::Extended => encoder.push_str("undefined"),
    }
}
