use serde::Deserialize;

use crate::{
    bson::Bson,
    document::Document,
    error::{Error, Result},
    extjson::{registry::RegistryBuilder, ser::Encoder},
};

use super::model;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct MinKey {
    #[serde(rename = "$minKey")]
    value: i64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct MaxKey {
    #[serde(rename = "$maxKey")]
    value: i64,
}

fn check_one(hook: &str, value: i64) -> Result<()> {
    if value != 1 {
        return Err(Error::invalid_literal(
            hook,
            value,
            format!("{hook} must be 1"),
        ));
    }
    Ok(())
}

fn decode_min_key(doc: Document) -> Result<Bson> {
    let model: MinKey = model("$minKey", doc)?;
    check_one("$minKey", model.value)?;
    Ok(Bson::MinKey)
}

fn decode_max_key(doc: Document) -> Result<Bson> {
    let model: MaxKey = model("$maxKey", doc)?;
    check_one("$maxKey", model.value)?;
    Ok(Bson::MaxKey)
}

pub(super) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .keyed("$minKey", decode_min_key)
        .keyed("$maxKey", decode_max_key)
        .constant("MinKey", Bson::MinKey)
        .constant("MaxKey", Bson::MaxKey)
}

/// The sentinels carry no data and have no wrapper of their own on output.
pub(crate) fn write(encoder: &mut Encoder) {
    encoder.push_str("{}");
}
