use serde::Deserialize;

use crate::{
    bson::Bson,
    document::Document,
    error::{Error, Result},
    extjson::{registry::RegistryBuilder, ser::Encoder, Mode},
    oid,
};

use super::model;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ObjectId {
    #[serde(rename = "$oid")]
    oid: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ObjectIdFunc {
    #[serde(rename = "$oidFunc")]
    body: ObjectIdFuncBody,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ObjectIdFuncBody {
    #[serde(rename = "Id")]
    id: String,
}

fn parse_hex(hook: &str, hex: &str) -> Result<Bson> {
    oid::ObjectId::parse_str(hex)
        .map(Bson::ObjectId)
        .map_err(|e| Error::invalid_literal(hook, hex, e))
}

fn decode_oid(doc: Document) -> Result<Bson> {
    let model: ObjectId = model("$oid", doc)?;
    parse_hex("$oid", &model.oid)
}

fn decode_oid_func(doc: Document) -> Result<Bson> {
    let model: ObjectIdFunc = model("ObjectId", doc)?;
    parse_hex("ObjectId", &model.body.id)
}

pub(super) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .keyed("$oid", decode_oid)
        .keyed("$oidFunc", decode_oid_func)
        .constructor("ObjectId", "$oidFunc", &["Id"])
}

pub(crate) fn write(encoder: &mut Encoder, oid: oid::ObjectId) {
    match encoder.mode() {
        Mode::Canonical => {
            encoder.open_wrapper("$oid");
            encoder.write_string(&oid.to_hex());
            encoder.push_str("}");
        }
        Mode::Extended => {
            encoder.push_str("ObjectId(");
            encoder.write_string(&oid.to_hex());
            encoder.push_str(")");
        }
    }
}
