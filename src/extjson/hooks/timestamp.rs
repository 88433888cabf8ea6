use serde::Deserialize;

use crate::{
    bson::{Bson, Timestamp},
    document::Document,
    error::Result,
    extjson::{registry::RegistryBuilder, ser::Encoder, Mode},
};

use super::model;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TimestampLiteral {
    #[serde(rename = "$timestamp")]
    body: TimestampBody,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TimestampBody {
    t: u32,
    i: u32,
}

fn decode_timestamp(doc: Document) -> Result<Bson> {
    let model: TimestampLiteral = model("$timestamp", doc)?;
    Ok(Bson::Timestamp(Timestamp {
        time: model.body.t,
        increment: model.body.i,
    }))
}

pub(super) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .keyed("$timestamp", decode_timestamp)
        .constructor("Timestamp", "$timestamp", &["t", "i"])
}

pub(crate) fn write(encoder: &mut Encoder, timestamp: Timestamp) {
    match encoder.mode() {
        Mode::Canonical => {
            encoder.open_wrapper("$timestamp");
            encoder.push_display(format_args!(
                "{{\"t\":{},\"i\":{}}}}}",
                timestamp.time, timestamp.increment
            ));
        }
        Mode::Extended => {
            encoder.push_display(format_args!(
                "Timestamp({},{})",
                timestamp.time, timestamp.increment
            ));
        }
    }
}
