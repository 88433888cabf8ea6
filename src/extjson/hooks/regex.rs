use serde::Deserialize;

use crate::{
    bson::{Bson, Regex},
    document::Document,
    error::Result,
    extjson::{registry::RegistryBuilder, ser::Encoder},
};

use super::model;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RegexLiteral {
    #[serde(rename = "$regex")]
    pattern: String,

    #[serde(rename = "$options", default)]
    options: String,
}

fn decode_regex(doc: Document) -> Result<Bson> {
    let model: RegexLiteral = model("$regex", doc)?;
    Ok(Bson::RegularExpression(Regex {
        pattern: model.pattern,
        options: model.options,
    }))
}

pub(super) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder.keyed("$regex", decode_regex)
}

/// The shell's `/pattern/flags` literal is not produced, so both modes share this form.
pub(crate) fn write(encoder: &mut Encoder, regex: &Regex) {
    encoder.open_wrapper("$regex");
    encoder.write_string(&regex.pattern);
    encoder.push_str(",");
    encoder.write_string("$options");
    encoder.push_str(":");
    encoder.write_string(&regex.options);
    encoder.push_str("}");
}
