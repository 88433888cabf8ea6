use crate::{
    bson::Bson,
    datetime::DateTime,
    document::Document,
    error::{Error, Result},
    extjson::{registry::RegistryBuilder, ser::Encoder, Mode},
};

/// `{"$date": "<RFC 3339 or YYYY-MM-DD>"}`, `{"$date": {"$numberLong": "<ms>"}}` or
/// `{"$date": <ms>}`.
fn decode_date(doc: Document) -> Result<Bson> {
    let raw = doc.to_string();
    let invalid = |message: &str| Error::invalid_literal("$date", &raw, message);

    if doc.len() != 1 {
        return Err(invalid("unexpected fields next to $date"));
    }
    let date = match doc.get("$date") {
        Some(Bson::String(s)) => {
            DateTime::parse_extjson_str(s).map_err(|e| Error::invalid_literal("$date", s, e))?
        }
        Some(Bson::Document(millis)) => {
            if millis.len() != 1 {
                return Err(invalid("expected only $numberLong"));
            }
            match millis.get("$numberLong") {
                Some(value) => DateTime::from_millis(millis_of(value).ok_or_else(|| {
                    invalid("$numberLong must hold an integer number of milliseconds")
                })?),
                None => return Err(invalid("expected $numberLong")),
            }
        }
        Some(other) => match other.as_integer() {
            Some(millis) => DateTime::from_millis(millis),
            None => return Err(invalid("expected a date string or milliseconds")),
        },
        None => return Err(invalid("missing $date")),
    };
    Ok(Bson::DateTime(date))
}

/// The body of `ISODate(S)` and `new Date(S)`. Without an argument the date is the time of
/// decoding.
fn decode_date_func(doc: Document) -> Result<Bson> {
    let raw = doc.to_string();
    let invalid = |message: &str| Error::invalid_literal("new Date", &raw, message);

    let body = match doc.get("$dateFunc") {
        Some(Bson::Document(body)) if doc.len() == 1 => body,
        _ => return Err(invalid("expected a $dateFunc object")),
    };
    if body.keys().any(|k| k != "S") {
        return Err(invalid("unexpected arguments"));
    }
    let date = match body.get("S") {
        None => DateTime::now(),
        Some(Bson::String(s)) => {
            DateTime::parse_extjson_str(s).map_err(|e| Error::invalid_literal("ISODate", s, e))?
        }
        Some(value) => DateTime::from_millis(
            millis_of(value)
                .ok_or_else(|| invalid("expected a date string or milliseconds"))?,
        ),
    };
    Ok(Bson::DateTime(date))
}

fn millis_of(value: &Bson) -> Option<i64> {
    match value {
        Bson::String(s) => s.parse().ok(),
        other => other.as_integer(),
    }
}

pub(super) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .keyed("$date", decode_date)
        .keyed("$dateFunc", decode_date_func)
        .constructor("ISODate", "$dateFunc", &["S"])
        .constructor("new Date", "$dateFunc", &["S"])
}

/// Dates in years 0 to 9999 are written as RFC 3339 text, others as milliseconds.
pub(crate) fn write(encoder: &mut Encoder, date: DateTime) {
    match (encoder.mode(), date.to_extjson_string()) {
        (Mode::Canonical, Some(text)) => {
            encoder.open_wrapper("$date");
            encoder.write_string(&text);
            encoder.push_str("}");
        }
        (Mode::Canonical, None) => {
            encoder.open_wrapper("$date");
            encoder.open_wrapper("$numberLong");
            encoder.write_string(&date.timestamp_millis().to_string());
            encoder.push_str("}}");
        }
        (Mode::Extended, Some(text)) => {
            encoder.push_str("ISODate(");
            encoder.write_string(&text);
            encoder.push_str(")");
        }
        (Mode::Extended, None) => {
            encoder.push_str("new Date(");
            encoder.push_display(date.timestamp_millis());
            encoder.push_str(")");
        }
    }
}
