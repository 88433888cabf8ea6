use crate::{
    bson::Bson,
    document::Document,
    error::{Error, Result},
    extjson::registry::{Registry, RegistryBuilder},
};

/// `DBRef(collection, id)` decodes to the plain document `{"$ref": collection, "$id": id}`.
/// Each field is run through the keyed hooks once, so `DBRef("c", ObjectId("..."))` carries an
/// [`ObjectId`](crate::oid::ObjectId) rather than the rewritten constructor body.
fn decode_dbref_func(doc: Document) -> Result<Bson> {
    let raw = doc.to_string();
    let body = match (doc.len(), doc.into_iter().next()) {
        (1, Some((_, Bson::Document(body)))) => body,
        _ => {
            return Err(Error::invalid_literal(
                "DBRef",
                raw,
                "expected a $dbrefFunc object",
            ));
        }
    };

    let mut reference = Document::new();
    for (key, value) in body {
        let value = match value {
            Bson::Document(doc) => Registry::outer()
                .interpret(doc)
                .map_err(|e| e.with_key(key.as_str()))?,
            other => other,
        };
        reference.insert(key, value);
    }
    Ok(Bson::Document(reference))
}

pub(super) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .keyed("$dbrefFunc", decode_dbref_func)
        .constructor("DBRef", "$dbrefFunc", &["$ref", "$id"])
}
