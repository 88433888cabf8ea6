use pretty_assertions::assert_eq;

use crate::{
    Bson,
    Document,
    Registry,
    RegistryBuilder,
    decode_with,
    doc,
    error::{Error, Result},
};

fn point(doc: Document) -> Result<Bson> {
    let body = doc
        .get_document("$point")
        .map_err(|_| Error::invalid_literal("$point", &doc, "expected an object"))?;
    let x = body.get("x").and_then(Bson::as_integer).unwrap_or_default();
    let y = body.get("y").and_then(Bson::as_integer).unwrap_or_default();
    Ok(Bson::Array(vec![Bson::Integer(x), Bson::Integer(y)]))
}

fn registry() -> Registry {
    RegistryBuilder::new()
        .keyed("$point", point)
        .constructor("Point", "$point", &["x", "y"])
        .constant("Origin", Bson::Array(vec![Bson::Integer(0), Bson::Integer(0)]))
        .unquoted_keys(true)
        .build()
}

#[test]
fn custom_hooks() {
    let registry = registry();
    let expected = Bson::Array(vec![Bson::Integer(1), Bson::Integer(2)]);

    assert_eq!(decode_with(b"Point(1, 2)", &registry).unwrap(), expected);
    assert_eq!(
        decode_with(br#"{"$point": {"x": 1, "y": 2}}"#, &registry).unwrap(),
        expected
    );
    assert_eq!(
        decode_with(b"{p: Point(1), o: Origin}", &registry).unwrap(),
        Bson::Document(doc! {
            "p": [Bson::Integer(1), Bson::Integer(0)],
            "o": [Bson::Integer(0), Bson::Integer(0)],
        })
    );
}

#[test]
fn flags_are_per_registry() {
    let registry = registry();
    assert!(registry.allows_unquoted_keys());
    assert!(!registry.allows_trailing_commas());
    assert!(decode_with(b"[Origin,]", &registry).unwrap_err().is_syntax());
    assert!(
        decode_with(b"Point(1,)", &registry)
            .unwrap_err()
            .is_syntax()
    );
}

#[test]
fn restricted_counterpart() {
    let registry = registry();
    assert!(!registry.is_restricted());

    let restricted = registry.restricted();
    assert!(restricted.is_restricted());
    assert!(restricted.keyed_hook("$point").is_none());
    assert!(restricted.constructor("Point").is_some());
    assert!(restricted.constant("Origin").is_some());
    assert!(restricted.allows_unquoted_keys());
    assert!(std::ptr::eq(restricted.restricted(), restricted));

    assert_eq!(
        decode_with(b"Point(1, 2)", restricted).unwrap(),
        Bson::Document(doc! { "$point": { "x": Bson::Integer(1), "y": Bson::Integer(2) } })
    );
}

#[test]
fn built_in_registries() {
    let outer = Registry::outer();
    assert!(outer.allows_unquoted_keys());
    assert!(outer.allows_trailing_commas());
    for key in [
        "$oid",
        "$oidFunc",
        "$date",
        "$dateFunc",
        "$binary",
        "$binaryFunc",
        "$timestamp",
        "$regex",
        "$numberLong",
        "$numberLongFunc",
        "$numberInt",
        "$numberIntFunc",
        "$numberDecimal",
        "$numberDecimalFunc",
        "$dbrefFunc",
        "$minKey",
        "$maxKey",
        "$undefined",
    ] {
        assert!(outer.keyed_hook(key).is_some(), "{key}");
        assert!(Registry::inner().keyed_hook(key).is_none(), "{key}");
    }

    let constructor = outer.constructor("BinData").unwrap();
    assert_eq!(constructor.key, "$binaryFunc");
    assert_eq!(constructor.args, ["$type", "$binary"]);
    assert_eq!(outer.constructor("new Date").unwrap().key, "$dateFunc");

    assert_eq!(outer.constant("undefined"), Some(&Bson::Undefined));
    assert_eq!(Registry::inner().constant("MinKey"), Some(&Bson::MinKey));
    assert!(outer.constant("Infinity").is_none());
}

#[test]
fn interpret_decoded_documents() {
    let outer = Registry::outer();
    assert_eq!(
        outer.interpret(doc! { "$numberLong": "5" }).unwrap(),
        Bson::Int64(5)
    );
    assert_eq!(
        outer.interpret(doc! { "plain": 1 }).unwrap(),
        Bson::Document(doc! { "plain": 1 })
    );
    assert_eq!(outer.interpret(doc! {}).unwrap(), Bson::Document(doc! {}));
    assert!(
        outer
            .interpret(doc! { "$minKey": 3 })
            .unwrap_err()
            .is_invalid_literal()
    );
}

#[test]
#[should_panic(expected = "registered twice")]
fn duplicate_keyed_hook_panics() {
    let _ = RegistryBuilder::new()
        .keyed("$point", point)
        .keyed("$point", point);
}

#[test]
#[should_panic(expected = "reserved")]
fn reserved_constant_panics() {
    let _ = RegistryBuilder::new().constant("null", Bson::Null);
}
