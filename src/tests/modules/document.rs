use assert_matches::assert_matches;
use pretty_assertions::assert_eq;

use crate::{
    Bson,
    Document,
    doc,
    error::ErrorKind,
    oid::ObjectId,
};

#[test]
fn ordered_insert() {
    let mut doc = Document::new();
    doc.insert("first", 1_i32);
    doc.insert("second", "foo");
    doc.insert("alphanumeric", "bar");

    let keys: Vec<_> = doc.iter().map(|(key, _)| key.to_owned()).collect();
    assert_eq!(keys, ["first", "second", "alphanumeric"]);
    assert_eq!(doc.first_key(), Some("first"));
}

#[test]
fn reinsert_keeps_position() {
    let mut doc = doc! { "a": 1, "b": 2, "c": 3 };
    assert_eq!(doc.insert("a", "x"), Some(Bson::Int32(1)));

    let keys: Vec<_> = doc.keys().cloned().collect();
    assert_eq!(keys, ["a", "b", "c"]);
    assert_eq!(doc.get_str("a").unwrap(), "x");
}

#[test]
fn remove_keeps_order() {
    let mut doc = doc! { "a": 1, "b": 2, "c": 3 };
    assert_eq!(doc.remove("b"), Some(Bson::Int32(2)));
    assert_eq!(doc.remove("b"), None);

    let keys: Vec<_> = doc.keys().cloned().collect();
    assert_eq!(keys, ["a", "c"]);
    assert_eq!(doc.len(), 2);
}

#[test]
fn typed_getters() {
    let id = ObjectId::new();
    let doc = doc! {
        "f": 1.5,
        "s": "str",
        "b": true,
        "i32": 1,
        "i64": 2_i64,
        "int": Bson::Integer(3),
        "oid": id,
        "arr": ["x"],
        "doc": { "k": null },
    };

    assert_eq!(doc.get_f64("f").unwrap(), 1.5);
    assert_eq!(doc.get_str("s").unwrap(), "str");
    assert!(doc.get_bool("b").unwrap());
    assert_eq!(doc.get_i32("i32").unwrap(), 1);
    assert_eq!(doc.get_i64("i64").unwrap(), 2);
    assert_eq!(doc.get_integer("int").unwrap(), 3);
    assert_eq!(doc.get_integer("i32").unwrap(), 1);
    assert_eq!(doc.get_integer("i64").unwrap(), 2);
    assert_eq!(doc.get_object_id("oid").unwrap(), id);
    assert_eq!(doc.get_array("arr").unwrap(), &vec![Bson::from("x")]);
    assert!(doc.get_document("doc").unwrap().is_null("k"));
    assert!(doc.contains_key("doc"));
    assert!(!doc.contains_key("missing"));
}

#[test]
fn getter_errors() {
    let doc = doc! { "s": "str", "int": Bson::Integer(3) };

    let error = doc.get_i32("missing").unwrap_err();
    assert_matches!(error.kind, ErrorKind::NotPresent);
    assert_eq!(error.key.as_deref(), Some("missing"));

    let error = doc.get_f64("s").unwrap_err();
    assert!(error.is_type_mismatch());
    assert_eq!(error.key.as_deref(), Some("s"));

    // A plain integer literal has no fixed width.
    assert!(doc.get_i64("int").unwrap_err().is_type_mismatch());
}

#[test]
fn collect_and_extend() {
    let mut doc: Document = vec![
        ("a".to_string(), Bson::Int32(1)),
        ("b".to_string(), Bson::Int32(2)),
    ]
    .into_iter()
    .collect();
    doc.extend(vec![("a".to_string(), Bson::Null), ("c".to_string(), Bson::Null)]);

    assert_eq!(doc, doc! { "a": null, "b": 2, "c": null });
    let values: Vec<_> = doc.values().cloned().collect();
    assert_eq!(values, [Bson::Null, Bson::Int32(2), Bson::Null]);
}

#[test]
fn display() {
    assert_eq!(Document::new().to_string(), "{}");
    assert_eq!(
        doc! { "a": "x", "b": Bson::Integer(2) }.to_string(),
        r#"{ "a": "x", "b": 2 }"#
    );
}
