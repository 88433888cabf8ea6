use pretty_assertions::assert_eq;

use crate::{Bson, Document, bson, doc};

#[test]
fn scalars() {
    assert_eq!(bson!(null), Bson::Null);
    assert_eq!(bson!(1), Bson::Int32(1));
    assert_eq!(bson!(1_i64), Bson::Int64(1));
    assert_eq!(bson!("s"), Bson::String("s".to_string()));
    assert_eq!(bson!(true), Bson::Boolean(true));
    assert_eq!(bson!([]), Bson::Array(Vec::new()));
    assert_eq!(bson!({}), Bson::Document(Document::new()));
}

#[test]
fn nested() {
    let value = bson!({
        "a": [1, null, [2], { "b": "c" }],
        "d": { "e": null },
    });

    let mut inner = Document::new();
    inner.insert("b", "c");
    let mut e = Document::new();
    e.insert("e", Bson::Null);
    let mut expected = Document::new();
    expected.insert(
        "a",
        Bson::Array(vec![
            Bson::Int32(1),
            Bson::Null,
            Bson::Array(vec![Bson::Int32(2)]),
            Bson::Document(inner),
        ]),
    );
    expected.insert("d", e);

    assert_eq!(value, Bson::Document(expected));
}

#[test]
fn expressions_and_order() {
    let n = 41;
    let doc = doc! {
        "z": n + 1,
        "y": Bson::Integer(0),
        "x": format!("{n}"),
    };
    let keys: Vec<_> = doc.keys().cloned().collect();
    assert_eq!(keys, ["z", "y", "x"]);
    assert_eq!(doc.get("z"), Some(&Bson::Int32(42)));
    assert_eq!(doc.get_str("x").unwrap(), "41");
}
