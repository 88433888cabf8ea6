use pretty_assertions::assert_eq;

use crate::{
    Binary,
    Bson,
    DateTime,
    Decimal128,
    Regex,
    Timestamp,
    doc,
    oid::ObjectId,
    spec::{BinarySubtype, ElementType},
};

fn oid() -> ObjectId {
    ObjectId::from_bytes([0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11])
}

fn special_values() -> Vec<Bson> {
    vec![
        Bson::Int64(5),
        Bson::Decimal128("1.5".parse::<Decimal128>().unwrap()),
        Bson::Binary(Binary {
            subtype: BinarySubtype::BinaryOld,
            bytes: b"foo".to_vec(),
        }),
        Bson::DateTime(DateTime::from_millis(1_577_934_245_006)),
        Bson::Timestamp(Timestamp {
            time: 1,
            increment: 2,
        }),
        Bson::ObjectId(oid()),
        Bson::RegularExpression(Regex::new("a.*b", "i")),
        Bson::Undefined,
        Bson::MinKey,
        Bson::MaxKey,
    ]
}

#[test]
fn element_types() {
    assert_eq!(Bson::Null.element_type(), ElementType::Null);
    assert_eq!(Bson::Integer(1).element_type(), ElementType::Integer);
    assert_eq!(Bson::Int32(1).element_type(), ElementType::Int32);
    assert_eq!(Bson::Int64(1).element_type(), ElementType::Int64);
    assert_eq!(Bson::Undefined.element_type(), ElementType::Undefined);
    assert_eq!(
        Bson::Document(doc! {}).element_type(),
        ElementType::Document
    );
}

#[test]
fn accessors() {
    assert_eq!(Bson::Integer(3).as_integer(), Some(3));
    assert_eq!(Bson::Int32(3).as_integer(), Some(3));
    assert_eq!(Bson::Int64(3).as_integer(), Some(3));
    assert_eq!(Bson::Double(3.0).as_integer(), None);

    assert_eq!(Bson::Int64(3).as_i64(), Some(3));
    assert_eq!(Bson::Integer(3).as_i64(), None);
    assert_eq!(Bson::Integer(3).as_i32(), None);

    assert_eq!(Bson::from("x").as_str(), Some("x"));
    assert_eq!(Bson::Boolean(true).as_bool(), Some(true));
    assert_eq!(Bson::Null.as_null(), Some(()));
    assert_eq!(Bson::ObjectId(oid()).as_object_id(), Some(oid()));
    assert_eq!(Bson::String("x".into()).as_document(), None);
}

#[test]
fn conversions() {
    assert_eq!(Bson::from(1_i32), Bson::Int32(1));
    assert_eq!(Bson::from(1_i64), Bson::Int64(1));
    assert_eq!(Bson::from(1.5_f32), Bson::Double(1.5));
    assert_eq!(Bson::from(None::<i32>), Bson::Null);
    assert_eq!(
        Bson::from(vec!["a", "b"]),
        Bson::Array(vec![Bson::from("a"), Bson::from("b")])
    );
    assert_eq!(Bson::from(oid().bytes()), Bson::ObjectId(oid()));
}

#[test]
fn display() {
    let value = Bson::Document(doc! {
        "a": 1,
        "b": [Bson::Integer(1), "x"],
        "c": {},
    });
    assert_eq!(
        value.to_string(),
        r#"{ "a": NumberInt(1), "b": [1, "x"], "c": {} }"#
    );

    assert_eq!(
        Bson::DateTime(DateTime::from_millis(1_577_934_245_006)).to_string(),
        r#"ISODate("2020-01-02T03:04:05.006Z")"#
    );
    assert_eq!(
        Bson::ObjectId(oid()).to_string(),
        r#"ObjectId("000102030405060708090a0b")"#
    );
    assert_eq!(Bson::RegularExpression(Regex::new("a.*b", "i")).to_string(), "/a.*b/i");
    assert_eq!(
        Bson::Timestamp(Timestamp {
            time: 1,
            increment: 2
        })
        .to_string(),
        "Timestamp(1, 2)"
    );
    assert_eq!(Bson::Int64(7).to_string(), "NumberLong(7)");
    assert_eq!(Bson::Undefined.to_string(), "undefined");
}

#[test]
fn encoding_helpers() {
    let value = Bson::Document(doc! {
        "id": oid(),
        "n": 5_i64,
        "big": Bson::Integer(9_007_199_254_740_993),
        "t": Timestamp { time: 1, increment: 2 },
        "r": Regex::new("a", "i"),
        "k": Bson::MaxKey,
    });

    assert_eq!(
        value.to_canonical_string().unwrap(),
        concat!(
            r#"{"id":{"$oid":"000102030405060708090a0b"},"n":{"$numberLong":5},"#,
            r#""big":{"$numberLong":"9007199254740993"},"t":{"$timestamp":{"t":1,"i":2}},"#,
            r#""r":{"$regex":"a","$options":"i"},"k":{}}"#,
        )
    );
    assert_eq!(
        value.to_extended_string().unwrap(),
        concat!(
            r#"{"id":ObjectId("000102030405060708090a0b"),"n":NumberLong(5),"#,
            r#""big":{"$numberLong":"9007199254740993"},"t":Timestamp(1,2),"#,
            r#""r":{"$regex":"a","$options":"i"},"k":{}}"#,
        )
    );
}

#[test]
fn wrapper_documents() {
    assert_eq!(Bson::Integer(1).to_extended_document(), None);
    assert_eq!(Bson::Double(1.0).to_extended_document(), None);
    assert_eq!(
        Bson::Int64(5).to_extended_document(),
        Some(doc! { "$numberLong": "5" })
    );
    assert_eq!(
        Bson::Undefined.to_extended_document(),
        Some(doc! { "$undefined": true })
    );

    for value in special_values() {
        let doc = value.to_extended_document().unwrap();
        assert_eq!(Bson::from_extended_document(doc).unwrap(), value);
    }
}

#[test]
fn plain_documents_are_not_wrappers() {
    let doc = doc! { "a": "$oid" };
    assert_eq!(
        Bson::from_extended_document(doc.clone()).unwrap(),
        Bson::Document(doc)
    );
}
