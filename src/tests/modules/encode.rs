use assert_matches::assert_matches;
use pretty_assertions::assert_eq;

use crate::{
    Binary,
    Bson,
    Decimal128,
    Mode,
    Regex,
    Timestamp,
    doc,
    error::ErrorKind,
    extjson::ser::{document_to_string, to_string},
    oid::ObjectId,
    spec::BinarySubtype,
};

fn canonical(value: impl Into<Bson>) -> String {
    to_string(&value.into(), Mode::Canonical).unwrap()
}

fn extended(value: impl Into<Bson>) -> String {
    to_string(&value.into(), Mode::Extended).unwrap()
}

#[test]
fn json_values() {
    assert_eq!(canonical(Bson::Null), "null");
    assert_eq!(canonical(true), "true");
    assert_eq!(canonical(false), "false");
    assert_eq!(canonical("hi"), r#""hi""#);
    assert_eq!(canonical(1.5), "1.5");
    assert_eq!(canonical(1.0), "1.0");
    assert_eq!(canonical(-2.5e-8), "-2.5e-8");
    assert_eq!(canonical(Bson::Array(vec![])), "[]");
    assert_eq!(canonical(doc! {}), "{}");
    assert_eq!(
        canonical(doc! { "a": [1.5, "x", null], "b": { "c": true } }),
        r#"{"a":[1.5,"x",null],"b":{"c":true}}"#
    );
}

#[test]
fn string_escapes() {
    assert_eq!(
        canonical("q\"b\\n\nr\rt\tb\u{8}f\u{c}"),
        r#""q\"b\\n\nr\rt\tb\bf\f""#
    );
    assert_eq!(canonical("\u{1}\u{1f}"), r#""\u0001\u001f""#);
    assert_eq!(canonical("é/€"), "\"é/€\"");
}

#[test]
fn numeric_thresholds() {
    assert_eq!(canonical(10_i64), r#"{"$numberLong":10}"#);
    assert_eq!(
        canonical(9_007_199_254_740_993_i64),
        r#"{"$numberLong":"9007199254740993"}"#
    );
    assert_eq!(
        canonical(9_007_199_254_740_992_i64),
        r#"{"$numberLong":9007199254740992}"#
    );
    assert_eq!(
        canonical(-9_007_199_254_740_993_i64),
        r#"{"$numberLong":-9007199254740993}"#
    );
    assert_eq!(
        canonical(i64::MIN),
        r#"{"$numberLong":-9223372036854775808}"#
    );

    assert_eq!(canonical(0), r#"{"$numberInt":0}"#);
    assert_eq!(canonical(2_097_152), r#"{"$numberInt":2097152}"#);
    assert_eq!(canonical(2_097_153), r#"{"$numberInt":"2097153"}"#);
    assert_eq!(canonical(-2_097_153), r#"{"$numberInt":-2097153}"#);
    assert_eq!(canonical(i32::MIN), r#"{"$numberInt":-2147483648}"#);

    assert_eq!(canonical(Bson::Integer(10)), "10");
    assert_eq!(
        canonical(Bson::Integer(9_007_199_254_740_993)),
        r#"{"$numberLong":"9007199254740993"}"#
    );
    assert_eq!(
        canonical(Bson::Integer(-9_007_199_254_740_993)),
        "-9007199254740993"
    );
}

#[test]
fn numbers_in_extended_mode() {
    assert_eq!(extended(10_i64), "NumberLong(10)");
    assert_eq!(extended(9_007_199_254_740_993_i64), "NumberLong(9007199254740993)");
    assert_eq!(extended(-3), "-3");
    assert_eq!(extended(Bson::Integer(10)), "10");
    assert_eq!(
        extended(Bson::Integer(i64::MAX)),
        r#"{"$numberLong":"9223372036854775807"}"#
    );
    assert_eq!(extended(0.5), "0.5");
}

#[test]
fn typed_values() {
    let id = ObjectId::parse_str("5a934e000102030405000000").unwrap();
    assert_eq!(canonical(id), r#"{"$oid":"5a934e000102030405000000"}"#);
    assert_eq!(extended(id), r#"ObjectId("5a934e000102030405000000")"#);

    let ts = Timestamp {
        time: 1,
        increment: 2,
    };
    assert_eq!(canonical(ts), r#"{"$timestamp":{"t":1,"i":2}}"#);
    assert_eq!(extended(ts), "Timestamp(1,2)");

    let binary = Binary {
        subtype: BinarySubtype::UserDefined(0x80),
        bytes: b"foo".to_vec(),
    };
    assert_eq!(
        canonical(binary.clone()),
        r#"{"$binary":"Zm9v","$type":"0x80"}"#
    );
    assert_eq!(extended(binary), r#"BinData(128,"Zm9v")"#);

    let generic = Binary {
        subtype: BinarySubtype::Generic,
        bytes: vec![],
    };
    assert_eq!(canonical(generic), r#"{"$binary":"","$type":"0x0"}"#);

    let decimal: Decimal128 = "12.70".parse().unwrap();
    assert_eq!(canonical(decimal), r#"{"$numberDecimal":"12.70"}"#);
    assert_eq!(extended(decimal), r#"NumberDecimal("12.70")"#);

    let regex = Regex::new("^a\"b", "im");
    assert_eq!(canonical(regex.clone()), r#"{"$regex":"^a\"b","$options":"im"}"#);
    assert_eq!(extended(regex), r#"{"$regex":"^a\"b","$options":"im"}"#);

    assert_eq!(canonical(Bson::Undefined), r#"{"$undefined":true}"#);
    assert_eq!(extended(Bson::Undefined), "undefined");

    assert_eq!(canonical(Bson::MinKey), "{}");
    assert_eq!(extended(Bson::MaxKey), "{}");
}

#[test]
fn dense_output_in_both_modes() {
    let doc = doc! {
        "_id": ObjectId::parse_str("5a934e000102030405000000").unwrap(),
        "tags": ["a", "b"],
        "nested": { "n": 5_i64, "u": Bson::Undefined },
    };
    assert_eq!(
        document_to_string(&doc, Mode::Canonical).unwrap(),
        r#"{"_id":{"$oid":"5a934e000102030405000000"},"tags":["a","b"],"nested":{"n":{"$numberLong":5},"u":{"$undefined":true}}}"#
    );
    assert_eq!(
        document_to_string(&doc, Mode::Extended).unwrap(),
        r#"{"_id":ObjectId("5a934e000102030405000000"),"tags":["a","b"],"nested":{"n":NumberLong(5),"u":undefined}}"#
    );
}

#[test]
fn non_finite_doubles_are_rejected() {
    for f in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        for mode in [Mode::Canonical, Mode::Extended] {
            let error = to_string(&Bson::Double(f), mode).unwrap_err();
            assert_matches!(error.kind, ErrorKind::Encode { .. });
        }
    }

    let error = document_to_string(&doc! { "a": { "b": [1.0, f64::NAN] } }, Mode::Canonical)
        .unwrap_err();
    assert_eq!(error.index, Some(1));
    assert_eq!(error.key, None);
}
