use assert_matches::assert_matches;
use pretty_assertions::assert_eq;

use crate::{
    Bson,
    Decimal128,
    Regex,
    Timestamp,
    decode_bson,
    doc,
    error::{Error, ErrorKind},
    oid::ObjectId,
};

fn decode(input: &str) -> Bson {
    decode_bson(input.as_bytes()).unwrap_or_else(|e| panic!("{input}: {e}"))
}

fn reject(input: &str) -> Error {
    let error = decode_bson(input.as_bytes()).unwrap_err();
    assert!(error.is_invalid_literal(), "{input}: {error}");
    error
}

#[test]
fn number_long_accepts_bare_and_quoted() {
    for input in [
        r#"{"$numberLong":42}"#,
        r#"{"$numberLong":"42"}"#,
        "NumberLong(42)",
        r#"NumberLong("42")"#,
        r#"{"$numberLongFunc":{"N":42}}"#,
    ] {
        assert_eq!(decode(input), Bson::Int64(42), "{input}");
    }
    assert_eq!(
        decode(r#"{"$numberLong":"9223372036854775807"}"#),
        Bson::Int64(i64::MAX)
    );
    assert_eq!(decode("NumberLong(-9007199254740993)"), Bson::Int64(-9_007_199_254_740_993));

    reject(r#"{"$numberLong":"4x2"}"#);
    reject(r#"{"$numberLong":4.5}"#);
    reject(r#"{"$numberLong":"9223372036854775808"}"#);
    reject(r#"{"$numberLong":42,"extra":1}"#);
    reject("NumberLong(true)");
}

#[test]
fn number_int_accepts_bare_and_quoted() {
    for input in [
        r#"{"$numberInt":7}"#,
        r#"{"$numberInt":"7"}"#,
        "NumberInt(7)",
        r#"NumberInt("7")"#,
    ] {
        assert_eq!(decode(input), Bson::Int32(7), "{input}");
    }
    reject(r#"{"$numberInt":2147483648}"#);
    reject(r#"NumberInt("-2147483649")"#);
}

#[test]
fn number_decimal() {
    let expected = Bson::Decimal128("1.25".parse::<Decimal128>().unwrap());
    for input in [
        r#"{"$numberDecimal":"1.25"}"#,
        r#"{"$numberDecimal":1.25}"#,
        r#"NumberDecimal("1.25")"#,
        "NumberDecimal(1.25)",
    ] {
        assert_eq!(decode(input), expected, "{input}");
    }
    assert_eq!(
        decode("NumberDecimal(12)"),
        Bson::Decimal128(Decimal128::from(12))
    );
    reject(r#"{"$numberDecimal":"one"}"#);
}

#[test]
fn object_id() {
    let id = Bson::ObjectId(ObjectId::parse_str("5a934e000102030405000000").unwrap());
    assert_eq!(decode(r#"ObjectId( "5A934E000102030405000000" )"#), id);

    let error = reject(r#"{"$oid":"5a934e"}"#);
    assert_matches!(error.kind, ErrorKind::InvalidLiteral { ref hook, .. } if hook == "$oid");
    let error = reject(r#"ObjectId("zz")"#);
    assert_matches!(error.kind, ErrorKind::InvalidLiteral { ref hook, .. } if hook == "ObjectId");
    reject(r#"{"$oid":5}"#);
    reject("ObjectId()");
}

#[test]
fn timestamp() {
    let expected = Bson::Timestamp(Timestamp {
        time: 4_294_967_295,
        increment: 7,
    });
    assert_eq!(decode(r#"{"$timestamp":{"t":4294967295,"i":7}}"#), expected);
    assert_eq!(decode("Timestamp(4294967295, 7)"), expected);

    reject(r#"{"$timestamp":{"t":4294967296,"i":0}}"#);
    reject(r#"{"$timestamp":{"t":-1,"i":0}}"#);
    reject(r#"{"$timestamp":{"t":1}}"#);
    reject("Timestamp(1)");
}

#[test]
fn regex() {
    assert_eq!(
        decode(r#"{"$regex":"^ab+c$","$options":"ix"}"#),
        Bson::RegularExpression(Regex::new("^ab+c$", "ix"))
    );
    assert_eq!(
        decode(r#"{"$regex":"x"}"#),
        Bson::RegularExpression(Regex::new("x", ""))
    );
    reject(r#"{"$regex":"x","$flags":"i"}"#);
}

#[test]
fn undefined() {
    assert_eq!(decode(r#"{"$undefined":true}"#), Bson::Undefined);
    reject(r#"{"$undefined":false}"#);
    reject(r#"{"$undefined":1}"#);
}

#[test]
fn min_and_max_key() {
    assert_eq!(decode(r#"{"$minKey":1}"#), Bson::MinKey);
    assert_eq!(decode(r#"{"$maxKey":1}"#), Bson::MaxKey);

    let error = reject(r#"{"$minKey":2}"#);
    assert_matches!(error.kind, ErrorKind::InvalidLiteral { ref hook, .. } if hook == "$minKey");
    reject(r#"{"$maxKey":0}"#);
    reject(r#"{"$maxKey":"1"}"#);
}

#[test]
fn dbref() {
    let id = ObjectId::parse_str("5a934e000102030405000000").unwrap();
    assert_eq!(
        decode(r#"DBRef("users", ObjectId("5a934e000102030405000000"))"#),
        Bson::Document(doc! { "$ref": "users", "$id": id })
    );
    assert_eq!(
        decode(r#"DBRef("users", 5)"#),
        Bson::Document(doc! { "$ref": "users", "$id": Bson::Integer(5) })
    );

    let dbref = decode(r#"{"ref": DBRef("c", {"$oid": "5a934e000102030405000000"})}"#);
    assert_eq!(
        dbref,
        Bson::Document(doc! { "ref": { "$ref": "c", "$id": id } })
    );
}

#[test]
fn inner_syntax_errors_are_wrapped() {
    let error = reject(r#"{"$oid": "5a934e000102030405000000" "x"}"#);
    let ErrorKind::InvalidLiteral { hook, source, .. } = error.kind else {
        unreachable!()
    };
    assert_eq!(hook, "$oid");
    assert!(source.is_some_and(|e| e.is_syntax()));
}

#[test]
fn hooks_do_not_reenter_themselves() {
    // The body of a keyed literal is decoded without keyed hooks, so a nested wrapper reaches
    // the outer hook as a plain document and is rejected there.
    reject(r#"{"$oid":{"$oid":"5a934e000102030405000000"}}"#);
}
