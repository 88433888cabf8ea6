use assert_matches::assert_matches;
use pretty_assertions::assert_eq;

use crate::{
    Bson,
    Registry,
    RegistryBuilder,
    decode_bson,
    decode_document,
    decode_with,
    doc,
    error::ErrorKind,
    extjson::de::MAX_DEPTH,
    oid::ObjectId,
};

#[test]
fn scalars() {
    assert_eq!(decode_bson(b"null").unwrap(), Bson::Null);
    assert_eq!(decode_bson(b"true").unwrap(), Bson::Boolean(true));
    assert_eq!(decode_bson(b"false").unwrap(), Bson::Boolean(false));
    assert_eq!(decode_bson(br#""hi""#).unwrap(), Bson::String("hi".to_string()));
    assert_eq!(decode_bson(b"  42  ").unwrap(), Bson::Integer(42));
    assert_eq!(decode_bson(b"-7").unwrap(), Bson::Integer(-7));
    assert_eq!(decode_bson(b"1.5").unwrap(), Bson::Double(1.5));
    assert_eq!(decode_bson(b"2e3").unwrap(), Bson::Double(2000.0));
    assert_eq!(decode_bson(b"[]").unwrap(), Bson::Array(vec![]));
    assert_eq!(decode_bson(b"{}").unwrap(), Bson::Document(doc! {}));
}

#[test]
fn integer_overflow_becomes_double() {
    assert_eq!(
        decode_bson(b"9223372036854775807").unwrap(),
        Bson::Integer(i64::MAX)
    );
    assert_eq!(
        decode_bson(b"-9223372036854775808").unwrap(),
        Bson::Integer(i64::MIN)
    );
    assert_eq!(
        decode_bson(b"9223372036854775808").unwrap(),
        Bson::Double(9_223_372_036_854_775_808.0)
    );
}

#[test]
fn unquoted_keys_and_trailing_commas() {
    let relaxed = decode_bson(br#"{key :"value",obj:{sub:1,f:0.0},}"#).unwrap();
    let strict = decode_bson(br#"{"key":"value","obj":{"sub":1,"f":0.0}}"#).unwrap();
    assert_eq!(relaxed, strict);
    assert_eq!(
        strict,
        Bson::Document(doc! { "key": "value", "obj": { "sub": Bson::Integer(1), "f": 0.0 } })
    );

    assert_eq!(
        decode_bson(b"[1, 2,]").unwrap(),
        Bson::Array(vec![Bson::Integer(1), Bson::Integer(2)])
    );
}

#[test]
fn whitespace_insensitive() {
    let expected = decode_bson(br#"{"key":["one","two"]}"#).unwrap();
    for input in [
        "{ \"key\" : [ \"one\", \"two\" ] }",
        "{\n\t\"key\"\t:\n[\r\n\"one\" ,\n\t\"two\"\n]\n}\n",
        "\t{\"key\":[\"one\",\"two\"]}  ",
    ] {
        assert_eq!(decode_bson(input.as_bytes()).unwrap(), expected, "{input:?}");
    }
}

#[test]
fn key_order_is_kept() {
    let doc = decode_document(br#"{"z":1,"a":2,"m":3}"#).unwrap();
    let keys: Vec<_> = doc.keys().map(String::as_str).collect();
    assert_eq!(keys, ["z", "a", "m"]);
}

#[test]
fn only_the_first_key_dispatches() {
    let doc = decode_document(br#"{"a":1,"$oid":"5a934e000102030405000000"}"#).unwrap();
    assert_eq!(
        doc,
        doc! { "a": Bson::Integer(1), "$oid": "5a934e000102030405000000" }
    );
}

#[test]
fn constructor_and_keyed_forms_agree() {
    let id = ObjectId::parse_str("5a934e000102030405000000").unwrap();
    assert_eq!(
        decode_bson(br#"ObjectId("5a934e000102030405000000")"#).unwrap(),
        Bson::ObjectId(id)
    );
    assert_eq!(
        decode_bson(br#"{"$oid":"5a934e000102030405000000"}"#).unwrap(),
        Bson::ObjectId(id)
    );
    assert_eq!(
        decode_bson(br#"{"$oidFunc":{"Id":"5a934e000102030405000000"}}"#).unwrap(),
        Bson::ObjectId(id)
    );
}

#[test]
fn constants() {
    assert_eq!(decode_bson(b"undefined").unwrap(), Bson::Undefined);
    assert_eq!(
        decode_bson(b"[MinKey, MaxKey]").unwrap(),
        Bson::Array(vec![Bson::MinKey, Bson::MaxKey])
    );
}

#[test]
fn end_to_end_document() {
    let doc = decode_document(
        br#"{"_id":ObjectId("5a934e000102030405000000"),"binary":BinData(2,"Zm9v"),"int32":NumberInt(0)}"#,
    )
    .unwrap();

    assert_eq!(
        doc.get_object_id("_id").unwrap().bytes(),
        [0x5a, 0x93, 0x4e, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x00, 0x00, 0x00]
    );
    let binary = doc.get_binary("binary").unwrap();
    assert_eq!(u8::from(binary.subtype), 2);
    assert_eq!(binary.bytes, b"foo");
    assert_eq!(doc.get_i32("int32").unwrap(), 0);

    assert_eq!(
        doc.to_canonical_string().unwrap(),
        r#"{"_id":{"$oid":"5a934e000102030405000000"},"binary":{"$binary":"Zm9v","$type":"0x2"},"int32":{"$numberInt":0}}"#
    );
}

#[test]
fn syntax_errors() {
    for (input, offset) in [
        ("", 0),
        ("[1 2]", 3),
        ("{\"a\" 1}", 5),
        ("{\"a\":}", 5),
        ("[1,,2]", 3),
        ("{1:2}", 1),
        ("[1] 2", 4),
        ("Bogus", 0),
        ("Bogus(1)", 0),
        ("new Bogus(1)", 0),
        ("ObjectId(\"5a934e000102030405000000\", 1)", 0),
        ("]", 0),
    ] {
        let error = decode_bson(input.as_bytes()).unwrap_err();
        assert_matches!(
            error.kind,
            ErrorKind::Syntax { offset: o, .. } if o == offset,
            "{input:?}: {error}"
        );
    }
}

#[test]
fn errors_carry_their_location() {
    let error = decode_bson(br#"{"a":{"b":[1, nope]}}"#).unwrap_err();
    assert!(error.is_syntax());
    // The innermost position wins.
    assert_eq!(error.index, Some(1));
    assert_eq!(error.key, None);

    let error = decode_bson(br#"{"a":{"b":nope}}"#).unwrap_err();
    assert_eq!(error.key.as_deref(), Some("b"));

    let error = decode_bson(br#"[0, {"$oid": "xyz"}]"#).unwrap_err();
    assert!(error.is_invalid_literal());
    assert_eq!(error.index, Some(1));
}

#[test]
fn numbers_must_be_finite() {
    for (input, offset) in [("1e400", 0), ("[1, -1E999]", 4), ("{\"x\": 2e308}", 6)] {
        let error = decode_bson(input.as_bytes()).unwrap_err();
        assert_matches!(
            error.kind,
            ErrorKind::Syntax { offset: o, .. } if o == offset,
            "{input:?}: {error}"
        );
    }
    assert_eq!(decode_bson(b"1e-400").unwrap(), Bson::Double(0.0));
}

#[test]
fn syntax_errors_inside_literals_point_into_the_input() {
    let cases: [(&[u8], usize); 3] = [
        (br#"{"aaaaaaaaaa":{"$oid": foo}}"#, 23),
        (br#"{"a": ObjectId(foo)}"#, 15),
        (br#"[Timestamp(1, bar)]"#, 14),
    ];
    for (input, offset) in cases {
        let error = decode_bson(input).unwrap_err();
        let ErrorKind::InvalidLiteral {
            source: Some(source),
            ..
        } = &error.kind
        else {
            panic!("expected an invalid literal, got {error}");
        };
        assert_matches!(
            source.kind,
            ErrorKind::Syntax { offset: o, .. } if o == offset,
            "{error}"
        );
    }
}

#[test]
fn invalid_utf8() {
    let error = decode_bson(b"\"ab\xff\"").unwrap_err();
    assert_matches!(error.kind, ErrorKind::Syntax { offset: 3, .. });
}

#[test]
fn top_level_must_be_a_document() {
    let error = decode_document(b"[1]").unwrap_err();
    assert!(error.is_type_mismatch(), "{error}");
}

#[test]
fn nesting_limit() {
    let ok = format!("{}{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
    assert!(decode_bson(ok.as_bytes()).is_ok());

    let deep = format!("{}{}", "[".repeat(MAX_DEPTH + 1), "]".repeat(MAX_DEPTH + 1));
    assert!(decode_bson(deep.as_bytes()).unwrap_err().is_syntax());

    let deep_hook = format!(
        "{}{{\"$oid\":{}\"x\"{}}}{}",
        "[".repeat(MAX_DEPTH - 1),
        "[".repeat(4),
        "]".repeat(4),
        "]".repeat(MAX_DEPTH - 1)
    );
    assert!(decode_bson(deep_hook.as_bytes()).is_err());
}

#[test]
fn strict_registry() {
    let strict = RegistryBuilder::new().build();
    assert_eq!(
        decode_with(br#"{"a":[1]}"#, &strict).unwrap(),
        Bson::Document(doc! { "a": [Bson::Integer(1)] })
    );
    assert!(decode_with(b"{a:1}", &strict).unwrap_err().is_syntax());
    assert!(decode_with(b"[1,]", &strict).unwrap_err().is_syntax());
    assert!(decode_with(b"undefined", &strict).unwrap_err().is_syntax());

    // Without keyed hooks a wrapper stays a plain document.
    assert_eq!(
        decode_with(br#"{"$minKey":1}"#, &strict).unwrap(),
        Bson::Document(doc! { "$minKey": Bson::Integer(1) })
    );
}

#[test]
fn inner_registry_leaves_wrappers_alone() {
    assert_eq!(
        decode_with(br#"{"$oid":"5a934e000102030405000000"}"#, Registry::inner()).unwrap(),
        Bson::Document(doc! { "$oid": "5a934e000102030405000000" })
    );
    assert_eq!(
        decode_with(br#"ObjectId("5a934e000102030405000000")"#, Registry::inner()).unwrap(),
        Bson::Document(doc! { "$oidFunc": { "Id": "5a934e000102030405000000" } })
    );
}
