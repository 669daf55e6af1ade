use super::*;

use crate::{
    decode, decode_with_features, encode, encode_pretty, tests::some, CpuFeatures, Kind, Value,
};

/**
Decode `input` with the portable tier, the auto-detected tiers, and at
every input alignment, asserting they all produce the same tree.
*/
fn decode_checked(input: &[u8]) -> Value {
    let expected = match decode_with_features(input, CpuFeatures::scalar()) {
        Ok(value) => value,
        Err(err) => panic!("decoding {:?}: {}", String::from_utf8_lossy(input), err),
    };

    assert_eq!(expected, decode(input).unwrap());

    test_alignment(input, |input| {
        assert_eq!(expected, decode(input).unwrap());
    });

    expected
}

fn roundtrip(value: &Value) {
    let encoded = encode(value).unwrap();
    assert_eq!(*value, decode_checked(&encoded));

    let pretty = encode_pretty(value).unwrap();
    assert_eq!(*value, decode_checked(&pretty));
}

#[test]
fn read_array() {
    let value = decode_checked(b"[1,2,3]");

    assert_eq!(Kind::Array, value.kind());
    assert_eq!(3, value.len());

    for (index, element) in value.elements().enumerate() {
        assert_eq!(Some(index as u64 + 1), element.as_unsigned());
    }

    assert_eq!(b"[1,2,3]".to_vec(), encode(&value).unwrap());
}

#[test]
fn read_object_sorts_entries() {
    let value = decode_checked(b"{\"b\":2,\"a\":1}");

    let entries = value
        .entries()
        .map(|(key, value)| (key, value.as_unsigned().unwrap()))
        .collect::<Vec<_>>();

    assert_eq!(vec![("a", 1), ("b", 2)], entries);
    assert_eq!(b"{\"a\":1,\"b\":2}".to_vec(), encode(&value).unwrap());
}

#[test]
fn read_empty_containers() {
    let value = decode_checked(b"{}");
    assert_eq!(Kind::Object, value.kind());
    assert!(value.is_empty());
    assert_eq!(b"{}".to_vec(), encode(&value).unwrap());

    let value = decode_checked(b"[]");
    assert_eq!(Kind::Array, value.kind());
    assert!(value.is_empty());
    assert_eq!(b"[]".to_vec(), encode(&value).unwrap());
}

#[test]
fn read_duplicate_keys_keep_the_first_value() {
    let value = decode_checked(b"{\"a\":1,\"a\":2}");

    assert_eq!(1, value.len());
    assert_eq!(Some(1), value.get_key("a").unwrap().as_unsigned());
}

#[test]
fn read_literals() {
    assert!(decode_checked(b"null").is_null());
    assert_eq!(Some(true), decode_checked(b"true").as_bool());
    assert_eq!(Some(false), decode_checked(b"false").as_bool());
}

#[test]
fn read_number_kinds() {
    assert_eq!(Some(1), decode_checked(b"1").as_unsigned());
    assert_eq!(Some(-1), decode_checked(b"-1").as_signed());
    assert_eq!(Some(1.0), decode_checked(b"1.0").as_float());
    assert_eq!(Some(100.0), decode_checked(b"1e2").as_float());
}

#[test]
fn float_roundtrips_exactly() {
    let value = decode_checked(b"3.14");

    assert_eq!(Some(3.14), value.as_float());
    assert_eq!(b"3.14".to_vec(), encode(&value).unwrap());
}

#[test]
fn read_unicode_escape() {
    let value = decode_checked(b"\"\\u00e5\"");

    assert_eq!(Some("\u{e5}"), value.as_str());
    assert_eq!(2, value.len());
}

#[test]
fn read_surrogate_pair() {
    let value = decode_checked(b"\"\\ud83d\\ude00\"");

    assert_eq!(Some("\u{1f600}"), value.as_str());

    // surrogate pairs mixed into surrounding content
    let value = decode_checked(b"\"a\\ud83d\\ude00b\"");
    assert_eq!(Some("a\u{1f600}b"), value.as_str());
}

#[test]
fn read_escapes() {
    let value = decode_checked(br#""\"\\\/\b\f\n\r\t""#);

    assert_eq!(Some("\"\\/\u{8}\u{c}\n\r\t"), value.as_str());

    roundtrip(&value);
}

#[test]
fn short_string_boundaries_roundtrip() {
    for len in [14, 15, 16] {
        let s = "x".repeat(len);
        let input = format!("\"{}\"", s);

        let value = decode_checked(input.as_bytes());
        assert_eq!(Some(s.as_str()), value.as_str());
        assert_eq!(len, value.len());

        assert_eq!(input.as_bytes().to_vec(), encode(&value).unwrap());
    }
}

#[test]
fn whitespace_between_tokens_is_ignored() {
    let expected = decode_checked(b"{\"a\":[1,2],\"b\":\"c\"}");

    for input in [
        " {\"a\":[1,2],\"b\":\"c\"} ".as_bytes(),
        b"{ \"a\" : [ 1 , 2 ] , \"b\" : \"c\" }",
        b"{\n\t\"a\": [1,\r\n 2],\n\t\"b\": \"c\"\n}",
        b"\t\n{\"a\"\r:[1\n,2 ]   ,\"b\":\t\"c\"}\r\n",
    ] {
        assert_eq!(expected, decode_checked(input));
    }
}

#[test]
fn read_deeply_nested() {
    let mut input = Vec::new();
    input.extend(iter::repeat(b'[').take(100_000));
    input.extend(iter::repeat(b']').take(100_000));

    let value = decode(&input).unwrap();

    let mut depth = 1;
    let mut current = &value;
    while let Some(inner) = current.get(0) {
        depth += 1;
        current = inner;
    }
    assert_eq!(100_000, depth);

    // encoding walks back out without recursion too
    assert_eq!(input, encode(&value).unwrap());
}

#[test]
fn read_generated() {
    // debug builds are slow, so just run a handful of cases
    let iterations = {
        #[cfg(debug)]
        {
            100
        }

        #[cfg(not(debug))]
        {
            1000
        }
    };

    for _ in 0..iterations {
        let input = some::json_document();

        let expected: serde_json::Value = match serde_json::from_str(&input) {
            Ok(value) => value,
            Err(err) => panic!("parsing `{}`: {}", input, err),
        };

        let value = decode_checked(input.as_bytes());

        assert_eq!(expected, value.to_serde_value(), "input: `{}`", input);

        roundtrip(&value);
    }
}

#[test]
fn encode_built_trees() {
    let mut object = Value::object();
    object.emplace("name", Value::from("acorn")).unwrap();
    object.emplace("count", Value::from(3u64)).unwrap();

    let mut tags = Value::array();
    tags.push(Value::from(true)).unwrap();
    tags.push(Value::null()).unwrap();
    tags.push(Value::from(-1i64)).unwrap();
    object.emplace("tags", tags).unwrap();

    assert_eq!(
        b"{\"count\":3,\"name\":\"acorn\",\"tags\":[true,null,-1]}".to_vec(),
        encode(&object).unwrap()
    );

    roundtrip(&object);
}

#[test]
fn encode_pretty_shape() {
    let value = decode_checked(b"{\"a\":[1,2],\"b\":{},\"c\":\"d\"}");

    let expected = "{\n  \"a\": [\n    1,\n    2\n  ],\n  \"b\": {},\n  \"c\": \"d\"\n}";

    assert_eq!(
        expected.as_bytes().to_vec(),
        encode_pretty(&value).unwrap()
    );
}

#[test]
fn encode_pretty_scalars_are_bare() {
    assert_eq!(b"1".to_vec(), encode_pretty(&Value::from(1u64)).unwrap());
    assert_eq!(b"null".to_vec(), encode_pretty(&Value::null()).unwrap());
    assert_eq!(
        b"\"hi\"".to_vec(),
        encode_pretty(&Value::from("hi")).unwrap()
    );
}

#[test]
fn reentrant_contexts_compose() {
    use crate::{DecodeContext, EncodeContext};

    // a typed layer can decode a sequence of values from one buffer
    let mut ctx = DecodeContext::new(b" 1 \"two\" [3]");

    ctx.skip_whitespace();
    let first = ctx.decode_value().unwrap();
    ctx.skip_whitespace();
    let second = ctx.decode_value().unwrap();
    ctx.skip_whitespace();
    let third = ctx.decode_value().unwrap();

    assert_eq!(Some(1), first.as_unsigned());
    assert_eq!(Some("two"), second.as_str());
    assert_eq!(Some(3), third.get(0).unwrap().as_unsigned());
    assert!(ctx.is_at_end());

    // and encode them back interleaved with its own bytes
    let mut ctx = EncodeContext::with_capacity(16);
    ctx.encode_value(&first).unwrap();
    ctx.encode_value(&second).unwrap();
    ctx.encode_value(&third).unwrap();

    assert_eq!(b"1\"two\"[3]".to_vec(), ctx.into_bytes());
}
