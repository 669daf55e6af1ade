/*!
String escaping for the encode engine.

Escaping works on fixed 1024-byte chunks of the input so the inner loop
stays in cache for very large strings. Within a chunk, runs of bytes that
need no escaping are copied wholesale. Bytes with the high bit set are
always part of a multi-byte UTF8 sequence and never need escaping, so a
chunk boundary landing mid-sequence is harmless.
*/

const CHUNK_SIZE: usize = 1024;

/**
Write `value` to `output` as a quoted JSON string.
*/
pub(in crate::en) fn write_escaped(output: &mut Vec<u8>, value: &str) {
    output.push(b'"');

    for chunk in value.as_bytes().chunks(CHUNK_SIZE) {
        write_escaped_chunk(output, chunk);
    }

    output.push(b'"');
}

fn write_escaped_chunk(output: &mut Vec<u8>, chunk: &[u8]) {
    let mut plain_start = 0;

    for (index, &byte) in chunk.iter().enumerate() {
        if needs_escape(byte) {
            output.extend_from_slice(get_unchecked!(chunk, plain_start..index));
            write_escape(output, byte);

            plain_start = index + 1;
        }
    }

    output.extend_from_slice(get_unchecked!(chunk, plain_start..));
}

#[inline(always)]
fn needs_escape(byte: u8) -> bool {
    byte < 0x20 || byte == b'"' || byte == b'\\'
}

fn write_escape(output: &mut Vec<u8>, byte: u8) {
    match byte {
        b'"' => output.extend_from_slice(b"\\\""),
        b'\\' => output.extend_from_slice(b"\\\\"),
        0x08 => output.extend_from_slice(b"\\b"),
        0x0c => output.extend_from_slice(b"\\f"),
        b'\n' => output.extend_from_slice(b"\\n"),
        b'\r' => output.extend_from_slice(b"\\r"),
        b'\t' => output.extend_from_slice(b"\\t"),
        _ => {
            // control bytes without a named escape
            const HEX: &[u8; 16] = b"0123456789abcdef";

            output.extend_from_slice(&[
                b'\\',
                b'u',
                b'0',
                b'0',
                HEX[(byte >> 4) as usize],
                HEX[(byte & 0xf) as usize],
            ]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escaped(value: &str) -> String {
        let mut output = Vec::new();
        write_escaped(&mut output, value);

        String::from_utf8(output).unwrap()
    }

    #[test]
    fn plain_strings_pass_through() {
        assert_eq!(r#""hello""#, escaped("hello"));
        assert_eq!(r#""""#, escaped(""));
        assert_eq!("\"h\u{e5}llo\"", escaped("hållo"));
    }

    #[test]
    fn named_escapes() {
        assert_eq!(r#""a\"b\\c""#, escaped("a\"b\\c"));
        assert_eq!(r#""\b\f\n\r\t""#, escaped("\u{8}\u{c}\n\r\t"));
    }

    #[test]
    fn unnamed_control_bytes_use_unicode_escapes() {
        assert_eq!(r#""\u0000\u0001\u001f""#, escaped("\u{0}\u{1}\u{1f}"));
    }

    #[test]
    fn escapes_across_chunk_boundaries() {
        let mut value = "a".repeat(CHUNK_SIZE - 1);
        value.push('"');
        value.push_str("tail");

        let expected = format!("\"{}\\\"tail\"", "a".repeat(CHUNK_SIZE - 1));
        assert_eq!(expected, escaped(&value));

        // a multi-byte character straddling the chunk boundary
        let mut value = "b".repeat(CHUNK_SIZE - 1);
        value.push('\u{e5}');

        assert_eq!(format!("\"{value}\""), escaped(&value));
    }
}
