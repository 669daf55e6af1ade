/*!
The number codec.

Decoding is a two-pass affair: a lookahead pass classifies the token's
shape (signed, unsigned, or floating point) and finds its end without
building a value, then the concrete converter re-scans the token. The
shape drives which kind of value the decoder builds, so `1` decodes as an
unsigned integer, `-1` as a signed integer, and `1.0` or `1e3` as a
float.

Integer encoding goes through `itoa` on the nonnegative magnitude with
the sign emitted separately; float encoding goes through `ryu` for the
shortest round-trippable form.
*/

use lexical_parse_float::FromLexical as _;

use crate::{
    error::{Error, ErrorKind},
    value::Value,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumberShape {
    Unsigned,
    Signed,
    Float,
}

/**
Decode the number starting at `offset`, returning the value and the
offset just past it.
*/
pub(crate) fn decode(input: &[u8], offset: usize) -> Result<(Value, usize), Error> {
    let (shape, end) = classify(input, offset)?;

    let token = get_unchecked!(input, offset..end);

    let value = match shape {
        NumberShape::Unsigned => Value::unsigned(decode_unsigned(token, offset)?),
        NumberShape::Signed => Value::signed(decode_signed(token, offset)?),
        NumberShape::Float => {
            let float = f64::from_lexical(token).map_err(|_| {
                Error::new(
                    ErrorKind::InvalidNumberShape("malformed floating point number".into()),
                    offset,
                )
            })?;

            Value::float(float)
        }
    };

    Ok((value, end))
}

/**
Classify the shape of the number starting at `start` without consuming
it, returning the shape and the offset just past the token.

Each sub-part is validated as it's scanned: the integer part needs at
least one digit and may only start with `0` if it *is* `0`, a fraction
needs a digit after the `.`, and an exponent needs a digit after the
`e`/`E` and optional sign.
*/
pub(crate) fn classify(input: &[u8], start: usize) -> Result<(NumberShape, usize), Error> {
    let mut offset = start;

    let negative = matches!(input.get(offset), Some(b'-'));
    if negative {
        offset += 1;
    }

    match input.get(offset) {
        Some(b'0') => {
            offset += 1;

            if matches!(input.get(offset), Some(b'0'..=b'9')) {
                return Err(Error::new(
                    ErrorKind::InvalidNumberShape("leading zeros are not allowed".into()),
                    offset,
                ));
            }
        }
        Some(b'1'..=b'9') => {
            offset += 1;

            while matches!(input.get(offset), Some(b'0'..=b'9')) {
                offset += 1;
            }
        }
        Some(_) => {
            return Err(Error::new(
                ErrorKind::InvalidNumberShape("expected a digit".into()),
                offset,
            ));
        }
        None => return Err(Error::new(ErrorKind::UnexpectedEndOfInput, offset)),
    }

    let mut float = false;

    if matches!(input.get(offset), Some(b'.')) {
        float = true;
        offset += 1;

        match input.get(offset) {
            Some(b'0'..=b'9') => {
                while matches!(input.get(offset), Some(b'0'..=b'9')) {
                    offset += 1;
                }
            }
            Some(_) => {
                return Err(Error::new(
                    ErrorKind::InvalidNumberShape("expected a digit after `.`".into()),
                    offset,
                ));
            }
            None => return Err(Error::new(ErrorKind::UnexpectedEndOfInput, offset)),
        }
    }

    if matches!(input.get(offset), Some(b'e' | b'E')) {
        float = true;
        offset += 1;

        if matches!(input.get(offset), Some(b'+' | b'-')) {
            offset += 1;
        }

        match input.get(offset) {
            Some(b'0'..=b'9') => {
                while matches!(input.get(offset), Some(b'0'..=b'9')) {
                    offset += 1;
                }
            }
            Some(_) => {
                return Err(Error::new(
                    ErrorKind::InvalidNumberShape("expected a digit in the exponent".into()),
                    offset,
                ));
            }
            None => return Err(Error::new(ErrorKind::UnexpectedEndOfInput, offset)),
        }
    }

    let shape = if float {
        NumberShape::Float
    } else if negative {
        NumberShape::Signed
    } else {
        NumberShape::Unsigned
    };

    Ok((shape, offset))
}

#[cold]
fn overflow(offset: usize) -> Error {
    Error::new(
        ErrorKind::InvalidNumberShape("integer overflows 64 bits".into()),
        offset,
    )
}

fn decode_unsigned(digits: &[u8], start: usize) -> Result<u64, Error> {
    let mut value = 0u64;

    for &byte in digits {
        test_assert!(byte.is_ascii_digit());

        value = value
            .checked_mul(10)
            .and_then(|value| value.checked_add((byte - b'0') as u64))
            .ok_or_else(|| overflow(start))?;
    }

    Ok(value)
}

fn decode_signed(token: &[u8], start: usize) -> Result<i64, Error> {
    test_assert_eq!(Some(&b'-'), token.first());

    // the magnitude of `i64::MIN` doesn't fit in an `i64`, so accumulate
    // unsigned and negate with wraparound at the end
    let magnitude = decode_unsigned(get_unchecked!(token, 1..), start)?;

    if magnitude > i64::MAX as u64 + 1 {
        return Err(overflow(start));
    }

    Ok(magnitude.wrapping_neg() as i64)
}

pub(crate) fn encode_unsigned(output: &mut Vec<u8>, value: u64) {
    let mut formatted = itoa::Buffer::new();
    output.extend_from_slice(formatted.format(value).as_bytes());
}

pub(crate) fn encode_signed(output: &mut Vec<u8>, value: i64) {
    if value < 0 {
        output.push(b'-');
    }

    encode_unsigned(output, value.unsigned_abs());
}

pub(crate) fn encode_float(output: &mut Vec<u8>, value: f64, offset: usize) -> Result<(), Error> {
    if !value.is_finite() {
        return Err(Error::new(ErrorKind::NonFiniteFloat, offset));
    }

    let mut formatted = ryu::Buffer::new();
    output.extend_from_slice(formatted.format_finite(value).as_bytes());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_ok(input: &str) -> (NumberShape, usize) {
        classify(input.as_bytes(), 0).expect("classification failed")
    }

    #[test]
    fn classify_shapes() {
        assert_eq!((NumberShape::Unsigned, 1), classify_ok("0"));
        assert_eq!((NumberShape::Unsigned, 2), classify_ok("42"));
        assert_eq!((NumberShape::Signed, 2), classify_ok("-7"));
        assert_eq!((NumberShape::Signed, 2), classify_ok("-0"));
        assert_eq!((NumberShape::Float, 4), classify_ok("3.14"));
        assert_eq!((NumberShape::Float, 4), classify_ok("1e10"));
        assert_eq!((NumberShape::Float, 6), classify_ok("-2.5e3"));
        assert_eq!((NumberShape::Float, 7), classify_ok("1.5E-10"));
    }

    #[test]
    fn classify_stops_at_the_first_non_number_byte() {
        assert_eq!((NumberShape::Unsigned, 2), classify_ok("42,"));
        assert_eq!((NumberShape::Float, 3), classify_ok("1.5]"));
        assert_eq!((NumberShape::Unsigned, 1), classify_ok("0 "));
    }

    #[test]
    fn classify_rejects_malformed_shapes() {
        for (input, offset) in [
            ("01", 1),
            ("-", 1),
            ("-x", 1),
            ("1.", 2),
            ("1.e5", 2),
            ("1e", 2),
            ("1e+", 3),
            ("1e+x", 3),
            (".5", 0),
        ] {
            let err = classify(input.as_bytes(), 0).unwrap_err();
            assert_eq!(offset, err.offset(), "input: {input:?}");
        }
    }

    #[test]
    fn decode_integer_boundaries() {
        let check = |input: &str| decode(input.as_bytes(), 0).map(|(value, _)| value);

        assert_eq!(Some(u64::MAX), check("18446744073709551615").unwrap().as_unsigned());
        assert!(check("18446744073709551616").is_err());

        assert_eq!(Some(i64::MIN), check("-9223372036854775808").unwrap().as_signed());
        assert!(check("-9223372036854775809").is_err());
    }

    #[test]
    fn decode_floats() {
        let check = |input: &str| {
            decode(input.as_bytes(), 0)
                .map(|(value, _)| value.as_float().expect("expected a float"))
        };

        assert_eq!(3.14, check("3.14").unwrap());
        assert_eq!(-0.5, check("-0.5").unwrap());
        assert_eq!(1e300, check("1e300").unwrap());
        assert_eq!(0.0, check("0.0").unwrap());
    }

    #[test]
    fn encode_integers() {
        let mut output = Vec::new();
        encode_signed(&mut output, i64::MIN);
        output.push(b' ');
        encode_unsigned(&mut output, u64::MAX);

        assert_eq!(
            "-9223372036854775808 18446744073709551615",
            std::str::from_utf8(&output).unwrap()
        );
    }

    #[test]
    fn encode_non_finite_floats_fail() {
        let mut output = Vec::new();

        assert!(encode_float(&mut output, f64::NAN, 0).is_err());
        assert!(encode_float(&mut output, f64::INFINITY, 0).is_err());
        assert!(output.is_empty());

        encode_float(&mut output, 3.14, 0).unwrap();
        assert_eq!(b"3.14", &output[..]);
    }
}
