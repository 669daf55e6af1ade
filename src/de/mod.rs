/*!
The decode engine.

[`decode`] builds a [`Value`] tree from raw JSON bytes in a single
forward pass. Container nesting is tracked with an explicit frame stack
instead of recursion, so arbitrarily deep untrusted documents can't
overflow the call stack; the only per-depth cost is a 24-byte frame on
the heap.

The engine leans on the scan primitives for the two hot loops (whitespace
between tokens, unescaped string content) and on the number codec for
numeric tokens. Strings borrow straight from the input when they contain
no escapes and fall back to an incremental unescaping buffer when they
do.

[`DecodeContext`] is public and reentrant: a typed codec layer can drive
`peek`/`skip_whitespace`/`decode_value` itself to decode aggregate types
field by field.
*/

use crate::{
    error::{Error, ErrorKind},
    num,
    scan::{self, CpuFeatures},
    value::Value,
};

/**
Decode a complete JSON document.

Leading and trailing whitespace is permitted; any other trailing content
is an error. The first malformed byte aborts the whole decode with its
offset; no partial tree is ever returned.
*/
pub fn decode(input: &[u8]) -> Result<Value, Error> {
    decode_with_features(input, CpuFeatures::detect())
}

/**
Decode a complete JSON document with an explicit CPU feature snapshot.

`decode` probes the CPU itself; this entrypoint pins the scanning tiers
instead, which tests and fuzzing use to compare the vectorized and
portable paths on the same input.
*/
pub fn decode_with_features(input: &[u8], features: CpuFeatures) -> Result<Value, Error> {
    let mut ctx = DecodeContext::with_features(input, features);

    ctx.skip_whitespace();
    let value = ctx.decode_value()?;
    ctx.skip_whitespace();

    if !ctx.is_at_end() {
        return Err(Error::new(
            ErrorKind::MalformedInput("unexpected trailing content".into()),
            ctx.offset(),
        ));
    }

    Ok(value)
}

/**
A pending container during decoding.

Object frames track the entry index their next completed value belongs
to; a duplicate key leaves no pending slot and the value decoded for it
is dropped.
*/
enum Frame {
    Array(Value),
    Object {
        object: Value,
        pending: Option<usize>,
    },
}

/**
Decoding state over a borrowed input buffer.

The context owns the cursor and the CPU feature snapshot used by the
scanning tiers. `decode_value` consumes exactly one complete value from
the current position and can be called repeatedly.
*/
pub struct DecodeContext<'a> {
    input: &'a [u8],
    offset: usize,
    features: CpuFeatures,
}

impl<'a> DecodeContext<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        DecodeContext::with_features(input, CpuFeatures::detect())
    }

    pub fn with_features(input: &'a [u8], features: CpuFeatures) -> Self {
        DecodeContext {
            input,
            offset: 0,
            features,
        }
    }

    /**
    The current byte offset into the input.
    */
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.offset >= self.input.len()
    }

    /**
    The byte at the current position, without consuming it.
    */
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.offset).copied()
    }

    /**
    Advance past any whitespace at the current position.
    */
    #[inline]
    pub fn skip_whitespace(&mut self) {
        self.offset = scan::skip_whitespace(self.input, self.offset, self.features);
    }

    /**
    Decode one complete value starting at the current position.
    */
    pub fn decode_value(&mut self) -> Result<Value, Error> {
        let mut stack = Vec::new();

        'value: loop {
            // decode a leaf, or open a container and come back around for
            // its first child
            let mut current = match self.peek() {
                Some(b'[') => {
                    self.offset += 1;
                    self.skip_whitespace();

                    if self.peek() == Some(b']') {
                        self.offset += 1;
                        Value::array()
                    } else {
                        stack.push(Frame::Array(Value::array()));
                        continue 'value;
                    }
                }
                Some(b'{') => {
                    self.offset += 1;
                    self.skip_whitespace();

                    if self.peek() == Some(b'}') {
                        self.offset += 1;
                        Value::object()
                    } else {
                        let mut object = Value::object();
                        let pending = self.decode_key(&mut object)?;

                        stack.push(Frame::Object { object, pending });
                        continue 'value;
                    }
                }
                Some(b'"') => self.decode_string()?,
                Some(b't') => {
                    self.expect_literal(b"true")?;
                    Value::from(true)
                }
                Some(b'f') => {
                    self.expect_literal(b"false")?;
                    Value::from(false)
                }
                Some(b'n') => {
                    self.expect_literal(b"null")?;
                    Value::null()
                }
                Some(b'-' | b'0'..=b'9') => self.decode_number()?,
                Some(_) => return Err(self.unexpected("expected a value")),
                None => return Err(self.end_of_input()),
            };

            // drain: attach the completed value to enclosing frames until
            // one of them needs another child
            loop {
                let Some(frame) = stack.last_mut() else {
                    return Ok(current);
                };

                match frame {
                    Frame::Array(array) => {
                        array.push(current)?;
                        self.skip_whitespace();

                        match self.peek() {
                            Some(b',') => {
                                self.offset += 1;
                                self.skip_whitespace();
                                continue 'value;
                            }
                            Some(b']') => {
                                self.offset += 1;
                                current = array.take();
                                stack.pop();
                            }
                            Some(_) => return Err(self.unexpected("expected `,` or `]`")),
                            None => return Err(self.end_of_input()),
                        }
                    }
                    Frame::Object { object, pending } => {
                        match pending.take() {
                            Some(index) => object.set_entry_value(index, current),
                            // a duplicate key keeps its first value
                            None => drop(current),
                        }

                        self.skip_whitespace();

                        match self.peek() {
                            Some(b',') => {
                                self.offset += 1;
                                *pending = self.decode_key(object)?;
                                continue 'value;
                            }
                            Some(b'}') => {
                                self.offset += 1;
                                current = object.take();
                                stack.pop();
                            }
                            Some(_) => return Err(self.unexpected("expected `,` or `}`")),
                            None => return Err(self.end_of_input()),
                        }
                    }
                }
            }
        }
    }

    /**
    Decode the key and `:` of the next object entry, emplacing a null
    placeholder for its value.

    Returns the entry index the decoded value should land in, or `None`
    when the key is a duplicate and the value should be dropped instead.
    */
    fn decode_key(&mut self, object: &mut Value) -> Result<Option<usize>, Error> {
        self.skip_whitespace();

        if self.peek() != Some(b'"') {
            return Err(self.unexpected("expected an object key"));
        }

        let key = self.decode_string()?;

        self.skip_whitespace();

        match self.peek() {
            Some(b':') => self.offset += 1,
            Some(_) => return Err(self.unexpected("expected `:`")),
            None => return Err(self.end_of_input()),
        }

        self.skip_whitespace();

        // `decode_string` always produces a string value
        let key = from_utf8_unchecked!(key.string_bytes());
        let (index, inserted) = object.emplace(key, Value::null())?;

        Ok(inserted.then_some(index))
    }

    /**
    Decode the string starting at the current position, which must be a
    `"` byte.

    Strings without escapes are taken straight from the input; escapes
    switch to an unescaping buffer that interleaves decoded escapes with
    scanned runs of plain bytes.
    */
    pub fn decode_string(&mut self) -> Result<Value, Error> {
        test_assert_eq!(Some(b'"'), self.peek());

        let start = self.offset;
        self.offset += 1;

        let run_start = self.offset;
        let run_end = scan::skip_simple(self.input, run_start, self.features);

        match self.input.get(run_end) {
            Some(b'"') => {
                let unescaped = self.check_utf8(run_start, run_end)?;
                self.offset = run_end + 1;

                Value::try_string(unescaped)
            }
            Some(b'\\') => self.decode_escaped_string(start, run_start, run_end),
            None => Err(Error::new(ErrorKind::UnterminatedString, start)),
            Some(_) => unreachable!("the scan stops only at quotes and escapes"),
        }
    }

    #[inline(never)]
    fn decode_escaped_string(
        &mut self,
        start: usize,
        run_start: usize,
        run_end: usize,
    ) -> Result<Value, Error> {
        let mut buffer = String::with_capacity(run_end - run_start + 16);
        buffer.push_str(self.check_utf8(run_start, run_end)?);

        let mut offset = run_end;

        loop {
            offset = self.decode_escape(offset, &mut buffer)?;

            let next_end = scan::skip_simple(self.input, offset, self.features);
            buffer.push_str(self.check_utf8(offset, next_end)?);

            match self.input.get(next_end) {
                Some(b'"') => {
                    self.offset = next_end + 1;

                    return Value::try_string(&buffer);
                }
                Some(b'\\') => offset = next_end,
                None => return Err(Error::new(ErrorKind::UnterminatedString, start)),
                Some(_) => unreachable!("the scan stops only at quotes and escapes"),
            }
        }
    }

    /**
    Decode the escape sequence at `offset` (a `\` byte) into `buffer`,
    returning the offset just past it.
    */
    fn decode_escape(&mut self, offset: usize, buffer: &mut String) -> Result<usize, Error> {
        test_assert_eq!(Some(&b'\\'), self.input.get(offset));

        match self.input.get(offset + 1) {
            Some(b'"') => {
                buffer.push('"');
                Ok(offset + 2)
            }
            Some(b'\\') => {
                buffer.push('\\');
                Ok(offset + 2)
            }
            Some(b'/') => {
                buffer.push('/');
                Ok(offset + 2)
            }
            Some(b'b') => {
                buffer.push('\u{8}');
                Ok(offset + 2)
            }
            Some(b'f') => {
                buffer.push('\u{c}');
                Ok(offset + 2)
            }
            Some(b'n') => {
                buffer.push('\n');
                Ok(offset + 2)
            }
            Some(b'r') => {
                buffer.push('\r');
                Ok(offset + 2)
            }
            Some(b't') => {
                buffer.push('\t');
                Ok(offset + 2)
            }
            Some(b'u') => self.decode_unicode_escape(offset, buffer),
            Some(_) => Err(Error::new(ErrorKind::InvalidEscape, offset)),
            None => Err(self.end_of_input()),
        }
    }

    /**
    Decode a `\uXXXX` escape, combining surrogate pairs into a single
    character.

    A high surrogate must be followed immediately by a `\uXXXX` low
    surrogate; lone or mismatched surrogates can't form valid text and
    are rejected.
    */
    fn decode_unicode_escape(&mut self, offset: usize, buffer: &mut String) -> Result<usize, Error> {
        let code = self.hex4(offset + 2)? as u32;

        if (0xd800..=0xdbff).contains(&code) {
            if self.input.get(offset + 6) == Some(&b'\\') && self.input.get(offset + 7) == Some(&b'u')
            {
                let low = self.hex4(offset + 8)? as u32;

                if (0xdc00..=0xdfff).contains(&low) {
                    let combined = 0x10000 + ((code - 0xd800) << 10) + (low - 0xdc00);

                    // a combined surrogate pair is always a valid char
                    let decoded = char::from_u32(combined)
                        .ok_or_else(|| Error::new(ErrorKind::InvalidEscape, offset))?;

                    buffer.push(decoded);
                    return Ok(offset + 12);
                }
            }

            return Err(Error::new(ErrorKind::InvalidEscape, offset));
        }

        if (0xdc00..=0xdfff).contains(&code) {
            return Err(Error::new(ErrorKind::InvalidEscape, offset));
        }

        // a non-surrogate code below 0x10000 is always a valid char
        let decoded =
            char::from_u32(code).ok_or_else(|| Error::new(ErrorKind::InvalidEscape, offset))?;

        buffer.push(decoded);
        Ok(offset + 6)
    }

    fn hex4(&self, offset: usize) -> Result<u16, Error> {
        let mut value = 0u16;

        for i in 0..4 {
            let byte = self
                .input
                .get(offset + i)
                .ok_or_else(|| self.end_of_input())?;

            let digit = (*byte as char)
                .to_digit(16)
                .ok_or_else(|| Error::new(ErrorKind::InvalidEscape, offset + i))?;

            value = value << 4 | digit as u16;
        }

        Ok(value)
    }

    /**
    Decode the number starting at the current position.
    */
    pub fn decode_number(&mut self) -> Result<Value, Error> {
        let (value, end) = num::decode(self.input, self.offset)?;
        self.offset = end;

        Ok(value)
    }

    fn expect_literal(&mut self, literal: &'static [u8]) -> Result<(), Error> {
        let end = self.offset + literal.len();

        if self.input.len() < end {
            return Err(self.end_of_input());
        }

        if get_unchecked!(self.input, self.offset..end) != literal {
            return Err(self.unexpected("expected a literal"));
        }

        self.offset = end;
        Ok(())
    }

    fn check_utf8(&self, start: usize, end: usize) -> Result<&'a str, Error> {
        std::str::from_utf8(get_unchecked!(self.input, start..end)).map_err(|err| {
            Error::new(
                ErrorKind::MalformedInput("invalid UTF8 in string".into()),
                start + err.valid_up_to(),
            )
        })
    }

    #[cold]
    fn unexpected(&self, expected: &'static str) -> Error {
        Error::new(ErrorKind::MalformedInput(expected.into()), self.offset)
    }

    #[cold]
    fn end_of_input(&self) -> Error {
        Error::new(ErrorKind::UnexpectedEndOfInput, self.input.len())
    }
}
