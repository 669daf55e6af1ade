/*!
The encode engine.

Encoding walks the value tree with an explicit stack of
`(node, child index)` frames, mirroring the decoder: no recursion, so a
tree of any depth encodes without overflowing the call stack. The frames
borrow the tree, so the output can't outlive a mutation of the value
being encoded.

Compact and pretty output share the traversal; pretty mode interleaves
newlines and two-space indentation and puts a space after each `:`.
*/

pub(crate) mod escape;

use crate::{error::Error, num, value::Value};

/**
Encode a value as compact JSON.
*/
pub fn encode(value: &Value) -> Result<Vec<u8>, Error> {
    let mut ctx = EncodeContext::new();
    ctx.encode_value(value)?;

    Ok(ctx.into_bytes())
}

/**
Encode a value as indented, human-readable JSON.
*/
pub fn encode_pretty(value: &Value) -> Result<Vec<u8>, Error> {
    let mut ctx = EncodeContext::new();
    ctx.encode_value_pretty(value)?;

    Ok(ctx.into_bytes())
}

struct Frame<'a> {
    value: &'a Value,
    offset: usize,
}

/**
Encoding state over an append-only output buffer.

The context is reentrant: a typed codec layer can interleave its own
writes with `encode_value` calls for aggregate fields. A failed encode
leaves whatever it had written in the buffer; callers that need
all-or-nothing output should encode into a fresh context.
*/
#[derive(Default)]
pub struct EncodeContext {
    output: Vec<u8>,
}

impl EncodeContext {
    pub fn new() -> Self {
        EncodeContext { output: Vec::new() }
    }

    /**
    A context whose buffer is pre-sized for roughly `capacity` bytes of
    output.
    */
    pub fn with_capacity(capacity: usize) -> Self {
        EncodeContext {
            output: Vec::with_capacity(capacity),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.output
    }

    /**
    Append one value to the output as compact JSON.
    */
    pub fn encode_value(&mut self, value: &Value) -> Result<(), Error> {
        self.encode_inner(value, false)
    }

    /**
    Append one value to the output as indented JSON.
    */
    pub fn encode_value_pretty(&mut self, value: &Value) -> Result<(), Error> {
        self.encode_inner(value, true)
    }

    fn encode_inner(&mut self, root: &Value, pretty: bool) -> Result<(), Error> {
        let mut stack: Vec<Frame> = Vec::new();
        let mut current = root;

        loop {
            // open non-empty containers until `current` is a leaf, writing
            // the first key on the way into each object
            loop {
                match current {
                    value if value.is_array() && !value.is_empty() => {
                        self.output.push(b'[');
                        stack.push(Frame { value, offset: 0 });

                        if pretty {
                            self.newline_indent(stack.len());
                        }

                        current = value.get(0).unwrap();
                    }
                    value if value.is_object() && !value.is_empty() => {
                        self.output.push(b'{');
                        stack.push(Frame { value, offset: 0 });

                        if pretty {
                            self.newline_indent(stack.len());
                        }

                        let (key, child) = value.entry(0).unwrap();
                        self.write_key(key, pretty);

                        current = child;
                    }
                    _ => break,
                }
            }

            self.write_leaf(current)?;

            // drain completed frames, stopping at the first one with
            // another child to write
            loop {
                let Some(frame) = stack.last_mut() else {
                    return Ok(());
                };

                frame.offset += 1;

                let value = frame.value;
                let offset = frame.offset;

                if offset < value.len() {
                    self.output.push(b',');

                    if pretty {
                        self.newline_indent(stack.len());
                    }

                    if value.is_object() {
                        let (key, child) = value.entry(offset).unwrap();
                        self.write_key(key, pretty);

                        current = child;
                    } else {
                        current = value.get(offset).unwrap();
                    }

                    break;
                }

                if pretty {
                    self.newline_indent(stack.len() - 1);
                }

                self.output.push(if value.is_object() { b'}' } else { b']' });
                stack.pop();
            }
        }
    }

    fn write_leaf(&mut self, value: &Value) -> Result<(), Error> {
        if let Some(s) = value.as_str() {
            escape::write_escaped(&mut self.output, s);
        } else if let Some(signed) = value.as_signed() {
            num::encode_signed(&mut self.output, signed);
        } else if let Some(unsigned) = value.as_unsigned() {
            num::encode_unsigned(&mut self.output, unsigned);
        } else if let Some(float) = value.as_float() {
            let offset = self.output.len();
            num::encode_float(&mut self.output, float, offset)?;
        } else if let Some(boolean) = value.as_bool() {
            self.output
                .extend_from_slice(if boolean { b"true" } else { b"false" });
        } else if value.is_array() {
            test_assert!(value.is_empty());
            self.output.extend_from_slice(b"[]");
        } else if value.is_object() {
            test_assert!(value.is_empty());
            self.output.extend_from_slice(b"{}");
        } else {
            self.output.extend_from_slice(b"null");
        }

        Ok(())
    }

    fn write_key(&mut self, key: &str, pretty: bool) {
        escape::write_escaped(&mut self.output, key);
        self.output.push(b':');

        if pretty {
            self.output.push(b' ');
        }
    }

    fn newline_indent(&mut self, depth: usize) {
        self.output.push(b'\n');

        let indented = self.output.len() + depth * 2;
        self.output.resize(indented, b' ');
    }
}
