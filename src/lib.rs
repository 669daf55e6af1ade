/*!
# `acorn-json`

A compact JSON value tree with vectorized byte scanning.

Every node in the tree is a fixed 16-byte [`Value`]: short strings are
stored entirely inline, and longer strings, arrays, and objects own a
single heap buffer with a doubling capacity. Objects keep their entries
sorted by key bytes, so lookup is a binary search and encoding order is
deterministic.

Decoding and encoding both drive explicit stacks rather than recursion,
so untrusted documents can nest arbitrarily deep without overflowing the
call stack. The decoder's hot loops (inter-token whitespace and
unescaped string content) run on SIMD tiers selected at runtime from the
CPU's capabilities, with a portable word-at-a-time fallback that every
tier must agree with byte for byte.

## ⚠️ CAREFUL

The representation and scanning modules contain unsafe code on hot
paths. Unchecked operations go through macros that use the checked
variant in test/debug builds (or when building with `ACORNJSON_CHECKED`
set) so mistakes surface as panics rather than UB.

## Example

```
use acorn_json::{decode, encode};

let value = decode(br#"{"b": 1, "a": [true, "two"]}"#)?;

assert_eq!(Some(1), value.get_key("b").and_then(|b| b.to_u64()));

// objects encode in sorted key order
assert_eq!(br#"{"a":[true,"two"],"b":1}"#.to_vec(), encode(&value)?);
# Ok::<(), acorn_json::Error>(())
```
*/

#![deny(warnings)]
#![allow(clippy::missing_safety_doc, clippy::question_mark)]

#[macro_use]
mod macros;

mod error;
mod num;
mod scan;
mod value;

pub mod de;
pub mod en;

pub use self::{
    de::{decode, decode_with_features, DecodeContext},
    en::{encode, encode_pretty, EncodeContext},
    error::{Error, ErrorKind},
    scan::CpuFeatures,
    value::{Entries, Kind, Value},
};

#[cfg(test)]
mod tests;
