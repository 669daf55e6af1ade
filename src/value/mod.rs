/*!
The JSON value tree.

[`Value`] is a 16-byte tagged handle over the packed representation in
[`repr`]. Strings of up to 15 bytes live entirely inline; longer strings,
arrays, and objects own a single heap buffer described by a pointer, a
48-bit size, and a capacity exponent. Object entries are kept sorted by
key bytes so lookup is a binary search and encoding walks entries in a
deterministic order.
*/

use std::{fmt, mem, ptr, slice};

pub(crate) mod repr;

use self::repr::{
    capacity, capacity_2exp_for, alloc_buffer, dealloc_buffer, Entry, Long, Repr, Short,
    SHORT_CAPACITY, TAG_ARRAY, TAG_FALSE, TAG_FLOAT, TAG_NULL, TAG_OBJECT, TAG_SHORT_MAX,
    TAG_SINT, TAG_STRING, TAG_TRUE, TAG_UINT,
};

use crate::error::Error;

/**
A JSON value.

A `Value` is always exactly 16 bytes. Null, booleans, numbers, and short
strings are stored inline; long strings and containers own heap buffers
that are freed when the value is dropped.
*/
pub struct Value {
    repr: Repr,
}

// values form a tree with unique ownership of their buffers
unsafe impl Send for Value {}
unsafe impl Sync for Value {}

const _: () = assert!(mem::size_of::<Value>() == 16);

/**
The kind of data stored in a [`Value`].

Numbers keep the kind they were built or decoded with. A document
containing `-1` stores a signed integer and one containing `1` stores
an unsigned integer; use the `to_*` conversions on [`Value`] when the
distinction doesn't matter.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Null,
    Bool,
    SignedInt,
    UnsignedInt,
    Float,
    String,
    Array,
    Object,
}

impl Value {
    /**
    The null value.
    */
    #[inline]
    pub fn null() -> Self {
        Value::pod(TAG_NULL)
    }

    /**
    An empty array. No buffer is allocated until the first push.
    */
    #[inline]
    pub fn array() -> Self {
        Value {
            repr: Repr {
                long: Long::empty(TAG_ARRAY),
            },
        }
    }

    /**
    An empty object. No buffer is allocated until the first insert.
    */
    #[inline]
    pub fn object() -> Self {
        Value {
            repr: Repr {
                long: Long::empty(TAG_OBJECT),
            },
        }
    }

    #[inline]
    fn pod(tag: u8) -> Self {
        Value {
            repr: Repr {
                header: repr::Header { data: [0; 15], tag },
            },
        }
    }

    #[inline]
    pub(crate) fn signed(value: i64) -> Self {
        Value {
            repr: Repr {
                sint: repr::Sint {
                    value,
                    _pad: [0; 7],
                    tag: TAG_SINT,
                },
            },
        }
    }

    #[inline]
    pub(crate) fn unsigned(value: u64) -> Self {
        Value {
            repr: Repr {
                uint: repr::Uint {
                    value,
                    _pad: [0; 7],
                    tag: TAG_UINT,
                },
            },
        }
    }

    #[inline]
    pub(crate) fn float(value: f64) -> Self {
        Value {
            repr: Repr {
                float: repr::Float {
                    value,
                    _pad: [0; 7],
                    tag: TAG_FLOAT,
                },
            },
        }
    }

    /**
    Build a string value, failing if a heap buffer is needed and can't
    be allocated. Strings of up to 15 bytes never allocate.
    */
    pub(crate) fn try_string(s: &str) -> Result<Self, Error> {
        let bytes = s.as_bytes();

        if bytes.len() <= SHORT_CAPACITY {
            let mut short = Short {
                bytes: [0; SHORT_CAPACITY],
                tag: (SHORT_CAPACITY - bytes.len()) as u8,
            };
            short.bytes[..bytes.len()].copy_from_slice(bytes);

            return Ok(Value { repr: Repr { short } });
        }

        let capacity_2exp = capacity_2exp_for(bytes.len());
        let ptr = alloc_buffer::<u8>(capacity(capacity_2exp))?;

        // SAFETY: the buffer was just allocated with room for at least `bytes.len()`
        unsafe {
            ptr::copy_nonoverlapping(bytes.as_ptr(), ptr, bytes.len());
        }

        let mut long = Long {
            ptr,
            size_lo: 0,
            size_hi: 0,
            capacity_2exp,
            tag: TAG_STRING,
        };
        long.set_size(bytes.len());

        Ok(Value { repr: Repr { long } })
    }

    #[inline]
    fn tag(&self) -> u8 {
        // SAFETY: every variant of `Repr` stores the tag in its final byte
        unsafe { self.repr.header.tag }
    }

    /**
    The kind of data stored in this value.
    */
    pub fn kind(&self) -> Kind {
        match self.tag() {
            tag if tag <= TAG_STRING => Kind::String,
            TAG_OBJECT => Kind::Object,
            TAG_ARRAY => Kind::Array,
            TAG_SINT => Kind::SignedInt,
            TAG_UINT => Kind::UnsignedInt,
            TAG_FLOAT => Kind::Float,
            TAG_FALSE | TAG_TRUE => Kind::Bool,
            _ => Kind::Null,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.tag() == TAG_NULL
    }

    #[inline]
    pub fn is_bool(&self) -> bool {
        matches!(self.tag(), TAG_FALSE | TAG_TRUE)
    }

    #[inline]
    pub fn is_number(&self) -> bool {
        matches!(self.tag(), TAG_SINT | TAG_UINT | TAG_FLOAT)
    }

    #[inline]
    pub fn is_string(&self) -> bool {
        self.tag() <= TAG_STRING
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        self.tag() == TAG_ARRAY
    }

    #[inline]
    pub fn is_object(&self) -> bool {
        self.tag() == TAG_OBJECT
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self.tag() {
            TAG_TRUE => Some(true),
            TAG_FALSE => Some(false),
            _ => None,
        }
    }

    /**
    The string contents, if this value is a string.
    */
    pub fn as_str(&self) -> Option<&str> {
        if self.is_string() {
            // string values are only ever built from `str` data
            Some(from_utf8_unchecked!(self.string_bytes()))
        } else {
            None
        }
    }

    /**
    The stored integer, if this value is a signed integer.
    */
    #[inline]
    pub fn as_signed(&self) -> Option<i64> {
        if self.tag() == TAG_SINT {
            // SAFETY: guarded by the tag
            Some(unsafe { self.repr.sint.value })
        } else {
            None
        }
    }

    /**
    The stored integer, if this value is an unsigned integer.
    */
    #[inline]
    pub fn as_unsigned(&self) -> Option<u64> {
        if self.tag() == TAG_UINT {
            // SAFETY: guarded by the tag
            Some(unsafe { self.repr.uint.value })
        } else {
            None
        }
    }

    /**
    The stored float, if this value is a float.
    */
    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        if self.tag() == TAG_FLOAT {
            // SAFETY: guarded by the tag
            Some(unsafe { self.repr.float.value })
        } else {
            None
        }
    }

    /**
    Convert any numeric value to `i64` with `as`-cast semantics.
    */
    pub fn to_i64(&self) -> Option<i64> {
        match self.tag() {
            // SAFETY: guarded by the tag in each arm
            TAG_SINT => Some(unsafe { self.repr.sint.value }),
            TAG_UINT => Some(unsafe { self.repr.uint.value } as i64),
            TAG_FLOAT => Some(unsafe { self.repr.float.value } as i64),
            _ => None,
        }
    }

    /**
    Convert any numeric value to `u64` with `as`-cast semantics.
    */
    pub fn to_u64(&self) -> Option<u64> {
        match self.tag() {
            // SAFETY: guarded by the tag in each arm
            TAG_SINT => Some(unsafe { self.repr.sint.value } as u64),
            TAG_UINT => Some(unsafe { self.repr.uint.value }),
            TAG_FLOAT => Some(unsafe { self.repr.float.value } as u64),
            _ => None,
        }
    }

    /**
    Convert any numeric value to `f64`.
    */
    pub fn to_f64(&self) -> Option<f64> {
        match self.tag() {
            // SAFETY: guarded by the tag in each arm
            TAG_SINT => Some(unsafe { self.repr.sint.value } as f64),
            TAG_UINT => Some(unsafe { self.repr.uint.value } as f64),
            TAG_FLOAT => Some(unsafe { self.repr.float.value }),
            _ => None,
        }
    }

    /**
    The number of bytes in a string, elements in an array, or entries in
    an object. Other kinds have length 0.
    */
    pub fn len(&self) -> usize {
        match self.tag() {
            tag if tag <= TAG_SHORT_MAX => SHORT_CAPACITY - tag as usize,
            // SAFETY: guarded by the tag
            TAG_STRING | TAG_ARRAY | TAG_OBJECT => unsafe { self.repr.long.size() },
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /**
    The element at `index`, if this value is an array and the index is in
    bounds.
    */
    pub fn get(&self, index: usize) -> Option<&Value> {
        if self.is_array() {
            self.array_slice().get(index)
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        if self.is_array() {
            self.array_slice_mut().get_mut(index)
        } else {
            None
        }
    }

    /**
    The value stored under `key`, if this value is an object containing it.
    */
    pub fn get_key(&self, key: &str) -> Option<&Value> {
        if !self.is_object() {
            return None;
        }

        match self.find_entry(key) {
            Ok(index) => Some(&self.entry_slice()[index].value),
            Err(_) => None,
        }
    }

    pub fn get_key_mut(&mut self, key: &str) -> Option<&mut Value> {
        if !self.is_object() {
            return None;
        }

        match self.find_entry(key) {
            Ok(index) => Some(&mut self.entry_slice_mut()[index].value),
            Err(_) => None,
        }
    }

    /**
    The entry at `index` in key order, if this value is an object and the
    index is in bounds.
    */
    pub fn entry(&self, index: usize) -> Option<(&str, &Value)> {
        if !self.is_object() {
            return None;
        }

        self.entry_slice().get(index).map(|entry| {
            // keys are always string values built from `str` data
            let key = from_utf8_unchecked!(entry.key.string_bytes());

            (key, &entry.value)
        })
    }

    /**
    Iterate the elements of an array. Non-arrays yield nothing.
    */
    pub fn elements(&self) -> slice::Iter<'_, Value> {
        if self.is_array() {
            self.array_slice().iter()
        } else {
            [].iter()
        }
    }

    /**
    Iterate the entries of an object in key order. Non-objects yield
    nothing.
    */
    pub fn entries(&self) -> Entries<'_> {
        if self.is_object() {
            Entries(self.entry_slice().iter())
        } else {
            Entries([].iter())
        }
    }

    /**
    Append an element to an array, growing its buffer as needed.

    # Panics

    Panics if this value is not an array.
    */
    pub fn push(&mut self, value: Value) -> Result<(), Error> {
        assert!(self.is_array(), "push on a non-array value");

        // SAFETY: the value is an array, so `long` is the live variant
        unsafe {
            let size = self.repr.long.size();
            self.grow::<Value>(size + 1)?;

            ptr::write((self.repr.long.ptr as *mut Value).add(size), value);
            self.repr.long.set_size(size + 1);
        }

        Ok(())
    }

    /**
    Insert an entry into an object, keeping entries sorted by key bytes.

    Returns the index of the key and whether a new entry was inserted. If
    the key is already present the object is left unchanged and `value`
    is dropped.

    # Panics

    Panics if this value is not an object.
    */
    pub fn emplace(&mut self, key: &str, value: Value) -> Result<(usize, bool), Error> {
        assert!(self.is_object(), "emplace on a non-object value");

        let index = match self.find_entry(key) {
            Ok(index) => return Ok((index, false)),
            Err(index) => index,
        };

        let key = Value::try_string(key)?;

        // SAFETY: the value is an object, so `long` is the live variant,
        // and `index <= size` came from the binary search above
        unsafe {
            let size = self.repr.long.size();
            self.grow::<Entry>(size + 1)?;

            let base = self.repr.long.ptr as *mut Entry;
            ptr::copy(base.add(index), base.add(index + 1), size - index);
            ptr::write(base.add(index), Entry { key, value });

            self.repr.long.set_size(size + 1);
        }

        Ok((index, true))
    }

    /**
    Replace the value of the entry at `index`, dropping the old one.
    */
    pub(crate) fn set_entry_value(&mut self, index: usize, value: Value) {
        debug_assert!(self.is_object());

        self.entry_slice_mut()[index].value = value;
    }

    /**
    Move the contents out, leaving an empty value of the same kind behind.

    Inline kinds are copied and the source keeps its contents; heap-backed
    kinds hand their buffer to the returned value and the source becomes
    an empty string, array, or object.
    */
    pub fn take(&mut self) -> Value {
        let taken = Value { repr: self.repr };

        match self.tag() {
            TAG_STRING => {
                self.repr = Repr {
                    short: Short {
                        bytes: [0; SHORT_CAPACITY],
                        tag: SHORT_CAPACITY as u8,
                    },
                };
            }
            TAG_ARRAY => {
                self.repr = Repr {
                    long: Long::empty(TAG_ARRAY),
                };
            }
            TAG_OBJECT => {
                self.repr = Repr {
                    long: Long::empty(TAG_OBJECT),
                };
            }
            _ => (),
        }

        taken
    }

    pub(crate) fn string_bytes(&self) -> &[u8] {
        let tag = self.tag();
        debug_assert!(tag <= TAG_STRING);

        if tag <= TAG_SHORT_MAX {
            // SAFETY: guarded by the tag
            unsafe { &self.repr.short.bytes[..SHORT_CAPACITY - tag as usize] }
        } else {
            // SAFETY: long strings always hold an allocated buffer
            unsafe {
                let long = self.repr.long;
                slice::from_raw_parts(long.ptr as *const u8, long.size())
            }
        }
    }

    fn array_slice(&self) -> &[Value] {
        debug_assert!(self.is_array());

        // SAFETY: guarded by the tag; empty arrays have a null pointer and zero size
        unsafe {
            let long = self.repr.long;
            if long.ptr.is_null() {
                return &[];
            }

            slice::from_raw_parts(long.ptr as *const Value, long.size())
        }
    }

    fn array_slice_mut(&mut self) -> &mut [Value] {
        debug_assert!(self.is_array());

        // SAFETY: guarded by the tag; unique ownership of the buffer
        unsafe {
            let long = self.repr.long;
            if long.ptr.is_null() {
                return &mut [];
            }

            slice::from_raw_parts_mut(long.ptr as *mut Value, long.size())
        }
    }

    fn entry_slice(&self) -> &[Entry] {
        debug_assert!(self.is_object());

        // SAFETY: guarded by the tag; empty objects have a null pointer and zero size
        unsafe {
            let long = self.repr.long;
            if long.ptr.is_null() {
                return &[];
            }

            slice::from_raw_parts(long.ptr as *const Entry, long.size())
        }
    }

    fn entry_slice_mut(&mut self) -> &mut [Entry] {
        debug_assert!(self.is_object());

        // SAFETY: guarded by the tag; unique ownership of the buffer
        unsafe {
            let long = self.repr.long;
            if long.ptr.is_null() {
                return &mut [];
            }

            slice::from_raw_parts_mut(long.ptr as *mut Entry, long.size())
        }
    }

    fn find_entry(&self, key: &str) -> Result<usize, usize> {
        self.entry_slice()
            .binary_search_by(|entry| entry.key.string_bytes().cmp(key.as_bytes()))
    }

    /**
    Ensure the container buffer can hold `needed` elements, reallocating
    with the next capacity exponent when it can't.

    # Safety

    `long` must be the live variant and the buffer must hold elements of
    type `T`.
    */
    unsafe fn grow<T>(&mut self, needed: usize) -> Result<(), Error> {
        let long = self.repr.long;

        if long.capacity() >= needed {
            return Ok(());
        }

        let mut capacity_2exp = (long.capacity_2exp + 1).max(2);
        while capacity(capacity_2exp) < needed {
            capacity_2exp += 1;
        }

        let new_ptr = alloc_buffer::<T>(capacity(capacity_2exp))?;

        if !long.ptr.is_null() {
            ptr::copy_nonoverlapping(long.ptr as *const T, new_ptr, long.size());
            dealloc_buffer::<T>(long.ptr as *mut T, long.capacity());
        }

        self.repr.long.ptr = new_ptr as *mut u8;
        self.repr.long.capacity_2exp = capacity_2exp;

        Ok(())
    }

    fn try_clone(&self) -> Result<Value, Error> {
        match self.tag() {
            // string values are only ever built from `str` data
            TAG_STRING => Value::try_string(from_utf8_unchecked!(self.string_bytes())),
            TAG_ARRAY => {
                let mut cloned = Value::array();

                for element in self.array_slice() {
                    cloned.push(element.try_clone()?)?;
                }

                Ok(cloned)
            }
            TAG_OBJECT => {
                let mut cloned = Value::object();

                for entry in self.entry_slice() {
                    // keys are always string values built from `str` data
                    let key = from_utf8_unchecked!(entry.key.string_bytes());

                    cloned.emplace(key, entry.value.try_clone()?)?;
                }

                Ok(cloned)
            }
            _ => Ok(Value { repr: self.repr }),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::null()
    }
}

impl Drop for Value {
    fn drop(&mut self) {
        match self.tag() {
            // SAFETY: guarded by the tag in each arm
            TAG_STRING => unsafe {
                let long = self.repr.long;
                dealloc_buffer::<u8>(long.ptr, long.capacity());
            },
            TAG_ARRAY | TAG_OBJECT => unsafe {
                release_container(self.repr.long);
            },
            _ => (),
        }
    }
}

/**
Free a container buffer and everything it transitively owns.

Nested containers are released with an explicit worklist rather than
recursion so that arbitrarily deep documents can't overflow the stack on
drop.

# Safety

`root` must be the live `Long` variant of an array or object whose buffer
is not referenced anywhere else.
*/
unsafe fn release_container(root: Long) {
    let mut pending = vec![root];

    while let Some(long) = pending.pop() {
        if long.ptr.is_null() {
            continue;
        }

        let size = long.size();

        if long.tag == TAG_ARRAY {
            let base = long.ptr as *mut Value;

            for i in 0..size {
                release_child(&*base.add(i), &mut pending);
            }

            dealloc_buffer::<Value>(base, long.capacity());
        } else {
            test_assert_eq!(long.tag, TAG_OBJECT);

            let base = long.ptr as *mut Entry;

            for i in 0..size {
                let entry = &*base.add(i);

                release_child(&entry.key, &mut pending);
                release_child(&entry.value, &mut pending);
            }

            dealloc_buffer::<Entry>(base, long.capacity());
        }
    }
}

/**
Free a child's string buffer immediately, or queue its container buffer.

The child itself lives inside a buffer that is freed wholesale, so its
own `Drop` never runs.
*/
unsafe fn release_child(child: &Value, pending: &mut Vec<Long>) {
    match child.tag() {
        TAG_STRING => {
            let long = child.repr.long;
            dealloc_buffer::<u8>(long.ptr, long.capacity());
        }
        TAG_ARRAY | TAG_OBJECT => pending.push(child.repr.long),
        _ => (),
    }
}

/**
Cloning walks the tree recursively, so the call stack bounds the depth it
can handle. Decoded trees have attacker-controlled depth; prefer
re-decoding the encoded bytes when the input isn't trusted.
*/
impl Clone for Value {
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(cloned) => cloned,
            Err(_) => std::alloc::handle_alloc_error(std::alloc::Layout::new::<Value>()),
        }
    }
}

/**
Comparison walks both trees recursively, so the call stack bounds the
depth it can handle. For trees of attacker-controlled depth, compare
their encoded bytes instead; encoding is iterative.
*/
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        let (tag, other_tag) = (self.tag(), other.tag());

        if tag <= TAG_STRING && other_tag <= TAG_STRING {
            return self.string_bytes() == other.string_bytes();
        }

        if tag != other_tag {
            return false;
        }

        match tag {
            // SAFETY: guarded by the tag in each arm
            TAG_SINT => unsafe { self.repr.sint.value == other.repr.sint.value },
            TAG_UINT => unsafe { self.repr.uint.value == other.repr.uint.value },
            TAG_FLOAT => unsafe { self.repr.float.value == other.repr.float.value },
            TAG_ARRAY => self.array_slice() == other.array_slice(),
            TAG_OBJECT => {
                let (entries, other_entries) = (self.entry_slice(), other.entry_slice());

                entries.len() == other_entries.len()
                    && entries.iter().zip(other_entries).all(|(a, b)| {
                        a.key.string_bytes() == b.key.string_bytes() && a.value == b.value
                    })
            }
            _ => true,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind() {
            Kind::Null => f.write_str("Null"),
            Kind::Bool => f.debug_tuple("Bool").field(&self.as_bool().unwrap()).finish(),
            Kind::SignedInt => f
                .debug_tuple("SignedInt")
                .field(&self.as_signed().unwrap())
                .finish(),
            Kind::UnsignedInt => f
                .debug_tuple("UnsignedInt")
                .field(&self.as_unsigned().unwrap())
                .finish(),
            Kind::Float => f.debug_tuple("Float").field(&self.as_float().unwrap()).finish(),
            Kind::String => f.debug_tuple("String").field(&self.as_str().unwrap()).finish(),
            Kind::Array => f.debug_list().entries(self.elements()).finish(),
            Kind::Object => f.debug_map().entries(self.entries()).finish(),
        }
    }
}

/**
An iterator over the entries of an object in key order.
*/
pub struct Entries<'a>(slice::Iter<'a, Entry>);

impl<'a> Iterator for Entries<'a> {
    type Item = (&'a str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|entry| {
            // keys are always string values built from `str` data
            let key = from_utf8_unchecked!(entry.key.string_bytes());

            (key, &entry.value)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a> ExactSizeIterator for Entries<'a> {}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::pod(if value { TAG_TRUE } else { TAG_FALSE })
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::float(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::float(value as f64)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        match Value::try_string(value) {
            Ok(value) => value,
            Err(_) => std::alloc::handle_alloc_error(std::alloc::Layout::new::<Value>()),
        }
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::from(value.as_str())
    }
}

macro_rules! impl_from_signed {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::signed(value as i64)
                }
            }
        )*
    };
}

macro_rules! impl_from_unsigned {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::unsigned(value as u64)
                }
            }
        )*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

#[cfg(any(test, feature = "serde_json"))]
impl Value {
    /**
    Convert into an equivalent `serde_json` value.

    Non-finite floats become null, matching how `serde_json` itself
    treats them.
    */
    pub fn to_serde_value(&self) -> serde_json::Value {
        match self.kind() {
            Kind::Null => serde_json::Value::Null,
            Kind::Bool => serde_json::Value::Bool(self.as_bool().unwrap()),
            Kind::SignedInt => serde_json::Value::from(self.as_signed().unwrap()),
            Kind::UnsignedInt => serde_json::Value::from(self.as_unsigned().unwrap()),
            Kind::Float => serde_json::Number::from_f64(self.as_float().unwrap())
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Kind::String => serde_json::Value::from(self.as_str().unwrap()),
            Kind::Array => serde_json::Value::Array(
                self.elements().map(|element| element.to_serde_value()).collect(),
            ),
            Kind::Object => serde_json::Value::Object(
                self.entries()
                    .map(|(key, value)| (key.to_owned(), value.to_serde_value()))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_is_16_bytes() {
        assert_eq!(16, mem::size_of::<Value>());
        assert_eq!(32, mem::size_of::<Entry>());
    }

    #[test]
    fn short_strings_are_inline() {
        for len in 0..=SHORT_CAPACITY {
            let s = "x".repeat(len);
            let value = Value::from(s.as_str());

            assert_eq!(Kind::String, value.kind());
            assert_eq!(s, value.as_str().unwrap());
            assert_eq!(len, value.len());
        }
    }

    #[test]
    fn boundary_string_lengths() {
        for len in [14, 15, 16, 31, 32] {
            let s = "y".repeat(len);
            let value = Value::from(s.as_str());

            assert_eq!(s, value.as_str().unwrap());
            assert_eq!(len, value.len());
        }
    }

    #[test]
    fn array_push_and_get() {
        let mut array = Value::array();
        assert!(array.is_empty());

        for i in 0..100i64 {
            array.push(Value::from(i)).unwrap();
        }

        assert_eq!(100, array.len());
        assert_eq!(Some(42), array.get(42).unwrap().as_signed());
        assert!(array.get(100).is_none());
    }

    #[test]
    fn object_entries_stay_sorted() {
        let mut object = Value::object();

        for key in ["delta", "alpha", "charlie", "bravo"] {
            let (_, inserted) = object.emplace(key, Value::from(key)).unwrap();
            assert!(inserted);
        }

        let keys = object.entries().map(|(key, _)| key).collect::<Vec<_>>();
        assert_eq!(vec!["alpha", "bravo", "charlie", "delta"], keys);

        assert_eq!(Some("bravo"), object.get_key("bravo").unwrap().as_str());
        assert!(object.get_key("echo").is_none());
    }

    #[test]
    fn emplace_keeps_first_value_for_duplicate_keys() {
        let mut object = Value::object();

        let (index, inserted) = object.emplace("a", Value::from(1i64)).unwrap();
        assert_eq!((0, true), (index, inserted));

        let (index, inserted) = object.emplace("a", Value::from(2i64)).unwrap();
        assert_eq!((0, false), (index, inserted));

        assert_eq!(1, object.len());
        assert_eq!(Some(1), object.get_key("a").unwrap().as_signed());
    }

    #[test]
    fn take_resets_heap_kinds() {
        let mut array = Value::array();
        array.push(Value::from("one")).unwrap();

        let taken = array.take();
        assert_eq!(1, taken.len());
        assert!(array.is_array());
        assert!(array.is_empty());

        let mut long = Value::from("a string that spills onto the heap");
        let taken = long.take();
        assert_eq!(Some("a string that spills onto the heap"), taken.as_str());
        assert_eq!(Some(""), long.as_str());
    }

    #[test]
    fn take_copies_inline_kinds() {
        let mut short = Value::from("inline");
        let taken = short.take();

        assert_eq!(Some("inline"), taken.as_str());
        assert_eq!(Some("inline"), short.as_str());

        let mut number = Value::from(7u64);
        assert_eq!(Some(7), number.take().as_unsigned());
        assert_eq!(Some(7), number.as_unsigned());
    }

    #[test]
    fn clone_deep_copies() {
        let mut object = Value::object();
        let mut inner = Value::array();
        inner.push(Value::from("a long string to force a heap buffer")).unwrap();
        object.emplace("inner", inner).unwrap();

        let mut cloned = object.clone();
        assert_eq!(object, cloned);

        cloned
            .get_key_mut("inner")
            .unwrap()
            .push(Value::from(1i64))
            .unwrap();

        assert_ne!(object, cloned);
        assert_eq!(1, object.get_key("inner").unwrap().len());
    }

    #[test]
    fn eq_requires_matching_number_kinds() {
        assert_ne!(Value::from(1i64), Value::from(1u64));
        assert_ne!(Value::from(1u64), Value::from(1.0f64));
        assert_eq!(Value::from(1u64), Value::from(1u64));
    }

    #[test]
    fn capacity_exponent_growth() {
        assert_eq!(3, capacity(2));
        assert_eq!(2, capacity_2exp_for(0));
        assert_eq!(2, capacity_2exp_for(3));
        assert_eq!(3, capacity_2exp_for(4));
        assert_eq!(5, capacity_2exp_for(31));
        assert_eq!(6, capacity_2exp_for(32));
    }

    #[test]
    fn deeply_nested_drop_does_not_overflow() {
        let mut value = Value::array();

        for _ in 0..100_000 {
            let mut outer = Value::array();
            outer.push(value).unwrap();
            value = outer;
        }

        drop(value);
    }

    #[test]
    fn send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Value>();
    }
}
