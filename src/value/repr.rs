/*!
The packed 16-byte representation behind [`Value`](super::Value).

Every kind of value occupies exactly 16 bytes. The final byte is the tag.
Tags `0..=15` encode a short string stored inline, where the tag is
`15 - length`, so every short-string tag compares below the smallest heap
tag and `is_short_string` is a single comparison. A short string of length
15 fills the entire inline buffer; there is no terminator byte, the length
always comes from the tag.

Heap-backed kinds pack a pointer, a 48-bit size, and a capacity exponent
alongside the tag. Capacities are always `2^exp - 1` so the exponent fits
in a single byte, and growth bumps the exponent rather than tracking an
exact capacity.
*/

use std::{
    alloc::{alloc, dealloc, Layout},
    mem,
};

use crate::error::{Error, ErrorKind};

use super::Value;

pub(crate) const TAG_SHORT_MAX: u8 = 15;
pub(crate) const TAG_STRING: u8 = 16;
pub(crate) const TAG_OBJECT: u8 = 17;
pub(crate) const TAG_ARRAY: u8 = 18;
pub(crate) const TAG_SINT: u8 = 19;
pub(crate) const TAG_UINT: u8 = 20;
pub(crate) const TAG_FLOAT: u8 = 21;
pub(crate) const TAG_FALSE: u8 = 22;
pub(crate) const TAG_TRUE: u8 = 23;
pub(crate) const TAG_NULL: u8 = 24;

/**
The number of string bytes that can be stored inline.
*/
pub(crate) const SHORT_CAPACITY: usize = 15;

#[derive(Clone, Copy)]
#[repr(C)]
pub(crate) struct Header {
    pub(crate) data: [u8; 15],
    pub(crate) tag: u8,
}

#[derive(Clone, Copy)]
#[repr(C)]
pub(crate) struct Short {
    pub(crate) bytes: [u8; SHORT_CAPACITY],
    pub(crate) tag: u8,
}

/**
The header for a heap-backed string, array, or object.

The size is split into explicit low and high halves instead of a bitfield
so the tag always lands in the final byte regardless of endianness.
*/
#[derive(Clone, Copy)]
#[repr(C)]
pub(crate) struct Long {
    pub(crate) ptr: *mut u8,
    pub(crate) size_lo: u32,
    pub(crate) size_hi: u16,
    pub(crate) capacity_2exp: u8,
    pub(crate) tag: u8,
}

#[derive(Clone, Copy)]
#[repr(C)]
pub(crate) struct Sint {
    pub(crate) value: i64,
    pub(crate) _pad: [u8; 7],
    pub(crate) tag: u8,
}

#[derive(Clone, Copy)]
#[repr(C)]
pub(crate) struct Uint {
    pub(crate) value: u64,
    pub(crate) _pad: [u8; 7],
    pub(crate) tag: u8,
}

#[derive(Clone, Copy)]
#[repr(C)]
pub(crate) struct Float {
    pub(crate) value: f64,
    pub(crate) _pad: [u8; 7],
    pub(crate) tag: u8,
}

#[derive(Clone, Copy)]
#[repr(C)]
pub(crate) union Repr {
    pub(crate) header: Header,
    pub(crate) short: Short,
    pub(crate) long: Long,
    pub(crate) sint: Sint,
    pub(crate) uint: Uint,
    pub(crate) float: Float,
}

/**
An object entry. Keys are always string values.
*/
#[repr(C)]
pub(crate) struct Entry {
    pub(crate) key: Value,
    pub(crate) value: Value,
}

// the packing above only works out when pointers are 8 bytes
const _: () = assert!(mem::size_of::<usize>() == 8, "acorn-json requires a 64-bit target");

const _: () = assert!(mem::size_of::<Header>() == 16);
const _: () = assert!(mem::size_of::<Short>() == 16);
const _: () = assert!(mem::size_of::<Long>() == 16);
const _: () = assert!(mem::size_of::<Sint>() == 16);
const _: () = assert!(mem::size_of::<Uint>() == 16);
const _: () = assert!(mem::size_of::<Float>() == 16);
const _: () = assert!(mem::size_of::<Repr>() == 16);
const _: () = assert!(mem::size_of::<Entry>() == 32);

impl Long {
    #[inline]
    pub(crate) fn empty(tag: u8) -> Self {
        Long {
            ptr: std::ptr::null_mut(),
            size_lo: 0,
            size_hi: 0,
            capacity_2exp: 0,
            tag,
        }
    }

    #[inline]
    pub(crate) fn size(&self) -> usize {
        self.size_lo as usize | (self.size_hi as usize) << 32
    }

    #[inline]
    pub(crate) fn set_size(&mut self, size: usize) {
        debug_assert!(size < 1 << 48);

        self.size_lo = size as u32;
        self.size_hi = (size >> 32) as u16;
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        capacity(self.capacity_2exp)
    }
}

#[inline]
pub(crate) fn capacity(capacity_2exp: u8) -> usize {
    (1usize << capacity_2exp) - 1
}

/**
The smallest exponent whose capacity holds `size` elements.

Exponents below 2 are never produced, so a freshly grown container always
has room for at least 3 elements.
*/
#[inline]
pub(crate) fn capacity_2exp_for(size: usize) -> u8 {
    let mut capacity_2exp = 2;
    while capacity(capacity_2exp) < size {
        capacity_2exp += 1;
    }
    capacity_2exp
}

#[cold]
fn alloc_error() -> Error {
    Error::new(ErrorKind::AllocationFailure, 0)
}

/**
Allocate an uninitialized buffer for `capacity` elements of `T`.

Allocation failure is surfaced as an error rather than an abort so that
decoding oversized documents can fail like any other decode error.
*/
pub(crate) fn alloc_buffer<T>(capacity: usize) -> Result<*mut T, Error> {
    debug_assert!(capacity > 0);

    let layout = Layout::array::<T>(capacity).map_err(|_| alloc_error())?;

    // SAFETY: the layout is non-zero-sized because `capacity` is non-zero
    // and `T` is one of `u8`, `Value`, or `Entry`
    let ptr = unsafe { alloc(layout) };
    if ptr.is_null() {
        return Err(alloc_error());
    }

    Ok(ptr as *mut T)
}

/**
Release a buffer previously produced by [`alloc_buffer`] with the same
capacity. Null pointers (empty containers) are a no-op.

# Safety

Callers must ensure `ptr` and `capacity` match a previous `alloc_buffer`
call and that any live elements have already been dealt with.
*/
pub(crate) unsafe fn dealloc_buffer<T>(ptr: *mut T, capacity: usize) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: the same layout computation succeeded when the buffer was allocated
    let layout = Layout::from_size_align_unchecked(capacity * mem::size_of::<T>(), mem::align_of::<T>());
    dealloc(ptr as *mut u8, layout);
}
