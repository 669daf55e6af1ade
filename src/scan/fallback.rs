/*!
Portable scanning tiers.

The word-at-a-time tier ramps through aligned 2, 4, and 8 byte chunks,
using bitwise masks to tell whether a whole chunk can be skipped before
falling back to per-byte resolution. It has no platform requirements and
is the oracle the vectorized tiers must agree with.
*/

#[inline(always)]
pub(crate) fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

/**
Whether a string byte can be skipped without interpretation.

Quotes end the string and backslashes start an escape; everything else,
including multi-byte UTF8 and control bytes, passes through the fast path.
*/
#[inline(always)]
pub(crate) fn is_simple(byte: u8) -> bool {
    byte != b'"' && byte != b'\\'
}

/**
A mask with `0x80` in exactly the byte positions where `$word` is zero.

The carry-free formulation is exact per byte, unlike the cheaper
subtraction trick, which can smear borrows into neighboring lanes.
*/
macro_rules! zero_mask {
    ($word:expr, $ty:ty) => {{
        const LOW: $ty = <$ty>::MAX / 0xff * 0x7f;

        let word: $ty = $word;
        !(((word & LOW) + LOW) | word | LOW)
    }};
}

/**
A mask with `0x80` in exactly the byte positions where `$word` equals `$byte`.
*/
macro_rules! eq_mask {
    ($word:expr, $byte:expr, $ty:ty) => {{
        zero_mask!($word ^ (<$ty>::MAX / 0xff * $byte as $ty), $ty)
    }};
}

macro_rules! word_preds {
    ($all_whitespace:ident, $all_simple:ident, $ty:ty) => {
        #[inline(always)]
        fn $all_whitespace(word: $ty) -> bool {
            const HIGH: $ty = <$ty>::MAX / 0xff * 0x80;

            (eq_mask!(word, b' ', $ty)
                | eq_mask!(word, b'\t', $ty)
                | eq_mask!(word, b'\n', $ty)
                | eq_mask!(word, b'\r', $ty))
                == HIGH
        }

        #[inline(always)]
        fn $all_simple(word: $ty) -> bool {
            (eq_mask!(word, b'"', $ty) | eq_mask!(word, b'\\', $ty)) == 0
        }
    };
}

word_preds!(all_whitespace_u16, all_simple_u16, u16);
word_preds!(all_whitespace_u32, all_simple_u32, u32);
word_preds!(all_whitespace_u64, all_simple_u64, u64);

macro_rules! swar_skip {
    ($name:ident, $byte_pass:ident, $word_pass16:ident, $word_pass32:ident, $word_pass64:ident) => {
        pub(crate) fn $name(input: &[u8], mut offset: usize) -> usize {
            let len = input.len();

            'chunks: {
                // per byte until the cursor address is 2 aligned
                while offset < len && (input.as_ptr() as usize + offset) % 2 != 0 {
                    if !$byte_pass(*get_unchecked!(input, offset)) {
                        return offset;
                    }

                    offset += 1;
                }

                // a single 2 byte chunk to reach 4 alignment, then a single
                // 4 byte chunk to reach 8 alignment
                if offset + 2 <= len && (input.as_ptr() as usize + offset) % 4 == 2 {
                    // SAFETY: the read is 2 aligned and in bounds
                    let word = unsafe { (input.as_ptr().add(offset) as *const u16).read() };

                    if !$word_pass16(word) {
                        break 'chunks;
                    }

                    offset += 2;
                }

                if offset + 4 <= len && (input.as_ptr() as usize + offset) % 8 == 4 {
                    // SAFETY: the read is 4 aligned and in bounds
                    let word = unsafe { (input.as_ptr().add(offset) as *const u32).read() };

                    if !$word_pass32(word) {
                        break 'chunks;
                    }

                    offset += 4;
                }

                while offset + 8 <= len {
                    test_assert_eq!(0, (input.as_ptr() as usize + offset) % 8);

                    // SAFETY: the read is 8 aligned and in bounds
                    let word = unsafe { (input.as_ptr().add(offset) as *const u64).read() };

                    if !$word_pass64(word) {
                        break 'chunks;
                    }

                    offset += 8;
                }
            }

            // resolve the stopping byte within the failed chunk, or finish
            // the trailing bytes that don't fill a chunk
            while offset < len && $byte_pass(*get_unchecked!(input, offset)) {
                offset += 1;
            }

            offset
        }
    };
}

swar_skip!(
    skip_whitespace,
    is_whitespace,
    all_whitespace_u16,
    all_whitespace_u32,
    all_whitespace_u64
);

swar_skip!(
    skip_simple,
    is_simple,
    all_simple_u16,
    all_simple_u32,
    all_simple_u64
);

/**
The purely per-byte tier. Only used directly in tests as the oracle for
the chunked tiers.
*/
#[cfg(test)]
pub(in crate::scan) fn skip_scalar(input: &[u8], mut offset: usize, pass: fn(u8) -> bool) -> usize {
    while offset < input.len() && pass(input[offset]) {
        offset += 1;
    }

    offset
}
