/*!
Vectorized scanning tiers for `x86_64`.

Both tiers follow the same shape: resolve the unaligned leading bytes one
at a time, stream full-width aligned blocks with a vector compare that
extracts the first stopping byte, then hand the tail back to the portable
tier. Callers are responsible for checking the matching CPU feature
before calling in; the portable tier is the behavioral oracle and every
tier must land on the same offset for the same input.
*/

use std::arch::x86_64::*;

use super::fallback;

pub(in crate::scan) mod sse42 {
    use super::*;

    pub(in crate::scan) const BLOCK_SIZE: usize = 16;

    /**
    # Safety

    Callers must ensure SSE4.2 is available.
    */
    #[target_feature(enable = "sse4.2")]
    pub(in crate::scan) unsafe fn skip_whitespace(input: &[u8], mut offset: usize) -> usize {
        let len = input.len();

        while offset < len && (input.as_ptr() as usize + offset) % BLOCK_SIZE != 0 {
            if !fallback::is_whitespace(*get_unchecked!(input, offset)) {
                return offset;
            }

            offset += 1;
        }

        let needles = _mm_setr_epi8(
            b' ' as i8,
            b'\t' as i8,
            b'\n' as i8,
            b'\r' as i8,
            0,
            0,
            0,
            0,
            0,
            0,
            0,
            0,
            0,
            0,
            0,
            0,
        );

        while offset + BLOCK_SIZE <= len {
            // we only cast at aligned offsets
            let block = _mm_load_si128(
                #[allow(clippy::cast_ptr_alignment)]
                {
                    input.as_ptr().add(offset) as *const _
                },
            );

            // negative polarity finds the first byte that is *not* one of
            // the needles; explicit lengths keep NUL bytes in the input
            // from terminating the match early
            let index = _mm_cmpestri::<
                { _SIDD_UBYTE_OPS | _SIDD_CMP_EQUAL_ANY | _SIDD_NEGATIVE_POLARITY | _SIDD_LEAST_SIGNIFICANT },
            >(needles, 4, block, BLOCK_SIZE as i32);

            if (index as usize) < BLOCK_SIZE {
                return offset + index as usize;
            }

            offset += BLOCK_SIZE;
        }

        fallback::skip_whitespace(input, offset)
    }

    /**
    # Safety

    Callers must ensure SSE4.2 is available.
    */
    #[target_feature(enable = "sse4.2")]
    pub(in crate::scan) unsafe fn skip_simple(input: &[u8], mut offset: usize) -> usize {
        let len = input.len();

        while offset < len && (input.as_ptr() as usize + offset) % BLOCK_SIZE != 0 {
            if !fallback::is_simple(*get_unchecked!(input, offset)) {
                return offset;
            }

            offset += 1;
        }

        let needles = _mm_setr_epi8(
            b'"' as i8,
            b'\\' as i8,
            0,
            0,
            0,
            0,
            0,
            0,
            0,
            0,
            0,
            0,
            0,
            0,
            0,
            0,
        );

        while offset + BLOCK_SIZE <= len {
            // we only cast at aligned offsets
            let block = _mm_load_si128(
                #[allow(clippy::cast_ptr_alignment)]
                {
                    input.as_ptr().add(offset) as *const _
                },
            );

            let index = _mm_cmpestri::<
                { _SIDD_UBYTE_OPS | _SIDD_CMP_EQUAL_ANY | _SIDD_LEAST_SIGNIFICANT },
            >(needles, 2, block, BLOCK_SIZE as i32);

            if (index as usize) < BLOCK_SIZE {
                return offset + index as usize;
            }

            offset += BLOCK_SIZE;
        }

        fallback::skip_simple(input, offset)
    }
}

pub(in crate::scan) mod avx2 {
    use super::*;

    pub(in crate::scan) const BLOCK_SIZE: usize = 32;

    /**
    # Safety

    Callers must ensure AVX2 is available.
    */
    #[target_feature(enable = "avx2")]
    pub(in crate::scan) unsafe fn skip_whitespace(input: &[u8], mut offset: usize) -> usize {
        let len = input.len();

        while offset < len && (input.as_ptr() as usize + offset) % BLOCK_SIZE != 0 {
            if !fallback::is_whitespace(*get_unchecked!(input, offset)) {
                return offset;
            }

            offset += 1;
        }

        while offset + BLOCK_SIZE <= len {
            // we only cast at aligned offsets
            let block = _mm256_load_si256(
                #[allow(clippy::cast_ptr_alignment)]
                {
                    input.as_ptr().add(offset) as *const _
                },
            );

            let whitespace = _mm256_or_si256(
                _mm256_or_si256(
                    _mm256_cmpeq_epi8(block, _mm256_set1_epi8(b' ' as i8)),
                    _mm256_cmpeq_epi8(block, _mm256_set1_epi8(b'\t' as i8)),
                ),
                _mm256_or_si256(
                    _mm256_cmpeq_epi8(block, _mm256_set1_epi8(b'\n' as i8)),
                    _mm256_cmpeq_epi8(block, _mm256_set1_epi8(b'\r' as i8)),
                ),
            );

            let mask = _mm256_movemask_epi8(whitespace) as u32;

            if mask != u32::MAX {
                return offset + (!mask).trailing_zeros() as usize;
            }

            offset += BLOCK_SIZE;
        }

        fallback::skip_whitespace(input, offset)
    }

    /**
    # Safety

    Callers must ensure AVX2 is available.
    */
    #[target_feature(enable = "avx2")]
    pub(in crate::scan) unsafe fn skip_simple(input: &[u8], mut offset: usize) -> usize {
        let len = input.len();

        while offset < len && (input.as_ptr() as usize + offset) % BLOCK_SIZE != 0 {
            if !fallback::is_simple(*get_unchecked!(input, offset)) {
                return offset;
            }

            offset += 1;
        }

        while offset + BLOCK_SIZE <= len {
            // we only cast at aligned offsets
            let block = _mm256_load_si256(
                #[allow(clippy::cast_ptr_alignment)]
                {
                    input.as_ptr().add(offset) as *const _
                },
            );

            let stops = _mm256_or_si256(
                _mm256_cmpeq_epi8(block, _mm256_set1_epi8(b'"' as i8)),
                _mm256_cmpeq_epi8(block, _mm256_set1_epi8(b'\\' as i8)),
            );

            let mask = _mm256_movemask_epi8(stops) as u32;

            if mask != 0 {
                return offset + mask.trailing_zeros() as usize;
            }

            offset += BLOCK_SIZE;
        }

        fallback::skip_simple(input, offset)
    }
}
