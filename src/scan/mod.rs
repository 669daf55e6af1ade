/*!
Byte scanning primitives.

Decoding spends most of its time in two loops: skipping whitespace
between tokens and skipping unescaped string content. Both are scanning
problems: advance through a run of bytes until the first member (or
non-member) of a tiny byte set. This module provides those two skips with
a portable fallback and vectorized tiers, selected per call from a
[`CpuFeatures`] snapshot.

Every tier lands on the same offset for the same input; the tiers only
trade throughput, never behavior.
*/

pub(crate) mod fallback;

#[cfg(target_arch = "x86_64")]
pub(crate) mod simd;

/**
A snapshot of the CPU capabilities the scanning tiers can use.

Probing is cheap but not free, so contexts capture a snapshot once per
session rather than per skip. [`CpuFeatures::scalar`] disables the
vectorized tiers entirely, which tests use to pin down the portable path.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuFeatures {
    pub(crate) sse42: bool,
    pub(crate) avx2: bool,
}

impl CpuFeatures {
    /**
    Probe the running CPU.

    On non-`x86_64` targets this is the same as [`CpuFeatures::scalar`].
    */
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            CpuFeatures {
                sse42: is_x86_feature_detected!("sse4.2"),
                avx2: is_x86_feature_detected!("avx2"),
            }
        }

        #[cfg(not(target_arch = "x86_64"))]
        {
            CpuFeatures::scalar()
        }
    }

    /**
    A snapshot with all vectorized tiers disabled.
    */
    pub fn scalar() -> Self {
        CpuFeatures {
            sse42: false,
            avx2: false,
        }
    }
}

/**
Advance `offset` past any run of JSON whitespace (space, tab, newline,
carriage return), returning the offset of the first other byte or the end
of the input.
*/
#[inline]
pub(crate) fn skip_whitespace(input: &[u8], offset: usize, features: CpuFeatures) -> usize {
    if offset >= input.len() {
        return offset;
    }

    #[cfg(target_arch = "x86_64")]
    {
        let remaining = input.len() - offset;

        if features.avx2 && remaining >= simd::avx2::BLOCK_SIZE {
            // SAFETY: AVX2 support was probed when `features` was built
            return unsafe { simd::avx2::skip_whitespace(input, offset) };
        }

        if features.sse42 && remaining >= simd::sse42::BLOCK_SIZE {
            // SAFETY: SSE4.2 support was probed when `features` was built
            return unsafe { simd::sse42::skip_whitespace(input, offset) };
        }
    }

    #[cfg(not(target_arch = "x86_64"))]
    let _ = features;

    fallback::skip_whitespace(input, offset)
}

/**
Advance `offset` past any run of string bytes that need no interpretation,
returning the offset of the first `"` or `\` or the end of the input.
*/
#[inline]
pub(crate) fn skip_simple(input: &[u8], offset: usize, features: CpuFeatures) -> usize {
    if offset >= input.len() {
        return offset;
    }

    #[cfg(target_arch = "x86_64")]
    {
        let remaining = input.len() - offset;

        if features.avx2 && remaining >= simd::avx2::BLOCK_SIZE {
            // SAFETY: AVX2 support was probed when `features` was built
            return unsafe { simd::avx2::skip_simple(input, offset) };
        }

        if features.sse42 && remaining >= simd::sse42::BLOCK_SIZE {
            // SAFETY: SSE4.2 support was probed when `features` was built
            return unsafe { simd::sse42::skip_simple(input, offset) };
        }
    }

    #[cfg(not(target_arch = "x86_64"))]
    let _ = features;

    fallback::skip_simple(input, offset)
}
