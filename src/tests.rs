use std::iter;

mod some;

mod valid;

/**
Run `f` over copies of `input` starting at every alignment mod 32, to
exercise the unaligned head handling in the vectorized scan tiers.
*/
fn test_alignment(input: &[u8], mut f: impl FnMut(&[u8])) {
    for align in 0..32 {
        let mut buf = Vec::<u8>::with_capacity(input.len() + 128);

        let pad = buf.as_ptr().align_offset(32) + align;
        buf.extend(iter::repeat(0u8).take(pad));
        buf.extend(input);

        f(&buf[pad..]);
    }
}
