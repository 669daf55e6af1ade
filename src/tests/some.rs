/*!
A generator for valid JSON documents.

Fuzzing is good at finding bizarre almost-JSON but rarely produces valid
documents, so the roundtrip tests stampede with randomly generated valid
trees instead. The output mixes nesting, escapes (including surrogate
pairs), optional whitespace between tokens, and numbers kept in ranges
that round-trip exactly through both this crate and `serde_json`.
*/

use std::fmt::Write;

use rand::Rng;

pub fn json_document() -> String {
    let mut s = String::new();
    let mut depth = 0;
    let mut key = 0;

    write_any(&mut s, &mut depth, &mut key);

    s
}

fn write_any(s: &mut String, depth: &mut usize, key: &mut usize) {
    maybe_whitespace(s);

    if *depth < 10 {
        match rng(6) {
            0 => write_object(s, depth, key),
            1 => write_array(s, depth, key),
            2 => write_bool(s),
            3 => write_number(s),
            4 => write_null(s),
            5 => write_string(s),
            _ => unreachable!(),
        }
    } else {
        match rng(4) {
            0 => write_bool(s),
            1 => write_number(s),
            2 => write_null(s),
            3 => write_string(s),
            _ => unreachable!(),
        }
    }

    maybe_whitespace(s);
}

fn write_object(s: &mut String, depth: &mut usize, key: &mut usize) {
    *depth += 1;
    s.push('{');

    let mut first = true;
    for _ in 0..rng(10) {
        if !first {
            s.push(',');
        }
        first = false;

        maybe_whitespace(s);

        // `serde_json` keeps the last value for a duplicate key while this
        // crate keeps the first, so generated keys are always unique
        write!(s, "\"key_{}_{}\"", *key, rng(1000)).unwrap();
        *key += 1;

        maybe_whitespace(s);
        s.push(':');
        write_any(s, depth, key);
    }

    s.push('}');
    *depth -= 1;
}

fn write_array(s: &mut String, depth: &mut usize, key: &mut usize) {
    *depth += 1;
    s.push('[');

    let mut first = true;
    for _ in 0..rng(10) {
        if !first {
            s.push(',');
        }
        first = false;

        write_any(s, depth, key);
    }

    s.push(']');
    *depth -= 1;
}

fn write_null(s: &mut String) {
    s.push_str("null");
}

fn write_bool(s: &mut String) {
    if rng_bool() {
        s.push_str("true");
    } else {
        s.push_str("false");
    }
}

fn write_string(s: &mut String) {
    s.push('"');

    for _ in 0..rng(10) {
        match rng(95) {
            0..=50 => {
                let i = rng(STR_1.len());
                s.push_str(&STR_1[i..i + 1]);
            }
            51..=60 => s.push_str(STR_2),
            61..=70 => s.push_str(STR_3),
            71..=80 => s.push_str(STR_4),
            81..=90 => s.push_str(STR_5),
            _ => s.push_str(&STR_0[0..rng(STR_0.len())]),
        }
    }

    s.push('"');
}

fn write_number(s: &mut String) {
    match rng(3) {
        0 => write_integer(s),
        1 => write_decimal(s),
        2 => write_scientific(s),
        _ => unreachable!(),
    }
}

fn write_integer(s: &mut String) {
    let value = rng_u32();

    // `serde_json` parses `-0` as a float, so negative integers stay nonzero
    if value != 0 && rng_bool() {
        write!(s, "-{}", value).unwrap();
    } else {
        write!(s, "{}", value).unwrap();
    }
}

fn write_decimal(s: &mut String) {
    if rng_bool() {
        s.push('-');
    }

    // Keep precision low enough that floats can roundtrip
    write!(s, "{}.{}", rng_u32(), rng(300)).unwrap();
}

fn write_scientific(s: &mut String) {
    let e = match rng(4) {
        0 => "e",
        1 => "e-",
        2 => "E",
        3 => "E-",
        _ => unreachable!(),
    };

    // Try not to get too overboard with scientific numbers
    // They could easily overflow f64 or u64
    write!(s, "{}.{}{}{}", rng(10), rng(300), e, rng(7)).unwrap();
}

fn maybe_whitespace(s: &mut String) {
    if rng(4) == 0 {
        for _ in 0..rng(3) {
            s.push(match rng(4) {
                0 => ' ',
                1 => '\t',
                2 => '\n',
                _ => '\r',
            });
        }
    }
}

fn rng(to: usize) -> usize {
    rand::thread_rng().gen_range(0..to)
}

fn rng_bool() -> bool {
    rand::random()
}

fn rng_u32() -> u32 {
    rand::random()
}

// It's public domain, ok
const STR_0: &str =
    "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.";

const STR_1: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

const STR_2: &str = "\\\"";

const STR_3: &str = "\\u00e5";

const STR_4: &str = "\\ud83d\\ude00";

const STR_5: &str = "\\n\\t";
