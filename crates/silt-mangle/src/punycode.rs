//! RFC 3492 Bootstring codec, adapted for Silt's mangling grammar: the
//! delimiter is `$` rather than `-`, and the "extended" digit alphabet maps
//! values 26-35 to `A`-`J` rather than `0`-`9`, so an encoded body never
//! contains a raw decimal digit and can sit next to a length prefix in the
//! mangled string without ambiguity.

const BASE: u32 = 36;
const T_MIN: u32 = 1;
const T_MAX: u32 = 26;
const SKEW: u32 = 38;
const DAMP: u32 = 700;
const INITIAL_BIAS: u32 = 72;
const INITIAL_N: u32 = 0x80;
const DELIMITER: char = '$';

fn digit_to_basic(d: u32) -> char {
    if d < 26 {
        (b'a' + d as u8) as char
    } else {
        (b'A' + (d - 26) as u8) as char
    }
}

fn basic_to_digit(c: char) -> Option<u32> {
    if c.is_ascii_lowercase() {
        Some(c as u32 - 'a' as u32)
    } else if ('A'..='J').contains(&c) {
        Some(26 + (c as u32 - 'A' as u32))
    } else {
        None
    }
}

fn adapt(mut delta: u32, num_points: u32, first_time: bool) -> u32 {
    delta /= if first_time { DAMP } else { 2 };
    delta += delta / num_points;
    let mut k = 0;
    while delta > ((BASE - T_MIN) * T_MAX) / 2 {
        delta /= BASE - T_MIN;
        k += BASE;
    }
    k + (((BASE - T_MIN + 1) * delta) / (delta + SKEW))
}

/// Encode `input` as a Punycode body: basic (ASCII) code points verbatim,
/// then -- if any non-ASCII code points exist -- a `$` delimiter followed by
/// the generalized variable-length-integer encoding of the rest. The
/// delimiter is always emitted when there is an extension, even if there are
/// no basic code points, so the decoder never has to guess.
pub fn encode(input: &str) -> String {
    let code_points: Vec<u32> = input.chars().map(|c| c as u32).collect();
    let mut output = String::new();

    let mut h = 0u32;
    let mut basic_count = 0u32;
    for &cp in &code_points {
        if cp < 0x80 {
            output.push(char::from_u32(cp).unwrap());
            h += 1;
            basic_count += 1;
        }
    }
    let has_extension = h < code_points.len() as u32;
    if has_extension {
        output.push(DELIMITER);
    }

    let mut n = INITIAL_N;
    let mut delta = 0u32;
    let mut bias = INITIAL_BIAS;

    while h < code_points.len() as u32 {
        let m = code_points.iter().copied().filter(|&cp| cp >= n).min().unwrap();
        delta += (m - n) * (h + 1);
        n = m;

        for &cp in &code_points {
            if cp < n {
                delta += 1;
            }
            if cp == n {
                let mut q = delta;
                let mut k = BASE;
                loop {
                    let t = if k <= bias {
                        T_MIN
                    } else if k >= bias + T_MAX {
                        T_MAX
                    } else {
                        k - bias
                    };
                    if q < t {
                        break;
                    }
                    output.push(digit_to_basic(t + (q - t) % (BASE - t)));
                    q = (q - t) / (BASE - t);
                    k += BASE;
                }
                output.push(digit_to_basic(q));
                bias = adapt(delta, h + 1, h == basic_count);
                delta = 0;
                h += 1;
            }
        }
        delta += 1;
        n += 1;
    }

    output
}

/// Decode a Punycode body produced by [`encode`].
pub fn decode(input: &str) -> Option<String> {
    let mut output: Vec<u32> = Vec::new();

    let (basic, extension) = match input.rfind(DELIMITER) {
        Some(idx) => (&input[..idx], &input[idx + DELIMITER.len_utf8()..]),
        None => ("", input),
    };
    for c in basic.chars() {
        if !c.is_ascii() {
            return None;
        }
        output.push(c as u32);
    }

    let mut n = INITIAL_N;
    let mut i = 0u32;
    let mut bias = INITIAL_BIAS;
    let mut chars = extension.chars().peekable();

    while chars.peek().is_some() {
        let old_i = i;
        let mut w = 1u32;
        let mut k = BASE;
        loop {
            let c = chars.next()?;
            let digit = basic_to_digit(c)?;
            i = i.checked_add(digit.checked_mul(w)?)?;
            let t = if k <= bias {
                T_MIN
            } else if k >= bias + T_MAX {
                T_MAX
            } else {
                k - bias
            };
            if digit < t {
                break;
            }
            w = w.checked_mul(BASE - t)?;
            k += BASE;
        }
        let num_points = output.len() as u32 + 1;
        bias = adapt(i - old_i, num_points, old_i == 0);
        n += i / num_points;
        i %= num_points;
        output.insert(i as usize, n);
        i += 1;
    }

    output.into_iter().map(char::from_u32).collect::<Option<String>>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_only_round_trips_with_no_extension_marker() {
        let encoded = encode("silt");
        assert_eq!(encoded, "silt");
        assert_eq!(decode(&encoded).unwrap(), "silt");
    }

    #[test]
    fn non_ascii_round_trips() {
        for s in ["café", "naïve", "モジュール", "λ"] {
            let encoded = encode(s);
            assert_eq!(decode(&encoded).as_deref(), Some(s), "round trip failed for {s:?} via {encoded:?}");
        }
    }

    #[test]
    fn extension_body_never_contains_a_raw_decimal_digit() {
        let encoded = encode("λx");
        assert!(!encoded.chars().any(|c| c.is_ascii_digit()));
    }

    #[test]
    fn mixed_ascii_and_non_ascii_round_trips() {
        let s = "fooλbar";
        let encoded = encode(s);
        assert_eq!(decode(&encoded).as_deref(), Some(s));
    }
}
