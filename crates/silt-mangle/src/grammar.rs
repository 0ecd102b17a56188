//! Identifier-level encoding: the plain length-prefixed form, the
//! word-substituted form, and the Punycode-escaped form, plus the word
//! table they share.
//!
//! An identifier is assumed never to start with an ASCII digit (true of
//! every identifier the lexer produces, since a leading digit would have to
//! be a reserved punctuation character or collide with nothing in the
//! grammar -- Silt simply never emits one), which is what makes a bare
//! decimal length prefix unambiguous against the `'0'`-prefixed forms.

use crate::punycode;

/// Up to 26 previously-mangled whole identifiers, available for
/// back-reference by letter index. Resets at the start of every
/// `mangle_decl`/`demangle` call (spec.md's word-table reset point is
/// resolved per-call, see `DESIGN.md`).
#[derive(Debug, Default)]
pub struct WordTable {
    words: Vec<String>,
}

impl WordTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn index_to_letter(idx: usize) -> char {
        (b'A' + idx as u8) as char
    }

    fn letter_to_index(c: char) -> Option<usize> {
        if c.is_ascii_uppercase() {
            Some((c as u8 - b'A') as usize)
        } else {
            None
        }
    }

    /// Encode `s` using the table: `Some(encoding)` if `s` was already
    /// present (a `'0'` + single terminal letter back-reference), `None` if
    /// this is the first occurrence (the caller must fall back to the plain
    /// or Punycoded form, and `s` has been registered for next time).
    fn try_substitute(&mut self, s: &str) -> Option<String> {
        if let Some(idx) = self.words.iter().position(|w| w == s) {
            return Some(format!("0{}", Self::index_to_letter(idx)));
        }
        if self.words.len() < 26 {
            self.words.push(s.to_string());
        }
        None
    }

    /// Register `s` as having just been decoded, mirroring `try_substitute`'s
    /// bookkeeping so encode and decode stay in lockstep.
    fn register(&mut self, s: &str) {
        if self.words.len() < 26 && !self.words.iter().any(|w| w == s) {
            self.words.push(s.to_string());
        }
    }

    fn resolve(&self, idx: usize) -> Option<&str> {
        self.words.get(idx).map(|s| s.as_str())
    }
}

/// Encode one identifier: word-substitution first, then ASCII-plain,
/// falling back to Punycode for non-ASCII text.
pub fn encode_identifier(s: &str, table: &mut WordTable) -> String {
    if let Some(sub) = table.try_substitute(s) {
        return sub;
    }
    if s.is_ascii() {
        format!("{}{}", s.len(), s)
    } else {
        let body = punycode::encode(s);
        format!("00{}${}", s.chars().count(), body)
    }
}

/// Decode one identifier starting at byte offset `pos` in `input`, advancing
/// `pos` past it. `input` is pure ASCII (the mangled wire format always is),
/// so byte offsets and char offsets coincide.
pub fn decode_identifier(input: &str, pos: &mut usize, table: &mut WordTable) -> Option<String> {
    let bytes = input.as_bytes();
    let c0 = *bytes.get(*pos)?;

    if c0 == b'0' {
        let c1 = *bytes.get(*pos + 1)?;
        if c1 == b'0' {
            // Punycode form: "00" <decimal length> '$' <body>
            let mut i = *pos + 2;
            let digits_start = i;
            while bytes.get(i).is_some_and(u8::is_ascii_digit) {
                i += 1;
            }
            if i == digits_start {
                return None;
            }
            let expected_len: usize = input[digits_start..i].parse().ok()?;
            if *bytes.get(i)? != b'$' {
                return None;
            }
            i += 1;
            let body_start = i;
            // The body runs until it has yielded `expected_len` decoded
            // characters; decode incrementally to find where it ends.
            loop {
                let candidate = &input[body_start..i.min(input.len())];
                if let Some(decoded) = punycode::decode(candidate) {
                    if decoded.chars().count() == expected_len {
                        *pos = i;
                        table.register(&decoded);
                        return Some(decoded);
                    }
                }
                if i >= input.len() {
                    return None;
                }
                i += 1;
            }
        } else {
            // Word-substitution form: '0' <terminal letter>
            let idx = WordTable::letter_to_index(c1 as char)?;
            let resolved = table.resolve(idx)?.to_string();
            *pos += 2;
            Some(resolved)
        }
    } else if c0.is_ascii_digit() {
        let digits_start = *pos;
        let mut i = *pos;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        let len: usize = input[digits_start..i].parse().ok()?;
        let start = i;
        let end = start + len;
        if end > input.len() {
            return None;
        }
        let text = input[start..end].to_string();
        *pos = end;
        table.register(&text);
        Some(text)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_ascii_round_trips() {
        let mut enc_table = WordTable::new();
        let encoded = encode_identifier("foo", &mut enc_table);
        assert_eq!(encoded, "3foo");

        let mut dec_table = WordTable::new();
        let mut pos = 0;
        let decoded = decode_identifier(&encoded, &mut pos, &mut dec_table).unwrap();
        assert_eq!(decoded, "foo");
        assert_eq!(pos, encoded.len());
    }

    #[test]
    fn repeated_identifier_uses_word_substitution() {
        let mut enc_table = WordTable::new();
        let first = encode_identifier("Example", &mut enc_table);
        let second = encode_identifier("Example", &mut enc_table);
        assert_eq!(first, "7Example");
        assert_eq!(second, "0A");

        let combined = format!("{first}{second}");
        let mut dec_table = WordTable::new();
        let mut pos = 0;
        let d1 = decode_identifier(&combined, &mut pos, &mut dec_table).unwrap();
        let d2 = decode_identifier(&combined, &mut pos, &mut dec_table).unwrap();
        assert_eq!(d1, "Example");
        assert_eq!(d2, "Example");
    }

    #[test]
    fn non_ascii_identifier_round_trips_via_punycode() {
        let mut enc_table = WordTable::new();
        let encoded = encode_identifier("café", &mut enc_table);
        assert!(encoded.starts_with("00"));

        let mut dec_table = WordTable::new();
        let mut pos = 0;
        let decoded = decode_identifier(&encoded, &mut pos, &mut dec_table).unwrap();
        assert_eq!(decoded, "café");
    }
}
