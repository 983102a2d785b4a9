//! Escape sequences in strings, property values and link infos.
//!
//! After a backslash the tokenizer accepts:
//!
//! - a simple escape, one of `a-z A-Z . _ ~ ! = & ^ - \ ? ' "` other than
//!   `x` and `u`. `\n \t \r \a \b \f \v` are control characters, every
//!   other simple escape stands for the character itself;
//! - `\xHH`, the character with code `0xHH`;
//! - `\uHHHH`, the Unicode scalar value `U+HHHH`.
//!
//! Anything else is a bad escape. The escaped character is kept literally,
//! except for a backslash at the end of a line, which contributes nothing.

use winnow::{
    Parser as _,
    combinator::{alt, eof, peek, preceded},
    token::{any, one_of, take_while},
};

use crate::lexer::{Input, LexResult};

/// Outcome of decoding the text after a backslash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Escape {
    Char(char),
    /// Not a valid escape; the character to keep, if any.
    Bad(Option<char>),
}

fn is_simple(c: char) -> bool {
    (c.is_ascii_alphabetic() && c != 'x' && c != 'u')
        || matches!(c, '.' | '_' | '~' | '!' | '=' | '&' | '^' | '-' | '\\' | '?' | '\'' | '"')
}

fn simple_value(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        'a' => '\u{07}',
        'b' => '\u{08}',
        'f' => '\u{0C}',
        'v' => '\u{0B}',
        other => other,
    }
}

fn byte_hex<'a>(input: &mut Input<'a>) -> LexResult<char> {
    preceded('x', take_while(2, |c: char| c.is_ascii_hexdigit()))
        .verify_map(|hex: &str| u8::from_str_radix(hex, 16).ok().map(char::from))
        .parse_next(input)
}

fn word_hex<'a>(input: &mut Input<'a>) -> LexResult<char> {
    preceded('u', take_while(4, |c: char| c.is_ascii_hexdigit()))
        .verify_map(|hex: &str| u32::from_str_radix(hex, 16).ok().and_then(char::from_u32))
        .parse_next(input)
}

/// Decode the escape following a backslash that has already been consumed.
///
/// Never consumes a line end.
pub(crate) fn escape_sequence<'a>(input: &mut Input<'a>) -> LexResult<Escape> {
    alt((
        byte_hex.map(Escape::Char),
        word_hex.map(Escape::Char),
        one_of(is_simple).map(|c| Escape::Char(simple_value(c))),
        peek('\n').value(Escape::Bad(None)),
        eof.value(Escape::Bad(None)),
        any.map(|c| Escape::Bad(Some(c))),
    ))
    .parse_next(input)
}

/// Canonical escaped form of `c` inside a string literal.
///
/// Printable characters other than `"` and `\` are returned unchanged.
pub fn encode_char(c: char) -> String {
    match c {
        '\n' => "\\n".to_string(),
        '\t' => "\\t".to_string(),
        '\r' => "\\r".to_string(),
        '\u{07}' => "\\a".to_string(),
        '\u{08}' => "\\b".to_string(),
        '\u{0C}' => "\\f".to_string(),
        '\u{0B}' => "\\v".to_string(),
        '\\' => "\\\\".to_string(),
        '"' => "\\\"".to_string(),
        c if c.is_control() => format!("\\x{:02x}", u32::from(c)),
        c => c.to_string(),
    }
}

/// Escape every character of `text` with [`encode_char`].
pub fn encode_str(text: &str) -> String {
    text.chars().map(encode_char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use winnow::stream::LocatingSlice;

    fn decode(text: &str) -> (Escape, &str) {
        let mut input = LocatingSlice::new(text);
        let escape = escape_sequence(&mut input).unwrap();
        (escape, *input)
    }

    /// Decode an escaped string body, `None` on any bad escape.
    fn unescape(text: &str) -> Option<String> {
        let mut out = String::new();
        let mut input = LocatingSlice::new(text);
        while let Ok(c) = winnow::token::any::<_, winnow::error::ContextError>.parse_next(&mut input) {
            if c != '\\' {
                out.push(c);
                continue;
            }
            match escape_sequence(&mut input).ok()? {
                Escape::Char(c) => out.push(c),
                Escape::Bad(_) => return None,
            }
        }
        Some(out)
    }

    #[test]
    fn test_simple_escapes() {
        assert_eq!(decode("n"), (Escape::Char('\n'), ""));
        assert_eq!(decode("v"), (Escape::Char('\u{0B}'), ""));
        assert_eq!(decode("\"rest"), (Escape::Char('"'), "rest"));
        assert_eq!(decode("\\"), (Escape::Char('\\'), ""));
        assert_eq!(decode("q"), (Escape::Char('q'), ""));
        assert_eq!(decode("~"), (Escape::Char('~'), ""));
    }

    #[test]
    fn test_hex_escapes() {
        assert_eq!(decode("x41"), (Escape::Char('A'), ""));
        assert_eq!(decode("xe9!"), (Escape::Char('é'), "!"));
        assert_eq!(decode("u263A"), (Escape::Char('☺'), ""));
        assert_eq!(decode("u00410"), (Escape::Char('A'), "0"));
    }

    #[test]
    fn test_bad_escapes() {
        assert_eq!(decode("xg1"), (Escape::Bad(Some('x')), "g1"));
        assert_eq!(decode("u12"), (Escape::Bad(Some('u')), "12"));
        assert_eq!(decode("ud800"), (Escape::Bad(Some('u')), "d800"));
        assert_eq!(decode("%"), (Escape::Bad(Some('%')), ""));
        assert_eq!(decode("1"), (Escape::Bad(Some('1')), ""));
    }

    #[test]
    fn test_backslash_at_line_end() {
        assert_eq!(decode("\nnext"), (Escape::Bad(None), "\nnext"));
        assert_eq!(decode(""), (Escape::Bad(None), ""));
    }

    #[test]
    fn test_encode() {
        assert_eq!(encode_char('a'), "a");
        assert_eq!(encode_char('\n'), "\\n");
        assert_eq!(encode_char('\u{01}'), "\\x01");
        assert_eq!(encode_char('\u{9F}'), "\\x9f");
        assert_eq!(encode_str("say \"hi\""), "say \\\"hi\\\"");
    }

    proptest! {
        #[test]
        fn encoded_char_decodes_to_itself(c in proptest::arbitrary::any::<char>()) {
            prop_assert_eq!(unescape(&encode_char(c)), Some(c.to_string()));
        }

        #[test]
        fn encoded_str_decodes_to_itself(text in "\\PC*|[\\x00-\\x1f\"\\\\]*") {
            prop_assert_eq!(unescape(&encode_str(&text)), Some(text.clone()));
        }
    }
}
