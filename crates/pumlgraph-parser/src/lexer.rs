//! Lexical analyzer for pumlgraph source text.
//!
//! The lexer is a finite-state scanner with one initial mode and five
//! exclusive sub-modes:
//!
//! | Mode        | Entered by            | Left at              | Produces         |
//! |-------------|-----------------------|----------------------|------------------|
//! | string      | `"`                   | `"` or line end      | `StringLiteral`  |
//! | property    | `=>`                  | line end             | `PropertyValue`  |
//! | link info   | `:`                   | line end             | `LinkInfo`       |
//! | C comment   | `/'`                  | `'/`                 | nothing          |
//! | C++ comment | `'`                   | line end             | nothing          |
//!
//! Lexical problems are reported through the [`DiagnosticContext`] and the
//! scanner resynchronizes, so [`Lexer`] always yields a finite stream.

use log::debug;
use winnow::{
    Parser as _,
    combinator::alt,
    error::{ContextError, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{any, one_of, take_while},
};

use crate::{
    error::{Diagnostic, DiagnosticContext, ErrorCode, Severity},
    escape::{self, Escape},
    source::Source,
    span::Span,
    tokens::{PositionedToken, Token},
};

pub(crate) type Input<'a> = LocatingSlice<&'a str>;
pub(crate) type LexResult<O> = ModalResult<O, ContextError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Initial,
    String,
    Property,
    LinkInfo,
    CComment,
    CppComment,
}

impl Mode {
    /// What the diagnostics of a buffering mode call its text.
    fn subject(self) -> &'static str {
        match self {
            Mode::Property => "Property",
            Mode::LinkInfo => "Link info",
            _ => "String",
        }
    }
}

/// One step of the initial mode.
#[derive(Debug, Clone, PartialEq)]
enum Lexeme<'a> {
    Token(Token<'a>),
    Blank,
    Newline,
    Enter(Mode),
}

fn dashes<'a>(input: &mut Input<'a>) -> LexResult<&'a str> {
    take_while(1.., '-').parse_next(input)
}

/// Parse an arrow (order matters - most specific first)
fn arrow<'a>(input: &mut Input<'a>) -> LexResult<Token<'a>> {
    alt((
        ('<', dashes, '>').take().map(Token::BidirectArrow),
        ('<', dashes).take().map(Token::LeftArrow),
        (dashes, '>').take().map(Token::RightArrow),
        dashes.map(Token::PlainLine),
    ))
    .parse_next(input)
}

/// Parse an identifier or a keyword
fn word<'a>(input: &mut Input<'a>) -> LexResult<Token<'a>> {
    (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .map(Token::word)
        .parse_next(input)
}

/// Parse one lexeme of the initial mode
fn initial<'a>(input: &mut Input<'a>) -> LexResult<Lexeme<'a>> {
    alt((
        take_while(1.., [' ', '\t']).value(Lexeme::Blank),
        '\n'.value(Lexeme::Newline),
        "/'".value(Lexeme::Enter(Mode::CComment)),
        '\''.value(Lexeme::Enter(Mode::CppComment)),
        '"'.value(Lexeme::Enter(Mode::String)),
        "=>".value(Lexeme::Enter(Mode::Property)),
        ':'.value(Lexeme::Enter(Mode::LinkInfo)),
        arrow.map(Lexeme::Token),
        '{'.value(Lexeme::Token(Token::CurlyOpen)),
        '}'.value(Lexeme::Token(Token::CurlyClose)),
        "@startuml".value(Lexeme::Token(Token::StartUml)),
        "@enduml".value(Lexeme::Token(Token::EndUml)),
        word.map(Lexeme::Token),
    ))
    .parse_next(input)
}

fn text_until<'a>(input: &mut Input<'a>, stop: fn(char) -> bool) -> LexResult<&'a str> {
    take_while(1.., move |c: char| !stop(c)).parse_next(input)
}

fn next_char(input: &mut Input<'_>) -> LexResult<char> {
    any.parse_next(input)
}

/// A lazy token stream over a [`Source`].
///
/// Tokens are produced one at a time in a single forward pass.
pub struct Lexer<'src, 'ctx> {
    source: &'src Source,
    input: Input<'src>,
    ctx: &'ctx DiagnosticContext<'ctx>,
    mode: Mode,
    line: usize,
}

impl<'src, 'ctx> Lexer<'src, 'ctx> {
    pub fn new(source: &'src Source, ctx: &'ctx DiagnosticContext<'ctx>) -> Self {
        Self {
            source,
            input: LocatingSlice::new(source.text()),
            ctx,
            mode: Mode::Initial,
            line: 1,
        }
    }

    fn offset(&self) -> usize {
        self.input.current_token_start()
    }

    /// Report a diagnostic whose message ends with the location of `offset`.
    fn report_at(&self, severity: Severity, code: ErrorCode, offset: usize, what: &str) {
        let location = self.source.source_ref(offset);
        let message = format!("{what}, {}", location.brief());
        self.ctx.report(
            Diagnostic::new(severity, message)
                .with_code(code)
                .with_source_ref(location),
        );
    }

    fn illegal_character(&mut self, offset: usize) {
        if let Ok(c) = next_char(&mut self.input) {
            self.report_at(
                Severity::Fatal,
                ErrorCode::E002,
                offset,
                &format!("Illegal character {c:?}"),
            );
        }
    }

    /// Read the rest of a string, property value or link info.
    ///
    /// The opening delimiter has been consumed; the token is positioned at it.
    fn delimited(&mut self, mode: Mode, start: usize, line: usize) -> PositionedToken<'src> {
        self.mode = mode;
        let stop: fn(char) -> bool = match mode {
            Mode::String => |c| matches!(c, '"' | '\\' | '\n'),
            _ => |c| matches!(c, '\\' | '\n'),
        };

        let mut value = String::new();
        let closed = loop {
            if let Ok(text) = text_until(&mut self.input, stop) {
                value.push_str(text);
            }
            let at = self.offset();
            match next_char(&mut self.input) {
                Ok('"') => break true,
                Ok('\n') => {
                    self.line += 1;
                    break false;
                }
                Ok('\\') => self.escape(mode, at, &mut value),
                Ok(other) => value.push(other),
                Err(_) => break false,
            }
        };
        self.mode = Mode::Initial;

        let span = Span::at(start);
        let token = match mode {
            Mode::String => {
                if !closed {
                    self.report_at(
                        Severity::Fatal,
                        ErrorCode::E001,
                        start,
                        "An unclosed string literal found",
                    );
                }
                Token::StringLiteral(value)
            }
            Mode::Property => Token::PropertyValue(strip_leading_blank(value)),
            _ => Token::LinkInfo(strip_leading_blank(value)),
        };
        PositionedToken::new(token, span, line)
    }

    fn escape(&mut self, mode: Mode, backslash: usize, value: &mut String) {
        match escape::escape_sequence(&mut self.input) {
            Ok(Escape::Char(c)) => value.push(c),
            Ok(Escape::Bad(kept)) => {
                value.extend(kept);
                self.report_at(
                    Severity::Error,
                    ErrorCode::E003,
                    backslash,
                    &format!("{} contains an invalid escape code", mode.subject()),
                );
            }
            Err(_) => {}
        }
    }

    fn skip_c_comment(&mut self) {
        loop {
            let _ = text_until(&mut self.input, |c| matches!(c, '\'' | '\n'));
            if self.input.starts_with("'/") {
                let _ = self.input.next_slice(2);
                self.mode = Mode::Initial;
                return;
            }
            match next_char(&mut self.input) {
                Ok('\n') => self.line += 1,
                Ok(_) => {}
                Err(_) => return,
            }
        }
    }

    fn skip_cpp_comment(&mut self) {
        let _ = text_until(&mut self.input, |c| c == '\n');
        self.mode = Mode::Initial;
    }

    /// Called once the input is exhausted.
    fn finish(&mut self) {
        if self.mode == Mode::CComment {
            self.ctx.report(
                Diagnostic::fatal(format!(
                    "A C-style comment should be closed before EOF in {}",
                    self.source.name()
                ))
                .with_code(ErrorCode::E004),
            );
        }
        self.mode = Mode::Initial;
    }
}

impl<'src> Iterator for Lexer<'src, '_> {
    type Item = PositionedToken<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.input.is_empty() {
                self.finish();
                return None;
            }

            match self.mode {
                Mode::CComment => {
                    self.skip_c_comment();
                    continue;
                }
                Mode::CppComment => {
                    self.skip_cpp_comment();
                    continue;
                }
                _ => {}
            }

            let start = self.offset();
            let line = self.line;
            match initial(&mut self.input) {
                Ok(Lexeme::Token(token)) => {
                    let span = Span::at(start);
                    return Some(PositionedToken::new(token, span, line));
                }
                Ok(Lexeme::Blank) => {}
                Ok(Lexeme::Newline) => self.line += 1,
                Ok(Lexeme::Enter(mode @ (Mode::String | Mode::Property | Mode::LinkInfo))) => {
                    return Some(self.delimited(mode, start, line));
                }
                Ok(Lexeme::Enter(mode)) => self.mode = mode,
                Err(_) => self.illegal_character(start),
            }
        }
    }
}

fn strip_leading_blank(mut value: String) -> String {
    if value.starts_with([' ', '\t']) {
        value.remove(0);
    }
    value
}

/// Tokenize a whole source, reporting lexical problems on `ctx`.
pub fn tokenize<'src>(source: &'src Source, ctx: &DiagnosticContext<'_>) -> Vec<PositionedToken<'src>> {
    let tokens: Vec<_> = Lexer::new(source, ctx).collect();
    debug!(tokens = tokens.len(), file = source.name(); "Tokenized source");
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MemorySink;
    use proptest::prelude::*;

    fn lex(text: &str) -> (Vec<Token<'static>>, Vec<String>) {
        let source = Box::leak(Box::new(Source::new(text, Some("t.puml"))));
        let sink = MemorySink::new();
        let ctx = DiagnosticContext::new(&sink);
        let tokens = tokenize(source, &ctx)
            .into_iter()
            .map(|t| t.token)
            .collect();
        (tokens, sink.lines())
    }

    fn tokens(text: &str) -> Vec<Token<'static>> {
        let (tokens, diagnostics) = lex(text);
        assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
        tokens
    }

    #[test]
    fn test_markers_and_braces() {
        assert_eq!(
            tokens("@startuml { } @enduml"),
            vec![Token::StartUml, Token::CurlyOpen, Token::CurlyClose, Token::EndUml]
        );
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            tokens("MAP Service as WebApp _x9"),
            vec![
                Token::Map,
                Token::Service,
                Token::As,
                Token::Identifier("WebApp"),
                Token::Identifier("_x9"),
            ]
        );
        assert_eq!(tokens("mapping"), vec![Token::Identifier("mapping")]);
    }

    #[test]
    fn test_arrow_specificity() {
        assert_eq!(
            tokens("a <-> b <--- c ---> d -- e - f"),
            vec![
                Token::Identifier("a"),
                Token::BidirectArrow("<->"),
                Token::Identifier("b"),
                Token::LeftArrow("<---"),
                Token::Identifier("c"),
                Token::RightArrow("--->"),
                Token::Identifier("d"),
                Token::PlainLine("--"),
                Token::Identifier("e"),
                Token::PlainLine("-"),
                Token::Identifier("f"),
            ]
        );
    }

    #[test]
    fn test_string_literal() {
        assert_eq!(
            tokens(r#""Web \"App\"\t\x41☺""#),
            vec![Token::StringLiteral("Web \"App\"\tA☺".to_string())]
        );
    }

    #[test]
    fn test_unclosed_string() {
        let (tokens, diagnostics) = lex("\"abc\nx");

        assert_eq!(
            tokens,
            vec![Token::StringLiteral("abc".to_string()), Token::Identifier("x")]
        );
        assert_eq!(
            diagnostics,
            ["Fatal: An unclosed string literal found, file t.puml, line 1, col 1"]
        );
    }

    #[test]
    fn test_bad_escape_keeps_character() {
        let (tokens, diagnostics) = lex(r#"  "a\%b""#);

        assert_eq!(tokens, vec![Token::StringLiteral("a%b".to_string())]);
        assert_eq!(
            diagnostics,
            ["Error: String contains an invalid escape code, file t.puml, line 1, col 5"]
        );
    }

    #[test]
    fn test_property_value() {
        assert_eq!(
            tokens("Info =>  two spaces\nTeam=>\tx\\ty\n"),
            vec![
                Token::Identifier("Info"),
                Token::PropertyValue(" two spaces".to_string()),
                Token::Identifier("Team"),
                Token::PropertyValue("x\ty".to_string()),
            ]
        );
    }

    #[test]
    fn test_property_value_on_last_line() {
        assert_eq!(
            tokens("k => v"),
            vec![Token::Identifier("k"), Token::PropertyValue("v".to_string())]
        );
    }

    #[test]
    fn test_link_info() {
        assert_eq!(
            tokens("a -> b : \"quoted\" text\n"),
            vec![
                Token::Identifier("a"),
                Token::RightArrow("->"),
                Token::Identifier("b"),
                Token::LinkInfo("\"quoted\" text".to_string()),
            ]
        );
    }

    #[test]
    fn test_link_info_bad_escape() {
        let (tokens, diagnostics) = lex("a - b :x\\\n");

        assert_eq!(tokens[3], Token::LinkInfo("x".to_string()));
        assert_eq!(
            diagnostics,
            ["Error: Link info contains an invalid escape code, file t.puml, line 1, col 9"]
        );
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            tokens("a ' comment { }\n/' multi\nline ' still '/ b /''/c"),
            vec![
                Token::Identifier("a"),
                Token::Identifier("b"),
                Token::Identifier("c"),
            ]
        );
    }

    #[test]
    fn test_unterminated_c_comment() {
        let (tokens, diagnostics) = lex("a /' never closed");

        assert_eq!(tokens, vec![Token::Identifier("a")]);
        assert_eq!(
            diagnostics,
            ["Fatal: A C-style comment should be closed before EOF in t.puml"]
        );
    }

    #[test]
    fn test_illegal_character_is_skipped() {
        let (tokens, diagnostics) = lex("a\n  # b");

        assert_eq!(tokens, vec![Token::Identifier("a"), Token::Identifier("b")]);
        assert_eq!(
            diagnostics,
            ["Fatal: Illegal character '#', file t.puml, line 2, col 3"]
        );
    }

    #[test]
    fn test_column_after_non_ascii() {
        let (tokens, diagnostics) = lex("\"Café\" # b");

        assert_eq!(
            tokens,
            vec![Token::StringLiteral("Café".to_string()), Token::Identifier("b")]
        );
        assert_eq!(
            diagnostics,
            ["Fatal: Illegal character '#', file t.puml, line 1, col 8"]
        );
    }

    #[test]
    fn test_positions_and_lines() {
        let source = Source::new("@startuml\n  map \"M\" {\n k => v\n}", None);
        let sink = MemorySink::new();
        let ctx = DiagnosticContext::new(&sink);
        let tokens = tokenize(&source, &ctx);

        let lines: Vec<_> = tokens.iter().map(|t| t.line).collect();
        assert_eq!(lines, [1, 2, 2, 2, 3, 3, 4]);

        // the string token starts at its opening quote
        assert_eq!(tokens[2].span.start(), 16);
        assert_eq!(source.decoder().locate(tokens[2].span.start()), (2, 7));
        // the property value starts at `=>`
        assert_eq!(source.decoder().locate(tokens[5].span.start()), (3, 4));
    }

    #[test]
    fn test_lexer_is_lazy() {
        let source = Source::new("a b c", None);
        let sink = MemorySink::new();
        let ctx = DiagnosticContext::new(&sink);
        let mut lexer = Lexer::new(&source, &ctx);

        assert_eq!(lexer.next().map(|t| t.token), Some(Token::Identifier("a")));
        assert_eq!(lexer.next().map(|t| t.token), Some(Token::Identifier("b")));
        assert_eq!(lexer.next().map(|t| t.token), Some(Token::Identifier("c")));
        assert!(lexer.next().is_none());
        assert!(lexer.next().is_none());
    }

    proptest! {
        #[test]
        fn identifiers_round_trip(word in "[a-zA-Z_][0-9a-zA-Z_]{0,12}") {
            let source = Source::new(&word, None);
            let sink = MemorySink::new();
            let ctx = DiagnosticContext::new(&sink);
            let tokens = tokenize(&source, &ctx);

            prop_assert_eq!(tokens.len(), 1);
            match &tokens[0].token {
                Token::Identifier(text) => prop_assert_eq!(*text, word.as_str()),
                keyword => prop_assert_eq!(keyword.to_string(), word.to_ascii_lowercase()),
            }
            prop_assert!(sink.is_empty());
        }

        #[test]
        fn lexer_always_terminates(text in "[ -~\t\n]{0,80}") {
            let source = Source::new(&text, None);
            let sink = MemorySink::new();
            let ctx = DiagnosticContext::new(&sink);
            let tokens = tokenize(&source, &ctx);

            prop_assert!(tokens.len() <= text.len() + 1);
        }
    }
}
