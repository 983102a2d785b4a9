use std::fmt;

use crate::{escape, span::Span};

/// Token types for the deployment-diagram dialect
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'src> {
    // Markers
    StartUml,
    EndUml,

    // Keywords, matched case-insensitively
    Rectangle,
    As,
    Map,
    Service,
    Group,
    Computer,
    Container,
    Containers,
    Vm,
    External,

    // Literals
    Identifier(&'src str),
    StringLiteral(String),
    PropertyValue(String),
    LinkInfo(String),

    // Links, any number of dashes
    LeftArrow(&'src str),     // <-
    RightArrow(&'src str),    // ->
    BidirectArrow(&'src str), // <->
    PlainLine(&'src str),     // -

    // Punctuation
    CurlyOpen,  // {
    CurlyClose, // }
}

impl<'src> Token<'src> {
    /// Look up a keyword, ignoring case.
    pub fn keyword(word: &str) -> Option<Token<'static>> {
        let token = match word.to_ascii_lowercase().as_str() {
            "rectangle" => Token::Rectangle,
            "as" => Token::As,
            "map" => Token::Map,
            "service" => Token::Service,
            "group" => Token::Group,
            "computer" => Token::Computer,
            "container" => Token::Container,
            "containers" => Token::Containers,
            "vm" => Token::Vm,
            "external" => Token::External,
            _ => return None,
        };
        Some(token)
    }

    /// A keyword token if `word` is one, an identifier otherwise.
    pub fn word(word: &'src str) -> Self {
        Self::keyword(word).unwrap_or(Token::Identifier(word))
    }

    /// Returns `true` for tokens that can open a definition inside a
    /// rectangle body.
    pub fn starts_definition(&self) -> bool {
        matches!(
            self,
            Token::Rectangle
                | Token::Map
                | Token::Service
                | Token::Group
                | Token::Computer
                | Token::Container
                | Token::Containers
                | Token::Vm
                | Token::External
        )
    }
}

/// A token with position information for winnow integration
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
    /// 1-based line of the first character of the token.
    pub line: usize,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span, line: usize) -> Self {
        Self { token, span, line }
    }
}

impl<'src> fmt::Display for PositionedToken<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.token.fmt(f)
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::StartUml => write!(f, "@startuml"),
            Token::EndUml => write!(f, "@enduml"),

            Token::Rectangle => write!(f, "rectangle"),
            Token::As => write!(f, "as"),
            Token::Map => write!(f, "map"),
            Token::Service => write!(f, "service"),
            Token::Group => write!(f, "group"),
            Token::Computer => write!(f, "computer"),
            Token::Container => write!(f, "container"),
            Token::Containers => write!(f, "containers"),
            Token::Vm => write!(f, "vm"),
            Token::External => write!(f, "external"),

            Token::Identifier(name) => write!(f, "{name}"),
            Token::StringLiteral(s) => write!(f, "\"{}\"", escape::encode_str(s)),
            Token::PropertyValue(v) => write!(f, "=> {}", escape::encode_str(v)),
            Token::LinkInfo(v) => write!(f, ": {}", escape::encode_str(v)),

            Token::LeftArrow(text)
            | Token::RightArrow(text)
            | Token::BidirectArrow(text)
            | Token::PlainLine(text) => write!(f, "{text}"),

            Token::CurlyOpen => write!(f, "{{"),
            Token::CurlyClose => write!(f, "}}"),
        }
    }
}
