//! Parser for pumlgraph source tokens.
//!
//! This module turns the token stream from the [`lexer`](super::lexer) into
//! an attributed [`Node`] tree. The public entry point is [`parse`].
//!
//! Grammar, with terminals as produced by the lexer:
//!
//! ```text
//! puml       := STARTUML [definition (definition | link)*] ENDUML
//! definition := map | rectangle
//! map        := (MAP | SERVICE) (ID | STRING) [AS ID] '{' property* '}'
//! rectangle  := RKEYWORD (ID | STRING) [AS ID] '{' definition* '}'
//! property   := ID PROPERTY_VALUE
//! link       := (ID | STRING) arrow (ID | STRING) [LINK_INFO]
//! ```
//!
//! A document body opens with a definition; a link before the first
//! definition is a syntax error at the link.
//!
//! A `service` body is read as a rectangle body when its first token opens
//! a definition, and as a property list otherwise.

use log::debug;
use winnow::{
    Parser as _,
    combinator::{cut_err, eof, opt, peek},
    error::{ContextError, ErrMode},
    stream::{Stateful, Stream, TokenSlice},
    token::any,
};

use pumlgraph_core::semantic::{GroupType, LinkDirection};

use crate::{
    error::{Diagnostic, DiagnosticContext, ErrorCode},
    escape,
    source::{Source, SourceRef},
    tokens::{PositionedToken, Token},
    tree::{Header, Node},
};

/// Context type for parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// Description of what was expected
    Label(&'static str),
}

/// Source and diagnostics shared by every grammar rule.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ParseState<'a> {
    source: &'a Source,
    ctx: &'a DiagnosticContext<'a>,
}

impl ParseState<'_> {
    fn source_ref(&self, token: &PositionedToken<'_>) -> SourceRef {
        self.source.source_ref(token.span.start())
    }

    fn report_invalid(&self, code: ErrorCode, what: &str, token: &PositionedToken<'_>, value: &str) {
        let location = self.source_ref(token);
        let message = format!(
            "{what}: '{}', {}",
            escape::encode_str(value),
            location.brief()
        );
        self.ctx.report(
            Diagnostic::error(message)
                .with_code(code)
                .with_source_ref(location),
        );
    }

    /// Ids must not start or end with whitespace and must not contain
    /// newlines or tabs.
    fn check_id(&self, token: &PositionedToken<'_>, id: &str) {
        if id.starts_with(char::is_whitespace) || id.ends_with(char::is_whitespace) {
            self.report_invalid(
                ErrorCode::E102,
                "An item ID should not start or end with whitespace! ID",
                token,
                id,
            );
        } else if id.contains(['\n', '\t']) {
            self.report_invalid(ErrorCode::E102, "Illegal symbols found in an item ID! ID", token, id);
        }
    }

    /// Names must not contain newlines or tabs.
    fn check_name(&self, token: &PositionedToken<'_>, name: &str) {
        if name.contains(['\n', '\t']) {
            self.report_invalid(
                ErrorCode::E103,
                "Illegal symbols found in an item name! Name",
                token,
                name,
            );
        }
    }
}

type Input<'a> = Stateful<TokenSlice<'a, PositionedToken<'a>>, ParseState<'a>>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;

/// Peek at the next token without consuming it; `None` at the end of input.
fn lookahead<'a>(input: &mut Input<'a>) -> IResult<Option<&'a PositionedToken<'a>>> {
    opt(peek(any)).parse_next(input)
}

/// Consume the next token, whatever it is.
fn skip<'a>(input: &mut Input<'a>) -> IResult<()> {
    any.void().parse_next(input)
}

/// Consume the next token, which must satisfy `accept`.
///
/// On failure nothing is consumed and the error is not backtracked, so the
/// input stays at the offending token.
fn require<'a>(
    input: &mut Input<'a>,
    label: &'static str,
    accept: fn(&Token<'_>) -> bool,
) -> IResult<&'a PositionedToken<'a>> {
    cut_err(any.verify(|token: &PositionedToken<'_>| accept(&token.token)))
        .context(Context::Label(label))
        .parse_next(input)
}

fn is_reference(token: &Token<'_>) -> bool {
    matches!(token, Token::Identifier(_) | Token::StringLiteral(_))
}

fn is_arrow(token: &Token<'_>) -> bool {
    matches!(
        token,
        Token::LeftArrow(_) | Token::RightArrow(_) | Token::BidirectArrow(_) | Token::PlainLine(_)
    )
}

/// Text of an identifier or string literal token.
fn reference_text(token: &PositionedToken<'_>) -> String {
    match &token.token {
        Token::Identifier(name) => name.to_string(),
        Token::StringLiteral(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Visual category of a rectangle-family keyword
fn group_type(keyword: &Token<'_>) -> GroupType {
    match keyword {
        Token::Computer => GroupType::Computer,
        Token::Vm => GroupType::Vm,
        Token::Container => GroupType::Container,
        Token::Containers => GroupType::Containers,
        Token::External => GroupType::External,
        Token::Service => GroupType::Service,
        _ => GroupType::Group,
    }
}

fn direction(arrow: &Token<'_>) -> LinkDirection {
    match arrow {
        Token::RightArrow(_) => LinkDirection::FORWARD,
        Token::LeftArrow(_) => LinkDirection::BACKWARD,
        Token::BidirectArrow(_) => LinkDirection::BIDIRECTIONAL,
        _ => LinkDirection::PLAIN,
    }
}

/// Parse the name and optional alias of a map or rectangle
///
/// `"Display Name" as id` or `id`
fn header<'a>(input: &mut Input<'a>) -> IResult<Header> {
    let state = input.state;
    let label = require(input, "object name", is_reference)?;
    let text = reference_text(label);

    let aliased = matches!(lookahead(input)?, Some(t) if t.token == Token::As);
    if !aliased {
        state.check_id(label, &text);
        return Ok(Header::new(text.clone(), text));
    }

    skip(input)?;
    let alias = require(input, "identifier after 'as'", |t| matches!(t, Token::Identifier(_)))?;
    let id = reference_text(alias);
    state.check_id(alias, &id);
    state.check_name(label, &text);
    Ok(Header::new(id, text))
}

/// Parse `key => value` lines up to the closing brace
fn properties<'a>(input: &mut Input<'a>) -> IResult<Vec<Node>> {
    let state = input.state;
    let mut nodes = Vec::new();

    while matches!(lookahead(input)?, Some(t) if matches!(t.token, Token::Identifier(_))) {
        let key = require(input, "property name", |t| matches!(t, Token::Identifier(_)))?;
        let value = require(input, "property value", |t| matches!(t, Token::PropertyValue(_)))?;

        let key_text = reference_text(key);
        state.check_id(key, &key_text);
        let value_text = match &value.token {
            Token::PropertyValue(v) => v.clone(),
            _ => String::new(),
        };
        nodes.push(Node::property(state.source_ref(key), key_text, value_text));
    }

    Ok(nodes)
}

/// Parse a map or rectangle, starting at its keyword
fn definition<'a>(input: &mut Input<'a>) -> IResult<Node> {
    let state = input.state;
    let keyword = require(input, "definition", |t| t.starts_definition())?;
    let header = header(input)?;
    require(input, "'{'", |t| *t == Token::CurlyOpen)?;

    let is_map = match keyword.token {
        Token::Map => true,
        Token::Service => !matches!(lookahead(input)?, Some(t) if t.token.starts_definition()),
        _ => false,
    };

    let node = if is_map {
        let properties = properties(input)?;
        Node::map(state.source_ref(keyword), header, properties)
    } else {
        let children = definitions(input, false)?;
        Node::rectangle(
            state.source_ref(keyword),
            header,
            group_type(&keyword.token),
            children,
        )
    };

    require(input, "'}'", |t| *t == Token::CurlyClose)?;
    Ok(node)
}

/// Parse `a -> b : info`
fn link<'a>(input: &mut Input<'a>) -> IResult<Node> {
    let state = input.state;
    let first = require(input, "link source", is_reference)?;
    let arrow = require(input, "arrow", is_arrow)?;
    let second = require(input, "link target", is_reference)?;

    let info = match lookahead(input)? {
        Some(PositionedToken {
            token: Token::LinkInfo(info),
            ..
        }) => {
            skip(input)?;
            Some(info.clone())
        }
        _ => None,
    };

    let id1 = reference_text(first);
    let id2 = reference_text(second);
    state.check_id(first, &id1);
    state.check_id(second, &id2);

    Ok(Node::link(
        state.source_ref(first),
        id1,
        id2,
        direction(&arrow.token),
        info,
    ))
}

/// Parse definitions, and links if `allow_links`, until a token that can
/// start neither.
fn definitions<'a>(input: &mut Input<'a>, allow_links: bool) -> IResult<Vec<Node>> {
    let mut nodes = Vec::new();
    loop {
        let Some(next) = lookahead(input)? else {
            return Ok(nodes);
        };
        if next.token.starts_definition() {
            nodes.push(definition(input)?);
        } else if allow_links && is_reference(&next.token) {
            nodes.push(link(input)?);
        } else {
            return Ok(nodes);
        }
    }
}

fn end_of_input<'a>(input: &mut Input<'a>) -> IResult<()> {
    cut_err(eof)
        .void()
        .context(Context::Label("end of input"))
        .parse_next(input)
}

/// Parse a whole document
fn puml<'a>(input: &mut Input<'a>) -> IResult<Node> {
    let state = input.state;
    let start = require(input, "@startuml", |t| *t == Token::StartUml)?;
    let children = match lookahead(input)? {
        Some(next) if next.token.starts_definition() => definitions(input, true)?,
        _ => Vec::new(),
    };
    require(input, "@enduml", |t| *t == Token::EndUml)?;
    end_of_input(input)?;

    Ok(Node::document(state.source_ref(start), children))
}

/// Convert a winnow error at `remaining` tokens from the end into a
/// syntax-error diagnostic.
fn convert_error(
    error: ErrMode<ContextError<Context>>,
    source: &Source,
    tokens: &[PositionedToken<'_>],
    remaining: usize,
) -> Diagnostic {
    let expected: Vec<&str> = match &error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e
            .context()
            .map(|ctx| match ctx {
                Context::Label(label) => *label,
            })
            .collect(),
        ErrMode::Incomplete(_) => Vec::new(),
    };
    debug!(expected:? = expected; "Syntax error");

    match tokens.get(tokens.len() - remaining) {
        Some(token) => {
            let location = source.source_ref(token.span.start());
            Diagnostic::error(format!("Syntax error near '{token}', {}", location.brief()))
                .with_code(ErrorCode::E100)
                .with_source_ref(location)
        }
        None => Diagnostic::error(format!("Syntax error at the end of \"{}\"", source.name()))
            .with_code(ErrorCode::E101),
    }
}

/// Parse a token stream into a document tree.
///
/// Invalid ids and names are reported on `ctx` without stopping the parse.
/// On a syntax error a single diagnostic is reported and `None` is
/// returned.
pub fn parse<'a>(
    source: &'a Source,
    tokens: &'a [PositionedToken<'a>],
    ctx: &'a DiagnosticContext<'a>,
) -> Option<Node> {
    let mut input: Input<'a> = Stateful {
        input: TokenSlice::new(tokens),
        state: ParseState { source, ctx },
    };

    match puml.parse_next(&mut input) {
        Ok(tree) => {
            debug!(nodes = tree.count(); "Parsed document");
            Some(tree)
        }
        Err(error) => {
            let remaining = input.eof_offset();
            ctx.report(convert_error(error, source, tokens, remaining));
            None
        }
    }
}
