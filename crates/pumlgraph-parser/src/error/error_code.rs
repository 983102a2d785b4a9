//! Error codes for the pumlgraph diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Lexer errors
//! - `E1xx` - Parser errors
//! - `E2xx` - Semantic analysis errors

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer Errors (E0xx)
    // =========================================================================
    /// Unclosed string literal.
    ///
    /// A line ended before the closing quote of a string literal.
    E001,

    /// Illegal character.
    ///
    /// A character that starts no token was found outside strings and comments.
    E002,

    /// Invalid escape sequence.
    ///
    /// The escaped character is kept literally and tokenizing continues.
    E003,

    /// Unterminated comment.
    ///
    /// A `/'` block comment is still open at the end of the source.
    E004,

    // =========================================================================
    // Parser Errors (E1xx)
    // =========================================================================
    /// Unexpected token.
    E100,

    /// Unexpected end of input.
    E101,

    /// Invalid object id.
    ///
    /// Ids must not start or end with whitespace and must not contain
    /// newlines or tabs.
    E102,

    /// Invalid display name.
    ///
    /// Names must not contain newlines or tabs.
    E103,

    // =========================================================================
    // Semantic Errors (E2xx)
    // =========================================================================
    /// Duplicate object id.
    E200,

    /// An object's id equals another object's name.
    E201,

    /// An object's name equals another object's id.
    E202,

    /// Duplicate object name.
    E203,

    /// Unresolved link endpoint.
    E204,

    /// Duplicate property key within one object.
    E205,

    /// Pointer back at an earlier definition.
    ///
    /// Always accompanies one of the duplicate diagnostics above.
    E290,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
            ErrorCode::E205 => "E205",
            ErrorCode::E290 => "E290",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unclosed string literal",
            ErrorCode::E002 => "illegal character",
            ErrorCode::E003 => "invalid escape sequence",
            ErrorCode::E004 => "unterminated comment",
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "unexpected end of input",
            ErrorCode::E102 => "invalid id",
            ErrorCode::E103 => "invalid name",
            ErrorCode::E200 => "duplicate id",
            ErrorCode::E201 => "id duplicates a name",
            ErrorCode::E202 => "name duplicates an id",
            ErrorCode::E203 => "duplicate name",
            ErrorCode::E204 => "unresolved reference",
            ErrorCode::E205 => "duplicate property",
            ErrorCode::E290 => "original definition",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
