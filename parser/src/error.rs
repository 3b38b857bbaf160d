use thiserror::Error;
use lalrpop_util;

use util::Spanned;
use crate::token;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LexErrorKind {
    #[error("unrecognized token `{0}`")]
    UnrecognizedToken(String),
}

pub type LexError = Spanned<LexErrorKind>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseErrorKind {
    #[error("parse error: unexpected end of file")]
    Eof,
    #[error("lexer error: {0}")]
    Lexical(LexErrorKind),
    #[error("parse error: found extra token `{0}`")]
    ExtraToken(token::Token),
    #[error("parse error: invalid token `{0}`")]
    InvalidToken(token::Token),
    #[error("parse error: unrecognized token `{0}`, expected `{1}`")]
    UnrecognizedToken(token::Token, String),
    #[error("parse error: `{0}` cannot be assigned to")]
    InvalidAssignTarget(String),
    #[error("parse error: label `{0}` is defined twice")]
    DuplicatedLabel(String),
    #[error("parse error: label `{0}` is not defined in method `{1}`")]
    UndefinedLabel(String, String),
}

pub type ParseError = Spanned<ParseErrorKind>;

type LalrpopError = lalrpop_util::ParseError<usize, token::Token, LexError>;

pub fn from_lalrpop(err: LalrpopError) -> ParseError {
    match err {
        // the lexer reports bad input itself, so this is only hit at the end
        LalrpopError::InvalidToken { location } => Spanned::new(ParseErrorKind::Eof, (location, location)),
        LalrpopError::ExtraToken { token: (lo, tok, hi) } => Spanned::new(ParseErrorKind::ExtraToken(tok), (lo, hi)),
        LalrpopError::User { error } => error.map(ParseErrorKind::Lexical),
        LalrpopError::UnrecognizedToken {
            token: (lo, tok, hi),
            expected,
        } => {
            // take only first expected candidate
            let expected = expected.into_iter().next().unwrap_or_default();
            Spanned::new(ParseErrorKind::UnrecognizedToken(tok, expected), (lo, hi))
        }
        LalrpopError::UnrecognizedEOF { location, .. } => Spanned::new(ParseErrorKind::Eof, (location, location)),
    }
}
