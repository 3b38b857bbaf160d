use crate::error::{LexError, LexErrorKind};
use crate::token::*;
use plex::lexer;
use util::Spanned;

pub type Result = std::result::Result<(usize, Token, usize), LexError>;

#[derive(Debug, Clone, PartialEq)]
enum LexToken {
    Tok(Token),
    Space,
    Error(LexErrorKind),
}

use LexToken::*;

lexer! {
    fn next_token(text: 'input) -> LexToken;

    r"[\t\n\r ]" => Space,
    r"//[^\n]*" => Space,
    r"\." => Tok(Token::Dot),
    "," => Tok(Token::Comma),
    ";" => Tok(Token::SemiColon),
    ":" => Tok(Token::Colon),
    ":=" => Tok(Token::Assign),
    r"\(" => Tok(Token::LPar),
    r"\)" => Tok(Token::RPar),
    r"\{" => Tok(Token::LBrace),
    r"\}" => Tok(Token::RBrace),
    r"\[" => Tok(Token::LBracket),
    r"\]" => Tok(Token::RBracket),
    r"\+" => Tok(Token::Plus),
    r"\-" => Tok(Token::Minus),
    r"\*" => Tok(Token::Star),
    "/" => Tok(Token::Slash),
    "<" => Tok(Token::Less),
    ">" => Tok(Token::Greater),
    "<=" => Tok(Token::LessEqual),
    ">=" => Tok(Token::GreaterEqual),
    "==" => Tok(Token::EqualEqual),
    "!=" => Tok(Token::NotEqual),
    r"\&\&" => Tok(Token::AndAnd),
    r"\|\|" => Tok(Token::OrOr),
    "!" => Tok(Token::Not),
    r"\-?[0-9]+" => Tok(Token::Int(text.to_owned())),
    r#""[^"\n]*""# => Tok(Token::Str(text[1..text.len() - 1].to_owned())),
    "import" => Tok(Token::Import),
    "extends" => Tok(Token::Extends),
    "field" => Tok(Token::Field),
    "method" => Tok(Token::Method),
    "construct" => Tok(Token::Construct),
    "public" => Tok(Token::Public),
    "private" => Tok(Token::Private),
    "protected" => Tok(Token::Protected),
    "static" => Tok(Token::Static),
    "final" => Tok(Token::Final),
    "goto" => Tok(Token::Goto),
    "if" => Tok(Token::If),
    "ret" => Tok(Token::Ret),
    "new" => Tok(Token::New),
    "array" => Tok(Token::Array),
    "getfield" => Tok(Token::GetField),
    "putfield" => Tok(Token::PutField),
    "arraylength" => Tok(Token::ArrayLength),
    "invokestatic" => Tok(Token::InvokeStatic),
    "invokevirtual" => Tok(Token::InvokeVirtual),
    "invokespecial" => Tok(Token::InvokeSpecial),
    r"[A-Za-z_$][0-9A-Za-z_$]*" => Tok(Token::Ident(text.to_owned())),
    r"." => Error(LexErrorKind::UnrecognizedToken(text.to_owned()))
}

pub struct Lexer<'input> {
    original: &'input str,
    remaining: &'input str,
}

impl<'input> Lexer<'input> {
    #[inline]
    pub fn new(s: &'input str) -> Self {
        Lexer {
            original: s,
            remaining: s,
        }
    }
}

impl<'input> Iterator for Lexer<'input> {
    type Item = Result;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (tok, remaining) = next_token(self.remaining)?;
            let lo = self.original.len() - self.remaining.len();
            let hi = self.original.len() - remaining.len();
            self.remaining = remaining;

            match tok {
                Space => continue,
                Tok(tok) => return Some(Ok((lo, tok, hi))),
                Error(e) => return Some(Err(Spanned::new(e, (lo, hi)))),
            }
        }
    }
}
