//! Tokenizer for the predicate language

use crate::error::{ExprError, Result};

/// One lexical token plus its byte offset in the source
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Spanned {
    pub token: Token,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Number(f64),
    Str(String),
    Ident(String),
    True,
    False,
    Null,
    AndAnd,
    OrOr,
    Not,
    Lt,
    Le,
    Gt,
    Ge,
    LooseEq,
    StrictEq,
    LooseNe,
    StrictNe,
    Dot,
    LParen,
    RParen,
}

impl Token {
    pub fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {n}"),
            Token::Str(s) => format!("string {s:?}"),
            Token::Ident(name) => format!("identifier '{name}'"),
            Token::True => "'true'".into(),
            Token::False => "'false'".into(),
            Token::Null => "'null'".into(),
            Token::AndAnd => "'&&'".into(),
            Token::OrOr => "'||'".into(),
            Token::Not => "'!'".into(),
            Token::Lt => "'<'".into(),
            Token::Le => "'<='".into(),
            Token::Gt => "'>'".into(),
            Token::Ge => "'>='".into(),
            Token::LooseEq => "'=='".into(),
            Token::StrictEq => "'==='".into(),
            Token::LooseNe => "'!='".into(),
            Token::StrictNe => "'!=='".into(),
            Token::Dot => "'.'".into(),
            Token::LParen => "'('".into(),
            Token::RParen => "')'".into(),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Tokenize a condition; whitespace is insignificant
pub(crate) fn tokenize(source: &str) -> Result<Vec<Spanned>> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let token = match c {
            '(' => {
                chars.next();
                Token::LParen
            }
            ')' => {
                chars.next();
                Token::RParen
            }
            '.' => {
                chars.next();
                Token::Dot
            }
            '&' => {
                chars.next();
                match chars.peek() {
                    Some(&(_, '&')) => {
                        chars.next();
                        Token::AndAnd
                    }
                    _ => return Err(ExprError::UnexpectedChar { found: '&', offset }),
                }
            }
            '|' => {
                chars.next();
                match chars.peek() {
                    Some(&(_, '|')) => {
                        chars.next();
                        Token::OrOr
                    }
                    _ => return Err(ExprError::UnexpectedChar { found: '|', offset }),
                }
            }
            '<' => {
                chars.next();
                if matches!(chars.peek(), Some(&(_, '='))) {
                    chars.next();
                    Token::Le
                } else {
                    Token::Lt
                }
            }
            '>' => {
                chars.next();
                if matches!(chars.peek(), Some(&(_, '='))) {
                    chars.next();
                    Token::Ge
                } else {
                    Token::Gt
                }
            }
            '=' => {
                chars.next();
                if !matches!(chars.peek(), Some(&(_, '='))) {
                    return Err(ExprError::UnexpectedChar { found: '=', offset });
                }
                chars.next();
                if matches!(chars.peek(), Some(&(_, '='))) {
                    chars.next();
                    Token::StrictEq
                } else {
                    Token::LooseEq
                }
            }
            '!' => {
                chars.next();
                if matches!(chars.peek(), Some(&(_, '='))) {
                    chars.next();
                    if matches!(chars.peek(), Some(&(_, '='))) {
                        chars.next();
                        Token::StrictNe
                    } else {
                        Token::LooseNe
                    }
                } else {
                    Token::Not
                }
            }
            '"' | '\'' => {
                let delimiter = c;
                chars.next();
                let mut value = String::new();
                let mut closed = false;
                while let Some((_, ch)) = chars.next() {
                    if ch == '\\' {
                        match chars.next() {
                            Some((_, escaped)) => value.push(escaped),
                            None => break,
                        }
                    } else if ch == delimiter {
                        closed = true;
                        break;
                    } else {
                        value.push(ch);
                    }
                }
                if !closed {
                    return Err(ExprError::UnterminatedString { offset });
                }
                Token::Str(value)
            }
            c if c.is_ascii_digit() => {
                let mut literal = String::new();
                let mut seen_dot = false;
                while let Some(&(_, ch)) = chars.peek() {
                    if ch.is_ascii_digit() {
                        literal.push(ch);
                        chars.next();
                    } else if ch == '.' && !seen_dot {
                        // Only consume the dot when a digit follows; a bare
                        // trailing dot belongs to the next token
                        let mut lookahead = chars.clone();
                        lookahead.next();
                        match lookahead.peek() {
                            Some(&(_, next)) if next.is_ascii_digit() => {
                                seen_dot = true;
                                literal.push(ch);
                                chars.next();
                            }
                            _ => break,
                        }
                    } else {
                        break;
                    }
                }
                let parsed = literal.parse::<f64>().map_err(|_| ExprError::InvalidNumber {
                    literal: literal.clone(),
                    offset,
                })?;
                Token::Number(parsed)
            }
            c if is_ident_start(c) => {
                let mut name = String::new();
                while let Some(&(_, ch)) = chars.peek() {
                    if is_ident_continue(ch) {
                        name.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                match name.as_str() {
                    "true" => Token::True,
                    "false" => Token::False,
                    // `undefined` is an alias for null at the language level
                    "null" | "undefined" => Token::Null,
                    _ => Token::Ident(name),
                }
            }
            other => return Err(ExprError::UnexpectedChar { found: other, offset }),
        };

        tokens.push(Spanned { token, offset });
    }

    Ok(tokens)
}
