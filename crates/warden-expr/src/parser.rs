//! Recursive-descent parser over the token stream
//!
//! Grammar, precedence low to high:
//!
//! ```text
//! expr    = orExpr
//! orExpr  = andExpr ( "||" andExpr )*
//! andExpr = notExpr ( "&&" notExpr )*
//! notExpr = "!" notExpr | cmpExpr
//! cmpExpr = primary ( cmpOp primary )?
//! primary = "(" expr ")" | number | string | bool | null | identifier
//! ```

use crate::ast::{CmpOp, Expr, Literal};
use crate::error::{ExprError, Result};
use crate::lexer::{Spanned, Token};

pub(crate) fn parse(tokens: &[Spanned]) -> Result<Expr> {
    let mut parser = Parser { tokens, index: 0 };
    if tokens.is_empty() {
        return Err(ExprError::Empty);
    }
    let expr = parser.or_expr()?;
    if let Some(extra) = parser.peek() {
        return Err(ExprError::TrailingInput {
            offset: extra.offset,
        });
    }
    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Spanned],
    index: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Spanned> {
        self.tokens.get(self.index)
    }

    fn advance(&mut self) -> Option<&'a Spanned> {
        let spanned = self.tokens.get(self.index);
        if spanned.is_some() {
            self.index += 1;
        }
        spanned
    }

    fn expect(&mut self, expected: &Token, label: &str) -> Result<()> {
        match self.advance() {
            Some(spanned) if &spanned.token == expected => Ok(()),
            Some(spanned) => Err(ExprError::UnexpectedToken {
                found: spanned.token.describe(),
                expected: label.to_string(),
                offset: spanned.offset,
            }),
            None => Err(ExprError::UnexpectedEnd {
                expected: label.to_string(),
            }),
        }
    }

    fn or_expr(&mut self) -> Result<Expr> {
        let mut lhs = self.and_expr()?;
        while matches!(self.peek(), Some(s) if s.token == Token::OrOr) {
            self.advance();
            let rhs = self.and_expr()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> Result<Expr> {
        let mut lhs = self.not_expr()?;
        while matches!(self.peek(), Some(s) if s.token == Token::AndAnd) {
            self.advance();
            let rhs = self.not_expr()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn not_expr(&mut self) -> Result<Expr> {
        if matches!(self.peek(), Some(s) if s.token == Token::Not) {
            self.advance();
            let inner = self.not_expr()?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.cmp_expr()
    }

    fn cmp_expr(&mut self) -> Result<Expr> {
        let lhs = self.primary()?;
        let op = match self.peek().map(|s| &s.token) {
            Some(Token::Gt) => CmpOp::Gt,
            Some(Token::Ge) => CmpOp::Ge,
            Some(Token::Lt) => CmpOp::Lt,
            Some(Token::Le) => CmpOp::Le,
            Some(Token::LooseEq) => CmpOp::LooseEq,
            Some(Token::StrictEq) => CmpOp::StrictEq,
            Some(Token::LooseNe) => CmpOp::LooseNe,
            Some(Token::StrictNe) => CmpOp::StrictNe,
            _ => return Ok(lhs),
        };
        self.advance();
        let rhs = self.primary()?;
        Ok(Expr::Cmp {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    fn primary(&mut self) -> Result<Expr> {
        let spanned = self.advance().ok_or_else(|| ExprError::UnexpectedEnd {
            expected: "a value or '('".to_string(),
        })?;
        match &spanned.token {
            Token::LParen => {
                let inner = self.or_expr()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(inner)
            }
            Token::Number(n) => Ok(Expr::Literal(Literal::Number(*n))),
            Token::Str(s) => Ok(Expr::Literal(Literal::Str(s.clone()))),
            Token::True => Ok(Expr::Literal(Literal::Bool(true))),
            Token::False => Ok(Expr::Literal(Literal::Bool(false))),
            Token::Null => Ok(Expr::Literal(Literal::Null)),
            Token::Ident(first) => {
                let mut path = vec![first.clone()];
                while matches!(self.peek(), Some(s) if s.token == Token::Dot) {
                    self.advance();
                    match self.advance() {
                        Some(Spanned {
                            token: Token::Ident(segment),
                            ..
                        }) => path.push(segment.clone()),
                        Some(other) => {
                            return Err(ExprError::UnexpectedToken {
                                found: other.token.describe(),
                                expected: "an identifier after '.'".to_string(),
                                offset: other.offset,
                            })
                        }
                        None => {
                            return Err(ExprError::UnexpectedEnd {
                                expected: "an identifier after '.'".to_string(),
                            })
                        }
                    }
                }
                Ok(Expr::Path(path))
            }
            other => Err(ExprError::UnexpectedToken {
                found: other.describe(),
                expected: "a value or '('".to_string(),
                offset: spanned.offset,
            }),
        }
    }
}
