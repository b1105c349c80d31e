//! Recursive-descent parser producing the query AST.
//!
//! Precedence from loosest to tightest: `or`, `and`, `not`, comparison.
//! Chained comparisons (`1 < x <= 5`) expand to a conjunction. Runs of
//! `or`/`and` parse into one n-ary node, so only parentheses and `not` add
//! depth; both are capped, as is the number of predicates.

use super::lexer::{Spanned, Token};
use super::QueryError;
use crate::types::Scalar;

/// Deepest allowed nesting of parentheses and `not`.
pub const MAX_DEPTH: usize = 64;

/// Most predicates (comparisons, memberships, bare operands) in one query.
pub const MAX_TERMS: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    fn from_token(token: &Token) -> Option<Self> {
        match token {
            Token::Eq => Some(CmpOp::Eq),
            Token::Ne => Some(CmpOp::Ne),
            Token::Lt => Some(CmpOp::Lt),
            Token::Le => Some(CmpOp::Le),
            Token::Gt => Some(CmpOp::Gt),
            Token::Ge => Some(CmpOp::Ge),
            _ => None,
        }
    }

    pub fn is_ordering(&self) -> bool {
        !matches!(self, CmpOp::Eq | CmpOp::Ne)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Column(String),
    Literal(Scalar),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// At least two alternatives.
    Or(Vec<Expr>),
    /// At least two conjuncts.
    And(Vec<Expr>),
    Not(Box<Expr>),
    Compare {
        left: Operand,
        op: CmpOp,
        right: Operand,
    },
    Membership {
        operand: Operand,
        values: Vec<Scalar>,
        negated: bool,
    },
    /// Bare operand used as a predicate; must be boolean-valued.
    Truthy(Operand),
}

impl Expr {
    /// Every column name referenced by the expression, in first-seen order.
    pub fn columns(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns(&self, out: &mut Vec<String>) {
        match self {
            Expr::Or(terms) | Expr::And(terms) => {
                for term in terms {
                    term.collect_columns(out);
                }
            }
            Expr::Not(inner) => inner.collect_columns(out),
            Expr::Compare { left, right, .. } => {
                push_column(left, out);
                push_column(right, out);
            }
            Expr::Membership { operand, .. } | Expr::Truthy(operand) => push_column(operand, out),
        }
    }
}

fn push_column(operand: &Operand, out: &mut Vec<String>) {
    if let Operand::Column(name) = operand {
        if !out.contains(name) {
            out.push(name.clone());
        }
    }
}

pub struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    end: usize,
    depth: usize,
    terms: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Spanned>, source_len: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            end: source_len,
            depth: 0,
            terms: 0,
        }
    }

    pub fn parse(mut self) -> Result<Expr, QueryError> {
        let expr = self.or_expr()?;
        match self.tokens.get(self.pos) {
            None => Ok(expr),
            Some(extra) => Err(QueryError::new(
                extra.offset,
                format!("unexpected {}", extra.token.describe()),
            )),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn peek_at(&self, ahead: usize) -> Option<&Token> {
        self.tokens.get(self.pos + ahead).map(|s| &s.token)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map(|s| s.offset).unwrap_or(self.end)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|s| s.token.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token) -> Result<(), QueryError> {
        let offset = self.offset();
        match self.advance() {
            Some(ref t) if *t == expected => Ok(()),
            Some(t) => Err(QueryError::new(
                offset,
                format!("expected '{}', found {}", expected.describe(), t.describe()),
            )),
            None => Err(QueryError::new(
                offset,
                format!("expected '{}', found end of expression", expected.describe()),
            )),
        }
    }

    /// Step one level deeper into `(` or `not`.
    fn descend(&mut self) -> Result<(), QueryError> {
        if self.depth >= MAX_DEPTH {
            return Err(QueryError::new(
                self.offset(),
                format!("expression nests deeper than {} levels", MAX_DEPTH),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn count_term(&mut self, offset: usize) -> Result<(), QueryError> {
        self.terms += 1;
        if self.terms > MAX_TERMS {
            return Err(QueryError::new(
                offset,
                format!("expression has more than {} conditions", MAX_TERMS),
            ));
        }
        Ok(())
    }

    fn or_expr(&mut self) -> Result<Expr, QueryError> {
        let mut terms = vec![self.and_expr()?];
        while self.peek() == Some(&Token::Or) {
            self.advance();
            terms.push(self.and_expr()?);
        }
        Ok(collapse(terms, Expr::Or))
    }

    fn and_expr(&mut self) -> Result<Expr, QueryError> {
        let mut terms = vec![self.not_expr()?];
        while self.peek() == Some(&Token::And) {
            self.advance();
            terms.push(self.not_expr()?);
        }
        Ok(collapse(terms, Expr::And))
    }

    fn not_expr(&mut self) -> Result<Expr, QueryError> {
        if self.peek() == Some(&Token::Not) {
            self.descend()?;
            self.advance();
            let inner = self.not_expr()?;
            self.depth -= 1;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, QueryError> {
        if self.peek() == Some(&Token::LParen) {
            self.descend()?;
            self.advance();
            let inner = self.or_expr()?;
            self.expect(Token::RParen)?;
            self.depth -= 1;
            return Ok(inner);
        }

        let start = self.offset();
        self.count_term(start)?;
        let left = self.operand()?;

        if let Some(op) = self.peek().and_then(CmpOp::from_token) {
            self.advance();
            let right = self.operand()?;
            let mut links = vec![Expr::Compare {
                left,
                op,
                right: right.clone(),
            }];
            let mut previous = right;
            while let Some(op) = self.peek().and_then(CmpOp::from_token) {
                let offset = self.offset();
                self.advance();
                self.count_term(offset)?;
                let next = self.operand()?;
                links.push(Expr::Compare {
                    left: previous,
                    op,
                    right: next.clone(),
                });
                previous = next;
            }
            return Ok(collapse(links, Expr::And));
        }

        let negated = self.peek() == Some(&Token::Not) && self.peek_at(1) == Some(&Token::In);
        if negated || self.peek() == Some(&Token::In) {
            if negated {
                self.advance();
            }
            self.advance();
            let values = self.literal_list()?;
            return Ok(Expr::Membership {
                operand: left,
                values,
                negated,
            });
        }

        Ok(Expr::Truthy(left))
    }

    fn literal_list(&mut self) -> Result<Vec<Scalar>, QueryError> {
        self.expect(Token::LBracket)?;
        let mut values = Vec::new();
        if self.peek() == Some(&Token::RBracket) {
            self.advance();
            return Ok(values);
        }
        loop {
            let offset = self.offset();
            match self.operand()? {
                Operand::Literal(value) => values.push(value),
                Operand::Column(name) => {
                    return Err(QueryError::new(
                        offset,
                        format!("list items must be literals, found column `{}`", name),
                    ))
                }
            }
            match self.peek() {
                Some(Token::Comma) => {
                    self.advance();
                    if self.peek() == Some(&Token::RBracket) {
                        self.advance();
                        return Ok(values);
                    }
                }
                Some(Token::RBracket) => {
                    self.advance();
                    return Ok(values);
                }
                _ => {
                    return Err(QueryError::new(
                        self.offset(),
                        "expected ',' or ']' in list",
                    ))
                }
            }
        }
    }

    fn operand(&mut self) -> Result<Operand, QueryError> {
        let offset = self.offset();
        match self.advance() {
            Some(Token::Ident(name)) => Ok(Operand::Column(name)),
            Some(Token::Int(i)) => Ok(Operand::Literal(Scalar::Int(i))),
            Some(Token::Float(f)) => Ok(Operand::Literal(Scalar::Float(f))),
            Some(Token::Str(s)) => Ok(Operand::Literal(Scalar::Text(s))),
            Some(Token::True) => Ok(Operand::Literal(Scalar::Bool(true))),
            Some(Token::False) => Ok(Operand::Literal(Scalar::Bool(false))),
            Some(Token::Null) => Ok(Operand::Literal(Scalar::Null)),
            Some(Token::Minus) => match self.advance() {
                Some(Token::Int(i)) => Ok(Operand::Literal(Scalar::Int(-i))),
                Some(Token::Float(f)) => Ok(Operand::Literal(Scalar::Float(-f))),
                _ => Err(QueryError::new(offset, "'-' must precede a number")),
            },
            Some(other) => Err(QueryError::new(
                offset,
                format!("expected a column or literal, found {}", other.describe()),
            )),
            None => Err(QueryError::new(
                offset,
                "expected a column or literal, found end of expression",
            )),
        }
    }
}

/// A single term stands alone; two or more join under `join`.
fn collapse(mut terms: Vec<Expr>, join: fn(Vec<Expr>) -> Expr) -> Expr {
    if terms.len() == 1 {
        if let Some(only) = terms.pop() {
            return only;
        }
    }
    join(terms)
}
