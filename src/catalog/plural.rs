//! Plural-form selection rules
//!
//! Catalogs embed their rule as a gettext `Plural-Forms` header, e.g.
//! `nplurals=2; plural=(n > 1);`. The expression is a small C subset over
//! `n`; it is parsed once when the catalog is built and evaluated per
//! lookup.

use std::fmt;

use crate::utils::errors::{VernacularError, Result};

/// Parsed plural expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluralExpr {
    N,
    Const(u64),
    Not(Box<PluralExpr>),
    Neg(Box<PluralExpr>),
    Binary(BinaryOp, Box<PluralExpr>, Box<PluralExpr>),
    Ternary(Box<PluralExpr>, Box<PluralExpr>, Box<PluralExpr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Mul,
    Div,
    Rem,
    Add,
    Sub,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

impl BinaryOp {
    fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Eq | BinaryOp::Ne => 3,
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => 4,
            BinaryOp::Add | BinaryOp::Sub => 5,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 6,
        }
    }

    fn apply(self, lhs: u64, rhs: u64) -> u64 {
        match self {
            BinaryOp::Mul => lhs.wrapping_mul(rhs),
            BinaryOp::Div => lhs.checked_div(rhs).unwrap_or(0),
            BinaryOp::Rem => lhs.checked_rem(rhs).unwrap_or(0),
            BinaryOp::Add => lhs.wrapping_add(rhs),
            BinaryOp::Sub => lhs.wrapping_sub(rhs),
            BinaryOp::Lt => (lhs < rhs) as u64,
            BinaryOp::Le => (lhs <= rhs) as u64,
            BinaryOp::Gt => (lhs > rhs) as u64,
            BinaryOp::Ge => (lhs >= rhs) as u64,
            BinaryOp::Eq => (lhs == rhs) as u64,
            BinaryOp::Ne => (lhs != rhs) as u64,
            BinaryOp::And => (lhs != 0 && rhs != 0) as u64,
            BinaryOp::Or => (lhs != 0 || rhs != 0) as u64,
        }
    }
}

impl PluralExpr {
    /// Parse a C plural expression such as `n%10==1 && n%100!=11 ? 0 : 1`
    pub fn parse(source: &str) -> Result<Self> {
        let tokens = tokenize(source)?;
        let mut parser = Parser { tokens: &tokens, pos: 0, depth: 0 };
        let expr = parser.ternary()?;
        match parser.peek() {
            None => Ok(expr),
            Some(token) => Err(VernacularError::InvalidPluralForms(format!(
                "unexpected token {:?} in '{}'",
                token, source
            ))),
        }
    }

    /// Evaluate for a count; `/ 0` and `% 0` evaluate to 0
    pub fn evaluate(&self, n: u64) -> u64 {
        match self {
            PluralExpr::N => n,
            PluralExpr::Const(value) => *value,
            PluralExpr::Not(inner) => (inner.evaluate(n) == 0) as u64,
            PluralExpr::Neg(inner) => inner.evaluate(n).wrapping_neg(),
            PluralExpr::Binary(BinaryOp::And, lhs, rhs) => {
                (lhs.evaluate(n) != 0 && rhs.evaluate(n) != 0) as u64
            }
            PluralExpr::Binary(BinaryOp::Or, lhs, rhs) => {
                (lhs.evaluate(n) != 0 || rhs.evaluate(n) != 0) as u64
            }
            PluralExpr::Binary(op, lhs, rhs) => op.apply(lhs.evaluate(n), rhs.evaluate(n)),
            PluralExpr::Ternary(cond, then, otherwise) => {
                if cond.evaluate(n) != 0 {
                    then.evaluate(n)
                } else {
                    otherwise.evaluate(n)
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    N,
    Num(u64),
    Op(BinaryOp),
    Not,
    Minus,
    Question,
    Colon,
    LParen,
    RParen,
}

fn tokenize(source: &str) -> Result<Vec<Token>> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    let invalid = |reason: String| VernacularError::InvalidPluralForms(reason);

    while i < bytes.len() {
        let c = bytes[i];
        let next = bytes.get(i + 1).copied();
        let (token, width) = match c {
            b' ' | b'\t' | b'\n' | b'\r' => {
                i += 1;
                continue;
            }
            b'n' => (Token::N, 1),
            b'0'..=b'9' => {
                let start = i;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
                let value = source[start..i]
                    .parse::<u64>()
                    .map_err(|e| invalid(format!("bad number '{}': {}", &source[start..i], e)))?;
                tokens.push(Token::Num(value));
                continue;
            }
            b'(' => (Token::LParen, 1),
            b')' => (Token::RParen, 1),
            b'?' => (Token::Question, 1),
            b':' => (Token::Colon, 1),
            b'*' => (Token::Op(BinaryOp::Mul), 1),
            b'/' => (Token::Op(BinaryOp::Div), 1),
            b'%' => (Token::Op(BinaryOp::Rem), 1),
            b'+' => (Token::Op(BinaryOp::Add), 1),
            b'-' => (Token::Minus, 1),
            b'<' if next == Some(b'=') => (Token::Op(BinaryOp::Le), 2),
            b'<' => (Token::Op(BinaryOp::Lt), 1),
            b'>' if next == Some(b'=') => (Token::Op(BinaryOp::Ge), 2),
            b'>' => (Token::Op(BinaryOp::Gt), 1),
            b'=' if next == Some(b'=') => (Token::Op(BinaryOp::Eq), 2),
            b'!' if next == Some(b'=') => (Token::Op(BinaryOp::Ne), 2),
            b'!' => (Token::Not, 1),
            b'&' if next == Some(b'&') => (Token::Op(BinaryOp::And), 2),
            b'|' if next == Some(b'|') => (Token::Op(BinaryOp::Or), 2),
            _ => {
                return Err(invalid(format!(
                    "unexpected character '{}' in '{}'",
                    source[i..].chars().next().unwrap_or('?'),
                    source
                )))
            }
        };
        tokens.push(token);
        i += width;
    }

    Ok(tokens)
}

/// Deepest nesting of parentheses, ternaries and unary operators accepted
const MAX_DEPTH: usize = 64;

struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.peek();
        self.pos += 1;
        token
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        match self.bump() {
            Some(token) if token == expected => Ok(()),
            other => Err(VernacularError::InvalidPluralForms(format!(
                "expected {:?}, found {:?}",
                expected, other
            ))),
        }
    }

    fn deeper(&mut self) -> Result<()> {
        if self.depth >= MAX_DEPTH {
            return Err(VernacularError::InvalidPluralForms(format!(
                "expression nested deeper than {} levels",
                MAX_DEPTH
            )));
        }
        self.depth += 1;
        Ok(())
    }

    fn nested(&mut self, parse: impl FnOnce(&mut Self) -> Result<PluralExpr>) -> Result<PluralExpr> {
        self.deeper()?;
        let expr = parse(self);
        self.depth -= 1;
        expr
    }

    fn ternary(&mut self) -> Result<PluralExpr> {
        self.nested(Self::conditional)
    }

    fn conditional(&mut self) -> Result<PluralExpr> {
        let cond = self.binary(1)?;
        if self.peek() == Some(Token::Question) {
            self.bump();
            let then = self.ternary()?;
            self.expect(Token::Colon)?;
            let otherwise = self.ternary()?;
            return Ok(PluralExpr::Ternary(
                Box::new(cond),
                Box::new(then),
                Box::new(otherwise),
            ));
        }
        Ok(cond)
    }

    /// Each chained operator deepens the tree, so it counts as nesting
    fn binary(&mut self, min_precedence: u8) -> Result<PluralExpr> {
        let entered = self.depth;
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Op(op)) => op,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            if op.precedence() < min_precedence {
                break;
            }
            self.bump();
            self.deeper()?;
            let rhs = self.binary(op.precedence() + 1)?;
            lhs = PluralExpr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        self.depth = entered;
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<PluralExpr> {
        match self.bump() {
            Some(Token::Not) => Ok(PluralExpr::Not(Box::new(self.nested(Self::unary)?))),
            Some(Token::Minus) => Ok(PluralExpr::Neg(Box::new(self.nested(Self::unary)?))),
            Some(Token::N) => Ok(PluralExpr::N),
            Some(Token::Num(value)) => Ok(PluralExpr::Const(value)),
            Some(Token::LParen) => {
                let inner = self.ternary()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            other => Err(VernacularError::InvalidPluralForms(format!(
                "expected operand, found {:?}",
                other
            ))),
        }
    }
}

/// A catalog's plural rule: number of forms plus the selecting expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralRule {
    nplurals: usize,
    expr: PluralExpr,
    source: String,
}

impl PluralRule {
    pub fn new(nplurals: usize, expr: &str) -> Result<Self> {
        if nplurals == 0 {
            return Err(VernacularError::InvalidPluralForms(
                "nplurals must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            nplurals,
            expr: PluralExpr::parse(expr)?,
            source: expr.trim().to_string(),
        })
    }

    /// Parse a `Plural-Forms` header value: `nplurals=N; plural=EXPR;`
    pub fn from_header(header: &str) -> Result<Self> {
        let mut nplurals = None;
        let mut plural = None;

        for part in header.split(';') {
            let Some((name, value)) = part.split_once('=') else {
                continue;
            };
            match name.trim() {
                "nplurals" => {
                    let count = value.trim().parse::<usize>().map_err(|e| {
                        VernacularError::InvalidPluralForms(format!(
                            "bad nplurals '{}': {}",
                            value.trim(),
                            e
                        ))
                    })?;
                    nplurals = Some(count);
                }
                "plural" => plural = Some(value.trim()),
                _ => {}
            }
        }

        match (nplurals, plural) {
            (Some(nplurals), Some(plural)) => Self::new(nplurals, plural),
            _ => Err(VernacularError::InvalidPluralForms(format!(
                "missing nplurals or plural in '{}'",
                header
            ))),
        }
    }

    pub fn nplurals(&self) -> usize {
        self.nplurals
    }

    /// Form index for a count, clamped to the declared number of forms
    pub fn index(&self, count: u64) -> usize {
        let raw = self.expr.evaluate(count);
        usize::try_from(raw)
            .unwrap_or(usize::MAX)
            .min(self.nplurals - 1)
    }
}

impl Default for PluralRule {
    /// Germanic rule: `nplurals=2; plural=(n != 1);`
    fn default() -> Self {
        Self {
            nplurals: 2,
            expr: PluralExpr::Binary(
                BinaryOp::Ne,
                Box::new(PluralExpr::N),
                Box::new(PluralExpr::Const(1)),
            ),
            source: "(n != 1)".to_string(),
        }
    }
}

impl fmt::Display for PluralRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "nplurals={}; plural={};", self.nplurals, self.source)
    }
}
