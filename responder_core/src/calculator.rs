//! Arithmetic evaluator for calculator queries
//!
//! A small recursive-descent parser over numeric literals, unary `+`/`-`,
//! the binary operators `+ - * / %` and parentheses. Nothing else is
//! accepted, so no general-purpose evaluator is ever involved.
//!
//! Grammar:
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | '%') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := number | '(' expr ')'
//! ```

use std::fmt;
use thiserror::Error;

const MAX_DEPTH: usize = 200;

/// Why an expression could not be evaluated. The messages are shown to the
/// user verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    #[error("Invalid characters in expression")]
    InvalidCharacters,
    #[error("Division by zero is not allowed")]
    DivisionByZero,
    #[error("Invalid expression")]
    InvalidExpression,
}

/// Result of an evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Number::Int(i) => i == 0,
            Number::Float(f) => f == 0.0,
        }
    }

    /// Report floats without a fractional part as integers.
    fn integral(self) -> Self {
        match self {
            Number::Float(f)
                if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 =>
            {
                Number::Int(f as i64)
            }
            other => other,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Float(v) => write!(f, "{}", v),
        }
    }
}

/// Evaluate an arithmetic expression such as `"2 + 3 * (4 - 1)"`.
///
/// Whitespace is ignored. `/` always divides exactly; `%` takes the sign of
/// the divisor.
pub fn evaluate(expr: &str) -> Result<Number, CalcError> {
    let chars: Vec<char> = expr.chars().filter(|c| !c.is_whitespace()).collect();

    if chars.is_empty() || !chars.iter().all(|c| is_allowed(*c)) {
        return Err(CalcError::InvalidCharacters);
    }

    let mut parser = Parser { chars, pos: 0 };
    let value = parser.expr(0)?;
    if parser.pos != parser.chars.len() {
        return Err(CalcError::InvalidExpression);
    }

    Ok(value.integral())
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_digit() || "+-*/%.()".contains(c)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn expr(&mut self, depth: usize) -> Result<Number, CalcError> {
        let mut acc = self.term(depth)?;
        while let Some(op @ ('+' | '-')) = self.peek() {
            self.pos += 1;
            let rhs = self.term(depth)?;
            acc = if op == '+' { add(acc, rhs) } else { sub(acc, rhs) };
        }
        Ok(acc)
    }

    fn term(&mut self, depth: usize) -> Result<Number, CalcError> {
        let mut acc = self.unary(depth)?;
        while let Some(op @ ('*' | '/' | '%')) = self.peek() {
            self.pos += 1;
            let rhs = self.unary(depth)?;
            acc = match op {
                '*' => mul(acc, rhs),
                '/' => div(acc, rhs)?,
                _ => rem(acc, rhs)?,
            };
        }
        Ok(acc)
    }

    fn unary(&mut self, depth: usize) -> Result<Number, CalcError> {
        if depth > MAX_DEPTH {
            return Err(CalcError::InvalidExpression);
        }
        match self.peek() {
            Some('+') => {
                self.pos += 1;
                self.unary(depth + 1)
            }
            Some('-') => {
                self.pos += 1;
                Ok(neg(self.unary(depth + 1)?))
            }
            _ => self.primary(depth),
        }
    }

    fn primary(&mut self, depth: usize) -> Result<Number, CalcError> {
        match self.peek() {
            Some('(') => {
                self.pos += 1;
                let value = self.expr(depth + 1)?;
                if self.peek() != Some(')') {
                    return Err(CalcError::InvalidExpression);
                }
                self.pos += 1;
                Ok(value)
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            _ => Err(CalcError::InvalidExpression),
        }
    }

    fn number(&mut self) -> Result<Number, CalcError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        let mut is_float = false;
        if self.peek() == Some('.') {
            is_float = true;
            self.pos += 1;
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.pos += 1;
            }
        }

        let literal: String = self.chars[start..self.pos].iter().collect();
        if literal == "." {
            return Err(CalcError::InvalidExpression);
        }
        // Integers may not have leading zeros, except for zero itself
        if !is_float && literal.starts_with('0') && literal.bytes().any(|c| c != b'0') {
            return Err(CalcError::InvalidExpression);
        }

        if !is_float {
            if let Ok(i) = literal.parse::<i64>() {
                return Ok(Number::Int(i));
            }
        }
        literal
            .parse::<f64>()
            .map(Number::Float)
            .map_err(|_| CalcError::InvalidExpression)
    }
}

fn add(a: Number, b: Number) -> Number {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => x
            .checked_add(y)
            .map_or(Number::Float(x as f64 + y as f64), Number::Int),
        _ => Number::Float(a.as_f64() + b.as_f64()),
    }
}

fn sub(a: Number, b: Number) -> Number {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => x
            .checked_sub(y)
            .map_or(Number::Float(x as f64 - y as f64), Number::Int),
        _ => Number::Float(a.as_f64() - b.as_f64()),
    }
}

fn mul(a: Number, b: Number) -> Number {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => x
            .checked_mul(y)
            .map_or(Number::Float(x as f64 * y as f64), Number::Int),
        _ => Number::Float(a.as_f64() * b.as_f64()),
    }
}

fn div(a: Number, b: Number) -> Result<Number, CalcError> {
    if b.is_zero() {
        return Err(CalcError::DivisionByZero);
    }
    Ok(Number::Float(a.as_f64() / b.as_f64()))
}

fn rem(a: Number, b: Number) -> Result<Number, CalcError> {
    if b.is_zero() {
        return Err(CalcError::DivisionByZero);
    }
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => {
            let r = x.wrapping_rem(y);
            if r != 0 && (r < 0) != (y < 0) {
                Ok(Number::Int(r + y))
            } else {
                Ok(Number::Int(r))
            }
        }
        _ => {
            let (x, y) = (a.as_f64(), b.as_f64());
            let r = x % y;
            if r != 0.0 && (r < 0.0) != (y < 0.0) {
                Ok(Number::Float(r + y))
            } else {
                Ok(Number::Float(r))
            }
        }
    }
}

fn neg(a: Number) -> Number {
    match a {
        Number::Int(x) => x.checked_neg().map_or(Number::Float(-(x as f64)), Number::Int),
        Number::Float(f) => Number::Float(-f),
    }
}
