//! Evaluator for option values written as small arithmetic expressions.
//!
//! Values like `2**5`, `1e-8`, `1_000` or `not False` are accepted wherever
//! an integer, float or boolean option is expected. Arithmetic follows the
//! usual scripting-language rules: `/` always yields a float, `//` floors,
//! `%` takes the sign of the divisor and `**` with a negative integer
//! exponent yields a float.

use std::fmt;

use logos::Logos;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
enum Token {
    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9]+)?", |lex| parse_float(lex.slice()))]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?", |lex| parse_float(lex.slice()))]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+", |lex| parse_float(lex.slice()))]
    Float(f64),

    #[regex(r"[0-9][0-9_]*", |lex| lex.slice().replace('_', "").parse::<i64>().ok())]
    Int(i64),

    #[token("True")]
    #[token("true")]
    True,

    #[token("False")]
    #[token("false")]
    False,

    #[token("not")]
    Not,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("**")]
    Power,

    #[token("/")]
    Slash,

    #[token("//")]
    FloorDiv,

    #[token("%")]
    Percent,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,
}

fn parse_float(slice: &str) -> Option<f64> {
    slice.replace('_', "").parse().ok()
}

/// A typed expression value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Value {
    /// Cast to an integer; floats truncate toward zero.
    pub fn to_int(self) -> Result<i64, String> {
        match self {
            Value::Int(i) => Ok(i),
            Value::Bool(b) => Ok(i64::from(b)),
            Value::Float(f) => {
                let t = f.trunc();
                if t >= i64::MIN as f64 && t < i64::MAX as f64 {
                    Ok(t as i64)
                } else {
                    Err(format!("{f} does not fit in an integer"))
                }
            }
        }
    }

    pub fn to_float(self) -> f64 {
        match self {
            Value::Int(i) => i as f64,
            Value::Float(f) => f,
            Value::Bool(b) => f64::from(u8::from(b)),
        }
    }

    /// Truthiness: any non-zero number is `true`.
    pub fn to_bool(self) -> bool {
        match self {
            Value::Int(i) => i != 0,
            Value::Float(f) => f != 0.0,
            Value::Bool(b) => b,
        }
    }

    /// Booleans take part in arithmetic as 0 and 1.
    fn numeric(self) -> Value {
        match self {
            Value::Bool(b) => Value::Int(i64::from(b)),
            other => other,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

/// Evaluate `source` to a value.
///
/// Errors describe what went wrong; callers attach the option name.
pub fn evaluate(source: &str) -> Result<Value, String> {
    let tokens = Token::lexer(source)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|()| format!("invalid syntax in '{source}'"))?;

    let mut parser = Evaluator { tokens, pos: 0 };
    let value = parser.not_expr()?;
    if parser.pos < parser.tokens.len() {
        return Err(format!("unexpected trailing input in '{source}'"));
    }
    match value {
        Value::Float(f) if !f.is_finite() => Err(format!("{f} is not a finite number")),
        other => Ok(other),
    }
}

struct Evaluator {
    tokens: Vec<Token>,
    pos: usize,
}

impl Evaluator {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn consume(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn not_expr(&mut self) -> Result<Value, String> {
        if self.consume(&Token::Not) {
            return Ok(Value::Bool(!self.not_expr()?.to_bool()));
        }
        self.sum()
    }

    fn sum(&mut self) -> Result<Value, String> {
        let mut left = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.term()?;
            left = apply(op, left, right)?;
        }
    }

    fn term(&mut self) -> Result<Value, String> {
        let mut left = self.factor()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                Some(Token::FloorDiv) => BinOp::FloorDiv,
                Some(Token::Percent) => BinOp::Mod,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.factor()?;
            left = apply(op, left, right)?;
        }
    }

    /// Unary sign binds looser than `**`: `-2**2` is `-4`.
    fn factor(&mut self) -> Result<Value, String> {
        if self.consume(&Token::Minus) {
            let operand = self.factor()?;
            return apply(BinOp::Sub, Value::Int(0), operand);
        }
        if self.consume(&Token::Plus) {
            return Ok(self.factor()?.numeric());
        }
        self.power()
    }

    /// `**` is right-associative and its exponent may carry a sign.
    fn power(&mut self) -> Result<Value, String> {
        let base = self.atom()?;
        if self.consume(&Token::Power) {
            let exponent = self.factor()?;
            return apply(BinOp::Pow, base, exponent);
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Value, String> {
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| "unexpected end of expression".to_string())?;
        self.pos += 1;
        match token {
            Token::Int(i) => Ok(Value::Int(i)),
            Token::Float(f) => Ok(Value::Float(f)),
            Token::True => Ok(Value::Bool(true)),
            Token::False => Ok(Value::Bool(false)),
            Token::LParen => {
                let value = self.not_expr()?;
                if self.consume(&Token::RParen) {
                    Ok(value)
                } else {
                    Err("missing ')'".into())
                }
            }
            other => Err(format!("unexpected {other:?}")),
        }
    }
}

fn apply(op: BinOp, left: Value, right: Value) -> Result<Value, String> {
    match (left.numeric(), right.numeric()) {
        (Value::Int(a), Value::Int(b)) => apply_int(op, a, b),
        (a, b) => apply_float(op, a.to_float(), b.to_float()),
    }
}

fn apply_int(op: BinOp, a: i64, b: i64) -> Result<Value, String> {
    let overflow = || "integer overflow".to_string();
    let zero = || "division by zero".to_string();
    let value = match op {
        BinOp::Add => a.checked_add(b).ok_or_else(overflow)?,
        BinOp::Sub => a.checked_sub(b).ok_or_else(overflow)?,
        BinOp::Mul => a.checked_mul(b).ok_or_else(overflow)?,
        BinOp::Div => {
            if b == 0 {
                return Err(zero());
            }
            return Ok(Value::Float(a as f64 / b as f64));
        }
        BinOp::FloorDiv => {
            if b == 0 {
                return Err(zero());
            }
            let q = a.checked_div(b).ok_or_else(overflow)?;
            if (a % b != 0) && ((a < 0) != (b < 0)) {
                q - 1
            } else {
                q
            }
        }
        BinOp::Mod => {
            if b == 0 {
                return Err(zero());
            }
            let r = a.checked_rem(b).ok_or_else(overflow)?;
            if r != 0 && ((r < 0) != (b < 0)) { r + b } else { r }
        }
        BinOp::Pow => {
            if b < 0 {
                return apply_float(op, a as f64, b as f64);
            }
            let exp = u32::try_from(b).map_err(|_| overflow())?;
            a.checked_pow(exp).ok_or_else(overflow)?
        }
    };
    Ok(Value::Int(value))
}

fn apply_float(op: BinOp, a: f64, b: f64) -> Result<Value, String> {
    let needs_divisor = matches!(op, BinOp::Div | BinOp::FloorDiv | BinOp::Mod);
    if needs_divisor && b == 0.0 {
        return Err("division by zero".into());
    }
    let value = match op {
        BinOp::Add => a + b,
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        BinOp::Div => a / b,
        BinOp::FloorDiv => (a / b).floor(),
        BinOp::Mod => a - b * (a / b).floor(),
        BinOp::Pow => {
            if a == 0.0 && b < 0.0 {
                return Err("zero cannot be raised to a negative power".into());
            }
            a.powf(b)
        }
    };
    if value.is_finite() {
        Ok(Value::Float(value))
    } else {
        Err(format!("{value} is not a finite number"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn eval(s: &str) -> Value {
        evaluate(s).unwrap()
    }

    #[test]
    fn test_literals() {
        assert_eq!(eval("32"), Value::Int(32));
        assert_eq!(eval("1_000"), Value::Int(1000));
        assert_eq!(eval("1e-8"), Value::Float(1e-8));
        assert_eq!(eval("2.5"), Value::Float(2.5));
        assert_eq!(eval(".5"), Value::Float(0.5));
        assert_eq!(eval("True"), Value::Bool(true));
        assert_eq!(eval("false"), Value::Bool(false));
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval("2 + 3 * 4"), Value::Int(14));
        assert_eq!(eval("(2 + 3) * 4"), Value::Int(20));
        assert_eq!(eval("2**10"), Value::Int(1024));
        assert_eq!(eval("2**3**2"), Value::Int(512));
        assert_eq!(eval("-2**2"), Value::Int(-4));
        assert_eq!(eval("2**-1"), Value::Float(0.5));
    }

    #[test]
    fn test_division_rules() {
        assert_eq!(eval("7 / 2"), Value::Float(3.5));
        assert_eq!(eval("4 / 2"), Value::Float(2.0));
        assert_eq!(eval("7 // 2"), Value::Int(3));
        assert_eq!(eval("-7 // 2"), Value::Int(-4));
        assert_eq!(eval("-7 % 3"), Value::Int(2));
        assert_eq!(eval("7 % -3"), Value::Int(-2));
        assert_eq!(eval("7.5 // 2"), Value::Float(3.0));
    }

    #[test]
    fn test_booleans() {
        assert_eq!(eval("not True"), Value::Bool(false));
        assert_eq!(eval("not 0"), Value::Bool(true));
        assert_eq!(eval("True + True"), Value::Int(2));
        assert_eq!(eval("-True"), Value::Int(-1));
    }

    #[test]
    fn test_casts() {
        assert_eq!(Value::Float(2.9).to_int(), Ok(2));
        assert_eq!(Value::Float(-2.9).to_int(), Ok(-2));
        assert_eq!(Value::Bool(true).to_int(), Ok(1));
        assert!(Value::Float(1e300).to_int().is_err());
        assert!(Value::Float(0.1).to_bool());
        assert!(!Value::Int(0).to_bool());
        assert_eq!(Value::Bool(true).to_float(), 1.0);
    }

    #[test]
    fn test_errors() {
        assert!(evaluate("").is_err());
        assert!(evaluate("auto").is_err());
        assert!(evaluate("1 +").is_err());
        assert!(evaluate("(1").is_err());
        assert!(evaluate("1 2").is_err());
        assert!(evaluate("1 / 0").is_err());
        assert!(evaluate("1 // 0").is_err());
        assert!(evaluate("10.0 ** 400").is_err());
        assert!(evaluate("2 ** 64").is_err());
        assert!(evaluate("inf").is_err());
    }

    proptest! {
        #[test]
        fn prop_integer_literal_roundtrip(n in 0i64..1_000_000_000) {
            prop_assert_eq!(evaluate(&n.to_string()), Ok(Value::Int(n)));
        }

        #[test]
        fn prop_floor_div_mod_identity(a in -1000i64..1000, b in 1i64..50) {
            let q = evaluate(&format!("{a} // {b}")).unwrap().to_int().unwrap();
            let r = evaluate(&format!("{a} % {b}")).unwrap().to_int().unwrap();
            prop_assert_eq!(q * b + r, a);
            prop_assert!((0..b).contains(&r));
        }
    }
}
