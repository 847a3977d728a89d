//! Token types consumed by the stack machine

use std::fmt;

use crate::error::{Error, NumberError, Result};

/// A lexical element of calculator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Raw numeric literal text, e.g. `1_000`, `-.5`, `1e-3`.
    Numeric(String),
    /// Operator symbol, e.g. `+` or `p`.
    Operator(String),
    /// Parenthesized unit, e.g. `(mg)` or `(1)`.
    Unit(String),
}

impl Token {
    pub fn numeric(literal: impl Into<String>) -> Self {
        Token::Numeric(literal.into())
    }

    pub fn operator(literal: impl Into<String>) -> Self {
        Token::Operator(literal.into())
    }

    pub fn unit(literal: impl Into<String>) -> Self {
        Token::Unit(literal.into())
    }

    pub fn literal(&self) -> &str {
        match self {
            Token::Numeric(s) | Token::Operator(s) | Token::Unit(s) => s,
        }
    }

    /// The identifier inside a unit token: `( mg )` → `mg`.
    pub fn unit_identifier(&self) -> Option<&str> {
        match self {
            Token::Unit(s) => {
                let s = s.strip_suffix(')').unwrap_or(s);
                let s = s.strip_prefix('(').unwrap_or(s);
                Some(s.trim())
            }
            _ => None,
        }
    }

    /// Numeric value of a [`Token::Numeric`]; other tokens yield `None`.
    pub fn to_f64(&self) -> Option<Result<f64>> {
        match self {
            Token::Numeric(s) => Some(parse_number(s)),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.literal())
    }
}

/// Parse a numeric literal.
///
/// `_` separators are ignored. An optional `e` exponent is an integer power of
/// ten applied to the mantissa.
pub fn parse_number(literal: &str) -> Result<f64> {
    let invalid = |reason| Error::InvalidNumber {
        literal: literal.to_string(),
        reason,
    };

    let cleaned = literal.replace('_', "");
    let mut parts = cleaned.splitn(3, 'e');
    let mantissa = parts.next().unwrap_or_default();
    let exponent = parts.next();
    if parts.next().is_some() {
        return Err(invalid(NumberError::MultipleExponents));
    }

    let exponent = match exponent {
        Some(e) => e
            .parse::<i32>()
            .map_err(|_| invalid(NumberError::InvalidExponent(e.to_string())))?,
        None => 0,
    };
    let mantissa = mantissa
        .parse::<f64>()
        .map_err(|_| invalid(NumberError::InvalidMantissa(mantissa.to_string())))?;

    Ok(10f64.powi(exponent) * mantissa)
}

/// Operators recognized by the stack machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    /// `p`: print the top without popping it.
    Peek,
    /// `n`: pop and print the top.
    PopPrint,
    /// `v`: square root.
    Sqrt,
    /// `f`: print the whole stack.
    PrintAll,
    /// `d`: duplicate the top.
    Duplicate,
    /// `r`: swap the top two.
    Swap,
    /// `c`: clear the stack.
    Clear,
}

impl Operator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "+" => Operator::Add,
            "-" => Operator::Subtract,
            "*" => Operator::Multiply,
            "/" => Operator::Divide,
            "p" => Operator::Peek,
            "n" => Operator::PopPrint,
            "v" => Operator::Sqrt,
            "f" => Operator::PrintAll,
            "d" => Operator::Duplicate,
            "r" => Operator::Swap,
            "c" => Operator::Clear,
            _ => return None,
        })
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Peek => "p",
            Operator::PopPrint => "n",
            Operator::Sqrt => "v",
            Operator::PrintAll => "f",
            Operator::Duplicate => "d",
            Operator::Swap => "r",
            Operator::Clear => "c",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-12 * b.abs().max(1.0)
    }

    #[test]
    fn parses_numeric_literals() {
        let cases = [
            ("1", 1.0),
            ("1.", 1.0),
            (".1", 0.1),
            ("0.1", 0.1),
            ("1_000_000", 1_000_000.0),
            ("-1", -1.0),
            ("-.1", -0.1),
            ("-.000_1", -0.0001),
            ("1e3", 1_000.0),
            ("1e-3", 0.001),
            ("+2.5e+2", 250.0),
        ];
        for (literal, expected) in cases {
            let got = parse_number(literal).unwrap();
            assert!(approx(got, expected), "{literal}: {got} != {expected}");
        }
    }

    #[test]
    fn rejects_malformed_literals() {
        assert!(matches!(
            parse_number("1e2e3"),
            Err(Error::InvalidNumber {
                reason: NumberError::MultipleExponents,
                ..
            })
        ));
        assert!(matches!(
            parse_number("1e1.5"),
            Err(Error::InvalidNumber {
                reason: NumberError::InvalidExponent(_),
                ..
            })
        ));
        assert!(matches!(
            parse_number("1..2"),
            Err(Error::InvalidNumber {
                reason: NumberError::InvalidMantissa(_),
                ..
            })
        ));
        assert_eq!(
            parse_number("._").unwrap_err().to_string(),
            "could not interpret numeric literal ._: base . is not valid"
        );
    }

    #[test]
    fn unit_identifier_strips_parentheses_and_space() {
        assert_eq!(Token::unit("(mg)").unit_identifier(), Some("mg"));
        assert_eq!(Token::unit("(\tmcg )").unit_identifier(), Some("mcg"));
        assert_eq!(Token::numeric("1").unit_identifier(), None);
    }

    #[test]
    fn operator_symbols_round_trip() {
        for symbol in ["+", "-", "*", "/", "p", "n", "v", "f", "d", "r", "c"] {
            let op = Operator::from_symbol(symbol).unwrap();
            assert_eq!(op.symbol(), symbol);
        }
        assert_eq!(Operator::from_symbol("b"), None);
    }
}
