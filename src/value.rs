use std::{
    fmt::{Debug, Display},
    rc::Rc,
};

use crate::ast::Expression;
use crate::classifier::{FALSE_LITERAL, TRUE_LITERAL};
use crate::environment::Environment;

/// A number is an exact integer unless it was written with a fractional part.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    fn as_float(self) -> f64 {
        match self {
            Self::Integer(int) => int as f64,
            Self::Float(float) => float,
        }
    }

    /// Returns None if integer addition overflows.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a.checked_add(b).map(Self::Integer),
            (a, b) => Some(Self::Float(a.as_float() + b.as_float())),
        }
    }

    /// Returns None if integer subtraction overflows.
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a.checked_sub(b).map(Self::Integer),
            (a, b) => Some(Self::Float(a.as_float() - b.as_float())),
        }
    }

    /// Build a number from a run of ASCII decimal digits. Digit runs too wide for an i64 are
    /// approximated as a Float.
    pub fn from_digits(digits: &str) -> Self {
        match digits.parse::<i64>() {
            Ok(int) => Self::Integer(int),
            Err(_) => Self::Float(digits.bytes().fold(0.0, |total, digit| {
                total * 10.0 + f64::from(digit.saturating_sub(b'0'))
            })),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (a, b) => a.as_float() == b.as_float(),
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(int) => write!(f, "{int}"),
            Self::Float(float) => write!(f, "{float:?}"),
        }
    }
}

/// A closure: parameter names, an unevaluated body and the scope it was written in.
pub struct Function {
    pub params: Vec<String>,
    pub body: Expression,
    pub env: Environment,
}

impl Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("params", &self.params)
            .field("body", &self.body.to_string())
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Number(Number),
    Boolean(bool),
    Function(Rc<Function>),
}

impl Value {
    pub fn integer(int: i64) -> Self {
        Self::Number(Number::Integer(int))
    }

    /// Name of the value's kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Number(_) => "number",
            Self::Boolean(_) => "boolean",
            Self::Function(_) => "function",
        }
    }
}

/// Values of different kinds are never equal. Functions are only equal to themselves.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Number(num) => write!(f, "{num}"),
            Self::Boolean(true) => write!(f, "{TRUE_LITERAL}"),
            Self::Boolean(false) => write!(f, "{FALSE_LITERAL}"),
            Self::Function(func) => write!(f, "#<lambda ({})>", func.params.join(" ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_are_integers() {
        assert!(matches!(Number::from_digits("0"), Number::Integer(0)));
        assert!(matches!(Number::from_digits("42"), Number::Integer(42)));
        assert!(matches!(Number::from_digits("007"), Number::Integer(7)));
        assert!(matches!(
            Number::from_digits("9223372036854775807"),
            Number::Integer(i64::MAX)
        ));
    }

    #[test]
    fn wide_digits_are_floats() {
        assert!(matches!(
            Number::from_digits("9223372036854775808"),
            Number::Float(f) if (f / 9.223372036854775808e18 - 1.0).abs() < 1e-12
        ));
        assert!(matches!(
            Number::from_digits("123456789012345678901234567890"),
            Number::Float(f) if (f / 1.2345678901234568e29 - 1.0).abs() < 1e-12
        ));
    }

    #[test]
    fn integer_arithmetic_stays_exact() {
        assert_eq!(
            Number::Integer(2).checked_add(Number::Integer(3)),
            Some(Number::Integer(5))
        );
        assert_eq!(
            Number::Integer(0).checked_sub(Number::Integer(1)),
            Some(Number::Integer(-1))
        );
    }

    #[test]
    fn integer_overflow_is_reported() {
        assert_eq!(Number::Integer(i64::MAX).checked_add(Number::Integer(1)), None);
        assert_eq!(Number::Integer(i64::MIN).checked_sub(Number::Integer(1)), None);
    }

    #[test]
    fn mixed_arithmetic_is_float() {
        assert!(matches!(
            Number::Integer(1).checked_add(Number::Float(0.5)),
            Some(Number::Float(f)) if f == 1.5
        ));
    }

    #[test]
    fn equality_needs_same_kind() {
        assert_eq!(Value::integer(1), Value::integer(1));
        assert_ne!(Value::integer(1), Value::Boolean(true));
        assert_ne!(Value::Null, Value::Boolean(false));
        assert_eq!(Value::Null, Value::Null);
        assert_eq!(Value::Number(Number::Float(2.0)), Value::integer(2));
    }

    #[test]
    fn display_values() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::integer(-1).to_string(), "-1");
        assert_eq!(Value::Number(Number::Float(0.5)).to_string(), "0.5");
        assert_eq!(Value::Boolean(true).to_string(), "#t");
        assert_eq!(Value::Boolean(false).to_string(), "#f");
    }

    #[test]
    fn display_function() {
        let func = Value::Function(Rc::new(Function {
            params: vec!["x".to_string(), "y".to_string()],
            body: Expression::atom("x"),
            env: Environment::create(None),
        }));
        assert_eq!(func.to_string(), "#<lambda (x y)>");
        assert_eq!(func.kind(), "function");
        assert_eq!(func, func.clone());
    }
}
