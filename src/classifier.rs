use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::ast::Expression;

/// The syntactic category of an expression, decided before evaluation.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Category {
    Null,
    Number,
    BooleanTrue,
    BooleanFalse,
    Reference,
    Let,
    If,
    Lambda,
    Plus,
    Equals,
    Minus,
    Application,
}

pub const TRUE_LITERAL: &str = "#t";
pub const FALSE_LITERAL: &str = "#f";

lazy_static! {
    /// Reserved head keywords and the special forms they introduce.
    static ref SPECIAL_FORMS: HashMap<&'static str, Category> = HashMap::from([
        ("let", Category::Let),
        ("if", Category::If),
        ("lambda", Category::Lambda),
        ("+", Category::Plus),
        ("=", Category::Equals),
        ("-", Category::Minus),
    ]);
}

pub fn classify(expr: &Expression) -> Category {
    match expr {
        Expression::Compound(children) => match children.first() {
            None => Category::Null,
            Some(Expression::Compound(_)) => Category::Application,
            Some(Expression::Atom(head)) => SPECIAL_FORMS
                .get(head.as_str())
                .copied()
                .unwrap_or(Category::Application),
        },
        Expression::Atom(text) => {
            if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
                Category::Number
            } else if text == TRUE_LITERAL {
                Category::BooleanTrue
            } else if text == FALSE_LITERAL {
                Category::BooleanFalse
            } else {
                Category::Reference
            }
        }
    }
}
