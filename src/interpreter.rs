use std::rc::Rc;

use thiserror::Error;
use tracing::trace;

use crate::ast::Expression;
use crate::classifier::{Category, classify};
use crate::config::Config;
use crate::environment::Environment;
use crate::value::{Function, Number, Value};

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum EvalError {
    #[error("unbound reference: {name}")]
    UnboundReference { name: String },
    #[error("function takes {expected} arguments, but {given} were provided")]
    ArityMismatch { expected: usize, given: usize },
    #[error("{form} expects a {expected}, not a {found}")]
    TypeMismatch {
        form: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("cannot apply a {found} as a function: {head}")]
    NotAFunction { head: String, found: &'static str },
    #[error("malformed {form} expression, {reason}: {expression}")]
    MalformedSpecialForm {
        form: &'static str,
        reason: &'static str,
        expression: String,
    },
    #[error("stack exhausted: evaluation nested deeper than {max_depth} levels")]
    StackExhausted { max_depth: usize },
    #[error("integer overflow in {form}")]
    Overflow { form: &'static str },
}

/// Stack left before evaluation moves onto a freshly allocated segment.
const RED_ZONE: usize = 64 * 1024;
/// Size of each extra stack segment.
const STACK_SEGMENT: usize = 1024 * 1024;

fn malformed(form: &'static str, reason: &'static str, expr: &Expression) -> EvalError {
    EvalError::MalformedSpecialForm {
        form,
        reason,
        expression: expr.to_string(),
    }
}

/// Children of a compound. Special forms and applications are always compounds, so an atom has none.
fn children(expr: &Expression) -> &[Expression] {
    expr.as_compound().unwrap_or_default()
}

/// Everything after the head keyword of a special form.
fn operands(expr: &Expression) -> &[Expression] {
    children(expr).get(1..).unwrap_or_default()
}

/// Evaluate an expression with the default configuration.
pub fn evaluate(expr: &Expression, env: &Environment) -> Result<Value, EvalError> {
    Evaluator::new(&Config::default()).evaluate(expr, env)
}

/// A recursive evaluator that keeps track of how deeply it is nested.
#[derive(Debug)]
pub struct Evaluator {
    max_depth: usize,
    depth: usize,
}

impl Evaluator {
    pub fn new(config: &Config) -> Self {
        Self {
            max_depth: config.max_depth,
            depth: 0,
        }
    }

    pub fn evaluate(&mut self, expr: &Expression, env: &Environment) -> Result<Value, EvalError> {
        if self.depth >= self.max_depth {
            return Err(EvalError::StackExhausted {
                max_depth: self.max_depth,
            });
        }
        self.depth += 1;
        let result = stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, || self.recurse(expr, env));
        self.depth -= 1;
        result
    }

    fn recurse(&mut self, expr: &Expression, env: &Environment) -> Result<Value, EvalError> {
        let category = classify(expr);
        trace!(?category, depth = self.depth, %expr, "evaluating");

        match category {
            Category::Null => Ok(Value::Null),
            Category::Number => Ok(Value::Number(Number::from_digits(
                expr.as_atom().unwrap_or_default(),
            ))),
            Category::BooleanTrue => Ok(Value::Boolean(true)),
            Category::BooleanFalse => Ok(Value::Boolean(false)),
            Category::Reference => {
                let name = expr.as_atom().unwrap_or_default();
                env.lookup(name).ok_or_else(|| {
                    trace!(name, scopes = %env.dump(), "unbound reference");
                    EvalError::UnboundReference {
                        name: name.to_string(),
                    }
                })
            }
            Category::Plus => self.plus(expr, env),
            Category::Minus => self.minus(expr, env),
            Category::Equals => self.equals(expr, env),
            Category::Let => self.binding(expr, env),
            Category::Lambda => lambda(expr, env),
            Category::If => self.condition(expr, env),
            Category::Application => self.application(expr, env),
        }
    }

    fn number_operand(
        &mut self,
        form: &'static str,
        operand: &Expression,
        env: &Environment,
    ) -> Result<Number, EvalError> {
        match self.evaluate(operand, env)? {
            Value::Number(num) => Ok(num),
            other => Err(EvalError::TypeMismatch {
                form,
                expected: "number",
                found: other.kind(),
            }),
        }
    }

    fn plus(&mut self, expr: &Expression, env: &Environment) -> Result<Value, EvalError> {
        let mut total = Number::Integer(0);
        for operand in operands(expr) {
            let num = self.number_operand("+", operand, env)?;
            total = total
                .checked_add(num)
                .ok_or(EvalError::Overflow { form: "+" })?;
        }
        Ok(Value::Number(total))
    }

    fn minus(&mut self, expr: &Expression, env: &Environment) -> Result<Value, EvalError> {
        let [_, first, second] = children(expr) else {
            return Err(malformed("-", "expected exactly two operands", expr));
        };
        let first_num = self.number_operand("-", first, env)?;
        let second_num = self.number_operand("-", second, env)?;
        first_num
            .checked_sub(second_num)
            .map(Value::Number)
            .ok_or(EvalError::Overflow { form: "-" })
    }

    /// True if every operand equals the first. Values of different kinds are never equal.
    fn equals(&mut self, expr: &Expression, env: &Environment) -> Result<Value, EvalError> {
        let values = operands(expr)
            .iter()
            .map(|operand| self.evaluate(operand, env))
            .collect::<Result<Vec<_>, _>>()?;

        let all_equal = match values.split_first() {
            Some((first, rest)) => rest.iter().all(|value| value == first),
            None => true,
        };
        Ok(Value::Boolean(all_equal))
    }

    /// Bindings are evaluated in the outer scope, so they can't see each other or themselves.
    fn binding(&mut self, expr: &Expression, env: &Environment) -> Result<Value, EvalError> {
        let [_, bindings, body] = children(expr) else {
            return Err(malformed("let", "expected a binding list and a body", expr));
        };
        let bindings = bindings
            .as_compound()
            .ok_or_else(|| malformed("let", "the binding list must be a list", expr))?;

        let mut pairs = Vec::with_capacity(bindings.len());
        for binding in bindings {
            match binding.as_compound() {
                Some([Expression::Atom(name), init]) => pairs.push((name, init)),
                _ => {
                    return Err(malformed(
                        "let",
                        "each binding must be a (name value) pair",
                        expr,
                    ));
                }
            }
        }

        let scope = Environment::create(Some(env));
        for (name, init) in pairs {
            scope.define(name.clone(), self.evaluate(init, env)?);
        }

        self.evaluate(body, &scope)
    }

    /// Only the chosen branch is evaluated.
    fn condition(&mut self, expr: &Expression, env: &Environment) -> Result<Value, EvalError> {
        let [_, predicate, yes, no] = children(expr) else {
            return Err(malformed(
                "if",
                "expected a predicate and two branches",
                expr,
            ));
        };

        match self.evaluate(predicate, env)? {
            Value::Boolean(true) => self.evaluate(yes, env),
            Value::Boolean(false) => self.evaluate(no, env),
            other => Err(EvalError::TypeMismatch {
                form: "if",
                expected: "boolean",
                found: other.kind(),
            }),
        }
    }

    /// Arguments are evaluated in the caller's scope, but the body runs in a new scope
    /// whose parent is the scope the function was written in.
    fn application(&mut self, expr: &Expression, env: &Environment) -> Result<Value, EvalError> {
        // Empty compounds are classified as null, so an application always has a head.
        let Some((head, args)) = children(expr).split_first() else {
            return Ok(Value::Null);
        };

        let func = match self.evaluate(head, env)? {
            Value::Function(func) => func,
            other => {
                return Err(EvalError::NotAFunction {
                    head: head.to_string(),
                    found: other.kind(),
                });
            }
        };

        if func.params.len() != args.len() {
            return Err(EvalError::ArityMismatch {
                expected: func.params.len(),
                given: args.len(),
            });
        }

        let arg_values = args
            .iter()
            .map(|arg| self.evaluate(arg, env))
            .collect::<Result<Vec<_>, _>>()?;

        let frame = Environment::create(Some(&func.env));
        for (param, value) in func.params.iter().zip(arg_values) {
            frame.define(param.clone(), value);
        }

        self.evaluate(&func.body, &frame)
    }
}

fn lambda(expr: &Expression, env: &Environment) -> Result<Value, EvalError> {
    let [_, params, body] = children(expr) else {
        return Err(malformed(
            "lambda",
            "expected a parameter list and a body",
            expr,
        ));
    };
    let params = params
        .as_compound()
        .ok_or_else(|| malformed("lambda", "the parameter list must be a list", expr))?
        .iter()
        .map(|param| param.as_atom().map(str::to_string))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| malformed("lambda", "parameters must be names", expr))?;

    Ok(Value::Function(Rc::new(Function {
        params,
        body: body.clone(),
        env: env.clone(),
    })))
}
