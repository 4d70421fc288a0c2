//! A small Lisp: `(let ...)`, `(if ...)`, `(lambda ...)`, `+`, `-` and `=` over numbers,
//! booleans and closures.
//!
//! ```
//! let value = microscheme::interpret("((lambda (x y) (+ x y)) 1 2)").unwrap();
//! assert_eq!(value.to_string(), "3");
//! ```

use thiserror::Error;
use tracing::debug;

pub mod ast;
pub mod classifier;
pub mod config;
pub mod environment;
pub mod interpreter;
pub mod parser;
pub mod tokeniser;
pub mod value;

pub use ast::Expression;
pub use config::Config;
pub use environment::Environment;
pub use interpreter::{EvalError, Evaluator, evaluate};
pub use parser::{ParseError, parse};
pub use tokeniser::{Token, tokenise};
pub use value::{Number, Value};

/// Why a call to [`interpret`] produced no value, with whatever was built before the failure.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{source}\n    tokens: {}", join_tokens(.tokens))]
    Parse {
        source: ParseError,
        tokens: Vec<Token>,
    },
    #[error("{source}\n    expression: {expression}")]
    Eval {
        source: EvalError,
        expression: Expression,
    },
}

fn join_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Tokenise, parse and evaluate a program in a fresh, empty environment.
pub fn interpret(source: &str) -> Result<Value, Error> {
    interpret_with(source, &Config::default())
}

pub fn interpret_with(source: &str, config: &Config) -> Result<Value, Error> {
    let tokens = tokenise(source);
    debug!(count = tokens.len(), "tokenised program");

    let expression = match parse(&tokens) {
        Ok(expression) => expression,
        Err(source) => return Err(Error::Parse { source, tokens }),
    };

    Evaluator::new(config)
        .evaluate(&expression, &Environment::create(None))
        .map_err(|source| Error::Eval { source, expression })
}
