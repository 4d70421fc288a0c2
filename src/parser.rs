use thiserror::Error;
use tracing::debug;

use crate::ast::{CompoundBuilder, Expression};
use crate::tokeniser::Token;

/// Deepest compound nesting a program may use.
pub const MAX_NESTING: usize = 1000;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ParseError {
    #[error("unmatched close parenthesis at token {position}")]
    UnmatchedClose { position: usize },
    #[error("unclosed compound expression ({depth} still open at end of input)")]
    Unclosed { depth: usize },
    #[error("invalid token in sequence: \"{token}\" at token {position} follows a complete expression")]
    InvalidToken { token: Token, position: usize },
    #[error("empty program")]
    Empty,
    #[error("compound expressions nested deeper than {limit} at token {position}")]
    TooDeep { limit: usize, position: usize },
}

/// Attach a finished expression to the innermost open compound, or make it the root
/// if nothing has been parsed yet. A program is exactly one expression, so anything
/// arriving after the root is complete is an error.
fn attach(
    expr: Expression,
    builder_stack: &mut [CompoundBuilder],
    root_expr: &mut Option<Expression>,
    token: &Token,
    position: usize,
) -> Result<(), ParseError> {
    if let Some(top) = builder_stack.last_mut() {
        top.take(expr);
    } else if root_expr.is_none() {
        *root_expr = Some(expr);
    } else {
        return Err(ParseError::InvalidToken {
            token: token.clone(),
            position,
        });
    }
    Ok(())
}

/// Parse a token sequence into a single expression tree.
pub fn parse(tokens: &[Token]) -> Result<Expression, ParseError> {
    let mut builder_stack: Vec<CompoundBuilder> = Vec::new();
    let mut root_expr: Option<Expression> = None;

    for (position, token) in tokens.iter().enumerate() {
        match token {
            Token::LeftParen => {
                if builder_stack.is_empty() && root_expr.is_some() {
                    return Err(ParseError::InvalidToken {
                        token: token.clone(),
                        position,
                    });
                }
                if builder_stack.len() >= MAX_NESTING {
                    return Err(ParseError::TooDeep {
                        limit: MAX_NESTING,
                        position,
                    });
                }
                builder_stack.push(CompoundBuilder::new());
            }
            Token::RightParen => {
                let finished = builder_stack
                    .pop()
                    .ok_or(ParseError::UnmatchedClose { position })?
                    .finish();
                attach(finished, &mut builder_stack, &mut root_expr, token, position)?;
            }
            Token::Atom(text) => {
                attach(
                    Expression::Atom(text.clone()),
                    &mut builder_stack,
                    &mut root_expr,
                    token,
                    position,
                )?;
            }
        }
    }

    if !builder_stack.is_empty() {
        return Err(ParseError::Unclosed {
            depth: builder_stack.len(),
        });
    }

    let expr = root_expr.ok_or(ParseError::Empty)?;
    debug!(tokens = tokens.len(), %expr, "parsed program");
    Ok(expr)
}
