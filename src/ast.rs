use std::fmt::Display;

// AST NODES

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Expression {
    Atom(String),
    /// A parenthesised list of expressions. An empty compound is the null expression.
    Compound(Vec<Expression>),
}

impl Expression {
    pub fn atom(text: impl Into<String>) -> Self {
        Self::Atom(text.into())
    }

    /// The text of an atom, or None for a compound.
    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Self::Atom(text) => Some(text),
            Self::Compound(_) => None,
        }
    }

    /// The children of a compound, or None for an atom.
    pub fn as_compound(&self) -> Option<&[Expression]> {
        match self {
            Self::Atom(_) => None,
            Self::Compound(children) => Some(children),
        }
    }
}

/// Compounds are torn down with an explicit stack, so dropping a deeply nested tree can't
/// overflow the call stack.
impl Drop for Expression {
    fn drop(&mut self) {
        if let Self::Compound(children) = self {
            let mut pending = std::mem::take(children);
            while let Some(mut child) = pending.pop() {
                if let Self::Compound(grandchildren) = &mut child {
                    pending.append(grandchildren);
                }
            }
        }
    }
}

enum Piece<'a> {
    Expr(&'a Expression),
    Text(&'static str),
}

/// Written as an s-expression. Like `drop`, this walks the tree with an explicit stack.
impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut pending = vec![Piece::Expr(self)];
        while let Some(piece) = pending.pop() {
            match piece {
                Piece::Text(text) => f.write_str(text)?,
                Piece::Expr(Self::Atom(text)) => f.write_str(text)?,
                Piece::Expr(Self::Compound(children)) => {
                    f.write_str("(")?;
                    pending.push(Piece::Text(")"));
                    for (i, child) in children.iter().enumerate().rev() {
                        pending.push(Piece::Expr(child));
                        if i > 0 {
                            pending.push(Piece::Text(" "));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

// NODE BUILDERS

/// A builder for a compound expression whose closing parenthesis hasn't been seen yet.
#[derive(Debug, Default)]
pub struct CompoundBuilder {
    terms: Vec<Expression>,
}

impl CompoundBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a child expression.
    pub fn take(&mut self, expr: Expression) {
        self.terms.push(expr);
    }

    /// Consume the builder and return the finished compound.
    pub fn finish(self) -> Expression {
        Expression::Compound(self.terms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_nested_compound() {
        let expr = Expression::Compound(vec![
            Expression::atom("+"),
            Expression::atom("1"),
            Expression::Compound(vec![
                Expression::atom("-"),
                Expression::atom("3"),
                Expression::atom("2"),
            ]),
        ]);
        assert_eq!(expr.to_string(), "(+ 1 (- 3 2))");
    }

    #[test]
    fn display_null() {
        assert_eq!(Expression::Compound(Vec::new()).to_string(), "()");
    }

    fn nested_nulls(depth: usize) -> Expression {
        let mut expr = Expression::Compound(Vec::new());
        for _ in 0..depth {
            expr = Expression::Compound(vec![expr]);
        }
        expr
    }

    #[test]
    fn display_atoms_between_compounds() {
        let expr = Expression::Compound(vec![
            Expression::Compound(vec![Expression::atom("a")]),
            Expression::atom("b"),
            Expression::Compound(Vec::new()),
        ]);
        assert_eq!(expr.to_string(), "((a) b ())");
    }

    #[test]
    fn display_very_deep_tree() {
        let text = nested_nulls(100_000).to_string();
        assert_eq!(text.len(), 200_002);
        assert!(text.starts_with("(((") && text.ends_with(")))"));
    }

    #[test]
    fn drop_very_deep_tree() {
        let expr = nested_nulls(100_000);
        let shallow = Expression::Compound(vec![nested_nulls(3)]);
        drop(expr);
        assert_eq!(shallow.to_string(), "((((()))))");
    }

    #[test]
    fn builder_keeps_term_order() {
        let mut builder = CompoundBuilder::new();
        builder.take(Expression::atom("f"));
        builder.take(Expression::atom("x"));
        assert_eq!(
            builder.finish(),
            Expression::Compound(vec![Expression::atom("f"), Expression::atom("x")])
        );
    }

    #[test]
    fn accessors() {
        let atom = Expression::atom("x");
        assert_eq!(atom.as_atom(), Some("x"));
        assert!(atom.as_compound().is_none());

        let compound = Expression::Compound(vec![atom.clone()]);
        assert!(compound.as_atom().is_none());
        assert_eq!(compound.as_compound(), Some(&[atom][..]));
    }
}
