use std::{cell::RefCell, collections::HashMap, fmt::Write, rc::Rc};

use crate::value::Value;

#[derive(Debug)]
struct Scope {
    parent: Option<Environment>,
    bindings: RefCell<HashMap<String, Value>>,
}

/// A lexical scope and, through its parent, every scope enclosing it.
///
/// Scopes are shared: a closure keeps the scope it was created in alive for as long as the
/// closure itself is reachable. A scope is only written to while it is being set up by a
/// `let` or a function call, before anything is evaluated in it.
#[derive(Debug, Clone)]
pub struct Environment(Rc<Scope>);

impl Environment {
    pub fn create(parent: Option<&Environment>) -> Self {
        Self(Rc::new(Scope {
            parent: parent.cloned(),
            bindings: RefCell::new(HashMap::new()),
        }))
    }

    /// Bind a name in this scope only, replacing any existing binding here.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.0.bindings.borrow_mut().insert(name.into(), value);
    }

    /// Find the innermost binding of a name.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        let mut scope = Some(self);
        while let Some(env) = scope {
            if let Some(value) = env.0.bindings.borrow().get(name) {
                return Some(value.clone());
            }
            scope = env.0.parent.as_ref();
        }
        None
    }

    /// Render every scope from the innermost outwards, each one indented further than the last.
    pub fn dump(&self) -> String {
        let mut res = String::new();
        let mut indent = String::new();
        let mut scope = Some(self);

        while let Some(env) = scope {
            let bindings = env.0.bindings.borrow();
            let mut names: Vec<&String> = bindings.keys().collect();
            names.sort();
            for name in names {
                let _ = writeln!(res, "{indent}{name}: {}", bindings[name]);
            }
            indent.push_str("  ");
            scope = env.0.parent.as_ref();
        }

        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_missing() {
        let env = Environment::create(None);
        assert_eq!(env.lookup("x"), None);
    }

    #[test]
    fn define_then_lookup() {
        let env = Environment::create(None);
        env.define("x", Value::integer(1));
        assert_eq!(env.lookup("x"), Some(Value::integer(1)));
    }

    #[test]
    fn define_overwrites_locally() {
        let env = Environment::create(None);
        env.define("x", Value::integer(1));
        env.define("x", Value::integer(2));
        assert_eq!(env.lookup("x"), Some(Value::integer(2)));
    }

    #[test]
    fn lookup_walks_ancestors() {
        let root = Environment::create(None);
        root.define("x", Value::integer(1));
        let middle = Environment::create(Some(&root));
        middle.define("y", Value::integer(2));
        let leaf = Environment::create(Some(&middle));

        assert_eq!(leaf.lookup("x"), Some(Value::integer(1)));
        assert_eq!(leaf.lookup("y"), Some(Value::integer(2)));
        assert_eq!(leaf.lookup("z"), None);
    }

    #[test]
    fn child_shadows_parent_without_touching_it() {
        let root = Environment::create(None);
        root.define("x", Value::integer(1));
        let child = Environment::create(Some(&root));
        child.define("x", Value::Boolean(true));

        assert_eq!(child.lookup("x"), Some(Value::Boolean(true)));
        assert_eq!(root.lookup("x"), Some(Value::integer(1)));
    }

    #[test]
    fn parent_outlives_dropped_handle() {
        let child = {
            let root = Environment::create(None);
            root.define("x", Value::integer(7));
            Environment::create(Some(&root))
        };
        assert_eq!(child.lookup("x"), Some(Value::integer(7)));
    }

    #[test]
    fn dump_indents_each_level() {
        let root = Environment::create(None);
        root.define("b", Value::integer(2));
        root.define("a", Value::integer(1));
        let child = Environment::create(Some(&root));
        child.define("c", Value::Boolean(false));

        assert_eq!(child.dump(), "c: #f\n  a: 1\n  b: 2\n");
    }
}
