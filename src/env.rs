use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::object::Object;

/// A lexical scope: name-to-value bindings plus an optional link to the
/// enclosing scope. Scopes are shared (closures keep their defining scope
/// alive), so they live behind `Rc<RefCell<..>>`.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    store: HashMap<String, Object>,
    outer: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment::default()
    }

    pub fn new_enclosed(outer: Rc<RefCell<Environment>>) -> Self {
        Environment {
            store: HashMap::new(),
            outer: Some(outer),
        }
    }

    /// Looks `name` up through the whole scope chain, innermost first.
    pub fn get(&self, name: &str) -> Option<Object> {
        match self.store.get(name) {
            Some(val) => Some(val.clone()),
            None => self
                .outer
                .as_ref()
                .and_then(|outer| outer.borrow().get(name)),
        }
    }

    /// Binds `name` in this scope only; an existing binding is replaced.
    pub fn set(&mut self, name: impl Into<String>, val: Object) {
        self.store.insert(name.into(), val);
    }
}
