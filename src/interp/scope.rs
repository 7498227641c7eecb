use std::collections::HashMap;

use super::value::Value;

/// Runtime mirror of the static scope chain: a stack of variable frames,
/// innermost last, plus the current receiver. Lookup and assignment fall
/// through the frames into the receiver's fields, so attribute reads and
/// writes inside a method body reach the instance itself.
#[derive(Debug)]
pub struct RuntimeEnv {
    scopes: Vec<HashMap<String, Value>>,
    receiver: Value,
}

impl RuntimeEnv {
    pub fn new(receiver: Value) -> Self {
        Self { scopes: vec![HashMap::new()], receiver }
    }

    pub fn receiver(&self) -> &Value {
        &self.receiver
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Introduce a binding in the innermost scope.
    pub fn bind(&mut self, name: &str, value: Value) {
        self.scopes.last_mut().unwrap().insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        for scope in self.scopes.iter().rev() {
            if let Some(value) = scope.get(name) {
                return Some(value.clone());
            }
        }
        if let Value::Object(obj) = &self.receiver {
            if let Some(value) = obj.borrow().fields.get(name) {
                return Some(value.clone());
            }
        }
        None
    }

    /// Store into the innermost scope that already binds `name`, falling
    /// through to the receiver's fields. Returns false if nothing binds it.
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        for scope in self.scopes.iter_mut().rev() {
            if let Some(slot) = scope.get_mut(name) {
                *slot = value;
                return true;
            }
        }
        if let Value::Object(obj) = &self.receiver {
            let mut obj = obj.borrow_mut();
            if let Some(slot) = obj.fields.get_mut(name) {
                *slot = value;
                return true;
            }
        }
        false
    }
}
