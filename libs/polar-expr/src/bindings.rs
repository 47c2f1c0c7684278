//! # Bindings
//!
//! Variable values for evaluation. Names are case-insensitive and stored in
//! lowercase, matching how the compiler records variables.
//!
//! ## Example
//!
//! ```rust
//! use polar_expr::{compile, Bindings};
//!
//! let expr = compile("x*x + Y").unwrap();
//! let mut env = Bindings::new();
//! env.bind("X", 3.0).bind("y", 1.0);
//! assert_eq!(expr.eval(&env).unwrap(), 10.0);
//! ```

use crate::builtins::canonical_name;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Case-insensitive variable environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bindings {
    values: BTreeMap<String, f64>,
}

impl Bindings {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind or rebind a variable.
    pub fn bind(&mut self, name: &str, value: f64) -> &mut Self {
        self.values.insert(canonical_name(name), value);
        self
    }

    /// Builder form of [`Bindings::bind`].
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.bind(name, value);
        self
    }

    /// Value bound to `name`.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(&canonical_name(name)).copied()
    }

    /// Lookup for names already in canonical form, falling back to a
    /// case-insensitive lookup.
    pub(crate) fn lookup(&self, name: &str) -> Option<f64> {
        match self.values.get(name) {
            Some(value) => Some(*value),
            None => self.get(name),
        }
    }

    /// Remove a binding, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<f64> {
        self.values.remove(&canonical_name(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(&canonical_name(name))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bindings in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<S: AsRef<str>> FromIterator<(S, f64)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut bindings = Self::new();
        bindings.extend(iter);
        bindings
    }
}

impl<S: AsRef<str>> Extend<(S, f64)> for Bindings {
    fn extend<I: IntoIterator<Item = (S, f64)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.bind(name.as_ref(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_case_insensitive() {
        let env = Bindings::new().with("Theta", 1.5);
        assert_eq!(env.get("THETA"), Some(1.5));
        assert!(env.contains("theta"));
    }

    #[test]
    fn test_rebind_overwrites() {
        let mut env = Bindings::new();
        env.bind("x", 1.0).bind("X", 2.0);
        assert_eq!(env.len(), 1);
        assert_eq!(env.get("x"), Some(2.0));
    }

    #[test]
    fn test_remove_and_collect() {
        let mut env: Bindings = [("a", 1.0), ("B", 2.0)].into_iter().collect();
        assert_eq!(env.remove("b"), Some(2.0));
        assert_eq!(env.remove("b"), None);
        let names: Vec<&str> = env.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a"]);
        assert!(!env.is_empty());
    }
}
