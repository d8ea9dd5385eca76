//! Declared parameter lists of guarded functions

use std::fmt;

/// Name and ordered parameter names of a wrapped function
///
/// The first parameter is the primary input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    name: String,
    params: Vec<String>,
}

impl Signature {
    /// Declare a function `name(params...)`
    pub fn new<S: AsRef<str>>(name: &str, params: &[S]) -> Self {
        Self {
            name: name.to_owned(),
            params: params.iter().map(|p| p.as_ref().to_owned()).collect(),
        }
    }

    /// Function name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter names in declaration order
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Number of declared parameters
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether no parameter is declared
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Name of the primary (first) parameter
    pub fn primary(&self) -> Option<&str> {
        self.params.first().map(String::as_str)
    }

    /// Position of parameter `name`
    pub fn position(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p == name)
    }

    /// Whether `name` is a declared parameter
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.params.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature() {
        let sig = Signature::new("svd", &["X", "U", "S", "V"]);
        assert_eq!(sig.len(), 4);
        assert_eq!(sig.primary(), Some("X"));
        assert_eq!(sig.position("S"), Some(2));
        assert!(!sig.contains("Y"));
        assert_eq!(sig.to_string(), "svd(X, U, S, V)");
    }
}
