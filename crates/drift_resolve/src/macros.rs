//! The macro environment consulted during include-path substitution.

use std::collections::BTreeMap;

/// A mapping from macro name to its defined value for one build
/// configuration.
///
/// Passed explicitly into every resolution call so that parallel per-unit
/// builds share it read-only; there is no ambient global macro state. Only
/// object-like macros are modelled — just enough substitution to resolve
/// include-path literals written as macro references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacroEnv {
    defines: BTreeMap<String, String>,
}

impl MacroEnv {
    /// Creates an empty environment (no macros defined).
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines a macro, replacing any previous value.
    pub fn define(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.defines.insert(name.into(), value.into());
    }

    /// Removes a macro definition.
    pub fn undef(&mut self, name: &str) {
        self.defines.remove(name);
    }

    /// Looks up a macro's value; `None` means undefined.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.defines.get(name).map(String::as_str)
    }

    /// Returns `true` if the macro is defined.
    pub fn is_defined(&self, name: &str) -> bool {
        self.defines.contains_key(name)
    }
}

impl FromIterator<(String, String)> for MacroEnv {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            defines: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_and_lookup() {
        let mut env = MacroEnv::new();
        env.define("HEADER", "\"config.h\"");
        assert_eq!(env.lookup("HEADER"), Some("\"config.h\""));
        assert!(env.is_defined("HEADER"));
    }

    #[test]
    fn undefined_lookup_is_none() {
        let env = MacroEnv::new();
        assert_eq!(env.lookup("MISSING"), None);
        assert!(!env.is_defined("MISSING"));
    }

    #[test]
    fn redefine_replaces() {
        let mut env = MacroEnv::new();
        env.define("X", "\"a.h\"");
        env.define("X", "\"b.h\"");
        assert_eq!(env.lookup("X"), Some("\"b.h\""));
    }

    #[test]
    fn undef_removes() {
        let mut env = MacroEnv::new();
        env.define("X", "\"a.h\"");
        env.undef("X");
        assert_eq!(env.lookup("X"), None);
    }

    #[test]
    fn from_iterator() {
        let env: MacroEnv = [("A".to_string(), "1".to_string())].into_iter().collect();
        assert_eq!(env.lookup("A"), Some("1"));
    }
}
