//! Search-path configuration supplied by the build orchestrator.

use std::path::PathBuf;

/// The ordered include search roots for one compiler invocation.
///
/// Quoted includes search `quote_roots` before `system_roots` (after the
/// including file's own directory); angle-bracket includes search the same
/// two lists but skip the including file's directory. The configuration is
/// immutable for the duration of one graph build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPaths {
    /// Roots for quoted includes, in search order (`-iquote`, `-I`).
    pub quote_roots: Vec<PathBuf>,
    /// Roots for system includes, in search order (`-isystem`).
    pub system_roots: Vec<PathBuf>,
}

impl SearchPaths {
    /// Creates a configuration from ordered root lists.
    pub fn new(quote_roots: Vec<PathBuf>, system_roots: Vec<PathBuf>) -> Self {
        Self {
            quote_roots,
            system_roots,
        }
    }

    /// Iterates all roots in the order an angle-bracket include searches.
    pub fn angle_order(&self) -> impl Iterator<Item = &PathBuf> {
        self.quote_roots.iter().chain(self.system_roots.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_order_quote_roots_first() {
        let sp = SearchPaths::new(
            vec![PathBuf::from("/a"), PathBuf::from("/b")],
            vec![PathBuf::from("/sys")],
        );
        let order: Vec<_> = sp.angle_order().collect();
        assert_eq!(
            order,
            vec![
                &PathBuf::from("/a"),
                &PathBuf::from("/b"),
                &PathBuf::from("/sys")
            ]
        );
    }

    #[test]
    fn default_is_empty() {
        let sp = SearchPaths::default();
        assert_eq!(sp.angle_order().count(), 0);
    }
}
