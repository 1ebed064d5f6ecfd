//! Include-directive scanner for C/C++-family source text.
//!
//! Extracts the ordered list of `#include`/`#import` directives from one
//! file's bytes. The scanner is deliberately shallow: it strips comments,
//! honours string literals, and records every textual directive without
//! evaluating conditional-compilation blocks. Collecting the conservative
//! superset of possible includes is the point; missing a dependency is
//! worse than recording one that a given configuration never uses.

#![warn(missing_docs)]

pub mod scanner;

pub use scanner::{scan_directives, IncludeDirective, IncludeKind};
