//! Mapping request paths onto the served root.
//!
//! - **`sanitize`**: string-level normalization and traversal rejection
//! - **`resolver`**: filesystem lookup, index substitution and containment checks
//! - **`error_page`**: custom `403.html` / `404.html` pages with generated fallbacks

pub mod error_page;
pub mod resolver;
pub mod sanitize;

pub use resolver::{DocumentRoot, ResolvedTarget, ServableFile, TargetKind};
pub use sanitize::{CleanPath, PathError, sanitize};
