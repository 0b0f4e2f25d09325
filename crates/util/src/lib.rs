//! patchwork-util - Utility functions for patchwork
//!
//! Property-name inflection used by accessor resolution and the canonical
//! JSON helpers used by the `test` operation.

pub mod canonical;
pub mod inflector;
pub mod json_equal;
pub mod obj_key_cmp;
pub mod strings;

// Re-exports for convenience
pub use canonical::{canonicalize, sort_keys};
pub use inflector::{EnglishInflector, Inflector};
pub use json_equal::identical;
pub use obj_key_cmp::obj_key_cmp;
pub use strings::{camelize, lcfirst, ucfirst};
