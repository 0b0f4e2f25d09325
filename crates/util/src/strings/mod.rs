//! String utilities.
//!
//! Case helpers for turning property names into accessor names.

mod camelize;

pub use camelize::{camelize, lcfirst, ucfirst};
