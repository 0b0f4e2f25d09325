//! JSON equality utilities.
//!
//! Order-sensitive, type-strict comparison of JSON values.

mod identical;

pub use identical::identical;
