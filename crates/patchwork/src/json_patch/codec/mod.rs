//! Operation codecs.

pub mod json;
