//! Output writers.
//!
//! - [`json`]: writes the record list to the JSON file served at `/articles`

pub mod json;
