//! Rendering module for writing split outputs.

mod json;

pub use json::{to_json, JsonFormat};
