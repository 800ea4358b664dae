//! Utility functions and structures.

pub(crate) mod data;
pub mod minify;
pub mod pipeline;
pub mod source_map;
