//! Utility functions for serializable data.

pub(crate) mod json;
pub(crate) mod toml;
