//! Minify code.

pub mod css;
