//! A CSS minification stage for asset build pipelines.
//!
//! A [`Transform`] takes a [`File`] carrying CSS and an optional source map,
//! minifies it with [`lightningcss`], and returns the file with minified
//! contents and, if requested, a source map composed with the input map.
//!
//! ```
//! use csspipe::{csso, config::Settings, File};
//!
//! let settings = Settings {
//!     restructure: false,
//!     ..Default::default()
//! };
//!
//! let file = File::new("/project/main.css")
//!     .with_contents("h1 { color: yellow; } \n h1 { font-size: 2em; }");
//!
//! let file = csso(settings).transform(file)?.unwrap();
//!
//! assert_eq!(file.contents_str(), Some("h1{color:#ff0}h1{font-size:2em}"));
//! # Ok::<(), csspipe::Error>(())
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod file;
pub mod transform;
pub mod util;

pub use config::Options;
pub use error::Error;
pub use file::{Contents, File};
pub use transform::{csso, Transform};
pub use util::source_map::{Position, SourceMap};
