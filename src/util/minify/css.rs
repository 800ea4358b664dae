//! Minify CSS code.
//!
//! This module uses [`lightningcss`] under the hood.

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use thiserror::Error;

use crate::{
    config::Config,
    util::source_map::{retain_used_sources, SourceMap, SourceMapError},
};

/// Root against which source paths are kept as given.
const PROJECT_ROOT: &str = "/";

/// List of errors for this module.
#[derive(Debug, Error)]
pub enum MinifyCssError {
    /// Minifier error.
    #[error("{0}")]
    Minify(String),
    /// Parser error.
    #[error("{0}")]
    Parser(String),
    /// Printer error.
    #[error("{0}")]
    Printer(String),
    /// Source map error.
    #[error(transparent)]
    SourceMap(#[from] SourceMapError),
    /// Input is not valid UTF-8.
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Result of [`minify_css`].
#[derive(Debug)]
pub struct Minified {
    /// Minified CSS code.
    pub code: String,

    /// Source map, if requested.
    pub map: Option<SourceMap>,
}

/// Minify a CSS string.
///
/// Rules are merged only if `config.restructure` is set. When
/// `config.source_map` is set, the returned map points from the minified code
/// to `config.filename`, or through `input_map` if one is given. A composed
/// map lists only the sources of `input_map` that are still referenced.
pub fn minify_css(
    input: impl AsRef<str>,
    config: &Config,
    input_map: Option<&SourceMap>,
) -> Result<Minified, MinifyCssError> {
    let input = input.as_ref();

    let parser_options = ParserOptions {
        filename: config.filename.clone(),
        ..Default::default()
    };

    let mut style_sheet = StyleSheet::parse(input, parser_options)
        .map_err(|source| MinifyCssError::Parser(source.to_string()))?;

    if config.restructure {
        let minify_options = MinifyOptions::default();

        style_sheet
            .minify(minify_options)
            .map_err(|source| MinifyCssError::Minify(source.to_string()))?;
    }

    let mut source_map = if config.source_map {
        let mut source_map = parcel_sourcemap::SourceMap::new(PROJECT_ROOT);
        source_map.add_source(&config.filename);
        source_map
            .set_source_content(0, input)
            .map_err(|source| SourceMapError::Encode(source.to_string()))?;
        Some(source_map)
    } else {
        None
    };

    let printer_options = PrinterOptions {
        minify: true,
        source_map: source_map.as_mut(),
        project_root: Some(PROJECT_ROOT),
        ..Default::default()
    };

    let result = style_sheet
        .to_css(printer_options)
        .map_err(|source| MinifyCssError::Printer(source.to_string()))?;

    let map = match source_map {
        Some(mut source_map) => {
            if let Some(input_map) = input_map {
                let mut input_map = input_map.to_parcel(PROJECT_ROOT)?;
                source_map
                    .extends(&mut input_map)
                    .map_err(|source| SourceMapError::Compose(source.to_string()))?;
                source_map = retain_used_sources(&source_map, PROJECT_ROOT)?;
            }
            Some(SourceMap::from_parcel(
                &mut source_map,
                Some(config.filename.clone()),
            )?)
        },
        None => None,
    };

    Ok(Minified {
        code: result.code,
        map,
    })
}
