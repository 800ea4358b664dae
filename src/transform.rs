//! Minify CSS files.
//!
//! This module wires [`minify_css`] into a pipeline stage.

use tracing::{debug, trace};

use crate::{
    config::Options,
    error::Error,
    file::{Contents, File},
    util::{
        minify::css::{minify_css, MinifyCssError, Minified},
        pipeline::{Receiver, Sender, Task},
    },
};

/// Create a stage that minifies CSS files.
///
/// # Example
///
/// ```
/// use csspipe::{csso, File};
///
/// let file = File::new("/project/main.css")
///     .with_contents("h1 { color: yellow; } \n h1 { font-size: 2em; }");
///
/// let file = csso(false).transform(file).unwrap().unwrap();
///
/// assert_eq!(file.contents_str(), Some("h1{color:#ff0;font-size:2em}"));
/// ```
pub fn csso(options: impl Into<Options>) -> Transform {
    Transform::new(options)
}

/// Stage that minifies CSS files.
#[derive(Clone, Debug, Default)]
pub struct Transform {
    options: Options,
}

impl Transform {
    /// Create a stage with given options.
    pub fn new(options: impl Into<Options>) -> Self {
        Self {
            options: options.into(),
        }
    }

    /// Options of the stage.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Minify one file.
    ///
    /// Files without contents are returned unchanged. Streaming contents are
    /// rejected. Otherwise the contents are replaced by the minified code and
    /// the source map is replaced by the composed map, or removed if source
    /// maps are disabled.
    pub fn transform(&self, mut file: File) -> Result<Option<File>, Error> {
        let bytes = match std::mem::take(&mut file.contents) {
            Contents::Null => {
                debug!(path = ?file.path, "Skipping file without contents");
                return Ok(Some(file));
            },
            Contents::Stream(_) => {
                return Err(Error::UnsupportedStreamingContent { path: file.path });
            },
            Contents::Buffer(bytes) => bytes,
        };

        let config = self.options.resolve(&file);

        trace!(?config, "Resolved configuration");

        let input = String::from_utf8(bytes).map_err(MinifyCssError::from)?;

        let input_map = file.source_map.as_ref().filter(|_| config.source_map);

        let Minified { code, map } = minify_css(input, &config, input_map)?;

        debug!(
            path = ?file.path,
            source_map = map.is_some(),
            composed = input_map.is_some(),
            "Minified CSS"
        );

        Ok(Some(File {
            contents: Contents::Buffer(code.into_bytes()),
            source_map: map,
            ..file
        }))
    }
}

impl Task<File, File, Error> for Transform {
    fn process(self, rx: Receiver<File>, tx: Sender<File>) -> Result<(), Error> {
        for file in rx {
            if let Some(file) = self.transform(file)? {
                if tx.send(file).is_err() {
                    break;
                }
            }
        }
        Ok(())
    }
}
