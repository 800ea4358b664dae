//! Serializable source maps.
//!
//! This module uses [`parcel_sourcemap`] under the hood to decode, encode and
//! compose mappings. [`SourceMap`] is the plain record attached to a
//! [`File`](crate::File).

use std::collections::HashMap;

use parcel_sourcemap::OriginalLocation;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// List of errors for this module.
#[derive(Debug, Error)]
pub enum SourceMapError {
    /// Decoding error.
    #[error("{0}")]
    Decode(String),
    /// Encoding error.
    #[error("{0}")]
    Encode(String),
    /// Composition error.
    #[error("{0}")]
    Compose(String),
    /// JSON error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// A version 3 source map.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMap {
    /// Format version, always `3`.
    pub version: u8,

    /// Name of the generated file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Prefix prepended to each entry of `sources`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,

    /// Original sources.
    #[serde(default)]
    pub sources: Vec<String>,

    /// Contents of the original sources.
    ///
    /// `None` when a source has no embedded content.
    #[serde(default)]
    pub sources_content: Vec<Option<String>>,

    /// Symbol names.
    #[serde(default)]
    pub names: Vec<String>,

    /// Base64 VLQ mappings.
    pub mappings: String,
}

/// A position in an original source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    /// Source path, as listed in `sources`.
    pub source: String,

    /// Zero-based line.
    pub line: u32,

    /// Zero-based column.
    pub column: u32,
}

impl SourceMap {
    /// Parse a source map from a JSON string.
    pub fn from_json(input: impl AsRef<str>) -> Result<Self, SourceMapError> {
        Ok(serde_json::from_str(input.as_ref())?)
    }

    /// Serialize the source map into a JSON string.
    pub fn to_json(&self) -> Result<String, SourceMapError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Entries of `sources` prefixed with `source_root`.
    pub fn resolved_sources(&self) -> Vec<String> {
        let Some(root) = self.source_root.as_deref().filter(|root| !root.is_empty()) else {
            return self.sources.clone();
        };

        self.sources
            .iter()
            .map(|source| {
                if source.starts_with('/') || source.contains("://") {
                    source.clone()
                } else if root.ends_with('/') {
                    format!("{root}{source}")
                } else {
                    format!("{root}/{source}")
                }
            })
            .collect()
    }

    /// Decode into a [`parcel_sourcemap::SourceMap`] rooted at
    /// `project_root`.
    ///
    /// `source_root` is folded into `sources`, since parcel does not keep it.
    pub fn to_parcel(
        &self,
        project_root: impl AsRef<str>,
    ) -> Result<parcel_sourcemap::SourceMap, SourceMapError> {
        let resolved = Self {
            source_root: None,
            sources: self.resolved_sources(),
            ..self.clone()
        };

        let json = resolved.to_json()?;

        parcel_sourcemap::SourceMap::from_json(project_root.as_ref(), &json)
            .map_err(|source| SourceMapError::Decode(source.to_string()))
    }

    /// Encode a [`parcel_sourcemap::SourceMap`].
    ///
    /// `file` names the generated file the mappings point into.
    pub fn from_parcel(
        source_map: &mut parcel_sourcemap::SourceMap,
        file: Option<String>,
    ) -> Result<Self, SourceMapError> {
        let json = source_map
            .to_json(None)
            .map_err(|source| SourceMapError::Encode(source.to_string()))?;

        Ok(Self {
            file,
            ..Self::from_json(json)?
        })
    }

    /// Find the original position of a generated position.
    ///
    /// Returns the closest mapping at or before `column` on `line`.
    pub fn lookup(&self, line: u32, column: u32) -> Result<Option<Position>, SourceMapError> {
        let mut source_map = self.to_parcel("/")?;

        let Some(original) = source_map
            .find_closest_mapping(line, column)
            .and_then(|mapping| mapping.original)
        else {
            return Ok(None);
        };

        let source = source_map
            .get_source(original.source)
            .map_err(|source| SourceMapError::Decode(source.to_string()))?;

        Ok(Some(Position {
            source: source.to_owned(),
            line: original.original_line,
            column: original.original_column,
        }))
    }
}

/// Rebuild `source_map` keeping only the sources its mappings point to.
///
/// Composition appends the sources of the input map and leaves the
/// intermediate ones in place. Sources keep the order of first use.
pub fn retain_used_sources(
    source_map: &parcel_sourcemap::SourceMap,
    project_root: &str,
) -> Result<parcel_sourcemap::SourceMap, SourceMapError> {
    let mut result = parcel_sourcemap::SourceMap::new(project_root);
    let mut source_indexes: HashMap<u32, u32> = HashMap::new();

    for name in source_map.get_names() {
        result.add_name(name);
    }

    for mapping in source_map.get_mappings() {
        let original = match mapping.original {
            Some(original) => {
                let source = match source_indexes.get(&original.source) {
                    Some(index) => *index,
                    None => {
                        let path = source_map
                            .get_source(original.source)
                            .map_err(|source| SourceMapError::Compose(source.to_string()))?;
                        let index = result.add_source(path);

                        if let Ok(content) = source_map.get_source_content(original.source) {
                            result
                                .set_source_content(index as usize, content)
                                .map_err(|source| SourceMapError::Compose(source.to_string()))?;
                        }

                        source_indexes.insert(original.source, index);
                        index
                    },
                };

                Some(OriginalLocation::new(
                    original.original_line,
                    original.original_column,
                    source,
                    original.name,
                ))
            },
            None => None,
        };

        result.add_mapping(mapping.generated_line, mapping.generated_column, original);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::{retain_used_sources, Position, SourceMap};

    #[test]
    fn parse_camel_case() {
        const INPUT: &str = r#"{
            "version": 3,
            "file": "test.css",
            "sources": ["test.scss"],
            "sourcesContent": ["h1 { color: yellow; }"],
            "names": [],
            "mappings": "AAAA"
        }"#;

        let map = SourceMap::from_json(INPUT).unwrap();

        assert_eq!(map.version, 3);
        assert_eq!(map.file.as_deref(), Some("test.css"));
        assert_eq!(map.source_root, None);
        assert_eq!(map.sources, vec!["test.scss"]);
        assert_eq!(
            map.sources_content,
            vec![Some("h1 { color: yellow; }".to_owned())]
        );
        assert_eq!(map.mappings, "AAAA");
    }

    #[test]
    fn missing_lists_default_to_empty() {
        let map = SourceMap::from_json(r#"{"version":3,"mappings":""}"#).unwrap();

        assert!(map.sources.is_empty());
        assert!(map.sources_content.is_empty());
        assert!(map.names.is_empty());
    }

    #[test]
    fn null_sources_content() {
        const INPUT: &str = r#"{
            "version": 3,
            "sources": ["a.scss", "b.scss"],
            "sourcesContent": [null, "b {}"],
            "names": [],
            "mappings": "AAAA"
        }"#;

        let map = SourceMap::from_json(INPUT).unwrap();

        assert_eq!(map.sources_content, vec![None, Some("b {}".to_owned())]);
        assert!(map.to_parcel("/").is_ok());
    }

    #[test]
    fn serialize_skips_absent_fields() {
        let map = SourceMap {
            version: 3,
            mappings: "AAAA".to_owned(),
            ..Default::default()
        };

        let json = map.to_json().unwrap();

        assert!(!json.contains("\"file\""));
        assert!(!json.contains("sourceRoot"));
        assert!(json.contains("\"sourcesContent\":[]"));
    }

    #[test]
    fn resolved_sources() {
        const CASES: [(Option<&str>, &str, &str); 5] = [
            (None, "a.scss", "a.scss"),
            (Some(""), "a.scss", "a.scss"),
            (Some("src/"), "a.scss", "src/a.scss"),
            (Some("src"), "a.scss", "src/a.scss"),
            (Some("src/"), "/abs/a.scss", "/abs/a.scss"),
        ];

        for (source_root, source, expected) in CASES {
            let map = SourceMap {
                source_root: source_root.map(str::to_owned),
                sources: vec![source.to_owned()],
                ..Default::default()
            };
            let result = map.resolved_sources();
            assert_eq!(
                result,
                vec![expected],
                "\nresolved_sources({source_root:?}, {source:?}) expected {expected:?}"
            );
        }
    }

    #[test]
    fn parcel_keeps_sources() {
        let map = SourceMap {
            version: 3,
            sources: vec!["test.scss".to_owned()],
            sources_content: vec![Some("h1 { color: yellow; }".to_owned())],
            mappings: "AAAA".to_owned(),
            ..Default::default()
        };

        let mut parcel = map.to_parcel("/").unwrap();
        let result = SourceMap::from_parcel(&mut parcel, Some("test.css".to_owned())).unwrap();

        assert_eq!(result.file.as_deref(), Some("test.css"));
        assert_eq!(result.sources.len(), 1);
        assert!(result.sources[0].ends_with("test.scss"));
        assert_eq!(result.sources_content, map.sources_content);
        assert_eq!(result.mappings, "AAAA");
    }

    #[test]
    fn parcel_folds_source_root() {
        let map = SourceMap {
            version: 3,
            source_root: Some("src/".to_owned()),
            sources: vec!["a.scss".to_owned()],
            mappings: "AAAA".to_owned(),
            ..Default::default()
        };

        let mut parcel = map.to_parcel("/").unwrap();
        let result = SourceMap::from_parcel(&mut parcel, None).unwrap();

        assert_eq!(result.source_root, None);
        assert_eq!(result.sources.len(), 1);
        assert!(result.sources[0].ends_with("src/a.scss"));
    }

    #[test]
    fn lookup() {
        // Line 0 column 0 maps to a.scss 0:0, line 1 column 1 maps to
        // a.scss 3:2.
        let map = SourceMap {
            version: 3,
            sources: vec!["a.scss".to_owned()],
            mappings: "AAAA;CAGE".to_owned(),
            ..Default::default()
        };

        const CASES: [(u32, u32, u32, u32); 2] = [(0, 0, 0, 0), (1, 1, 3, 2)];

        for (line, column, expected_line, expected_column) in CASES {
            let Position {
                source,
                line: result_line,
                column: result_column,
            } = map.lookup(line, column).unwrap().unwrap();
            assert!(source.ends_with("a.scss"), "\nlookup({line}, {column}) source {source:?}");
            assert_eq!(
                (result_line, result_column),
                (expected_line, expected_column),
                "\nlookup({line}, {column}) expected {expected_line}:{expected_column}"
            );
        }

        assert_eq!(map.lookup(5, 0).unwrap(), None);
    }

    #[test]
    fn retain_drops_unused_sources() {
        // Only the second source is referenced: "ACAA".
        let map = SourceMap {
            version: 3,
            sources: vec!["unused.css".to_owned(), "used.scss".to_owned()],
            sources_content: vec![Some("unused".to_owned()), Some("used".to_owned())],
            mappings: "ACAA".to_owned(),
            ..Default::default()
        };

        let parcel = map.to_parcel("/").unwrap();
        let mut parcel = retain_used_sources(&parcel, "/").unwrap();
        let result = SourceMap::from_parcel(&mut parcel, None).unwrap();

        assert_eq!(result.sources.len(), 1);
        assert!(result.sources[0].ends_with("used.scss"));
        assert_eq!(result.sources_content, vec![Some("used".to_owned())]);
        assert_eq!(result.mappings, "AAAA");
    }

    #[test]
    fn invalid_json() {
        assert!(SourceMap::from_json("{").is_err());
    }
}
