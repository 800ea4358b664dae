//! Minification tests.

use assert_fs::prelude::*;
use csspipe::{config::Settings, csso, File, Position, SourceMap};
use predicates::prelude::*;

const BASE_STYLE: &str = "h1 { color: yellow; } \n h1 { font-size: 2em; }";

#[test]
fn read_minify_write() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;

    dir.child("css/test.css").write_str(BASE_STYLE)?;

    let file = File::read(dir.path(), dir.child("css/test.css").path())?;
    let file = csso(false).transform(file)?.ok_or("file was dropped")?;

    assert_eq!(file.relative(), std::path::Path::new("css/test.css"));

    dir.child("test.min.css")
        .write_str(file.contents_str().ok_or("no contents")?)?;

    dir.child("test.min.css")
        .assert(predicate::path::is_file())
        .assert(predicate::str::contains("h1{color:#ff0;font-size:2em}"));

    Ok(())
}

#[test]
fn compose_map_from_disk() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;

    dir.child("test.css").write_str(BASE_STYLE)?;
    dir.child("test.css.map").write_str(
        r#"
        {
            "version": 3,
            "file": "test.css",
            "sourceRoot": "styles/",
            "sources": ["test.scss"],
            "sourcesContent": [null],
            "names": [],
            "mappings": "AAAA;CAGA"
        }
        "#,
    )?;

    let input_map = SourceMap::from_json(std::fs::read_to_string(
        dir.child("test.css.map").path(),
    )?)?;

    let settings = Settings {
        restructure: false,
        source_map: true,
        ..Default::default()
    };

    let file = File::read(dir.path(), dir.child("test.css").path())?.with_source_map(input_map);
    let file = csso(settings).transform(file)?.ok_or("file was dropped")?;

    let map = file.source_map.ok_or("no source map")?;
    let json = map.to_json()?;

    assert!(predicate::str::contains("styles/test.scss").eval(&json));
    assert!(predicate::str::contains(r#""file":"test.css""#).eval(&json));
    assert_eq!(map.sources.len(), 1);

    let Position { source, line, .. } = map.lookup(0, 14)?.ok_or("no mapping")?;
    assert!(source.ends_with("styles/test.scss"));
    assert_eq!(line, 3);

    Ok(())
}

#[test]
fn malformed_css_propagates() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;

    dir.child("broken.css").write_str("..foo { color: red; }")?;

    let file = File::read(dir.path(), dir.child("broken.css").path())?;
    let result = csso(false).transform(file);

    assert!(matches!(result, Err(csspipe::Error::Minify(_))));

    Ok(())
}

#[test]
fn missing_file() {
    let result = File::read("/nonexistent", "/nonexistent/test.css");

    assert!(result.is_err());
}
