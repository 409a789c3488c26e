use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use microflate::{inflate_to_vec, inflate_to_vec_bounded};

/// Fixture list for the on-disk decode tests, kept in
/// `tests/data/manifest.json`.
#[derive(Debug, Deserialize)]
struct Manifest {
    cases: Vec<FixtureCase>,
}

/// One compressed file and the raw bytes it must inflate to.
#[derive(Debug, Deserialize)]
struct FixtureCase {
    raw: String,
    deflate: String,
}

fn test_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
}

fn load_manifest() -> Manifest {
    let path = test_data_dir().join("manifest.json");
    let text = fs::read_to_string(&path).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn test_fixtures_inflate_to_their_raw_counterparts() {
    let dir = test_data_dir();
    let manifest = load_manifest();
    assert!(!manifest.cases.is_empty());

    for case in &manifest.cases {
        let compressed = fs::read(dir.join(&case.deflate)).unwrap();
        let raw = fs::read(dir.join(&case.raw)).unwrap();

        let inflated = inflate_to_vec(&compressed)
            .unwrap_or_else(|err| panic!("{} failed to inflate: {err}", case.deflate));
        assert_eq!(inflated, raw, "output mismatch for {}", case.deflate);
    }
}

#[test]
fn test_fixtures_inflate_within_their_exact_size() {
    let dir = test_data_dir();
    for case in &load_manifest().cases {
        let compressed = fs::read(dir.join(&case.deflate)).unwrap();
        let raw = fs::read(dir.join(&case.raw)).unwrap();

        let inflated = inflate_to_vec_bounded(&compressed, raw.len()).unwrap();
        assert_eq!(inflated.len(), raw.len());
    }
}
