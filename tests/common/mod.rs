//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tablefit::engine::{PageReport, PageRunner};
use tablefit::fixture::FixtureRegistry;

pub fn manifest_dir() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR"))
}

/// Sample pages that are expected to pass.
pub fn pages_dir() -> PathBuf {
    manifest_dir().join("pages")
}

/// Pages written to fail in known ways.
pub fn failing_page(name: &str) -> PathBuf {
    manifest_dir().join("tests").join("pages").join(name)
}

pub fn registry() -> FixtureRegistry {
    FixtureRegistry::with_builtin().expect("built-in catalog parses")
}

pub fn run_page(source: &str) -> PageReport {
    let registry = registry();
    PageRunner::new(&registry)
        .run_source(source, "inline.fit")
        .expect("page parses")
}
