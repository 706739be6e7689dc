//! Row fixtures.
//!
//! A fixture adapts a domain collection to table checking. It is composed from
//! two small capabilities instead of inheriting from a framework base:
//!
//! - [`RowFixture::target_shape`] names the row type and its columns.
//! - [`RowFixture::query`] produces the actual rows, in order.
//!
//! Fixtures live in a [`FixtureRegistry`] under their fully qualified name.
//! Tables refer to them by that name or by a short name completed through
//! the page's imports.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::FitError;
use crate::naming::QualifiedName;
use crate::err_msg;

pub mod music;
pub mod row;

pub use row::{check_rows, CellOutcome, Counts, RowOutcome, TableReport};

/// One actual row. Renders a field as the text a table cell would hold.
pub trait RowObject {
    /// `column` is a name declared in the fixture's [`TargetShape`].
    fn field(&self, column: &str) -> Option<String>;
}

/// Name and columns of a fixture's row type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetShape {
    pub type_name: QualifiedName,
    pub columns: Vec<String>,
}

impl TargetShape {
    pub fn new<S: AsRef<str>>(type_name: impl Into<QualifiedName>, columns: &[S]) -> Self {
        Self {
            type_name: type_name.into(),
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
        }
    }

    /// Finds the declared column a header cell refers to.
    pub fn column(&self, header: &str) -> Option<&str> {
        let wanted = normalize_column(header);
        if wanted.is_empty() {
            return None;
        }
        self.columns
            .iter()
            .find(|c| normalize_column(c) == wanted)
            .map(String::as_str)
    }
}

/// Folds header spellings together: `track count`, `trackCount`,
/// `track_count` and `trackCount()` all become `trackcount`.
pub fn normalize_column(name: &str) -> String {
    let name = name.trim();
    let name = name.strip_suffix("()").unwrap_or(name);
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

pub trait RowFixture: Send + Sync {
    fn target_shape(&self) -> TargetShape;

    fn query(&self) -> Vec<Box<dyn RowObject>>;
}

/// Fixtures by fully qualified name.
#[derive(Clone, Default)]
pub struct FixtureRegistry {
    fixtures: BTreeMap<String, Arc<dyn RowFixture>>,
}

impl fmt::Debug for FixtureRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixtureRegistry")
            .field("fixtures", &self.names())
            .finish()
    }
}

impl FixtureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the example fixtures over the built-in music catalog.
    pub fn with_builtin() -> Result<Self, FitError> {
        Self::with_music_library(music::MusicLibrary::builtin()?)
    }

    /// Registry holding the example fixtures over the given catalog.
    pub fn with_music_library(library: music::MusicLibrary) -> Result<Self, FitError> {
        let mut registry = Self::new();
        registry.register(
            music::DISPLAY_FIXTURE,
            music::Display::new(Arc::new(library)),
        )?;
        Ok(registry)
    }

    pub fn register(
        &mut self,
        name: &str,
        fixture: impl RowFixture + 'static,
    ) -> Result<(), FitError> {
        let qualified = QualifiedName::new(name);
        if !qualified.is_fully_qualified() {
            return Err(err_msg!(
                Config,
                "Fixture name '{}' is not a dotted identifier",
                name
            ));
        }
        if self.fixtures.insert(name.to_string(), Arc::new(fixture)).is_some() {
            log::warn!("fixture {} registered twice; keeping the latest", name);
        }
        Ok(())
    }

    pub fn names(&self) -> Vec<&str> {
        self.fixtures.keys().map(String::as_str).collect()
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn RowFixture>> {
        self.fixtures.get(name).cloned()
    }

    /// Looks a fixture up by exact name, then under each import in order.
    /// Names that are not dotted identifiers are never completed.
    pub fn resolve(
        &self,
        name: &str,
        imports: &[String],
    ) -> Result<(QualifiedName, Arc<dyn RowFixture>), FitError> {
        let wanted = QualifiedName::new(name);
        if let Some(fixture) = self.get(name) {
            log::debug!("resolved fixture {}", name);
            return Ok((wanted, fixture));
        }

        if !wanted.is_fully_qualified() {
            return Err(err_msg!(Fixture, "Could not find fixture: {}.", wanted)
                .with_help("fixture names are dotted identifiers such as eg.music.Display"));
        }

        for namespace in imports {
            let candidate = format!("{}.{}", namespace, name);
            if let Some(fixture) = self.get(&candidate) {
                log::debug!("resolved fixture {} as {}", name, candidate);
                return Ok((QualifiedName::new(candidate), fixture));
            }
        }

        Err(self.no_such_fixture(&wanted))
    }

    fn no_such_fixture(&self, wanted: &QualifiedName) -> FitError {
        let similar: Vec<&str> = self
            .fixtures
            .keys()
            .filter(|k| QualifiedName::new(k.as_str()).short_name() == wanted.short_name())
            .map(String::as_str)
            .collect();
        let help = if !similar.is_empty() {
            format!(
                "did you mean {}? add its namespace with an import table",
                similar.join(", ")
            )
        } else if self.fixtures.is_empty() {
            "no fixtures are registered".to_string()
        } else {
            format!("registered fixtures: {}", self.names().join(", "))
        };
        err_msg!(Fixture, "Could not find fixture: {}.", wanted).with_help(help)
    }
}
