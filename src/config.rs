//! Run configuration, read from an optional YAML file.
//!
//! ```yaml
//! imports:
//!   - eg.music
//! extensions: [fit, txt]
//! music_catalog: catalogs/music.tsv
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::err_msg;
use crate::errors::FitError;
use crate::fixture::music::MusicLibrary;
use crate::fixture::FixtureRegistry;
use crate::naming::QualifiedName;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Namespaces searched for short fixture names, in order.
    pub imports: Vec<String>,
    /// File extensions treated as pages by test discovery.
    pub extensions: Vec<String>,
    /// Replaces the built-in music catalog.
    pub music_catalog: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            imports: Vec::new(),
            extensions: vec!["fit".to_string(), "txt".to_string()],
            music_catalog: None,
        }
    }
}

impl Config {
    pub fn from_yaml(text: &str) -> Result<Self, FitError> {
        let config: Config = serde_yaml::from_str(text)
            .map_err(|e| err_msg!(Config, "Invalid configuration: {}", e).with_cause(e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, FitError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            err_msg!(Io, "Failed to read config '{}'", path.display()).with_cause(e)
        })?;
        let mut config = Self::from_yaml(&text)?;
        // Catalog paths are relative to the config file.
        if let Some(dir) = path.parent() {
            config.music_catalog = config
                .music_catalog
                .take()
                .map(|c| if c.is_relative() { dir.join(c) } else { c });
        }
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Loads `path` if given, otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, FitError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Appends imports given on the command line after the configured ones.
    pub fn with_imports<I, S>(mut self, imports: I) -> Result<Self, FitError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imports.extend(imports.into_iter().map(Into::into));
        self.validate()?;
        Ok(self)
    }

    /// Fixture registry over the configured catalog.
    pub fn registry(&self) -> Result<FixtureRegistry, FitError> {
        match &self.music_catalog {
            Some(path) => FixtureRegistry::with_music_library(MusicLibrary::load(path)?),
            None => FixtureRegistry::with_builtin(),
        }
    }

    fn validate(&self) -> Result<(), FitError> {
        if let Some(bad) = self
            .imports
            .iter()
            .find(|ns| !QualifiedName::new(ns.as_str()).is_fully_qualified())
        {
            return Err(err_msg!(Config, "Import '{}' is not a dotted namespace", bad));
        }
        if self.extensions.is_empty() {
            return Err(err_msg!(Config, "At least one page extension is required"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_gives_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.extensions, vec!["fit", "txt"]);
    }

    #[test]
    fn reads_imports_and_extensions() {
        let config = Config::from_yaml("imports: [eg.music, eg.books]\nextensions: [page]\n").unwrap();
        assert_eq!(config.imports, vec!["eg.music", "eg.books"]);
        assert_eq!(config.extensions, vec!["page"]);
    }

    #[test]
    fn rejects_malformed_import() {
        let err = Config::from_yaml("imports: ['eg..music']").unwrap_err();
        assert!(err.message().contains("eg..music"));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(Config::from_yaml("import: [eg]").is_err());
    }

    #[test]
    fn command_line_imports_follow_configured_ones() {
        let config = Config::from_yaml("imports: [eg]")
            .unwrap()
            .with_imports(["eg.music"])
            .unwrap();
        assert_eq!(config.imports, vec!["eg", "eg.music"]);
        assert!(Config::default().with_imports(["bad name"]).is_err());
    }
}
