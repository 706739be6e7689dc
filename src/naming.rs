//! Qualified fixture and type names.
//!
//! A qualified name is a dotted identifier such as `eg.music.Display`: a
//! namespace path followed by a short name. Decomposition is total. Every
//! input, including the empty string or one with stray dots, yields a defined
//! short name and namespace prefix. Callers that need a well-formed name must
//! check [`QualifiedName::is_fully_qualified`] before trusting the parts.

use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref FULLY_QUALIFIED: Regex =
        Regex::new(r"^([A-Za-z0-9_]+\.)*[A-Za-z0-9_]+$").expect("qualified name pattern is valid");
}

/// A dotted name split into its segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    original: String,
    segments: Vec<String>,
}

/// Serializable snapshot of every view a [`QualifiedName`] offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameParts {
    pub original: String,
    pub short_name: String,
    pub namespace: String,
    pub fully_qualified: bool,
}

impl QualifiedName {
    pub fn new(input: impl Into<String>) -> Self {
        let original = input.into();
        // `split` always yields at least one item, so segments is never empty.
        let segments = original.split('.').map(str::to_string).collect();
        Self { original, segments }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The last segment. Empty for an empty name or a trailing dot.
    pub fn short_name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Every segment but the last, rejoined with `.`.
    ///
    /// Empty segments are kept as they are, so for any name containing a dot
    /// `namespace_prefix() + "." + short_name()` rebuilds the original.
    pub fn namespace_prefix(&self) -> String {
        match self.segments.split_last() {
            Some((_, init)) => init.join("."),
            None => String::new(),
        }
    }

    /// Lexical check against the original text: one or more runs of
    /// `[A-Za-z0-9_]` separated by single dots.
    pub fn is_fully_qualified(&self) -> bool {
        FULLY_QUALIFIED.is_match(&self.original)
    }

    pub fn parts(&self) -> NameParts {
        NameParts {
            original: self.original.clone(),
            short_name: self.short_name().to_string(),
            namespace: self.namespace_prefix(),
            fully_qualified: self.is_fully_qualified(),
        }
    }
}

impl Display for QualifiedName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.original)
    }
}

impl From<&str> for QualifiedName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for QualifiedName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl FromStr for QualifiedName {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decomposes_dotted_type_name() {
        let name = QualifiedName::new("System.Text.StringBuilder");
        assert_eq!(name.short_name(), "StringBuilder");
        assert_eq!(name.namespace_prefix(), "System.Text");
        assert!(name.is_fully_qualified());
    }

    #[test]
    fn single_segment_has_empty_namespace() {
        let name = QualifiedName::new("Music");
        assert_eq!(name.short_name(), "Music");
        assert_eq!(name.namespace_prefix(), "");
        assert!(name.is_fully_qualified());
    }

    #[test]
    fn empty_input_is_total() {
        let name = QualifiedName::new("");
        assert_eq!(name.segments(), &[String::new()]);
        assert_eq!(name.short_name(), "");
        assert_eq!(name.namespace_prefix(), "");
        assert!(!name.is_fully_qualified());
    }

    #[test]
    fn stray_dots_are_preserved_literally() {
        let name = QualifiedName::new(".a..b.");
        assert_eq!(name.segments(), &["", "a", "", "b", ""]);
        assert_eq!(name.short_name(), "");
        assert_eq!(name.namespace_prefix(), ".a..b");
        assert!(!name.is_fully_qualified());
    }

    #[test]
    fn fully_qualified_shapes() {
        let cases = [
            ("a.b.c", true),
            ("a", true),
            ("snake_case.v2", true),
            ("a..b", false),
            (".a", false),
            ("a.", false),
            ("", false),
            ("a.b!", false),
            ("a b", false),
            ("List<T>", false),
            ("caf\u{e9}.menu", false),
        ];
        for (input, expected) in cases {
            assert_eq!(
                QualifiedName::new(input).is_fully_qualified(),
                expected,
                "is_fully_qualified({input:?})"
            );
        }
    }

    #[test]
    fn original_is_untouched() {
        let input = "  eg.music.Display ";
        let name: QualifiedName = input.parse().unwrap();
        assert_eq!(name.original(), input);
        assert_eq!(name.to_string(), input);
    }

    #[test]
    fn parts_snapshot() {
        let parts = QualifiedName::from("eg.music.Display").parts();
        assert_eq!(
            parts,
            NameParts {
                original: "eg.music.Display".to_string(),
                short_name: "Display".to_string(),
                namespace: "eg.music".to_string(),
                fully_qualified: true,
            }
        );
    }
}
