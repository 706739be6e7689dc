//! tablefit: table-driven acceptance tests.
//!
//! Pages hold wiki-style tables. Each table names a row fixture by its
//! qualified name; the fixture supplies actual rows and the engine checks
//! the table's expected rows against them.

pub use crate::errors::{ErrorContext, ErrorType, FitError};
pub use crate::naming::{NameParts, QualifiedName};

pub mod errors;
pub mod naming;
pub mod table;
pub mod fixture;
pub mod config;
pub mod discovery;
pub mod engine;
pub mod cli;
