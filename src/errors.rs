//! Unified, `miette`-based diagnostics for tablefit.
//!
//! Every failure above the naming layer is a [`FitError`]. Construction goes
//! through three macros:
//!
//! - `err_msg!` for message-only errors: `err_msg!(Internal, "lost {}", what)`
//! - `err_ctx!` for errors pointing into a page: `err_ctx!(Table, msg, src, span, help)`
//! - `err_src!` for errors carrying a related label as well
//!
//! Page-level failures are not fatal. The engine records them next to the
//! table they belong to and renders them with `miette::Report` afterwards.

use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use thiserror::Error;

use crate::table::Span;

pub type SourceArc = Arc<NamedSource<String>>;

/// Type-safe classification of a [`FitError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// Page text the table grammar could not read
    Parse,
    /// Unknown fixture names
    Fixture,
    /// Malformed tables: missing header, unknown column, bad import
    Table,
    /// Configuration and catalog loading
    Config,
    /// File system access
    Io,
    /// Broken engine invariants
    Internal,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Parse => "Parse",
            ErrorType::Fixture => "Fixture",
            ErrorType::Table => "Table",
            ErrorType::Config => "Config",
            ErrorType::Io => "Io",
            ErrorType::Internal => "Internal",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A secondary label for multi-span diagnostics.
#[derive(Debug)]
pub struct RelatedLabel {
    pub span: Span,
    pub label: String,
}

/// Where an error happened and how to help.
#[derive(Debug, Default)]
pub struct ErrorContext {
    pub source: Option<SourceArc>,
    pub span: Option<Span>,
    pub help: Option<String>,
    pub related: Vec<RelatedLabel>,
}

impl ErrorContext {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_source_and_span(source: SourceArc, span: Span) -> Self {
        Self {
            source: Some(source),
            span: Some(span),
            ..Self::default()
        }
    }
}

type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum FitError {
    #[error("Parse error: {message}")]
    Parse {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Cause>,
    },
    #[error("{message}")]
    Fixture {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Cause>,
    },
    #[error("Table error: {message}")]
    Table {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Cause>,
    },
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Cause>,
    },
    #[error("I/O error: {message}")]
    Io {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Cause>,
    },
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Cause>,
    },
}

impl FitError {
    fn get_ctx(&self) -> &ErrorContext {
        match self {
            FitError::Parse { ctx, .. }
            | FitError::Fixture { ctx, .. }
            | FitError::Table { ctx, .. }
            | FitError::Config { ctx, .. }
            | FitError::Io { ctx, .. }
            | FitError::Internal { ctx, .. } => ctx,
        }
    }

    fn get_ctx_mut(&mut self) -> &mut ErrorContext {
        match self {
            FitError::Parse { ctx, .. }
            | FitError::Fixture { ctx, .. }
            | FitError::Table { ctx, .. }
            | FitError::Config { ctx, .. }
            | FitError::Io { ctx, .. }
            | FitError::Internal { ctx, .. } => ctx,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            FitError::Parse { message, .. }
            | FitError::Fixture { message, .. }
            | FitError::Table { message, .. }
            | FitError::Config { message, .. }
            | FitError::Io { message, .. }
            | FitError::Internal { message, .. } => message,
        }
    }

    pub fn error_type(&self) -> ErrorType {
        match self {
            FitError::Parse { .. } => ErrorType::Parse,
            FitError::Fixture { .. } => ErrorType::Fixture,
            FitError::Table { .. } => ErrorType::Table,
            FitError::Config { .. } => ErrorType::Config,
            FitError::Io { .. } => ErrorType::Io,
            FitError::Internal { .. } => ErrorType::Internal,
        }
    }

    /// The primary span, if the error points into a page.
    pub fn span(&self) -> Option<Span> {
        self.get_ctx().span
    }

    /// Points a context-free error at a span of a page. Errors that already
    /// carry a location keep it.
    pub fn located(mut self, source: &SourceArc, span: Span) -> Self {
        let ctx = self.get_ctx_mut();
        if ctx.source.is_none() {
            ctx.source = Some(Arc::clone(source));
            ctx.span = Some(span);
        }
        self
    }

    /// Attaches a help message, replacing any existing one.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.get_ctx_mut().help = Some(help.into());
        self
    }

    /// Attaches an underlying cause.
    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        match &mut self {
            FitError::Parse { source, .. }
            | FitError::Fixture { source, .. }
            | FitError::Table { source, .. }
            | FitError::Config { source, .. }
            | FitError::Io { source, .. }
            | FitError::Internal { source, .. } => *source = Some(Box::new(cause)),
        }
        self
    }
}

impl Diagnostic for FitError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        Some(Box::new(format!(
            "tablefit::{}",
            self.error_type().as_str().to_lowercase()
        )))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.get_ctx()
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn std::fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.get_ctx()
            .source
            .as_ref()
            .map(|s| s.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let ctx = self.get_ctx();
        let mut labels = Vec::new();
        if let Some(span) = ctx.span {
            labels.push(LabeledSpan::new(
                Some(self.message().to_string()),
                span.start,
                span.len().max(1),
            ));
        }
        for rel in &ctx.related {
            labels.push(LabeledSpan::new(
                Some(rel.label.clone()),
                rel.span.start,
                rel.span.len().max(1),
            ));
        }
        if labels.is_empty() {
            None
        } else {
            Some(Box::new(labels.into_iter()))
        }
    }
}

/// Wraps page text as a named diagnostic source.
pub fn to_error_source(name: impl AsRef<str>, source: impl AsRef<str>) -> SourceArc {
    Arc::new(NamedSource::new(name.as_ref(), source.as_ref().to_string()))
}

/// Constructs a FitError variant with a formatted message and no context.
#[macro_export]
macro_rules! err_msg {
    ($variant:ident, $msg:expr, $($arg:expr),+ $(,)?) => {
        $crate::FitError::$variant {
            message: format!($msg, $($arg),+),
            ctx: $crate::ErrorContext::none(),
            source: None,
        }
    };
    ($variant:ident, $msg:expr) => {
        $crate::FitError::$variant {
            message: format!("{}", $msg),
            ctx: $crate::ErrorContext::none(),
            source: None,
        }
    };
}

/// Constructs a FitError variant pointing at a span of a page.
///
/// `$src` is a `&SourceArc`; the macro clones the `Arc`.
#[macro_export]
macro_rules! err_ctx {
    ($variant:ident, $msg:expr, $src:expr, $span:expr, $help:expr) => {
        $crate::FitError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext {
                source: Some($crate::errors::SourceArc::clone($src)),
                span: Some($span),
                help: Some(format!("{}", $help)),
                related: vec![],
            },
            source: None,
        }
    };
    ($variant:ident, $msg:expr, $src:expr, $span:expr) => {
        $crate::FitError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext::with_source_and_span(
                $crate::errors::SourceArc::clone($src),
                $span,
            ),
            source: None,
        }
    };
}

/// Constructs a FitError variant with related labels.
#[macro_export]
macro_rules! err_src {
    ($variant:ident, $msg:expr, $src:expr, $span:expr, $related:expr) => {
        $crate::FitError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext {
                source: Some($crate::errors::SourceArc::clone($src)),
                span: Some($span),
                help: None,
                related: $related,
            },
            source: None,
        }
    };
}
