//! Compiler diagnostics channel.
//!
//! Analyses never print: they push messages here. Recoverable errors bump a
//! bounded counter; reaching the bound, or raising a fatal/internal error,
//! produces an [`Abort`] that callers return as an `Err` up to the driver,
//! which maps it to a process exit status.

use bon::bon;
use snafu::Snafu;

use crate::provenance::SourceLocation;

/// Default number of errors tolerated before the compilation unit stops.
pub const DEFAULT_MAX_ERRORS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Message,
    Warning,
    Error,
    Fatal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub location: Option<SourceLocation>,
    pub text: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(location) = &self.location {
            write!(f, "{location}: ")?;
        }
        match self.severity {
            Severity::Message => write!(f, "{}", self.text),
            severity => write!(f, "{severity}: {}", self.text),
        }
    }
}

/// Control-flow signal stopping a compilation unit.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum Abort {
    /// The error bound was reached.
    #[snafu(display("too many errors ({count}), stopping the compilation process"))]
    TooManyErrors { count: usize },

    /// Pending errors at a phase boundary.
    #[snafu(display("{count} error(s), stopping the compilation process"))]
    PendingErrors { count: usize },

    #[snafu(display("fatal error: {text}"))]
    Fatal { text: String },

    /// A compiler bug, not a user error.
    #[snafu(display("internal error: {text}"))]
    Internal { text: String },
}

impl Abort {
    /// Process exit status for this abort.
    pub const fn exit_status(&self) -> i32 {
        1
    }
}

/// Per-compilation-unit diagnostics sink.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    max_errors: usize,
    verbosity: u8,
    entries: Vec<Diagnostic>,
    nb_errors: usize,
    nb_warnings: usize,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self { max_errors: DEFAULT_MAX_ERRORS, verbosity: 0, entries: Vec::new(), nb_errors: 0, nb_warnings: 0 }
    }
}

#[bon]
impl Diagnostics {
    #[builder(finish_fn = build)]
    pub fn builder(#[builder(default = DEFAULT_MAX_ERRORS)] max_errors: usize, #[builder(default)] verbosity: u8) -> Self {
        Self { max_errors: max_errors.max(1), verbosity, ..Self::default() }
    }

    /// Read the error bound from `KGEN_MAX_ERRORS`, falling back to the default.
    pub fn from_env() -> Self {
        let max_errors = std::env::var("KGEN_MAX_ERRORS")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_MAX_ERRORS);
        Self::builder().max_errors(max_errors).build()
    }

    fn push(&mut self, severity: Severity, location: Option<SourceLocation>, text: String) {
        match severity {
            Severity::Message => tracing::debug!(%text, "diagnostic"),
            Severity::Warning => tracing::warn!(%text, "diagnostic"),
            Severity::Error | Severity::Fatal => tracing::error!(%text, "diagnostic"),
        }
        self.entries.push(Diagnostic { severity, location, text });
    }

    /// Informational message, kept only when `level <= verbosity`.
    pub fn message(&mut self, level: u8, text: impl Into<String>) {
        if level <= self.verbosity {
            self.push(Severity::Message, None, text.into());
        }
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.warning_at(None, text);
    }

    pub fn warning_at(&mut self, location: Option<SourceLocation>, text: impl Into<String>) {
        self.nb_warnings += 1;
        self.push(Severity::Warning, location, text.into());
    }

    /// Record a recoverable error; fails once the error bound is reached.
    pub fn error(&mut self, text: impl Into<String>) -> Result<(), Abort> {
        self.error_at(None, text)
    }

    pub fn error_at(&mut self, location: Option<SourceLocation>, text: impl Into<String>) -> Result<(), Abort> {
        self.push(Severity::Error, location, text.into());
        self.nb_errors += 1;
        if self.nb_errors >= self.max_errors {
            return TooManyErrorsSnafu { count: self.nb_errors }.fail();
        }
        Ok(())
    }

    /// Record an unrecoverable error and return the abort to propagate.
    pub fn fatal(&mut self, location: Option<SourceLocation>, text: impl Into<String>) -> Abort {
        let text = text.into();
        self.nb_errors += 1;
        self.push(Severity::Fatal, location, text.clone());
        Abort::Fatal { text }
    }

    /// Record a compiler bug and return the abort to propagate.
    pub fn internal(&mut self, text: impl Into<String>) -> Abort {
        let text = text.into();
        self.nb_errors += 1;
        self.push(Severity::Fatal, None, format!("internal error: {text}"));
        Abort::Internal { text }
    }

    /// Stop at a phase boundary if any error is pending.
    pub fn exit_if_error(&self) -> Result<(), Abort> {
        if self.nb_errors > 0 {
            return PendingErrorsSnafu { count: self.nb_errors }.fail();
        }
        Ok(())
    }

    pub fn has_errors(&self) -> bool {
        self.nb_errors > 0
    }

    pub fn error_count(&self) -> usize {
        self.nb_errors
    }

    pub fn warning_count(&self) -> usize {
        self.nb_warnings
    }

    pub fn max_errors(&self) -> usize {
        self.max_errors
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn take_entries(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.entries)
    }
}
