use std::fmt::{self, Display, Formatter};

use smol_str::SmolStr;
use strum::Display as StrumDisplay;

use crate::tree::{NodeId, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
pub enum Severity {
    Information,
    Warning,
    Error,
}

/// Where a diagnostic points: the file identity of the run and the `line`
/// attribute of the offending node, when either is known.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub file: Option<SmolStr>,
    pub line: Option<i64>,
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, " ({file}:{line})"),
            (Some(file), None) => write!(f, " ({file})"),
            (None, Some(line)) => write!(f, " (Line {line})"),
            (None, None) => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub location: Location,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}{}", self.severity, self.message, self.location)
    }
}

/// Per-run logging context.
///
/// Carries the file identity used in messages and the verbosity switch, and
/// keeps every diagnostic emitted during the run so callers can inspect them
/// after the fact. Messages are forwarded to the `log` facade as they happen.
#[derive(Debug, Clone, Default)]
pub struct LogContext {
    file_id: Option<SmolStr>,
    verbose: bool,
    diagnostics: Vec<Diagnostic>,
}

impl LogContext {
    pub fn new(file_id: Option<&str>) -> Self {
        Self {
            file_id: file_id.filter(|id| !id.is_empty()).map(SmolStr::from),
            ..Default::default()
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn file_id(&self) -> Option<&str> {
        self.file_id.as_deref()
    }

    pub fn location(&self, tree: &Tree, node: NodeId) -> Location {
        Location {
            file: self.file_id.clone(),
            line: tree.node(node).line(),
        }
    }

    pub fn warn(&mut self, tree: &Tree, node: NodeId, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            severity: Severity::Warning,
            message: message.into(),
            location: self.location(tree, node),
        };
        log::warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    pub fn info(&mut self, tree: &Tree, node: NodeId, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            severity: Severity::Information,
            message: message.into(),
            location: self.location(tree, node),
        };
        if self.verbose {
            log::info!("{diagnostic}");
        } else {
            log::debug!("{diagnostic}");
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.severity == Severity::Warning)
    }
}
