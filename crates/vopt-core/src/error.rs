use miette::Diagnostic;

use crate::diagnostic::Location;

/// Fatal conditions that abort an optimization run.
///
/// Malformed call sites are not errors; they are reported as warnings
/// through the [`LogContext`](crate::LogContext) and left untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Diagnostic)]
pub enum Error {
    #[error("No matching case found for variant ({key}:{value}){location}")]
    #[diagnostic(
        code(vopt::select::no_match),
        help("add a branch matching the configured value or a \"default\" branch to the select map")
    )]
    NoMatchingBranch {
        key: String,
        value: String,
        location: Location,
    },
    #[error("Illegal value for JS constant: {value}{location}")]
    #[diagnostic(
        code(vopt::literal::unsupported),
        help("variant values must be strings, booleans, finite numbers or null")
    )]
    UnsupportedValue { value: String, location: Location },
}
