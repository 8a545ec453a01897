//! Tuning error types
//!
//! Registration errors come back directly from the registration calls.
//! Update-engine variants double as per-entry diagnostics: an update pass
//! collects them in [`UpdateOutcome::skipped`](crate::UpdateOutcome) and
//! keeps going, leaving the affected entries on their previous values.

use std::io;
use std::path::PathBuf;

use crate::value::ValueType;

/// Errors from registration and live-update operations
#[derive(Debug, thiserror::Error)]
pub enum TuneError {
    /// Source path could not be canonicalized at registration time
    #[error("cannot resolve source path {}: {source}", path.display())]
    Canonicalize {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Registered source file could not be opened
    #[error("cannot open source file {}: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File metadata could not be read during an update pass
    #[error("cannot stat {}: {source}", path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A read failed partway through a source file
    #[error("read error in {} near line {line}: {source}", path.display())]
    Read {
        path: PathBuf,
        line: u32,
        #[source]
        source: io::Error,
    },

    /// `update_file` was called with a path no site is registered under
    #[error("no tunable sites registered for {}", .0.display())]
    FileNotRegistered(PathBuf),

    /// Global-site scan found no declaration line for the identifier
    #[error("global {name:?} not found in {}", path.display())]
    GlobalNotFound { name: String, path: PathBuf },

    /// A second registration landed on an occupied (file, line) pair
    #[error("line {line} of {} is already registered", path.display())]
    DuplicateLine { path: PathBuf, line: u32 },

    /// An expression-site fetch hit an entry of a different type
    #[error(
        "line {line} of {} is registered as {}, not {}",
        path.display(),
        found.type_name(),
        expected.type_name()
    )]
    TypeMismatch {
        path: PathBuf,
        line: u32,
        expected: ValueType,
        found: ValueType,
    },

    /// File ended before a registered line was reached
    #[error("{} ends before registered line {line}", path.display())]
    UnexpectedEof { path: PathBuf, line: u32 },

    /// Registered line no longer contains a recognized tune call
    #[error("no tune call site recognized at {}:{line}", path.display())]
    UnrecognizedCallSite { path: PathBuf, line: u32 },

    /// The literal argument did not parse as the registered type
    #[error("bad {} literal at {}:{line}", ty.type_name(), path.display())]
    BadLiteral {
        path: PathBuf,
        line: u32,
        ty: ValueType,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = TuneError::DuplicateLine {
            path: PathBuf::from("/src/game.rs"),
            line: 42,
        };
        assert_eq!(error.to_string(), "line 42 of /src/game.rs is already registered");

        let error = TuneError::TypeMismatch {
            path: PathBuf::from("/src/game.rs"),
            line: 7,
            expected: ValueType::F32,
            found: ValueType::I32,
        };
        assert_eq!(
            error.to_string(),
            "line 7 of /src/game.rs is registered as i32, not f32"
        );

        let error = TuneError::BadLiteral {
            path: PathBuf::from("/src/game.rs"),
            line: 3,
            ty: ValueType::Bool,
        };
        assert_eq!(error.to_string(), "bad bool literal at /src/game.rs:3");
    }
}
