//! Structured failures of the DOSCAR/POSCAR core.
//!
//! Every parse or aggregation step reports one of the kinds below. The command
//! layer wraps them into `anyhow::Error` with file context, the core never
//! recovers from them partially.

use thiserror::Error;


/// Fieldless tag of a [`DosError`], handy for matching in callers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedInput,
    ParseError,
    UnsupportedFormat,
    ShapeMismatch,
    InconsistentAtomCount,
}


#[derive(Error, Debug, Clone, PartialEq)]
pub enum DosError {
    /// File shorter than, or structured differently from, the fixed layout.
    #[error("Malformed {file}: {detail}")]
    MalformedInput {
        file:   &'static str,
        detail: String,
        line:   Option<usize>,
    },

    /// A token that should be a number is not.
    #[error("Cannot parse {token:?} as a number at line {line} of {file}")]
    ParseError {
        file:  &'static str,
        line:  usize,
        token: String,
    },

    #[error("Unsupported DOSCAR layout: projected blocks have {ncol} columns, \
known widths are 4, 5, 7, 10, 17 and 19")]
    UnsupportedFormat {
        ncol: usize,
    },

    #[error("Shape mismatch between projected DOS blocks: {expected:?} vs {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found:    (usize, usize),
    },

    #[error("POSCAR declares {poscar} atoms in total but DOSCAR holds {doscar}")]
    InconsistentAtomCount {
        poscar: usize,
        doscar: usize,
    },
}


impl DosError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedInput { .. }        => ErrorKind::MalformedInput,
            Self::ParseError { .. }            => ErrorKind::ParseError,
            Self::UnsupportedFormat { .. }     => ErrorKind::UnsupportedFormat,
            Self::ShapeMismatch { .. }         => ErrorKind::ShapeMismatch,
            Self::InconsistentAtomCount { .. } => ErrorKind::InconsistentAtomCount,
        }
    }

    /// Offending line number (1-based) when the failure points at one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MalformedInput { line, .. } => *line,
            Self::ParseError { line, .. }     => Some(*line),
            _ => None,
        }
    }

    pub(crate) fn malformed(file: &'static str, detail: impl Into<String>) -> Self {
        Self::MalformedInput { file, detail: detail.into(), line: None }
    }

    pub(crate) fn malformed_at(file: &'static str, line: usize, detail: impl Into<String>) -> Self {
        Self::MalformedInput { file, detail: detail.into(), line: Some(line) }
    }
}


pub type DosResult<T> = std::result::Result<T, DosError>;
