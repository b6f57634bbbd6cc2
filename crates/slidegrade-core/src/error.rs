//! Grading error taxonomy.
//!
//! Every fault raised while grading a document is one of these variants.
//! The batch evaluator catches them at the narrowest scope (a single
//! knowledge point, or the whole document when it cannot be opened) and
//! records them on the result instead of propagating them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ModuleType;

/// Errors that can occur while grading a document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GradeError {
    /// The document could not be opened or is corrupt.
    #[error("invalid document {path}: {reason}")]
    DocumentInvalid { path: String, reason: String },

    /// The exam has no module of the requested type.
    #[error("exam has no {0} module")]
    ModuleNotFound(ModuleType),

    /// No enabled operation points were supplied.
    #[error("no enabled operation points")]
    NoEnabledPoints,

    /// A required parameter is absent or unparsable.
    #[error("missing parameter: {0}")]
    MissingParameter(String),

    /// A 1-based index is outside the collection it addresses.
    #[error("{what} index {index} out of range (1..={len})")]
    OutOfRange {
        what: &'static str,
        index: i64,
        len: usize,
    },

    /// No detector is registered for the knowledge type.
    #[error("unsupported knowledge type: {0}")]
    UnsupportedKnowledgeType(String),

    /// A detector failed unexpectedly.
    #[error("detection fault: {0}")]
    DetectionFault(String),
}

impl GradeError {
    /// Serializable classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GradeError::DocumentInvalid { .. } => ErrorKind::DocumentInvalid,
            GradeError::ModuleNotFound(_) => ErrorKind::ModuleNotFound,
            GradeError::NoEnabledPoints => ErrorKind::NoEnabledPoints,
            GradeError::MissingParameter(_) => ErrorKind::MissingParameter,
            GradeError::OutOfRange { .. } => ErrorKind::OutOfRange,
            GradeError::UnsupportedKnowledgeType(_) => ErrorKind::UnsupportedKnowledgeType,
            GradeError::DetectionFault(_) => ErrorKind::DetectionFault,
        }
    }

    /// Shorthand for a slide index outside `1..=len`.
    pub fn slide_out_of_range(index: i64, len: usize) -> Self {
        GradeError::OutOfRange {
            what: "slide",
            index,
            len,
        }
    }
}

/// Error classification recorded on knowledge point results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    DocumentInvalid,
    ModuleNotFound,
    NoEnabledPoints,
    MissingParameter,
    OutOfRange,
    UnsupportedKnowledgeType,
    DetectionFault,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_message() {
        let err = GradeError::slide_out_of_range(0, 3);
        assert_eq!(err.to_string(), "slide index 0 out of range (1..=3)");
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::UnsupportedKnowledgeType).unwrap();
        assert_eq!(json, "\"unsupported_knowledge_type\"");
    }
}
