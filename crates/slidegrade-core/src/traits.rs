//! Seams between the grading engine and its collaborators.
//!
//! [`DocumentLoader`] turns a path into a navigable [`Document`];
//! [`Detector`] grades one knowledge type against that document.

use std::path::Path;

use crate::document::Document;
use crate::error::GradeError;
use crate::params::Parameters;
use crate::results::Detection;

// ---------------------------------------------------------------------------
// Document loader
// ---------------------------------------------------------------------------

/// Opens documents for grading.
pub trait DocumentLoader: Send + Sync {
    /// Human-readable loader name (e.g. "json").
    fn name(&self) -> &str;

    /// Open a document read-only. The returned tree is owned by the caller
    /// and dropped when the batch ends.
    fn open_read_only(&self, path: &Path) -> anyhow::Result<Document>;
}

// ---------------------------------------------------------------------------
// Detector
// ---------------------------------------------------------------------------

/// Grades one knowledge type. Implementations must be read-only over the
/// document and must not keep state between calls.
pub trait Detector: Send + Sync {
    fn detect(&self, doc: &Document, params: &Parameters) -> Result<Detection, GradeError>;
}

/// Signature shared by the built-in detector functions.
pub type DetectFn = fn(&Document, &Parameters) -> Result<Detection, GradeError>;

impl Detector for DetectFn {
    fn detect(&self, doc: &Document, params: &Parameters) -> Result<Detection, GradeError> {
        self(doc, params)
    }
}
