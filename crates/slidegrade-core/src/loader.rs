//! Document loader for JSON tree snapshots.

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::document::Document;
use crate::traits::DocumentLoader;

/// Reads a [`Document`] serialized as JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonDocumentLoader;

impl JsonDocumentLoader {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentLoader for JsonDocumentLoader {
    fn name(&self) -> &str {
        "json"
    }

    fn open_read_only(&self, path: &Path) -> Result<Document> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => {}
            Some(ext) => bail!("unsupported document format: .{ext}"),
            None => bail!("document has no file extension"),
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let doc: Document = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        tracing::debug!(path = %path.display(), slides = doc.slides.len(), "document opened");
        Ok(doc)
    }
}
