//! Knowledge type to detector dispatch.

use std::collections::HashMap;

use crate::detectors;
use crate::document::Document;
use crate::error::GradeError;
use crate::mapping::{KnowledgeTag, KnowledgeType};
use crate::params::Parameters;
use crate::results::Detection;
use crate::traits::Detector;

/// Dispatch table from knowledge type to detector.
pub struct DetectorRegistry {
    detectors: HashMap<KnowledgeType, Box<dyn Detector>>,
}

impl DetectorRegistry {
    /// A registry with no detectors.
    pub fn empty() -> Self {
        Self {
            detectors: HashMap::new(),
        }
    }

    /// A registry with every built-in detector.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        for (tag, detect) in detectors::builtin() {
            registry.register(tag, Box::new(detect));
        }
        registry
    }

    /// Register or replace the detector for `tag`.
    pub fn register(&mut self, tag: KnowledgeType, detector: Box<dyn Detector>) {
        if self.detectors.insert(tag, detector).is_some() {
            tracing::debug!(%tag, "replaced detector");
        }
    }

    pub fn supports(&self, tag: &KnowledgeTag) -> bool {
        tag.known().is_some_and(|t| self.detectors.contains_key(&t))
    }

    /// Registered tags in declaration order.
    pub fn tags(&self) -> Vec<KnowledgeType> {
        let mut tags: Vec<KnowledgeType> = self.detectors.keys().copied().collect();
        tags.sort();
        tags
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    /// Run the detector for `tag`, or fail with `UnsupportedKnowledgeType`.
    pub fn dispatch(
        &self,
        doc: &Document,
        tag: &KnowledgeTag,
        params: &Parameters,
    ) -> Result<Detection, GradeError> {
        let detector = tag
            .known()
            .and_then(|t| self.detectors.get(&t))
            .ok_or_else(|| GradeError::UnsupportedKnowledgeType(tag.to_string()))?;
        detector.detect(doc, params)
    }
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
