//! Detection and scoring result types.
//!
//! A [`Detection`] is what a detector returns; the evaluator turns it into
//! an immutable [`KnowledgePointResult`] once the score is known. Results
//! for one document aggregate into a [`ScoringResult`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ErrorKind, GradeError};
use crate::model::Parameter;
use crate::scorer::clamp_total;

/// Verdict of a single detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The document satisfies the check.
    Matched,
    /// The document does not satisfy the check.
    NotMatched,
    /// The structure is plausible but the attribute cannot be inspected
    /// precisely enough to confirm it.
    PresentButUnverifiable,
    /// Detection did not run to a verdict.
    Errored,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Matched => write!(f, "matched"),
            Outcome::NotMatched => write!(f, "not matched"),
            Outcome::PresentButUnverifiable => write!(f, "unverifiable"),
            Outcome::Errored => write!(f, "errored"),
        }
    }
}

/// How the score of a detection is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Credit {
    /// Full weight or nothing.
    Binary,
    /// Proportional to matched sub-targets.
    Partial { matched: usize, of: usize },
}

/// Raw verdict returned by a detector.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub expected: String,
    pub actual: String,
    pub outcome: Outcome,
    pub details: String,
    pub credit: Credit,
}

impl Detection {
    fn new(outcome: Outcome, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            actual: actual.into(),
            outcome,
            details: String::new(),
            credit: Credit::Binary,
        }
    }

    pub fn matched(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(Outcome::Matched, expected, actual)
    }

    pub fn not_matched(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(Outcome::NotMatched, expected, actual)
    }

    pub fn unverifiable(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(Outcome::PresentButUnverifiable, expected, actual)
    }

    /// `Matched` when `ok`, `NotMatched` otherwise.
    pub fn verdict(ok: bool, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        if ok {
            Self::matched(expected, actual)
        } else {
            Self::not_matched(expected, actual)
        }
    }

    /// Plausibility check for attributes that cannot be read back precisely.
    pub fn plausible(ok: bool, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        if ok {
            Self::unverifiable(expected, actual)
        } else {
            Self::not_matched(expected, actual)
        }
    }

    /// Multi-target verdict: matched only when every target matched.
    pub fn partial(
        matched: usize,
        of: usize,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        let mut d = Self::verdict(of > 0 && matched == of, expected, actual);
        d.credit = Credit::Partial { matched, of };
        d
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }
}

/// Outcome of grading one knowledge point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgePointResult {
    /// Canonical knowledge type tag (or the unmapped name).
    pub knowledge_type: String,
    /// Operation point id.
    pub knowledge_point_id: String,
    /// Operation point display name.
    pub name: String,
    /// Parameters as supplied by the exam.
    pub parameters: Vec<Parameter>,
    pub expected_value: String,
    pub actual_value: String,
    /// True only for a verified match.
    pub is_correct: bool,
    pub outcome: Outcome,
    pub achieved_score: f64,
    pub total_score: f64,
    /// Human-readable diagnostic.
    #[serde(default)]
    pub details: String,
    /// Question this point belongs to, if known.
    #[serde(default)]
    pub question_id: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub error_kind: Option<ErrorKind>,
}

impl KnowledgePointResult {
    /// Result for a point whose detection failed with `err`.
    pub fn errored(
        knowledge_type: impl Into<String>,
        id: impl Into<String>,
        name: impl Into<String>,
        parameters: Vec<Parameter>,
        total_score: f64,
        err: &GradeError,
    ) -> Self {
        Self {
            knowledge_type: knowledge_type.into(),
            knowledge_point_id: id.into(),
            name: name.into(),
            parameters,
            expected_value: String::new(),
            actual_value: String::new(),
            is_correct: false,
            outcome: Outcome::Errored,
            achieved_score: 0.0,
            total_score: clamp_total(total_score),
            details: err.to_string(),
            question_id: None,
            error_message: Some(err.to_string()),
            error_kind: Some(err.kind()),
        }
    }

    pub fn is_errored(&self) -> bool {
        self.outcome == Outcome::Errored
    }
}

/// Aggregate grading outcome for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringResult {
    /// Set when a single question was scored.
    #[serde(default)]
    pub question_id: Option<String>,
    #[serde(default)]
    pub question_title: Option<String>,
    pub total_score: f64,
    pub achieved_score: f64,
    pub knowledge_point_results: Vec<KnowledgePointResult>,
    pub is_success: bool,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub details: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ScoringResult {
    /// An empty result with both timestamps set to now.
    pub fn empty() -> Self {
        let now = Utc::now();
        Self {
            question_id: None,
            question_title: None,
            total_score: 0.0,
            achieved_score: 0.0,
            knowledge_point_results: Vec::new(),
            is_success: false,
            error_message: None,
            details: String::new(),
            started_at: now,
            finished_at: now,
        }
    }

    /// Achieved score as a fraction of the total (0.0 when total is 0).
    pub fn ratio(&self) -> f64 {
        if self.total_score > 0.0 {
            self.achieved_score / self.total_score
        } else {
            0.0
        }
    }

    pub fn correct_count(&self) -> usize {
        self.knowledge_point_results
            .iter()
            .filter(|r| r.is_correct)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.knowledge_point_results
            .iter()
            .filter(|r| r.is_errored())
            .count()
    }

    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}
