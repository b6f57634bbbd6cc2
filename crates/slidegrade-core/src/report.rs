//! Grading report types with JSON persistence and markdown rendering.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::ExamModel;
use crate::results::ScoringResult;
use crate::statistics::{compute_aggregate, AggregateStats};

/// The scoring result for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentScore {
    pub path: PathBuf,
    pub result: ScoringResult,
}

/// A complete grading report over one or more documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Summary of the exam graded against.
    pub exam: ExamSummary,
    /// Per-document results, in input order.
    pub documents: Vec<DocumentScore>,
    /// Aggregate statistics.
    pub aggregate: AggregateStats,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// Summary of an exam (without the full point definitions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamSummary {
    pub id: String,
    pub name: String,
    pub question_count: usize,
    pub point_count: usize,
}

impl ExamSummary {
    pub fn of(exam: &ExamModel) -> Self {
        let questions = exam.modules.iter().flat_map(|m| &m.questions);
        Self {
            id: exam.id.clone(),
            name: exam.name.clone(),
            question_count: questions.clone().count(),
            point_count: questions.map(|q| q.operation_points.len()).sum(),
        }
    }
}

impl GradingReport {
    pub fn new(exam: &ExamModel, documents: Vec<DocumentScore>, duration_ms: u64) -> Self {
        let aggregate = compute_aggregate(&documents);
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            exam: ExamSummary::of(exam),
            documents,
            aggregate,
            duration_ms,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: GradingReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("# Grading report: {}\n\n", self.exam.name));
        let d = &self.aggregate.documents;
        md.push_str(&format!(
            "**Summary:** {} documents, {} graded, mean {:.1}%, median {:.1}%\n\n",
            d.count,
            d.succeeded,
            d.mean_ratio * 100.0,
            d.median_ratio * 100.0
        ));

        md.push_str("## Documents\n\n");
        md.push_str("| Document | Score | Total | Correct | Errors |\n");
        md.push_str("|----------|-------|-------|---------|--------|\n");
        for doc in &self.documents {
            let r = &doc.result;
            md.push_str(&format!(
                "| {} | {:.2} | {:.2} | {}/{} | {} |\n",
                doc.path.display(),
                r.achieved_score,
                r.total_score,
                r.correct_count(),
                r.knowledge_point_results.len(),
                r.error_count()
            ));
        }
        md.push('\n');

        if !self.aggregate.per_knowledge_type.is_empty() {
            md.push_str("## Knowledge types\n\n");
            md.push_str("| Type | Evaluated | Correct | Unverifiable | Errored | Accuracy |\n");
            md.push_str("|------|-----------|---------|--------------|---------|----------|\n");
            let mut types: Vec<_> = self.aggregate.per_knowledge_type.values().collect();
            types.sort_by(|a, b| a.knowledge_type.cmp(&b.knowledge_type));
            for t in types {
                md.push_str(&format!(
                    "| {} | {} | {} | {} | {} | {:.1}% |\n",
                    t.knowledge_type,
                    t.evaluated,
                    t.correct,
                    t.unverifiable,
                    t.errored,
                    t.accuracy() * 100.0
                ));
            }
        }

        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExamModule, ModuleType, OperationPoint, Question};
    use crate::results::Outcome;
    use crate::statistics::tests::{document, point};

    fn exam() -> ExamModel {
        ExamModel {
            id: "e1".into(),
            name: "Final".into(),
            description: String::new(),
            modules: vec![ExamModule {
                id: "m".into(),
                name: String::new(),
                module_type: ModuleType::PowerPoint,
                questions: vec![Question {
                    id: "q1".into(),
                    title: String::new(),
                    operation_points: vec![
                        OperationPoint::new("a", "InsertSlide", 2.0),
                        OperationPoint::new("b", "ApplyTheme", 1.0),
                    ],
                }],
            }],
        }
    }

    fn report() -> GradingReport {
        GradingReport::new(
            &exam(),
            vec![document(
                "alice.json",
                vec![
                    point("InsertSlide", "q1", Outcome::Matched, 2.0, 2.0),
                    point("ApplyTheme", "q1", Outcome::NotMatched, 0.0, 1.0),
                ],
            )],
            12,
        )
    }

    #[test]
    fn summary_counts_points() {
        let summary = ExamSummary::of(&exam());
        assert_eq!(summary.question_count, 1);
        assert_eq!(summary.point_count, 2);
    }

    #[test]
    fn json_roundtrip() {
        let report = report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.json");

        report.save_json(&path).unwrap();
        let loaded = GradingReport::load_json(&path).unwrap();

        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.exam.id, "e1");
        assert_eq!(loaded.documents.len(), 1);
        assert_eq!(loaded.aggregate.per_knowledge_type.len(), 2);
    }

    #[test]
    fn markdown_output() {
        let md = report().to_markdown();
        assert!(md.contains("# Grading report: Final"));
        assert!(md.contains("| alice.json | 2.00 | 3.00 | 1/2 | 0 |"));
        assert!(md.contains("| ApplyTheme | 1 | 0 | 0 | 0 | 0.0% |"));
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(GradingReport::load_json(&dir.path().join("nope.json")).is_err());
    }
}
