//! Aggregate statistics over graded documents.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::report::DocumentScore;
use crate::results::Outcome;

/// Aggregate statistics across all graded documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Per-knowledge-type statistics, keyed by tag.
    pub per_knowledge_type: HashMap<String, KnowledgeTypeStats>,
    /// Per-question statistics, keyed by question id.
    pub per_question: HashMap<String, QuestionStats>,
    /// Score distribution across documents.
    pub documents: DocumentStats,
}

/// Statistics for one knowledge type across every document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeTypeStats {
    pub knowledge_type: String,
    /// Points of this type that were evaluated.
    pub evaluated: usize,
    pub correct: usize,
    pub unverifiable: usize,
    pub errored: usize,
    pub achieved_score: f64,
    pub total_score: f64,
}

impl KnowledgeTypeStats {
    /// Fraction of evaluated points that were correct.
    pub fn accuracy(&self) -> f64 {
        if self.evaluated == 0 {
            0.0
        } else {
            self.correct as f64 / self.evaluated as f64
        }
    }
}

/// Statistics for one question across every document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionStats {
    pub question_id: String,
    /// Documents that had points for this question.
    pub documents: usize,
    /// Mean achieved score per document.
    pub mean_score: f64,
    /// Total available score (same for every document).
    pub total_score: f64,
}

/// Distribution of achieved/total ratios across documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentStats {
    pub count: usize,
    pub succeeded: usize,
    pub mean_ratio: f64,
    pub median_ratio: f64,
    pub min_ratio: f64,
    pub max_ratio: f64,
}

/// Compute aggregate statistics from graded documents.
pub fn compute_aggregate(scores: &[DocumentScore]) -> AggregateStats {
    let mut per_knowledge_type: HashMap<String, KnowledgeTypeStats> = HashMap::new();
    // question id -> (documents seen, achieved sum, total per document)
    let mut questions: HashMap<String, (usize, f64, f64)> = HashMap::new();

    for doc in scores {
        let mut doc_questions: HashMap<&str, (f64, f64)> = HashMap::new();
        for r in &doc.result.knowledge_point_results {
            let stats = per_knowledge_type
                .entry(r.knowledge_type.clone())
                .or_insert_with(|| KnowledgeTypeStats {
                    knowledge_type: r.knowledge_type.clone(),
                    ..Default::default()
                });
            stats.evaluated += 1;
            stats.achieved_score += r.achieved_score;
            stats.total_score += r.total_score;
            match r.outcome {
                Outcome::Matched => stats.correct += 1,
                Outcome::PresentButUnverifiable => stats.unverifiable += 1,
                Outcome::Errored => stats.errored += 1,
                Outcome::NotMatched => {}
            }

            if let Some(q) = r.question_id.as_deref() {
                let entry = doc_questions.entry(q).or_default();
                entry.0 += r.achieved_score;
                entry.1 += r.total_score;
            }
        }
        for (q, (achieved, total)) in doc_questions {
            let entry = questions.entry(q.to_string()).or_default();
            entry.0 += 1;
            entry.1 += achieved;
            entry.2 = total;
        }
    }

    let per_question = questions
        .into_iter()
        .map(|(id, (documents, achieved, total))| {
            let stats = QuestionStats {
                question_id: id.clone(),
                documents,
                mean_score: achieved / documents as f64,
                total_score: total,
            };
            (id, stats)
        })
        .collect();

    AggregateStats {
        per_knowledge_type,
        per_question,
        documents: document_stats(scores),
    }
}

fn document_stats(scores: &[DocumentScore]) -> DocumentStats {
    if scores.is_empty() {
        return DocumentStats::default();
    }
    let mut ratios: Vec<f64> = scores.iter().map(|s| s.result.ratio()).collect();
    ratios.sort_by(|a, b| a.total_cmp(b));
    let n = ratios.len();
    let median = if n % 2 == 0 {
        (ratios[n / 2 - 1] + ratios[n / 2]) / 2.0
    } else {
        ratios[n / 2]
    };
    DocumentStats {
        count: n,
        succeeded: scores.iter().filter(|s| s.result.is_success).count(),
        mean_ratio: ratios.iter().sum::<f64>() / n as f64,
        median_ratio: median,
        min_ratio: ratios[0],
        max_ratio: ratios[n - 1],
    }
}
