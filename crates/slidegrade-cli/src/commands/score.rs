//! The `slidegrade score` command.

use std::path::PathBuf;

use anyhow::Result;

use slidegrade_core::model::ModuleType;
use slidegrade_core::parser;
use slidegrade_core::report::{DocumentScore, GradingReport};
use slidegrade_core::results::ScoringResult;

pub fn execute(
    exam_path: PathBuf,
    document: PathBuf,
    question: Option<String>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(
        matches!(format.as_str(), "text" | "json" | "markdown"),
        "unknown format: {format} (expected text, json or markdown)"
    );
    let exam = parser::parse_exam(&exam_path)?;
    let grader = super::grader(config_path.as_deref())?;

    let result = match &question {
        Some(id) => {
            let q = exam
                .module(ModuleType::PowerPoint)
                .and_then(|m| m.questions.iter().find(|q| &q.id == id))
                .ok_or_else(|| anyhow::anyhow!("question '{id}' not found in exam {}", exam.id))?;
            grader.score_question(&document, q)
        }
        None => grader.score_document(&document, &exam),
    };

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        "markdown" => {
            let duration = result.duration_ms().max(0) as u64;
            let report = GradingReport::new(
                &exam,
                vec![DocumentScore {
                    path: document,
                    result,
                }],
                duration,
            );
            print!("{}", report.to_markdown());
        }
        _ => print_text(&document, &result),
    }

    Ok(())
}

fn print_text(document: &std::path::Path, result: &ScoringResult) {
    if !result.knowledge_point_results.is_empty() {
        println!("{}", super::results_table(&result.knowledge_point_results));
    }
    if let Some(msg) = &result.error_message {
        println!("Note: {msg}");
    }
    println!(
        "{}: {:.2}/{:.2} ({:.1}%), {}",
        document.display(),
        result.achieved_score,
        result.total_score,
        result.ratio() * 100.0,
        result.details
    );
}
