//! The `slidegrade validate` command.

use std::path::PathBuf;

use anyhow::Result;

use slidegrade_core::parser;
use slidegrade_core::registry::DetectorRegistry;

pub fn execute(exam_path: PathBuf) -> Result<()> {
    let exam = parser::parse_exam(&exam_path)?;
    let points: usize = exam
        .modules
        .iter()
        .flat_map(|m| &m.questions)
        .map(|q| q.operation_points.len())
        .sum();
    println!("Exam: {} ({} points)", exam.name, points);

    let warnings = parser::validate_exam(&exam, &DetectorRegistry::with_defaults());
    for w in &warnings {
        let prefix = w
            .item_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Exam is valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
