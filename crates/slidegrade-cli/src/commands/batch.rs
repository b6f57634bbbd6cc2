//! The `slidegrade batch` command.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use slidegrade_core::config::load_config_from;
use slidegrade_core::engine::{Grader, ProgressReporter};
use slidegrade_core::parser;
use slidegrade_core::report::GradingReport;
use slidegrade_core::results::ScoringResult;

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_document_start(&self, path: &Path) {
        eprintln!("  Starting: {}", path.display());
    }

    fn on_document_complete(&self, path: &Path, result: &ScoringResult) {
        let status = if result.is_success { "OK" } else { "FAIL" };
        eprintln!(
            "  Done: {} [{status}] {:.2}/{:.2} ({}ms)",
            path.display(),
            result.achieved_score,
            result.total_score,
            result.duration_ms(),
        );
    }

    fn on_set_complete(&self, total: usize, succeeded: usize, failed: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {succeeded}/{total} graded, {failed} failed ({:.1}s)",
            elapsed.as_secs_f64()
        );
    }
}

/// Expand directories into their `.json` snapshots, sorted by name.
fn collect_documents(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut documents = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found = Vec::new();
            for entry in std::fs::read_dir(input)
                .with_context(|| format!("failed to read directory: {}", input.display()))?
            {
                let path = entry?.path();
                if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                    found.push(path);
                }
            }
            found.sort();
            if found.is_empty() {
                tracing::warn!("no .json documents in {}", input.display());
            }
            documents.extend(found);
        } else {
            documents.push(input.clone());
        }
    }
    Ok(documents)
}

pub async fn execute(
    exam_path: PathBuf,
    inputs: Vec<PathBuf>,
    parallelism: Option<usize>,
    output: PathBuf,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(
        matches!(format.as_str(), "json" | "markdown" | "all"),
        "unknown format: {format} (expected json, markdown or all)"
    );
    if let Some(p) = parallelism {
        anyhow::ensure!(p >= 1, "parallelism must be at least 1");
    }

    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(p) = parallelism {
        config.parallelism = p;
    }

    let exam = parser::parse_exam(&exam_path)?;
    let documents = collect_documents(&inputs)?;
    anyhow::ensure!(!documents.is_empty(), "no documents to grade");

    eprintln!(
        "slidegrade v{}: grading {} documents against {} ({} at a time)",
        env!("CARGO_PKG_VERSION"),
        documents.len(),
        exam.name,
        config.parallelism
    );
    eprintln!();

    let grader = Grader::json(config);
    let start = Instant::now();
    let scores = grader
        .score_documents(&documents, &exam, &ConsoleReporter)
        .await;
    let report = GradingReport::new(&exam, scores, start.elapsed().as_millis() as u64);

    print_summary(&report);

    std::fs::create_dir_all(&output)
        .with_context(|| format!("failed to create output directory: {}", output.display()))?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
    if matches!(format.as_str(), "json" | "all") {
        let path = output.join(format!("report-{timestamp}.json"));
        report.save_json(&path)?;
        eprintln!("JSON report: {}", path.display());
    }
    if matches!(format.as_str(), "markdown" | "all") {
        let path = output.join(format!("report-{timestamp}.md"));
        std::fs::write(&path, report.to_markdown())
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        eprintln!("Markdown report: {}", path.display());
    }

    Ok(())
}

fn print_summary(report: &GradingReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Document", "Score", "Total", "Percent", "Correct", "Errors"]);

    for doc in &report.documents {
        let r = &doc.result;
        table.add_row(vec![
            Cell::new(doc.path.display()),
            Cell::new(format!("{:.2}", r.achieved_score)),
            Cell::new(format!("{:.2}", r.total_score)),
            Cell::new(format!("{:.1}%", r.ratio() * 100.0)),
            Cell::new(format!("{}/{}", r.correct_count(), r.knowledge_point_results.len())),
            Cell::new(r.error_count()),
        ]);
    }

    eprintln!("\n{table}");
}
