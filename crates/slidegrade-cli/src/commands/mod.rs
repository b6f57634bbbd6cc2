//! Subcommand implementations.

pub mod batch;
pub mod detect;
pub mod init;
pub mod score;
pub mod validate;

use std::path::Path;

use anyhow::Result;
use comfy_table::{Cell, Table};

use slidegrade_core::config::load_config_from;
use slidegrade_core::engine::Grader;
use slidegrade_core::results::KnowledgePointResult;

/// A JSON-snapshot grader built from the resolved configuration.
pub(crate) fn grader(config_path: Option<&Path>) -> Result<Grader> {
    Ok(Grader::json(load_config_from(config_path)?))
}

/// One row per knowledge point.
pub(crate) fn results_table(results: &[KnowledgePointResult]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "Point", "Type", "Outcome", "Score", "Expected", "Actual", "Details",
    ]);
    for r in results {
        let details = r.error_message.as_deref().unwrap_or(&r.details);
        table.add_row(vec![
            Cell::new(&r.knowledge_point_id),
            Cell::new(&r.knowledge_type),
            Cell::new(r.outcome),
            Cell::new(format!("{:.2}/{:.2}", r.achieved_score, r.total_score)),
            Cell::new(&r.expected_value),
            Cell::new(&r.actual_value),
            Cell::new(details),
        ]);
    }
    table
}
