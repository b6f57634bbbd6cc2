//! The `slidegrade detect` command.

use std::path::PathBuf;

use anyhow::Result;

use slidegrade_core::model::Parameter;

/// Parse `Name=Value` pairs, keeping their order.
fn parse_params(raw: &[String]) -> Result<Vec<Parameter>> {
    raw.iter()
        .map(|p| {
            let (name, value) = p
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("invalid parameter '{p}': expected NAME=VALUE"))?;
            anyhow::ensure!(!name.trim().is_empty(), "invalid parameter '{p}': empty name");
            Ok(Parameter::new(name.trim(), value))
        })
        .collect()
}

pub fn execute(
    document: PathBuf,
    knowledge_type: String,
    raw_params: Vec<String>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let params = parse_params(&raw_params)?;
    let grader = super::grader(config_path.as_deref())?;
    let result = grader.evaluate_one(&document, &knowledge_type, &params);

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        "text" => {
            println!("{}", super::results_table(std::slice::from_ref(&result)));
            println!("{}: {}", result.knowledge_type, result.outcome);
        }
        other => anyhow::bail!("unknown format: {other} (expected text or json)"),
    }

    Ok(())
}
