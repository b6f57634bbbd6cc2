//! Exam definition parser.
//!
//! Loads exams from TOML or JSON files, and validates them against the
//! detector registry.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::mapping::NameMapper;
use crate::model::{ExamModel, ExamModule, ModuleType, OperationPoint, Parameter, Question};
use crate::registry::DetectorRegistry;

/// Intermediate structure shared by the TOML and JSON exam formats.
#[derive(Debug, Deserialize)]
struct ExamFile {
    exam: ExamHeader,
    #[serde(default)]
    modules: Vec<FileModule>,
}

#[derive(Debug, Deserialize)]
struct ExamHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct FileModule {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default = "default_module_type")]
    module_type: String,
    #[serde(default)]
    questions: Vec<FileQuestion>,
}

fn default_module_type() -> String {
    "powerpoint".to_string()
}

#[derive(Debug, Deserialize)]
struct FileQuestion {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    operation_points: Vec<FilePoint>,
}

#[derive(Debug, Deserialize)]
struct FilePoint {
    id: String,
    name: String,
    #[serde(default = "default_true")]
    enabled: bool,
    #[serde(default)]
    score: f64,
    #[serde(default)]
    parameters: Vec<FileParameter>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct FileParameter {
    name: String,
    value: FileValue,
}

/// Parameter values may be written unquoted; they are kept as text.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FileValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl FileValue {
    fn into_text(self) -> String {
        match self {
            FileValue::Text(s) => s,
            FileValue::Int(i) => i.to_string(),
            FileValue::Float(f) => f.to_string(),
            FileValue::Bool(b) => b.to_string(),
        }
    }
}

/// Exam file encoding, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamFormat {
    Toml,
    Json,
}

impl ExamFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(ExamFormat::Toml),
            Some("json") => Ok(ExamFormat::Json),
            other => anyhow::bail!(
                "unsupported exam format: {} (expected .toml or .json)",
                other.unwrap_or("<none>")
            ),
        }
    }
}

/// Parse an exam file; the format follows the extension.
pub fn parse_exam(path: &Path) -> Result<ExamModel> {
    let format = ExamFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read exam file: {}", path.display()))?;
    parse_exam_str(&content, format, path)
}

/// Parse exam text (useful for testing).
pub fn parse_exam_str(content: &str, format: ExamFormat, source_path: &Path) -> Result<ExamModel> {
    let parsed: ExamFile = match format {
        ExamFormat::Toml => toml::from_str(content)
            .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?,
        ExamFormat::Json => serde_json::from_str(content)
            .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?,
    };

    let modules = parsed
        .modules
        .into_iter()
        .map(|m| {
            let module_type: ModuleType = m
                .module_type
                .parse()
                .map_err(|e: String| anyhow::anyhow!("module {}: {}", m.id, e))?;
            let questions = m
                .questions
                .into_iter()
                .map(|q| Question {
                    id: q.id,
                    title: q.title,
                    operation_points: q
                        .operation_points
                        .into_iter()
                        .map(|p| OperationPoint {
                            id: p.id,
                            name: p.name,
                            module: module_type,
                            enabled: p.enabled,
                            score: p.score,
                            parameters: p
                                .parameters
                                .into_iter()
                                .map(|kv| Parameter::new(kv.name, kv.value.into_text()))
                                .collect(),
                        })
                        .collect(),
                })
                .collect();
            Ok(ExamModule {
                id: m.id,
                name: m.name,
                module_type,
                questions,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let exam = ExamModel {
        id: parsed.exam.id,
        name: parsed.exam.name,
        description: parsed.exam.description,
        modules,
    };
    tracing::debug!(exam = %exam.id, modules = exam.modules.len(), "parsed exam");
    Ok(exam)
}

/// A warning from exam validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning {
    /// The operation point or question ID (if applicable).
    pub item_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn new(item_id: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            item_id: item_id.map(String::from),
            message: message.into(),
        }
    }
}

/// Validate an exam for common authoring issues.
pub fn validate_exam(exam: &ExamModel, registry: &DetectorRegistry) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mapper = NameMapper::new();

    if exam.module(ModuleType::PowerPoint).is_none() {
        warnings.push(ValidationWarning::new(None, "exam has no powerpoint module"));
    }

    let mut seen_ids = HashSet::new();
    for question in exam.modules.iter().flat_map(|m| &m.questions) {
        if !question.operation_points.iter().any(|p| p.enabled) {
            warnings.push(ValidationWarning::new(
                Some(&question.id),
                "question has no enabled operation points",
            ));
        }

        for point in &question.operation_points {
            if !seen_ids.insert(point.id.as_str()) {
                warnings.push(ValidationWarning::new(
                    Some(&point.id),
                    format!("duplicate operation point ID: {}", point.id),
                ));
            }
            if point.score < 0.0 || !point.score.is_finite() {
                warnings.push(ValidationWarning::new(
                    Some(&point.id),
                    format!("score {} will be treated as 0", point.score),
                ));
            }
            if point.module == ModuleType::PowerPoint {
                let tag = mapper.map(&point.name);
                if !registry.supports(&tag) {
                    warnings.push(ValidationWarning::new(
                        Some(&point.id),
                        format!("no detector for '{}' (mapped to {tag})", point.name),
                    ));
                }
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[exam]
id = "ppt-final"
name = "Presentation Final"
description = "Slides practical"

[[modules]]
id = "ppt"
name = "PowerPoint"
type = "powerpoint"

[[modules.questions]]
id = "q1"
title = "Build the deck"

[[modules.questions.operation_points]]
id = "op1"
name = "InsertSlide"
score = 5.0
parameters = [{ name = "ExpectedSlideCount", value = 4 }]

[[modules.questions.operation_points]]
id = "op2"
name = "幻灯片切换效果"
score = 3.0
enabled = false
parameters = [
    { name = "SlideIndexes", value = "1,2" },
    { name = "TransitionType", value = "Fade" },
]
"#;

    fn toml_exam(content: &str) -> ExamModel {
        parse_exam_str(content, ExamFormat::Toml, &PathBuf::from("exam.toml")).unwrap()
    }

    #[test]
    fn parse_valid_toml() {
        let exam = toml_exam(VALID_TOML);
        assert_eq!(exam.id, "ppt-final");
        assert_eq!(exam.modules.len(), 1);
        let points = &exam.modules[0].questions[0].operation_points;
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].parameters[0].value, "4");
        assert!(!points[1].enabled);
        assert_eq!(points[1].parameters[1].name, "TransitionType");
    }

    #[test]
    fn parse_json() {
        let json = r#"{
            "exam": {"id": "e", "name": "E"},
            "modules": [{
                "id": "m", "type": "ppt",
                "questions": [{"id": "q", "operation_points": [
                    {"id": "p", "name": "ApplyTheme", "score": 2.5,
                     "parameters": [{"name": "ThemeName", "value": "Ion"}]}
                ]}]
            }]
        }"#;
        let exam = parse_exam_str(json, ExamFormat::Json, &PathBuf::from("exam.json")).unwrap();
        let point = &exam.modules[0].questions[0].operation_points[0];
        assert_eq!(exam.modules[0].module_type, ModuleType::PowerPoint);
        assert_eq!(point.score, 2.5);
        assert!(point.enabled);
    }

    #[test]
    fn unknown_module_type_fails() {
        let toml = r#"
[exam]
id = "x"
name = "X"

[[modules]]
id = "m"
type = "visio"
"#;
        let err = parse_exam_str(toml, ExamFormat::Toml, &PathBuf::from("x.toml")).unwrap_err();
        assert!(err.to_string().contains("visio"));
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_exam_str(bad, ExamFormat::Toml, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(ExamFormat::from_path(Path::new("a.toml")).unwrap(), ExamFormat::Toml);
        assert_eq!(ExamFormat::from_path(Path::new("a.json")).unwrap(), ExamFormat::Json);
        assert!(ExamFormat::from_path(Path::new("a.yaml")).is_err());
    }

    #[test]
    fn parse_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exam.toml");
        std::fs::write(&path, VALID_TOML).unwrap();
        assert_eq!(parse_exam(&path).unwrap().name, "Presentation Final");
    }

    #[test]
    fn valid_exam_has_no_warnings() {
        let exam = toml_exam(VALID_TOML);
        let warnings = validate_exam(&exam, &DetectorRegistry::with_defaults());
        assert!(warnings.is_empty(), "{warnings:?}");
    }

    #[test]
    fn validate_flags_authoring_issues() {
        let toml = r#"
[exam]
id = "bad"
name = "Bad"

[[modules]]
id = "m"
type = "powerpoint"

[[modules.questions]]
id = "q1"

[[modules.questions.operation_points]]
id = "same"
name = "InsertSlide"
score = -1.0

[[modules.questions.operation_points]]
id = "same"
name = "Make it pretty"
score = 1.0

[[modules.questions]]
id = "q2"

[[modules.questions.operation_points]]
id = "off"
name = "InsertSlide"
enabled = false
"#;
        let warnings = validate_exam(&toml_exam(toml), &DetectorRegistry::with_defaults());
        let messages: Vec<&str> = warnings.iter().map(|w| w.message.as_str()).collect();
        assert!(messages.iter().any(|m| m.contains("duplicate")));
        assert!(messages.iter().any(|m| m.contains("treated as 0")));
        assert!(messages.iter().any(|m| m.contains("no detector")));
        assert!(warnings
            .iter()
            .any(|w| w.item_id.as_deref() == Some("q2") && w.message.contains("no enabled")));
    }

    #[test]
    fn validate_missing_powerpoint_module() {
        let toml = r#"
[exam]
id = "w"
name = "Word only"

[[modules]]
id = "m"
type = "word"
"#;
        let warnings = validate_exam(&toml_exam(toml), &DetectorRegistry::with_defaults());
        assert!(warnings.iter().any(|w| w.message.contains("no powerpoint module")));
    }
}
