//! Exam data model types.
//!
//! An exam is authored externally and handed to the grader as-is: modules
//! group questions, questions group operation points, and each operation
//! point is one gradable rubric item.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single named parameter of an operation point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name (exact, case-sensitive).
    pub name: String,
    /// Raw string value.
    pub value: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One gradable rubric item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationPoint {
    /// Unique identifier for this operation point.
    pub id: String,
    /// Display name, mapped to a knowledge type by the name mapper.
    pub name: String,
    /// Module this point belongs to.
    #[serde(default)]
    pub module: ModuleType,
    /// Disabled points are not evaluated.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Score weight.
    #[serde(default)]
    pub score: f64,
    /// Ordered parameters.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

impl OperationPoint {
    pub fn new(id: impl Into<String>, name: impl Into<String>, score: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            module: ModuleType::PowerPoint,
            enabled: true,
            score,
            parameters: Vec::new(),
        }
    }

    /// Append a parameter, builder style.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push(Parameter::new(name, value));
        self
    }
}

fn default_true() -> bool {
    true
}

/// An exam question: a titled, ordered list of operation points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub operation_points: Vec<OperationPoint>,
}

/// A group of questions for one application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamModule {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub module_type: ModuleType,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// A complete exam definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamModel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub modules: Vec<ExamModule>,
}

impl ExamModel {
    /// First module of the given type.
    pub fn module(&self, module_type: ModuleType) -> Option<&ExamModule> {
        self.modules.iter().find(|m| m.module_type == module_type)
    }
}

/// Application a module or operation point targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
    #[default]
    PowerPoint,
    Word,
    Excel,
    Windows,
    CSharp,
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleType::PowerPoint => write!(f, "powerpoint"),
            ModuleType::Word => write!(f, "word"),
            ModuleType::Excel => write!(f, "excel"),
            ModuleType::Windows => write!(f, "windows"),
            ModuleType::CSharp => write!(f, "csharp"),
        }
    }
}

impl FromStr for ModuleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "powerpoint" | "ppt" | "pptx" => Ok(ModuleType::PowerPoint),
            "word" | "docx" => Ok(ModuleType::Word),
            "excel" | "xlsx" => Ok(ModuleType::Excel),
            "windows" => Ok(ModuleType::Windows),
            "csharp" | "c#" => Ok(ModuleType::CSharp),
            other => Err(format!("unknown module type: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_type_display_and_parse() {
        assert_eq!(ModuleType::PowerPoint.to_string(), "powerpoint");
        assert_eq!("PPT".parse::<ModuleType>().unwrap(), ModuleType::PowerPoint);
        assert_eq!("pptx".parse::<ModuleType>().unwrap(), ModuleType::PowerPoint);
        assert_eq!("c#".parse::<ModuleType>().unwrap(), ModuleType::CSharp);
        assert!("visio".parse::<ModuleType>().is_err());
    }

    #[test]
    fn operation_point_builder() {
        let op = OperationPoint::new("op1", "InsertSlide", 5.0)
            .with_param("ExpectedSlideCount", "4");
        assert!(op.enabled);
        assert_eq!(op.parameters.len(), 1);
        assert_eq!(op.parameters[0].name, "ExpectedSlideCount");
    }

    #[test]
    fn operation_point_serde_defaults() {
        let json = r#"{"id":"op1","name":"InsertSlide"}"#;
        let op: OperationPoint = serde_json::from_str(json).unwrap();
        assert!(op.enabled);
        assert_eq!(op.score, 0.0);
        assert_eq!(op.module, ModuleType::PowerPoint);
    }

    #[test]
    fn exam_module_lookup() {
        let exam = ExamModel {
            id: "e".into(),
            name: "E".into(),
            description: String::new(),
            modules: vec![ExamModule {
                id: "m".into(),
                name: "Word".into(),
                module_type: ModuleType::Word,
                questions: vec![],
            }],
        };
        assert!(exam.module(ModuleType::PowerPoint).is_none());
        assert!(exam.module(ModuleType::Word).is_some());
    }
}
