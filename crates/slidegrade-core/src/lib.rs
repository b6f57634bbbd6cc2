//! slidegrade-core: knowledge-point detection engine and scoring.
//!
//! This crate maps rubric items to detectors, inspects a read-only
//! presentation document tree, and turns each check into an immutable,
//! explainable result.

pub mod config;
pub mod detectors;
pub mod document;
pub mod engine;
pub mod error;
pub mod loader;
pub mod mapping;
pub mod model;
pub mod navigator;
pub mod normalize;
pub mod params;
pub mod parser;
pub mod registry;
pub mod report;
pub mod results;
pub mod scorer;
pub mod statistics;
pub mod traits;
