//! Batch evaluator: grades one document against a list of operation points.
//!
//! A batch moves through `UnopenedBatch -> OpenBatch -> EvaluatedBatch ->
//! ScoringResult`. Opening failures short-circuit to a result set where
//! every point is marked `DocumentInvalid`; faults inside a single detector
//! are caught and recorded on that point only. Nothing escapes a batch.
//!
//! [`Grader`] wraps the pipeline and adds the async entry points used to
//! grade many documents concurrently.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;

use crate::config::GradingConfig;
use crate::document::Document;
use crate::error::GradeError;
use crate::loader::JsonDocumentLoader;
use crate::mapping::{KnowledgeTag, NameMapper};
use crate::model::{ExamModel, ModuleType, OperationPoint, Parameter, Question};
use crate::params::{normalize_keys, resolve_wildcards, IndexResolver, Parameters};
use crate::registry::DetectorRegistry;
use crate::report::DocumentScore;
use crate::results::{Detection, KnowledgePointResult, Outcome, ScoringResult};
use crate::scorer::{clamp_total, score};
use crate::traits::DocumentLoader;

/// Weight given to points graded through [`Grader::evaluate_one`].
pub const SINGLE_POINT_WEIGHT: f64 = 1.0;

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_document_start(&self, path: &Path);
    fn on_document_complete(&self, path: &Path, result: &ScoringResult);
    fn on_set_complete(&self, total: usize, succeeded: usize, failed: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_document_start(&self, _: &Path) {}
    fn on_document_complete(&self, _: &Path, _: &ScoringResult) {}
    fn on_set_complete(&self, _: usize, _: usize, _: usize, _: Duration) {}
}

// ---------------------------------------------------------------------------
// Grader
// ---------------------------------------------------------------------------

/// The grading engine. Cheap to clone; clones share loader and registry.
#[derive(Clone)]
pub struct Grader {
    loader: Arc<dyn DocumentLoader>,
    registry: Arc<DetectorRegistry>,
    mapper: NameMapper,
    config: GradingConfig,
}

impl Grader {
    pub fn new(loader: Arc<dyn DocumentLoader>, config: GradingConfig) -> Self {
        Self {
            loader,
            registry: Arc::new(DetectorRegistry::with_defaults()),
            mapper: NameMapper::new(),
            config,
        }
    }

    /// A grader reading JSON document snapshots.
    pub fn json(config: GradingConfig) -> Self {
        Self::new(Arc::new(JsonDocumentLoader::new()), config)
    }

    pub fn with_registry(mut self, registry: DetectorRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    pub fn config(&self) -> &GradingConfig {
        &self.config
    }

    pub fn registry(&self) -> &DetectorRegistry {
        &self.registry
    }

    pub fn mapper(&self) -> &NameMapper {
        &self.mapper
    }

    /// Grade a single knowledge point, named by tag or display name.
    pub fn evaluate_one(
        &self,
        path: &Path,
        knowledge_type: &str,
        params: &[Parameter],
    ) -> KnowledgePointResult {
        let point = OperationPoint {
            parameters: params.to_vec(),
            ..OperationPoint::new(knowledge_type, knowledge_type, SINGLE_POINT_WEIGHT)
        };
        let mut results = self.batch(path, vec![&point]).open_and_evaluate().into_results();
        results.pop().unwrap_or_else(|| {
            KnowledgePointResult::errored(
                knowledge_type,
                knowledge_type,
                knowledge_type,
                params.to_vec(),
                SINGLE_POINT_WEIGHT,
                &GradeError::DetectionFault("no result produced".into()),
            )
        })
    }

    /// Grade every enabled point, in order. One result per enabled point.
    pub fn evaluate_batch(&self, path: &Path, points: &[OperationPoint]) -> Vec<KnowledgePointResult> {
        let enabled: Vec<&OperationPoint> = points.iter().filter(|p| p.enabled).collect();
        self.batch(path, enabled).open_and_evaluate().into_results()
    }

    /// Grade a document against the exam's PowerPoint module.
    ///
    /// A missing module is a success with zero score; a module without
    /// enabled points is reported as a failure with a message.
    pub fn score_document(&self, path: &Path, exam: &ExamModel) -> ScoringResult {
        let started_at = Utc::now();
        let Some(module) = exam.module(ModuleType::PowerPoint) else {
            let err = GradeError::ModuleNotFound(ModuleType::PowerPoint);
            tracing::warn!(exam = %exam.id, "{err}");
            return finished(ScoringResult {
                is_success: true,
                error_message: Some(err.to_string()),
                details: err.to_string(),
                started_at,
                ..ScoringResult::empty()
            });
        };
        let (points, question_ids) = enabled_points(&module.questions);
        self.score_points(path, points, &question_ids, started_at)
    }

    /// Grade a document against a single question.
    pub fn score_question(&self, path: &Path, question: &Question) -> ScoringResult {
        let started_at = Utc::now();
        let (points, question_ids) = enabled_points(std::slice::from_ref(question));
        let mut result = self.score_points(path, points, &question_ids, started_at);
        result.question_id = Some(question.id.clone());
        result.question_title = Some(question.title.clone());
        result
    }

    fn score_points(
        &self,
        path: &Path,
        points: Vec<&OperationPoint>,
        question_ids: &HashMap<String, String>,
        started_at: DateTime<Utc>,
    ) -> ScoringResult {
        if points.is_empty() {
            let err = GradeError::NoEnabledPoints;
            tracing::warn!(path = %path.display(), "{err}");
            return finished(ScoringResult {
                error_message: Some(err.to_string()),
                details: err.to_string(),
                started_at,
                ..ScoringResult::empty()
            });
        }
        let mut result = self
            .batch(path, points)
            .open_and_evaluate()
            .aggregate(question_ids);
        result.started_at = started_at;
        tracing::info!(
            path = %path.display(),
            achieved = result.achieved_score,
            total = result.total_score,
            "document graded"
        );
        result
    }

    fn batch<'a>(&'a self, path: &'a Path, points: Vec<&'a OperationPoint>) -> UnopenedBatch<'a> {
        UnopenedBatch {
            grader: self,
            path,
            points,
            started_at: Utc::now(),
        }
    }

    /// [`score_document`](Self::score_document) on a blocking worker, with
    /// the configured timeout. A timeout marks the document invalid.
    pub async fn score_document_async(&self, path: PathBuf, exam: Arc<ExamModel>) -> ScoringResult {
        let grader = self.clone();
        let task_path = path.clone();
        let task_exam = Arc::clone(&exam);
        let task =
            tokio::task::spawn_blocking(move || grader.score_document(&task_path, &task_exam));

        let joined = match self.config.document_timeout() {
            Some(limit) => match tokio::time::timeout(limit, task).await {
                Ok(joined) => joined,
                Err(_) => {
                    let reason = format!("grading timed out after {}s", limit.as_secs());
                    return self.invalid_document(&path, &exam, reason);
                }
            },
            None => task.await,
        };
        match joined {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(path = %path.display(), "grading task failed: {e}");
                self.invalid_document(&path, &exam, format!("grading task failed: {e}"))
            }
        }
    }

    /// Grade many documents concurrently, bounded by `parallelism`.
    /// Results come back in input order.
    pub async fn score_documents(
        &self,
        paths: &[PathBuf],
        exam: &ExamModel,
        progress: &dyn ProgressReporter,
    ) -> Vec<DocumentScore> {
        let start = Instant::now();
        let exam = Arc::new(exam.clone());
        let semaphore = Arc::new(Semaphore::new(self.config.parallelism.max(1)));
        let mut futures = FuturesUnordered::new();

        for (index, path) in paths.iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let exam = Arc::clone(&exam);
            let path = path.clone();
            futures.push(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                progress.on_document_start(&path);
                let result = self.score_document_async(path.clone(), exam).await;
                (index, path, result)
            });
        }

        let mut scores = Vec::with_capacity(paths.len());
        let mut succeeded = 0usize;
        let mut failed = 0usize;
        while let Some((index, path, result)) = futures.next().await {
            progress.on_document_complete(&path, &result);
            if result.is_success {
                succeeded += 1;
            } else {
                failed += 1;
            }
            scores.push((index, DocumentScore { path, result }));
        }
        progress.on_set_complete(paths.len(), succeeded, failed, start.elapsed());

        scores.sort_by_key(|(index, _)| *index);
        scores.into_iter().map(|(_, s)| s).collect()
    }

    /// Every enabled PowerPoint point marked `DocumentInvalid`.
    fn invalid_document(&self, path: &Path, exam: &ExamModel, reason: String) -> ScoringResult {
        let err = GradeError::DocumentInvalid {
            path: path.display().to_string(),
            reason,
        };
        tracing::warn!("{err}");
        let (points, question_ids) = exam
            .module(ModuleType::PowerPoint)
            .map(|m| enabled_points(&m.questions))
            .unwrap_or_default();
        EvaluatedBatch::invalid(&points, err, Utc::now()).aggregate(&question_ids)
    }

    fn evaluate_point(&self, doc: &Document, path: &Path, point: &OperationPoint) -> KnowledgePointResult {
        let tag = self.mapper.map(&point.name);
        let raw = Parameters::from_params(&point.parameters);
        let params = if self.config.normalize_parameter_keys {
            normalize_keys(tag.known(), &raw)
        } else {
            raw
        };
        let mut resolver = IndexResolver::new(&format!("{}#{}", path.display(), point.id));
        let params = resolve_wildcards(&params, doc, &mut resolver);
        if !resolver.resolved().is_empty() {
            tracing::debug!(
                id = %point.id,
                context = resolver.context_id(),
                resolved = ?resolver.resolved(),
                "wildcard indexes resolved"
            );
        }

        let detection = catch_unwind(AssertUnwindSafe(|| {
            self.registry.dispatch(doc, &tag, &params)
        }))
        .unwrap_or_else(|payload| Err(GradeError::DetectionFault(panic_message(&payload))));

        match detection {
            Ok(detection) => {
                let result = self.graded(point, &tag, detection);
                tracing::debug!(
                    id = %point.id,
                    tag = %tag,
                    outcome = %result.outcome,
                    achieved = result.achieved_score,
                    "point graded"
                );
                result
            }
            Err(err) => {
                match &err {
                    GradeError::DetectionFault(msg) => {
                        tracing::error!(id = %point.id, tag = %tag, "detector fault: {msg}")
                    }
                    other => tracing::debug!(id = %point.id, tag = %tag, "point errored: {other}"),
                }
                KnowledgePointResult::errored(
                    tag.to_string(),
                    &point.id,
                    &point.name,
                    point.parameters.clone(),
                    clamp_total(point.score),
                    &err,
                )
            }
        }
    }

    fn graded(&self, point: &OperationPoint, tag: &KnowledgeTag, d: Detection) -> KnowledgePointResult {
        let total = clamp_total(point.score);
        let achieved = score(&d, total, self.config.unverifiable_credit);
        KnowledgePointResult {
            knowledge_type: tag.to_string(),
            knowledge_point_id: point.id.clone(),
            name: point.name.clone(),
            parameters: point.parameters.clone(),
            expected_value: d.expected,
            actual_value: d.actual,
            is_correct: d.outcome == Outcome::Matched,
            outcome: d.outcome,
            achieved_score: achieved,
            total_score: total,
            details: d.details,
            question_id: None,
            error_message: None,
            error_kind: None,
        }
    }
}

fn panic_message(payload: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "detector panicked".to_string()
    }
}

/// Enabled points of `questions` in order, plus point id -> question id.
fn enabled_points(questions: &[Question]) -> (Vec<&OperationPoint>, HashMap<String, String>) {
    let mut points = Vec::new();
    let mut question_ids = HashMap::new();
    for question in questions {
        for point in question.operation_points.iter().filter(|p| p.enabled) {
            question_ids
                .entry(point.id.clone())
                .or_insert_with(|| question.id.clone());
            points.push(point);
        }
    }
    (points, question_ids)
}

fn finished(mut result: ScoringResult) -> ScoringResult {
    result.finished_at = Utc::now();
    result
}

// ---------------------------------------------------------------------------
// Batch states
// ---------------------------------------------------------------------------

/// A batch whose document has not been opened yet.
pub struct UnopenedBatch<'a> {
    grader: &'a Grader,
    path: &'a Path,
    points: Vec<&'a OperationPoint>,
    started_at: DateTime<Utc>,
}

impl<'a> UnopenedBatch<'a> {
    /// Open the document. On failure the batch is already evaluated, with
    /// every point marked `DocumentInvalid`.
    pub fn open(self) -> Result<OpenBatch<'a>, EvaluatedBatch> {
        match self.grader.loader.open_read_only(self.path) {
            Ok(document) => Ok(OpenBatch {
                grader: self.grader,
                path: self.path,
                points: self.points,
                document,
                started_at: self.started_at,
            }),
            Err(e) => {
                let err = GradeError::DocumentInvalid {
                    path: self.path.display().to_string(),
                    reason: format!("{e:#}"),
                };
                tracing::warn!(loader = self.grader.loader.name(), "{err}");
                Err(EvaluatedBatch::invalid(&self.points, err, self.started_at))
            }
        }
    }

    pub fn open_and_evaluate(self) -> EvaluatedBatch {
        match self.open() {
            Ok(open) => open.evaluate(),
            Err(evaluated) => evaluated,
        }
    }
}

/// A batch holding an open document.
pub struct OpenBatch<'a> {
    grader: &'a Grader,
    path: &'a Path,
    points: Vec<&'a OperationPoint>,
    document: Document,
    started_at: DateTime<Utc>,
}

impl OpenBatch<'_> {
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Evaluate every point in input order. The document is released when
    /// this returns.
    pub fn evaluate(self) -> EvaluatedBatch {
        let results = self
            .points
            .iter()
            .map(|point| self.grader.evaluate_point(&self.document, self.path, point))
            .collect();
        EvaluatedBatch {
            results,
            document_error: None,
            started_at: self.started_at,
        }
    }
}

/// Per-point results, ready for aggregation.
pub struct EvaluatedBatch {
    results: Vec<KnowledgePointResult>,
    document_error: Option<GradeError>,
    started_at: DateTime<Utc>,
}

impl EvaluatedBatch {
    fn invalid(points: &[&OperationPoint], err: GradeError, started_at: DateTime<Utc>) -> Self {
        let results = points
            .iter()
            .map(|p| {
                KnowledgePointResult::errored(
                    "DocumentInvalid",
                    &p.id,
                    &p.name,
                    p.parameters.clone(),
                    clamp_total(p.score),
                    &err,
                )
            })
            .collect();
        Self {
            results,
            document_error: Some(err),
            started_at,
        }
    }

    pub fn results(&self) -> &[KnowledgePointResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<KnowledgePointResult> {
        self.results
    }

    /// Sum scores, attach question ids and mark success.
    pub fn aggregate(self, question_ids: &HashMap<String, String>) -> ScoringResult {
        let mut results = self.results;
        for r in &mut results {
            r.question_id = question_ids.get(&r.knowledge_point_id).cloned();
        }
        let total_score: f64 = results.iter().map(|r| r.total_score).sum();
        let achieved_score: f64 = results.iter().map(|r| r.achieved_score).sum();
        let correct = results.iter().filter(|r| r.is_correct).count();
        let errored = results.iter().filter(|r| r.is_errored()).count();
        let details = format!(
            "{correct}/{} knowledge points correct, {errored} errored",
            results.len()
        );
        finished(ScoringResult {
            total_score,
            achieved_score,
            knowledge_point_results: results,
            is_success: self.document_error.is_none(),
            error_message: self.document_error.map(|e| e.to_string()),
            details,
            started_at: self.started_at,
            ..ScoringResult::empty()
        })
    }
}
