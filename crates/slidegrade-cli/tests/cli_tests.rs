//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use slidegrade_core::report::GradingReport;

const EXAM: &str = "../../exams/ppt-basics.toml";
const DECK: &str = "../../decks/quarterly.json";

fn slidegrade() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("slidegrade").unwrap()
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

#[test]
fn validate_sample_exam() {
    slidegrade()
        .arg("validate")
        .arg("--exam")
        .arg(EXAM)
        .assert()
        .success()
        .stdout(predicate::str::contains("Presentation Basics (7 points)"))
        .stdout(predicate::str::contains("Exam is valid"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("exam.toml");
    std::fs::write(
        &path,
        r#"
[exam]
id = "w"
name = "Warnings"

[[modules]]
id = "m"
type = "powerpoint"

[[modules.questions]]
id = "q1"

[[modules.questions.operation_points]]
id = "p1"
name = "Make it sparkle"
score = 1.0
"#,
    )
    .unwrap();

    slidegrade()
        .arg("validate")
        .arg("--exam")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("[p1] WARNING: no detector"))
        .stdout(predicate::str::contains("1 warning(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    slidegrade()
        .arg("validate")
        .arg("--exam")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn score_text_output() {
    slidegrade()
        .arg("score")
        .arg("--exam")
        .arg(EXAM)
        .arg("--document")
        .arg(DECK)
        .assert()
        .success()
        .stdout(predicate::str::contains("11.00/13.00"))
        .stdout(predicate::str::contains("5/7 knowledge points correct"));
}

#[test]
fn score_json_output() {
    let result = stdout_json(
        slidegrade()
            .arg("score")
            .arg("--exam")
            .arg(EXAM)
            .arg("--document")
            .arg(DECK)
            .arg("--format")
            .arg("json"),
    );
    assert_eq!(result["is_success"], true);
    assert_eq!(result["total_score"], 13.0);
    assert_eq!(result["achieved_score"], 11.0);
    let points = result["knowledge_point_results"].as_array().unwrap();
    assert_eq!(points.len(), 7);
    assert_eq!(points[3]["knowledge_type"], "InsertTextContent");
    assert_eq!(points[3]["details"], "found on slide 2");
    assert_eq!(points[4]["achieved_score"], 2.0);
}

#[test]
fn score_single_question() {
    let result = stdout_json(
        slidegrade()
            .arg("score")
            .arg("--exam")
            .arg(EXAM)
            .arg("--document")
            .arg(DECK)
            .arg("--question")
            .arg("q1")
            .arg("--format")
            .arg("json"),
    );
    assert_eq!(result["question_id"], "q1");
    assert_eq!(result["total_score"], 5.0);
    assert_eq!(result["achieved_score"], 5.0);
}

#[test]
fn score_unknown_question() {
    slidegrade()
        .arg("score")
        .arg("--exam")
        .arg(EXAM)
        .arg("--document")
        .arg(DECK)
        .arg("--question")
        .arg("q9")
        .assert()
        .failure()
        .stderr(predicate::str::contains("question 'q9' not found"));
}

#[test]
fn score_missing_document_marks_every_point() {
    let result = stdout_json(
        slidegrade()
            .arg("score")
            .arg("--exam")
            .arg(EXAM)
            .arg("--document")
            .arg("no_such_deck.json")
            .arg("--format")
            .arg("json"),
    );
    assert_eq!(result["is_success"], false);
    assert_eq!(result["achieved_score"], 0.0);
    let points = result["knowledge_point_results"].as_array().unwrap();
    assert_eq!(points.len(), 7);
    assert!(points.iter().all(|p| p["error_kind"] == "document_invalid"));
}

#[test]
fn score_markdown_output() {
    slidegrade()
        .arg("score")
        .arg("--exam")
        .arg(EXAM)
        .arg("--document")
        .arg(DECK)
        .arg("--format")
        .arg("markdown")
        .assert()
        .success()
        .stdout(predicate::str::contains("# Grading report: Presentation Basics"))
        .stdout(predicate::str::contains("| SlideTransitionEffect |"));
}

#[test]
fn detect_by_tag() {
    slidegrade()
        .arg("detect")
        .arg("--document")
        .arg(DECK)
        .arg("--knowledge-type")
        .arg("InsertSlide")
        .arg("--param")
        .arg("ExpectedSlideCount=4")
        .assert()
        .success()
        .stdout(predicate::str::contains("InsertSlide: not matched"));
}

#[test]
fn detect_by_display_name_json() {
    let result = stdout_json(
        slidegrade()
            .arg("detect")
            .arg("--document")
            .arg(DECK)
            .arg("--knowledge-type")
            .arg("幻灯片切换效果")
            .arg("--param")
            .arg("SlideNumbers=1,2")
            .arg("--param")
            .arg("TransitionEffect=fade")
            .arg("--format")
            .arg("json"),
    );
    assert_eq!(result["knowledge_type"], "SlideTransitionEffect");
    assert_eq!(result["outcome"], "matched");
    assert_eq!(result["is_correct"], true);
}

#[test]
fn detect_unsupported_type() {
    let result = stdout_json(
        slidegrade()
            .arg("detect")
            .arg("--document")
            .arg(DECK)
            .arg("--knowledge-type")
            .arg("Rotate the moon")
            .arg("--format")
            .arg("json"),
    );
    assert_eq!(result["error_kind"], "unsupported_knowledge_type");
}

#[test]
fn detect_rejects_malformed_param() {
    slidegrade()
        .arg("detect")
        .arg("--document")
        .arg(DECK)
        .arg("--knowledge-type")
        .arg("InsertSlide")
        .arg("--param")
        .arg("ExpectedSlideCount")
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected NAME=VALUE"));
}

#[test]
fn batch_writes_reports() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("results");

    slidegrade()
        .arg("batch")
        .arg("--exam")
        .arg(EXAM)
        .arg("--output")
        .arg(&output)
        .arg("--format")
        .arg("all")
        .arg("../../decks")
        .arg("missing.json")
        .assert()
        .success()
        .stderr(predicate::str::contains("Complete: 1/2 graded, 1 failed"));

    let mut files: Vec<_> = std::fs::read_dir(&output)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    files.sort();
    assert_eq!(files.len(), 2);
    let json = files.iter().find(|p| p.extension().unwrap() == "json").unwrap();
    let report = GradingReport::load_json(json).unwrap();
    assert_eq!(report.documents.len(), 2);
    assert_eq!(report.documents[0].result.achieved_score, 11.0);
    assert!(!report.documents[1].result.is_success);
    assert_eq!(report.aggregate.documents.succeeded, 1);
}

#[test]
fn batch_rejects_zero_parallelism() {
    slidegrade()
        .arg("batch")
        .arg("--exam")
        .arg(EXAM)
        .arg("--parallelism")
        .arg("0")
        .arg(DECK)
        .assert()
        .failure()
        .stderr(predicate::str::contains("parallelism must be at least 1"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    slidegrade()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created slidegrade.toml"))
        .stdout(predicate::str::contains("Created exams/example.toml"))
        .stdout(predicate::str::contains("Created decks/example.json"));

    assert!(dir.path().join("slidegrade.toml").exists());
    assert!(dir.path().join("exams/example.toml").exists());
    assert!(dir.path().join("decks/example.json").exists());
}

#[test]
fn init_output_grades_cleanly() {
    let dir = TempDir::new().unwrap();

    slidegrade()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    slidegrade()
        .current_dir(dir.path())
        .arg("score")
        .arg("--exam")
        .arg("exams/example.toml")
        .arg("--document")
        .arg("decks/example.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("11.00/13.00"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    // First init
    slidegrade()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    // Second init should skip
    slidegrade()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn help_output() {
    slidegrade()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rubric grader for presentation documents"));
}

#[test]
fn version_output() {
    slidegrade()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("slidegrade"));
}
