use cslint::core::errors_checker::{self, BracketStrategy};
use cslint::core::{ConfigProvider, ReportFormat};
use cslint::utils::validation::Validate;
use cslint::{LintEngine, LintPipeline, LocalStorage, StyleChecker, StyleConfig};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

struct TestConfig {
    sources: Vec<String>,
    style: String,
    output: Option<String>,
    format: ReportFormat,
}

impl TestConfig {
    fn new(style: &str, output: &str, format: ReportFormat) -> Self {
        Self {
            sources: vec![fixtures().join("example.cs").display().to_string()],
            style: style.to_string(),
            output: Some(output.to_string()),
            format,
        }
    }
}

impl ConfigProvider for TestConfig {
    fn sources(&self) -> &[String] {
        &self.sources
    }

    fn style_path(&self) -> &str {
        &self.style
    }

    fn output_path(&self) -> Option<&str> {
        self.output.as_deref()
    }

    fn report_format(&self) -> ReportFormat {
        self.format
    }
}

const EXPECTED_ANALYSIS: [&str; 7] = [
    "Line 10: local variable 'a' value is not used",
    "Line 90: local variable 'variable' value is not used",
    "Line 19: local variable 'args' value is not used",
    "Line 8: method 'Calculate' is not used",
    "Cyclomatic complexity of the entire code: 6",
    "Function: 'Calculate', cyclomatic complexity: 1",
    "Function: 'Main', cyclomatic complexity: 5",
];

#[tokio::test]
async fn test_end_to_end_text_report() {
    let temp_dir = TempDir::new().unwrap();
    let style = StyleConfig::from_file(fixtures().join("default.style")).unwrap();
    assert!(style.validate().is_ok());

    let storage = LocalStorage::new(temp_dir.path());
    let config = TestConfig::new("default.style", "report.txt", ReportFormat::Text);
    let engine = LintEngine::new_with_monitoring(LintPipeline::new(storage, config, style), false);

    let summary = assert_ok!(engine.run().await);

    assert_eq!(summary.files, 1);
    assert_eq!(summary.destination, "report.txt");
    assert_eq!(summary.exit_code(true), i32::from(summary.findings > 0));
    assert_eq!(summary.exit_code(false), 0);

    let text = std::fs::read_to_string(temp_dir.path().join("report.txt")).unwrap();
    assert!(text.contains("Your style: \"default.style\""));
    assert!(text.contains("CHECKING THE STYLE"));
    assert!(text.contains("ADDITIONAL INFORMATION"));
    assert!(text.contains(&format!("Total errors: {}", summary.findings)));
    for line in EXPECTED_ANALYSIS {
        assert!(text.contains(line), "missing: {}", line);
    }
}

#[tokio::test]
async fn test_end_to_end_json_report_with_toml_style() {
    let temp_dir = TempDir::new().unwrap();
    let style = StyleConfig::from_file(fixtures().join("strict.toml")).unwrap();

    let storage = LocalStorage::new(temp_dir.path());
    let config = TestConfig::new("strict.toml", "out/report.json", ReportFormat::Json);
    let engine = LintEngine::new(LintPipeline::new(storage, config, style));

    assert_ok!(engine.run().await);

    let json = std::fs::read_to_string(temp_dir.path().join("out/report.json")).unwrap();
    let report: serde_json::Value = serde_json::from_str(&json).unwrap();
    let file = &report["files"][0];

    assert_eq!(report["style_file"], "strict.toml");
    assert_eq!(file["errors"].as_array().unwrap().len(), 0);
    assert_eq!(file["style"][0]["name"], "max_line_length");
    assert_eq!(
        file["style"][0]["messages"][0],
        "Line 8: the number of characters in the line has been exceeded (85 > 60)"
    );
    assert_eq!(file["style"][0]["messages"].as_array().unwrap().len(), 8);
    assert_eq!(file["analysis"].as_array().unwrap().len(), EXPECTED_ANALYSIS.len());
}

#[tokio::test]
async fn test_missing_source_fails_the_run() {
    let temp_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp_dir.path());
    let mut config = TestConfig::new("default.style", "report.txt", ReportFormat::Csv);
    config.sources = vec!["absent.cs".to_string()];

    let engine = LintEngine::new(LintPipeline::new(storage, config, StyleConfig::default()));
    let err = assert_err!(engine.run().await);

    assert!(matches!(err, cslint::LintError::MissingSourceError { .. }));
    assert!(!temp_dir.path().join("report.txt").exists());
}

#[test]
fn test_checker_on_fixture_has_no_structural_errors() {
    let code = std::fs::read_to_string(fixtures().join("example.cs")).unwrap();
    let lines = cslint::core::tokenizer::lines(&code);
    let checker = StyleChecker::new(StyleConfig::default());

    let report = checker.check(&lines);

    assert_eq!(report[3], "");
    assert_eq!(report[4], "Total errors: 0");
    assert_eq!(&report[8..], &EXPECTED_ANALYSIS[..]);
}

#[test]
fn test_exact_and_stack_agree_on_fixture() {
    let code = std::fs::read_to_string(fixtures().join("example.cs")).unwrap();
    let lines = cslint::core::tokenizer::lines(&code);

    let exact = errors_checker::check(&lines, BracketStrategy::Exact);
    let stack = errors_checker::check(&lines, BracketStrategy::Stack);

    assert!(exact.is_empty());
    assert_eq!(exact, stack);
}
