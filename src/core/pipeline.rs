use crate::config::style_config::StyleConfig;
use crate::core::report;
use crate::core::stylecheck::StyleChecker;
use crate::core::tokenizer;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{LintReport, SourceFile};
use crate::utils::error::{LintError, Result};

pub const STDOUT: &str = "stdout";

/// Reads C# sources through `Storage`, lints them and writes the rendered
/// report either to the configured output path or to stdout.
pub struct LintPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    checker: StyleChecker,
}

impl<S: Storage, C: ConfigProvider> LintPipeline<S, C> {
    pub fn new(storage: S, config: C, style: StyleConfig) -> Self {
        Self {
            storage,
            config,
            checker: StyleChecker::new(style),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for LintPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<SourceFile>> {
        let mut sources = Vec::with_capacity(self.config.sources().len());

        for path in self.config.sources() {
            tracing::debug!("Reading source: {}", path);
            let data = self.storage.read_file(path).await.map_err(|e| match e {
                LintError::IoError(io) if io.kind() == std::io::ErrorKind::NotFound => {
                    LintError::MissingSourceError { path: path.clone() }
                }
                other => other,
            })?;
            sources.push(SourceFile {
                path: path.clone(),
                content: String::from_utf8_lossy(&data).into_owned(),
            });
        }

        Ok(sources)
    }

    async fn transform(&self, sources: Vec<SourceFile>) -> Result<LintReport> {
        let mut files = Vec::with_capacity(sources.len());

        for source in sources {
            let lines = tokenizer::lines(&source.content);
            tracing::debug!("{}: {} rows tokenized", source.path, lines.len());

            let file_report = self.checker.report(&source.path, &lines);
            tracing::info!(
                "{}: {} style errors, {} structural errors",
                source.path,
                file_report.style_error_count(),
                file_report.errors.len()
            );
            files.push(file_report);
        }

        Ok(LintReport {
            generated_at: chrono::Utc::now(),
            style_file: self.config.style_path().to_string(),
            files,
        })
    }

    async fn load(&self, report: LintReport) -> Result<String> {
        let rendered = report::render(&report, self.config.report_format())?;

        match self.config.output_path() {
            Some(path) => {
                self.storage.write_file(path, rendered.as_bytes()).await?;
                Ok(path.to_string())
            }
            None => {
                print!("{}", rendered);
                Ok(STDOUT.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ReportFormat;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn put(&self, path: &str, content: &str) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), content.as_bytes().to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                LintError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        sources: Vec<String>,
        output_path: Option<String>,
        format: ReportFormat,
    }

    impl MockConfig {
        fn new(sources: &[&str]) -> Self {
            Self {
                sources: sources.iter().map(|s| s.to_string()).collect(),
                output_path: Some("report.txt".to_string()),
                format: ReportFormat::Text,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn sources(&self) -> &[String] {
            &self.sources
        }

        fn style_path(&self) -> &str {
            "test.style"
        }

        fn output_path(&self) -> Option<&str> {
            self.output_path.as_deref()
        }

        fn report_format(&self) -> ReportFormat {
            self.format
        }
    }

    fn style() -> StyleConfig {
        StyleConfig::from_json_str(r#"{"require_semicolons": true, "max_line_length": 80}"#)
            .unwrap()
    }

    #[tokio::test]
    async fn test_extract_reads_every_source() {
        let storage = MockStorage::new();
        storage.put("a.cs", "int a = 1;\n").await;
        storage.put("b.cs", "int b = 2;\n").await;

        let pipeline = LintPipeline::new(storage, MockConfig::new(&["a.cs", "b.cs"]), style());
        let sources = pipeline.extract().await.unwrap();

        assert_eq!(sources.len(), 2);
        assert_eq!(sources[1].path, "b.cs");
        assert_eq!(sources[1].content, "int b = 2;\n");
    }

    #[tokio::test]
    async fn test_missing_source_is_reported() {
        let pipeline = LintPipeline::new(MockStorage::new(), MockConfig::new(&["gone.cs"]), style());

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, LintError::MissingSourceError { ref path } if path == "gone.cs"));
        assert_eq!(err.exit_code(), 3);
    }

    #[tokio::test]
    async fn test_transform_builds_file_reports() {
        let pipeline = LintPipeline::new(MockStorage::new(), MockConfig::new(&[]), style());
        let sources = vec![SourceFile {
            path: "a.cs".to_string(),
            content: "int a = 1\nint b = 2;\n".to_string(),
        }];

        let report = pipeline.transform(sources).await.unwrap();

        assert_eq!(report.style_file, "test.style");
        assert_eq!(report.files.len(), 1);
        assert_eq!(report.files[0].style[0].name, "require_semicolons");
        assert_eq!(report.total_findings(), 1);
    }

    #[tokio::test]
    async fn test_load_writes_rendered_report() {
        let storage = MockStorage::new();
        storage.put("a.cs", "int a = 1;\n").await;
        let pipeline = LintPipeline::new(storage.clone(), MockConfig::new(&["a.cs"]), style());

        let sources = pipeline.extract().await.unwrap();
        let report = pipeline.transform(sources).await.unwrap();
        let destination = pipeline.load(report).await.unwrap();

        assert_eq!(destination, "report.txt");
        let written = String::from_utf8(storage.get_file("report.txt").await.unwrap()).unwrap();
        assert!(written.contains("Your file: \"a.cs\""));
        assert!(written.contains("Total errors: 0"));
    }
}
