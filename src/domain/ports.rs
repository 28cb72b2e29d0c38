use crate::domain::model::{LintReport, SourceFile};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn sources(&self) -> &[String];
    fn style_path(&self) -> &str;
    /// `None` prints the report to stdout.
    fn output_path(&self) -> Option<&str>;
    fn report_format(&self) -> ReportFormat;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Csv,
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<SourceFile>>;
    async fn transform(&self, sources: Vec<SourceFile>) -> Result<LintReport>;
    async fn load(&self, report: LintReport) -> Result<String>;
}
