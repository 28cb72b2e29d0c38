use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::ProcessMonitor;

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub files: usize,
    pub findings: usize,
    pub destination: String,
}

impl RunSummary {
    /// Process exit code for a successful run; findings only fail it on request.
    pub fn exit_code(&self, fail_on_findings: bool) -> i32 {
        if fail_on_findings && self.findings > 0 {
            1
        } else {
            0
        }
    }
}

pub struct LintEngine<P: Pipeline> {
    pipeline: P,
    monitor: ProcessMonitor,
}

impl<P: Pipeline> LintEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: ProcessMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("Starting lint run");
        self.monitor.log_stats("Start");

        tracing::info!("Reading sources...");
        let sources = self.pipeline.extract().await?;
        tracing::info!("Read {} source files", sources.len());
        self.monitor.log_stats("Extract");

        tracing::info!("Checking style...");
        let report = self.pipeline.transform(sources).await?;
        let files = report.files.len();
        let findings = report.total_findings();
        tracing::info!("Found {} problems in {} files", findings, files);
        self.monitor.log_stats("Transform");

        tracing::info!("Writing report...");
        let destination = self.pipeline.load(report).await?;
        tracing::info!("Report written to: {}", destination);
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(RunSummary {
            files,
            findings,
            destination,
        })
    }
}
