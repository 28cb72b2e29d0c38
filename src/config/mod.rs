pub mod cli;
pub mod style_config;

#[cfg(feature = "cli")]
pub use args::{CheckArgs, Cli, Command};

#[cfg(feature = "cli")]
mod args {
    use crate::core::errors_checker::BracketStrategy;
    use crate::core::{ConfigProvider, ReportFormat};
    use crate::utils::error::Result;
    use crate::utils::validation::{validate_file_extensions, validate_path, Validate};
    use clap::{Args, Parser, Subcommand};

    #[derive(Debug, Clone, Parser)]
    #[command(name = "cslint")]
    #[command(about = "A style linter for C# source files")]
    pub struct Cli {
        #[command(subcommand)]
        pub command: Command,

        #[arg(short, long, global = true, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, global = true, help = "Write logs as JSON")]
        pub log_json: bool,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// Check C# files against a style file
        Check(CheckArgs),
        /// Print the control-flow walkthrough of the bundled sample
        Tour,
    }

    #[derive(Debug, Clone, Args)]
    pub struct CheckArgs {
        #[arg(default_value = "example.cs")]
        pub sources: Vec<String>,

        #[arg(short = 'c', long = "config", default_value = "default.style")]
        pub style: String,

        #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
        pub format: ReportFormat,

        #[arg(short, long, help = "Write the report here instead of stdout")]
        pub output: Option<String>,

        #[arg(long, value_enum, help = "Overrides the style file's bracket_strategy")]
        pub bracket_strategy: Option<BracketStrategy>,

        #[arg(long, help = "Log CPU and memory after each phase")]
        pub monitor: bool,

        #[arg(long, help = "Exit with code 1 when anything was found")]
        pub fail_on_findings: bool,
    }

    impl ConfigProvider for CheckArgs {
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

    impl Validate for CheckArgs {
        fn validate(&self) -> Result<()> {
            validate_path("config", &self.style)?;
            validate_file_extensions("sources", &self.sources, &["cs"])?;
            if let Some(output) = &self.output {
                validate_path("output", output)?;
            }
            Ok(())
        }
    }

}
