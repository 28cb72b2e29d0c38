use anyhow::Context;
use clap::Parser;
use cslint::core::tour;
use cslint::utils::{logger, validation::Validate};
use cslint::{CheckArgs, Cli, Command, LintEngine, LintError, LintPipeline, LocalStorage, StyleConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    match cli.command {
        Command::Tour => {
            let stdout = std::io::stdout();
            tour::run_tour(&mut stdout.lock()).context("writing the tour to stdout")?;
        }
        Command::Check(args) => {
            let code = check(args).await;
            if code != 0 {
                std::process::exit(code);
            }
        }
    }

    Ok(())
}

fn report_failure(e: &LintError) -> i32 {
    tracing::error!(
        "Lint run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("{}", e.user_friendly_message());
    eprintln!("Suggestion: {}", e.recovery_suggestion());
    e.exit_code()
}

async fn check(args: CheckArgs) -> i32 {
    tracing::info!("Starting cslint check");
    tracing::debug!("Check args: {:?}", args);

    if let Err(e) = args.validate() {
        return report_failure(&e);
    }

    let mut style = match StyleConfig::from_file(&args.style).and_then(|style| {
        style.validate()?;
        Ok(style)
    }) {
        Ok(style) => style,
        Err(e) => return report_failure(&e),
    };
    if let Some(strategy) = args.bracket_strategy {
        style.bracket_strategy = Some(strategy);
    }
    tracing::info!("Style '{}' enables {} rules", args.style, style.enabled_rules());

    let monitor_enabled = args.monitor;
    if monitor_enabled {
        tracing::info!("Process monitoring enabled");
    }
    let fail_on_findings = args.fail_on_findings;

    let pipeline = LintPipeline::new(LocalStorage::new("."), args, style);
    let engine = LintEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(summary) => {
            tracing::info!(
                "Checked {} files, {} findings, report: {}",
                summary.files,
                summary.findings,
                summary.destination
            );
            summary.exit_code(fail_on_findings)
        }
        Err(e) => report_failure(&e),
    }
}
