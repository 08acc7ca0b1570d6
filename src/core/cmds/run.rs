use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use chrono::Utc;
use log::{info, warn};

use crate::core::cli::RunArgs;
use crate::core::executor::CommandExecutor;
use crate::core::report::{ReportFormat, render, write_report};
use crate::core::runner::{CoverageSettings, RunOptions, Runner};
use crate::types::config::Config;
use crate::types::{AppError, AppResult, RunSummary};

pub async fn execute_run<E: CommandExecutor>(
    args: &RunArgs,
    cfg: &Config,
    executor: E,
    running: Arc<AtomicBool>,
) -> AppResult<RunSummary> {
    // Validate everything up front so a bad flag fails before any tests run
    let format = ReportFormat::from_str(&args.format)
        .map_err(|_| AppError::Config(format!("unknown report format '{}'", args.format)))?;
    let coverage_settings = if args.coverage {
        Some(CoverageSettings::from_config(&cfg.coverage())?)
    } else {
        None
    };

    let test = cfg.test();
    let options = RunOptions {
        test_cmd: test.cmd().to_string(),
        verbose_flag: test.verbose_flag().to_string(),
        verbose: args.verbose,
        timeout: cfg.test_timeout(),
        show_progress: !args.verbose && console::user_attended_stderr(),
    };
    let runner = Runner::new(cfg.registry()?, executor, options)?.with_running_flag(running);

    let outcome = runner.run(args.category.as_slice()).await;

    let coverage = match &coverage_settings {
        Some(_) if outcome.interrupted => {
            warn!("Skipping coverage because the run was interrupted");
            None
        }
        Some(settings) => Some(runner.run_coverage(args.category.as_slice(), settings).await?),
        None => None,
    };

    let summary = RunSummary::aggregate(outcome.results, coverage, outcome.interrupted);
    let report = render(format, &summary, Utc::now())?;
    print!("{report}");
    if format == ReportFormat::Json {
        println!();
    }

    if let Some(output) = &args.output {
        write_report(Path::new(output), &report)?;
        info!("Report written to {output}");
    }

    info!(
        "{} of {} categories passed ({:.1}%)",
        summary.summary.passed, summary.summary.total, summary.summary.success_rate
    );

    Ok(summary)
}
