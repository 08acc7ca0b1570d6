use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use log::{debug, warn};

use crate::core::cli::{Args, Commands, PrintArgs};
use crate::core::cmds;
use crate::core::executor::ProcessExecutor;
use crate::core::logging::init_logging;
use crate::types::config::{CliOverrides, config, init_with_overrides};
use crate::types::{AppError, AppResult};

/// Parse arguments, run the chosen command and return the process exit code
pub async fn run_main() -> AppResult<i32> {
    let args = Args::parse();

    // Handle global arguments
    if let Some(cwd_arg) = args.cwd.as_ref() {
        let cwd = PathBuf::from(cwd_arg).canonicalize()?;
        env::set_current_dir(&cwd)?;
    }
    let cwd = env::current_dir()?;

    // Build CLI overrides for config precedence
    let mut cli_overrides = CliOverrides {
        log_level: args.log_level.clone(),
        log_color: args.log_color.clone(),
        ..CliOverrides::default()
    };
    if let Commands::Run(run_args) = &args.command {
        cli_overrides.test_cmd = run_args.test_cmd.clone();
        cli_overrides.test_timeout = run_args.test_timeout;
        cli_overrides.coverage_threshold = run_args.coverage_threshold;
    }

    // Initialize configuration (files, then CLI overrides); a bad file stops here
    init_with_overrides(&cli_overrides)?;

    // Initialize logging after config so level/color are applied
    init_logging();
    debug!("Current working directory: {}", cwd.display());

    // Dispatch to appropriate command
    let exit_code = match args.command {
        Commands::Run(run_args) => {
            // Setup running flag to handle signals from ctrl-c
            let running = Arc::new(AtomicBool::new(true));
            let running_ctrlc = Arc::clone(&running);
            ctrlc::set_handler(move || {
                warn!("Received Ctrl-C, finishing the current category..");
                running_ctrlc.store(false, Ordering::SeqCst);
            })
            .map_err(|e| AppError::Custom(format!("Error creating a Ctrl-C handler: {e}")))?;

            let summary =
                cmds::execute_run(&run_args, config(), ProcessExecutor, running).await?;
            summary.exit_code()
        }
        Commands::Init => {
            cmds::execute_init(&cwd)?;
            0
        }
        Commands::Print {
            command: print_args,
        } => {
            let command = match print_args {
                PrintArgs::Categories(args) => cmds::print::PrintCommand::Categories(args.format),
                PrintArgs::Config(args) => cmds::print::PrintCommand::Config(args.format),
            };
            cmds::execute_print(command, config())?;
            0
        }
    };

    Ok(exit_code)
}
