use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// All relative paths will be interpreted relative to this directory.
    /// All child processes will be run in this directory.
    #[arg(long, global = true)]
    pub cwd: Option<String>,

    /// Logging level (overrides config). One of: trace, debug, info, warn, error
    #[arg(long = "log.level", global = true)]
    pub log_level: Option<String>,

    /// Logging color control: "on" to force colors, "off" to disable; omit for auto
    #[arg(long = "log.color", global = true)]
    pub log_color: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write an example suiterun.toml into the current directory
    Init,

    /// Run test categories and report the results
    Run(RunArgs),

    /// Print information about categories and configuration
    Print {
        #[command(subcommand)]
        command: PrintArgs,
    },
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Category to run: unit, integration, api, database, security,
    /// performance, or "all". Repeat or comma-separate to run several.
    /// Defaults to all categories.
    #[arg(long, value_delimiter = ',')]
    pub category: Vec<String>,

    /// Pass the test tool's verbosity flag and log captured output
    #[arg(long)]
    pub verbose: bool,

    /// Also measure coverage across the selected categories and check it
    /// against the configured threshold
    #[arg(long)]
    pub coverage: bool,

    /// Write the rendered report to this path
    #[arg(long)]
    pub output: Option<String>,

    /// Report format: "text" (default) or "json"
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Test command run once per category with the category pattern appended.
    /// Replaces config [test].cmd if provided.
    #[arg(long = "test.cmd")]
    pub test_cmd: Option<String>,

    /// Per-category timeout in seconds (0 disables it).
    /// Replaces config [test].timeout if provided.
    #[arg(long = "test.timeout")]
    pub test_timeout: Option<u32>,

    /// Minimum total coverage percentage.
    /// Replaces config [coverage].threshold if provided.
    #[arg(long = "coverage.threshold")]
    pub coverage_threshold: Option<f64>,
}

/// Arguments for the print command
#[derive(Subcommand, Debug)]
pub enum PrintArgs {
    /// List the configured categories and the files each pattern matches
    Categories(PrintCategoriesArgs),

    /// Print the effective configuration
    Config(PrintConfigArgs),
}

/// Arguments for the print categories subcommand
#[derive(Parser, Debug)]
pub struct PrintCategoriesArgs {
    /// Output format: "table" (default) or "json"
    #[arg(long, default_value = "table")]
    pub format: String,
}

/// Arguments for the print config subcommand
#[derive(Parser, Debug)]
pub struct PrintConfigArgs {
    /// Output format: "table" (default) or "json"
    #[arg(long, default_value = "table")]
    pub format: String,
}
