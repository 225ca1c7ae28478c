// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info};
use std::io::Write;
use std::path::PathBuf;

use scriptparse::app_config::{self, Config};
use scriptparse::app_controller::Controller;
use scriptparse::errors::AppError;
use scriptparse::persistence;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a screenplay file or a directory of screenplays
    Parse(ParseArgs),

    /// List the screenplay formats that can be parsed
    Formats {
        /// Configuration file path
        #[arg(short, long, default_value = "conf.json")]
        config_path: String,
    },

    /// Generate shell completions for scriptparse
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ParseArgs {
    /// Input PDF/text file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Title stored in the result (defaults to the file name)
    #[arg(short, long)]
    title: Option<String>,

    /// Output JSON file (single file input only)
    #[arg(short, long, conflicts_with = "stdout")]
    output: Option<PathBuf>,

    /// Print the result to stdout instead of writing a file
    #[arg(long)]
    stdout: bool,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// scriptparse - screenplay structure extraction
///
/// Extracts scenes, locations, characters and dialogue line counts from
/// screenplay PDFs or text files and writes them as JSON.
#[derive(Parser, Debug)]
#[command(name = "scriptparse")]
#[command(version)]
#[command(about = "Screenplay scene and character extraction")]
#[command(long_about = "scriptparse reads screenplays (PDF or plain text) and extracts scenes, locations, characters and dialogue line counts as JSON.

EXAMPLES:
    scriptparse parse script.pdf                   # Writes script.json next to the input
    scriptparse parse script.pdf -t \"Big Fish\"     # Set the title stored in the result
    scriptparse parse script.txt --stdout          # Print the result
    scriptparse parse -f /scripts/                 # Process a directory, overwriting results
    scriptparse formats                            # List supported screenplay formats
    scriptparse completions bash > scriptparse.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(record.level()),
                now,
                Self::get_emoji_for_level(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() {
    // Everything up to trace is accepted; the effective level is set via set_max_level
    if let Err(e) = CustomLogger::init(LevelFilter::Trace) {
        eprintln!("Failed to initialize logger: {}", e);
    }
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    let result = match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "scriptparse", &mut std::io::stdout());
            Ok(())
        }
        Commands::Formats { config_path } => list_formats(&config_path),
        Commands::Parse(args) => run_parse(args),
    };

    if let Err(e) = result {
        error!("{:#}", e);
        let code = e
            .downcast_ref::<AppError>()
            .map(AppError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

fn load_config(config_path: &str, log_level: Option<&CliLogLevel>) -> Result<Config> {
    // If log level is set via command line, apply it before loading anything
    if let Some(cmd_log_level) = log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(config_path)?;

    // Update log level in config if specified via command line
    if let Some(cmd_log_level) = log_level {
        config.log_level = cmd_log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());

    Ok(config)
}

fn list_formats(config_path: &str) -> Result<()> {
    let config = load_config(config_path, None)?;
    let controller = Controller::with_config(config)?;
    for tag in controller.registry().formats() {
        println!("{}", tag);
    }
    Ok(())
}

fn run_parse(options: ParseArgs) -> Result<()> {
    let config = load_config(&options.config_path, options.log_level.as_ref())?;
    let controller = Controller::with_config(config)?;
    let input = &options.input_path;

    if input.is_dir() {
        if options.output.is_some() || options.stdout || options.title.is_some() {
            return Err(anyhow!("--output, --stdout and --title only apply to a single input file"));
        }
        let summary = controller.run_folder(input, options.force_overwrite)?;
        if summary.failed > 0 {
            return Err(anyhow!("{} file(s) failed to parse", summary.failed));
        }
        return Ok(());
    }

    if !input.is_file() {
        return Err(anyhow!("Input path does not exist: {:?}", input));
    }

    if options.stdout {
        let mapping = controller.parse_file(input, options.title.as_deref())?;
        let json = persistence::to_pretty_json(&mapping).context("Failed to render result")?;
        std::io::stdout()
            .write_all(json.as_bytes())
            .context("Failed to write result to stdout")?;
        return Ok(());
    }

    if let Some(path) = controller.run(
        input,
        options.output.clone(),
        options.title.as_deref(),
        options.force_overwrite,
    )? {
        info!("Success: {:?}", path);
    }

    Ok(())
}
