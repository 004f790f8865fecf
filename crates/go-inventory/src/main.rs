use std::{
    io::{self, BufWriter},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{ArgAction, Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use go_inventory::{Diagnostics, LogFormat, LogLevel, Overrides, Report, Scanner, Settings};

#[derive(Parser, Debug)]
#[command(name = "go-inventory", version, about)]
struct Args {
    /// Root directory to scan.
    #[arg(long, short)]
    root: Option<PathBuf>,

    /// Show more log output; repeat to raise the level further.
    #[arg(long, short, action = ArgAction::Count)]
    verbose: u8,

    #[arg(long, value_enum)]
    log_format: Option<LogFormatArg>,

    /// Also write logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Configuration file; defaults to the nearest go-inventory.toml above the root.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Worker threads, 0 for one per core.
    #[arg(long, short)]
    jobs: Option<usize>,

    /// Skip everything under this path. Repeatable.
    #[arg(long = "exclude", value_name = "PATH")]
    exclude: Vec<String>,

    /// File extension to scan instead of `go`. Repeatable.
    #[arg(long = "ext", value_name = "EXT")]
    extensions: Vec<String>,

    /// Keep directory listing order instead of sorting by file name.
    #[arg(long)]
    no_sort: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormatArg {
    Text,
    Json,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            root: self.root.clone(),
            verbosity: self.verbose,
            log_format: self.log_format.map(|format| match format {
                LogFormatArg::Text => LogFormat::Text,
                LogFormatArg::Json => LogFormat::Json,
            }),
            worker_threads: self.jobs,
            exclude_paths: self.exclude.clone(),
            extensions: self.extensions.clone(),
            no_sort: self.no_sort,
        }
    }
}

fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("go_inventory={}", level.as_str())))
}

fn init_logging(
    level: LogLevel,
    format: LogFormat,
    log_file: Option<&Path>,
) {
    let stderr_layer = match format {
        LogFormat::Text => fmt::layer().with_writer(io::stderr).with_ansi(false).with_target(false).boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(io::stderr).with_target(false).boxed(),
    };

    let file_layer = log_file.map(|path| {
        let file_appender = tracing_appender::rolling::never(
            path.parent().filter(|dir| !dir.as_os_str().is_empty()).unwrap_or(Path::new(".")),
            path.file_name().unwrap_or(std::ffi::OsStr::new("go-inventory.log")),
        );
        fmt::layer().with_writer(file_appender).with_ansi(false).with_target(false).with_filter(env_filter(level))
    });

    tracing_subscriber::registry().with(stderr_layer.with_filter(env_filter(level))).with(file_layer).init();
}

fn main() -> ExitCode {
    let args = Args::parse();

    let settings = match Settings::load(args.config.as_deref(), &args.overrides()) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("go-inventory: {err}");
            return ExitCode::FAILURE;
        },
    };

    init_logging(settings.logging.level, settings.logging.format, args.log_file.as_deref());
    info!("Starting go-inventory v{}", env!("CARGO_PKG_VERSION"));

    let mut report = Report::new(BufWriter::new(io::stdout().lock()));
    let mut diagnostics = Diagnostics::new(io::stderr());

    let scanner = Scanner::new(settings.scan);
    if let Err(err) = scanner.run(&mut report, &mut diagnostics) {
        error!("run failed: {err}");
        return ExitCode::FAILURE;
    }

    if let Err(err) = report.finish() {
        error!("run failed: cannot flush report: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
