use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use glob::glob;
use seaframe_core::calibration::CalibrationCatalog;
use seaframe_core::config::InstrumentConfig;
use seaframe_core::publish::{LinePublisher, Publisher};
use seaframe_core::{Report, SampleRecord};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing_subscriber::EnvFilter;

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("SEAFRAME_BUILD_COMMIT"),
    " ",
    env!("SEAFRAME_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "seaframe")]
#[command(version = VERSION)]
#[command(
    about = "Offline decoder for oceanographic instrument telemetry (STOR-X logs, ADAM captures).",
    long_about = None,
    after_help = "Examples:\n  seaframe storx decode STORX0318.raw --config deployment.json -o report.json\n  seaframe adam decode adam.pcapng --config deployment.json --stdout\n  seaframe cal check SATSTX0318.cal"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on STOR-X logger files.
    Storx {
        #[command(subcommand)]
        command: StorxCommands,
    },
    /// Operations on ADAM digitizer PCAP/PCAPNG captures.
    Adam {
        #[command(subcommand)]
        command: AdamCommands,
    },
    /// Operations on Satlantic calibration files.
    Cal {
        #[command(subcommand)]
        command: CalCommands,
    },
}

#[derive(Subcommand, Debug)]
enum StorxCommands {
    /// Decode and calibrate every frame of a logger file into a JSON report.
    #[command(
        after_help = "Examples:\n  seaframe storx decode STORX0318.raw --config deployment.json -o report.json\n  seaframe storx decode 'logs/STORX*.raw' --config deployment.json --stdout --pretty"
    )]
    Decode(DecodeArgs),
}

#[derive(Subcommand, Debug)]
enum AdamCommands {
    /// Decode digitizer packets from a capture into a JSON report.
    #[command(
        after_help = "Examples:\n  seaframe adam decode adam.pcapng --config deployment.json -o report.json"
    )]
    Decode(DecodeArgs),
}

#[derive(Subcommand, Debug)]
enum CalCommands {
    /// Parse a calibration file and list its variables.
    Check {
        /// Path to a .cal or .tdf file
        input: PathBuf,

        /// Print the parsed catalog as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Path (or glob pattern matching one file) to decode
    input: PathBuf,

    /// Deployment configuration (JSON); defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output report path (JSON)
    #[arg(short = 'o', long, required_unless_present = "stdout")]
    report: Option<PathBuf>,

    /// Write JSON report to stdout
    #[arg(long, conflicts_with = "report")]
    stdout: bool,

    /// Pretty-print JSON output
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Compact JSON output (default)
    #[arg(long)]
    compact: bool,

    /// Suppress non-error output
    #[arg(long)]
    quiet: bool,

    /// Exit with a non-zero code if any frame was rejected
    #[arg(long)]
    strict: bool,

    /// Print every calibrated channel as a tab-separated line on stderr
    #[arg(long)]
    channels: bool,
}

#[derive(Debug, Clone, Copy)]
enum InputKind {
    LogFile,
    Capture,
    Calibration,
}

impl InputKind {
    fn expected(self) -> &'static str {
        match self {
            InputKind::LogFile => "a STOR-X log file",
            InputKind::Capture => "a .pcap or .pcapng file",
            InputKind::Calibration => "a .cal or .tdf calibration file",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum DecodeKind {
    LogFile,
    Capture,
}

impl DecodeKind {
    fn input(self) -> InputKind {
        match self {
            DecodeKind::LogFile => InputKind::LogFile,
            DecodeKind::Capture => InputKind::Capture,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let quiet = match &cli.command {
        Commands::Storx {
            command: StorxCommands::Decode(args),
        }
        | Commands::Adam {
            command: AdamCommands::Decode(args),
        } => args.quiet,
        Commands::Cal { .. } => false,
    };
    init_tracing(cli.verbose, quiet);
    tracing::debug!(commit = env!("SEAFRAME_BUILD_COMMIT_FULL"), "seaframe {}", VERSION);

    let result = match cli.command {
        Commands::Storx { command } => match command {
            StorxCommands::Decode(args) => cmd_decode(args, DecodeKind::LogFile),
        },
        Commands::Adam { command } => match command {
            AdamCommands::Decode(args) => cmd_decode(args, DecodeKind::Capture),
        },
        Commands::Cal { command } => match command {
            CalCommands::Check { input, json } => cmd_cal_check(input, json),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

fn cmd_decode(args: DecodeArgs, kind: DecodeKind) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&args.input, kind.input())?;
    validate_input_file(&resolved_input, kind.input())?;
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;

    if let Some(report_path) = args.report.as_ref() {
        ensure_report_differs(report_path, &input_abs)?;
    }

    let config = load_config(args.config.as_deref())?;
    let rep = match kind {
        DecodeKind::LogFile => seaframe_core::process_log_file(&resolved_input, &config)
            .context("STOR-X log decoding failed")?,
        DecodeKind::Capture => seaframe_core::process_adam_capture(&resolved_input, &config)
            .context("ADAM capture decoding failed")?,
    };
    let json = serialize_report(&rep, args.pretty, args.compact)?;

    if args.stdout {
        print!("{}", json);
    } else {
        let report = args.report.as_ref().ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?;
        if let Some(parent) = report.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
        }
        fs::write(report, json)
            .with_context(|| format!("Failed to write report: {}", report.display()))?;
    }

    if args.channels && !args.quiet {
        print_channels(&rep)?;
    }
    if !args.quiet {
        if let Some(report) = args.report.as_ref().filter(|_| !args.stdout) {
            eprintln!("OK: report written -> {}", report.display());
        }
        print_summary(&rep);
    }
    if args.strict && !rep.rejected.is_empty() {
        return Err(CliError::new(
            format!("{} frame(s) rejected", rep.rejected.len()),
            Some("inspect the report's \"rejected\" entries or rerun with -v".to_string()),
        ));
    }
    Ok(())
}

fn cmd_cal_check(input: PathBuf, json: bool) -> Result<(), CliError> {
    let resolved = resolve_input_path(&input, InputKind::Calibration)?;
    validate_input_file(&resolved, InputKind::Calibration)?;
    let location = resolved.to_string_lossy();
    let catalog = CalibrationCatalog::parse(&location).map_err(|err| {
        CliError::new(
            err.to_string(),
            Some(format!("expected {}", InputKind::Calibration.expected())),
        )
    })?;

    if json {
        let text = serde_json::to_string_pretty(&catalog).context("JSON serialization failed")?;
        println!("{}", text);
        return Ok(());
    }

    let mut out = std::io::stdout().lock();
    for entry in catalog.iter() {
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            entry.key,
            entry.fit_type.name(),
            entry.units,
            entry.coefficients.len()
        )
        .context("Failed to write to stdout")?;
    }
    eprintln!("OK: {} variable(s) in {}", catalog.len(), resolved.display());
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<InstrumentConfig, CliError> {
    let Some(path) = path else {
        tracing::info!("no configuration given, using defaults");
        return Ok(InstrumentConfig::default());
    };
    InstrumentConfig::load(path).map_err(|err| {
        CliError::new(
            err.to_string(),
            Some("check the deployment configuration JSON".to_string()),
        )
    })
}

fn ensure_report_differs(report_path: &Path, input_abs: &Path) -> Result<(), CliError> {
    let report_abs = report_path
        .parent()
        .map(|parent| {
            if parent.as_os_str().is_empty() {
                fs::canonicalize(".")
            } else {
                fs::canonicalize(parent)
            }
        })
        .transpose();
    // A missing output directory is created later and cannot hold the input.
    let Ok(Some(report_dir)) = report_abs else {
        return Ok(());
    };
    let report_target = report_dir.join(
        report_path
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("Invalid report path"))?,
    );
    if report_target == input_abs {
        return Err(CliError::new(
            format!(
                "report path must differ from input: {}",
                report_path.display()
            ),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn serialize_report(rep: &Report, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn print_summary(rep: &Report) {
    if let Some(summary) = rep.summary.as_ref() {
        eprintln!(
            "frames: {} total, {} samples, {} skipped, {} rejected",
            summary.frames_total, summary.samples, summary.skipped, summary.rejected
        );
    }
}

fn print_channels(rep: &Report) -> Result<(), CliError> {
    let mut publisher = LinePublisher::new(std::io::stderr().lock());
    for record in &rep.samples {
        publish_record(&mut publisher, record)?;
    }
    Ok(())
}

fn publish_record<P>(publisher: &mut P, record: &SampleRecord) -> Result<(), CliError>
where
    P: Publisher<Error = std::io::Error>,
{
    let timestamp = OffsetDateTime::parse(&record.timestamp, &Rfc3339)
        .with_context(|| format!("invalid sample timestamp '{}'", record.timestamp))?;
    let epoch_seconds = timestamp.unix_timestamp_nanos() as f64 / 1e9;
    for channel in &record.channels {
        publisher
            .publish(&channel.name, channel.value, &channel.units, epoch_seconds)
            .context("Failed to write channel line")?;
    }
    Ok(())
}

fn validate_input_file(input: &Path, kind: InputKind) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some(format!("use {}", kind.expected())),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some(format!("use {}", kind.expected())),
        ));
    }
    if let InputKind::Capture = kind {
        let ext = input
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        if ext != "pcap" && ext != "pcapng" {
            return Err(CliError::new(
                format!("unsupported input format '{}'", input.display()),
                Some("expected a .pcap or .pcapng file".to_string()),
            ));
        }
    }
    Ok(())
}

fn resolve_input_path(input: &Path, kind: InputKind) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some(format!(
                "check the path or quote the pattern; expected {}",
                kind.expected()
            )),
        ));
    }
    if matches.len() > 1 {
        let hint = "pass a single input file, or run once per file".to_string();
        let mut message = format!(
            "multiple files match pattern '{}' ({} matches)",
            pattern,
            matches.len()
        );
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>();
        message.push_str("; matches: ");
        message.push_str(&listed.join(", "));
        if matches.len() > 3 {
            message.push_str(", ...");
        }
        return Err(CliError::new(message, Some(hint)));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
