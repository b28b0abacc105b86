use crate::{
    config::Config,
    extract,
    pipeline::Pipeline,
    probe::{HttpProber, ProbeSettings},
    util::ensure_dir,
};
use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CONFIG: &str = "sheet-linkcheck.toml";

#[derive(Parser, Debug)]
#[command(name = "sheet-linkcheck")]
#[command(about = "Scan spreadsheet workbooks for URLs and report the broken ones")]
pub struct Args {
    /// Defaults to `check` when omitted.
    #[command(subcommand)]
    pub cmd: Option<Command>,

    /// Path to config TOML. If omitted, uses ./sheet-linkcheck.toml if present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Probe every URL in the workbook and write a report of the broken ones.
    Check {
        /// Workbook to scan. Prompted for when omitted.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Report path. Derived from the input name when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        timeout_seconds: Option<f64>,
    },
    /// List the URLs found in the workbook as JSON without probing them.
    Scan {
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

pub fn dispatch(args: Args) -> Result<()> {
    let mut cfg = match resolve_config_path(args.config.as_deref())? {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    let _guard = init_logging(&args, &cfg)?;

    let cmd = args.cmd.unwrap_or(Command::Check {
        input: None,
        output: None,
        timeout_seconds: None,
    });

    match cmd {
        Command::Check {
            input,
            output,
            timeout_seconds,
        } => {
            if let Some(secs) = timeout_seconds {
                cfg.probe.timeout_seconds = secs;
                cfg.validate().with_context(|| "--timeout-seconds")?;
            }
            let input = input_or_prompt(input)?;
            check(&cfg, &input, output.as_deref())
        }
        Command::Scan { input } => {
            let input = input_or_prompt(input)?;
            scan(&cfg, &input)
        }
    }
}

fn resolve_config_path(user: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(p) = user {
        if !p.exists() {
            return Err(anyhow!("config not found: {}", p.display()));
        }
        return Ok(Some(p.to_path_buf()));
    }
    let default = PathBuf::from(DEFAULT_CONFIG);
    Ok(default.exists().then_some(default))
}

fn init_logging(args: &Args, cfg: &Config) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout belongs to the operator-facing console text.
    let stderr_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = if cfg.logging.write_to_file {
        let path = Path::new(&cfg.logging.file_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_dir(parent)?;
        }
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn input_or_prompt(input: Option<PathBuf>) -> Result<PathBuf> {
    match input {
        Some(p) => Ok(p),
        None => {
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            prompt_for_input(&mut stdin.lock(), &mut stdout)
        }
    }
}

pub fn prompt_for_input(reader: &mut dyn BufRead, console: &mut dyn Write) -> Result<PathBuf> {
    write!(console, "Enter the path to your Excel file: ")?;
    console.flush()?;
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .with_context(|| "reading input path")?;
    Ok(PathBuf::from(line.trim()))
}

fn check(cfg: &Config, input: &Path, output: Option<&Path>) -> Result<()> {
    let settings = ProbeSettings::from_config(&cfg.probe);
    info!(
        "probe timeout={:?} follow_redirects={} max_redirects={}",
        settings.timeout, settings.follow_redirects, settings.max_redirects
    );
    let prober = HttpProber::new(&settings)?;
    let pipeline = Pipeline::new(cfg, prober);

    let stdout = std::io::stdout();
    let outcome = pipeline.run(input, output, &mut stdout.lock())?;
    info!(?outcome, "run finished");
    Ok(())
}

fn scan(cfg: &Config, input: &Path) -> Result<()> {
    if !input.exists() {
        return Err(anyhow!("File not found: {}", input.display()));
    }
    let urls = extract::scan_workbook(&cfg.scan, input)?;
    println!("{}", serde_json::to_string_pretty(&urls)?);
    Ok(())
}
