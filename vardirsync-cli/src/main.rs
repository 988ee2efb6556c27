//! `nomad-var-dirsync`: snapshot a directory into Nomad variables, or
//! restore one from them.
//!
//! The ACL token and agent address come from the usual `NOMAD_*`
//! environment variables.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use vardirsync_nomad::{NomadApiClient, NomadConfig, WriteMode};
use vardirsync_sync::record::parse_octal_mode;
use vardirsync_sync::{FailurePolicy, SyncConfig, SyncEngine, SyncReport};

#[derive(Parser, Debug)]
#[command(name = "nomad-var-dirsync")]
#[command(about = "Sync a directory tree to and from Nomad variables", long_about = None)]
#[command(version)]
struct Cli {
    /// Root path for the Nomad variables holding the tree
    #[arg(long = "root-var", value_name = "ROOT")]
    root_var: String,

    /// Permissions for directories created on read, in octal
    #[arg(long = "dir-perms", value_name = "OCTAL", default_value = "777", value_parser = parse_dir_perms)]
    dir_perms: u32,

    /// What to do when a single file or variable fails
    #[arg(long = "on-error", value_enum, default_value_t = OnError::Abort)]
    on_error: OnError,

    /// Fail instead of overwriting variables that already exist
    #[arg(long)]
    create_only: bool,

    /// Write a JSON summary of the run to this file
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Nomad agent address (overrides NOMAD_ADDR)
    #[arg(long, value_name = "URL")]
    address: Option<String>,

    /// Nomad namespace (overrides NOMAD_NAMESPACE)
    #[arg(long)]
    namespace: Option<String>,

    /// Nomad region (overrides NOMAD_REGION)
    #[arg(long)]
    region: Option<String>,

    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// `write` uploads the directory, `read` restores it
    #[arg(value_enum)]
    action: Action,

    /// Directory to read from or restore into
    target: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Action {
    /// Restore files from variables into the target directory
    Read,
    /// Store every file of the target directory as a variable
    Write,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OnError {
    /// Stop at the first failure
    Abort,
    /// Skip failing items and report them at the end
    Skip,
}

/// Like a stored mode, but a leading `0o` is tolerated on the command line.
fn parse_dir_perms(s: &str) -> Result<u32, String> {
    let digits = s.strip_prefix("0o").unwrap_or(s);
    let mode = parse_octal_mode(digits).ok_or_else(|| format!("`{s}` is not an octal mode"))?;
    if mode > 0o7777 {
        return Err(format!("`{s}` has bits outside 7777"));
    }
    Ok(mode)
}

impl Cli {
    fn nomad_config(&self, base: NomadConfig) -> NomadConfig {
        let mut config = base;
        if let Some(ref address) = self.address {
            config.address = address.clone();
        }
        if self.namespace.is_some() {
            config.namespace = self.namespace.clone();
        }
        if self.region.is_some() {
            config.region = self.region.clone();
        }
        config
    }

    fn sync_config(&self) -> SyncConfig {
        let policy = match self.on_error {
            OnError::Abort => FailurePolicy::Abort,
            OnError::Skip => FailurePolicy::SkipAndReport,
        };
        let write_mode = if self.create_only {
            WriteMode::Create
        } else {
            WriteMode::Upsert
        };

        SyncConfig::new(self.root_var.clone())
            .with_new_dir_mode(self.dir_perms)
            .with_failure_policy(policy)
            .with_write_mode(write_mode)
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run(cli: Cli) -> Result<()> {
    if cli.root_var.trim().is_empty() {
        bail!("must provide a nomad variable root with --root-var");
    }

    let target_meta = std::fs::metadata(&cli.target)
        .with_context(|| format!("failed reading target `{}`", cli.target.display()))?;
    if !target_meta.is_dir() {
        bail!("must provide a path to a directory: {}", cli.target.display());
    }

    let client = NomadApiClient::new(cli.nomad_config(NomadConfig::from_env()))
        .context("failed creating nomad client")?;
    let engine = SyncEngine::new(Arc::new(client), cli.sync_config())?;

    let report = match cli.action {
        Action::Write => engine
            .export(&cli.target)
            .await
            .context("failed writing directory")?,
        Action::Read => engine
            .import(&cli.target)
            .await
            .context("failed reading variables into files")?,
    };

    if let Some(ref path) = cli.report {
        write_report(&report, path)?;
    }

    if !report.is_clean() {
        bail!(
            "{} items skipped, {} transferred",
            report.skipped.len(),
            report.transferred.len()
        );
    }

    info!("transferred {} files", report.transferred.len());
    Ok(())
}

fn write_report(report: &SyncReport, path: &Path) -> Result<()> {
    let json = report.to_json().context("failed serializing report")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed writing report to {}", path.display()))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
