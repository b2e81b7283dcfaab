use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use cascade_core::{CascadeSelector, UploadOutcome};
use cascade_ingest::read_dataset;
use cascade_cli::config::{Settings, load_config};
use cascade_cli::render::chain_table;
use cascade_cli::session::{RunReport, Session};
use tracing::{info, info_span};

use crate::cli::{Cli, ExportArgs, LevelsArgs, SessionArgs};

/// Result of `cascade export`.
#[derive(Debug)]
pub struct ExportSummary {
    pub report: RunReport,
    /// Export file written after the script, if any.
    pub written: Option<(PathBuf, usize)>,
}

pub fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let config = load_config(cli.config.as_deref())?;
    Settings::resolve(
        config,
        cli.output_dir.as_deref(),
        cli.export_file.as_deref(),
    )
}

pub fn run_levels(args: &LevelsArgs, settings: Settings) -> Result<()> {
    let loaded = read_dataset(&args.file)
        .with_context(|| format!("load {}", args.file.display()))?;
    let source = loaded.source.clone();
    let selector = {
        let mut selector = CascadeSelector::new(settings.chain);
        selector.replace_dataset(loaded.dataset, Some(loaded.source));
        selector
    };
    println!("{}", chain_table(&selector));
    println!(
        "source: {} ({}, {} rows, {} bytes, sha256 {})",
        source.path.display(),
        source.format,
        selector.dataset().len(),
        source.size,
        source.short_fingerprint()
    );
    Ok(())
}

pub fn run_session(args: &SessionArgs, settings: Settings) -> Result<RunReport> {
    let span = info_span!("session");
    let _guard = span.enter();
    let stdin = io::stdin();
    let interactive = args.script.is_none() && stdin.is_terminal();
    let mut session = Session::new(settings.chain, settings.export_path).with_prompt(interactive);
    let mut out = io::stdout().lock();
    if let Some(file) = &args.file {
        session.load(file, &mut out)?;
    }
    let report = match &args.script {
        Some(script) => session.run(open_script(script)?, &mut out)?,
        None => session.run(stdin.lock(), &mut out)?,
    };
    info!(
        executed = report.executed,
        failed = report.failed,
        "session finished"
    );
    Ok(report)
}

pub fn run_export(args: &ExportArgs, settings: Settings) -> Result<ExportSummary> {
    let span = info_span!("export", file = %args.file.display());
    let _guard = span.enter();
    let mut session = Session::new(settings.chain, settings.export_path).with_stop_on_error(true);
    let mut out = io::stdout().lock();
    if session.load(&args.file, &mut out)? == UploadOutcome::Failed {
        bail!("could not read {}", args.file.display());
    }
    let report = session.run(open_script(&args.script)?, &mut out)?;

    // A script that already saved everything has nothing left to write.
    let written = if session.selector().combinations().is_empty() && session.saves() > 0 {
        None
    } else {
        Some(session.save(None)?)
    };
    Ok(ExportSummary { report, written })
}

fn open_script(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("open script {}", path.display()))?;
    Ok(BufReader::new(file))
}
