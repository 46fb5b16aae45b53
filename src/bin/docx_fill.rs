//! docx-fill - fill placeholders in extracted document parts
//!
//! Reads a JSON data model, fills every part file given on the command line
//! in parallel and writes the results under `--out-dir` at their relative
//! paths, so `word/header1.xml` lands in `<out-dir>/word/header1.xml`.

use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use docx_fill::settings::{Loader, Settings};
use docx_fill::strategy::{replace_parts, total_report, Part};
use docx_fill::{ModelResolver, Processor};

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser, Debug)]
#[command(
    name = "docx-fill",
    version,
    about = "Fill {{placeholders}} in word-processing document parts from a JSON model."
)]
struct Cli {
    /// JSON file holding the data model
    #[arg(long)]
    data: PathBuf,

    /// TOML settings layered over the built-in defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory the filled parts are written to
    #[arg(long, default_value = "filled")]
    out_dir: PathBuf,

    /// Start delimiter override
    #[arg(long)]
    start: Option<String>,

    /// End delimiter override
    #[arg(long)]
    end: Option<String>,

    /// Fill every paragraph group, not only the leading ones
    #[arg(long)]
    split: bool,

    /// Part files, e.g. word/document.xml word/header1.xml
    #[arg(required = true)]
    parts: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("docx_fill=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut loader = Loader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    if let Some(start) = &cli.start {
        loader = loader.set_override("delimiters.start", start.as_str())?;
    }
    if let Some(end) = &cli.end {
        loader = loader.set_override("delimiters.end", end.as_str())?;
    }
    if cli.split {
        loader = loader.set_override("walker.sibling_policy", "split")?;
    }
    loader.build().context("failed to load settings")
}

/// Where a part is written: its path with the root, `.` and `..` dropped
fn output_path(out_dir: &Path, part: &Path) -> Result<PathBuf> {
    let relative: PathBuf = part
        .components()
        .filter_map(|c| match c {
            Component::Normal(segment) => Some(segment),
            _ => None,
        })
        .collect();
    if relative.as_os_str().is_empty() {
        bail!("{} has no file name", part.display());
    }
    Ok(out_dir.join(relative))
}

/// Ok(false) when at least one part failed
fn run(cli: Cli) -> Result<bool> {
    let settings = load_settings(&cli)?;
    let processor = Processor::new(settings.to_options()).context("invalid settings")?;

    let data = fs::read(&cli.data).with_context(|| format!("failed to read {}", cli.data.display()))?;
    let model: serde_json::Value = serde_json::from_slice(&data)
        .with_context(|| format!("{} is not valid JSON", cli.data.display()))?;
    let resolver = ModelResolver::with_capacity(model, settings.resolver.cache_capacity);

    let targets = cli
        .parts
        .iter()
        .map(|path| output_path(&cli.out_dir, path))
        .collect::<Result<Vec<_>>>()?;
    let mut seen = HashSet::new();
    for (path, target) in cli.parts.iter().zip(&targets) {
        if !seen.insert(target) {
            bail!("{} would overwrite another part at {}", path.display(), target.display());
        }
    }

    let parts = cli
        .parts
        .iter()
        .map(|path| {
            let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
            Ok(Part::new(path.display().to_string(), bytes))
        })
        .collect::<Result<Vec<_>>>()?;

    let results = replace_parts(&processor, &parts, &resolver);
    let mut failed = 0;
    for (target, part) in targets.iter().zip(&results) {
        match &part.result {
            Ok(filled) => {
                if let Some(dir) = target.parent() {
                    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
                }
                fs::write(target, &filled.bytes)
                    .with_context(|| format!("failed to write {}", target.display()))?;
                info!(
                    part = %part.name,
                    replaced = filled.report.replaced,
                    unresolved = filled.report.unresolved,
                    "filled"
                );
            }
            Err(err) => {
                failed += 1;
                error!(part = %part.name, %err, "part failed");
            }
        }
    }

    let total = total_report(&results);
    info!(
        parts = results.len(),
        failed,
        replaced = total.replaced,
        unresolved = total.unresolved,
        truncated_paragraphs = total.truncated_paragraphs,
        "done"
    );
    Ok(failed == 0)
}
