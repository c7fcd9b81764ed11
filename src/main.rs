use anyhow::{Context, Result};
use clap::Parser;
use fnspec::cli::Cli;
use fnspec::config::{load_config, load_config_file, FnspecConfig};
use fnspec::extract::{extract, ExtractOptions};
use fnspec::observability::{init_tracing, ExtractionPhase};
use fnspec::output::write_extraction;
use tracing::info_span;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbosity);

    let config = resolve_config(&cli)?;
    let format = cli.format.or(config.format).unwrap_or_default();

    let mut options = ExtractOptions::new(cli.path, cli.contract);
    options.target_name = cli.target;
    options.module_path = cli.module_path;
    let options = options.with_config(&config);

    let extraction = extract(&options)
        .with_context(|| format!("extracting contract {}", options.contract))?;

    let _phase = info_span!("phase", phase = %ExtractionPhase::Handoff).entered();
    write_extraction(&extraction, format, cli.output.as_deref())
        .context("writing handoff document")?;
    Ok(())
}

// Explicit --config must exist; otherwise search upwards from the input path
fn resolve_config(cli: &Cli) -> Result<FnspecConfig> {
    match &cli.config {
        Some(path) => load_config_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => load_config(&cli.path).context("loading .fnspec.toml"),
    }
}
