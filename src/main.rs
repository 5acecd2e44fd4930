use anyhow::{bail, Context};
use clap::Parser;
use colored::Colorize;
use fs_err as fs;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod cli;
mod client;
mod config;
mod description;
mod errors;
mod parse;
mod planner;
mod prompt;
mod provider;
mod transcript;
mod ux;
mod wire;

use description::CityDescription;
use planner::{Orchestrator, RunStatus};

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Both sources are trimmed before the length check sees them.
fn read_description(args: &cli::Args) -> anyhow::Result<String> {
    let text = match (&args.description, &args.description_file) {
        (Some(d), _) => d.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("reading description from {path}"))?,
        (None, None) => bail!("provide --description or --description-file"),
    };
    Ok(text.trim().to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    init_tracing(args.debug);

    let cfg = config::Config::load(&args)?;

    // Validation happens before any provider is built or called.
    let description = match CityDescription::new(read_description(&args)?) {
        Ok(d) => d.with_features(&args.features),
        Err(e) => {
            eprintln!("{} {}", "✖".red().bold(), e);
            std::process::exit(2);
        }
    };

    let txid = Uuid::new_v4();
    let prov = provider::make_provider(&cfg)?;
    let plan_client = client::PlanClient::new(prov)
        .with_transaction(txid)
        .with_transcript(transcript::Transcript::from_config(&cfg, txid));
    info!(tx = %txid, provider = ?cfg.provider, model = %cfg.model, "starting planning run");

    let mut orchestrator = Orchestrator::new(plan_client, Arc::new(ux::TerminalNotifier::new()));
    orchestrator.start(description);

    let Some(run) = orchestrator.run_to_end().await else {
        bail!("planning run was never started");
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(run)?);
    } else {
        ux::show_run(run);
    }

    if run.status() == RunStatus::Error {
        std::process::exit(1);
    }
    Ok(())
}
