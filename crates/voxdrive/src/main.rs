mod repl;

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use voxdrive_engine::ai::HttpCompletionProvider;
use voxdrive_engine::config::ConfigLoader;
use voxdrive_engine::dispatcher::Dispatcher;
use voxdrive_headless::HeadlessDriver;

#[derive(Parser)]
#[command(name = "voxdrive", version, about = "Voice-command interpreter CLI")]
struct Args {
    /// Script of commands to execute (non-interactive mode)
    #[arg(long)]
    file: Option<PathBuf>,

    /// Explicit config file (defaults to ./voxdrive.yaml, ~/.voxdrive/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Log to stderr so stdout carries only command responses.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ConfigLoader::load_from(path).await?,
        None => ConfigLoader::load_default().await?,
    };

    tracing::debug!(model = %config.ai.model, "Configuration loaded");

    let ai = Arc::new(HttpCompletionProvider::new(config.ai));
    let dispatcher = Dispatcher::new(config.browser, Box::new(HeadlessDriver::new()), ai);

    if let Some(file_path) = args.file {
        repl::run_file(&dispatcher, &file_path).await?;
    } else {
        repl::run_repl(&dispatcher).await?;
    }

    Ok(())
}
