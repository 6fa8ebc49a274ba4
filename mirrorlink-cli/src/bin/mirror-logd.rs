use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use dialoguer::Input;
use mirrorlink::logging::{
    Aggregator, DEFAULT_LOG_PORT, config_path, init_local_logging, load_saved_address,
    normalize_address, save_address,
};
use mirrorlink_cli::{banner, ctrl_c};
use std::path::PathBuf;

/// Central log aggregator.
#[derive(Parser)]
#[command(name = "mirror-logd", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Accept shipped records and append them to the output file
    Serve(ServeArgs),
    /// Save the aggregator address used by the other binaries
    Configure,
}

#[derive(Args, Clone)]
struct ServeArgs {
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    #[arg(long, default_value_t = DEFAULT_LOG_PORT)]
    port: u16,

    #[arg(long, default_value = "central.log")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Configure) => configure(),
        Some(Commands::Serve(args)) => serve(args).await,
        None => serve(cli.serve).await,
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    init_local_logging()?;

    let aggregator = Aggregator::bind(&format!("{}:{}", args.host, args.port), args.output).await?;
    banner("Log aggregator");
    println!("   📡 {}", aggregator.local_addr()?.to_string().cyan());
    println!("   📂 {}", aggregator.output().display());

    aggregator.run(ctrl_c()).await
}

fn configure() -> Result<()> {
    let path = config_path().context("Could not determine the home directory")?;
    let current = load_saved_address(&path)?;

    let mut prompt = Input::<String>::new().with_prompt("Log aggregator address (host or host:port)");
    if let Some(current) = current {
        prompt = prompt.default(current);
    }
    let raw = prompt.interact_text()?;

    let Some(address) = normalize_address(&raw) else {
        anyhow::bail!("No address given");
    };
    save_address(&path, &address)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("{}", format!("✨ Saved {address} to {}", path.display()).green().bold());
    Ok(())
}
