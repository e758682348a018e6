#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use presale_allowlist::{run_build, run_verify};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "allowlist")]
#[command(about = "Build and check pre-sale allowlist Merkle trees", long_about = None)]
#[command(version)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the tree and write the snapshot plus per-address proofs
    Build(BuildArgs),
    /// Re-check proofs in a snapshot against its root
    Verify(VerifyArgs),
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Allowlist file: CSV of `address,amount`, or a JSON object when *.json
    #[arg(short, long)]
    input: PathBuf,

    /// Output file for the full snapshot
    #[arg(short, long, default_value = "claims.json")]
    output: PathBuf,

    /// Directory for per-address proof files
    #[arg(short, long)]
    proof_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct VerifyArgs {
    /// Snapshot file written by `build`
    #[arg(short, long, default_value = "claims.json")]
    snapshot: PathBuf,

    /// Only check this address
    #[arg(short, long)]
    address: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Build(args) => build(args),
        Commands::Verify(args) => verify(args),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build(args: BuildArgs) -> Result<()> {
    let snapshot = run_build(&args.input, &args.output, args.proof_dir.as_deref())?;
    println!("{}", snapshot.merkle_root);
    Ok(())
}

fn verify(args: VerifyArgs) -> Result<()> {
    run_verify(&args.snapshot, args.address.as_deref())?;
    Ok(())
}
