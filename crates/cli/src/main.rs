use anyhow::Result;
use clap::{error::ErrorKind, ArgAction, Parser};
use color_eyre::config::HookBuilder;
use std::path::PathBuf;

mod handlers;

/// s3seed - create an S3 bucket and fill it with random text files
#[derive(Parser, Debug)]
#[command(name = "s3seed")]
#[command(version)]
#[command(about = "Create an S3 bucket and populate it with random text files", long_about = None)]
struct Cli {
    // Positionals accept leading hyphens; names are checked by the service

    /// Name of the bucket to create
    #[arg(allow_hyphen_values = true)]
    bucket_name: String,

    /// Region to create the bucket in (e.g. us-west-2)
    #[arg(allow_hyphen_values = true)]
    region: String,

    /// Number of files to generate (non-numeric input counts as 0)
    #[arg(allow_hyphen_values = true)]
    num_files: String,

    /// Config file (default: ~/.config/s3seed/config.toml)
    #[arg(long, env = "S3SEED_CONFIG")]
    config: Option<PathBuf>,

    /// Prefix for the generated file names
    #[arg(long, env = "S3SEED_PREFIX")]
    prefix: Option<String>,

    /// Directory for the temporary local files
    #[arg(long, env = "S3SEED_WORK_DIR")]
    work_dir: Option<PathBuf>,

    /// Endpoint URL for S3-compatible services
    #[arg(long, env = "S3SEED_ENDPOINT")]
    endpoint: Option<String>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// One-line usage shown when the positional arguments are wrong
fn usage_line() -> String {
    let program = std::env::args().next().unwrap_or_else(|| "s3seed".to_string());
    format!("Usage: {} <bucket_name> <region> <num_files>", program)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    if let Err(e) = HookBuilder::default().install() {
        eprintln!("Warning: Failed to install error handler: {}", e);
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(_) => {
            println!("{}", usage_line());
            std::process::exit(1);
        }
    };

    let overrides = handlers::Overrides {
        config: cli.config,
        prefix: cli.prefix,
        work_dir: cli.work_dir,
        endpoint: cli.endpoint,
        verbose: cli.verbose,
    };

    match handlers::handle_seed(&cli.bucket_name, &cli.region, &cli.num_files, overrides).await? {
        handlers::RunOutcome::Completed(_) => Ok(()),
        handlers::RunOutcome::ProvisionFailed => std::process::exit(1),
    }
}
