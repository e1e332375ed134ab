//! Command handlers for s3seed CLI

use anyhow::Result;
use s3seed_core::{
    load_config, parse_file_count, validate_config, ConfigFile, Error, S3Store, SeedEvent, SeedPlan,
    SeedReport, Seeder,
};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry};

/// Level used until the config file has been read
const STARTUP_LOG_LEVEL: &str = "warn";

type LogHandle = reload::Handle<EnvFilter, Registry>;

/// Settings given on the command line or through the environment
#[derive(Debug, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub prefix: Option<String>,
    pub work_dir: Option<PathBuf>,
    pub endpoint: Option<String>,
    pub verbose: u8,
}

/// How a run ended
#[derive(Debug)]
pub enum RunOutcome {
    /// The loop ran to the end (individual files may still have failed)
    Completed(SeedReport),
    /// The bucket could not be created; the failure has been printed
    ProvisionFailed,
}

/// Handle a seeding run
pub async fn handle_seed(bucket: &str, region: &str, num_files: &str, overrides: Overrides) -> Result<RunOutcome> {
    let log_handle = init_tracing(overrides.verbose);

    let mut config = load_config(overrides.config.as_deref())?;
    apply_overrides(&mut config, &overrides);
    validate_config(&config)?;
    apply_config_level(&log_handle, &config.logging.level, overrides.verbose)?;

    let plan = build_plan(bucket, region, num_files, &config);
    debug!(?plan, "seed plan");

    let store = S3Store::connect(&plan.region, &config.s3).await;
    let seeder = Seeder::new(&store, plan);

    let mut print = |event: &SeedEvent| println!("{}", event);

    if let Err(e) = seeder.provision(&mut print).await {
        println!("{}", provision_failure_message(&e));
        return Ok(RunOutcome::ProvisionFailed);
    }

    let report = seeder.populate(&mut print).await?;
    Ok(RunOutcome::Completed(report))
}

/// Command-line values win over the config file
fn apply_overrides(config: &mut ConfigFile, overrides: &Overrides) {
    if let Some(prefix) = &overrides.prefix {
        config.seed.file_prefix = prefix.clone();
    }
    if let Some(work_dir) = &overrides.work_dir {
        config.seed.work_dir = work_dir.clone();
    }
    if let Some(endpoint) = &overrides.endpoint {
        config.s3.endpoint = Some(endpoint.clone());
    }
}

fn build_plan(bucket: &str, region: &str, num_files: &str, config: &ConfigFile) -> SeedPlan {
    SeedPlan {
        bucket: bucket.to_string(),
        region: region.to_string(),
        file_count: parse_file_count(num_files),
        file_prefix: config.seed.file_prefix.clone(),
        work_dir: config.seed.work_dir.clone(),
        entropy_bytes: config.seed.entropy_bytes,
    }
}

/// Line printed when the bucket cannot be created
fn provision_failure_message(err: &Error) -> String {
    match err {
        Error::BucketAlreadyExists(_) => format!("Error: {}", err),
        other => format!("Failed to create bucket: {}", other),
    }
}

/// Log filter: RUST_LOG, then -v flags, then the configured level
fn log_filter(level: &str, verbose: u8) -> String {
    match verbose {
        0 => level.to_string(),
        1 => format!("{},s3seed=debug,s3seed_core=debug", level),
        _ => "trace".to_string(),
    }
}

/// RUST_LOG wins over everything else
fn build_filter(level: &str, verbose: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_filter(level, verbose)))
}

/// Logs go to stderr so stdout only carries the progress lines
fn init_tracing(verbose: u8) -> LogHandle {
    let (filter, handle) = reload::Layer::new(build_filter(STARTUP_LOG_LEVEL, verbose));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    handle
}

/// Switch to the configured level once the config file is known
fn apply_config_level(handle: &LogHandle, level: &str, verbose: u8) -> Result<()> {
    handle.reload(build_filter(level, verbose))?;
    Ok(())
}
