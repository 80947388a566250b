//! sweeper: delete autoscaling groups, launch configurations and instance profiles
//!
//! Runs as a dry run unless `--execute` is given.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use sweeper::aws::AwsContext;
use sweeper::config::{AwsConfig, ConfigError, RunConfig, TargetNames};
use sweeper::deleter::{
    AutoScalingGroupDeleter, ConsoleSink, DeleteConfig, InstanceProfileDeleter, JsonErrorLog,
    LaunchConfigurationDeleter,
};
use sweeper_common::ResourceKind;
use sweeper_common::defaults::{DEFAULT_BACKOFF_MS, DEFAULT_REGION};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "sweeper")]
#[command(about = "Rate-limited deletion of autoscaling resources")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

/// Resource names and AWS connection flags shared by every command
#[derive(clap::Args, Debug)]
struct TargetArgs {
    /// Autoscaling group name (repeatable)
    #[arg(long = "auto-scaling-group", value_name = "NAME")]
    auto_scaling_groups: Vec<String>,

    /// Launch configuration name (repeatable)
    #[arg(long = "launch-configuration", value_name = "NAME")]
    launch_configurations: Vec<String>,

    /// AWS region
    #[arg(long, default_value = DEFAULT_REGION)]
    region: String,

    /// AWS profile to use (overrides AWS_PROFILE env var)
    #[arg(long)]
    aws_profile: Option<String>,
}

#[derive(clap::Args, Debug)]
struct DeleteArgs {
    #[command(flatten)]
    targets: TargetArgs,

    /// IAM instance profile name (repeatable)
    #[arg(long = "instance-profile", value_name = "NAME")]
    instance_profiles: Vec<String>,

    /// Also delete the instance profiles the launch configurations reference
    #[arg(long)]
    with_instance_profiles: bool,

    /// Actually delete resources (default is dry-run)
    #[arg(long)]
    execute: bool,

    /// Keep going after a failed delete
    #[arg(long)]
    ignore_errors: bool,

    /// Pause before every delete call, in milliseconds
    #[arg(long, default_value_t = DEFAULT_BACKOFF_MS)]
    backoff_ms: u64,

    /// Append failed deletes as JSON lines to this file
    #[arg(long, env = "SWEEPER_ERROR_LOG")]
    error_log: Option<PathBuf>,
}

impl From<DeleteArgs> for RunConfig {
    fn from(args: DeleteArgs) -> Self {
        Self {
            aws: AwsConfig {
                region: args.targets.region,
                aws_profile: args.targets.aws_profile,
            },
            targets: TargetNames {
                auto_scaling_groups: args.targets.auto_scaling_groups,
                launch_configurations: args.targets.launch_configurations,
                instance_profiles: args.instance_profiles,
                with_instance_profiles: args.with_instance_profiles,
            },
            delete: DeleteConfig {
                dry_run: !args.execute,
                ignore_errors: args.ignore_errors,
                backoff_time: Duration::from_millis(args.backoff_ms),
            },
            error_log: args.error_log,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the named resources and the instance profiles they reference as JSON
    Describe(TargetArgs),

    /// Delete the named resources
    Delete(Box<DeleteArgs>),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&e);
        std::process::exit(1);
    }
}

/// Print error in a user-friendly way
fn print_error(e: &anyhow::Error) {
    use std::io::Write;

    let mut stderr = std::io::stderr();

    let _ = writeln!(stderr, "\n\x1b[1;31mError:\x1b[0m {e}");

    let mut source = e.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "  \x1b[33mCaused by:\x1b[0m {cause}");
        source = cause.source();
    }
}

async fn run() -> Result<()> {
    // Progress lines go to stdout, logs to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    match args.command {
        Command::Describe(targets) => handle_describe(targets).await,
        Command::Delete(delete_args) => {
            let config: RunConfig = (*delete_args).into();
            config.validate()?;
            handle_delete(config).await
        }
    }
}

/// Handle the describe command
async fn handle_describe(targets: TargetArgs) -> Result<()> {
    if targets.auto_scaling_groups.is_empty() && targets.launch_configurations.is_empty() {
        return Err(ConfigError::NoResourceNames.into());
    }

    let aws = AwsContext::with_profile(&targets.region, targets.aws_profile.as_deref()).await;

    let mut groups = AutoScalingGroupDeleter::new(&aws);
    groups.add_resource_names(targets.auto_scaling_groups.iter().map(String::as_str));
    let mut launch_configurations = LaunchConfigurationDeleter::new(&aws);
    launch_configurations.add_resource_names(targets.launch_configurations.iter().map(String::as_str));

    let group_records = groups.request_auto_scaling_groups().await?;
    let launch_configuration_records = launch_configurations.request_launch_configurations().await?;
    let profile_records = launch_configurations
        .request_instance_profiles_from_launch_configurations()
        .await?;

    let output = serde_json::json!({
        "auto_scaling_groups": group_records,
        "launch_configurations": launch_configuration_records,
        "instance_profiles": profile_records,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Handle the delete command
async fn handle_delete(config: RunConfig) -> Result<()> {
    if let Some(profile) = config.aws_profile() {
        info!(profile = %profile, "Using AWS profile");
    }
    let aws = AwsContext::with_profile(config.region(), config.aws_profile()).await;

    let sink = match &config.error_log {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open error log {}", path.display()))?;
            ConsoleSink::with_error_log(JsonErrorLog::new(file))
        }
        None => ConsoleSink::new(),
    };

    let targets = &config.targets;
    let mut groups = AutoScalingGroupDeleter::new(&aws);
    groups.add_resource_names(targets.auto_scaling_groups.iter().map(String::as_str));
    let mut launch_configurations = LaunchConfigurationDeleter::new(&aws);
    launch_configurations.add_resource_names(targets.launch_configurations.iter().map(String::as_str));
    let mut profiles = InstanceProfileDeleter::new(&aws);
    profiles.add_resource_names(targets.instance_profiles.iter().map(String::as_str));

    // Resolve before the launch configurations holding the references are gone
    if targets.with_instance_profiles {
        let referenced = launch_configurations
            .request_instance_profiles_from_launch_configurations()
            .await?;
        let added = profiles.add_missing_resource_names(referenced.iter().map(|p| p.name.as_str()));
        info!(
            referenced = referenced.len(),
            added, "Adding referenced instance profiles"
        );
    }

    info!(
        dry_run = config.delete.dry_run,
        ignore_errors = config.delete.ignore_errors,
        backoff_ms = config.delete.backoff_time.as_millis() as u64,
        region = %config.region(),
        "Starting delete run"
    );

    let mut kinds = ResourceKind::all().to_vec();
    kinds.sort_by_key(|kind| kind.cleanup_priority());
    for kind in kinds {
        match kind {
            ResourceKind::AutoScalingGroup => {
                info!(deleter = %groups, "Deleting");
                groups.delete_resources(&config.delete, &sink).await?;
            }
            ResourceKind::LaunchConfiguration => {
                info!(deleter = %launch_configurations, "Deleting");
                launch_configurations
                    .delete_resources(&config.delete, &sink)
                    .await?;
            }
            ResourceKind::IamInstanceProfile => {
                info!(deleter = %profiles, "Deleting");
                profiles.delete_resources(&config.delete, &sink).await?;
            }
        }
    }

    if config.delete.dry_run {
        println!("\nDry run complete. Use --execute to actually delete resources.");
    }
    Ok(())
}
