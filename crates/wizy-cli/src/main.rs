//! Wizy CLI — upload test runner for the Wizy video upload service.
//!
//! Presets cover the local server, the public tunnel, and the HLS endpoint.
//! WIZY_* environment variables (or a .env file) override preset values; flags override both.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use wizy_api_client::ApiClient;
use wizy_cli::report::{print_json, render_banner, render_report, render_summary, SuiteSummary};
use wizy_cli::{exit_code, init_tracing, run_suite, run_upload_test, ConfigOverrides, RunOptions};
use wizy_core::config::timeout_from_secs;
use wizy_core::{UploadTarget, UploadTestConfig};

#[derive(Parser)]
#[command(name = "wizy", about = "Upload test runner for the Wizy video service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a test video to one target and report PASS/FAIL
    Upload {
        #[command(flatten)]
        target: TargetArgs,
        /// Path to the video file
        #[arg(long)]
        file: Option<PathBuf>,
        /// Value for the userId form field
        #[arg(long)]
        user_id: Option<String>,
        /// Value for the description form field
        #[arg(long)]
        description: Option<String>,
        /// Require GET /health to answer OK before uploading
        #[arg(long)]
        check_health: bool,
        /// Output format: text or json
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Run the upload test against several targets, one after another
    Suite {
        /// Targets to run (default: all)
        #[arg(long, value_delimiter = ',')]
        targets: Vec<UploadTarget>,
        /// Path to the video file, for every target
        #[arg(long)]
        file: Option<PathBuf>,
        /// Require GET /health to answer OK before each upload
        #[arg(long)]
        check_health: bool,
        /// Output format: text or json
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Check the upload service's /health endpoint
    Health {
        #[command(flatten)]
        target: TargetArgs,
    },
    /// List the known targets
    Targets,
}

#[derive(Args)]
struct TargetArgs {
    /// Preset: localhost, ngrok, automated, localhost-hls
    #[arg(long, default_value = "localhost")]
    target: UploadTarget,
    /// Upload endpoint URL (overrides the preset)
    #[arg(long)]
    url: Option<String>,
    /// Request timeout in seconds (0 disables it)
    #[arg(long, conflicts_with = "no_timeout")]
    timeout: Option<u64>,
    /// Wait for the server indefinitely
    #[arg(long)]
    no_timeout: bool,
}

impl TargetArgs {
    fn timeout_override(&self) -> Option<Option<u64>> {
        if self.no_timeout {
            Some(None)
        } else {
            self.timeout.map(timeout_from_secs)
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Upload {
            target,
            file,
            user_id,
            description,
            check_health,
            format,
        } => {
            let overrides = ConfigOverrides {
                url: target.url.clone(),
                file,
                user_id,
                description,
                timeout: target.timeout_override(),
            };
            let config = overrides.apply(
                UploadTestConfig::from_env(target.target)
                    .with_context(|| format!("Failed to load configuration for {}", target.target))?,
            );
            let options = RunOptions { check_health };

            if format == OutputFormat::Text {
                render_banner(&config, &mut io::stdout())?;
            }
            let report = run_upload_test(&config, &options).await;
            match format {
                OutputFormat::Text => render_report(&report, &mut io::stdout())?,
                OutputFormat::Json => print_json(&report)?,
            }
            Ok(exit_code(report.passed()))
        }
        Commands::Suite {
            targets,
            file,
            check_health,
            format,
        } => {
            let targets = if targets.is_empty() {
                UploadTarget::ALL.to_vec()
            } else {
                targets
            };
            let overrides = ConfigOverrides {
                file,
                ..Default::default()
            };
            let configs = targets
                .iter()
                .map(|target| {
                    UploadTestConfig::from_env(*target)
                        .map(|config| overrides.apply(config))
                        .with_context(|| format!("Failed to load configuration for {}", target))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            let options = RunOptions { check_health };

            let reports = run_suite(&configs, &options).await;
            let summary = SuiteSummary::new(&reports);
            match format {
                OutputFormat::Text => {
                    let mut out = io::stdout().lock();
                    for (config, report) in configs.iter().zip(&reports) {
                        render_banner(config, &mut out)?;
                        render_report(report, &mut out)?;
                        writeln!(out)?;
                    }
                    render_summary(&reports, &mut out)?;
                }
                OutputFormat::Json => print_json(&summary)?,
            }
            Ok(exit_code(summary.all_passed()))
        }
        Commands::Health { target } => {
            let overrides = ConfigOverrides {
                url: target.url.clone(),
                timeout: target.timeout_override(),
                ..Default::default()
            };
            let config = overrides.apply(UploadTestConfig::from_env(target.target)?);
            config.validate()?;

            let client = ApiClient::from_config(&config)?;
            match client.health(&config.endpoint_url).await {
                Ok(health) => {
                    print_json(&health)?;
                    Ok(exit_code(health.is_ok()))
                }
                Err(err) => {
                    println!("❌ Error: {}", err);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::Targets => {
            for target in UploadTarget::ALL {
                let config = UploadTestConfig::from_env(target)?;
                let timeout = config
                    .timeout_seconds
                    .map(|secs| format!("{}s", secs))
                    .unwrap_or_else(|| "none".to_string());
                println!(
                    "{:<14} {} (userId={}, timeout={})",
                    target, config.endpoint_url, config.user_id, timeout
                );
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target_args(args: &[&str]) -> TargetArgs {
        let argv = ["wizy", "health"].iter().chain(args).copied();
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Health { target } => target,
            _ => unreachable!(),
        }
    }

    #[test]
    fn zero_timeout_flag_disables_timeout() {
        assert_eq!(target_args(&["--timeout", "0"]).timeout_override(), Some(None));
        assert_eq!(target_args(&["--no-timeout"]).timeout_override(), Some(None));
        assert_eq!(target_args(&["--timeout", "45"]).timeout_override(), Some(Some(45)));
        assert_eq!(target_args(&[]).timeout_override(), None);
    }

    #[test]
    fn timeout_flags_conflict() {
        let argv = ["wizy", "health", "--timeout", "5", "--no-timeout"];
        assert!(Cli::try_parse_from(argv).is_err());
    }
}
