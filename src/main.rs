//! route53-ddns - point a Route53 A record at this host.

use route53_ddns::cli::Cli;
use route53_ddns::error::report;
use route53_ddns::metadata::InstanceMetadataClient;
use route53_ddns::providers::Route53Provider;
use route53_ddns::{run, Config, DdnsError, Outcome, TargetResolver};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum DdnsExitCode {
    Success = 0,
    Failure = 1,
    Usage = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Exit code for the result of a run.
fn exit_code(result: &Result<Outcome, DdnsError>) -> DdnsExitCode {
    match result {
        Ok(_) => DdnsExitCode::Success,
        Err(e) if e.is_usage() => DdnsExitCode::Usage,
        Err(_) => DdnsExitCode::Failure,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);

    let result = update(cli).await;
    match &result {
        Ok(outcome @ Outcome::Applied(_)) => {
            tracing::info!("change applied ({})", outcome.change().id);
        }
        Ok(outcome @ Outcome::Sent(_)) => {
            tracing::info!("change sent to route53 ({})", outcome.change().id);
        }
        Err(e) => {
            if let Err(io) = report(e, &mut std::io::stdout()) {
                tracing::warn!("failed to write error report: {}", io);
            }
        }
    }

    exit_code(&result).into()
}

async fn update(cli: Cli) -> Result<Outcome, DdnsError> {
    let config = Config::from_cli(cli)?;

    let resolver = TargetResolver::new(InstanceMetadataClient::new(
        config.metadata_endpoint.as_str(),
    )?);
    let provider = Route53Provider::new(config.region.as_deref())?;

    run(&config, &resolver, &provider).await
}
