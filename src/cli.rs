//! Command line interface.

use clap::{ArgAction, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

/// Long flags that may also be written with a single dash (`-domain`).
const LONG_FLAGS: &[&str] = &[
    "domain",
    "zone",
    "ttl",
    "ip",
    "ip-file",
    "ip-metadata",
    "wait",
    "region",
    "metadata-endpoint",
    "wait-delay",
    "wait-max-attempts",
    "verbose",
    "help",
    "version",
];

#[derive(Parser, Debug)]
#[command(name = "route53-ddns")]
#[command(about = "Point a Route53 A record at this host's public IP")]
#[command(version)]
pub struct Cli {
    /// Domain name of the record to update
    #[arg(long)]
    pub domain: Option<String>,

    /// Route53 hosted zone id for the domain
    #[arg(long = "zone")]
    pub zone_id: Option<String>,

    /// TTL for DNS cache, in seconds
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(i64).range(0..=2_147_483_647))]
    pub ttl: i64,

    /// Target of the domain name
    #[arg(long)]
    pub ip: Option<String>,

    /// Read the IP from the first line of a file
    #[arg(long)]
    pub ip_file: Option<PathBuf>,

    /// Get the IP from the EC2 instance metadata service
    #[arg(long, action = ArgAction::Set, num_args = 0..=1, require_equals = true,
          default_value_t = false, default_missing_value = "true")]
    pub ip_metadata: bool,

    /// Wait for DNS changes to propagate
    #[arg(long, action = ArgAction::Set, num_args = 0..=1, require_equals = true,
          default_value_t = false, default_missing_value = "true")]
    pub wait: bool,

    /// AWS region for the Route53 client (defaults to the SDK's resolution)
    #[arg(long)]
    pub region: Option<String>,

    /// Base URL of the instance metadata service
    #[arg(long, env = "AWS_EC2_METADATA_SERVICE_ENDPOINT", default_value = crate::metadata::DEFAULT_ENDPOINT)]
    pub metadata_endpoint: String,

    /// Seconds between propagation checks
    #[arg(long, default_value_t = 30)]
    pub wait_delay: u64,

    /// Propagation checks before giving up
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    pub wait_max_attempts: u32,

    /// Increase logging verbosity (may be repeated)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse the process arguments, accepting single-dash long flags.
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }
}

/// Rewrite `-flag` / `-flag=value` into `--flag` / `--flag=value` for the
/// known long flags. Short flags and everything after `--` are left alone.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut passthrough = false;

    for arg in args.into_iter().map(Into::into) {
        if passthrough {
            out.push(arg);
            continue;
        }

        let Some(text) = arg.to_str() else {
            out.push(arg);
            continue;
        };

        if text == "--" {
            passthrough = true;
            out.push(arg);
            continue;
        }

        match text.strip_prefix('-') {
            Some(rest) if !rest.starts_with('-') => {
                let name = rest.split('=').next().unwrap_or(rest);
                if LONG_FLAGS.contains(&name) {
                    out.push(OsString::from(format!("-{}", text)));
                } else {
                    out.push(arg);
                }
            }
            _ => out.push(arg),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(normalize_args(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_normalize_single_dash_flags() {
        let args = normalize_args(["route53-ddns", "-domain", "a.example.com", "-wait=false", "-v"]);
        assert_eq!(
            args,
            os(&["route53-ddns", "--domain", "a.example.com", "--wait=false", "-v"])
        );
    }

    #[test]
    fn test_normalize_leaves_values_and_passthrough() {
        let args = normalize_args(["route53-ddns", "--ip", "1.2.3.4", "--", "-zone"]);
        assert_eq!(args, os(&["route53-ddns", "--ip", "1.2.3.4", "--", "-zone"]));
    }

    #[test]
    fn test_go_style_invocation() {
        let cli = parse(&[
            "route53-ddns",
            "-domain",
            "home.example.com",
            "-zone",
            "Z123",
            "-ip-metadata",
            "-wait",
        ]);
        assert_eq!(cli.domain.as_deref(), Some("home.example.com"));
        assert_eq!(cli.zone_id.as_deref(), Some("Z123"));
        assert!(cli.ip_metadata);
        assert!(cli.wait);
        assert_eq!(cli.ttl, 60);
    }

    #[test]
    fn test_bool_flag_explicit_false() {
        let cli = parse(&["route53-ddns", "-wait=false", "-ip-metadata=true"]);
        assert!(!cli.wait);
        assert!(cli.ip_metadata);
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["route53-ddns"]);
        assert_eq!(cli.wait_delay, 30);
        assert_eq!(cli.wait_max_attempts, 60);
        assert_eq!(cli.verbose, 0);
        assert!(cli.ip.is_none());
        assert!(cli.ip_file.is_none());
    }

    #[test]
    fn test_negative_ttl_rejected() {
        let result = Cli::try_parse_from(["route53-ddns", "--ttl=-5"]);
        assert!(result.is_err());
    }
}
