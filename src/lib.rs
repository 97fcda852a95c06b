//! # route53-ddns
//!
//! Points a single Route53 A record at this host's public IP.
//!
//! ## Features
//!
//! - Target IP given explicitly, read from a file, or fetched from the EC2
//!   instance metadata service
//! - Weighted UPSERT of the record in one change batch
//! - Optional wait until Route53 reports the change `INSYNC`
//!
//! ## Usage
//!
//! ```bash
//! # Publish the instance's public IP and wait for propagation
//! route53-ddns -domain home.example.com -zone Z123 -ip-metadata -wait
//!
//! # Publish the IP written by another tool
//! route53-ddns --domain home.example.com --zone Z123 --ip-file /run/public-ip
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod metadata;
pub mod providers;
pub mod resolver;
pub mod updater;
pub mod waiter;
pub mod workflow;

pub use config::Config;
pub use error::{DdnsError, Result};
pub use resolver::{TargetResolver, TargetSource};
pub use workflow::{run, Outcome};
