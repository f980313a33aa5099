//! Wikipub — publish a local page tree into a remote wiki space.
//!
//! # Usage
//!
//! ```text
//! wikipub publish --metadata <file> --base-url <url> [--username <u> --password <p>]
//!                 [--strategy append-to-ancestor|replace-ancestor]
//!                 [--orphans remove|keep] [--version-message <msg>]
//!                 [--no-notify-watchers]
//! wikipub inspect --metadata <file> [--json]
//! ```

mod commands;

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{inspect::InspectArgs, publish::PublishArgs};
use wikipub_engine::{OrphanPolicy, PublishingStrategy};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "wikipub",
    version,
    about = "Publish a local page tree into a remote wiki space",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile the local tree against the remote space.
    Publish(PublishArgs),

    /// Load and print the metadata file without any remote call.
    Inspect(InspectArgs),
}

// ---------------------------------------------------------------------------
// Shared argument wrappers — parsed from CLI strings, convert to engine types
// ---------------------------------------------------------------------------

/// Thin wrapper so clap can parse `PublishingStrategy` from CLI args.
#[derive(Debug, Clone)]
pub struct StrategyArg(pub PublishingStrategy);

impl FromStr for StrategyArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "append-to-ancestor" => Ok(Self(PublishingStrategy::AppendToAncestor)),
            "replace-ancestor" => Ok(Self(PublishingStrategy::ReplaceAncestor)),
            other => Err(format!(
                "unknown strategy '{other}'; expected: append-to-ancestor, replace-ancestor"
            )),
        }
    }
}

impl fmt::Display for StrategyArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            PublishingStrategy::AppendToAncestor => f.write_str("append-to-ancestor"),
            PublishingStrategy::ReplaceAncestor => f.write_str("replace-ancestor"),
        }
    }
}

/// Thin wrapper so clap can parse `OrphanPolicy` from CLI args.
#[derive(Debug, Clone)]
pub struct OrphanPolicyArg(pub OrphanPolicy);

impl FromStr for OrphanPolicyArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "remove" => Ok(Self(OrphanPolicy::RemoveOrphans)),
            "keep" => Ok(Self(OrphanPolicy::KeepOrphans)),
            other => Err(format!("unknown orphan policy '{other}'; expected: remove, keep")),
        }
    }
}

impl fmt::Display for OrphanPolicyArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            OrphanPolicy::RemoveOrphans => f.write_str("remove"),
            OrphanPolicy::KeepOrphans => f.write_str("keep"),
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Publish(args) => args.run(),
        Commands::Inspect(args) => args.run(),
    }
}
