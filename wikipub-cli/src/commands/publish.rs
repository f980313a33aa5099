//! `wikipub publish` — reconcile the local tree against the remote space.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use wikipub_client::{RemotePage, RestClient};
use wikipub_core::metadata;
use wikipub_engine::{PublishListener, PublishOptions, PublishReport, Publisher};

use crate::{OrphanPolicyArg, StrategyArg};

/// Arguments for `wikipub publish`.
#[derive(Args, Debug)]
pub struct PublishArgs {
    /// Path to the publish metadata file (JSON).
    #[arg(long)]
    pub metadata: PathBuf,

    /// Base URL of the remote wiki, e.g. https://wiki.example.com.
    #[arg(long)]
    pub base_url: String,

    /// Basic-auth user name.
    #[arg(long, requires = "password")]
    pub username: Option<String>,

    /// Basic-auth password.
    #[arg(long, requires = "username")]
    pub password: Option<String>,

    /// How local roots map onto the anchor page.
    #[arg(long, default_value = "append-to-ancestor")]
    pub strategy: StrategyArg,

    /// What happens to remote pages with no local counterpart.
    #[arg(long, default_value = "remove")]
    pub orphans: OrphanPolicyArg,

    /// Free-text message recorded with every page create/update.
    #[arg(long)]
    pub version_message: Option<String>,

    /// Suppress watcher notifications for updates.
    #[arg(long)]
    pub no_notify_watchers: bool,
}

impl PublishArgs {
    pub fn run(self) -> Result<()> {
        let meta = metadata::load(&self.metadata).with_context(|| {
            format!("could not load metadata file '{}'", self.metadata.display())
        })?;

        let credentials = self.username.zip(self.password);
        let client = RestClient::new(&self.base_url, &meta.space_key, credentials)
            .context("could not build remote client")?;

        let options = PublishOptions {
            strategy: self.strategy.0,
            orphan_policy: self.orphans.0,
            version_message: self.version_message,
            notify_watchers: !self.no_notify_watchers,
        };

        let page_count = meta.page_count();
        println!(
            "Publishing {page_count} page(s) to {} (space '{}', ancestor {})",
            self.base_url, meta.space_key, meta.ancestor_id
        );

        let mut publisher = Publisher::new(client, meta, options, ConsoleListener);
        let report = publisher.publish().context("publish failed")?;
        print_summary(&report);
        Ok(())
    }
}

/// Prints one line per lifecycle event as the run progresses.
struct ConsoleListener;

impl PublishListener for ConsoleListener {
    fn page_added(&mut self, page: &RemotePage) {
        println!("  {}  page '{}' (id {})", "+".green(), page.title, page.id);
    }

    fn page_updated(&mut self, existing: &RemotePage, updated: &RemotePage) {
        println!(
            "  {}  page '{}' (id {}, version {} -> {})",
            "~".yellow(),
            updated.title,
            updated.id,
            existing.version,
            updated.version
        );
    }

    fn page_deleted(&mut self, page: &RemotePage) {
        println!("  {}  page '{}' (id {})", "-".red(), page.title, page.id);
    }

    fn attachment_added(&mut self, file_name: &str, page_id: &str) {
        println!("  {}  attachment '{file_name}' (page {page_id})", "+".green());
    }

    fn attachment_updated(&mut self, file_name: &str, page_id: &str) {
        println!("  {}  attachment '{file_name}' (page {page_id})", "~".yellow());
    }

    fn attachment_deleted(&mut self, file_name: &str, page_id: &str) {
        println!("  {}  attachment '{file_name}' (page {page_id})", "-".red());
    }
}

fn print_summary(report: &PublishReport) {
    if !report.has_changes() {
        println!(
            "{} nothing to do ({} page(s) already up to date)",
            "✓".green(),
            report.pages_unchanged
        );
        return;
    }

    println!(
        "{} pages: {} added, {} updated, {} unchanged, {} deleted",
        "✓".green(),
        report.pages_added,
        report.pages_updated,
        report.pages_unchanged,
        report.pages_deleted
    );
    println!(
        "  attachments: {} added, {} updated, {} deleted",
        report.attachments_added, report.attachments_updated, report.attachments_deleted
    );
    println!(
        "  labels: {} added, {} deleted",
        report.labels_added, report.labels_deleted
    );
}
