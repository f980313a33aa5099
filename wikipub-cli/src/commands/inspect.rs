//! `wikipub inspect` — validate and print a metadata file, no remote calls.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use wikipub_core::{metadata, PageNode};

/// Arguments for `wikipub inspect`.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to the publish metadata file (JSON).
    #[arg(long)]
    pub metadata: PathBuf,

    /// Emit the parsed tree as JSON.
    #[arg(long)]
    pub json: bool,
}

impl InspectArgs {
    pub fn run(self) -> Result<()> {
        let meta = metadata::load(&self.metadata).with_context(|| {
            format!("could not load metadata file '{}'", self.metadata.display())
        })?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&meta)?);
            return Ok(());
        }

        println!(
            "space '{}', ancestor {}, {} page(s)",
            meta.space_key,
            meta.ancestor_id,
            meta.page_count()
        );
        for page in &meta.pages {
            print_node(page, 0);
        }
        Ok(())
    }
}

fn print_node(node: &PageNode, depth: usize) {
    let indent = "  ".repeat(depth);
    let mut extras = Vec::new();
    if !node.attachments.is_empty() {
        extras.push(format!("{} attachment(s)", node.attachments.len()));
    }
    if !node.labels.is_empty() {
        extras.push(format!("{} label(s)", node.labels.len()));
    }
    let suffix = if extras.is_empty() {
        String::new()
    } else {
        format!(" [{}]", extras.join(", "))
    };
    println!(
        "{indent}{} {}{suffix}  {}",
        "•".blue(),
        node.title,
        node.content_file.display().to_string().dimmed()
    );
    for child in &node.children {
        print_node(child, depth + 1);
    }
}
