//! Session tree CLI commands
//!
//! Handles: hostbook tree list/add

use clap::Subcommand;
use serde_json::json;
use std::error::Error;

use hostbook_core::consumer::tree::DEFAULT_DOMAINS;
use hostbook_core::consumer::{ProfileConsumer, SessionTree};
use hostbook_core::ProfileError;

use crate::app::App;

/// Session tree commands
#[derive(Subcommand)]
pub enum TreeCommands {
    /// Show the session trees
    List {
        /// Only this domain (datasets, files, jobs)
        domain: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a profile to a domain's tree
    Add {
        /// Domain (datasets, files, jobs)
        domain: String,
        /// Profile name
        profile: String,
        /// Also add a favorite with this label
        #[arg(long, value_name = "LABEL")]
        favorite: Option<String>,
        /// Also record a history entry with this label
        #[arg(long, value_name = "LABEL")]
        history: Option<String>,
    },
}

/// Execute tree command
pub fn execute(cmd: TreeCommands, app: &App) -> Result<(), Box<dyn Error>> {
    match cmd {
        TreeCommands::List { domain, json } => execute_list(app, domain.as_deref(), json),
        TreeCommands::Add {
            domain,
            profile,
            favorite,
            history,
        } => execute_add(app, &domain, &profile, favorite.as_deref(), history.as_deref()),
    }
}

fn check_domain(domain: &str) -> Result<(), Box<dyn Error>> {
    if DEFAULT_DOMAINS.contains(&domain) {
        return Ok(());
    }
    Err(format!(
        "Unknown domain '{domain}'. Expected one of: {}",
        DEFAULT_DOMAINS.join(", ")
    )
    .into())
}

fn execute_list(app: &App, domain: Option<&str>, json_output: bool) -> Result<(), Box<dyn Error>> {
    if let Some(d) = domain {
        check_domain(d)?;
    }
    let trees: Vec<SessionTree> = app
        .trees()?
        .into_iter()
        .filter(|t| domain.map_or(true, |d| t.domain() == d))
        .collect();

    if json_output {
        let entries: Vec<serde_json::Value> = trees
            .iter()
            .map(|t| {
                json!({
                    "domain": t.domain(),
                    "sessions": t.session_names(),
                    "favorites": t.favorites(),
                    "history": t.file_history(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for tree in &trees {
        println!("[{}]", tree.domain());
        let sessions = tree.session_names();
        if sessions.is_empty() {
            println!("  (no sessions)");
        }
        for session in sessions {
            println!("  {session}");
        }
        for favorite in tree.favorites() {
            println!("  favorite {favorite}");
        }
        for entry in tree.file_history() {
            println!("  history {entry}");
        }
    }
    Ok(())
}

fn execute_add(
    app: &App,
    domain: &str,
    profile: &str,
    favorite: Option<&str>,
    history: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    check_domain(domain)?;
    let name = app
        .registry
        .find_by_name(profile)
        .map(|p| p.name.clone())
        .ok_or_else(|| ProfileError::NotFound {
            name: profile.to_string(),
        })?;

    let mut tree = app
        .trees()?
        .into_iter()
        .find(|t| t.domain() == domain)
        .ok_or_else(|| format!("Tree '{domain}' is not available"))?;

    tree.add_session(&name);
    if let Some(label) = favorite {
        tree.add_favorite(&name, label);
    }
    if let Some(label) = history {
        tree.add_history(&name, label);
    }
    tree.save()?;

    println!("Added {name} to the {domain} tree.");
    Ok(())
}
