//! Profile CLI commands
//!
//! Handles: hostbook profile list/show/create/edit/delete/validate/
//! enable-validation/disable-validation/set-default

use clap::Subcommand;
use serde_json::json;
use std::error::Error;
use tokio_util::sync::CancellationToken;

use hostbook_core::consumer::ProfileConsumer;
use hostbook_core::crud::ProfileCrud;
use hostbook_core::validation::ProfileRef;
use hostbook_core::Profile;

use super::Reported;
use crate::app::App;
use crate::terminal::{ConsoleNotifier, TerminalPrompter};

/// Profile commands
#[derive(Subcommand)]
pub enum ProfileCommands {
    /// List profiles
    List {
        /// Only profiles of this type
        #[arg(short, long, value_name = "TYPE")]
        r#type: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a profile (passwords are masked)
    Show {
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a profile interactively
    Create {
        name: String,
        /// Profile type (prompted when omitted)
        #[arg(short, long, value_name = "TYPE")]
        r#type: Option<String>,
        /// Existing profile whose fields pre-fill the prompts
        #[arg(long, value_name = "PROFILE")]
        from: Option<String>,
    },
    /// Edit every field of a profile interactively
    Edit { name: String },
    /// Delete a profile and every reference to it
    Delete {
        /// Profile name (picked from a list when omitted)
        name: Option<String>,
    },
    /// Check whether a profile's backend accepts its credentials
    Validate {
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Allow live validation for a profile
    EnableValidation { name: String },
    /// Skip live validation for a profile
    DisableValidation { name: String },
    /// Mark a profile as its type's default
    SetDefault { name: String },
}

/// Execute profile command
pub fn execute(cmd: ProfileCommands, app: &mut App, assume_yes: bool) -> Result<(), Box<dyn Error>> {
    match cmd {
        ProfileCommands::List { r#type, json } => execute_list(app, r#type.as_deref(), json),
        ProfileCommands::Show { name, json } => execute_show(app, &name, json),
        ProfileCommands::Create { name, r#type, from } => {
            execute_create(app, &name, r#type.as_deref(), from.as_deref())
        }
        ProfileCommands::Edit { name } => execute_edit(app, &name),
        ProfileCommands::Delete { name } => execute_delete(app, name.as_deref(), assume_yes),
        ProfileCommands::Validate { name, json } => execute_validate(app, &name, json),
        ProfileCommands::EnableValidation { name } => execute_toggle(app, &name, true),
        ProfileCommands::DisableValidation { name } => execute_toggle(app, &name, false),
        ProfileCommands::SetDefault { name } => {
            let profile = app.registry.set_default(&name)?;
            println!("Default {} profile: {}", profile.profile_type, profile.name);
            Ok(())
        }
    }
}

fn endpoint(profile: &Profile) -> String {
    match (profile.host(), profile.port()) {
        (Some(host), Some(port)) if !host.is_empty() => format!("{host}:{port}"),
        (Some(host), None) if !host.is_empty() => host.to_string(),
        _ => "-".to_string(),
    }
}

fn execute_list(app: &App, profile_type: Option<&str>, json_output: bool) -> Result<(), Box<dyn Error>> {
    let profiles: Vec<&Profile> = match profile_type {
        Some(t) => app.registry.profiles_for_types(&[t]),
        None => app.registry.all_profiles().iter().collect(),
    };
    let validator = app.registry.validator();

    if json_output {
        let entries: Vec<serde_json::Value> = profiles
            .iter()
            .map(|p| {
                let tag = validator.display_tag(&p.name);
                json!({
                    "name": p.name,
                    "type": p.profile_type,
                    "host": p.host(),
                    "port": p.port(),
                    "validate": tag.is_enabled(),
                    "context": ProfileRef::new(&p.name).with_tag(tag).context_value("profile"),
                })
            })
            .collect();
        let output = json!({
            "count": entries.len(),
            "profiles": entries,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if profiles.is_empty() {
        println!("No profiles found.");
        return Ok(());
    }

    println!("Profiles:");
    for p in profiles {
        let is_default = app
            .registry
            .default_profile(&p.profile_type)
            .is_some_and(|d| d.name == p.name);
        let validation = if validator.get_validation_setting(&p.name) {
            "on"
        } else {
            "off"
        };
        println!(
            "  {}{} ({}) {} validate={validation}",
            p.name,
            if is_default { " *" } else { "" },
            p.profile_type,
            endpoint(p),
        );
    }
    Ok(())
}

fn execute_show(app: &App, name: &str, json_output: bool) -> Result<(), Box<dyn Error>> {
    let profile = app.registry.load_named_profile(name, None)?.redacted();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    println!("Profile: {}", profile.name);
    println!("Type: {}", profile.profile_type);
    for (key, value) in &profile.fields {
        match value.as_str() {
            Some(s) => println!("  {key}: {s}"),
            None => println!("  {key}: {value}"),
        }
    }
    let enabled = app.registry.validator().get_validation_setting(&profile.name);
    println!("Validation: {}", if enabled { "enabled" } else { "disabled" });
    Ok(())
}

fn execute_create(
    app: &mut App,
    name: &str,
    profile_type: Option<&str>,
    from: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let template = from
        .map(|t| app.registry.load_named_profile(t, None))
        .transpose()?;

    let mut prompter = TerminalPrompter::stdio(false);
    let notifier = ConsoleNotifier;
    ProfileCrud::new(&mut app.registry, &mut prompter, &notifier)
        .create_new_connection(template.as_ref(), name, profile_type)
        .map_err(Reported)?;
    Ok(())
}

fn execute_edit(app: &mut App, name: &str) -> Result<(), Box<dyn Error>> {
    let profile = app.registry.load_named_profile(name, None)?;

    let mut prompter = TerminalPrompter::stdio(false);
    let notifier = ConsoleNotifier;
    let updated = ProfileCrud::new(&mut app.registry, &mut prompter, &notifier)
        .edit_session(&profile, name)
        .map_err(Reported)?;
    if updated.is_none() {
        println!("No changes saved.");
    }
    Ok(())
}

fn execute_delete(app: &mut App, name: Option<&str>, assume_yes: bool) -> Result<(), Box<dyn Error>> {
    let profile = name
        .map(|n| app.registry.load_named_profile(n, None))
        .transpose()?;
    let mut trees = app.trees()?;
    let mut consumers: Vec<&mut dyn ProfileConsumer> = trees
        .iter_mut()
        .map(|t| t as &mut dyn ProfileConsumer)
        .collect();

    let mut prompter = TerminalPrompter::stdio(assume_yes);
    let notifier = ConsoleNotifier;
    let report = ProfileCrud::new(&mut app.registry, &mut prompter, &notifier)
        .delete_profile(profile.as_ref(), &mut consumers)
        .map_err(Reported)?;

    let Some(report) = report else {
        return Ok(());
    };
    app.settings.remove(&report.profile.name)?;

    for consumer in report.consumers.iter().filter(|c| !c.is_complete()) {
        for (step, message) in &consumer.failed {
            eprintln!(
                "Warning: could not clean {step} in {}: {message}",
                consumer.domain
            );
        }
    }
    Ok(())
}

fn execute_validate(app: &App, name: &str, json_output: bool) -> Result<(), Box<dyn Error>> {
    let profile = app.registry.load_named_profile(name, None)?;
    let validator = app.registry.validator();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(async {
        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                on_interrupt.cancel();
            }
        });
        validator.check_current_profile(&profile, &cancel).await
    });

    if json_output {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}: {}", result.name, result.status);
    }
    Ok(())
}

fn execute_toggle(app: &App, name: &str, enable: bool) -> Result<(), Box<dyn Error>> {
    let profile = app.registry.load_named_profile(name, None)?;
    let validator = app.registry.validator();

    let node = ProfileRef::new(&profile.name).with_tag(validator.display_tag(&profile.name));
    let node = if enable {
        validator.enable_validation(&node)
    } else {
        validator.disable_validation(&node)
    };
    app.settings.set(&profile.name, enable)?;

    println!(
        "Validation {} for {} ({})",
        if enable { "enabled" } else { "disabled" },
        profile.name,
        node.tag.render()
    );
    Ok(())
}
