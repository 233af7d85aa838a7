//! List command implementation
//!
//! Lists configured hook types and how each sub-hook resolves.

use bettercommit_core::UPDATE_TEMPLATE;
use bettercommit_engine::{SubHookInvocation, SubHookRegistry};
use clap::Args;
use owo_colors::Style;
use serde::Serialize;

use crate::command::Command;
use crate::common::{ProjectArgs, RuntimeContext};
use crate::error::{CommandError, Result};

/// List command
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Project selection
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Output format (simple, json)
    #[arg(short, long, default_value = "simple")]
    pub format: String,
}

#[derive(Debug, Serialize)]
struct HookListing {
    name: String,
    sub_hooks: Vec<SubHookListing>,
}

#[derive(Debug, Serialize)]
struct SubHookListing {
    identifier: String,
    path: String,
    exists: bool,
}

impl From<&SubHookInvocation> for SubHookListing {
    fn from(invocation: &SubHookInvocation) -> Self {
        Self {
            identifier: invocation.display_name(),
            path: invocation.resolved_path.display().to_string(),
            exists: invocation.exists,
        }
    }
}

impl Command for ListCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let config = self.project.load_config();
        let registry = self.project.registry()?;

        let listings: Vec<HookListing> = config
            .specs()
            .iter()
            .map(|spec| HookListing {
                name: spec.hook_type.to_string(),
                sub_hooks: spec
                    .ordered_sub_hooks
                    .iter()
                    .map(|identifier| {
                        SubHookListing::from(&registry.resolve(spec.hook_type, identifier))
                    })
                    .collect(),
            })
            .collect();

        match self.format.as_str() {
            "json" => {
                let json = serde_json::json!({
                    "project": config.project,
                    "config": config.path,
                    "src_dir": registry.source_dir(),
                    "hooks": listings,
                });
                let text = serde_json::to_string_pretty(&json).map_err(anyhow::Error::from)?;
                println!("{text}");
            }
            "simple" => print_simple(context, &config.project, &listings),
            other => return Err(CommandError::UnknownFormat(other.to_string())),
        }

        Ok(())
    }
}

fn print_simple(context: &RuntimeContext, project: &str, listings: &[HookListing]) {
    println!("Project: {}", context.paint(project, Style::new().cyan()));

    if listings.is_empty() {
        println!("{}", context.paint("No hooks configured.", Style::new().yellow()));
        return;
    }

    for listing in listings {
        println!(
            "\n{} ({} sub-hooks)",
            context.paint(&listing.name, Style::new().bold()),
            listing.sub_hooks.len()
        );
        for sub_hook in &listing.sub_hooks {
            let update = if sub_hook.identifier == UPDATE_TEMPLATE {
                " [update]"
            } else {
                ""
            };
            if sub_hook.exists {
                println!(
                    "  • {}{update}",
                    context.paint(&sub_hook.identifier, Style::new().green())
                );
            } else {
                println!(
                    "  • {} {}",
                    context.paint(&sub_hook.identifier, Style::new().dimmed()),
                    context.paint("[missing]", Style::new().dimmed())
                );
            }
        }
    }
}
