//! `sitekit plan` - show the ordered resource intents

use anyhow::{Context as _, Result, bail};
use colored::Colorize;
use declarative::ResourceIntent;

use crate::Context;
use crate::cli::PlanArgs;
use crate::ui;

pub fn run(ctx: &Context, args: &PlanArgs) -> Result<()> {
    let planned = super::load_plan(ctx, &args.env)?;
    let selected = planned.plan.select(args.target.as_deref());

    if let Some(target) = &args.target
        && selected.is_empty()
    {
        bail!("No intents match '{target}'");
    }

    if args.json {
        let json = serde_json::to_string_pretty(&selected).context("Failed to serialize plan")?;
        println!("{json}");
        return Ok(());
    }

    let config = &planned.config;
    if !ctx.quiet {
        ui::header(&format!("Plan: {}", config.stack_name()));
        ui::kv("site", &config.fqdn());
        ui::kv("aliases", &config.alternate_name());
        ui::kv("target", &config.target.to_string());
        ui::kv("tags", &ui::format_tags(&config.tags));
    }

    ui::section("Intents");
    for intent in &selected {
        let position = planned.plan.position(&intent.id).map_or(0, |p| p + 1);
        print_intent(position, intent, ctx.verbose > 0);
    }

    if !ctx.quiet {
        println!();
        let groups = planned.plan.group_by_kind();
        let summary = groups
            .iter()
            .map(|(kind, intents)| format!("{} {kind}", intents.len()))
            .collect::<Vec<_>>()
            .join(", ");
        ui::dim(&summary);
        ui::info(&format!(
            "{} planned for {}",
            ui::count(planned.plan.len(), "intent"),
            config.stack_name()
        ));
    }

    Ok(())
}

fn print_intent(position: usize, intent: &ResourceIntent, verbose: bool) {
    let marker = if intent.kind.is_lookup() {
        "~".blue()
    } else {
        "+".green()
    };
    println!(
        "  {:>2}. {} {} {}",
        position,
        marker,
        intent.id.bold(),
        format!("({})", intent.kind).dimmed()
    );

    let deps = intent.dependencies().iter().map(String::as_str);
    println!("        {} {}", "after:".dimmed(), ui::format_list(deps));
    if !intent.tags.is_empty() {
        println!(
            "        {} {}",
            "tags:".dimmed(),
            ui::format_tags(&intent.tags)
        );
    }

    if verbose {
        for (key, value) in &intent.properties {
            println!("        {} {}", format!("{key}:").dimmed(), value);
        }
    }
}
