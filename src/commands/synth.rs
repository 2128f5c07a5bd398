//! `sitekit synth` - hand the plan to the provisioning engine

use anyhow::Result;
use colored::Colorize;
use declarative::{
    AutoConfirm, ChangeAction, ChangeResult, ChangeSet, ConfirmCallback, ExecuteOptions,
    ExecuteSummary, ProgressCallback, execute,
};
use dialoguer::Confirm;

use crate::Context;
use crate::assembly::AssemblyEngine;
use crate::cli::SynthArgs;
use crate::site::ids;
use crate::ui;

pub fn run(ctx: &Context, args: &SynthArgs) -> Result<()> {
    let planned = super::load_plan(ctx, &args.env)?;
    let config = &planned.config;

    let mut engine = AssemblyEngine::new(config, &args.out)
        .with_asset(ids::REWRITE_FUNCTION, &config.function_asset_path);

    if !ctx.quiet {
        ui::header(&format!("Synth: {}", config.stack_name()));
        ui::kv("target", &config.target.to_string());
        ui::kv("output", &engine.assembly_path().display().to_string());
    }

    let opts = ExecuteOptions {
        dry_run: args.dry_run,
        verbose: ctx.verbose > 0,
    };
    let mut progress = ConsoleProgress { quiet: ctx.quiet };

    let summary = if args.yes {
        execute(&planned.plan, &mut engine, &opts, &mut progress, &mut AutoConfirm)?
    } else {
        execute(&planned.plan, &mut engine, &opts, &mut progress, &mut PromptConfirm)?
    };

    print_summary(&summary, args.dry_run);
    if !summary.is_success() {
        anyhow::bail!("{} changes failed", summary.failed);
    }
    Ok(())
}

/// Prints the change set and per-change results
struct ConsoleProgress {
    quiet: bool,
}

impl ProgressCallback for ConsoleProgress {
    fn on_plan(&mut self, changes: &ChangeSet) {
        if self.quiet {
            return;
        }
        ui::section("Changes");
        for change in &changes.changes {
            let marker = match change.action {
                ChangeAction::Submit => "+".green(),
                ChangeAction::Lookup => "~".blue(),
            };
            println!(
                "  {} {} {}",
                marker,
                change.intent_id,
                format!("({})", change.kind).dimmed()
            );
        }
        println!();
    }

    fn on_change_complete(&mut self, intent_id: &str, result: &ChangeResult) {
        match result {
            ChangeResult::Submitted => log::info!("{intent_id}: submitted"),
            ChangeResult::Skipped { reason } => log::info!("{intent_id}: skipped ({reason})"),
            ChangeResult::Failed { error } => ui::error(&format!("{intent_id}: {error}")),
        }
    }

    fn on_apply_complete(&mut self, location: Option<&str>) {
        if let Some(location) = location {
            ui::success(&format!("Wrote {location}"));
        }
    }
}

/// Asks on the terminal before writing anything
struct PromptConfirm;

impl ConfirmCallback for PromptConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let confirmed = Confirm::new()
            .with_prompt(prompt)
            .default(true)
            .interact()?;
        Ok(confirmed)
    }
}

fn print_summary(summary: &ExecuteSummary, dry_run: bool) {
    if dry_run {
        ui::info(&format!(
            "Dry run: {} would be handed to the engine",
            ui::count(summary.skipped, "change")
        ));
        return;
    }
    if summary.total() == 0 {
        ui::info("Nothing to do");
        return;
    }
    if summary.submitted == 0 && summary.failed == 0 {
        ui::warn("Nothing was written");
        return;
    }

    println!();
    if summary.is_success() {
        println!("  {} Assembly written", "✓".green().bold());
    } else {
        println!("  {} Assembly written with errors", "⚠".yellow().bold());
    }
    if summary.submitted > 0 {
        println!("    • {} submitted", ui::count(summary.submitted, "intent"));
    }
    if summary.skipped > 0 {
        println!("    • {} skipped (looked up)", ui::count(summary.skipped, "intent"));
    }
    if summary.failed > 0 {
        println!(
            "    • {} {}",
            ui::count(summary.failed, "intent"),
            "failed".red()
        );
    }
}
