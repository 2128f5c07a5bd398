//! `sitekit config` - inspect and validate the site configuration

use anyhow::{Context as _, Result, bail};
use colored::Colorize;

use crate::Context;
use crate::cli::EnvArgs;
use crate::config;
use crate::resolver;
use crate::site;
use crate::ui;

/// Print the resolved configuration for one environment
pub fn show(ctx: &Context, args: &EnvArgs) -> Result<()> {
    let file = super::load_site_file(ctx)?;
    let config = super::resolve_env(&file, args)?;

    if ctx.quiet {
        let json = serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
        println!("{json}");
        return Ok(());
    }

    ui::header(&format!("Config: {}", config.stack_name()));
    ui::kv("file", &file.path.display().to_string());
    ui::kv("app_name", &config.app_name);
    ui::kv("environment", config.environment.as_str());
    ui::kv("domain_name", &config.domain_name);
    ui::kv(
        "sub_domain_name",
        config.sub_domain_name.as_deref().unwrap_or("-"),
    );
    ui::kv("fqdn", &config.fqdn());
    ui::kv(
        "function_asset_path",
        &config.function_asset_path.display().to_string(),
    );
    ui::kv("tags", &ui::format_tags(&config.tags));
    ui::kv("target", &config.target.to_string());
    Ok(())
}

/// List the environment overlays defined in the file
pub fn envs(ctx: &Context) -> Result<()> {
    let file = super::load_site_file(ctx)?;
    for name in file.environment_names() {
        println!("{name}");
    }
    Ok(())
}

/// Resolve and build every environment, reporting each result
pub fn validate(ctx: &Context) -> Result<()> {
    let file = super::load_site_file(ctx)?;
    let mut failed = 0usize;

    if !ctx.quiet {
        ui::header(&format!("Validating {}", file.path.display()));
    }
    if file.zones.is_empty() {
        ui::warn("No [[zones]] defined; every environment will fail zone lookup");
    }

    for name in file.environment_names() {
        let result = resolver::resolve(&file.base, &file.overlays, Some(name), file.target.clone())
            .and_then(|config| {
                site::build(&config, &file.zones)?;
                Ok(config)
            });

        match result {
            Ok(config) => {
                if !ctx.quiet {
                    println!(
                        "  {} {} {}",
                        "✓".green(),
                        name,
                        format!("({})", config.fqdn()).dimmed()
                    );
                }
            }
            Err(e) => {
                failed += 1;
                println!("  {} {}: {}", "✗".red(), name, e);
            }
        }
    }

    if failed > 0 {
        bail!(
            "{} of {} failed validation",
            ui::count(failed, "environment"),
            file.overlays.len()
        );
    }
    if !ctx.quiet {
        ui::success("All environments are valid");
    }
    Ok(())
}

/// Write a starter config at the configured path
pub fn init(ctx: &Context) -> Result<()> {
    config::write_starter(&ctx.config_path)?;
    ui::success(&format!("Created {}", ctx.config_path.display()));
    ui::dim("Edit the [[zones]] entry and domain names, then run `sitekit plan --env dev`");
    Ok(())
}
