pub mod config;
pub mod plan;
pub mod synth;

use anyhow::{Context as _, Result};
use declarative::{IntentPlan, apply_tags};

use crate::Context;
use crate::cli::EnvArgs;
use crate::config::SiteFile;
use crate::resolver;
use crate::schema::SiteConfig;
use crate::site;

/// Load the site file named by the global `--config`
pub fn load_site_file(ctx: &Context) -> Result<SiteFile> {
    SiteFile::load(&ctx.config_path)
}

/// Resolve the selected environment of a loaded site file
pub fn resolve_env(file: &SiteFile, args: &EnvArgs) -> Result<SiteConfig> {
    let target = file
        .target
        .clone()
        .with_overrides(args.account.clone(), args.region.clone());
    let config = resolver::resolve(&file.base, &file.overlays, args.env.as_deref(), target)?;
    Ok(config)
}

/// Everything a command needs after resolving and building
pub struct Planned {
    pub config: SiteConfig,
    pub plan: IntentPlan,
}

/// Load, resolve, build and tag in one go
pub fn load_plan(ctx: &Context, args: &EnvArgs) -> Result<Planned> {
    let file = load_site_file(ctx)?;
    let config = resolve_env(&file, args)?;
    let mut plan = site::build(&config, &file.zones)
        .with_context(|| format!("Failed to build plan for {}", config.stack_name()))?;
    let tagged = apply_tags(&mut plan, &config.tags);
    log::debug!("tagged {tagged} of {} intents", plan.len());

    Ok(Planned { config, plan })
}
