//! Configuration resolver - base + environment overlay -> SiteConfig

use crate::error::{Result, SiteError};
use crate::merge::deep_merge;
use crate::schema::{DeploymentTarget, SiteConfig};
use serde_json::Value;
use std::collections::BTreeMap;

/// Resolve the site configuration for one environment
///
/// `selected` is the environment name given by the caller; it must be a key
/// of `overlays`. The target is passed in rather than looked up, so the same
/// inputs always resolve to the same config.
pub fn resolve(
    base: &Value,
    overlays: &BTreeMap<String, Value>,
    selected: Option<&str>,
    target: DeploymentTarget,
) -> Result<SiteConfig> {
    let Some(selected) = selected.map(str::trim).filter(|s| !s.is_empty()) else {
        return Err(SiteError::config(format!(
            "no environment selected; pass --env <{}>",
            available(overlays, "|")
        )));
    };

    let Some(overlay) = overlays.get(selected) else {
        return Err(SiteError::config(format!(
            "environment '{selected}' is not configured (available: {})",
            available(overlays, ", ")
        )));
    };

    ensure_mapping(base, "base configuration")?;
    ensure_mapping(overlay, &format!("overlay '{selected}'"))?;

    let mut merged = deep_merge(base, overlay)?;
    if let Value::Object(map) = &mut merged
        && !matches!(map.get("environment"), Some(v) if !v.is_null())
    {
        map.insert("environment".to_string(), Value::String(selected.to_string()));
    }

    let mut config: SiteConfig = serde_json::from_value(merged).map_err(|e| {
        SiteError::config(format!("invalid configuration for '{selected}': {e}"))
    })?;
    config.target = target;
    config.validate()?;

    if config.environment.as_str() != selected {
        log::warn!(
            "overlay '{}' sets environment '{}'",
            selected,
            config.environment
        );
    }
    log::debug!(
        "resolved {} for {} ({})",
        config.stack_name(),
        config.fqdn(),
        config.target
    );

    Ok(config)
}

fn available(overlays: &BTreeMap<String, Value>, sep: &str) -> String {
    if overlays.is_empty() {
        return "none".to_string();
    }
    overlays.keys().map(String::as_str).collect::<Vec<_>>().join(sep)
}

fn ensure_mapping(value: &Value, what: &str) -> Result<()> {
    match value {
        Value::Object(_) | Value::Null => Ok(()),
        _ => Err(SiteError::config(format!("{what} must be a mapping"))),
    }
}
