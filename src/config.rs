use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::schema::DeploymentTarget;
use crate::zones::{HostedZone, ZoneCatalog};

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "site.toml";

/// Environment variable overriding the config path
pub const ENV_CONFIG: &str = "SITEKIT_CONFIG";

/// Fields holding paths that are resolved relative to the config file
const PATH_FIELDS: [&str; 1] = ["function_asset_path"];

// ============================================================================
// Config File
// ============================================================================

/// Supported config file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Pick the format from a file extension, defaulting to TOML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSiteFile {
    #[serde(default)]
    app: Value,
    #[serde(default)]
    environments: BTreeMap<String, Value>,
    #[serde(default)]
    target: DeploymentTarget,
    #[serde(default)]
    zones: Vec<HostedZone>,
}

/// Contents of a site config file, before any environment is resolved
#[derive(Debug, Clone)]
pub struct SiteFile {
    /// Where the file was loaded from
    pub path: PathBuf,
    /// Shared base configuration (`[app]`)
    pub base: Value,
    /// Environment overlays (`[environments.<name>]`)
    pub overlays: BTreeMap<String, Value>,
    /// Default deployment target (`[target]`)
    pub target: DeploymentTarget,
    /// Known hosted zones (`[[zones]]`)
    pub zones: ZoneCatalog,
}

impl SiteFile {
    /// Load a site config file
    ///
    /// Relative paths inside the file are anchored at the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read config file: {}", path.display()))?;

        let format = ConfigFormat::from_path(path);
        let mut file = Self::parse(&content, format)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        file.path = path.to_path_buf();

        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        anchor_paths(&mut file.base, dir);
        for overlay in file.overlays.values_mut() {
            anchor_paths(overlay, dir);
        }

        log::debug!(
            "Loaded {} with {} environments and {} zones",
            path.display(),
            file.overlays.len(),
            file.zones.zones().len()
        );
        Ok(file)
    }

    /// Parse config text without touching the filesystem
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        let raw: RawSiteFile = match format {
            ConfigFormat::Toml => toml::from_str(content).context("Invalid TOML format")?,
            ConfigFormat::Json => serde_json::from_str(content).context("Invalid JSON format")?,
        };

        if raw.environments.is_empty() {
            bail!("No environments defined; add at least one [environments.<name>] table");
        }

        Ok(Self {
            path: PathBuf::new(),
            base: raw.app,
            overlays: raw.environments,
            target: raw.target,
            zones: ZoneCatalog::new(raw.zones),
        })
    }

    /// Names of the configured environments, sorted
    pub fn environment_names(&self) -> Vec<&str> {
        self.overlays.keys().map(String::as_str).collect()
    }
}

/// Resolve the config path from the CLI flag (which already honours
/// `SITEKIT_CONFIG`), expanding `~`
pub fn config_path(flag: Option<&str>) -> PathBuf {
    let raw = flag.unwrap_or(DEFAULT_CONFIG_FILE);
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

fn anchor_paths(value: &mut Value, dir: &Path) {
    let Value::Object(map) = value else {
        return;
    };
    for field in PATH_FIELDS {
        if let Some(Value::String(raw)) = map.get_mut(field) {
            let expanded = PathBuf::from(shellexpand::tilde(raw.as_str()).as_ref());
            let anchored = if expanded.is_relative() {
                dir.join(expanded)
            } else {
                expanded
            };
            *raw = anchored.to_string_lossy().into_owned();
        }
    }
}

// ============================================================================
// Starter Config
// ============================================================================

/// Starter config written by `sitekit config init`
pub const STARTER_CONFIG: &str = r#"# sitekit site configuration

[app]
app_name = "MySite"
function_asset_path = "functions/url-rewrite.js"

[app.tags]
site = "my-site"

[environments.dev]
domain_name = "example.org"
sub_domain_name = "dev"

[environments.dev.tags]
"env-type" = "dev"

[environments.prod]
domain_name = "example.org"

[environments.prod.tags]
"env-type" = "prod"

[target]
# account = "123456789012"
region = "us-east-1"

[[zones]]
id = "Z0000000000000"
name = "example.org"
"#;

/// Write the starter config, refusing to overwrite an existing file
pub fn write_starter(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    fs::write(path, STARTER_CONFIG)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zones::ZoneLookup;

    #[test]
    fn test_parse_starter_config() {
        let file = SiteFile::parse(STARTER_CONFIG, ConfigFormat::Toml).unwrap();

        assert_eq!(file.environment_names(), vec!["dev", "prod"]);
        assert_eq!(file.base["app_name"], "MySite");
        assert_eq!(file.base["tags"]["site"], "my-site");
        assert_eq!(file.overlays["dev"]["sub_domain_name"], "dev");
        assert_eq!(file.target.region.as_deref(), Some("us-east-1"));
        assert!(file.target.account.is_none());
        assert!(file.zones.find("example.org").is_some());
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{
            "app": { "app_name": "Docs" },
            "environments": { "staging": { "domain_name": "docs.dev" } }
        }"#;
        let file = SiteFile::parse(json, ConfigFormat::Json).unwrap();

        assert_eq!(file.environment_names(), vec!["staging"]);
        assert!(file.zones.is_empty());
    }

    #[test]
    fn test_parse_requires_environments() {
        let err = SiteFile::parse("[app]\napp_name = \"x\"\n", ConfigFormat::Toml).unwrap_err();
        assert!(err.to_string().contains("No environments"));
    }

    #[test]
    fn test_parse_rejects_unknown_sections() {
        let toml = "[environments.dev]\n[prod]\nappName = \"x\"\n";
        assert!(SiteFile::parse(toml, ConfigFormat::Toml).is_err());
    }

    #[test]
    fn test_load_anchors_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.toml");
        fs::write(&path, STARTER_CONFIG).unwrap();

        let file = SiteFile::load(&path).unwrap();
        let expected = dir.path().join("functions/url-rewrite.js");
        assert_eq!(
            file.base["function_asset_path"],
            expected.to_string_lossy().as_ref()
        );
    }

    #[test]
    fn test_write_starter_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("site.toml");

        write_starter(&path).unwrap();
        assert!(path.exists());
        assert!(write_starter(&path).is_err());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("a.toml")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("site")), ConfigFormat::Toml);
    }
}
