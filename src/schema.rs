use crate::error::{Result, SiteError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::LazyLock;

// ============================================================================
// Site Config Schema
// ============================================================================

/// One DNS label: letters, digits and inner hyphens, at most 63 characters
static DNS_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?$").expect("valid regex")
});

const MAX_DOMAIN_LEN: usize = 253;

/// Fully resolved configuration for one site in one environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Application name, first half of the stack name
    pub app_name: String,

    pub environment: Environment,

    /// Apex domain; also the name of the hosted zone to look up
    pub domain_name: String,

    /// Optional subdomain prepended to the apex domain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_domain_name: Option<String>,

    /// Path of the edge rewrite function script
    pub function_asset_path: PathBuf,

    /// Tags applied to every taggable resource
    #[serde(default)]
    pub tags: BTreeMap<String, String>,

    /// Account and region the stack deploys into; never read from the file
    #[serde(default, skip_deserializing)]
    pub target: DeploymentTarget,
}

impl SiteConfig {
    /// Fully-qualified domain name of the site
    pub fn fqdn(&self) -> String {
        match &self.sub_domain_name {
            Some(sub) => format!("{}.{}", sub, self.domain_name),
            None => self.domain_name.clone(),
        }
    }

    /// The `www.` alternative of the fqdn
    pub fn alternate_name(&self) -> String {
        format!("www.{}", self.fqdn())
    }

    /// Stack name, e.g. `GamesSite-dev`
    pub fn stack_name(&self) -> String {
        format!("{}-{}", self.app_name, self.environment)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.app_name.trim().is_empty() {
            return Err(SiteError::config("app_name must not be empty"));
        }

        if self.domain_name.trim().is_empty() {
            return Err(SiteError::config("domain_name must not be empty"));
        }
        validate_dns_name(&self.domain_name, "domain_name", 2)?;

        if let Some(sub) = &self.sub_domain_name {
            validate_dns_name(sub, "sub_domain_name", 1)?;
        }

        if self.fqdn().len() > MAX_DOMAIN_LEN - "www.".len() {
            return Err(SiteError::config(format!(
                "fully-qualified domain name '{}' is too long",
                self.fqdn()
            )));
        }

        if self.function_asset_path.as_os_str().is_empty() {
            return Err(SiteError::config("function_asset_path must not be empty"));
        }

        for key in self.tags.keys() {
            if key.trim().is_empty() {
                return Err(SiteError::config("tag keys must not be empty"));
            }
        }

        Ok(())
    }
}

fn validate_dns_name(name: &str, field: &str, min_labels: usize) -> Result<()> {
    if name.ends_with('.') {
        return Err(SiteError::config(format!(
            "{field} '{name}' must not end with a dot"
        )));
    }
    let labels: Vec<&str> = name.split('.').collect();
    if labels.len() < min_labels {
        return Err(SiteError::config(format!(
            "{field} '{name}' must have at least {min_labels} labels"
        )));
    }
    if let Some(bad) = labels.iter().find(|l| !DNS_LABEL_RE.is_match(l)) {
        return Err(SiteError::config(format!(
            "{field} '{name}' contains an invalid label '{bad}'"
        )));
    }
    Ok(())
}

// ============================================================================
// Environment
// ============================================================================

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub const ALL: [Environment; 3] = [Self::Dev, Self::Staging, Self::Prod];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Staging => "staging",
            Self::Prod => "prod",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| {
                SiteError::config(format!(
                    "unknown environment '{s}' (expected dev, staging or prod)"
                ))
            })
    }
}

// ============================================================================
// Deployment Target
// ============================================================================

/// Cloud account and region, passed in explicitly at resolve time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeploymentTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl DeploymentTarget {
    /// Overlay explicit values (e.g. CLI flags) onto this target
    pub fn with_overrides(mut self, account: Option<String>, region: Option<String>) -> Self {
        if account.is_some() {
            self.account = account;
        }
        if region.is_some() {
            self.region = region;
        }
        self
    }
}

impl fmt::Display for DeploymentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}",
            self.account.as_deref().unwrap_or("unknown-account"),
            self.region.as_deref().unwrap_or("unknown-region")
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SiteConfig {
        SiteConfig {
            app_name: "GamesSite".to_string(),
            environment: Environment::Dev,
            domain_name: "greathonor.org".to_string(),
            sub_domain_name: Some("games".to_string()),
            function_asset_path: PathBuf::from("functions/url-rewrite.js"),
            tags: BTreeMap::new(),
            target: DeploymentTarget::default(),
        }
    }

    #[test]
    fn test_fqdn_with_subdomain() {
        let config = config();
        assert_eq!(config.fqdn(), "games.greathonor.org");
        assert_eq!(config.alternate_name(), "www.games.greathonor.org");
        assert_eq!(config.stack_name(), "GamesSite-dev");
    }

    #[test]
    fn test_fqdn_without_subdomain() {
        let mut config = config();
        config.sub_domain_name = None;
        assert_eq!(config.fqdn(), "greathonor.org");
        assert_eq!(config.alternate_name(), "www.greathonor.org");
    }

    #[test]
    fn test_validation() {
        assert!(config().validate().is_ok());

        let mut bad = config();
        bad.domain_name = String::new();
        assert!(bad.validate().is_err());

        let mut bad = config();
        bad.domain_name = "localhost".to_string();
        assert!(bad.validate().is_err());

        let mut bad = config();
        bad.sub_domain_name = Some("-games".to_string());
        assert!(bad.validate().is_err());

        let mut ok = config();
        ok.sub_domain_name = Some("beta.games".to_string());
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_trailing_dot_is_rejected() {
        let mut bad = config();
        bad.domain_name = "greathonor.org.".to_string();
        let err = bad.validate().unwrap_err();
        assert!(matches!(err, SiteError::Config(ref msg) if msg.contains("end with a dot")));

        let mut bad = config();
        bad.sub_domain_name = Some("games.".to_string());
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Prod);
        assert!("production".parse::<Environment>().is_err());
    }

    #[test]
    fn test_target_is_not_read_from_document() {
        let json = serde_json::json!({
            "app_name": "GamesSite",
            "environment": "dev",
            "domain_name": "greathonor.org",
            "function_asset_path": "f.js",
            "target": { "account": "1" }
        });
        assert!(serde_json::from_value::<SiteConfig>(json).is_err());
    }

    #[test]
    fn test_target_overrides() {
        let target = DeploymentTarget {
            account: Some("111".into()),
            region: Some("us-east-1".into()),
        }
        .with_overrides(None, Some("eu-west-1".into()));

        assert_eq!(target.account.as_deref(), Some("111"));
        assert_eq!(target.region.as_deref(), Some("eu-west-1"));
        assert_eq!(target.to_string(), "111/eu-west-1");
    }
}
