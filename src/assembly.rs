//! Assembly engine - writes the plan to disk for the external provisioning engine
//!
//! The assembly is a single JSON document per stack. It carries the
//! ordered intents plus enough metadata for the external engine to run
//! its own plan/apply cycle; no cloud API is called from here.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use declarative::{
    Change, ChangeAction, ChangeResult, ChangeSet, IntentPlan, Outcome, ProvisioningEngine,
    ResourceIntent,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::schema::{DeploymentTarget, Environment, SiteConfig};

/// Format version of the assembly document
pub const ASSEMBLY_VERSION: u32 = 1;

/// The document handed to the external provisioning engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assembly {
    pub version: u32,
    pub stack: String,
    pub environment: Environment,
    pub target: DeploymentTarget,
    pub generated_at: DateTime<Utc>,
    pub assets: Vec<AssetRecord>,
    pub intents: Vec<ResourceIntent>,
}

/// A local file the engine must upload alongside the intents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    /// Intent that consumes the asset
    pub intent_id: String,
    pub path: PathBuf,
    /// BLAKE3 hex digest of the file contents, if it could be read
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

impl AssetRecord {
    /// Record an asset, fingerprinting it when the file is readable
    pub fn fingerprint(intent_id: &str, path: &Path) -> Self {
        let fingerprint = match fs::read(path) {
            Ok(bytes) => Some(blake3::hash(&bytes).to_hex().to_string()),
            Err(e) => {
                log::warn!("Could not fingerprint asset {}: {e}", path.display());
                None
            }
        };
        Self {
            intent_id: intent_id.to_string(),
            path: path.to_path_buf(),
            fingerprint,
        }
    }
}

/// Engine that "applies" a plan by writing the assembly document
pub struct AssemblyEngine {
    out_dir: PathBuf,
    stack: String,
    environment: Environment,
    target: DeploymentTarget,
    assets: Vec<AssetRecord>,
    pending: Option<IntentPlan>,
}

impl AssemblyEngine {
    pub fn new(config: &SiteConfig, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            stack: config.stack_name(),
            environment: config.environment,
            target: config.target.clone(),
            assets: Vec::new(),
            pending: None,
        }
    }

    /// Register a local asset file consumed by an intent
    pub fn with_asset(mut self, intent_id: &str, path: &Path) -> Self {
        self.assets.push(AssetRecord::fingerprint(intent_id, path));
        self
    }

    /// Path the assembly for this stack is written to
    pub fn assembly_path(&self) -> PathBuf {
        self.out_dir.join(format!("{}.assembly.json", self.stack))
    }
}

impl ProvisioningEngine for AssemblyEngine {
    fn name(&self) -> &str {
        "assembly"
    }

    /// Every intent is handed over; lookups are marked as such
    fn plan(&mut self, intents: &IntentPlan) -> Result<ChangeSet> {
        let mut changes = ChangeSet::new(&self.stack);
        for intent in intents {
            changes.changes.push(Change {
                intent_id: intent.id.clone(),
                kind: intent.kind,
                action: if intent.kind.is_lookup() {
                    ChangeAction::Lookup
                } else {
                    ChangeAction::Submit
                },
            });
        }
        self.pending = Some(intents.clone());
        Ok(changes)
    }

    fn apply(&mut self, changes: &ChangeSet) -> Result<Outcome> {
        let Some(plan) = self.pending.take() else {
            bail!("apply called before plan");
        };
        if changes.stack != self.stack {
            bail!(
                "change set is for stack '{}', engine is for '{}'",
                changes.stack,
                self.stack
            );
        }

        let intents: Vec<ResourceIntent> = changes
            .changes
            .iter()
            .filter_map(|c| plan.get(&c.intent_id).cloned())
            .collect();

        let assembly = Assembly {
            version: ASSEMBLY_VERSION,
            stack: self.stack.clone(),
            environment: self.environment,
            target: self.target.clone(),
            generated_at: Utc::now(),
            assets: self.assets.clone(),
            intents,
        };

        fs::create_dir_all(&self.out_dir).with_context(|| {
            format!("Failed to create output directory: {}", self.out_dir.display())
        })?;
        let path = self.assembly_path();
        let content =
            serde_json::to_string_pretty(&assembly).context("Failed to serialize assembly")?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write assembly: {}", path.display()))?;
        log::debug!("Wrote assembly to {}", path.display());

        let results = changes
            .changes
            .iter()
            .map(|c| {
                let result = match c.action {
                    ChangeAction::Submit => ChangeResult::Submitted,
                    ChangeAction::Lookup => ChangeResult::Skipped {
                        reason: "existing resource, looked up by the engine".to_string(),
                    },
                };
                (c.intent_id.clone(), result)
            })
            .collect();

        Ok(Outcome {
            results,
            location: Some(path.display().to_string()),
        })
    }
}
