//! Core types for declarative resource intents

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque key-value properties attached to an intent
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// Tag set attached to taggable intents
pub type Tags = BTreeMap<String, String>;

/// Kind of cloud resource an intent describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Object storage bucket
    Bucket,
    /// Access policy document attached to a bucket
    BucketPolicy,
    /// Credential letting the CDN read a private bucket
    OriginAccessIdentity,
    /// Existing DNS zone, referenced but never created
    HostedZone,
    /// TLS certificate
    Certificate,
    /// Request-rewriting function run at the CDN edge
    EdgeFunction,
    /// Response headers policy
    ResponseHeadersPolicy,
    /// CDN distribution
    CdnDistribution,
    /// DNS alias record
    DnsRecord,
    /// Named value in a parameter store
    Parameter,
}

impl ResourceKind {
    /// All kinds, in the order they usually appear in a site plan
    pub const ALL: [ResourceKind; 10] = [
        Self::Bucket,
        Self::BucketPolicy,
        Self::OriginAccessIdentity,
        Self::HostedZone,
        Self::Certificate,
        Self::EdgeFunction,
        Self::ResponseHeadersPolicy,
        Self::CdnDistribution,
        Self::DnsRecord,
        Self::Parameter,
    ];

    /// Stable short name, used in target filters and serialized output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bucket => "bucket",
            Self::BucketPolicy => "bucket_policy",
            Self::OriginAccessIdentity => "origin_access_identity",
            Self::HostedZone => "hosted_zone",
            Self::Certificate => "certificate",
            Self::EdgeFunction => "edge_function",
            Self::ResponseHeadersPolicy => "response_headers_policy",
            Self::CdnDistribution => "cdn_distribution",
            Self::DnsRecord => "dns_record",
            Self::Parameter => "parameter",
        }
    }

    /// Whether the provider accepts tags on this kind of resource
    pub fn is_taggable(&self) -> bool {
        matches!(
            self,
            Self::Bucket | Self::Certificate | Self::CdnDistribution | Self::Parameter
        )
    }

    /// Whether the intent only references an existing resource
    pub fn is_lookup(&self) -> bool {
        matches!(self, Self::HostedZone)
    }

    /// Parse a short name (as produced by [`ResourceKind::as_str`])
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the engine will do with an intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    /// Resource will be created or updated to match the intent
    Submit,
    /// Existing resource is only looked up
    Lookup,
}

/// A single entry of a change set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub intent_id: String,
    pub kind: ResourceKind,
    pub action: ChangeAction,
}

/// Changes an engine proposes for a plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    /// Name of the stack the changes belong to
    pub stack: String,
    pub changes: Vec<Change>,
}

impl ChangeSet {
    pub fn new(stack: impl Into<String>) -> Self {
        Self {
            stack: stack.into(),
            changes: Vec::new(),
        }
    }

    /// Check if there is anything to apply
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }
}

/// Result of applying a single change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeResult {
    /// Handed over to the engine
    Submitted,
    /// Not applied
    Skipped { reason: String },
    /// Apply failed
    Failed { error: String },
}

impl ChangeResult {
    /// Check if the result represents success (no failure)
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

/// What an engine reports after applying a change set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Per-change results, keyed by intent id, in change-set order
    pub results: Vec<(String, ChangeResult)>,
    /// Where the engine recorded its output, if anywhere
    pub location: Option<String>,
}

/// Summary of execution results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteSummary {
    pub submitted: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ExecuteSummary {
    /// Check if execution was fully successful (no failures)
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Total number of changes processed
    pub fn total(&self) -> usize {
        self.submitted + self.skipped + self.failed
    }

    /// Add a result to the summary
    pub fn add_result(&mut self, result: &ChangeResult) {
        match result {
            ChangeResult::Submitted => self.submitted += 1,
            ChangeResult::Skipped { .. } => self.skipped += 1,
            ChangeResult::Failed { .. } => self.failed += 1,
        }
    }
}

/// Options for execution
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Don't apply, just compute the change set
    pub dry_run: bool,
    /// Verbose output
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in ResourceKind::ALL {
            assert_eq!(ResourceKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(ResourceKind::from_name("lambda"), None);
    }

    #[test]
    fn test_kind_serializes_as_short_name() {
        let json = serde_json::to_string(&ResourceKind::CdnDistribution).unwrap();
        assert_eq!(json, "\"cdn_distribution\"");
    }

    #[test]
    fn test_taggable_kinds() {
        assert!(ResourceKind::Bucket.is_taggable());
        assert!(ResourceKind::Parameter.is_taggable());
        assert!(!ResourceKind::HostedZone.is_taggable());
        assert!(!ResourceKind::BucketPolicy.is_taggable());
        assert!(!ResourceKind::DnsRecord.is_taggable());
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = ExecuteSummary::default();
        summary.add_result(&ChangeResult::Submitted);
        summary.add_result(&ChangeResult::Skipped {
            reason: "lookup".into(),
        });
        summary.add_result(&ChangeResult::Failed {
            error: "boom".into(),
        });
        assert_eq!(summary.total(), 3);
        assert!(!summary.is_success());
    }
}
