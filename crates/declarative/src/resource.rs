//! Resource intents
//!
//! A [`ResourceIntent`] describes a cloud resource the way it should exist.
//! It carries no behaviour: the provisioning engine reconciles it against
//! the provider's actual state.

use crate::types::{Properties, ResourceKind, Tags};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeSet;

/// Key marking a reference to another intent's primary identifier
pub const REF_KEY: &str = "ref";

/// Key marking a reference to an attribute of another intent
pub const GET_ATT_KEY: &str = "getAtt";

/// Declarative description of a desired cloud resource
///
/// # Example
///
/// ```
/// use declarative::{ResourceIntent, ResourceKind, reference};
///
/// let policy = ResourceIntent::new("rootBucketPolicy", ResourceKind::BucketPolicy)
///     .depends_on("rootBucket")
///     .property("bucket", reference("rootBucket"));
///
/// assert!(policy.dependencies().contains("rootBucket"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIntent {
    /// Stable logical identifier, unique within a plan
    pub id: String,
    pub kind: ResourceKind,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    depends_on: BTreeSet<String>,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default, skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
}

impl ResourceIntent {
    /// Create an intent with no dependencies, properties or tags
    pub fn new(id: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            id: id.into(),
            kind,
            depends_on: BTreeSet::new(),
            properties: Properties::new(),
            tags: Tags::new(),
        }
    }

    /// Add a dependency edge
    pub fn depends_on(mut self, id: impl Into<String>) -> Self {
        self.depends_on.insert(id.into());
        self
    }

    /// Set a property
    pub fn property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Ids this intent depends on
    pub fn dependencies(&self) -> &BTreeSet<String> {
        &self.depends_on
    }

    /// Attach a tag; ignored for kinds the provider can't tag
    ///
    /// Returns whether the tag was attached.
    pub fn tag(&mut self, key: &str, value: &str) -> bool {
        if !self.kind.is_taggable() {
            return false;
        }
        self.tags.insert(key.to_string(), value.to_string());
        true
    }

    /// Every intent id referenced from within the properties
    pub fn references(&self) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        for value in self.properties.values() {
            collect_references(value, &mut found);
        }
        found
    }

    /// Short "kind.id" label, the same shape target filters accept
    pub fn address(&self) -> String {
        format!("{}.{}", self.kind, self.id)
    }
}

/// Reference to another intent's primary identifier
pub fn reference(id: &str) -> Value {
    json!({ REF_KEY: id })
}

/// Reference to an attribute of another intent
pub fn attribute(id: &str, attr: &str) -> Value {
    json!({ GET_ATT_KEY: [id, attr] })
}

fn collect_references(value: &Value, found: &mut BTreeSet<String>) {
    match value {
        Value::Object(map) => {
            if map.len() == 1 {
                if let Some(Value::String(id)) = map.get(REF_KEY) {
                    found.insert(id.clone());
                    return;
                }
                if let Some(Value::Array(parts)) = map.get(GET_ATT_KEY)
                    && let Some(Value::String(id)) = parts.first()
                {
                    found.insert(id.clone());
                    return;
                }
            }
            for nested in map.values() {
                collect_references(nested, found);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_references(item, found);
            }
        }
        _ => {}
    }
}
