//! # Declarative
//!
//! A framework for declarative resource intents.
//!
//! This crate provides the core abstractions for describing desired cloud
//! resources, ordering them by their dependencies, and handing them to a
//! provisioning engine that owns the actual provider calls.
//!
//! ## Core Concepts
//!
//! - **ResourceIntent**: A desired resource (bucket, certificate, DNS record, ...)
//!   with dependency edges, opaque properties and tags
//! - **IntentPlan**: An ordered list of intents where no intent precedes its dependencies
//! - **ProvisioningEngine**: The collaborator that turns a plan into a change set and applies it
//! - **execute**: Drives an engine with progress and confirmation callbacks
//!
//! ## Example
//!
//! ```
//! use declarative::{
//!     IntentPlan, ResourceIntent, ResourceKind, Tags, apply_tags, reference,
//! };
//!
//! let mut plan = IntentPlan::new();
//! plan.push(ResourceIntent::new("rootBucket", ResourceKind::Bucket))?;
//! plan.push(
//!     ResourceIntent::new("rootBucketPolicy", ResourceKind::BucketPolicy)
//!         .depends_on("rootBucket")
//!         .property("bucket", reference("rootBucket")),
//! )?;
//!
//! apply_tags(&mut plan, &Tags::from([("site".into(), "docs".into())]));
//! plan.validate()?;
//! # Ok::<(), declarative::Error>(())
//! ```
//!
//! ## Provider Traits
//!
//! - [`ProvisioningEngine`]: Plans and applies change sets
//! - [`ProgressCallback`]: Receives progress updates
//! - [`ConfirmCallback`]: Handles user confirmations
//!
//! This allows the crate to be used without hard dependencies on
//! specific UI frameworks or cloud SDKs.

pub mod context;
pub mod error;
pub mod executor;
pub mod planner;
pub mod resource;
pub mod tags;
pub mod types;

// Re-export main types at crate root
pub use context::{AutoConfirm, AutoDecline, ConfirmCallback, NoProgress, ProgressCallback};
pub use error::{Error, Result};
pub use executor::{ProvisioningEngine, execute, execute_simple};
pub use planner::{IntentPlan, topological_order};
pub use resource::{ResourceIntent, attribute, reference};
pub use tags::apply_tags;
pub use types::{
    Change, ChangeAction, ChangeResult, ChangeSet, ExecuteOptions, ExecuteSummary, Outcome,
    Properties, ResourceKind, Tags,
};
