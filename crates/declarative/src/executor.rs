//! Execution driver - hands a plan to a provisioning engine

use crate::context::{ConfirmCallback, ProgressCallback};
use crate::planner::IntentPlan;
use crate::types::{ChangeSet, ExecuteOptions, ExecuteSummary, Outcome};
use anyhow::{Context, Result};

/// The engine that reconciles intents against real provider state
///
/// Retries, idempotency and state tracking all belong to the engine.
pub trait ProvisioningEngine {
    /// Human-readable engine name
    fn name(&self) -> &str;

    /// Compute the changes needed to realize a plan
    fn plan(&mut self, intents: &IntentPlan) -> Result<ChangeSet>;

    /// Apply a change set previously returned by [`ProvisioningEngine::plan`]
    fn apply(&mut self, changes: &ChangeSet) -> Result<Outcome>;
}

/// Execute a plan against an engine
///
/// The plan is validated first, so an invalid plan never reaches the
/// engine. Nothing is applied on dry runs or when the user declines.
pub fn execute<E, P, C>(
    plan: &IntentPlan,
    engine: &mut E,
    opts: &ExecuteOptions,
    progress: &mut P,
    confirm: &mut C,
) -> Result<ExecuteSummary>
where
    E: ProvisioningEngine + ?Sized,
    P: ProgressCallback,
    C: ConfirmCallback,
{
    plan.validate().context("Refusing to hand an invalid plan to the engine")?;

    let changes = engine
        .plan(plan)
        .with_context(|| format!("Engine '{}' failed to plan", engine.name()))?;
    log::debug!(
        "engine '{}' proposed {} changes for {}",
        engine.name(),
        changes.len(),
        changes.stack
    );
    progress.on_plan(&changes);

    if changes.is_empty() {
        return Ok(ExecuteSummary::default());
    }

    if opts.dry_run {
        return Ok(ExecuteSummary {
            skipped: changes.len(),
            ..Default::default()
        });
    }

    if !confirm.confirm(&format!("Apply {} changes to {}?", changes.len(), changes.stack))? {
        return Ok(ExecuteSummary {
            skipped: changes.len(),
            ..Default::default()
        });
    }

    let outcome = engine
        .apply(&changes)
        .with_context(|| format!("Engine '{}' failed to apply", engine.name()))?;

    let mut summary = ExecuteSummary::default();
    for (id, result) in &outcome.results {
        if opts.verbose {
            log::info!("{id}: {result:?}");
        }
        progress.on_change_complete(id, result);
        summary.add_result(result);
    }
    progress.on_apply_complete(outcome.location.as_deref());

    Ok(summary)
}

/// Simple execution without callbacks
///
/// For basic use cases where you don't need progress or confirmation.
pub fn execute_simple<E: ProvisioningEngine + ?Sized>(
    plan: &IntentPlan,
    engine: &mut E,
    opts: &ExecuteOptions,
) -> Result<ExecuteSummary> {
    use crate::context::{AutoConfirm, NoProgress};

    execute(plan, engine, opts, &mut NoProgress, &mut AutoConfirm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{AutoConfirm, AutoDecline, NoProgress};
    use crate::resource::{ResourceIntent, reference};
    use crate::types::{Change, ChangeAction, ChangeResult, ResourceKind};

    fn uniform_outcome(changes: &ChangeSet, result: &ChangeResult) -> Outcome {
        Outcome {
            results: changes
                .changes
                .iter()
                .map(|c| (c.intent_id.clone(), result.clone()))
                .collect(),
            location: None,
        }
    }

    /// Engine that records what it was asked to do
    #[derive(Default)]
    struct RecordingEngine {
        applied: Vec<ChangeSet>,
    }

    impl ProvisioningEngine for RecordingEngine {
        fn name(&self) -> &str {
            "recording"
        }

        fn plan(&mut self, intents: &IntentPlan) -> Result<ChangeSet> {
            let mut changes = ChangeSet::new("test-stack");
            for intent in intents {
                changes.changes.push(Change {
                    intent_id: intent.id.clone(),
                    kind: intent.kind,
                    action: ChangeAction::Submit,
                });
            }
            Ok(changes)
        }

        fn apply(&mut self, changes: &ChangeSet) -> Result<Outcome> {
            self.applied.push(changes.clone());
            Ok(uniform_outcome(changes, &ChangeResult::Submitted))
        }
    }

    fn two_intent_plan() -> IntentPlan {
        let mut plan = IntentPlan::new();
        plan.push(ResourceIntent::new("bucket", ResourceKind::Bucket))
            .unwrap();
        plan.push(
            ResourceIntent::new("policy", ResourceKind::BucketPolicy)
                .depends_on("bucket")
                .property("bucket", reference("bucket")),
        )
        .unwrap();
        plan
    }

    #[test]
    fn test_execute_empty_plan() {
        let mut engine = RecordingEngine::default();
        let summary =
            execute_simple(&IntentPlan::new(), &mut engine, &ExecuteOptions::default()).unwrap();

        assert_eq!(summary.total(), 0);
        assert!(engine.applied.is_empty());
    }

    #[test]
    fn test_execute_applies_changes() {
        let mut engine = RecordingEngine::default();
        let summary =
            execute_simple(&two_intent_plan(), &mut engine, &ExecuteOptions::default()).unwrap();

        assert_eq!(summary.submitted, 2);
        assert_eq!(engine.applied.len(), 1);
    }

    #[test]
    fn test_execute_dry_run_skips_apply() {
        let mut engine = RecordingEngine::default();
        let opts = ExecuteOptions {
            dry_run: true,
            ..Default::default()
        };
        let summary = execute_simple(&two_intent_plan(), &mut engine, &opts).unwrap();

        assert_eq!(summary.skipped, 2);
        assert!(engine.applied.is_empty());
    }

    #[test]
    fn test_execute_declined() {
        let mut engine = RecordingEngine::default();
        let summary = execute(
            &two_intent_plan(),
            &mut engine,
            &ExecuteOptions::default(),
            &mut NoProgress,
            &mut AutoDecline,
        )
        .unwrap();

        assert_eq!(summary.skipped, 2);
        assert!(engine.applied.is_empty());
    }

    #[test]
    fn test_execute_rejects_invalid_plan() {
        let mut plan = IntentPlan::new();
        plan.push(ResourceIntent::new("bucket", ResourceKind::Bucket))
            .unwrap();
        plan.push(
            ResourceIntent::new("policy", ResourceKind::BucketPolicy)
                .property("bucket", reference("bucket")),
        )
        .unwrap();

        let mut engine = RecordingEngine::default();
        let result = execute(
            &plan,
            &mut engine,
            &ExecuteOptions::default(),
            &mut NoProgress,
            &mut AutoConfirm,
        );

        assert!(result.is_err());
        assert!(engine.applied.is_empty());
    }
}
