//! Tag applier

use crate::planner::IntentPlan;
use crate::types::Tags;

/// Attach every tag to every taggable intent in the plan
///
/// Returns how many intents received tags. Applying the same tag set in
/// any order, or in several passes, yields the same result.
pub fn apply_tags(plan: &mut IntentPlan, tags: &Tags) -> usize {
    if tags.is_empty() {
        return 0;
    }

    let mut tagged = 0;
    for intent in plan.intents_mut() {
        if !intent.kind.is_taggable() {
            continue;
        }
        for (key, value) in tags {
            intent.tag(key, value);
        }
        tagged += 1;
    }
    log::debug!("applied {} tags to {} intents", tags.len(), tagged);
    tagged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceIntent;
    use crate::types::ResourceKind;
    use proptest::prelude::*;

    fn plan() -> IntentPlan {
        let mut plan = IntentPlan::new();
        plan.push(ResourceIntent::new("bucket", ResourceKind::Bucket))
            .unwrap();
        plan.push(ResourceIntent::new("zone", ResourceKind::HostedZone))
            .unwrap();
        plan.push(ResourceIntent::new("param", ResourceKind::Parameter))
            .unwrap();
        plan
    }

    #[test]
    fn test_only_taggable_intents_are_tagged() {
        let mut plan = plan();
        let tags = Tags::from([("site".to_string(), "x".to_string())]);

        assert_eq!(apply_tags(&mut plan, &tags), 2);
        assert_eq!(plan.get("bucket").unwrap().tags, tags);
        assert_eq!(plan.get("param").unwrap().tags, tags);
        assert!(plan.get("zone").unwrap().tags.is_empty());
    }

    #[test]
    fn test_empty_tag_set_is_noop() {
        let mut plan = plan();
        assert_eq!(apply_tags(&mut plan, &Tags::new()), 0);
        assert!(plan.iter().all(|i| i.tags.is_empty()));
    }

    proptest! {
        #[test]
        fn prop_tag_order_does_not_matter(
            pairs in proptest::collection::btree_map("[a-z]{1,6}", "[a-z0-9]{0,6}", 0..8),
        ) {
            let forward: Vec<(String, String)> = pairs.clone().into_iter().collect();
            let mut reversed = forward.clone();
            reversed.reverse();

            let mut a = plan();
            for (k, v) in &forward {
                apply_tags(&mut a, &Tags::from([(k.clone(), v.clone())]));
            }
            let mut b = plan();
            for (k, v) in &reversed {
                apply_tags(&mut b, &Tags::from([(k.clone(), v.clone())]));
            }
            let mut c = plan();
            apply_tags(&mut c, &pairs);

            prop_assert_eq!(&a, &b);
            prop_assert_eq!(&a, &c);
        }
    }
}
