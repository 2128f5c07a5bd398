//! Intent planner - builds ordered, dependency-checked plans

use crate::error::{Error, Result};
use crate::resource::ResourceIntent;
use crate::types::ResourceKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// An ordered list of intents in which no intent precedes its dependencies
///
/// Intents can only be added through [`IntentPlan::push`]; deserializing
/// replays every intent through it, so a plan read back from JSON holds
/// the same invariants.
///
/// ```compile_fail
/// let mut plan = declarative::IntentPlan::new();
/// plan.intents_mut()[0].id = "renamed".into();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ResourceIntent>", into = "Vec<ResourceIntent>")]
pub struct IntentPlan {
    intents: Vec<ResourceIntent>,
}

impl IntentPlan {
    /// Create a new empty plan
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an intent
    ///
    /// Every dependency must already be in the plan, which keeps the plan
    /// in topological order by construction.
    pub fn push(&mut self, intent: ResourceIntent) -> Result<()> {
        if self.get(&intent.id).is_some() {
            return Err(Error::DuplicateIntent(intent.id));
        }
        for dep in intent.dependencies() {
            if self.get(dep).is_none() {
                return Err(Error::UnknownDependency {
                    intent: intent.id.clone(),
                    dependency: dep.clone(),
                });
            }
        }
        log::trace!("planned {}", intent.address());
        self.intents.push(intent);
        Ok(())
    }

    /// Build a plan from intents given in any order
    pub fn from_unordered(intents: Vec<ResourceIntent>) -> Result<Self> {
        let mut plan = Self::new();
        for intent in topological_order(intents)? {
            plan.push(intent)?;
        }
        Ok(plan)
    }

    /// Look up an intent by id
    pub fn get(&self, id: &str) -> Option<&ResourceIntent> {
        self.intents.iter().find(|i| i.id == id)
    }

    /// Intents in plan order
    pub fn intents(&self) -> &[ResourceIntent] {
        &self.intents
    }

    pub(crate) fn intents_mut(&mut self) -> &mut [ResourceIntent] {
        &mut self.intents
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceIntent> {
        self.intents.iter()
    }

    /// Position of an intent in the plan
    pub fn position(&self, id: &str) -> Option<usize> {
        self.intents.iter().position(|i| i.id == id)
    }

    /// Total number of intents in the plan
    pub fn len(&self) -> usize {
        self.intents.len()
    }

    /// Check if plan is empty
    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    /// Re-check every plan invariant
    ///
    /// Ids are unique, every dependency appears earlier in the plan, and
    /// every reference inside the properties is a declared dependency.
    pub fn validate(&self) -> Result<()> {
        let mut seen: HashSet<&str> = HashSet::new();
        for intent in &self.intents {
            for dep in intent.dependencies() {
                if !seen.contains(dep.as_str()) {
                    return Err(Error::UnknownDependency {
                        intent: intent.id.clone(),
                        dependency: dep.clone(),
                    });
                }
            }
            for reference in intent.references() {
                if !intent.dependencies().contains(&reference) {
                    return Err(Error::UndeclaredReference {
                        intent: intent.id.clone(),
                        reference,
                    });
                }
            }
            if !seen.insert(intent.id.as_str()) {
                return Err(Error::DuplicateIntent(intent.id.clone()));
            }
        }
        Ok(())
    }

    /// Intents matching a target pattern
    ///
    /// Target format: "kind" or "kind.id". An unknown kind matches ids
    /// containing the pattern.
    pub fn select(&self, target: Option<&str>) -> Vec<&ResourceIntent> {
        match target {
            None => self.intents.iter().collect(),
            Some(t) => {
                let (kind, name) = parse_target(t);
                self.intents
                    .iter()
                    .filter(|i| matches_filter(i, kind, name.as_deref()))
                    .collect()
            }
        }
    }

    /// Group intents by kind, keeping plan order inside each group
    pub fn group_by_kind(&self) -> BTreeMap<ResourceKind, Vec<&ResourceIntent>> {
        let mut groups: BTreeMap<ResourceKind, Vec<&ResourceIntent>> = BTreeMap::new();
        for intent in &self.intents {
            groups.entry(intent.kind).or_default().push(intent);
        }
        groups
    }
}

impl TryFrom<Vec<ResourceIntent>> for IntentPlan {
    type Error = Error;

    fn try_from(intents: Vec<ResourceIntent>) -> Result<Self> {
        let mut plan = Self::new();
        for intent in intents {
            plan.push(intent)?;
        }
        plan.validate()?;
        Ok(plan)
    }
}

impl From<IntentPlan> for Vec<ResourceIntent> {
    fn from(plan: IntentPlan) -> Self {
        plan.intents
    }
}

impl<'a> IntoIterator for &'a IntentPlan {
    type Item = &'a ResourceIntent;
    type IntoIter = std::slice::Iter<'a, ResourceIntent>;

    fn into_iter(self) -> Self::IntoIter {
        self.intents.iter()
    }
}

/// Sort intents so that dependencies come first
///
/// Order among independent intents follows the input order. Fails on a
/// cycle or on a dependency missing from the input.
pub fn topological_order(intents: Vec<ResourceIntent>) -> Result<Vec<ResourceIntent>> {
    let index: HashMap<String, usize> = intents
        .iter()
        .enumerate()
        .map(|(i, intent)| (intent.id.clone(), i))
        .collect();
    if index.len() != intents.len() {
        let mut seen = HashSet::new();
        for intent in &intents {
            if !seen.insert(intent.id.as_str()) {
                return Err(Error::DuplicateIntent(intent.id.clone()));
            }
        }
    }

    let mut marks = vec![Mark::Unvisited; intents.len()];
    let mut order = Vec::with_capacity(intents.len());
    for i in 0..intents.len() {
        visit(i, &intents, &index, &mut marks, &mut order)?;
    }

    let mut slots: Vec<Option<ResourceIntent>> = intents.into_iter().map(Some).collect();
    Ok(order
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

fn visit(
    i: usize,
    intents: &[ResourceIntent],
    index: &HashMap<String, usize>,
    marks: &mut [Mark],
    order: &mut Vec<usize>,
) -> Result<()> {
    match marks[i] {
        Mark::Done => return Ok(()),
        Mark::InProgress => return Err(Error::Cycle(intents[i].id.clone())),
        Mark::Unvisited => {}
    }

    marks[i] = Mark::InProgress;
    for dep in intents[i].dependencies() {
        let Some(&j) = index.get(dep) else {
            return Err(Error::UnknownDependency {
                intent: intents[i].id.clone(),
                dependency: dep.clone(),
            });
        };
        visit(j, intents, index, marks, order)?;
    }
    marks[i] = Mark::Done;
    order.push(i);
    Ok(())
}

/// Parse a target string like "kind.id" into (kind, id)
fn parse_target(target: &str) -> (Option<ResourceKind>, Option<String>) {
    match target.split_once('.') {
        None => match ResourceKind::from_name(target) {
            Some(kind) => (Some(kind), None),
            None => (None, Some(target.to_string())),
        },
        Some((kind, name)) => match ResourceKind::from_name(kind) {
            Some(kind) => (Some(kind), Some(name.to_string())),
            None => (None, Some(target.to_string())),
        },
    }
}

/// Check if an intent matches the filter criteria
fn matches_filter(intent: &ResourceIntent, kind: Option<ResourceKind>, name: Option<&str>) -> bool {
    if let Some(k) = kind
        && intent.kind != k
    {
        return false;
    }

    if let Some(n) = name
        && !intent.id.contains(n)
    {
        return false;
    }

    true
}
