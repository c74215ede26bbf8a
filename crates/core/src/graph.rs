//! View-time resolution of authored workflow graphs.
//!
//! A workflow graph is the set of steps (nodes) of a definition plus its
//! transitions (edges, optionally open-ended at the start or end). Nothing
//! here rejects a graph shape: dangling endpoints resolve to a placeholder
//! label and the integrity report is informational only.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::types::DbId;

/// Label for a transition whose `from_step_id` is NULL.
pub const START_LABEL: &str = "start of workflow";

/// Label for a transition whose `to_step_id` is NULL.
pub const END_LABEL: &str = "end of workflow";

/// Label for an endpoint that references a step not in the definition.
pub const MISSING_LABEL: &str = "-";

/// Minimal view of a step needed for resolution.
#[derive(Debug, Clone, Copy)]
pub struct StepNode<'a> {
    pub id: DbId,
    pub step_number: i32,
    pub name: &'a str,
}

/// Minimal view of a transition needed for resolution.
#[derive(Debug, Clone, Copy)]
pub struct TransitionEdge {
    pub id: DbId,
    pub from_step_id: Option<DbId>,
    pub to_step_id: Option<DbId>,
}

/// Which end of a transition an endpoint is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointSide {
    From,
    To,
}

/// How one endpoint of a transition resolved against the step list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolvedEndpoint {
    /// NULL endpoint: workflow start (from side) or end (to side).
    Boundary,
    Step { step_id: DbId, step_name: String },
    Dangling { step_id: DbId },
}

impl ResolvedEndpoint {
    /// Display label for this endpoint.
    pub fn label(&self, side: EndpointSide) -> String {
        match (self, side) {
            (Self::Boundary, EndpointSide::From) => START_LABEL.to_string(),
            (Self::Boundary, EndpointSide::To) => END_LABEL.to_string(),
            (Self::Step { step_name, .. }, _) => step_name.clone(),
            (Self::Dangling { .. }, _) => MISSING_LABEL.to_string(),
        }
    }
}

/// Step lookup keyed by id, built once per definition.
pub struct StepIndex<'a> {
    by_id: HashMap<DbId, StepNode<'a>>,
}

impl<'a> StepIndex<'a> {
    pub fn new(steps: impl IntoIterator<Item = StepNode<'a>>) -> Self {
        Self {
            by_id: steps.into_iter().map(|s| (s.id, s)).collect(),
        }
    }

    pub fn resolve(&self, step_id: Option<DbId>) -> ResolvedEndpoint {
        match step_id {
            None => ResolvedEndpoint::Boundary,
            Some(id) => match self.by_id.get(&id) {
                Some(step) => ResolvedEndpoint::Step {
                    step_id: id,
                    step_name: step.name.to_string(),
                },
                None => ResolvedEndpoint::Dangling { step_id: id },
            },
        }
    }

    /// Resolve both ends of a transition to display labels `(from, to)`.
    pub fn labels(&self, edge: &TransitionEdge) -> (String, String) {
        (
            self.resolve(edge.from_step_id).label(EndpointSide::From),
            self.resolve(edge.to_step_id).label(EndpointSide::To),
        )
    }
}

/// Transitions "belonging to" a step: those leaving it.
pub fn outgoing<T>(
    items: &[T],
    step_id: DbId,
    from_step_id: impl Fn(&T) -> Option<DbId>,
) -> Vec<&T> {
    items
        .iter()
        .filter(|t| from_step_id(t) == Some(step_id))
        .collect()
}

// ---------------------------------------------------------------------------
// Integrity report
// ---------------------------------------------------------------------------

/// An endpoint that references a step missing from the definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingEndpoint {
    pub transition_id: DbId,
    pub side: EndpointSide,
    pub step_id: DbId,
}

/// Read-only findings about a definition's graph. Never enforced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    pub dangling_endpoints: Vec<DanglingEndpoint>,
    /// Steps that no transition enters or leaves.
    pub unconnected_step_ids: Vec<DbId>,
    /// Step numbers shared by more than one step.
    pub duplicate_step_numbers: Vec<i32>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.dangling_endpoints.is_empty()
            && self.unconnected_step_ids.is_empty()
            && self.duplicate_step_numbers.is_empty()
    }
}

/// Inspect a definition's steps and transitions.
pub fn analyze(steps: &[StepNode<'_>], edges: &[TransitionEdge]) -> IntegrityReport {
    let known: BTreeSet<DbId> = steps.iter().map(|s| s.id).collect();
    let mut touched = BTreeSet::new();
    let mut dangling_endpoints = Vec::new();

    for edge in edges {
        for (side, endpoint) in [
            (EndpointSide::From, edge.from_step_id),
            (EndpointSide::To, edge.to_step_id),
        ] {
            let Some(step_id) = endpoint else { continue };
            if known.contains(&step_id) {
                touched.insert(step_id);
            } else {
                dangling_endpoints.push(DanglingEndpoint {
                    transition_id: edge.id,
                    side,
                    step_id,
                });
            }
        }
    }

    let mut ordered: Vec<&StepNode<'_>> = steps.iter().collect();
    ordered.sort_by_key(|s| (s.step_number, s.id));
    let unconnected_step_ids = ordered
        .iter()
        .filter(|s| !touched.contains(&s.id))
        .map(|s| s.id)
        .collect();

    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for s in steps {
        *counts.entry(s.step_number).or_default() += 1;
    }
    let duplicate_step_numbers = counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(number, _)| number)
        .collect();

    IntegrityReport {
        dangling_endpoints,
        unconnected_step_ids,
        duplicate_step_numbers,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
