pub mod wizard_draft;
pub mod workflow_definition;
pub mod workflow_picker;
pub mod workflow_role;
pub mod workflow_step;
pub mod workflow_transition;

use bnadmin_core::graph::{StepIndex, StepNode, TransitionEdge};
use bnadmin_db::models::workflow_step::WorkflowStep;
use bnadmin_db::models::workflow_transition::{LabelledTransition, WorkflowTransition};

/// Resolve transition endpoints against a definition's steps for display.
pub(crate) fn labelled_transitions(
    steps: &[WorkflowStep],
    transitions: Vec<WorkflowTransition>,
) -> Vec<LabelledTransition> {
    let index = StepIndex::new(steps.iter().map(|s| StepNode {
        id: s.id,
        step_number: s.step_number,
        name: &s.step_name,
    }));
    transitions
        .into_iter()
        .map(|transition| {
            let (from_label, to_label) = index.labels(&TransitionEdge {
                id: transition.id,
                from_step_id: transition.from_step_id,
                to_step_id: transition.to_step_id,
            });
            LabelledTransition {
                transition,
                from_label,
                to_label,
            }
        })
        .collect()
}
