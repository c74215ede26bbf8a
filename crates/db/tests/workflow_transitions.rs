//! Integration tests for workflow transitions.

use sqlx::PgPool;
use bnadmin_db::models::workflow_definition::CreateWorkflowDefinition;
use bnadmin_db::models::workflow_step::CreateWorkflowStep;
use bnadmin_db::models::workflow_transition::CreateWorkflowTransition;
use bnadmin_db::repositories::{WorkflowDefinitionRepo, WorkflowStepRepo, WorkflowTransitionRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_definition(pool: &PgPool) -> i64 {
    WorkflowDefinitionRepo::create(
        pool,
        &CreateWorkflowDefinition {
            name: "DL Standard".to_string(),
            description: None,
            workflow_type: "legal_deposit".to_string(),
            module: "legal_deposit".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

async fn new_step(pool: &PgPool, workflow_id: i64, name: &str) -> i64 {
    WorkflowStepRepo::create(
        pool,
        workflow_id,
        &CreateWorkflowStep {
            step_name: name.to_string(),
            step_type: "creation".to_string(),
            required_role: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn new_transition(name: &str, from: Option<i64>, to: Option<i64>) -> CreateWorkflowTransition {
    CreateWorkflowTransition {
        transition_name: name.to_string(),
        from_step_id: from,
        to_step_id: to,
        trigger_type: "manual".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Test: boundaries persist as NULL
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_boundary_endpoints_are_null(pool: PgPool) {
    let d = new_definition(&pool).await;
    let s1 = new_step(&pool, d, "Saisie").await;

    let start = WorkflowTransitionRepo::create(&pool, d, &new_transition("Début", None, Some(s1)))
        .await
        .unwrap();
    let end = WorkflowTransitionRepo::create(&pool, d, &new_transition("Fin", Some(s1), None))
        .await
        .unwrap();

    assert_eq!(start.from_step_id, None);
    assert_eq!(start.to_step_id, Some(s1));
    assert_eq!(end.to_step_id, None);
}

// ---------------------------------------------------------------------------
// Test: endpoints are not validated
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_endpoints_may_dangle(pool: PgPool) {
    let d = new_definition(&pool).await;
    let t = WorkflowTransitionRepo::create(&pool, d, &new_transition("Fantôme", Some(424_242), Some(434_343)))
        .await
        .unwrap();
    assert_eq!(t.from_step_id, Some(424_242));

    // Deleting a referenced step leaves the transition untouched.
    let s = new_step(&pool, d, "Saisie").await;
    let t2 = WorkflowTransitionRepo::create(&pool, d, &new_transition("Suite", Some(s), None))
        .await
        .unwrap();
    WorkflowStepRepo::delete(&pool, s).await.unwrap();
    let reloaded = WorkflowTransitionRepo::find_by_id(&pool, t2.id).await.unwrap().unwrap();
    assert_eq!(reloaded.from_step_id, Some(s));
}

// ---------------------------------------------------------------------------
// Test: list_from_step and list_by_workflow
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_queries(pool: PgPool) {
    let d = new_definition(&pool).await;
    let s1 = new_step(&pool, d, "A").await;
    let s2 = new_step(&pool, d, "B").await;

    let t1 = WorkflowTransitionRepo::create(&pool, d, &new_transition("A->B", Some(s1), Some(s2))).await.unwrap();
    let t2 = WorkflowTransitionRepo::create(&pool, d, &new_transition("B->fin", Some(s2), None)).await.unwrap();
    let t3 = WorkflowTransitionRepo::create(&pool, d, &new_transition("A->fin", Some(s1), None)).await.unwrap();

    let all = WorkflowTransitionRepo::list_by_workflow(&pool, d).await.unwrap();
    assert_eq!(all.iter().map(|t| t.id).collect::<Vec<_>>(), vec![t1.id, t2.id, t3.id]);

    let from_a = WorkflowTransitionRepo::list_from_step(&pool, s1).await.unwrap();
    assert_eq!(from_a.iter().map(|t| t.id).collect::<Vec<_>>(), vec![t1.id, t3.id]);
}

// ---------------------------------------------------------------------------
// Test: update is a full overwrite
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_and_delete(pool: PgPool) {
    let d = new_definition(&pool).await;
    let s1 = new_step(&pool, d, "A").await;
    let t = WorkflowTransitionRepo::create(&pool, d, &new_transition("A->fin", Some(s1), None))
        .await
        .unwrap();

    let updated = WorkflowTransitionRepo::update(
        &pool,
        t.id,
        &CreateWorkflowTransition {
            transition_name: "Début->A".to_string(),
            from_step_id: None,
            to_step_id: Some(s1),
            trigger_type: "scheduled".to_string(),
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.from_step_id, None);
    assert_eq!(updated.to_step_id, Some(s1));
    assert_eq!(updated.trigger_type, "scheduled");

    assert!(WorkflowTransitionRepo::delete(&pool, t.id).await.unwrap());
    assert!(WorkflowTransitionRepo::find_by_id(&pool, t.id).await.unwrap().is_none());
}
