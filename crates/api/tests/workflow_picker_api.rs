//! HTTP-level integration tests for the cascading `/workflow-picker`.

mod common;

use axum::http::StatusCode;
use bnadmin_core::role_catalog::RoleCatalog;
use common::{body_json, create_definition, create_step, get, post_json};
use serde_json::{json, Value};
use sqlx::PgPool;

struct Fixture {
    definition: i64,
    other_definition: i64,
    s1: i64,
    s2: i64,
    other_step: i64,
    transition: i64,
}

async fn fixture(pool: &PgPool) -> Fixture {
    let definition = create_definition(pool, "DL Standard", "legal_deposit").await["id"]
        .as_i64()
        .unwrap();
    let other_definition = create_definition(pool, "GED", "ged").await["id"].as_i64().unwrap();
    let s1 = create_step(pool, definition, "Saisie", "creation", None).await["id"]
        .as_i64()
        .unwrap();
    let s2 = create_step(pool, definition, "Validation", "validation", Some("Validateur BN"))
        .await["id"]
        .as_i64()
        .unwrap();
    let other_step = create_step(pool, other_definition, "Indexation", "creation", None)
        .await["id"]
        .as_i64()
        .unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        &format!("/api/v1/workflow-definitions/{definition}/transitions"),
        json!({"transition_name": "Soumettre", "from_step_id": s1, "to_step_id": s2}),
    )
    .await;
    let transition = body_json(response).await["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        "/api/v1/workflow-roles",
        json!({"role_name": "Superviseur", "module": "legal_deposit"}),
    )
    .await;
    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        "/api/v1/workflow-roles",
        json!({"role_name": "Validateur BN", "module": "legal_deposit"}),
    )
    .await;

    Fixture {
        definition,
        other_definition,
        s1,
        s2,
        other_step,
        transition,
    }
}

fn catalog() -> RoleCatalog {
    RoleCatalog::from_json(
        r#"{"legal_deposit": ["Agent Dépôt Légal", "Validateur BN"], "ged": ["Archiviste"]}"#,
    )
    .unwrap()
}

async fn picker(pool: &PgPool, query: &str) -> Value {
    let app = common::build_test_app_with_catalog(pool.clone(), catalog());
    let response = get(app, &format!("/api/v1/workflow-picker{query}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_empty_selection_lists_definitions_only(pool: PgPool) {
    fixture(&pool).await;
    let data = picker(&pool, "").await;

    assert_eq!(data["definitions"].as_array().unwrap().len(), 2);
    assert_eq!(data["steps"], json!([]));
    assert_eq!(data["roles"], json!([]));
    assert_eq!(data["transitions"], json!([]));
    assert_eq!(data["selection"]["definition_id"], Value::Null);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_selection_returns_filtered_options(pool: PgPool) {
    let f = fixture(&pool).await;
    let data = picker(
        &pool,
        &format!(
            "?definition_id={}&step_id={}&role_name=Validateur%20BN&transition_id={}",
            f.definition, f.s1, f.transition
        ),
    )
    .await;

    let step_ids: Vec<i64> = data["steps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_i64().unwrap())
        .collect();
    assert_eq!(step_ids, vec![f.s1, f.s2]);

    // Stored roles first, catalog names not already stored after.
    let roles: Vec<(&str, &str)> = data["roles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| (r["role_name"].as_str().unwrap(), r["source"].as_str().unwrap()))
        .collect();
    assert_eq!(
        roles,
        [
            ("Superviseur", "stored"),
            ("Validateur BN", "stored"),
            ("Agent Dépôt Légal", "catalog"),
        ]
    );

    assert_eq!(data["transitions"].as_array().unwrap().len(), 1);
    assert_eq!(data["transitions"][0]["to_label"], "Validation");

    assert_eq!(data["selection"]["definition_id"], f.definition);
    assert_eq!(data["selection"]["step_id"], f.s1);
    assert_eq!(data["selection"]["role_name"], "Validateur BN");
    assert_eq!(data["selection"]["transition_id"], f.transition);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_step_from_other_definition_clears_downstream(pool: PgPool) {
    let f = fixture(&pool).await;
    let data = picker(
        &pool,
        &format!(
            "?definition_id={}&step_id={}&role_name=Archiviste&transition_id={}",
            f.other_definition, f.s1, f.transition
        ),
    )
    .await;

    assert_eq!(data["selection"]["definition_id"], f.other_definition);
    assert_eq!(data["selection"]["step_id"], Value::Null);
    assert_eq!(data["selection"]["role_name"], Value::Null);
    assert_eq!(data["selection"]["transition_id"], Value::Null);
    assert_eq!(data["steps"][0]["id"], f.other_step);
    assert_eq!(data["roles"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_role_and_foreign_transition_are_dropped(pool: PgPool) {
    let f = fixture(&pool).await;
    let data = picker(
        &pool,
        &format!(
            "?definition_id={}&step_id={}&role_name=Inconnu&transition_id={}",
            f.definition, f.s2, f.transition
        ),
    )
    .await;

    assert_eq!(data["selection"]["step_id"], f.s2);
    assert_eq!(data["selection"]["role_name"], Value::Null);
    // The transition leaves s1, not s2.
    assert_eq!(data["selection"]["transition_id"], Value::Null);
    assert_eq!(data["transitions"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_step_without_definition_is_ignored(pool: PgPool) {
    let f = fixture(&pool).await;
    let data = picker(&pool, &format!("?step_id={}", f.s1)).await;
    assert_eq!(data["selection"]["step_id"], Value::Null);
    assert_eq!(data["steps"], json!([]));
}
