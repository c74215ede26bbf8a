//! HTTP-level integration tests for workflow steps.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_definition, create_step, delete, get, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

fn step_numbers(json: &serde_json::Value) -> Vec<i64> {
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["step_number"].as_i64().unwrap())
        .collect()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_step_numbers_are_assigned_per_definition(pool: PgPool) {
    let d1 = create_definition(&pool, "DL Standard", "legal_deposit").await["id"]
        .as_i64()
        .unwrap();
    let d2 = create_definition(&pool, "GED", "ged").await["id"].as_i64().unwrap();

    let s1 = create_step(&pool, d1, "Saisie", "creation", None).await;
    let s2 = create_step(&pool, d1, "Validation", "validation", Some("Validateur BN")).await;
    let other = create_step(&pool, d2, "Indexation", "creation", None).await;

    assert_eq!(s1["step_number"], 1);
    assert_eq!(s2["step_number"], 2);
    assert_eq!(s2["required_role"], "Validateur BN");
    assert_eq!(other["step_number"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_step_validates_input(pool: PgPool) {
    let id = create_definition(&pool, "CBM", "cbm").await["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        &format!("/api/v1/workflow-definitions/{id}/steps"),
        json!({"step_name": "Contrôle", "step_type": "approval"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        &format!("/api/v1/workflow-definitions/{id}/steps"),
        json!({"step_name": " ", "step_type": "verification"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/workflow-definitions/999999/steps",
        json!({"step_name": "Contrôle", "step_type": "verification"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_step_keeps_other_numbers(pool: PgPool) {
    let id = create_definition(&pool, "Paiement", "payment").await["id"]
        .as_i64()
        .unwrap();
    create_step(&pool, id, "Facture", "creation", None).await;
    let middle = create_step(&pool, id, "Contrôle", "verification", None).await;
    create_step(&pool, id, "Encaissement", "archivage", None).await;

    let app = common::build_test_app(pool.clone());
    let response = delete(
        app,
        &format!("/api/v1/workflow-steps/{}", middle["id"].as_i64().unwrap()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, &format!("/api/v1/workflow-definitions/{id}/steps")).await).await;
    assert_eq!(step_numbers(&json), vec![1, 3]);

    // The gap is not filled.
    let next = create_step(&pool, id, "Notification", "notification", None).await;
    assert_eq!(next["step_number"], 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleted_last_step_number_is_not_reissued(pool: PgPool) {
    let id = create_definition(&pool, "GED Archives", "ged").await["id"]
        .as_i64()
        .unwrap();
    create_step(&pool, id, "Numérisation", "creation", None).await;
    let last = create_step(&pool, id, "Indexation", "validation", None).await;
    assert_eq!(last["step_number"], 2);

    let app = common::build_test_app(pool.clone());
    let response = delete(
        app,
        &format!("/api/v1/workflow-steps/{}", last["id"].as_i64().unwrap()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let next = create_step(&pool, id, "Archivage", "archivage", None).await;
    assert_eq!(next["step_number"], 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_step_keeps_number(pool: PgPool) {
    let id = create_definition(&pool, "Contenu", "content").await["id"]
        .as_i64()
        .unwrap();
    create_step(&pool, id, "Rédaction", "creation", None).await;
    let step = create_step(&pool, id, "Relecture", "validation", None).await;
    let step_id = step["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/v1/workflow-steps/{step_id}"),
        json!({
            "step_name": "Relecture finale",
            "step_type": "correction",
            "required_role": "Éditeur",
            "step_number": 9,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["step_name"], "Relecture finale");
    assert_eq!(json["data"]["step_type"], "correction");
    assert_eq!(json["data"]["step_number"], 2);

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/workflow-steps/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_outgoing_transitions_of_a_step(pool: PgPool) {
    let id = create_definition(&pool, "DL", "legal_deposit").await["id"]
        .as_i64()
        .unwrap();
    let s1 = create_step(&pool, id, "Saisie", "creation", None).await["id"]
        .as_i64()
        .unwrap();
    let s2 = create_step(&pool, id, "Validation", "validation", None).await["id"]
        .as_i64()
        .unwrap();

    for body in [
        json!({"transition_name": "Démarrer", "from_step_id": "none", "to_step_id": s1}),
        json!({"transition_name": "Soumettre", "from_step_id": s1, "to_step_id": s2}),
        json!({"transition_name": "Abandonner", "from_step_id": s1, "to_step_id": "none"}),
    ] {
        let app = common::build_test_app(pool.clone());
        let response = post_json(
            app,
            &format!("/api/v1/workflow-definitions/{id}/transitions"),
            body,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let app = common::build_test_app(pool);
    let json = body_json(get(app, &format!("/api/v1/workflow-steps/{s1}/transitions")).await).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["transition_name"], "Soumettre");
    assert_eq!(data[0]["to_label"], "Validation");
    assert_eq!(data[1]["to_label"], "end of workflow");
}
