//! HTTP-level integration tests for `/workflow-definitions`.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_definition, create_step, delete, get, post_empty, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_definition_returns_201_with_defaults(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/workflow-definitions",
        json!({
            "name": "  DL Standard ",
            "description": "Circuit standard",
            "workflow_type": "legal_deposit",
            "module": "legal_deposit",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["name"], "DL Standard");
    assert_eq!(data["version"], 1);
    assert_eq!(data["is_active"], true);
    assert_eq!(data["configuration"], json!({}));
    assert!(data["id"].is_number());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_definition_requires_fields(pool: PgPool) {
    let cases = [
        json!({"name": "", "workflow_type": "ged", "module": "ged"}),
        json!({"name": "GED", "workflow_type": "", "module": "ged"}),
        json!({"name": "GED", "workflow_type": "ged", "module": "   "}),
        json!({"name": "GED", "workflow_type": "booking", "module": "ged"}),
    ];
    for body in cases {
        let app = common::build_test_app(pool.clone());
        let response = post_json(app, "/api/v1/workflow-definitions", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/v1/workflow-definitions").await).await;
    assert_eq!(json["total"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_nonexistent_definition_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/workflow-definitions/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "WorkflowDefinition with id 999999 not found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_and_paginates(pool: PgPool) {
    for i in 1..=3 {
        create_definition(&pool, &format!("Dépôt {i}"), "legal_deposit").await;
    }
    create_definition(&pool, "Catalogage courant", "cataloging").await;

    let app = common::build_test_app(pool.clone());
    let json = body_json(
        get(
            app,
            "/api/v1/workflow-definitions?module=legal_deposit&per_page=2&page=1",
        )
        .await,
    )
    .await;
    assert_eq!(json["total"], 3);
    assert_eq!(json["page"], 1);
    assert_eq!(json["per_page"], 2);
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    // Most recently updated first.
    assert_eq!(names, ["Dépôt 3", "Dépôt 2"]);

    let app = common::build_test_app(pool.clone());
    let json = body_json(
        get(
            app,
            "/api/v1/workflow-definitions?module=legal_deposit&per_page=2&page=2",
        )
        .await,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, "/api/v1/workflow-definitions?search=catalog").await).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["module"], "cataloging");

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/workflow-definitions?workflow_type=booking").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_overwrites_fields_and_checks_version(pool: PgPool) {
    let created = create_definition(&pool, "GED", "ged").await;
    let id = created["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/v1/workflow-definitions/{id}"),
        json!({
            "name": "GED v2",
            "workflow_type": "ged",
            "module": "ged",
            "version": 2,
            "configuration": {"sla_days": 5},
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "GED v2");
    assert_eq!(json["data"]["version"], 2);
    assert_eq!(json["data"]["description"], serde_json::Value::Null);
    assert_eq!(json["data"]["configuration"]["sla_days"], 5);

    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/v1/workflow-definitions/{id}"),
        json!({"name": "GED", "workflow_type": "ged", "module": "ged", "version": 1}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/v1/workflow-definitions/{id}"),
        json!({"name": "GED", "workflow_type": "ged", "module": "ged", "configuration": [1]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        "/api/v1/workflow-definitions/999999",
        json!({"name": "GED", "workflow_type": "ged", "module": "ged"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_toggle_active_twice_restores_value(pool: PgPool) {
    let created = create_definition(&pool, "Paiement", "payment").await;
    let id = created["id"].as_i64().unwrap();
    let uri = format!("/api/v1/workflow-definitions/{id}/toggle-active");

    let app = common::build_test_app(pool.clone());
    let json = body_json(post_empty(app, &uri).await).await;
    assert_eq!(json["data"]["is_active"], false);

    let app = common::build_test_app(pool);
    let json = body_json(post_empty(app, &uri).await).await;
    assert_eq!(json["data"]["is_active"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_definition_leaves_steps(pool: PgPool) {
    let created = create_definition(&pool, "CBM", "cbm").await;
    let id = created["id"].as_i64().unwrap();
    create_step(&pool, id, "Saisie", "creation", None).await;

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/workflow-definitions/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/workflow-definitions/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, &format!("/api/v1/workflow-definitions/{id}/steps")).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let app = common::build_test_app(pool);
    let response = delete(app, &format!("/api/v1/workflow-definitions/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_graph_reports_integrity_findings(pool: PgPool) {
    let created = create_definition(&pool, "Contenu", "content").await;
    let id = created["id"].as_i64().unwrap();
    let s1 = create_step(&pool, id, "Rédaction", "creation", None).await;
    let s2 = create_step(&pool, id, "Publication", "notification", None).await;
    let s1_id = s1["id"].as_i64().unwrap();
    let s2_id = s2["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        &format!("/api/v1/workflow-definitions/{id}/transitions"),
        json!({"transition_name": "Soumettre", "from_step_id": s1_id, "to_step_id": 424242}),
    )
    .await;

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/workflow-definitions/{id}/graph")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let data = &json["data"];

    assert_eq!(data["definition"]["id"], id);
    assert_eq!(data["steps"].as_array().unwrap().len(), 2);
    assert_eq!(data["transitions"][0]["from_label"], "Rédaction");
    assert_eq!(data["transitions"][0]["to_label"], "-");
    assert_eq!(data["integrity"]["dangling_endpoints"][0]["side"], "to");
    assert_eq!(data["integrity"]["dangling_endpoints"][0]["step_id"], 424242);
    assert_eq!(data["integrity"]["unconnected_step_ids"], json!([s2_id]));
    assert_eq!(data["integrity"]["duplicate_step_numbers"], json!([]));
}
