mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::{QUEST_JSON, ScriptedGenerator, orchestrator};
use serde_json::{Value, json};
use wellness_core::clients::GenerationError;
use wellness_core::config::Config;
use wellness_core::http::{AppState, build_router};

fn server_with(generator: Arc<ScriptedGenerator>) -> TestServer {
    let state = AppState::new(Arc::new(Config::default()), orchestrator(generator));
    TestServer::new(build_router(state)).unwrap()
}

fn server() -> TestServer {
    server_with(ScriptedGenerator::replying(QUEST_JSON))
}

#[tokio::test]
async fn health_answers_ok() {
    let response = server().get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "ok");
}

#[tokio::test]
async fn questions_are_listed_in_order() {
    let response = server().get("/api/assessments/teique-sf/questions").await;
    response.assert_status_ok();
    let body: Value = response.json();
    let items = body.as_array().expect("array of questions");
    assert_eq!(items.len(), 20);
    assert_eq!(items[0]["id"], 1);
    assert_eq!(items[0]["domain"], "selfAwareness");
    assert_eq!(items[1]["reverse"], true);

    server()
        .get("/api/assessments/msceit/questions")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn score_endpoint_returns_assessment() {
    let response = server()
        .post("/api/assessments/score")
        .json(&json!({
            "tool": "TEIQue-SF",
            "answers": { "0": 5, "1": 1, "2": 5, "3": 1, "4": 5 }
        }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["tool"], "TEIQue-SF");
    assert_eq!(body["baselineScore"], 90.0);
    assert_eq!(body["domainScores"]["selfAwareness"], 60.0);
    assert_eq!(body["strengths"], json!(["selfManagement", "socialAwareness"]));
    assert_eq!(body["gaps"], json!(["relationshipManagement", "selfAwareness"]));
    assert!(body["id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn score_endpoint_rejects_bad_input() {
    let out_of_range = server()
        .post("/api/assessments/score")
        .json(&json!({ "tool": "TEIQue-SF", "answers": { "0": 9 } }))
        .await;
    out_of_range.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = out_of_range.json();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().is_some_and(|e| e.contains("0=9")));

    server()
        .post("/api/assessments/score")
        .json(&json!({ "answers": {} }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server()
        .post("/api/assessments/score")
        .json(&json!({ "tool": "unknown", "answers": {} }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn burnout_endpoint_always_answers() {
    let server = server();

    let risky = server
        .post("/api/burnout/risk")
        .json(&json!({
            "emotionalState": "exhausted and detached",
            "motivationLevel": 5
        }))
        .await;
    risky.assert_status_ok();
    let body: Value = risky.json();
    assert_eq!(body["level"], "high");
    assert_eq!(body["referralNeeded"], true);

    let wrong_types = server
        .post("/api/burnout/risk")
        .json(&json!({ "motivationLevel": "very low" }))
        .await;
    wrong_types.assert_status_ok();
    let body: Value = wrong_types.json();
    assert_eq!(body["level"], "low");
    assert_eq!(body["referralNeeded"], false);

    let bad_reflection = server
        .post("/api/burnout/risk")
        .json(&json!({
            "emotionalState": "fine",
            "motivationLevel": 1,
            "recentReflections": [{ "motivationLevel": 3.5 }]
        }))
        .await;
    bad_reflection.assert_status_ok();
    let body: Value = bad_reflection.json();
    assert_eq!(body["level"], "critical");

    let not_json = server.post("/api/burnout/risk").text("help").await;
    not_json.assert_status_ok();
    let body: Value = not_json.json();
    assert_eq!(body["level"], "low");
}

#[tokio::test]
async fn quest_endpoint_serves_parsed_reply() {
    let response = server()
        .post("/api/quests/generate")
        .json(&json!({ "reflection": "Busy night, but a family thanked me" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["fallbackUsed"], false);
    assert_eq!(body["data"]["title"], "Gratitude Note");
}

#[tokio::test]
async fn quest_endpoint_falls_back_when_generation_fails() {
    let server = server_with(ScriptedGenerator::failing(GenerationError::Transport(
        "connection refused".into(),
    )));
    let response = server
        .post("/api/quests/generate")
        .json(&json!({ "reflection": "Rough shift" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["fallbackUsed"], true);
    assert_eq!(body["attempts"], 3);
    assert!(body["data"]["title"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn generation_without_credentials_is_unavailable() {
    let server = server_with(ScriptedGenerator::failing(
        GenerationError::MissingCredentials,
    ));
    let response = server
        .post("/api/support/chat")
        .json(&json!({ "message": "Can we talk?" }))
        .await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["fallbackUsed"], false);
}

#[tokio::test]
async fn program_endpoint_validates_and_generates() {
    let server = server_with(ScriptedGenerator::replying("not json at all"));

    server
        .post("/api/programs/generate")
        .json(&json!({ "baselineScore": -3 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/programs/generate")
        .json(&json!({
            "baselineScore": 62.5,
            "domainScores": { "selfAwareness": 70, "selfManagement": 45 },
            "gaps": ["selfManagement"],
            "durationWeeks": 2
        }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["fallbackUsed"], true);
    assert_eq!(body["fallbackReason"], "unparseable");
    assert_eq!(body["data"]["weeks"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn metrics_count_api_requests() {
    let server = server();
    server.get("/api/assessments/TEIQue-SF/questions").await;
    server
        .post("/api/burnout/risk")
        .json(&json!({ "emotionalState": "fine" }))
        .await;
    server.get("/health").await;

    let body: Value = server.get("/metrics").await.json();
    assert_eq!(body["totalRequests"], 2);
    assert_eq!(body["errorsTotal"], 0);
    assert_eq!(body["routes"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn info_reports_generation_settings() {
    let body: Value = server().get("/info").await.json();
    assert_eq!(body["service"], "wellness-core");
    assert_eq!(body["generation"]["model"], "scripted");
    assert_eq!(body["generation"]["maxAttempts"], 3);
    assert_eq!(body["generation"]["credentialsConfigured"], false);
}

#[tokio::test]
async fn metrics_group_requests_by_route_template() {
    let server = server();
    for i in 0..50 {
        server.get(&format!("/api/nope-{i}")).await;
        server
            .get(&format!("/api/assessments/tool-{i}/questions"))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    let body: Value = server.get("/metrics").await.json();
    let routes = body["routes"].as_array().expect("routes array");
    assert!(routes.len() <= 2, "unbounded route keys: {}", routes.len());
    assert!(
        routes
            .iter()
            .all(|r| !r["route"].as_str().unwrap_or_default().contains("nope-"))
    );
    let questions = routes
        .iter()
        .find(|r| r["route"] == "/api/assessments/:tool/questions")
        .expect("questions route counted under its template");
    assert_eq!(questions["count"], 50);
}
