//! Integration tests for the relay, chat and contact HTTP surfaces.
//!
//! Each test spins up an Axum server on a random port and drives it with
//! reqwest, exercising the real JSON contract.

use std::path::PathBuf;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;

use portfolio_leads::config::{AppConfig, DEFAULT_FALLBACK_REPLY, OwnerConfig};
use portfolio_leads::dialogue::Answers;
use portfolio_leads::error::RelayError;
use portfolio_leads::relay::{HttpRelay, LeadRelay, LeadStore};
use portfolio_leads::server::build_app;

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

fn test_config(leads_file: PathBuf) -> AppConfig {
    AppConfig {
        bind: "127.0.0.1".into(),
        port: 0,
        leads_file,
        relay_url: None,
        relay_timeout: Duration::from_secs(2),
        owner: OwnerConfig {
            email: "owner@example.com".into(),
            name: "Owner".into(),
        },
        session_idle_timeout: Duration::from_secs(3600),
        fallback_reply: DEFAULT_FALLBACK_REPLY.into(),
        smtp: None,
    }
}

/// Start the app on a random port, return its base URL.
async fn start_server(config: AppConfig) -> String {
    let app = build_app(&config).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app.router).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    format!("http://127.0.0.1:{port}")
}

/// Poll the lead file until it holds `count` records.
async fn wait_for_leads(store: &LeadStore, count: usize) -> Vec<portfolio_leads::relay::LeadRecord> {
    loop {
        let records = store.all().await.unwrap();
        if records.len() >= count {
            return records;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

fn jane() -> Answers {
    Answers {
        looking_for: "a job".into(),
        name: "Jane Doe".into(),
        email: "jane@example.com".into(),
        company: "N/A".into(),
        role: "N/A".into(),
        details: "just exploring".into(),
    }
}

// ── Relay ────────────────────────────────────────────────────────────

#[tokio::test]
async fn http_relay_round_trip_records_lead() {
    timeout(TEST_TIMEOUT, async {
        let dir = tempfile::tempdir().unwrap();
        let leads = dir.path().join("leads.json");
        let base = start_server(test_config(leads.clone())).await;

        let relay = HttpRelay::new(format!("{base}/send_email"), Duration::from_secs(2)).unwrap();
        let response = relay.submit(&jane()).await.unwrap();
        assert!(response.success);
        assert_eq!(response.message, "Lead captured and email sent.");

        let records = LeadStore::new(leads).all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].email, "jane@example.com");
        assert_eq!(records[0].intent, "a job");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn http_relay_surfaces_validation_rejection() {
    timeout(TEST_TIMEOUT, async {
        let dir = tempfile::tempdir().unwrap();
        let base = start_server(test_config(dir.path().join("leads.json"))).await;

        let relay = HttpRelay::new(format!("{base}/send_email"), Duration::from_secs(2)).unwrap();
        let bad = Answers {
            name: String::new(),
            ..jane()
        };
        match relay.submit(&bad).await {
            Err(RelayError::Rejected { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid name or email.");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn relay_answers_cors_preflight() {
    timeout(TEST_TIMEOUT, async {
        let dir = tempfile::tempdir().unwrap();
        let base = start_server(test_config(dir.path().join("leads.json"))).await;

        let response = reqwest::Client::new()
            .request(reqwest::Method::OPTIONS, format!("{base}/send_email"))
            .header("Origin", "https://portfolio.example")
            .header("Access-Control-Request-Method", "POST")
            .header("Access-Control-Request-Headers", "content-type")
            .send()
            .await
            .unwrap();

        assert!(response.status().is_success());
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
    })
    .await
    .expect("test timed out");
}

// ── Chat ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn chat_dialogue_end_to_end_records_one_lead() {
    timeout(TEST_TIMEOUT, async {
        let dir = tempfile::tempdir().unwrap();
        let leads = dir.path().join("leads.json");
        let base = start_server(test_config(leads.clone())).await;
        let client = reqwest::Client::new();

        let opened: Value = client
            .post(format!("{base}/api/chat/sessions"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let id = opened["id"].as_str().unwrap().to_string();
        assert_eq!(opened["transcript"].as_array().unwrap().len(), 1);

        let lines = [
            "a job",
            "Jane Doe",
            "jane@example.com",
            "skip",
            "SKIP",
            "just exploring",
        ];
        let mut last = Value::Null;
        for line in lines {
            last = client
                .post(format!("{base}/api/chat/sessions/{id}/messages"))
                .json(&json!({ "text": line }))
                .send()
                .await
                .unwrap()
                .json()
                .await
                .unwrap();
        }

        assert_eq!(last["current_step"], "complete");
        assert_eq!(last["complete"], true);
        assert_eq!(last["transcript"].as_array().unwrap().len(), 13);

        let store = LeadStore::new(leads);
        let records = wait_for_leads(&store, 1).await;
        assert_eq!(records[0].name, "Jane Doe");
        assert_eq!(records[0].company, "N/A");
        assert_eq!(records[0].role, "N/A");
        assert_eq!(records[0].details, "just exploring");

        // A question after completion gets the fallback reply and no new lead.
        let reply: Value = client
            .post(format!("{base}/api/chat/sessions/{id}/messages"))
            .json(&json!({ "text": "what do you build?" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(reply["appended"][1]["text"], DEFAULT_FALLBACK_REPLY);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(store.all().await.unwrap().len(), 1);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn chat_with_invalid_email_still_completes() {
    timeout(TEST_TIMEOUT, async {
        let dir = tempfile::tempdir().unwrap();
        let leads = dir.path().join("leads.json");
        let base = start_server(test_config(leads.clone())).await;
        let client = reqwest::Client::new();

        let opened: Value = client
            .post(format!("{base}/api/chat/sessions"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let id = opened["id"].as_str().unwrap().to_string();

        let mut last = Value::Null;
        for line in ["hiring", "Sam", "not-an-email", "skip", "skip", "skip"] {
            last = client
                .post(format!("{base}/api/chat/sessions/{id}/messages"))
                .json(&json!({ "text": line }))
                .send()
                .await
                .unwrap()
                .json()
                .await
                .unwrap();
        }
        assert_eq!(last["complete"], true);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(LeadStore::new(leads).all().await.unwrap().is_empty());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn unknown_chat_session_is_404() {
    timeout(TEST_TIMEOUT, async {
        let dir = tempfile::tempdir().unwrap();
        let base = start_server(test_config(dir.path().join("leads.json"))).await;

        let response = reqwest::Client::new()
            .post(format!(
                "{base}/api/chat/sessions/{}/messages",
                uuid::Uuid::new_v4()
            ))
            .json(&json!({ "text": "hi" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    })
    .await
    .expect("test timed out");
}

// ── Contact form ─────────────────────────────────────────────────────

#[tokio::test]
async fn contact_form_reports_relay_verdict() {
    timeout(TEST_TIMEOUT, async {
        let dir = tempfile::tempdir().unwrap();
        let leads = dir.path().join("leads.json");
        let base = start_server(test_config(leads.clone())).await;
        let client = reqwest::Client::new();

        let ok = client
            .post(format!("{base}/api/contact"))
            .json(&json!({"name": "Jane", "email": "jane@example.com", "message": "Hello"}))
            .send()
            .await
            .unwrap();
        assert_eq!(ok.status(), reqwest::StatusCode::OK);
        let body: Value = ok.json().await.unwrap();
        assert_eq!(body["success"], true);

        let bad = client
            .post(format!("{base}/api/contact"))
            .json(&json!({"name": "Jane", "email": "jane-at-example", "message": "Hello"}))
            .send()
            .await
            .unwrap();
        assert_eq!(bad.status(), reqwest::StatusCode::BAD_REQUEST);
        let body: Value = bad.json().await.unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Invalid name or email.");

        let records = LeadStore::new(leads).all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].intent, "Contact form");
        assert_eq!(records[0].details, "Hello");
    })
    .await
    .expect("test timed out");
}
