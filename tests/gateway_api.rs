//! End-to-end tests: HTTP API and WebSocket feed against a live server.

#![allow(clippy::panic)]

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

use gather_gateway::api;
use gather_gateway::app_state::AppState;
use gather_gateway::domain::{EventBus, EventRegistry};
use gather_gateway::notify::LogNotifier;
use gather_gateway::service::{EventService, RegistrationService};
use gather_gateway::ws::handler::ws_handler;

/// Binds the full router on an ephemeral port and returns its address.
async fn spawn_server() -> std::net::SocketAddr {
    let registry = Arc::new(EventRegistry::new());
    let event_bus = EventBus::new(1000);
    let event_service = Arc::new(EventService::new(Arc::clone(&registry), event_bus.clone()));
    let registration_service = Arc::new(RegistrationService::new(
        registry,
        event_bus.clone(),
        Arc::new(LogNotifier),
        true,
    ));
    let app_state = AppState {
        event_service,
        registration_service,
        event_bus,
    };

    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await;
    let Ok(listener) = listener else {
        panic!("failed to bind test listener");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("failed to read listener address");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

fn event_body(capacity: u32) -> serde_json::Value {
    serde_json::json!({
        "title": "Rust Meetup",
        "description": "Monthly meetup",
        "category": "tech",
        "date": "2026-09-01",
        "start_time": "18:00",
        "end_time": "20:00",
        "location": "Community Hall",
        "capacity": capacity,
        "organizer_id": "org-1"
    })
}

fn registration_body(user: &str) -> serde_json::Value {
    serde_json::json!({
        "user_id": user,
        "user_email": format!("{user}@example.com"),
        "user_name": user
    })
}

async fn post_json(
    client: &reqwest::Client,
    url: &str,
    body: &serde_json::Value,
) -> (reqwest::StatusCode, serde_json::Value) {
    let response = client.post(url).json(body).send().await;
    let Ok(response) = response else {
        panic!("request to {url} failed");
    };
    let status = response.status();
    let json = response.json::<serde_json::Value>().await.unwrap_or_default();
    (status, json)
}

#[tokio::test]
async fn health_endpoint_reports_healthy() {
    let addr = spawn_server().await;
    let response = reqwest::get(format!("http://{addr}/health")).await;
    let Ok(response) = response else {
        panic!("health request failed");
    };
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body = response.json::<serde_json::Value>().await.unwrap_or_default();
    assert_eq!(body.get("status").and_then(|v| v.as_str()), Some("healthy"));
}

#[tokio::test]
async fn registration_lifecycle_over_http() {
    let addr = spawn_server().await;
    let base = format!("http://{addr}/api/v1");
    let client = reqwest::Client::new();

    // Create an event with a single confirmed spot.
    let (status, created) = post_json(&client, &format!("{base}/events"), &event_body(1)).await;
    assert_eq!(status, reqwest::StatusCode::CREATED);
    let Some(event_id) = created.get("event_id").and_then(|v| v.as_str()) else {
        panic!("create response missing event_id");
    };
    let event_id = event_id.to_string();

    // First registrant is confirmed.
    let registrations_url = format!("{base}/events/{event_id}/registrations");
    let (status, first) = post_json(&client, &registrations_url, &registration_body("a")).await;
    assert_eq!(status, reqwest::StatusCode::CREATED);
    assert_eq!(first.get("status").and_then(|v| v.as_str()), Some("confirmed"));
    let Some(first_rid) = first.get("registration_id").and_then(|v| v.as_str()) else {
        panic!("registration response missing registration_id");
    };
    let first_rid = first_rid.to_string();

    // Second registrant lands on the waitlist at position 1.
    let (status, second) = post_json(&client, &registrations_url, &registration_body("b")).await;
    assert_eq!(status, reqwest::StatusCode::CREATED);
    assert_eq!(second.get("status").and_then(|v| v.as_str()), Some("waitlist"));

    let position = reqwest::get(format!(
        "http://{addr}/api/v1/events/{event_id}/waitlist-position?user_id=b"
    ))
    .await;
    let Ok(position) = position else {
        panic!("waitlist position request failed");
    };
    let position = position.json::<serde_json::Value>().await.unwrap_or_default();
    assert_eq!(position.get("position").and_then(serde_json::Value::as_u64), Some(1));

    // Duplicate registration is a conflict.
    let (status, _) = post_json(&client, &registrations_url, &registration_body("a")).await;
    assert_eq!(status, reqwest::StatusCode::CONFLICT);

    // Unknown status string on update is a bad request.
    let update = client
        .put(format!("{registrations_url}/{first_rid}"))
        .json(&serde_json::json!({"status": "pending"}))
        .send()
        .await;
    let Ok(update) = update else {
        panic!("status update request failed");
    };
    assert_eq!(update.status(), reqwest::StatusCode::BAD_REQUEST);

    // Cancelling the confirmed registration promotes the waitlisted one.
    let cancel = client
        .delete(format!("{registrations_url}/{first_rid}"))
        .send()
        .await;
    let Ok(cancel) = cancel else {
        panic!("cancellation request failed");
    };
    assert_eq!(cancel.status(), reqwest::StatusCode::OK);
    let outcome = cancel.json::<serde_json::Value>().await.unwrap_or_default();
    assert_eq!(
        outcome
            .pointer("/promoted/user_id")
            .and_then(|v| v.as_str()),
        Some("b")
    );

    // Detail reflects the promotion.
    let detail = reqwest::get(format!("http://{addr}/api/v1/events/{event_id}")).await;
    let Ok(detail) = detail else {
        panic!("detail request failed");
    };
    let detail = detail.json::<serde_json::Value>().await.unwrap_or_default();
    assert_eq!(detail.get("confirmed_count").and_then(serde_json::Value::as_u64), Some(1));
    assert_eq!(detail.get("waitlist_count").and_then(serde_json::Value::as_u64), Some(0));
}

#[tokio::test]
async fn pagination_far_out_of_range_returns_empty_page() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();
    let (status, _) = post_json(
        &client,
        &format!("http://{addr}/api/v1/events"),
        &event_body(5),
    )
    .await;
    assert_eq!(status, reqwest::StatusCode::CREATED);

    // u32::MAX page with max per_page: offset no longer fits in u32.
    let response = reqwest::get(format!(
        "http://{addr}/api/v1/events?page=4294967295&per_page=100"
    ))
    .await;
    let Ok(response) = response else {
        panic!("list request failed");
    };
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body = response.json::<serde_json::Value>().await.unwrap_or_default();
    assert_eq!(
        body.pointer("/data").and_then(|v| v.as_array()).map(Vec::len),
        Some(0)
    );
    assert_eq!(
        body.pointer("/pagination/total")
            .and_then(serde_json::Value::as_u64),
        Some(1)
    );
}

#[tokio::test]
async fn unknown_event_returns_structured_404() {
    let addr = spawn_server().await;
    let missing = uuid::Uuid::new_v4();
    let response = reqwest::get(format!("http://{addr}/api/v1/events/{missing}")).await;
    let Ok(response) = response else {
        panic!("request failed");
    };
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

    let body = response.json::<serde_json::Value>().await.unwrap_or_default();
    assert_eq!(
        body.pointer("/error/code").and_then(serde_json::Value::as_u64),
        Some(2001)
    );
}

#[tokio::test]
async fn websocket_feed_delivers_subscribed_events() {
    let addr = spawn_server().await;

    let connected = tokio_tungstenite::connect_async(format!("ws://{addr}/ws")).await;
    let Ok((mut ws, _)) = connected else {
        panic!("websocket connect failed");
    };

    // Subscribe to everything.
    let subscribe = serde_json::json!({
        "id": "req-1",
        "type": "command",
        "timestamp": chrono::Utc::now(),
        "payload": {"command": "subscribe", "event_ids": ["*"]}
    });
    let sent = ws.send(Message::text(subscribe.to_string())).await;
    assert!(sent.is_ok());

    let Some(Ok(Message::Text(ack))) = ws.next().await else {
        panic!("expected subscribe acknowledgement");
    };
    let ack: serde_json::Value = serde_json::from_str(&ack).unwrap_or_default();
    assert_eq!(ack.get("type").and_then(|v| v.as_str()), Some("response"));
    assert_eq!(ack.pointer("/payload/wildcard"), Some(&serde_json::json!(true)));

    // Creating an event over HTTP shows up on the feed.
    let client = reqwest::Client::new();
    let (status, _) = post_json(
        &client,
        &format!("http://{addr}/api/v1/events"),
        &event_body(10),
    )
    .await;
    assert_eq!(status, reqwest::StatusCode::CREATED);

    let Some(Ok(Message::Text(event))) = ws.next().await else {
        panic!("expected broadcast event");
    };
    let event: serde_json::Value = serde_json::from_str(&event).unwrap_or_default();
    assert_eq!(event.get("type").and_then(|v| v.as_str()), Some("event"));
    assert_eq!(
        event.pointer("/payload/event_type").and_then(|v| v.as_str()),
        Some("event_created")
    );
}
