//! Shared fixtures: a scripted axum push server and REST mock helpers.

use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::routing::get;
use axum::Router;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// One step of a push server script.
#[derive(Clone)]
pub enum Step {
    Send(&'static str),
    Wait(Duration),
    Close,
}

pub const GREETING: &str =
    r#"{"type":"connected","message":"Connected to sentiment stream","timestamp":"2025-03-01T10:00:00"}"#;

/// Starts a push server on an ephemeral port that runs `script` for every
/// client, then idles until the client leaves.
pub async fn spawn_push_server(script: Vec<Step>) -> String {
    let app = Router::new().route(
        "/ws/sentiment",
        get(move |ws: WebSocketUpgrade| {
            let script = script.clone();
            async move { ws.on_upgrade(move |socket| run_script(socket, script)) }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("push server");
    });
    format!("ws://{addr}/ws/sentiment")
}

async fn run_script(mut socket: WebSocket, script: Vec<Step>) {
    for step in script {
        match step {
            Step::Send(text) => {
                if socket.send(Message::Text(text.into())).await.is_err() {
                    return;
                }
            }
            Step::Wait(delay) => tokio::time::sleep(delay).await,
            Step::Close => {
                let _ = socket.send(Message::Close(None)).await;
                return;
            }
        }
    }
    while let Some(Ok(_)) = socket.recv().await {}
}

/// A ws URL with nothing listening behind it.
pub async fn dead_ws_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("ws://{addr}/ws/sentiment")
}

pub fn distribution_body(positive: u64, negative: u64, neutral: u64) -> serde_json::Value {
    json!({
        "timeframe_hours": 24,
        "distribution": {"positive": positive, "negative": negative, "neutral": neutral},
        "total": positive + negative + neutral,
        "percentages": {}
    })
}

/// Two posts in hour 10 (positive, negative) and one in hour 14 (neutral).
pub fn posts_body() -> serde_json::Value {
    let post = |id: &str, created_at: &str, label: &str| {
        json!({
            "post_id": id,
            "source": "twitter",
            "content": format!("post {id}"),
            "author": "tester",
            "created_at": created_at,
            "sentiment": {"label": label, "confidence": 0.9, "emotion": null, "model_name": "m"}
        })
    };
    json!({
        "posts": [
            post("p1", "2025-03-01T10:05:00", "positive"),
            post("p2", "2025-03-01T10:35:00", "negative"),
            post("p3", "2025-03-01T14:20:00", "neutral")
        ],
        "total": 3,
        "limit": 20,
        "offset": 0
    })
}

pub async fn mount_rest(server: &MockServer, distribution: ResponseTemplate, posts: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/api/sentiment/distribution"))
        .respond_with(distribution)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/posts"))
        .respond_with(posts)
        .mount(server)
        .await;
}
