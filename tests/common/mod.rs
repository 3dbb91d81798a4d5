use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use reqwest::header::HeaderMap;
use reqwest::{Client, Method};
use serde_json::{json, Value};

use lead_relay::config::Config;
use lead_relay::delivery::DeliveryPolicy;

pub const ALLOWED_ORIGIN: &str = "https://corteza.app";
pub const ATTEMPT_TIMEOUT: Duration = Duration::from_millis(300);
pub const RETRY_DELAY: Duration = Duration::from_millis(100);

/// A running relay instance.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// POST a JSON body to the relay root with the given `Origin`.
    pub async fn submit(&self, origin: Option<&str>, body: &Value) -> TestResponse {
        let mut req = self.client.post(self.url("/")).json(body);
        if let Some(origin) = origin {
            req = req.header("origin", origin);
        }
        let resp = req.send().await.expect("submit request failed");
        into_test_response(resp).await
    }

    /// POST a raw body with an explicit content type.
    pub async fn submit_raw(&self, origin: &str, body: impl Into<reqwest::Body>) -> TestResponse {
        let resp = self
            .client
            .post(self.url("/"))
            .header("origin", origin)
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("raw submit request failed");
        into_test_response(resp).await
    }

    pub async fn preflight(&self, path: &str, origin: &str) -> TestResponse {
        let resp = self
            .client
            .request(Method::OPTIONS, self.url(path))
            .header("origin", origin)
            .header("access-control-request-method", "POST")
            .send()
            .await
            .expect("preflight request failed");
        into_test_response(resp).await
    }
}

async fn into_test_response(resp: reqwest::Response) -> TestResponse {
    let status = resp.status();
    let headers = resp.headers().clone();
    let body: Value = resp.json().await.unwrap_or(json!(null));
    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn valid_submission() -> Value {
    json!({
        "firstName": "Ada",
        "lastName": "Lovelace",
        "email": "ada@example.com",
        "timestamp": "2024-01-01T12:00:00.000Z",
    })
}

/// Config with short delivery timings so retry paths finish quickly.
pub fn test_config(webhook_url: Option<String>) -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        webhook_url,
        allowed_origins: vec![ALLOWED_ORIGIN.to_string()],
        preview_suffix: ".lovable.app".to_string(),
        log_level: "warn".to_string(),
        delivery: DeliveryPolicy {
            max_attempts: 3,
            attempt_timeout: ATTEMPT_TIMEOUT,
            retry_delay: RETRY_DELAY,
        },
    }
}

/// Spawn the relay on a random port.
pub async fn spawn_app(webhook_url: Option<String>) -> TestApp {
    let app = lead_relay::build_app(test_config(webhook_url)).expect("Failed to build app");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
    }
}

// ── Mock downstream webhook ─────────────────────────────────────

/// What the mock webhook does for one call.
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    Status(u16),
    /// Never answer.
    Hang,
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub at: Instant,
    pub body: Value,
}

struct MockState {
    script: Vec<Reply>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

pub struct MockDownstream {
    pub url: String,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockDownstream {
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

/// Spawn a webhook that answers call N with `script[N]`, repeating the last
/// entry once the script runs out.
pub async fn spawn_downstream(script: Vec<Reply>) -> MockDownstream {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let state = Arc::new(MockState {
        script,
        calls: calls.clone(),
    });

    let app = Router::new()
        .route("/hook", post(mock_hook))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock downstream");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock downstream failed");
    });

    MockDownstream {
        url: format!("http://{addr}/hook"),
        calls,
    }
}

async fn mock_hook(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    let reply = {
        let mut calls = state.calls.lock().unwrap();
        let index = calls.len();
        calls.push(RecordedCall {
            at: Instant::now(),
            body,
        });
        state
            .script
            .get(index)
            .or(state.script.last())
            .copied()
            .unwrap_or(Reply::Status(200))
    };

    match reply {
        Reply::Status(code) => {
            let status = StatusCode::from_u16(code).unwrap();
            (status, format!("mock reply {code}")).into_response()
        }
        Reply::Hang => std::future::pending::<Response>().await,
    }
}
