//! A scriptable stand-in for the JobMate backend, served by axum on an
//! ephemeral port.

#![allow(dead_code)]

use axum::{
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// One request as the backend saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

type Responder = dyn Fn(&Recorded) -> (u16, Value) + Send + Sync;

struct Backend {
    responder: Box<Responder>,
    requests: Mutex<Vec<Recorded>>,
}

pub struct MockBackend {
    pub url: String,
    backend: Arc<Backend>,
}

impl MockBackend {
    pub fn requests(&self) -> Vec<Recorded> {
        self.backend.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> Recorded {
        self.requests().pop().expect("no request was made")
    }
}

async fn handle(
    State(backend): State<Arc<Backend>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let recorded = Recorded {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    };
    let (status, payload) = (backend.responder)(&recorded);
    backend.requests.lock().unwrap().push(recorded);
    let status = StatusCode::from_u16(status).unwrap();
    if payload.is_null() {
        status.into_response()
    } else {
        (status, Json(payload)).into_response()
    }
}

/// Starts a backend that answers every request with `responder`.
pub async fn spawn(
    responder: impl Fn(&Recorded) -> (u16, Value) + Send + Sync + 'static,
) -> MockBackend {
    let backend = Arc::new(Backend {
        responder: Box::new(responder),
        requests: Mutex::new(Vec::new()),
    });
    let app = Router::new().fallback(handle).with_state(backend.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    MockBackend { url, backend }
}

pub fn temp_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("jobmate-{}-{}", label, uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn application_json(id: &str, status: &str) -> Value {
    serde_json::json!({
        "id": id,
        "jobTitle": "Rust Engineer",
        "company": "Ferrous Systems",
        "location": "Berlin, DE",
        "type": "Full-time",
        "status": status,
        "appliedDate": "2025-01-10T09:00:00Z",
        "lastUpdated": "2025-01-11T09:00:00Z"
    })
}

/// What a generation backend returns for a request body: the same content as a
/// saved document.
pub fn cv_from_request(body: &Value, id: &str) -> Value {
    serde_json::json!({
        "id": id,
        "personalInfo": body["personalInfo"],
        "professionalSummary": body.get("professionalSummary").cloned().unwrap_or_else(|| "Enhanced summary".into()),
        "workExperience": body["workExperience"],
        "education": body["education"],
        "skills": body["skills"],
        "template": body["templateId"]
    })
}
