// tests/support/mod.rs - In-process fake of the primary and analysis backends
//
// One axum server plays both roles: the primary backend under `/api` and the
// analysis backend under `/direct`. Every request that matters is recorded as a
// short string so tests can assert on headers and form fields.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use dropsee::api::ApiClient;
use dropsee::infra::config::ApiConfig;

pub const TOKEN: &str = "tok-1";
pub const PASSWORD: &str = "secret1";

#[derive(Clone, Default)]
pub struct Backend {
    seen: Arc<Mutex<Vec<String>>>,
}

impl Backend {
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    fn record(&self, entry: String) {
        self.seen.lock().unwrap().push(entry);
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {TOKEN}"))
        .unwrap_or(false)
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
}

/// Result body as the analysis backend produces it.
pub fn analysis_result(file_name: &str, analysis_id: Option<i64>) -> Value {
    let mut result = json!({
        "file_id": "f-77",
        "file_name": file_name,
        "row_count": 120,
        "column_count": 5,
        "columns": ["region", "month", "units", "price", "revenue"],
        "statistics": [
            {"column_name": "units", "data_type": "int64", "count": 120, "unique": 40,
             "missing": 0, "mean": 12.5, "std": 3.2, "min": 1.0, "max": 30.0, "top": null},
            {"column_name": "region", "data_type": "object", "count": 118, "unique": 4,
             "missing": 2, "mean": null, "std": null, "min": null, "max": null, "top": "North"}
        ],
        "charts": [{"chart_type": "bar", "title": "Histogram of units", "url": "/api/analysis/chart/f-77/bar"}],
        "summary": "120 rows, 5 columns"
    });
    if let Some(id) = analysis_id {
        result["analysis_id"] = json!(id);
    }
    result
}

/// Name and size of the multipart `file` field.
async fn read_file_field(mut form: Multipart) -> Option<(String, usize)> {
    while let Ok(Some(field)) = form.next_field().await {
        if field.name() == Some("file") {
            let name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.ok()?;
            return Some((name, bytes.len()));
        }
    }
    None
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == PASSWORD {
        Json(json!({
            "accessToken": TOKEN,
            "tokenType": "Bearer",
            "email": body["email"],
            "name": "Mina"
        }))
        .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid email or password"})),
        )
            .into_response()
    }
}

async fn signup(State(backend): State<Backend>, Json(body): Json<Value>) -> Response {
    backend.record(format!(
        "signup:{}:{}",
        body["name"].as_str().unwrap_or_default(),
        body["email"].as_str().unwrap_or_default()
    ));
    if body["email"] == "taken@example.com" {
        return (
            StatusCode::CONFLICT,
            Json(json!({"message": "Email already registered"})),
        )
            .into_response();
    }
    Json(json!({"message": "Signed up"})).into_response()
}

async fn me(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({
        "id": 1,
        "email": "mina@example.com",
        "name": "Mina Park",
        "createdAt": "2026-01-15T08:30:00"
    }))
    .into_response()
}

async fn change_password(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if body["currentPassword"] != PASSWORD {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Current password is incorrect"})),
        )
            .into_response();
    }
    Json(json!({"message": "Password changed"})).into_response()
}

async fn update_name(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    backend.record(format!("name:{}", body["name"].as_str().unwrap_or_default()));
    // This endpoint answers with an empty body.
    StatusCode::OK.into_response()
}

async fn upload(State(backend): State<Backend>, headers: HeaderMap, form: Multipart) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let Some((name, size)) = read_file_field(form).await else {
        return (StatusCode::BAD_REQUEST, Json(json!({"message": "No file"}))).into_response();
    };
    backend.record(format!("upload:{name}:{size}"));
    // Relayed result arrives JSON-encoded a second time.
    let inner = analysis_result(&name, Some(31)).to_string();
    Json(Value::String(inner)).into_response()
}

async fn upload_direct(State(backend): State<Backend>, headers: HeaderMap, form: Multipart) -> Response {
    let Some((name, size)) = read_file_field(form).await else {
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({"detail": "No file"}))).into_response();
    };
    backend.record(format!(
        "direct:{name}:{size}:auth={}",
        headers.contains_key("authorization")
    ));
    if name.ends_with(".xls") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Unsupported format: xls"})),
        )
            .into_response();
    }
    Json(analysis_result(&name, None)).into_response()
}

async fn history(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!([
        {"id": 31, "fileName": "sales.csv", "fileId": "f-77", "summary": "120 rows, 5 columns",
         "thumbnailPath": null, "createdAt": "2026-03-01T09:30:00"},
        {"id": 30, "fileName": "survey.json", "fileId": "f-76", "summary": "40 rows, 3 columns",
         "thumbnailPath": null, "createdAt": "2026-02-27T18:05:12.345"}
    ]))
    .into_response()
}

pub fn stored_payload() -> String {
    json!({
        "charts": [
            {"chart_type": "bar", "title": "Histogram of units", "url": "/api/analysis/chart/f-77/bar"},
            {"chart_type": "heatmap", "title": "Correlation", "url": "https://img.example.com/heat.png"}
        ],
        "statistics": {
            "units": {"count": 120, "mean": 12.5, "std": 3.2, "min": 1, "max": 30, "25%": 8, "50%": 12, "75%": 16.75},
            "region": {"count": 118}
        },
        "preview": {
            "columns": ["region", "units"],
            "data": [{"region": "North", "units": 3}, {"region": null, "units": 5}]
        }
    })
    .to_string()
}

async fn analysis(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    backend.record(format!("analysis:{id}"));
    match id.as_str() {
        "31" => Json(json!({
            "id": 31,
            "fileName": "sales.csv",
            "fileId": "f-77",
            "summary": "120 rows, 5 columns",
            "thumbnailPath": null,
            "resultData": stored_payload(),
            "createdAt": "2026-03-01T09:30:00"
        }))
        .into_response(),
        "32" => Json(json!({
            "id": 32,
            "fileName": "broken.csv",
            "resultData": "{not json",
            "createdAt": "2026-03-02T10:00:00"
        }))
        .into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Analysis not found"})),
        )
            .into_response(),
    }
}

pub fn router(backend: Backend) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/signup", post(signup))
        .route("/api/users/me", get(me))
        .route("/api/users/password", put(change_password))
        .route("/api/users/name", put(update_name))
        .route("/api/analysis/upload", post(upload))
        .route("/api/analysis/history", get(history))
        .route("/api/analysis/{id}", get(analysis))
        .route("/direct/api/analysis/upload", post(upload_direct))
        .with_state(backend)
}

/// Start the fake on an ephemeral port. Returns the recorder and a client
/// pointed at it.
pub async fn spawn() -> (Backend, ApiClient) {
    let backend = Backend::default();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(backend.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = ApiConfig {
        base_url: format!("http://{addr}/api"),
        analysis_url: format!("http://{addr}/direct"),
    };
    (backend, ApiClient::new(&config))
}
