//! In-process stand-in for the identity provider and the Power BI REST API.
//!
//! Routes are matched on method + path; every request is recorded so tests
//! can assert on what the client actually sent.

use actix_web::dev::ServerHandle;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::timeout;

use crate::domain::error::{AppError, Result};

#[derive(Debug, Clone)]
pub struct MockRoute {
    pub method: String,
    pub path: String,
    pub status: u16,
    pub body: String,
}

impl MockRoute {
    pub fn post(path: &str, status: u16, body: impl Into<String>) -> Self {
        Self {
            method: "POST".to_string(),
            path: path.to_string(),
            status,
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap_or(serde_json::Value::Null)
    }

    pub fn form(&self) -> HashMap<String, String> {
        url::form_urlencoded::parse(self.body.as_bytes())
            .into_owned()
            .collect()
    }
}

#[derive(Default)]
struct MockServerState {
    routes: Mutex<Vec<MockRoute>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct MockServer {
    state: Arc<MockServerState>,
    handle: ServerHandle,
    base_url: String,
}

impl MockServer {
    /// Bind to an ephemeral port and serve `routes` on the current runtime.
    pub async fn start(routes: Vec<MockRoute>) -> Result<Self> {
        let state = Arc::new(MockServerState {
            routes: Mutex::new(routes),
            requests: Mutex::new(Vec::new()),
        });

        let server_state = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(server_state.clone()))
                .default_service(web::route().to(handle_mock_request))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .map_err(|err| AppError::Internal(format!("Failed to bind mock server: {}", err)))?;

        let addr = server
            .addrs()
            .first()
            .copied()
            .ok_or_else(|| AppError::Internal("Mock server has no address".to_string()))?;

        let server = server.run();
        let handle = server.handle();
        tokio::spawn(server);

        Ok(Self {
            state,
            handle,
            base_url: format!("http://{}", addr),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        let wanted = normalize_path(path);
        self.requests()
            .into_iter()
            .filter(|r| normalize_path(&r.path) == wanted)
            .collect()
    }

    pub async fn stop(self) {
        if timeout(Duration::from_secs(2), self.handle.stop(true))
            .await
            .is_err()
        {
            self.handle.stop(false).await;
        }
    }
}

async fn handle_mock_request(
    req: HttpRequest,
    body: web::Bytes,
    data: web::Data<Arc<MockServerState>>,
) -> HttpResponse {
    let method = req.method().as_str().to_uppercase();
    let path = req.path().to_string();

    data.requests.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        headers: parse_headers(&req),
        body: String::from_utf8_lossy(&body).to_string(),
    });

    let route = data
        .routes
        .lock()
        .unwrap()
        .iter()
        .find(|route| method_matches(route, &method) && path_matches(route, &path))
        .cloned();

    match route {
        Some(route) => {
            let content_type = if route.body.trim_start().starts_with('{')
                || route.body.trim_start().starts_with('[')
            {
                "application/json"
            } else {
                "text/plain"
            };

            HttpResponse::build(
                actix_web::http::StatusCode::from_u16(route.status)
                    .unwrap_or(actix_web::http::StatusCode::OK),
            )
            .append_header(("Content-Type", content_type))
            .body(route.body)
        }
        None => HttpResponse::NotFound().json(serde_json::json!({
            "error": "No mock route matched.",
            "method": method,
            "path": path
        })),
    }
}

fn method_matches(route: &MockRoute, method: &str) -> bool {
    route.method.trim().eq_ignore_ascii_case(method)
}

fn path_matches(route: &MockRoute, path: &str) -> bool {
    normalize_path(&route.path) == normalize_path(path)
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed == "/" {
        return "/".to_string();
    }
    trimmed.trim_end_matches('/').to_string()
}

fn parse_headers(req: &HttpRequest) -> HashMap<String, String> {
    req.headers()
        .iter()
        .filter_map(|(key, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (key.to_string().to_lowercase(), value.to_string()))
        })
        .collect()
}
