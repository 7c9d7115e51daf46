use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::Response;
use axum::Router;

use super::upstream::gateway::{UpstreamConfig, UpstreamGateway};

#[derive(Clone, Default)]
struct StubState {
    routes: Arc<HashMap<String, (StatusCode, String)>>,
    hits: Arc<Mutex<Vec<String>>>,
}

/// Canned upstream provider served by axum on an ephemeral port.
#[derive(Default)]
pub struct StubUpstream {
    routes: HashMap<String, (StatusCode, String)>,
}

pub struct RunningStub {
    pub base_url: String,
    hits: Arc<Mutex<Vec<String>>>,
    server_task: tokio::task::JoinHandle<()>,
}

impl StubUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn json(mut self, path: &str, body: impl Into<String>) -> Self {
        self.routes
            .insert(path.to_string(), (StatusCode::OK, body.into()));
        self
    }

    pub fn status(mut self, path: &str, status: StatusCode) -> Self {
        self.routes
            .insert(path.to_string(), (status, "upstream failure".to_string()));
        self
    }

    pub async fn spawn(self) -> RunningStub {
        let hits = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            routes: Arc::new(self.routes),
            hits: hits.clone(),
        };
        let app = Router::new().fallback(stub_handler).with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let address = listener.local_addr().expect("local addr should exist");
        let server_task = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server should run");
        });
        RunningStub {
            base_url: format!("http://{address}/v3"),
            hits,
            server_task,
        }
    }
}

impl RunningStub {
    /// Paths (with query) requested so far, in arrival order.
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().expect("hits lock").clone()
    }

    pub fn gateway(&self) -> UpstreamGateway {
        UpstreamGateway::new(&UpstreamConfig {
            base_url: self.base_url.parse().expect("stub base url must parse"),
            list_limit: 50,
            timeout: Duration::from_secs(2),
        })
        .expect("gateway should build")
    }
}

impl Drop for RunningStub {
    fn drop(&mut self) {
        self.server_task.abort();
    }
}

async fn stub_handler(State(state): State<StubState>, uri: Uri) -> Response {
    let recorded = uri
        .path_and_query()
        .map(|value| value.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    state.hits.lock().expect("hits lock").push(recorded);

    let (status, body) = state
        .routes
        .get(uri.path())
        .cloned()
        .unwrap_or((StatusCode::NOT_FOUND, "not found".to_string()));
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response.headers_mut().insert(
        reqwest::header::CONTENT_TYPE,
        "application/json".parse().expect("header must parse"),
    );
    response
}

pub fn resource_json(id: i64, title: &str) -> String {
    format!(
        r#"{{"id":{id},"title":"{title}","url":"https://example.com/{id}","imageUrl":"","newsSite":"Stub","summary":"","publishedAt":"2024-01-01T00:00:00.000Z","updatedAt":"2024-01-01T00:00:00.000Z"}}"#
    )
}

pub fn resource_list_json(items: &[(i64, &str)]) -> String {
    let body: Vec<String> = items
        .iter()
        .map(|(id, title)| resource_json(*id, title))
        .collect();
    format!("[{}]", body.join(","))
}
