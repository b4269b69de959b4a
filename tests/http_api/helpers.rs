//! Shared helpers for HTTP API integration tests.

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use qualidesk::attachment::adapters::InMemoryBlobStore;
use qualidesk::audit::adapters::TracingAuditSink;
use qualidesk::auth::{Identity, Role, adapters::StaticTokenProvider};
use qualidesk::http::{AppComponents, AppState, router};
use qualidesk::notify::TicketNotifier;
use qualidesk::ticket::{
    adapters::memory::InMemoryTicketRepository,
    domain::{UserId, WorkOrder, WorkOrderId},
};
use rstest::fixture;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Token resolving to a viewer.
pub const VIEWER: &str = "viewer-token";
/// Token resolving to an editor.
pub const EDITOR: &str = "editor-token";
/// Token resolving to an admin.
pub const ADMIN: &str = "admin-token";

/// User behind [`EDITOR`].
pub const EDITOR_ID: i64 = 2;

/// Work order seeded with number `24113`.
pub const WO_24113: i64 = 1;
/// Work order seeded with number `W`.
pub const WO_W: i64 = 2;

/// Router plus the state it was built from.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

/// Response status with its decoded body.
pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Builds the application over seeded in-memory stores.
#[fixture]
pub fn app() -> TestApp {
    let repository = InMemoryTicketRepository::new();
    for (id, number) in [(WO_24113, "24113"), (WO_W, "W")] {
        repository
            .insert_work_order(WorkOrder::new(WorkOrderId::new(id), number))
            .expect("seed work order");
    }
    let tokens = StaticTokenProvider::new()
        .with_token(VIEWER, Identity::new(UserId::new(1), Role::Viewer))
        .with_token(EDITOR, Identity::new(UserId::new(EDITOR_ID), Role::Editor))
        .with_token(ADMIN, Identity::new(UserId::new(3), Role::Admin));
    for identity in tokens.identities() {
        repository.insert_user(identity.user_id).expect("seed user");
    }

    let state = AppState::new(AppComponents {
        repository: Arc::new(repository),
        blobs: Arc::new(InMemoryBlobStore::new()),
        identities: Arc::new(tokens),
        audit: Arc::new(TracingAuditSink),
        notifier: TicketNotifier::default(),
    });
    TestApp {
        router: router(state.clone()),
        state,
    }
}

impl TestApp {
    /// Sends a request with an optional bearer token and JSON body.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Reply {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {value}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request should build");
        self.dispatch(request).await
    }

    /// Sends a prepared request.
    pub async fn dispatch(&self, request: Request<Body>) -> Reply {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body should be readable")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        Reply {
            status,
            headers,
            body,
        }
    }

    /// Creates a ticket as the editor and returns its JSON.
    pub async fn create_ticket(&self, work_order_id: i64, description: &str) -> Value {
        let reply = self
            .send(
                Method::POST,
                "/tickets",
                Some(EDITOR),
                Some(serde_json::json!({
                    "workOrderId": work_order_id,
                    "description": description,
                })),
            )
            .await;
        assert_eq!(reply.status, StatusCode::CREATED, "create failed: {}", reply.body);
        reply.body
    }
}

/// Returns the internal id of a ticket JSON value.
pub fn ticket_id(ticket: &Value) -> i64 {
    ticket["id"].as_i64().expect("ticket should have an id")
}
