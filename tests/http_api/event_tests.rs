//! Server-sent event stream.

use super::helpers::{TestApp, VIEWER, WO_24113, app};
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use qualidesk::ticket::{domain::WorkOrderId, services::CreateTicketRequest};
use rstest::rstest;
use std::time::Duration;
use tower::ServiceExt;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stream_requires_a_token(app: TestApp) {
    let reply = app.send(Method::GET, "/tickets/events", None, None).await;

    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_tickets_are_streamed_to_subscribers(app: TestApp) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(format!("/tickets/events?accessToken={VIEWER}"))
        .body(Body::empty())
        .expect("request should build");
    let response = app
        .router
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("text/event-stream")
    );
    assert_eq!(app.state.notifier.subscriber_count(), 1);

    app.state
        .tickets
        .create(
            CreateTicketRequest::new(WorkOrderId::new(WO_24113), "Streamed defect"),
            None,
        )
        .await
        .expect("create ticket");

    let mut body = response.into_body();
    let frame = tokio::time::timeout(Duration::from_secs(5), body.frame())
        .await
        .expect("event should arrive before the timeout")
        .expect("stream should yield a frame")
        .expect("frame should be readable");
    let data = frame.into_data().expect("frame should carry data");
    let text = String::from_utf8_lossy(&data);

    assert!(text.contains("event: new-ticket"), "frame: {text}");
    assert!(text.contains("24113-001"), "frame: {text}");

    drop(body);
    assert_eq!(app.state.notifier.subscriber_count(), 0);
}
