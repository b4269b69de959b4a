//! Attachment upload, download, and removal.

use super::helpers::{ADMIN, EDITOR, TestApp, VIEWER, WO_24113, app, ticket_id};
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use rstest::rstest;
use serde_json::json;

fn upload(ticket: i64, key: &str, content: &'static str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(format!("/tickets/{ticket}/files/{key}?fileName=inspection.txt"))
        .header(header::AUTHORIZATION, format!("Bearer {EDITOR}"))
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(content))
        .expect("request should build")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn uploaded_files_can_be_downloaded(app: TestApp) {
    let ticket = app.create_ticket(WO_24113, "Gouge on flange").await;
    let id = ticket_id(&ticket);

    let stored = app.dispatch(upload(id, "report-1.txt", "hello")).await;
    let fetched = app
        .send(Method::GET, "/files/report-1.txt", Some(VIEWER), None)
        .await;
    let details = app
        .send(Method::GET, &format!("/tickets/{id}"), Some(VIEWER), None)
        .await;

    assert_eq!(stored.status, StatusCode::CREATED, "body: {}", stored.body);
    assert_eq!(stored.body["key"], json!("report-1.txt"));
    assert_eq!(stored.body["fileName"], json!("inspection.txt"));
    assert_eq!(stored.body["sizeBytes"], json!(5));
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body, json!("hello"));
    assert_eq!(
        fetched
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("text/plain")
    );
    assert_eq!(details.body["attachments"].as_array().map(Vec::len), Some(1));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_taken_key_conflicts(app: TestApp) {
    let ticket = app.create_ticket(WO_24113, "Warped plate").await;
    let id = ticket_id(&ticket);

    app.dispatch(upload(id, "photo.jpg", "first")).await;
    let duplicate = app.dispatch(upload(id, "photo.jpg", "second")).await;
    let fetched = app
        .send(Method::GET, "/files/photo.jpg", Some(VIEWER), None)
        .await;

    assert_eq!(duplicate.status, StatusCode::CONFLICT);
    assert_eq!(fetched.body, json!("first"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unsafe_keys_are_rejected(app: TestApp) {
    let ticket = app.create_ticket(WO_24113, "Burr").await;

    let reply = app
        .dispatch(upload(ticket_id(&ticket), ".hidden", "x"))
        .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn uploads_to_unknown_tickets_are_not_found(app: TestApp) {
    let reply = app.dispatch(upload(99, "orphan.txt", "x")).await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admins_remove_files(app: TestApp) {
    let ticket = app.create_ticket(WO_24113, "Bad thread").await;
    app.dispatch(upload(ticket_id(&ticket), "gauge.csv", "1,2"))
        .await;

    let forbidden = app
        .send(Method::DELETE, "/files/gauge.csv", Some(EDITOR), None)
        .await;
    let removed = app
        .send(Method::DELETE, "/files/gauge.csv", Some(ADMIN), None)
        .await;
    let gone = app
        .send(Method::GET, "/files/gauge.csv", Some(VIEWER), None)
        .await;

    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
    assert_eq!(removed.status, StatusCode::OK);
    assert_eq!(removed.body["key"], json!("gauge.csv"));
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}
