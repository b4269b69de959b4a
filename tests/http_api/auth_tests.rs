//! Authentication and role checks at the HTTP edge.

use super::helpers::{ADMIN, EDITOR, TestApp, VIEWER, WO_24113, app};
use axum::http::{Method, StatusCode};
use rstest::rstest;
use serde_json::json;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn health_check_needs_no_credentials(app: TestApp) {
    let reply = app.send(Method::GET, "/healthz", None, None).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, json!("ok"));
}

#[rstest]
#[case::missing(None)]
#[case::unknown(Some("not-a-token"))]
#[tokio::test(flavor = "multi_thread")]
async fn requests_without_a_valid_token_are_unauthorized(
    app: TestApp,
    #[case] token: Option<&str>,
) {
    let reply = app.send(Method::GET, "/tickets", token, None).await;

    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert!(reply.body["message"].is_string());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn viewers_can_read_but_not_create(app: TestApp) {
    let listed = app.send(Method::GET, "/tickets", Some(VIEWER), None).await;
    let created = app
        .send(
            Method::POST,
            "/tickets",
            Some(VIEWER),
            Some(json!({ "workOrderId": WO_24113, "description": "Burr" })),
        )
        .await;

    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body, json!([]));
    assert_eq!(created.status, StatusCode::FORBIDDEN);
}

#[rstest]
#[case::viewer(VIEWER, StatusCode::FORBIDDEN)]
#[case::editor(EDITOR, StatusCode::FORBIDDEN)]
#[case::admin(ADMIN, StatusCode::OK)]
#[tokio::test(flavor = "multi_thread")]
async fn only_admins_archive_tickets(
    app: TestApp,
    #[case] token: &str,
    #[case] expected: StatusCode,
) {
    let ticket = app.create_ticket(WO_24113, "Scratched housing").await;
    let uri = format!("/tickets/{}", ticket["id"]);

    let reply = app.send(Method::DELETE, &uri, Some(token), None).await;

    assert_eq!(reply.status, expected);
}
