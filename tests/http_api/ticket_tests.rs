//! Ticket lifecycle over the REST surface.

use super::helpers::{ADMIN, EDITOR, EDITOR_ID, TestApp, VIEWER, WO_24113, WO_W, app, ticket_id};
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use rstest::rstest;
use serde_json::{Value, json};

fn closure_body() -> Value {
    json!({
        "status": 2,
        "correctiveAction": "Reworked the weld",
        "materialsUsed": "Filler rod",
        "estimatedLaborHours": 1.5,
    })
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn creating_a_ticket_returns_its_quality_id(app: TestApp) {
    let first = app.create_ticket(WO_24113, "Porosity in weld").await;
    let second = app.create_ticket(WO_24113, "Wrong fastener").await;
    let other = app.create_ticket(WO_W, "Paint run").await;

    assert_eq!(first["qualityTicketId"], json!("24113-001"));
    assert_eq!(second["qualityTicketId"], json!("24113-002"));
    assert_eq!(other["qualityTicketId"], json!("W-001"));
    assert_eq!(first["status"], json!(0));
    assert_eq!(first["initiator"], json!(EDITOR_ID));
    assert_eq!(first["workOrder"]["number"], json!("24113"));
    assert_eq!(first["closures"], json!([]));
}

#[rstest]
#[case::blank_description(json!({ "workOrderId": WO_24113, "description": "   " }), StatusCode::BAD_REQUEST)]
#[case::unknown_work_order(json!({ "workOrderId": 404, "description": "Dent" }), StatusCode::NOT_FOUND)]
#[case::unknown_assignee(
    json!({ "workOrderId": WO_24113, "description": "Dent", "assignee": 999 }),
    StatusCode::BAD_REQUEST
)]
#[case::missing_description(json!({ "workOrderId": WO_24113 }), StatusCode::BAD_REQUEST)]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_creates_are_rejected(
    app: TestApp,
    #[case] body: Value,
    #[case] expected: StatusCode,
) {
    let reply = app
        .send(Method::POST, "/tickets", Some(EDITOR), Some(body))
        .await;

    assert_eq!(reply.status, expected, "body: {}", reply.body);
    assert!(reply.body["message"].is_string());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_json_is_a_bad_request(app: TestApp) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/tickets")
        .header(header::AUTHORIZATION, format!("Bearer {EDITOR}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"workOrderId\": "))
        .expect("request should build");

    let reply = app.dispatch(request).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_ticket_is_not_found(app: TestApp) {
    let reply = app.send(Method::GET, "/tickets/77", Some(VIEWER), None).await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn starting_work_requires_an_assignee(app: TestApp) {
    let ticket = app.create_ticket(WO_24113, "Misaligned bore").await;
    let uri = format!("/tickets/{}", ticket_id(&ticket));

    let rejected = app
        .send(Method::PUT, &uri, Some(EDITOR), Some(json!({ "status": 1 })))
        .await;
    let accepted = app
        .send(
            Method::PUT,
            &uri,
            Some(EDITOR),
            Some(json!({ "status": 1, "assignee": EDITOR_ID })),
        )
        .await;

    assert_eq!(rejected.status, StatusCode::BAD_REQUEST);
    assert_eq!(accepted.status, StatusCode::OK, "body: {}", accepted.body);
    assert_eq!(accepted.body["status"], json!(1));
    assert_eq!(accepted.body["assignee"], json!(EDITOR_ID));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn closing_requires_every_closure_field(app: TestApp) {
    let ticket = app.create_ticket(WO_24113, "Cracked casting").await;
    let uri = format!("/tickets/{}", ticket_id(&ticket));

    let reply = app
        .send(
            Method::PUT,
            &uri,
            Some(EDITOR),
            Some(json!({ "status": 2, "correctiveAction": "Replaced" })),
        )
        .await;
    let reloaded = app.send(Method::GET, &uri, Some(VIEWER), None).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reloaded.body["status"], json!(0));
}

#[rstest]
#[case(json!(1.555))]
#[case(json!(123_456_789))]
#[tokio::test(flavor = "multi_thread")]
async fn labor_hours_beyond_two_decimals_or_eight_digits_are_rejected(
    app: TestApp,
    #[case] hours: Value,
) {
    let ticket = app.create_ticket(WO_24113, "Porous casting").await;
    let uri = format!("/tickets/{}", ticket_id(&ticket));
    let mut body = closure_body();
    body["estimatedLaborHours"] = hours;

    let reply = app.send(Method::PUT, &uri, Some(EDITOR), Some(body)).await;
    let reloaded = app.send(Method::GET, &uri, Some(VIEWER), None).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST, "body: {}", reply.body);
    assert_eq!(reloaded.body["status"], json!(0));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn each_close_appends_a_closure_cycle(app: TestApp) {
    let ticket = app.create_ticket(WO_24113, "Loose rivet").await;
    let uri = format!("/tickets/{}", ticket_id(&ticket));
    let closures_uri = format!("{uri}/closures");

    let closed = app
        .send(Method::PUT, &uri, Some(EDITOR), Some(closure_body()))
        .await;
    let twice = app
        .send(Method::PUT, &uri, Some(EDITOR), Some(closure_body()))
        .await;
    let bare = app
        .send(Method::PUT, &uri, Some(EDITOR), Some(json!({ "status": 2 })))
        .await;
    let reopened = app
        .send(Method::PUT, &uri, Some(EDITOR), Some(json!({ "status": 0 })))
        .await;
    app.send(Method::PUT, &uri, Some(EDITOR), Some(closure_body()))
        .await;
    let cycles = app.send(Method::GET, &closures_uri, Some(VIEWER), None).await;

    assert_eq!(closed.status, StatusCode::OK, "body: {}", closed.body);
    assert_eq!(closed.body["status"], json!(2));
    assert!(closed.body["closedAt"].is_string());
    assert_eq!(twice.status, StatusCode::OK, "body: {}", twice.body);
    assert_eq!(twice.body["status"], json!(2));
    assert_eq!(bare.status, StatusCode::BAD_REQUEST);
    assert_eq!(reopened.body["status"], json!(0));
    assert!(reopened.body["reopenedAt"].is_string());
    assert_eq!(cycles.status, StatusCode::OK);
    assert_eq!(cycles.body.as_array().map(Vec::len), Some(3));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assignment_endpoint_sets_and_clears(app: TestApp) {
    let ticket = app.create_ticket(WO_24113, "Chipped edge").await;
    let uri = format!("/tickets/{}/assignee", ticket_id(&ticket));

    let assigned = app
        .send(Method::PUT, &uri, Some(EDITOR), Some(json!({ "assignee": EDITOR_ID })))
        .await;
    let cleared = app
        .send(Method::PUT, &uri, Some(EDITOR), Some(json!({ "assignee": null })))
        .await;

    assert_eq!(assigned.status, StatusCode::OK);
    assert_eq!(assigned.body["assignee"], json!(EDITOR_ID));
    assert_eq!(cleared.status, StatusCode::OK);
    assert_eq!(cleared.body["assignee"], Value::Null);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn archiving_moves_the_ticket_out_of_the_active_set(app: TestApp) {
    let ticket = app.create_ticket(WO_24113, "Bent bracket").await;
    let id = ticket_id(&ticket);
    let uri = format!("/tickets/{id}");
    app.send(Method::PUT, &uri, Some(EDITOR), Some(closure_body()))
        .await;

    let receipt = app.send(Method::DELETE, &uri, Some(ADMIN), None).await;
    let active = app.send(Method::GET, &uri, Some(VIEWER), None).await;
    let archived = app
        .send(Method::GET, &format!("/archive/tickets/{id}"), Some(VIEWER), None)
        .await;
    let again = app.send(Method::DELETE, &uri, Some(ADMIN), None).await;

    assert_eq!(receipt.status, StatusCode::OK);
    assert_eq!(receipt.body["id"], json!(id));
    assert!(receipt.body["message"].is_string());
    assert_eq!(active.status, StatusCode::NOT_FOUND);
    assert_eq!(archived.status, StatusCode::OK);
    assert_eq!(archived.body["ticket"]["qualityTicketId"], json!("24113-001"));
    assert_eq!(
        archived.body["closureHistory"].as_array().map(Vec::len),
        Some(1)
    );
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn notes_are_listed_in_creation_order(app: TestApp) {
    let ticket = app.create_ticket(WO_24113, "Surface rust").await;
    let uri = format!("/tickets/{}/notes", ticket_id(&ticket));

    let first = app
        .send(Method::POST, &uri, Some(EDITOR), Some(json!({ "body": "Photographed" })))
        .await;
    app.send(Method::POST, &uri, Some(EDITOR), Some(json!({ "body": "Sent to vendor" })))
        .await;
    let blank = app
        .send(Method::POST, &uri, Some(EDITOR), Some(json!({ "body": " " })))
        .await;
    let listed = app.send(Method::GET, &uri, Some(VIEWER), None).await;

    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);
    let bodies: Vec<&str> = listed
        .body
        .as_array()
        .map(|notes| notes.iter().filter_map(|note| note["body"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(bodies, ["Photographed", "Sent to vendor"]);
}

#[rstest]
#[case::all(None, 2)]
#[case::open_only(Some("0"), 1)]
#[case::closed_only(Some("2"), 1)]
#[case::in_progress_only(Some("1"), 0)]
#[tokio::test(flavor = "multi_thread")]
async fn ticket_list_filters_by_status(
    app: TestApp,
    #[case] status: Option<&str>,
    #[case] expected: usize,
) {
    app.create_ticket(WO_24113, "Open one").await;
    let closed = app.create_ticket(WO_24113, "Closed one").await;
    app.send(
        Method::PUT,
        &format!("/tickets/{}", ticket_id(&closed)),
        Some(EDITOR),
        Some(closure_body()),
    )
    .await;
    let uri = status.map_or_else(|| "/tickets".to_owned(), |codes| format!("/tickets?status={codes}"));

    let reply = app.send(Method::GET, &uri, Some(VIEWER), None).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body.as_array().map(Vec::len), Some(expected));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_status_filter_is_a_bad_request(app: TestApp) {
    let reply = app
        .send(Method::GET, "/tickets?status=0,open", Some(VIEWER), None)
        .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}
