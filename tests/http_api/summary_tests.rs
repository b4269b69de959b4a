//! Work order summary endpoints.

use super::helpers::{EDITOR, TestApp, VIEWER, WO_24113, WO_W, app, ticket_id};
use axum::http::{Method, StatusCode};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

/// Two open tickets on `24113`, one closed ticket on `W`.
#[fixture]
async fn populated(app: TestApp) -> TestApp {
    app.create_ticket(WO_24113, "Open A").await;
    app.create_ticket(WO_24113, "Open B").await;
    let closed = app.create_ticket(WO_W, "Closed").await;
    let reply = app
        .send(
            Method::PUT,
            &format!("/tickets/{}", ticket_id(&closed)),
            Some(EDITOR),
            Some(json!({
                "status": 2,
                "correctiveAction": "Sanded",
                "materialsUsed": "Paper",
                "estimatedLaborHours": 0.5,
            })),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK, "close failed: {}", reply.body);
    app
}

fn counts(body: &Value) -> Vec<(String, u64)> {
    body.as_array()
        .map(|rows| {
            rows.iter()
                .filter_map(|row| {
                    Some((
                        row["workOrderNumber"].as_str()?.to_owned(),
                        row["openCount"].as_u64()?,
                    ))
                })
                .collect()
        })
        .unwrap_or_default()
}

#[rstest]
#[case::actionable_by_default("/work-orders-summary", vec![("24113", 2)])]
#[case::closed("/work-orders-summary?status=2", vec![("W", 1)])]
#[case::everything("/work-orders-summary?status=0,1,2", vec![("24113", 2), ("W", 1)])]
#[case::search("/work-orders-summary?search=411&status=0,2", vec![("24113", 2)])]
#[case::no_match("/work-orders-summary?search=zzz", vec![])]
#[tokio::test(flavor = "multi_thread")]
async fn summary_counts_matching_tickets(
    #[future] populated: TestApp,
    #[case] uri: &str,
    #[case] expected: Vec<(&str, u64)>,
) {
    let app = populated.await;

    let reply = app.send(Method::GET, uri, Some(VIEWER), None).await;

    assert_eq!(reply.status, StatusCode::OK);
    let expected: Vec<(String, u64)> = expected
        .into_iter()
        .map(|(number, count)| (number.to_owned(), count))
        .collect();
    assert_eq!(counts(&reply.body), expected);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn work_order_tickets_honour_the_filter(#[future] populated: TestApp) {
    let app = populated.await;

    let open = app
        .send(Method::GET, &format!("/work-orders/{WO_24113}/tickets"), Some(VIEWER), None)
        .await;
    let closed = app
        .send(Method::GET, &format!("/work-orders/{WO_W}/tickets"), Some(VIEWER), None)
        .await;
    let missing = app
        .send(Method::GET, "/work-orders/404/tickets", Some(VIEWER), None)
        .await;

    assert_eq!(open.body.as_array().map(Vec::len), Some(2));
    assert_eq!(closed.body, json!([]));
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_status_codes_are_rejected(app: TestApp) {
    let reply = app
        .send(Method::GET, "/work-orders-summary?status=7", Some(VIEWER), None)
        .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}
