//! Work order summary queries against `PostgreSQL`.

use super::helpers::{BoxError, PreparedStore, WO_24113, WO_W, prepared_store, resolution};
use qualidesk::ticket::{
    domain::{StatusFilter, TicketStatus, WorkOrderSearch},
    services::CreateTicketRequest,
};
use rstest::rstest;

async fn populate(store: &PreparedStore) -> Result<(), BoxError> {
    for (work_order, description) in [(WO_24113, "A"), (WO_24113, "B"), (WO_W, "C")] {
        store
            .tickets
            .create(CreateTicketRequest::new(work_order, description), None)
            .await?;
    }
    let closed = store
        .tickets
        .create(CreateTicketRequest::new(WO_W, "D"), None)
        .await?
        .ticket
        .id();
    store
        .tickets
        .transition(closed, TicketStatus::Closed, &resolution("Filed"), None)
        .await?;
    Ok(())
}

#[rstest]
#[case::actionable(None, None, vec![("24113", 2), ("W", 1)])]
#[case::closed(Some("2"), None, vec![("W", 1)])]
#[case::everything(Some("0,1,2"), None, vec![("24113", 2), ("W", 2)])]
#[case::search(None, Some("w"), vec![("W", 1)])]
#[tokio::test(flavor = "multi_thread")]
async fn summary_groups_matching_tickets(
    #[future] prepared_store: Result<Option<PreparedStore>, BoxError>,
    #[case] status: Option<&str>,
    #[case] search: Option<&str>,
    #[case] expected: Vec<(&str, u64)>,
) -> Result<(), BoxError> {
    let Some(store) = prepared_store.await? else {
        return Ok(());
    };
    populate(&store).await?;

    let statuses = StatusFilter::parse(status)?;
    let term = WorkOrderSearch::new(search);
    let summary = store.work_orders.summary(&statuses, term.as_ref()).await?;
    let counts: Vec<(&str, u64)> = summary
        .iter()
        .map(|row| (row.work_order_number.as_str(), row.open_count))
        .collect();

    assert_eq!(counts, expected);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn work_order_tickets_are_filtered_by_status(
    #[future] prepared_store: Result<Option<PreparedStore>, BoxError>,
) -> Result<(), BoxError> {
    let Some(store) = prepared_store.await? else {
        return Ok(());
    };
    populate(&store).await?;

    let open = store
        .work_orders
        .work_order_tickets(WO_W, StatusFilter::default())
        .await?;
    let closed = store
        .work_orders
        .work_order_tickets(WO_W, StatusFilter::parse(Some("2"))?)
        .await?;

    assert_eq!(open.len(), 1);
    assert_eq!(closed.len(), 1);
    Ok(())
}
