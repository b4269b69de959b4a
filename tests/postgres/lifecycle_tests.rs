//! Ticket creation, transitions, and closure cycles against `PostgreSQL`.

use super::helpers::{BoxError, PreparedStore, WO_24113, WO_W, prepared_store, resolution};
use qualidesk::error::ErrorKind;
use qualidesk::ticket::{
    domain::{ClosureFields, TicketStatus, UserId},
    ports::TicketRepository,
    services::{CreateTicketRequest, UpdateTicketRequest},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn quality_ids_count_per_work_order(
    #[future] prepared_store: Result<Option<PreparedStore>, BoxError>,
) -> Result<(), BoxError> {
    let Some(store) = prepared_store.await? else {
        return Ok(());
    };

    let mut ids = Vec::new();
    for (work_order, description) in [(WO_24113, "A"), (WO_24113, "B"), (WO_W, "C")] {
        let details = store
            .tickets
            .create(CreateTicketRequest::new(work_order, description), None)
            .await?;
        ids.push(details.ticket.quality_ticket_id().to_string());
    }

    assert_eq!(ids, ["24113-001", "24113-002", "W-001"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_creates_never_share_an_id(
    #[future] prepared_store: Result<Option<PreparedStore>, BoxError>,
) -> Result<(), BoxError> {
    let Some(store) = prepared_store.await? else {
        return Ok(());
    };

    let creates = (0..8).map(|index| {
        store.tickets.create(
            CreateTicketRequest::new(WO_W, format!("Concurrent {index}")),
            None,
        )
    });
    let created = futures_util::future::try_join_all(creates).await?;
    let mut ids: Vec<String> = created
        .iter()
        .map(|details| details.ticket.quality_ticket_id().to_string())
        .collect();
    ids.sort();
    ids.dedup();

    assert_eq!(ids.len(), 8);
    assert_eq!(ids.first().map(String::as_str), Some("W-001"));
    assert_eq!(ids.last().map(String::as_str), Some("W-008"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_references_are_rejected(
    #[future] prepared_store: Result<Option<PreparedStore>, BoxError>,
) -> Result<(), BoxError> {
    let Some(store) = prepared_store.await? else {
        return Ok(());
    };

    let unknown_user = store
        .tickets
        .create(
            CreateTicketRequest::new(WO_24113, "Dent").with_assignee(UserId::new(999)),
            None,
        )
        .await
        .expect_err("unknown assignee should fail");
    let unknown_work_order = store
        .tickets
        .create(
            CreateTicketRequest::new(qualidesk::ticket::domain::WorkOrderId::new(404), "Dent"),
            None,
        )
        .await
        .expect_err("unknown work order should fail");

    assert_eq!(unknown_user.kind(), ErrorKind::Validation);
    assert_eq!(unknown_work_order.kind(), ErrorKind::NotFound);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reopened_tickets_keep_every_closure_cycle(
    #[future] prepared_store: Result<Option<PreparedStore>, BoxError>,
) -> Result<(), BoxError> {
    let Some(store) = prepared_store.await? else {
        return Ok(());
    };
    let id = store
        .tickets
        .create(CreateTicketRequest::new(WO_24113, "Crack"), None)
        .await?
        .ticket
        .id();
    let actor = Some(UserId::new(7));

    store
        .tickets
        .transition(id, TicketStatus::Closed, &resolution("Welded"), actor)
        .await?;
    let reopened = store
        .tickets
        .transition(id, TicketStatus::Open, &ClosureFields::default(), actor)
        .await?;
    store
        .tickets
        .transition(id, TicketStatus::Closed, &resolution("Replaced"), actor)
        .await?;
    let cycles = store.repository.closure_cycles(id).await?;

    assert!(reopened.resolution().is_none());
    assert!(reopened.reopened_at().is_some());
    let [newest, oldest] = cycles.as_slice() else {
        panic!("expected two cycles, found {}", cycles.len());
    };
    assert_eq!(newest.resolution.corrective_action(), "Replaced");
    assert_eq!(oldest.resolution.corrective_action(), "Welded");
    assert_eq!(newest.closed_by, actor);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assigning_and_starting_persists_together(
    #[future] prepared_store: Result<Option<PreparedStore>, BoxError>,
) -> Result<(), BoxError> {
    let Some(store) = prepared_store.await? else {
        return Ok(());
    };
    let id = store
        .tickets
        .create(CreateTicketRequest::new(WO_24113, "Loose bolt"), None)
        .await?
        .ticket
        .id();

    let rejected = store
        .tickets
        .transition(id, TicketStatus::InProgress, &ClosureFields::default(), None)
        .await
        .expect_err("unassigned start should fail");
    let edit = qualidesk::ticket::domain::TicketEdit {
        assignee: Some(Some(UserId::new(8))),
        ..Default::default()
    };
    let started = store
        .tickets
        .update(
            id,
            UpdateTicketRequest::new()
                .with_edit(edit)
                .with_status(TicketStatus::InProgress),
            None,
        )
        .await?;
    let stored = store.repository.find_by_id(id).await?;

    assert_eq!(rejected.kind(), ErrorKind::PreconditionFailed);
    assert_eq!(started.ticket.status(), TicketStatus::InProgress);
    assert_eq!(
        stored.map(|ticket| (ticket.status(), ticket.assignee())),
        Some((TicketStatus::InProgress, Some(UserId::new(8))))
    );
    Ok(())
}
