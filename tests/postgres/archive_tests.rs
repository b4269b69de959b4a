//! Archiving against `PostgreSQL`.

use super::helpers::{BoxError, PreparedStore, WO_24113, prepared_store, resolution};
use qualidesk::error::ErrorKind;
use qualidesk::ticket::{
    domain::{TicketStatus, UserId},
    ports::TicketRepository,
    services::CreateTicketRequest,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn archive_moves_ticket_and_history(
    #[future] prepared_store: Result<Option<PreparedStore>, BoxError>,
) -> Result<(), BoxError> {
    let Some(store) = prepared_store.await? else {
        return Ok(());
    };
    let id = store
        .tickets
        .create(CreateTicketRequest::new(WO_24113, "Pitting"), None)
        .await?
        .ticket
        .id();
    store
        .tickets
        .transition(id, TicketStatus::Closed, &resolution("Blasted"), None)
        .await?;
    store.tickets.add_note(id, "Customer informed", None).await?;

    let receipt = store.tickets.archive(id, Some(UserId::new(7))).await?;
    let active = store.repository.find_by_id(id).await?;
    let archived = store.tickets.find_archived(id).await?;
    let cycles = store.repository.closure_cycles(id).await?;

    assert_eq!(receipt.id, id);
    assert!(active.is_none());
    assert!(cycles.is_empty());
    assert_eq!(archived.ticket.quality_ticket_id().as_str(), "24113-001");
    assert_eq!(archived.closure_history.len(), 1);
    assert_eq!(archived.archived_by, Some(UserId::new(7)));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn archived_ids_are_not_reissued(
    #[future] prepared_store: Result<Option<PreparedStore>, BoxError>,
) -> Result<(), BoxError> {
    let Some(store) = prepared_store.await? else {
        return Ok(());
    };
    let mut last = None;
    for description in ["One", "Two"] {
        last = Some(
            store
                .tickets
                .create(CreateTicketRequest::new(WO_24113, description), None)
                .await?
                .ticket
                .id(),
        );
    }
    let newest = last.ok_or("no ticket created")?;
    store.tickets.archive(newest, None).await?;

    let next = store
        .tickets
        .create(CreateTicketRequest::new(WO_24113, "Three"), None)
        .await?;

    assert_eq!(next.ticket.quality_ticket_id().as_str(), "24113-003");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn archiving_twice_is_not_found(
    #[future] prepared_store: Result<Option<PreparedStore>, BoxError>,
) -> Result<(), BoxError> {
    let Some(store) = prepared_store.await? else {
        return Ok(());
    };
    let id = store
        .tickets
        .create(CreateTicketRequest::new(WO_24113, "Scale"), None)
        .await?
        .ticket
        .id();
    store.tickets.archive(id, None).await?;

    let second = store
        .tickets
        .archive(id, None)
        .await
        .expect_err("second archive should fail");

    assert_eq!(second.kind(), ErrorKind::NotFound);
    Ok(())
}
