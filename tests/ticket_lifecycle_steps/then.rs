//! Then steps for ticket lifecycle BDD scenarios.

use super::world::{LifecycleWorld, run_async};
use eyre::{WrapErr, ensure, eyre};
use qualidesk::error::ErrorKind;
use qualidesk::ticket::services::TicketServiceError;
use rstest_bdd_macros::then;

fn expect_failure(world: &LifecycleWorld, kind: ErrorKind) -> Result<(), eyre::Report> {
    let err = world
        .last_error
        .as_ref()
        .ok_or_else(|| eyre!("expected the request to fail"))?;
    ensure!(err.kind() == kind, "expected {kind:?}, got {err}");
    Ok(())
}

#[then(r#"the ticket's quality id is "{expected}""#)]
fn quality_id_is(world: &LifecycleWorld, expected: String) -> Result<(), eyre::Report> {
    let ticket = world
        .current
        .as_ref()
        .ok_or_else(|| eyre!("no ticket in scenario world"))?;
    ensure!(
        ticket.quality_ticket_id().as_str() == expected,
        "expected {expected}, found {}",
        ticket.quality_ticket_id()
    );
    Ok(())
}

#[then("the ticket status is {code}")]
fn ticket_status_is(world: &LifecycleWorld, code: i16) -> Result<(), eyre::Report> {
    ensure!(world.last_error.is_none(), "request failed: {:?}", world.last_error);
    let ticket = world
        .current
        .as_ref()
        .ok_or_else(|| eyre!("no ticket in scenario world"))?;
    ensure!(
        ticket.status().code() == code,
        "expected status {code}, found {}",
        ticket.status().code()
    );
    Ok(())
}

#[then("the stored ticket status is {code}")]
fn stored_status_is(world: &LifecycleWorld, code: i16) -> Result<(), eyre::Report> {
    let details = run_async(world.service.get(world.current_id()?)).wrap_err("reload ticket")?;
    ensure!(
        details.ticket.status().code() == code,
        "expected stored status {code}, found {}",
        details.ticket.status().code()
    );
    Ok(())
}

#[then("the request fails with a precondition error")]
fn fails_with_precondition(world: &LifecycleWorld) -> Result<(), eyre::Report> {
    expect_failure(world, ErrorKind::PreconditionFailed)
}

#[then("the request fails with a validation error")]
fn fails_with_validation(world: &LifecycleWorld) -> Result<(), eyre::Report> {
    expect_failure(world, ErrorKind::Validation)
}

#[then("the ticket has {count} closure cycles")]
fn closure_cycle_count(world: &LifecycleWorld, count: usize) -> Result<(), eyre::Report> {
    let cycles =
        run_async(world.service.closures(world.current_id()?)).wrap_err("load closures")?;
    ensure!(cycles.len() == count, "expected {count} cycles, found {}", cycles.len());
    Ok(())
}

#[then(r#"the newest closure's corrective action is "{expected}""#)]
fn newest_closure_action(world: &LifecycleWorld, expected: String) -> Result<(), eyre::Report> {
    let cycles =
        run_async(world.service.closures(world.current_id()?)).wrap_err("load closures")?;
    let newest = cycles.first().ok_or_else(|| eyre!("no closure cycles"))?;
    ensure!(
        newest.resolution.corrective_action() == expected,
        "newest cycle has action {:?}",
        newest.resolution.corrective_action()
    );
    Ok(())
}

#[then("the ticket is no longer active")]
fn ticket_not_active(world: &LifecycleWorld) -> Result<(), eyre::Report> {
    match run_async(world.service.get(world.current_id()?)) {
        Err(TicketServiceError::TicketNotFound(_)) => Ok(()),
        other => Err(eyre!("expected not found, got {other:?}")),
    }
}

#[then("the archive holds the ticket with {count} closure cycle")]
fn archive_holds_ticket(world: &LifecycleWorld, count: usize) -> Result<(), eyre::Report> {
    let archived = run_async(world.service.find_archived(world.current_id()?))
        .wrap_err("load archived ticket")?;
    ensure!(
        archived.closure_history.len() == count,
        "expected {count} archived cycles, found {}",
        archived.closure_history.len()
    );
    Ok(())
}

#[then(r#"a "{event}" event was published"#)]
fn event_was_published(world: &mut LifecycleWorld, event: String) -> Result<(), eyre::Report> {
    world.drain_events();
    ensure!(
        world
            .seen_events
            .iter()
            .any(|kind| kind.wire_name() == event),
        "no {event} event among {:?}",
        world.seen_events
    );
    Ok(())
}
