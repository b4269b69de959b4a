//! When steps for ticket lifecycle BDD scenarios.

use super::world::{LifecycleWorld, run_async};
use eyre::{WrapErr, eyre};
use qualidesk::ticket::domain::{ClosureFields, TicketStatus};
use qualidesk::ticket::services::CreateTicketRequest;
use rust_decimal::Decimal;
use rstest_bdd_macros::when;

#[when(r#"a ticket is filed against work order "{number}""#)]
fn file_ticket(world: &mut LifecycleWorld, number: String) -> Result<(), eyre::Report> {
    let work_order = world.work_order(&number)?;
    let result = run_async(
        world
            .service
            .create(CreateTicketRequest::new(work_order, "Misdrilled hole"), None),
    )
    .map(|details| details.ticket);
    world.record(result);
    Ok(())
}

#[when("the ticket is moved to status {code}")]
fn move_ticket(world: &mut LifecycleWorld, code: i16) -> Result<(), eyre::Report> {
    let id = world.current_id()?;
    let target = TicketStatus::try_from(code).map_err(|err| eyre!("bad status code: {err}"))?;
    let result = run_async(
        world
            .service
            .transition(id, target, &ClosureFields::default(), None),
    );
    world.record(result);
    Ok(())
}

#[when(r#"the ticket is closed with corrective action "{action}""#)]
pub fn close_ticket(world: &mut LifecycleWorld, action: String) -> Result<(), eyre::Report> {
    let id = world.current_id()?;
    let fields = ClosureFields {
        corrective_action: Some(action),
        materials_used: Some("Shop stock".to_owned()),
        estimated_labor_hours: Some(Decimal::new(25, 1)),
    };
    let result = run_async(
        world
            .service
            .transition(id, TicketStatus::Closed, &fields, None),
    );
    world.record(result);
    Ok(())
}

#[when("the ticket is archived")]
fn archive_ticket(world: &mut LifecycleWorld) -> Result<(), eyre::Report> {
    let id = world.current_id()?;
    run_async(world.service.archive(id, None)).wrap_err("archive ticket")?;
    Ok(())
}
