//! Conversions between Diesel rows and ticket domain values.

use super::models::{
    ArchivedTicketRow, ClosureRow, FileRow, NewClosureRow, NewTicketRow, NoteRow,
    TicketChangeset, TicketRow, WorkOrderRow,
};
use crate::ticket::{
    domain::{
        ArchivedTicket, AttachmentKey, Classification, ClosureCycle, DivisionId, FileAttachment,
        LaborDepartmentId, NonconformanceTypeId, Note, NoteId, PersistedTicketData,
        QualityTicketId, Resolution, SequenceId, Ticket, TicketDraft, TicketId, TicketStatus,
        UnitId, UserId, WorkOrder, WorkOrderId,
    },
    ports::{TicketRepositoryError, TicketRepositoryResult},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

pub(super) fn draft_to_new_row(draft: &TicketDraft, quality_id: &QualityTicketId) -> NewTicketRow {
    let classification = draft.classification();
    NewTicketRow {
        quality_ticket_id: quality_id.as_str().to_owned(),
        work_order_id: draft.work_order_id().value(),
        division_id: classification.division_id.map(DivisionId::value),
        unit_id: classification.unit_id.map(UnitId::value),
        sequence_id: classification.sequence_id.map(SequenceId::value),
        labor_department_id: classification
            .labor_department_id
            .map(LaborDepartmentId::value),
        nonconformance_type_id: classification
            .nonconformance_type_id
            .map(NonconformanceTypeId::value),
        drawing_number: classification.drawing_number.clone(),
        description: draft.description().to_owned(),
        status: TicketStatus::Open.code(),
        assigned_user_id: draft.assignee().map(UserId::value),
        initiator_id: draft.initiator().map(UserId::value),
        opened_at: draft.opened_at(),
        updated_at: draft.opened_at(),
    }
}

pub(super) fn ticket_to_changeset(ticket: &Ticket) -> TicketChangeset {
    let classification = ticket.classification();
    let resolution = ticket.resolution();
    TicketChangeset {
        work_order_id: ticket.work_order_id().value(),
        division_id: classification.division_id.map(DivisionId::value),
        unit_id: classification.unit_id.map(UnitId::value),
        sequence_id: classification.sequence_id.map(SequenceId::value),
        labor_department_id: classification
            .labor_department_id
            .map(LaborDepartmentId::value),
        nonconformance_type_id: classification
            .nonconformance_type_id
            .map(NonconformanceTypeId::value),
        drawing_number: classification.drawing_number.clone(),
        description: ticket.description().to_owned(),
        status: ticket.status().code(),
        assigned_user_id: ticket.assignee().map(UserId::value),
        corrective_action: resolution.map(|value| value.corrective_action().to_owned()),
        materials_used: resolution.map(|value| value.materials_used().to_owned()),
        estimated_labor_hours: resolution.map(Resolution::estimated_labor_hours),
        closed_at: ticket.closed_at(),
        reopened_at: ticket.reopened_at(),
        updated_at: ticket.updated_at(),
    }
}

pub(super) fn closure_to_new_row(cycle: &ClosureCycle) -> NewClosureRow {
    NewClosureRow {
        ticket_id: cycle.ticket_id.value(),
        cycle_started_at: cycle.cycle_started_at,
        closed_at: cycle.closed_at,
        corrective_action: cycle.resolution.corrective_action().to_owned(),
        materials_used: cycle.resolution.materials_used().to_owned(),
        estimated_labor_hours: cycle.resolution.estimated_labor_hours(),
        closed_by: cycle.closed_by.map(UserId::value),
    }
}

pub(super) fn row_to_closure(row: ClosureRow) -> ClosureCycle {
    ClosureCycle {
        ticket_id: TicketId::new(row.ticket_id),
        cycle_started_at: row.cycle_started_at,
        closed_at: row.closed_at,
        resolution: Resolution::from_persisted(
            row.corrective_action,
            row.materials_used,
            row.estimated_labor_hours,
        ),
        closed_by: row.closed_by.map(UserId::new),
    }
}

pub(super) fn row_to_work_order(row: WorkOrderRow) -> WorkOrder {
    WorkOrder::new(WorkOrderId::new(row.id), row.number)
}

pub(super) fn row_to_note(row: NoteRow) -> Note {
    Note {
        id: NoteId::new(row.id),
        ticket_id: TicketId::new(row.ticket_id),
        author: row.author_id.map(UserId::new),
        body: row.body,
        created_at: row.created_at,
    }
}

pub(super) fn attachment_to_row(attachment: &FileAttachment) -> TicketRepositoryResult<FileRow> {
    Ok(FileRow {
        key: attachment.key.as_str().to_owned(),
        ticket_id: attachment.ticket_id.value(),
        file_name: attachment.file_name.clone(),
        content_type: attachment.content_type.clone(),
        size_bytes: i64::try_from(attachment.size_bytes)
            .map_err(TicketRepositoryError::persistence)?,
        sha256: attachment.sha256.clone(),
        uploaded_at: attachment.uploaded_at,
        uploaded_by: attachment.uploaded_by.map(UserId::value),
    })
}

pub(super) fn row_to_attachment(row: FileRow) -> TicketRepositoryResult<FileAttachment> {
    Ok(FileAttachment {
        key: AttachmentKey::new(row.key).map_err(TicketRepositoryError::persistence)?,
        ticket_id: TicketId::new(row.ticket_id),
        file_name: row.file_name,
        content_type: row.content_type,
        size_bytes: u64::try_from(row.size_bytes).map_err(TicketRepositoryError::persistence)?,
        sha256: row.sha256,
        uploaded_at: row.uploaded_at,
        uploaded_by: row.uploaded_by.map(UserId::new),
    })
}

/// Column values shared by the active and archived ticket tables.
struct TicketColumns {
    id: i64,
    quality_ticket_id: String,
    work_order_id: i64,
    division_id: Option<i64>,
    unit_id: Option<i64>,
    sequence_id: Option<i64>,
    labor_department_id: Option<i64>,
    nonconformance_type_id: Option<i64>,
    drawing_number: Option<String>,
    description: String,
    status: i16,
    assigned_user_id: Option<i64>,
    initiator_id: Option<i64>,
    corrective_action: Option<String>,
    materials_used: Option<String>,
    estimated_labor_hours: Option<Decimal>,
    opened_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
    reopened_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
}

fn columns_to_ticket(columns: TicketColumns) -> TicketRepositoryResult<Ticket> {
    let quality_ticket_id = QualityTicketId::parse(columns.quality_ticket_id)
        .map_err(TicketRepositoryError::persistence)?;
    let status = TicketStatus::try_from(columns.status).map_err(TicketRepositoryError::persistence)?;
    let resolution = match (
        columns.corrective_action,
        columns.materials_used,
        columns.estimated_labor_hours,
    ) {
        (Some(action), Some(materials), Some(hours)) => {
            Some(Resolution::from_persisted(action, materials, hours))
        }
        _ => None,
    };

    Ok(Ticket::from_persisted(PersistedTicketData {
        id: TicketId::new(columns.id),
        quality_ticket_id,
        work_order_id: WorkOrderId::new(columns.work_order_id),
        classification: Classification {
            division_id: columns.division_id.map(DivisionId::new),
            unit_id: columns.unit_id.map(UnitId::new),
            sequence_id: columns.sequence_id.map(SequenceId::new),
            labor_department_id: columns.labor_department_id.map(LaborDepartmentId::new),
            nonconformance_type_id: columns.nonconformance_type_id.map(NonconformanceTypeId::new),
            drawing_number: columns.drawing_number,
        },
        description: columns.description,
        status,
        assignee: columns.assigned_user_id.map(UserId::new),
        initiator: columns.initiator_id.map(UserId::new),
        resolution,
        opened_at: columns.opened_at,
        closed_at: columns.closed_at,
        reopened_at: columns.reopened_at,
        updated_at: columns.updated_at,
    }))
}

pub(super) fn row_to_ticket(row: TicketRow) -> TicketRepositoryResult<Ticket> {
    columns_to_ticket(TicketColumns {
        id: row.id,
        quality_ticket_id: row.quality_ticket_id,
        work_order_id: row.work_order_id,
        division_id: row.division_id,
        unit_id: row.unit_id,
        sequence_id: row.sequence_id,
        labor_department_id: row.labor_department_id,
        nonconformance_type_id: row.nonconformance_type_id,
        drawing_number: row.drawing_number,
        description: row.description,
        status: row.status,
        assigned_user_id: row.assigned_user_id,
        initiator_id: row.initiator_id,
        corrective_action: row.corrective_action,
        materials_used: row.materials_used,
        estimated_labor_hours: row.estimated_labor_hours,
        opened_at: row.opened_at,
        closed_at: row.closed_at,
        reopened_at: row.reopened_at,
        updated_at: row.updated_at,
    })
}

pub(super) fn to_archived_row(
    row: TicketRow,
    history: &[ClosureCycle],
    archived_at: DateTime<Utc>,
    archived_by: Option<UserId>,
) -> TicketRepositoryResult<ArchivedTicketRow> {
    let closure_history =
        serde_json::to_value(history).map_err(TicketRepositoryError::persistence)?;
    Ok(ArchivedTicketRow {
        id: row.id,
        quality_ticket_id: row.quality_ticket_id,
        work_order_id: row.work_order_id,
        division_id: row.division_id,
        unit_id: row.unit_id,
        sequence_id: row.sequence_id,
        labor_department_id: row.labor_department_id,
        nonconformance_type_id: row.nonconformance_type_id,
        drawing_number: row.drawing_number,
        description: row.description,
        status: row.status,
        assigned_user_id: row.assigned_user_id,
        initiator_id: row.initiator_id,
        corrective_action: row.corrective_action,
        materials_used: row.materials_used,
        estimated_labor_hours: row.estimated_labor_hours,
        opened_at: row.opened_at,
        closed_at: row.closed_at,
        reopened_at: row.reopened_at,
        updated_at: row.updated_at,
        closure_history,
        archived_at,
        archived_by: archived_by.map(UserId::value),
    })
}

pub(super) fn archived_row_to_domain(
    row: ArchivedTicketRow,
) -> TicketRepositoryResult<ArchivedTicket> {
    let closure_history = serde_json::from_value::<Vec<ClosureCycle>>(row.closure_history)
        .map_err(TicketRepositoryError::persistence)?;
    let ticket = columns_to_ticket(TicketColumns {
        id: row.id,
        quality_ticket_id: row.quality_ticket_id,
        work_order_id: row.work_order_id,
        division_id: row.division_id,
        unit_id: row.unit_id,
        sequence_id: row.sequence_id,
        labor_department_id: row.labor_department_id,
        nonconformance_type_id: row.nonconformance_type_id,
        drawing_number: row.drawing_number,
        description: row.description,
        status: row.status,
        assigned_user_id: row.assigned_user_id,
        initiator_id: row.initiator_id,
        corrective_action: row.corrective_action,
        materials_used: row.materials_used,
        estimated_labor_hours: row.estimated_labor_hours,
        opened_at: row.opened_at,
        closed_at: row.closed_at,
        reopened_at: row.reopened_at,
        updated_at: row.updated_at,
    })?;

    Ok(ArchivedTicket {
        ticket,
        closure_history,
        archived_at: row.archived_at,
        archived_by: row.archived_by.map(UserId::new),
    })
}
