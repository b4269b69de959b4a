//! Diesel row models for ticket persistence.

use super::schema::{
    archived_tickets, ticket_closures, ticket_files, ticket_notes, tickets, work_orders,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde_json::Value;

/// Query result row for active tickets.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tickets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TicketRow {
    pub id: i64,
    pub quality_ticket_id: String,
    pub work_order_id: i64,
    pub division_id: Option<i64>,
    pub unit_id: Option<i64>,
    pub sequence_id: Option<i64>,
    pub labor_department_id: Option<i64>,
    pub nonconformance_type_id: Option<i64>,
    pub drawing_number: Option<String>,
    pub description: String,
    pub status: i16,
    pub assigned_user_id: Option<i64>,
    pub initiator_id: Option<i64>,
    pub corrective_action: Option<String>,
    pub materials_used: Option<String>,
    pub estimated_labor_hours: Option<Decimal>,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub reopened_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Insert model for new tickets; the id comes from the sequence.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tickets)]
pub struct NewTicketRow {
    pub quality_ticket_id: String,
    pub work_order_id: i64,
    pub division_id: Option<i64>,
    pub unit_id: Option<i64>,
    pub sequence_id: Option<i64>,
    pub labor_department_id: Option<i64>,
    pub nonconformance_type_id: Option<i64>,
    pub drawing_number: Option<String>,
    pub description: String,
    pub status: i16,
    pub assigned_user_id: Option<i64>,
    pub initiator_id: Option<i64>,
    pub opened_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset written by `save`.
///
/// `treat_none_as_null` makes clearing a field an explicit `NULL` write.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tickets)]
#[diesel(treat_none_as_null = true)]
pub struct TicketChangeset {
    pub work_order_id: i64,
    pub division_id: Option<i64>,
    pub unit_id: Option<i64>,
    pub sequence_id: Option<i64>,
    pub labor_department_id: Option<i64>,
    pub nonconformance_type_id: Option<i64>,
    pub drawing_number: Option<String>,
    pub description: String,
    pub status: i16,
    pub assigned_user_id: Option<i64>,
    pub corrective_action: Option<String>,
    pub materials_used: Option<String>,
    pub estimated_labor_hours: Option<Decimal>,
    pub closed_at: Option<DateTime<Utc>>,
    pub reopened_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Work order row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = work_orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WorkOrderRow {
    pub id: i64,
    pub number: String,
}

/// Closure cycle row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ticket_closures)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ClosureRow {
    pub id: i64,
    pub ticket_id: i64,
    pub cycle_started_at: DateTime<Utc>,
    pub closed_at: DateTime<Utc>,
    pub corrective_action: String,
    pub materials_used: String,
    pub estimated_labor_hours: Decimal,
    pub closed_by: Option<i64>,
}

/// Insert model for closure cycles.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ticket_closures)]
pub struct NewClosureRow {
    pub ticket_id: i64,
    pub cycle_started_at: DateTime<Utc>,
    pub closed_at: DateTime<Utc>,
    pub corrective_action: String,
    pub materials_used: String,
    pub estimated_labor_hours: Decimal,
    pub closed_by: Option<i64>,
}

/// Note row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ticket_notes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NoteRow {
    pub id: i64,
    pub ticket_id: i64,
    pub author_id: Option<i64>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Insert model for notes.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ticket_notes)]
pub struct NewNoteRow {
    pub ticket_id: i64,
    pub author_id: Option<i64>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Attachment metadata row, used for both reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = ticket_files)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FileRow {
    pub key: String,
    pub ticket_id: i64,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub sha256: String,
    pub uploaded_at: DateTime<Utc>,
    pub uploaded_by: Option<i64>,
}

/// Archived ticket row, used for both reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = archived_tickets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ArchivedTicketRow {
    pub id: i64,
    pub quality_ticket_id: String,
    pub work_order_id: i64,
    pub division_id: Option<i64>,
    pub unit_id: Option<i64>,
    pub sequence_id: Option<i64>,
    pub labor_department_id: Option<i64>,
    pub nonconformance_type_id: Option<i64>,
    pub drawing_number: Option<String>,
    pub description: String,
    pub status: i16,
    pub assigned_user_id: Option<i64>,
    pub initiator_id: Option<i64>,
    pub corrective_action: Option<String>,
    pub materials_used: Option<String>,
    pub estimated_labor_hours: Option<Decimal>,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub reopened_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    pub closure_history: Value,
    pub archived_at: DateTime<Utc>,
    pub archived_by: Option<i64>,
}

/// Aggregate row of the work order summary query.
#[derive(Debug, Clone, QueryableByName)]
pub struct SummaryRow {
    #[diesel(sql_type = diesel::sql_types::Int8)]
    pub work_order_id: i64,
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub work_order_number: String,
    #[diesel(sql_type = diesel::sql_types::Int8)]
    pub open_count: i64,
}
