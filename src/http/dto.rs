//! Request bodies and query strings.

use crate::ticket::domain::{
    Classification, ClosureFields, DivisionId, LaborDepartmentId, NonconformanceTypeId,
    SequenceId, TicketEdit, TicketStatus, UnitId, UserId, WorkOrderId,
};
use crate::ticket::services::{CreateTicketRequest, UpdateTicketRequest};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`).
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Body of `POST /tickets`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketBody {
    work_order_id: WorkOrderId,
    description: String,
    #[serde(flatten)]
    classification: Classification,
    initiator: Option<UserId>,
    assignee: Option<UserId>,
}

impl From<CreateTicketBody> for CreateTicketRequest {
    fn from(body: CreateTicketBody) -> Self {
        let mut request = Self::new(body.work_order_id, body.description)
            .with_classification(body.classification);
        if let Some(initiator) = body.initiator {
            request = request.with_initiator(initiator);
        }
        if let Some(assignee) = body.assignee {
            request = request.with_assignee(assignee);
        }
        request
    }
}

/// Body of `PUT /tickets/{id}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateTicketBody {
    work_order_id: Option<WorkOrderId>,
    #[serde(deserialize_with = "nullable")]
    division_id: Option<Option<DivisionId>>,
    #[serde(deserialize_with = "nullable")]
    unit_id: Option<Option<UnitId>>,
    #[serde(deserialize_with = "nullable")]
    sequence_id: Option<Option<SequenceId>>,
    #[serde(deserialize_with = "nullable")]
    labor_department_id: Option<Option<LaborDepartmentId>>,
    #[serde(deserialize_with = "nullable")]
    nonconformance_type_id: Option<Option<NonconformanceTypeId>>,
    #[serde(deserialize_with = "nullable")]
    drawing_number: Option<Option<String>>,
    description: Option<String>,
    #[serde(deserialize_with = "nullable")]
    assignee: Option<Option<UserId>>,
    status: Option<TicketStatus>,
    corrective_action: Option<String>,
    materials_used: Option<String>,
    estimated_labor_hours: Option<Decimal>,
}

impl From<UpdateTicketBody> for UpdateTicketRequest {
    fn from(body: UpdateTicketBody) -> Self {
        let edit = TicketEdit {
            work_order_id: body.work_order_id,
            division_id: body.division_id,
            unit_id: body.unit_id,
            sequence_id: body.sequence_id,
            labor_department_id: body.labor_department_id,
            nonconformance_type_id: body.nonconformance_type_id,
            drawing_number: body.drawing_number,
            description: body.description,
            assignee: body.assignee,
        };
        let closure = ClosureFields {
            corrective_action: body.corrective_action,
            materials_used: body.materials_used,
            estimated_labor_hours: body.estimated_labor_hours,
        };
        let mut request = Self::new().with_edit(edit).with_closure(closure);
        if let Some(status) = body.status {
            request = request.with_status(status);
        }
        request
    }
}

/// Body of `PUT /tickets/{id}/assignee`; `null` clears the assignee.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignBody {
    /// New assignee.
    pub assignee: Option<UserId>,
}

/// Body of `POST /tickets/{id}/notes`.
#[derive(Debug, Deserialize)]
pub struct NoteBody {
    /// Note text.
    pub body: String,
}

/// Query of `GET /tickets`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Comma-separated status codes; all statuses when absent.
    pub status: Option<String>,
    /// Work order to restrict to.
    pub work_order_id: Option<WorkOrderId>,
}

/// Query of `GET /work-orders-summary`.
#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    /// Substring of the work order number.
    pub search: Option<String>,
    /// Comma-separated status codes.
    pub status: Option<String>,
}

/// Query carrying only a status filter.
#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    /// Comma-separated status codes.
    pub status: Option<String>,
}

/// Query of `POST /tickets/{id}/files/{key}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadQuery {
    /// Original file name.
    pub file_name: Option<String>,
}

/// Confirmation of a removed file.
#[derive(Debug, Serialize)]
pub struct RemovedFile {
    /// Removed key.
    pub key: String,
    /// Human-readable confirmation.
    pub message: String,
}
