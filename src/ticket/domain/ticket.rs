//! Ticket aggregate root and its status transition rules.

use super::{
    ClosureCycle, DivisionId, LaborDepartmentId, NonconformanceTypeId, QualityTicketId,
    Resolution, SequenceId, TicketDomainError, TicketId, TicketStatus, UnitId, UserId,
    WorkOrderId,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Optional classification references of a ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Owning division.
    pub division_id: Option<DivisionId>,
    /// Affected unit.
    pub unit_id: Option<UnitId>,
    /// Manufacturing sequence where the issue was found.
    pub sequence_id: Option<SequenceId>,
    /// Labor department responsible.
    pub labor_department_id: Option<LaborDepartmentId>,
    /// Kind of nonconformance.
    pub nonconformance_type_id: Option<NonconformanceTypeId>,
    /// Free-text drawing number.
    pub drawing_number: Option<String>,
}

impl Classification {
    fn normalized(mut self) -> Self {
        self.drawing_number = normalize_optional(self.drawing_number);
        self
    }
}

/// Validated input for a ticket that has not been stored yet.
///
/// The store turns a draft into a [`Ticket`] once it has assigned the
/// internal id and the quality-ticket id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDraft {
    work_order_id: WorkOrderId,
    classification: Classification,
    description: String,
    initiator: Option<UserId>,
    assignee: Option<UserId>,
    opened_at: DateTime<Utc>,
}

impl TicketDraft {
    /// Creates a draft with the required fields.
    ///
    /// # Errors
    ///
    /// Returns [`TicketDomainError::EmptyDescription`] when the description is
    /// blank.
    pub fn new(
        work_order_id: WorkOrderId,
        description: &str,
        clock: &impl Clock,
    ) -> Result<Self, TicketDomainError> {
        Ok(Self {
            work_order_id,
            classification: Classification::default(),
            description: required_description(description)?,
            initiator: None,
            assignee: None,
            opened_at: clock.utc(),
        })
    }

    /// Sets the classification references.
    #[must_use]
    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.classification = classification.normalized();
        self
    }

    /// Sets the reporting user.
    #[must_use]
    pub const fn with_initiator(mut self, initiator: UserId) -> Self {
        self.initiator = Some(initiator);
        self
    }

    /// Sets the initial assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Returns the work order the ticket is filed against.
    #[must_use]
    pub const fn work_order_id(&self) -> WorkOrderId {
        self.work_order_id
    }

    /// Returns the classification references.
    #[must_use]
    pub const fn classification(&self) -> &Classification {
        &self.classification
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the reporting user.
    #[must_use]
    pub const fn initiator(&self) -> Option<UserId> {
        self.initiator
    }

    /// Returns the initial assignee.
    #[must_use]
    pub const fn assignee(&self) -> Option<UserId> {
        self.assignee
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }
}

/// Partial edit of a ticket's plain fields.
///
/// Nullable fields use `Option<Option<_>>`: the outer `None` leaves the field
/// untouched, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketEdit {
    /// New work order.
    pub work_order_id: Option<WorkOrderId>,
    /// New division.
    pub division_id: Option<Option<DivisionId>>,
    /// New unit.
    pub unit_id: Option<Option<UnitId>>,
    /// New sequence.
    pub sequence_id: Option<Option<SequenceId>>,
    /// New labor department.
    pub labor_department_id: Option<Option<LaborDepartmentId>>,
    /// New nonconformance type.
    pub nonconformance_type_id: Option<Option<NonconformanceTypeId>>,
    /// New drawing number.
    pub drawing_number: Option<Option<String>>,
    /// New description.
    pub description: Option<String>,
    /// New assignee.
    pub assignee: Option<Option<UserId>>,
}

impl TicketEdit {
    /// Returns `true` when the edit changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Raw closure fields supplied with a status change.
///
/// Only consulted when the target status is [`TicketStatus::Closed`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClosureFields {
    /// Corrective action taken.
    pub corrective_action: Option<String>,
    /// Materials consumed.
    pub materials_used: Option<String>,
    /// Estimated labor hours.
    pub estimated_labor_hours: Option<Decimal>,
}

impl ClosureFields {
    fn validate(&self) -> Result<Resolution, TicketDomainError> {
        Resolution::new(
            self.corrective_action.as_deref(),
            self.materials_used.as_deref(),
            self.estimated_labor_hours,
        )
    }
}

/// Result of applying a status transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The ticket already had the requested status.
    Unchanged,
    /// The status changed without further side effects.
    Moved {
        /// Previous status.
        from: TicketStatus,
        /// New status.
        to: TicketStatus,
    },
    /// The ticket was closed and a new cycle must be appended.
    Closed(ClosureCycle),
    /// The ticket left Closed.
    Reopened {
        /// New status.
        to: TicketStatus,
    },
}

impl TransitionOutcome {
    /// Returns the closure cycle to persist, if any.
    #[must_use]
    pub const fn closure_cycle(&self) -> Option<&ClosureCycle> {
        match self {
            Self::Closed(cycle) => Some(cycle),
            Self::Unchanged | Self::Moved { .. } | Self::Reopened { .. } => None,
        }
    }

    /// Returns `true` when the ticket changed.
    #[must_use]
    pub const fn is_change(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Ticket aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    id: TicketId,
    quality_ticket_id: QualityTicketId,
    work_order_id: WorkOrderId,
    #[serde(flatten)]
    classification: Classification,
    description: String,
    status: TicketStatus,
    assignee: Option<UserId>,
    initiator: Option<UserId>,
    resolution: Option<Resolution>,
    opened_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
    reopened_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTicketData {
    /// Internal identifier.
    pub id: TicketId,
    /// Quality-ticket identifier.
    pub quality_ticket_id: QualityTicketId,
    /// Work order reference.
    pub work_order_id: WorkOrderId,
    /// Classification references.
    pub classification: Classification,
    /// Description.
    pub description: String,
    /// Lifecycle status.
    pub status: TicketStatus,
    /// Assigned user.
    pub assignee: Option<UserId>,
    /// Reporting user.
    pub initiator: Option<UserId>,
    /// Current-cycle resolution.
    pub resolution: Option<Resolution>,
    /// Creation timestamp.
    pub opened_at: DateTime<Utc>,
    /// Close timestamp of the current cycle.
    pub closed_at: Option<DateTime<Utc>>,
    /// Latest reopen timestamp.
    pub reopened_at: Option<DateTime<Utc>>,
    /// Latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// Materialises a stored draft. Status is always Open.
    #[must_use]
    pub fn from_draft(id: TicketId, quality_ticket_id: QualityTicketId, draft: TicketDraft) -> Self {
        Self {
            id,
            quality_ticket_id,
            work_order_id: draft.work_order_id,
            classification: draft.classification,
            description: draft.description,
            status: TicketStatus::Open,
            assignee: draft.assignee,
            initiator: draft.initiator,
            resolution: None,
            opened_at: draft.opened_at,
            closed_at: None,
            reopened_at: None,
            updated_at: draft.opened_at,
        }
    }

    /// Reconstructs a ticket from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTicketData) -> Self {
        Self {
            id: data.id,
            quality_ticket_id: data.quality_ticket_id,
            work_order_id: data.work_order_id,
            classification: data.classification,
            description: data.description,
            status: data.status,
            assignee: data.assignee,
            initiator: data.initiator,
            resolution: data.resolution,
            opened_at: data.opened_at,
            closed_at: data.closed_at,
            reopened_at: data.reopened_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the internal identifier.
    #[must_use]
    pub const fn id(&self) -> TicketId {
        self.id
    }

    /// Returns the quality-ticket identifier.
    #[must_use]
    pub const fn quality_ticket_id(&self) -> &QualityTicketId {
        &self.quality_ticket_id
    }

    /// Returns the work order reference.
    #[must_use]
    pub const fn work_order_id(&self) -> WorkOrderId {
        self.work_order_id
    }

    /// Returns the classification references.
    #[must_use]
    pub const fn classification(&self) -> &Classification {
        &self.classification
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TicketStatus {
        self.status
    }

    /// Returns the assigned user.
    #[must_use]
    pub const fn assignee(&self) -> Option<UserId> {
        self.assignee
    }

    /// Returns the reporting user.
    #[must_use]
    pub const fn initiator(&self) -> Option<UserId> {
        self.initiator
    }

    /// Returns the current-cycle resolution, present only while closed.
    #[must_use]
    pub const fn resolution(&self) -> Option<&Resolution> {
        self.resolution.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Returns the close timestamp of the current cycle.
    #[must_use]
    pub const fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }

    /// Returns the latest reopen timestamp.
    #[must_use]
    pub const fn reopened_at(&self) -> Option<DateTime<Utc>> {
        self.reopened_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Start of the current open period: the last reopen, else creation.
    #[must_use]
    pub fn cycle_started_at(&self) -> DateTime<Utc> {
        self.reopened_at.unwrap_or(self.opened_at)
    }

    /// Applies a partial edit of plain fields.
    ///
    /// Returns `true` when any field changed.
    ///
    /// # Errors
    ///
    /// Returns [`TicketDomainError::EmptyDescription`] for a blank description
    /// and [`TicketDomainError::AssigneeRequired`] when clearing the assignee of
    /// an in-progress ticket. The ticket is left untouched on error.
    pub fn apply_edit(
        &mut self,
        edit: TicketEdit,
        clock: &impl Clock,
    ) -> Result<bool, TicketDomainError> {
        let description = edit
            .description
            .as_deref()
            .map(required_description)
            .transpose()?;
        if let Some(assignee) = edit.assignee {
            self.check_assignee(assignee)?;
        }

        let before = self.clone();
        if let Some(work_order_id) = edit.work_order_id {
            self.work_order_id = work_order_id;
        }
        let classification = &mut self.classification;
        apply_field(&mut classification.division_id, edit.division_id);
        apply_field(&mut classification.unit_id, edit.unit_id);
        apply_field(&mut classification.sequence_id, edit.sequence_id);
        apply_field(
            &mut classification.labor_department_id,
            edit.labor_department_id,
        );
        apply_field(
            &mut classification.nonconformance_type_id,
            edit.nonconformance_type_id,
        );
        apply_field(
            &mut classification.drawing_number,
            edit.drawing_number.map(normalize_optional),
        );
        if let Some(text) = description {
            self.description = text;
        }
        apply_field(&mut self.assignee, edit.assignee);

        let changed = *self != before;
        if changed {
            self.touch(clock);
        }
        Ok(changed)
    }

    /// Assigns the ticket to `assignee`, or clears the assignment.
    ///
    /// # Errors
    ///
    /// Returns [`TicketDomainError::AssigneeRequired`] when clearing the
    /// assignee of an in-progress ticket.
    pub fn assign(
        &mut self,
        assignee: Option<UserId>,
        clock: &impl Clock,
    ) -> Result<(), TicketDomainError> {
        self.check_assignee(assignee)?;
        self.assignee = assignee;
        self.touch(clock);
        Ok(())
    }

    /// Moves the ticket to `target`, applying lifecycle side effects.
    ///
    /// - Entering InProgress requires an assignee.
    /// - Entering Closed requires valid closure fields, stamps `closed_at`,
    ///   and yields the [`ClosureCycle`] to append. Closing a closed ticket
    ///   appends another cycle over the same open period.
    /// - Leaving Closed stamps `reopened_at` and clears the current-cycle
    ///   resolution; earlier cycles are kept by the store.
    /// - Requesting the current Open/InProgress status is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`TicketDomainError::AssigneeRequired`] or a closure validation
    /// error.
    /// The ticket is left untouched on error.
    pub fn transition_to(
        &mut self,
        target: TicketStatus,
        closure: &ClosureFields,
        actor: Option<UserId>,
        clock: &impl Clock,
    ) -> Result<TransitionOutcome, TicketDomainError> {
        let from = self.status;
        match target {
            TicketStatus::Closed => {
                let resolution = closure.validate()?;
                let now = clock.utc();
                let cycle = ClosureCycle {
                    ticket_id: self.id,
                    cycle_started_at: self.cycle_started_at(),
                    closed_at: now,
                    resolution: resolution.clone(),
                    closed_by: actor,
                };
                self.status = TicketStatus::Closed;
                self.resolution = Some(resolution);
                self.closed_at = Some(now);
                self.updated_at = now;
                Ok(TransitionOutcome::Closed(cycle))
            }
            _ if from == target => Ok(TransitionOutcome::Unchanged),
            TicketStatus::InProgress | TicketStatus::Open => {
                if target == TicketStatus::InProgress && self.assignee.is_none() {
                    return Err(TicketDomainError::AssigneeRequired(self.id));
                }
                let now = clock.utc();
                self.status = target;
                self.updated_at = now;
                if from == TicketStatus::Closed {
                    self.reopened_at = Some(now);
                    self.closed_at = None;
                    self.resolution = None;
                    return Ok(TransitionOutcome::Reopened { to: target });
                }
                Ok(TransitionOutcome::Moved { from, to: target })
            }
        }
    }

    fn check_assignee(&self, assignee: Option<UserId>) -> Result<(), TicketDomainError> {
        if assignee.is_none() && self.status == TicketStatus::InProgress {
            return Err(TicketDomainError::AssigneeRequired(self.id));
        }
        Ok(())
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

fn apply_field<T>(field: &mut T, value: Option<T>) {
    if let Some(new_value) = value {
        *field = new_value;
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

fn required_description(value: &str) -> Result<String, TicketDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TicketDomainError::EmptyDescription);
    }
    Ok(trimmed.to_owned())
}
