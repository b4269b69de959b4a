//! Ticket lifecycle orchestration: creation, edits, transitions, archiving.

use super::{CreateTicketRequest, TicketServiceError, TicketServiceResult, UpdateTicketRequest};
use crate::audit::{AuditAction, AuditEntry, AuditSink, record_best_effort};
use crate::notify::{TicketEvent, TicketNotifier};
use crate::ticket::{
    domain::{
        ArchiveReceipt, ArchivedTicket, ClosureCycle, ClosureFields, NewNote, Note, Ticket,
        TicketDetails, TicketDraft, TicketId, TicketStatus, TransitionOutcome, UserId, WorkOrderId,
    },
    ports::{TicketFilter, TicketRepository},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info};

/// Ticket lifecycle orchestration service.
///
/// Every mutation is written through the repository first; events and audit
/// entries are emitted only once the write has returned successfully.
pub struct TicketLifecycleService<R, C>
where
    R: TicketRepository + ?Sized,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    notifier: TicketNotifier,
    audit: Arc<dyn AuditSink>,
}

impl<R, C> TicketLifecycleService<R, C>
where
    R: TicketRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new ticket lifecycle service.
    #[must_use]
    pub fn new(
        repository: Arc<R>,
        clock: Arc<C>,
        notifier: TicketNotifier,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            repository,
            clock,
            notifier,
            audit,
        }
    }

    /// Opens a new ticket.
    ///
    /// The ticket starts Open with the next quality-ticket id of its work
    /// order. The initiator defaults to `actor`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank description or unknown
    /// reference, and [`TicketServiceError::Repository`] with a not-found
    /// kind when the work order does not exist.
    pub async fn create(
        &self,
        request: CreateTicketRequest,
        actor: Option<UserId>,
    ) -> TicketServiceResult<TicketDetails> {
        let mut draft = TicketDraft::new(
            request.work_order_id(),
            request.description(),
            &*self.clock,
        )?;
        let (classification, initiator, assignee) = request.into_parts();
        draft = draft.with_classification(classification);
        if let Some(user) = initiator.or(actor) {
            draft = draft.with_initiator(user);
        }
        if let Some(user) = assignee {
            draft = draft.with_assignee(user);
        }

        let ticket = self.repository.create(draft).await?;
        info!(
            ticket_id = %ticket.id(),
            quality_id = %ticket.quality_ticket_id(),
            work_order_id = %ticket.work_order_id(),
            "ticket created"
        );
        self.notifier.publish(TicketEvent::Created(ticket.clone()));
        self.record(AuditAction::TicketCreated, &ticket, actor).await;
        self.details(ticket).await
    }

    /// Returns a ticket with its work order, closures, attachments, and notes.
    ///
    /// # Errors
    ///
    /// Returns [`TicketServiceError::TicketNotFound`] when no active ticket
    /// has the id.
    pub async fn get(&self, id: TicketId) -> TicketServiceResult<TicketDetails> {
        debug!(ticket_id = %id, "loading ticket");
        let ticket = self.load(id).await?;
        self.details(ticket).await
    }

    /// Lists active tickets ordered by internal id.
    ///
    /// # Errors
    ///
    /// Returns [`TicketServiceError::Repository`] when the lookup fails.
    pub async fn list(&self, filter: &TicketFilter) -> TicketServiceResult<Vec<Ticket>> {
        Ok(self.repository.list(filter).await?)
    }

    /// Applies a partial update, routing any status change through the
    /// transition rules.
    ///
    /// Plain edits and the status change are persisted in one write, together
    /// with the closure cycle when the update closes the ticket. An update
    /// that changes nothing writes nothing and publishes no event.
    ///
    /// # Errors
    ///
    /// Returns [`TicketServiceError::TicketNotFound`], a validation error for
    /// bad fields or closure data, or a precondition error when the
    /// transition is not allowed.
    pub async fn update(
        &self,
        id: TicketId,
        request: UpdateTicketRequest,
        actor: Option<UserId>,
    ) -> TicketServiceResult<TicketDetails> {
        let mut ticket = self.load(id).await?;
        let (edit, status, closure) = request.into_parts();
        if let Some(work_order_id) = edit.work_order_id {
            self.require_work_order(work_order_id).await?;
        }
        if let Some(Some(assignee)) = edit.assignee {
            self.require_user(assignee).await?;
        }

        let edited = ticket.apply_edit(edit, &*self.clock)?;
        let outcome = status.map_or(Ok(TransitionOutcome::Unchanged), |target| {
            ticket.transition_to(target, &closure, actor, &*self.clock)
        })?;
        if !edited && !outcome.is_change() {
            debug!(ticket_id = %id, "update changed nothing");
            return self.details(ticket).await;
        }

        self.repository.save(&ticket, outcome.closure_cycle()).await?;
        log_transition(&ticket, &outcome);
        self.notifier.publish(TicketEvent::Updated(ticket.clone()));
        if edited {
            self.record(AuditAction::TicketUpdated, &ticket, actor).await;
        }
        if outcome.is_change() {
            self.record(AuditAction::StatusChanged, &ticket, actor).await;
        }
        self.details(ticket).await
    }

    /// Moves a ticket to `target`.
    ///
    /// Requesting the current Open or InProgress status is a no-op that
    /// publishes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TicketServiceError::TicketNotFound`], a validation error for
    /// missing closure fields, or a precondition error for an unassigned
    /// in-progress move. The stored ticket is unchanged on error.
    pub async fn transition(
        &self,
        id: TicketId,
        target: TicketStatus,
        closure: &ClosureFields,
        actor: Option<UserId>,
    ) -> TicketServiceResult<Ticket> {
        let mut ticket = self.load(id).await?;
        let outcome = ticket.transition_to(target, closure, actor, &*self.clock)?;
        if !outcome.is_change() {
            return Ok(ticket);
        }

        self.repository.save(&ticket, outcome.closure_cycle()).await?;
        log_transition(&ticket, &outcome);
        self.notifier.publish(TicketEvent::Updated(ticket.clone()));
        self.record(AuditAction::StatusChanged, &ticket, actor).await;
        Ok(ticket)
    }

    /// Assigns a ticket, or clears its assignee when `assignee` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`TicketServiceError::UnknownUser`] when the user does not
    /// exist and a precondition error when unassigning an in-progress ticket.
    pub async fn assign(
        &self,
        id: TicketId,
        assignee: Option<UserId>,
        actor: Option<UserId>,
    ) -> TicketServiceResult<Ticket> {
        let mut ticket = self.load(id).await?;
        if let Some(user) = assignee {
            self.require_user(user).await?;
        }
        ticket.assign(assignee, &*self.clock)?;

        self.repository.save(&ticket, None).await?;
        info!(
            ticket_id = %ticket.id(),
            assignee = ?assignee.map(UserId::value),
            "ticket assigned"
        );
        self.notifier.publish(TicketEvent::Updated(ticket.clone()));
        self.record(AuditAction::TicketAssigned, &ticket, actor).await;
        Ok(ticket)
    }

    /// Moves a ticket and its closure history into the archive.
    ///
    /// # Errors
    ///
    /// Returns [`TicketServiceError::Repository`] with a not-found kind when
    /// the ticket is not active, or an internal error when the archive
    /// transaction rolls back.
    pub async fn archive(
        &self,
        id: TicketId,
        actor: Option<UserId>,
    ) -> TicketServiceResult<ArchiveReceipt> {
        let archived = self.repository.archive(id, actor, self.clock.utc()).await?;
        info!(
            ticket_id = %id,
            quality_id = %archived.ticket.quality_ticket_id(),
            cycles = archived.closure_history.len(),
            "ticket archived"
        );
        self.notifier.publish(TicketEvent::deleted(id));
        self.record(AuditAction::TicketArchived, &archived.ticket, actor).await;
        Ok(ArchiveReceipt::for_ticket(&archived))
    }

    /// Reads an archived ticket.
    ///
    /// # Errors
    ///
    /// Returns [`TicketServiceError::ArchivedTicketNotFound`] when nothing was
    /// archived under the id.
    pub async fn find_archived(&self, id: TicketId) -> TicketServiceResult<ArchivedTicket> {
        self.repository
            .find_archived(id)
            .await?
            .ok_or(TicketServiceError::ArchivedTicketNotFound(id))
    }

    /// Returns the closure cycles of an active ticket, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TicketServiceError::TicketNotFound`] when no active ticket
    /// has the id.
    pub async fn closures(&self, id: TicketId) -> TicketServiceResult<Vec<ClosureCycle>> {
        self.load(id).await?;
        Ok(self.repository.closure_cycles(id).await?)
    }

    /// Appends a note to a ticket.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank body and
    /// [`TicketServiceError::TicketNotFound`] for an unknown ticket.
    pub async fn add_note(
        &self,
        id: TicketId,
        body: &str,
        actor: Option<UserId>,
    ) -> TicketServiceResult<Note> {
        let ticket = self.load(id).await?;
        let note = NewNote::new(id, actor, body, &*self.clock)?;
        let stored = self.repository.add_note(note).await?;
        debug!(ticket_id = %id, note_id = %stored.id, "note added");
        self.record(AuditAction::NoteAdded, &ticket, actor).await;
        Ok(stored)
    }

    /// Returns the notes of a ticket in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`TicketServiceError::TicketNotFound`] for an unknown ticket.
    pub async fn notes(&self, id: TicketId) -> TicketServiceResult<Vec<Note>> {
        self.load(id).await?;
        Ok(self.repository.notes(id).await?)
    }

    async fn load(&self, id: TicketId) -> TicketServiceResult<Ticket> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(TicketServiceError::TicketNotFound(id))
    }

    async fn details(&self, ticket: Ticket) -> TicketServiceResult<TicketDetails> {
        let id = ticket.id();
        let work_order_id = ticket.work_order_id();
        let (found, closures, attachments, notes) = tokio::try_join!(
            self.repository.find_work_order(work_order_id),
            self.repository.closure_cycles(id),
            self.repository.attachments(id),
            self.repository.notes(id),
        )?;
        let work_order = found.ok_or(TicketServiceError::WorkOrderNotFound(work_order_id))?;
        Ok(TicketDetails {
            ticket,
            work_order,
            closures,
            attachments,
            notes,
        })
    }

    async fn require_user(&self, user: UserId) -> TicketServiceResult<()> {
        if self.repository.user_exists(user).await? {
            Ok(())
        } else {
            Err(TicketServiceError::UnknownUser(user))
        }
    }

    async fn require_work_order(&self, work_order_id: WorkOrderId) -> TicketServiceResult<()> {
        self.repository
            .find_work_order(work_order_id)
            .await?
            .map(|_| ())
            .ok_or(TicketServiceError::WorkOrderNotFound(work_order_id))
    }

    async fn record(&self, action: AuditAction, ticket: &Ticket, actor: Option<UserId>) {
        let entry = AuditEntry::new(action, self.clock.utc())
            .by(actor)
            .on_ticket(ticket.id(), ticket.work_order_id());
        record_best_effort(&*self.audit, entry).await;
    }
}

fn log_transition(ticket: &Ticket, outcome: &TransitionOutcome) {
    match outcome {
        TransitionOutcome::Unchanged => {
            debug!(ticket_id = %ticket.id(), "ticket fields updated");
        }
        TransitionOutcome::Moved { from, to } => {
            info!(ticket_id = %ticket.id(), %from, %to, "ticket status changed");
        }
        TransitionOutcome::Closed(cycle) => {
            info!(
                ticket_id = %ticket.id(),
                quality_id = %ticket.quality_ticket_id(),
                closed_at = %cycle.closed_at,
                "ticket closed"
            );
        }
        TransitionOutcome::Reopened { to } => {
            info!(ticket_id = %ticket.id(), %to, "ticket reopened");
        }
    }
}
