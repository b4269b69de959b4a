//! In-memory repository for ticket lifecycle tests and database-less runs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::ticket::{
    domain::{
        ArchivedTicket, AttachmentKey, ClosureCycle, FileAttachment, NewNote, Note, NoteId,
        QualityTicketId, StatusFilter, Ticket, TicketDraft, TicketId, UserId, WorkOrder,
        WorkOrderId, WorkOrderSearch, WorkOrderSummary, next_sequence, sort_newest_first,
    },
    ports::{TicketFilter, TicketRepository, TicketRepositoryError, TicketRepositoryResult},
};

/// Thread-safe in-memory ticket repository.
///
/// All state sits behind one lock, so multi-row operations such as
/// identifier assignment and archiving are atomic.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTicketRepository {
    state: Arc<RwLock<InMemoryTicketState>>,
}

#[derive(Debug, Default)]
struct InMemoryTicketState {
    tickets: BTreeMap<TicketId, Ticket>,
    closures: HashMap<TicketId, Vec<ClosureCycle>>,
    archive: BTreeMap<TicketId, ArchivedTicket>,
    work_orders: HashMap<WorkOrderId, WorkOrder>,
    users: HashSet<UserId>,
    notes: Vec<Note>,
    attachments: BTreeMap<AttachmentKey, FileAttachment>,
    last_ticket_id: i64,
    last_note_id: i64,
}

impl InMemoryTicketState {
    fn quality_id_taken(&self, quality_id: &QualityTicketId) -> bool {
        self.tickets
            .values()
            .any(|ticket| ticket.quality_ticket_id() == quality_id)
            || self
                .archive
                .values()
                .any(|archived| archived.ticket.quality_ticket_id() == quality_id)
    }

    fn require_ticket(&self, id: TicketId) -> TicketRepositoryResult<&Ticket> {
        self.tickets.get(&id).ok_or(TicketRepositoryError::NotFound(id))
    }

    fn check_user(&self, user: Option<UserId>) -> TicketRepositoryResult<()> {
        match user {
            Some(id) if !self.users.contains(&id) => Err(TicketRepositoryError::UserNotFound(id)),
            _ => Ok(()),
        }
    }
}

impl InMemoryTicketRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a work order tickets can be filed against.
    ///
    /// # Errors
    ///
    /// Returns [`TicketRepositoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn insert_work_order(&self, work_order: WorkOrder) -> TicketRepositoryResult<()> {
        self.write()?.work_orders.insert(work_order.id, work_order);
        Ok(())
    }

    /// Registers a user that tickets can be assigned to.
    ///
    /// # Errors
    ///
    /// Returns [`TicketRepositoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn insert_user(&self, user: UserId) -> TicketRepositoryResult<()> {
        self.write()?.users.insert(user);
        Ok(())
    }

    fn read(&self) -> TicketRepositoryResult<RwLockReadGuard<'_, InMemoryTicketState>> {
        self.state.read().map_err(|err| {
            TicketRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TicketRepositoryResult<RwLockWriteGuard<'_, InMemoryTicketState>> {
        self.state.write().map_err(|err| {
            TicketRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl TicketRepository for InMemoryTicketRepository {
    async fn create(&self, draft: TicketDraft) -> TicketRepositoryResult<Ticket> {
        let mut state = self.write()?;
        let work_order = state
            .work_orders
            .get(&draft.work_order_id())
            .cloned()
            .ok_or(TicketRepositoryError::WorkOrderNotFound(draft.work_order_id()))?;
        state.check_user(draft.initiator())?;
        state.check_user(draft.assignee())?;

        let active = state
            .tickets
            .values()
            .filter(|ticket| ticket.work_order_id() == work_order.id)
            .count();
        let active_count = u32::try_from(active).map_err(TicketRepositoryError::persistence)?;
        let sequence = next_sequence(active_count, |candidate| {
            let quality_id = QualityTicketId::compose(&work_order.number, candidate)
                .map_err(TicketRepositoryError::persistence)?;
            Ok::<_, TicketRepositoryError>(state.quality_id_taken(&quality_id))
        })?;
        let quality_id = QualityTicketId::compose(&work_order.number, sequence)
            .map_err(TicketRepositoryError::persistence)?;

        state.last_ticket_id += 1;
        let ticket = Ticket::from_draft(TicketId::new(state.last_ticket_id), quality_id, draft);
        state.tickets.insert(ticket.id(), ticket.clone());
        Ok(ticket)
    }

    async fn find_by_id(&self, id: TicketId) -> TicketRepositoryResult<Option<Ticket>> {
        Ok(self.read()?.tickets.get(&id).cloned())
    }

    async fn list(&self, filter: &TicketFilter) -> TicketRepositoryResult<Vec<Ticket>> {
        let state = self.read()?;
        Ok(state
            .tickets
            .values()
            .filter(|ticket| filter.matches(ticket))
            .cloned()
            .collect())
    }

    async fn save(
        &self,
        ticket: &Ticket,
        closure: Option<&ClosureCycle>,
    ) -> TicketRepositoryResult<()> {
        let mut state = self.write()?;
        state.require_ticket(ticket.id())?;
        if !state.work_orders.contains_key(&ticket.work_order_id()) {
            return Err(TicketRepositoryError::InvalidReference(format!(
                "work order {}",
                ticket.work_order_id()
            )));
        }
        state.check_user(ticket.assignee())?;

        if let Some(cycle) = closure {
            state
                .closures
                .entry(ticket.id())
                .or_default()
                .push(cycle.clone());
        }
        state.tickets.insert(ticket.id(), ticket.clone());
        Ok(())
    }

    async fn archive(
        &self,
        id: TicketId,
        archived_by: Option<UserId>,
        archived_at: DateTime<Utc>,
    ) -> TicketRepositoryResult<ArchivedTicket> {
        let mut state = self.write()?;
        let ticket = state.require_ticket(id)?.clone();
        let mut closure_history = state.closures.get(&id).cloned().unwrap_or_default();
        sort_newest_first(&mut closure_history);

        let archived = state
            .archive
            .entry(id)
            .or_insert_with(|| ArchivedTicket {
                ticket,
                closure_history,
                archived_at,
                archived_by,
            })
            .clone();

        state.tickets.remove(&id);
        state.closures.remove(&id);
        state.notes.retain(|note| note.ticket_id != id);
        state
            .attachments
            .retain(|_, attachment| attachment.ticket_id != id);
        Ok(archived)
    }

    async fn find_archived(&self, id: TicketId) -> TicketRepositoryResult<Option<ArchivedTicket>> {
        Ok(self.read()?.archive.get(&id).cloned())
    }

    async fn closure_cycles(&self, id: TicketId) -> TicketRepositoryResult<Vec<ClosureCycle>> {
        let mut cycles = self.read()?.closures.get(&id).cloned().unwrap_or_default();
        sort_newest_first(&mut cycles);
        Ok(cycles)
    }

    async fn find_work_order(&self, id: WorkOrderId) -> TicketRepositoryResult<Option<WorkOrder>> {
        Ok(self.read()?.work_orders.get(&id).cloned())
    }

    async fn user_exists(&self, id: UserId) -> TicketRepositoryResult<bool> {
        Ok(self.read()?.users.contains(&id))
    }

    async fn work_order_summary(
        &self,
        statuses: &StatusFilter,
        search: Option<&WorkOrderSearch>,
    ) -> TicketRepositoryResult<Vec<WorkOrderSummary>> {
        let state = self.read()?;
        let mut counts: HashMap<WorkOrderId, u64> = HashMap::new();
        for ticket in state.tickets.values() {
            if statuses.matches(ticket.status()) {
                *counts.entry(ticket.work_order_id()).or_default() += 1;
            }
        }

        let mut summaries: Vec<WorkOrderSummary> = counts
            .into_iter()
            .filter_map(|(work_order_id, open_count)| {
                let work_order = state.work_orders.get(&work_order_id)?;
                search
                    .is_none_or(|term| term.matches(&work_order.number))
                    .then(|| WorkOrderSummary {
                        work_order_id,
                        work_order_number: work_order.number.clone(),
                        open_count,
                    })
            })
            .collect();
        summaries.sort_by(|left, right| left.work_order_number.cmp(&right.work_order_number));
        Ok(summaries)
    }

    async fn add_note(&self, note: NewNote) -> TicketRepositoryResult<Note> {
        let mut state = self.write()?;
        state.require_ticket(note.ticket_id)?;
        state.check_user(note.author)?;
        state.last_note_id += 1;
        let stored = note.into_note(NoteId::new(state.last_note_id));
        state.notes.push(stored.clone());
        Ok(stored)
    }

    async fn notes(&self, id: TicketId) -> TicketRepositoryResult<Vec<Note>> {
        let state = self.read()?;
        Ok(state
            .notes
            .iter()
            .filter(|note| note.ticket_id == id)
            .cloned()
            .collect())
    }

    async fn attach_file(&self, attachment: &FileAttachment) -> TicketRepositoryResult<()> {
        let mut state = self.write()?;
        state.require_ticket(attachment.ticket_id)?;
        if state.attachments.contains_key(&attachment.key) {
            return Err(TicketRepositoryError::DuplicateAttachment(
                attachment.key.clone(),
            ));
        }
        state
            .attachments
            .insert(attachment.key.clone(), attachment.clone());
        Ok(())
    }

    async fn find_attachment(
        &self,
        key: &AttachmentKey,
    ) -> TicketRepositoryResult<Option<FileAttachment>> {
        Ok(self.read()?.attachments.get(key).cloned())
    }

    async fn attachments(&self, id: TicketId) -> TicketRepositoryResult<Vec<FileAttachment>> {
        let state = self.read()?;
        let mut attachments: Vec<FileAttachment> = state
            .attachments
            .values()
            .filter(|attachment| attachment.ticket_id == id)
            .cloned()
            .collect();
        attachments.sort_by_key(|attachment| attachment.uploaded_at);
        Ok(attachments)
    }

    async fn detach_file(&self, key: &AttachmentKey) -> TicketRepositoryResult<FileAttachment> {
        self.write()?
            .attachments
            .remove(key)
            .ok_or_else(|| TicketRepositoryError::AttachmentNotFound(key.clone()))
    }
}
