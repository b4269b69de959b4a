//! `PostgreSQL` repository implementation for ticket lifecycle storage.

use super::{
    conversion::{
        archived_row_to_domain, attachment_to_row, closure_to_new_row, draft_to_new_row,
        row_to_attachment, row_to_closure, row_to_note, row_to_ticket, row_to_work_order,
        ticket_to_changeset, to_archived_row,
    },
    models::{
        ArchivedTicketRow, ClosureRow, FileRow, NewNoteRow, NoteRow, SummaryRow, TicketRow,
        WorkOrderRow,
    },
    schema::{
        archived_tickets, ticket_closures, ticket_files, ticket_notes, tickets, users, work_orders,
    },
};
use crate::ticket::{
    domain::{
        ArchivedTicket, AttachmentKey, ClosureCycle, FileAttachment, NewNote, Note,
        QualityTicketId, StatusFilter, Ticket, TicketDraft, TicketId, UserId, WorkOrder,
        WorkOrderId, WorkOrderSearch, WorkOrderSummary, next_sequence,
    },
    ports::{TicketFilter, TicketRepository, TicketRepositoryError, TicketRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by ticket adapters.
pub type TicketPgPool = Pool<ConnectionManager<PgConnection>>;

/// Unique index guarding quality-ticket ids.
const QUALITY_ID_UNIQUE: &str = "idx_tickets_quality_ticket_id_unique";

/// `PostgreSQL`-backed ticket repository.
#[derive(Debug, Clone)]
pub struct PostgresTicketRepository {
    pool: TicketPgPool,
}

impl PostgresTicketRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TicketPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TicketRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TicketRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TicketRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TicketRepositoryError::persistence)?
    }
}

impl From<DieselError> for TicketRepositoryError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, ref info) => {
                Self::InvalidReference(
                    info.constraint_name()
                        .map_or_else(|| info.message().to_owned(), str::to_owned),
                )
            }
            other => Self::persistence(other),
        }
    }
}

#[async_trait]
impl TicketRepository for PostgresTicketRepository {
    async fn create(&self, draft: TicketDraft) -> TicketRepositoryResult<Ticket> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, TicketRepositoryError, _>(|tx| {
                // Locking the work order row serialises identifier assignment
                // per work order; other work orders proceed concurrently.
                let work_order_id = draft.work_order_id();
                let work_order = work_orders::table
                    .find(work_order_id.value())
                    .select(WorkOrderRow::as_select())
                    .for_update()
                    .first::<WorkOrderRow>(tx)
                    .optional()?
                    .ok_or(TicketRepositoryError::WorkOrderNotFound(work_order_id))?;

                let active: i64 = tickets::table
                    .filter(tickets::work_order_id.eq(work_order.id))
                    .count()
                    .get_result(tx)?;
                let active_count =
                    u32::try_from(active).map_err(TicketRepositoryError::persistence)?;
                let sequence = next_sequence(active_count, |candidate| {
                    let quality_id = QualityTicketId::compose(&work_order.number, candidate)
                        .map_err(TicketRepositoryError::persistence)?;
                    quality_id_taken(tx, &quality_id)
                })?;
                let quality_id = QualityTicketId::compose(&work_order.number, sequence)
                    .map_err(TicketRepositoryError::persistence)?;

                let new_row = draft_to_new_row(&draft, &quality_id);
                let row = diesel::insert_into(tickets::table)
                    .values(&new_row)
                    .returning(TicketRow::as_returning())
                    .get_result::<TicketRow>(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                            if info.constraint_name() == Some(QUALITY_ID_UNIQUE) =>
                        {
                            TicketRepositoryError::DuplicateQualityTicketId(quality_id.clone())
                        }
                        other => TicketRepositoryError::from(other),
                    })?;
                row_to_ticket(row)
            })
        })
        .await
    }

    async fn find_by_id(&self, id: TicketId) -> TicketRepositoryResult<Option<Ticket>> {
        self.run_blocking(move |connection| {
            tickets::table
                .find(id.value())
                .select(TicketRow::as_select())
                .first::<TicketRow>(connection)
                .optional()?
                .map(row_to_ticket)
                .transpose()
        })
        .await
    }

    async fn list(&self, filter: &TicketFilter) -> TicketRepositoryResult<Vec<Ticket>> {
        let codes = filter.statuses.codes();
        let work_order_id = filter.work_order_id;
        self.run_blocking(move |connection| {
            let mut query = tickets::table
                .filter(tickets::status.eq_any(codes))
                .order(tickets::id.asc())
                .select(TicketRow::as_select())
                .into_boxed();
            if let Some(work_order) = work_order_id {
                query = query.filter(tickets::work_order_id.eq(work_order.value()));
            }
            query
                .load::<TicketRow>(connection)?
                .into_iter()
                .map(row_to_ticket)
                .collect()
        })
        .await
    }

    async fn save(
        &self,
        ticket: &Ticket,
        closure: Option<&ClosureCycle>,
    ) -> TicketRepositoryResult<()> {
        let ticket_id = ticket.id();
        let changeset = ticket_to_changeset(ticket);
        let closure_row = closure.map(closure_to_new_row);
        self.run_blocking(move |connection| {
            connection.transaction::<_, TicketRepositoryError, _>(|tx| {
                let updated = diesel::update(tickets::table.find(ticket_id.value()))
                    .set(&changeset)
                    .execute(tx)?;
                if updated == 0 {
                    return Err(TicketRepositoryError::NotFound(ticket_id));
                }
                if let Some(row) = closure_row {
                    diesel::insert_into(ticket_closures::table)
                        .values(&row)
                        .execute(tx)?;
                }
                Ok(())
            })
        })
        .await
    }

    async fn archive(
        &self,
        id: TicketId,
        archived_by: Option<UserId>,
        archived_at: DateTime<Utc>,
    ) -> TicketRepositoryResult<ArchivedTicket> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, TicketRepositoryError, _>(|tx| {
                let row = tickets::table
                    .find(id.value())
                    .select(TicketRow::as_select())
                    .for_update()
                    .first::<TicketRow>(tx)
                    .optional()?
                    .ok_or(TicketRepositoryError::NotFound(id))?;
                let history: Vec<ClosureCycle> = load_closures(tx, id)?;
                let archived_row = to_archived_row(row, &history, archived_at, archived_by)?;

                diesel::insert_into(archived_tickets::table)
                    .values(&archived_row)
                    .on_conflict(archived_tickets::id)
                    .do_nothing()
                    .execute(tx)?;
                diesel::delete(tickets::table.find(id.value())).execute(tx)?;

                let stored = archived_tickets::table
                    .find(id.value())
                    .select(ArchivedTicketRow::as_select())
                    .first::<ArchivedTicketRow>(tx)?;
                archived_row_to_domain(stored)
            })
        })
        .await
    }

    async fn find_archived(&self, id: TicketId) -> TicketRepositoryResult<Option<ArchivedTicket>> {
        self.run_blocking(move |connection| {
            archived_tickets::table
                .find(id.value())
                .select(ArchivedTicketRow::as_select())
                .first::<ArchivedTicketRow>(connection)
                .optional()?
                .map(archived_row_to_domain)
                .transpose()
        })
        .await
    }

    async fn closure_cycles(&self, id: TicketId) -> TicketRepositoryResult<Vec<ClosureCycle>> {
        self.run_blocking(move |connection| load_closures(connection, id))
            .await
    }

    async fn find_work_order(&self, id: WorkOrderId) -> TicketRepositoryResult<Option<WorkOrder>> {
        self.run_blocking(move |connection| {
            Ok(work_orders::table
                .find(id.value())
                .select(WorkOrderRow::as_select())
                .first::<WorkOrderRow>(connection)
                .optional()?
                .map(row_to_work_order))
        })
        .await
    }

    async fn user_exists(&self, id: UserId) -> TicketRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let count: i64 = users::table
                .filter(users::id.eq(id.value()))
                .count()
                .get_result(connection)?;
            Ok(count > 0)
        })
        .await
    }

    async fn work_order_summary(
        &self,
        statuses: &StatusFilter,
        search: Option<&WorkOrderSearch>,
    ) -> TicketRepositoryResult<Vec<WorkOrderSummary>> {
        let codes = statuses.codes();
        let pattern = search.map(WorkOrderSearch::like_pattern);
        self.run_blocking(move |connection| {
            let query = diesel::sql_query(concat!(
                "SELECT w.id AS work_order_id, w.number AS work_order_number, ",
                "COUNT(t.id) AS open_count ",
                "FROM tickets t ",
                "INNER JOIN work_orders w ON w.id = t.work_order_id ",
                "WHERE t.status = ANY($1) ",
                "AND ($2::TEXT IS NULL OR w.number ILIKE $2) ",
                "GROUP BY w.id, w.number ",
                "ORDER BY w.number ASC",
            ))
            .bind::<diesel::sql_types::Array<diesel::sql_types::Int2>, _>(codes)
            .bind::<diesel::sql_types::Nullable<diesel::sql_types::Text>, _>(pattern);

            query
                .load::<SummaryRow>(connection)?
                .into_iter()
                .map(|row| {
                    Ok(WorkOrderSummary {
                        work_order_id: WorkOrderId::new(row.work_order_id),
                        work_order_number: row.work_order_number,
                        open_count: u64::try_from(row.open_count)
                            .map_err(TicketRepositoryError::persistence)?,
                    })
                })
                .collect()
        })
        .await
    }

    async fn add_note(&self, note: NewNote) -> TicketRepositoryResult<Note> {
        self.run_blocking(move |connection| {
            require_ticket(connection, note.ticket_id)?;
            let row = diesel::insert_into(ticket_notes::table)
                .values(&NewNoteRow {
                    ticket_id: note.ticket_id.value(),
                    author_id: note.author.map(UserId::value),
                    body: note.body,
                    created_at: note.created_at,
                })
                .returning(NoteRow::as_returning())
                .get_result::<NoteRow>(connection)?;
            Ok(row_to_note(row))
        })
        .await
    }

    async fn notes(&self, id: TicketId) -> TicketRepositoryResult<Vec<Note>> {
        self.run_blocking(move |connection| {
            Ok(ticket_notes::table
                .filter(ticket_notes::ticket_id.eq(id.value()))
                .order(ticket_notes::id.asc())
                .select(NoteRow::as_select())
                .load::<NoteRow>(connection)?
                .into_iter()
                .map(row_to_note)
                .collect())
        })
        .await
    }

    async fn attach_file(&self, attachment: &FileAttachment) -> TicketRepositoryResult<()> {
        let row = attachment_to_row(attachment)?;
        let key = attachment.key.clone();
        let ticket_id = attachment.ticket_id;
        self.run_blocking(move |connection| {
            require_ticket(connection, ticket_id)?;
            diesel::insert_into(ticket_files::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TicketRepositoryError::DuplicateAttachment(key.clone())
                    }
                    other => TicketRepositoryError::from(other),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_attachment(
        &self,
        key: &AttachmentKey,
    ) -> TicketRepositoryResult<Option<FileAttachment>> {
        let lookup = key.as_str().to_owned();
        self.run_blocking(move |connection| {
            ticket_files::table
                .find(lookup)
                .select(FileRow::as_select())
                .first::<FileRow>(connection)
                .optional()?
                .map(row_to_attachment)
                .transpose()
        })
        .await
    }

    async fn attachments(&self, id: TicketId) -> TicketRepositoryResult<Vec<FileAttachment>> {
        self.run_blocking(move |connection| {
            ticket_files::table
                .filter(ticket_files::ticket_id.eq(id.value()))
                .order(ticket_files::uploaded_at.asc())
                .select(FileRow::as_select())
                .load::<FileRow>(connection)?
                .into_iter()
                .map(row_to_attachment)
                .collect()
        })
        .await
    }

    async fn detach_file(&self, key: &AttachmentKey) -> TicketRepositoryResult<FileAttachment> {
        let missing = key.clone();
        let lookup = key.as_str().to_owned();
        self.run_blocking(move |connection| {
            diesel::delete(ticket_files::table.find(lookup))
                .returning(FileRow::as_returning())
                .get_result::<FileRow>(connection)
                .optional()?
                .map(row_to_attachment)
                .transpose()?
                .ok_or(TicketRepositoryError::AttachmentNotFound(missing))
        })
        .await
    }
}

fn quality_id_taken(
    connection: &mut PgConnection,
    quality_id: &QualityTicketId,
) -> TicketRepositoryResult<bool> {
    let active: i64 = tickets::table
        .filter(tickets::quality_ticket_id.eq(quality_id.as_str()))
        .count()
        .get_result(connection)?;
    let archived: i64 = archived_tickets::table
        .filter(archived_tickets::quality_ticket_id.eq(quality_id.as_str()))
        .count()
        .get_result(connection)?;
    Ok(active + archived > 0)
}

fn require_ticket(connection: &mut PgConnection, id: TicketId) -> TicketRepositoryResult<()> {
    let count: i64 = tickets::table
        .filter(tickets::id.eq(id.value()))
        .count()
        .get_result(connection)?;
    if count == 0 {
        return Err(TicketRepositoryError::NotFound(id));
    }
    Ok(())
}

fn load_closures(
    connection: &mut PgConnection,
    id: TicketId,
) -> TicketRepositoryResult<Vec<ClosureCycle>> {
    Ok(ticket_closures::table
        .filter(ticket_closures::ticket_id.eq(id.value()))
        .order((ticket_closures::closed_at.desc(), ticket_closures::id.desc()))
        .select(ClosureRow::as_select())
        .load::<ClosureRow>(connection)?
        .into_iter()
        .map(row_to_closure)
        .collect())
}
