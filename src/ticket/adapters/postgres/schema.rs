//! Diesel schema for ticket lifecycle persistence.

diesel::table! {
    /// Production work orders.
    work_orders (id) {
        /// Work order identifier.
        id -> Int8,
        /// Work order number.
        #[max_length = 64]
        number -> Varchar,
    }
}

diesel::table! {
    /// Application users.
    users (id) {
        /// User identifier.
        id -> Int8,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
    }
}

diesel::table! {
    /// Active tickets.
    tickets (id) {
        /// Internal ticket identifier.
        id -> Int8,
        /// Quality-ticket identifier.
        #[max_length = 80]
        quality_ticket_id -> Varchar,
        /// Work order reference.
        work_order_id -> Int8,
        /// Division reference.
        division_id -> Nullable<Int8>,
        /// Unit reference.
        unit_id -> Nullable<Int8>,
        /// Sequence reference.
        sequence_id -> Nullable<Int8>,
        /// Labor department reference.
        labor_department_id -> Nullable<Int8>,
        /// Nonconformance type reference.
        nonconformance_type_id -> Nullable<Int8>,
        /// Drawing number.
        drawing_number -> Nullable<Text>,
        /// Description.
        description -> Text,
        /// Status code.
        status -> Int2,
        /// Assigned user.
        assigned_user_id -> Nullable<Int8>,
        /// Reporting user.
        initiator_id -> Nullable<Int8>,
        /// Current-cycle corrective action.
        corrective_action -> Nullable<Text>,
        /// Current-cycle materials used.
        materials_used -> Nullable<Text>,
        /// Current-cycle estimated labor hours.
        estimated_labor_hours -> Nullable<Numeric>,
        /// Creation timestamp.
        opened_at -> Timestamptz,
        /// Close timestamp of the current cycle.
        closed_at -> Nullable<Timestamptz>,
        /// Latest reopen timestamp.
        reopened_at -> Nullable<Timestamptz>,
        /// Latest mutation timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Closure cycles, one per close.
    ticket_closures (id) {
        /// Row identifier.
        id -> Int8,
        /// Ticket reference.
        ticket_id -> Int8,
        /// Start of the closed period.
        cycle_started_at -> Timestamptz,
        /// Close timestamp.
        closed_at -> Timestamptz,
        /// Corrective action.
        corrective_action -> Text,
        /// Materials used.
        materials_used -> Text,
        /// Estimated labor hours.
        estimated_labor_hours -> Numeric,
        /// Closing user.
        closed_by -> Nullable<Int8>,
    }
}

diesel::table! {
    /// Ticket notes.
    ticket_notes (id) {
        /// Note identifier.
        id -> Int8,
        /// Ticket reference.
        ticket_id -> Int8,
        /// Author reference.
        author_id -> Nullable<Int8>,
        /// Note body.
        body -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Attachment metadata.
    ticket_files (key) {
        /// Blob-store key.
        #[max_length = 200]
        key -> Varchar,
        /// Ticket reference.
        ticket_id -> Int8,
        /// Original file name.
        file_name -> Text,
        /// MIME type.
        #[max_length = 255]
        content_type -> Varchar,
        /// Content size in bytes.
        size_bytes -> Int8,
        /// Hex SHA-256 digest.
        #[max_length = 64]
        sha256 -> Varchar,
        /// Upload timestamp.
        uploaded_at -> Timestamptz,
        /// Uploading user.
        uploaded_by -> Nullable<Int8>,
    }
}

diesel::table! {
    /// Archived tickets.
    archived_tickets (id) {
        /// Former internal ticket identifier.
        id -> Int8,
        /// Quality-ticket identifier.
        #[max_length = 80]
        quality_ticket_id -> Varchar,
        /// Work order reference.
        work_order_id -> Int8,
        /// Division reference.
        division_id -> Nullable<Int8>,
        /// Unit reference.
        unit_id -> Nullable<Int8>,
        /// Sequence reference.
        sequence_id -> Nullable<Int8>,
        /// Labor department reference.
        labor_department_id -> Nullable<Int8>,
        /// Nonconformance type reference.
        nonconformance_type_id -> Nullable<Int8>,
        /// Drawing number.
        drawing_number -> Nullable<Text>,
        /// Description.
        description -> Text,
        /// Status code at archive time.
        status -> Int2,
        /// Assigned user.
        assigned_user_id -> Nullable<Int8>,
        /// Reporting user.
        initiator_id -> Nullable<Int8>,
        /// Current-cycle corrective action.
        corrective_action -> Nullable<Text>,
        /// Current-cycle materials used.
        materials_used -> Nullable<Text>,
        /// Current-cycle estimated labor hours.
        estimated_labor_hours -> Nullable<Numeric>,
        /// Creation timestamp.
        opened_at -> Timestamptz,
        /// Close timestamp.
        closed_at -> Nullable<Timestamptz>,
        /// Latest reopen timestamp.
        reopened_at -> Nullable<Timestamptz>,
        /// Latest mutation timestamp.
        updated_at -> Timestamptz,
        /// Closure history snapshot.
        closure_history -> Jsonb,
        /// Archive timestamp.
        archived_at -> Timestamptz,
        /// Archiving user.
        archived_by -> Nullable<Int8>,
    }
}

diesel::joinable!(tickets -> work_orders (work_order_id));
diesel::joinable!(ticket_closures -> tickets (ticket_id));
diesel::joinable!(ticket_notes -> tickets (ticket_id));
diesel::joinable!(ticket_files -> tickets (ticket_id));

diesel::allow_tables_to_appear_in_same_query!(
    work_orders,
    users,
    tickets,
    ticket_closures,
    ticket_notes,
    ticket_files,
    archived_tickets,
);
