//! Identifier types for the ticket domain.
//!
//! Every record owned by the relational store is keyed by a positive
//! `BIGINT`; the newtypes keep a ticket id from being passed where a work
//! order id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw store identifier.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw store identifier.
            #[must_use]
            pub const fn value(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

row_id!(
    /// Internal identifier of a ticket, assigned by the store.
    TicketId
);
row_id!(
    /// Identifier of a production work order.
    WorkOrderId
);
row_id!(
    /// Identifier of an application user.
    UserId
);
row_id!(
    /// Identifier of a division.
    DivisionId
);
row_id!(
    /// Identifier of a unit within a work order.
    UnitId
);
row_id!(
    /// Identifier of a manufacturing sequence.
    SequenceId
);
row_id!(
    /// Identifier of a labor department.
    LaborDepartmentId
);
row_id!(
    /// Identifier of a nonconformance type.
    NonconformanceTypeId
);
row_id!(
    /// Identifier of a ticket note.
    NoteId
);
