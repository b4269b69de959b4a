//! Closure data captured when a ticket is closed.

use super::{TicketDomainError, TicketId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Decimal places kept for labor hours.
const LABOR_HOURS_SCALE: u32 = 2;

/// Exclusive upper bound for labor hours.
const LABOR_HOURS_LIMIT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

/// Validated resolution data required to close a ticket.
///
/// The same values are carried on the ticket for the current cycle and copied
/// into the [`ClosureCycle`] appended at close time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    corrective_action: String,
    materials_used: String,
    estimated_labor_hours: Decimal,
}

impl Resolution {
    /// Validates the three closure fields.
    ///
    /// # Errors
    ///
    /// Returns [`TicketDomainError::MissingClosureField`] when a field is
    /// absent or blank, [`TicketDomainError::NegativeLaborHours`] when the
    /// hours are below zero, and [`TicketDomainError::LaborHoursOutOfRange`]
    /// when they carry more than two significant decimal places or reach
    /// one hundred million.
    pub fn new(
        corrective_action: Option<&str>,
        materials_used: Option<&str>,
        estimated_labor_hours: Option<Decimal>,
    ) -> Result<Self, TicketDomainError> {
        let action = required_text(corrective_action, "corrective action")?;
        let materials = required_text(materials_used, "materials used")?;
        let hours = estimated_labor_hours
            .ok_or(TicketDomainError::MissingClosureField("estimated labor hours"))?;
        if hours < Decimal::ZERO {
            return Err(TicketDomainError::NegativeLaborHours(hours));
        }
        if hours.normalize().scale() > LABOR_HOURS_SCALE || hours >= LABOR_HOURS_LIMIT {
            return Err(TicketDomainError::LaborHoursOutOfRange(hours));
        }

        Ok(Self {
            corrective_action: action,
            materials_used: materials,
            estimated_labor_hours: hours,
        })
    }

    /// Rebuilds a resolution from persisted columns without revalidation.
    #[must_use]
    pub const fn from_persisted(
        corrective_action: String,
        materials_used: String,
        estimated_labor_hours: Decimal,
    ) -> Self {
        Self {
            corrective_action,
            materials_used,
            estimated_labor_hours,
        }
    }

    /// Returns the corrective action taken.
    #[must_use]
    pub fn corrective_action(&self) -> &str {
        &self.corrective_action
    }

    /// Returns the materials consumed by the fix.
    #[must_use]
    pub fn materials_used(&self) -> &str {
        &self.materials_used
    }

    /// Returns the estimated labor hours.
    #[must_use]
    pub const fn estimated_labor_hours(&self) -> Decimal {
        self.estimated_labor_hours
    }
}

fn required_text(value: Option<&str>, field: &'static str) -> Result<String, TicketDomainError> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
        .ok_or(TicketDomainError::MissingClosureField(field))
}

/// One completed open-to-close period of a ticket.
///
/// Appended each time the ticket enters Closed and never edited afterwards;
/// a reopen starts a new period instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosureCycle {
    /// Ticket the cycle belongs to.
    pub ticket_id: TicketId,
    /// When the open or reopened period began.
    pub cycle_started_at: DateTime<Utc>,
    /// When the ticket was closed.
    pub closed_at: DateTime<Utc>,
    /// Resolution captured at close time.
    #[serde(flatten)]
    pub resolution: Resolution,
    /// User who closed the ticket, when known.
    pub closed_by: Option<UserId>,
}

/// Orders closure cycles newest first, as they are displayed.
///
/// `cycles` is expected in append order. Cycles closed at the same instant
/// keep the most recently appended one first.
pub fn sort_newest_first(cycles: &mut [ClosureCycle]) {
    cycles.reverse();
    cycles.sort_by(|left, right| right.closed_at.cmp(&left.closed_at));
}
