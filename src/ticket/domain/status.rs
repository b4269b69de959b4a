//! Ticket status and status filters.

use super::TicketDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ticket lifecycle status, stored and exchanged as its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum TicketStatus {
    /// Reported, not yet being worked.
    Open,
    /// Being worked by the assignee.
    InProgress,
    /// Resolved; resolution captured in a closure cycle.
    Closed,
}

impl TicketStatus {
    /// All statuses in code order.
    pub const ALL: [Self; 3] = [Self::Open, Self::InProgress, Self::Closed];

    /// Returns the numeric storage code.
    #[must_use]
    pub const fn code(self) -> i16 {
        match self {
            Self::Open => 0,
            Self::InProgress => 1,
            Self::Closed => 2,
        }
    }

    /// Returns the canonical name used in logs and audit entries.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Closed => "closed",
        }
    }

    /// Returns `true` when the ticket still needs work.
    #[must_use]
    pub const fn is_actionable(self) -> bool {
        matches!(self, Self::Open | Self::InProgress)
    }
}

impl TryFrom<i64> for TicketStatus {
    type Error = TicketDomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Open),
            1 => Ok(Self::InProgress),
            2 => Ok(Self::Closed),
            other => Err(TicketDomainError::UnknownStatusCode(other)),
        }
    }
}

impl TryFrom<i16> for TicketStatus {
    type Error = TicketDomainError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(value))
    }
}

impl From<TicketStatus> for i64 {
    fn from(status: TicketStatus) -> Self {
        Self::from(status.code())
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of statuses used to filter listings and aggregates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusFilter(Vec<TicketStatus>);

impl StatusFilter {
    /// Creates a filter from the given statuses, deduplicated and sorted.
    ///
    /// An empty input yields the default actionable filter.
    #[must_use]
    pub fn new(statuses: impl IntoIterator<Item = TicketStatus>) -> Self {
        let mut values: Vec<TicketStatus> = statuses.into_iter().collect();
        values.sort_unstable();
        values.dedup();
        if values.is_empty() {
            return Self::default();
        }
        Self(values)
    }

    /// Filter matching every status.
    #[must_use]
    pub fn all() -> Self {
        Self(TicketStatus::ALL.to_vec())
    }

    /// Parses a comma-separated list of status codes such as `"0,1"`.
    ///
    /// A missing or blank value yields the default `{Open, InProgress}`.
    ///
    /// # Errors
    ///
    /// Returns [`TicketDomainError::InvalidStatusFilter`] when a segment is
    /// not an integer and [`TicketDomainError::UnknownStatusCode`] when it is
    /// not a known status.
    pub fn parse(raw: Option<&str>) -> Result<Self, TicketDomainError> {
        let Some(text) = raw.map(str::trim).filter(|text| !text.is_empty()) else {
            return Ok(Self::default());
        };

        let statuses = text
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                let code = segment
                    .parse::<i64>()
                    .map_err(|_| TicketDomainError::InvalidStatusFilter(text.to_owned()))?;
                TicketStatus::try_from(code)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(statuses))
    }

    /// Returns the statuses in code order.
    #[must_use]
    pub fn statuses(&self) -> &[TicketStatus] {
        &self.0
    }

    /// Returns the numeric codes for storage queries.
    #[must_use]
    pub fn codes(&self) -> Vec<i16> {
        self.0.iter().map(|status| status.code()).collect()
    }

    /// Returns whether `status` passes the filter.
    #[must_use]
    pub fn matches(&self, status: TicketStatus) -> bool {
        self.0.contains(&status)
    }
}

impl Default for StatusFilter {
    fn default() -> Self {
        Self(vec![TicketStatus::Open, TicketStatus::InProgress])
    }
}
