//! Human-readable quality-ticket identifiers.

use super::TicketDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum number of digits in the sequence part of an identifier.
pub const SEQUENCE_WIDTH: usize = 3;

/// Quality-ticket identifier in `<workOrderNumber>-<sequence>` form.
///
/// The sequence is zero-padded to [`SEQUENCE_WIDTH`] digits and widens past
/// 999 instead of wrapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QualityTicketId(String);

impl QualityTicketId {
    /// Composes the identifier for the `sequence`-th ticket of a work order.
    ///
    /// # Errors
    ///
    /// Returns [`TicketDomainError::InvalidWorkOrderNumber`] when the number is
    /// blank or contains whitespace.
    pub fn compose(work_order_number: &str, sequence: u32) -> Result<Self, TicketDomainError> {
        let number = work_order_number.trim();
        if number.is_empty() || number.chars().any(char::is_whitespace) {
            return Err(TicketDomainError::InvalidWorkOrderNumber(
                work_order_number.to_owned(),
            ));
        }
        Ok(Self(format!(
            "{number}-{sequence:0width$}",
            width = SEQUENCE_WIDTH
        )))
    }

    /// Parses a stored identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TicketDomainError::InvalidQualityTicketId`] when the value has
    /// no numeric suffix of at least [`SEQUENCE_WIDTH`] digits.
    pub fn parse(value: impl Into<String>) -> Result<Self, TicketDomainError> {
        let raw = value.into();
        let valid = raw.rsplit_once('-').is_some_and(|(number, sequence)| {
            !number.is_empty()
                && sequence.len() >= SEQUENCE_WIDTH
                && sequence.chars().all(|ch| ch.is_ascii_digit())
        });
        if !valid {
            return Err(TicketDomainError::InvalidQualityTicketId(raw));
        }
        Ok(Self(raw))
    }

    /// Returns the work order number part.
    #[must_use]
    pub fn work_order_number(&self) -> &str {
        self.0
            .rsplit_once('-')
            .map_or(self.0.as_str(), |(number, _)| number)
    }

    /// Returns the numeric sequence part.
    #[must_use]
    pub fn sequence(&self) -> Option<u32> {
        self.0
            .rsplit_once('-')
            .and_then(|(_, sequence)| sequence.parse().ok())
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for QualityTicketId {
    type Error = TicketDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<QualityTicketId> for String {
    fn from(value: QualityTicketId) -> Self {
        value.0
    }
}

impl AsRef<str> for QualityTicketId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for QualityTicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Picks the sequence for a new ticket of a work order.
///
/// Proposes `active_count + 1` and advances past any sequence `is_taken`
/// reports, which happens once archived tickets have left gaps in the active
/// count.
///
/// # Errors
///
/// Propagates errors from `is_taken`.
pub fn next_sequence<E>(
    active_count: u32,
    mut is_taken: impl FnMut(u32) -> Result<bool, E>,
) -> Result<u32, E> {
    let mut candidate = active_count.saturating_add(1);
    while is_taken(candidate)? {
        candidate = candidate.saturating_add(1);
    }
    Ok(candidate)
}
