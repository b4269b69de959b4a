//! Work orders and their dashboard aggregate.

use super::WorkOrderId;
use serde::{Deserialize, Serialize};

/// Production job that tickets are filed against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrder {
    /// Store identifier.
    pub id: WorkOrderId,
    /// Human-facing work order number, the prefix of quality-ticket ids.
    pub number: String,
}

impl WorkOrder {
    /// Creates a work order value.
    #[must_use]
    pub fn new(id: WorkOrderId, number: impl Into<String>) -> Self {
        Self {
            id,
            number: number.into(),
        }
    }
}

/// Count of matching tickets for one work order.
///
/// Derived on demand; work orders without matching tickets never appear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderSummary {
    /// Work order identifier.
    pub work_order_id: WorkOrderId,
    /// Work order number.
    pub work_order_number: String,
    /// Number of tickets matching the status filter.
    pub open_count: u64,
}

/// Case-insensitive substring search on work order numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkOrderSearch(String);

impl WorkOrderSearch {
    /// Builds a search term; blank input yields `None`.
    #[must_use]
    pub fn new(raw: Option<&str>) -> Option<Self> {
        raw.map(str::trim)
            .filter(|text| !text.is_empty())
            .map(|text| Self(text.to_lowercase()))
    }

    /// Returns whether the work order number contains the term.
    #[must_use]
    pub fn matches(&self, number: &str) -> bool {
        number.to_lowercase().contains(&self.0)
    }

    /// Returns an `ILIKE` pattern with `%`, `_` and `\` escaped.
    #[must_use]
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.0.len() + 2);
        pattern.push('%');
        for ch in self.0.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(ch);
        }
        pattern.push('%');
        pattern
    }
}
