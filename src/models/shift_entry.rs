use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle for a roster entry. Assigned at clock-in, never reused
/// while the roster lives, so it stays valid across removals of other entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShiftId(pub u64);

impl fmt::Display for ShiftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ShiftId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse().map(ShiftId)
    }
}

/// Lifecycle position of an entry that is still on the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftState {
    /// Clocked in, no clock-out yet.
    Active,
    /// Clocked out locally, not yet acknowledged by the ledger.
    PendingSync,
}

impl ShiftState {
    pub fn label(&self) -> &'static str {
        match self {
            ShiftState::Active => "active",
            ShiftState::PendingSync => "pending sync",
        }
    }
}

/// One clock-in to clock-out interval for one named operator.
///
/// Timestamps are milliseconds since the Unix epoch. The serialized field
/// names (`clockIn`, `clockOut`) are the snapshot wire names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftEntry {
    #[serde(default)]
    pub id: ShiftId,
    pub name: String,
    #[serde(rename = "clockIn")]
    pub clock_in_at: i64,
    #[serde(rename = "clockOut", default, skip_serializing_if = "Option::is_none")]
    pub clock_out_at: Option<i64>,
}

impl ShiftEntry {
    pub fn new(id: ShiftId, name: impl Into<String>, clock_in_at: i64) -> Self {
        Self {
            id,
            name: name.into(),
            clock_in_at,
            clock_out_at: None,
        }
    }

    pub fn state(&self) -> ShiftState {
        if self.clock_out_at.is_some() {
            ShiftState::PendingSync
        } else {
            ShiftState::Active
        }
    }

    pub fn is_clocked_out(&self) -> bool {
        self.clock_out_at.is_some()
    }

    /// Elapsed milliseconds, or None while still clocked in.
    pub fn duration_ms(&self) -> Option<i64> {
        self.clock_out_at.map(|out| out - self.clock_in_at)
    }

    /// Entries read back from disk must still satisfy the model invariants.
    pub fn is_well_formed(&self) -> bool {
        !self.name.trim().is_empty() && self.clock_out_at.is_none_or(|out| out >= self.clock_in_at)
    }
}
