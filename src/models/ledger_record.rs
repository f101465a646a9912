use super::shift_entry::ShiftEntry;
use crate::utils::time::{format_duration, format_local_timestamp};

/// Row appended to the ledger for one completed shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRecord {
    pub name: String,
    pub clock_in_at: i64,
    pub clock_out_at: i64,
    pub formatted_duration: String,
}

impl LedgerRecord {
    /// Build the record for a clocked-out entry; None while still active.
    pub fn from_entry(entry: &ShiftEntry) -> Option<Self> {
        let out = entry.clock_out_at?;
        Some(Self {
            name: entry.name.clone(),
            clock_in_at: entry.clock_in_at,
            clock_out_at: out,
            formatted_duration: format_duration(out - entry.clock_in_at),
        })
    }

    /// Positional cells: name, clock in, clock out, duration.
    pub fn to_row(&self) -> [String; 4] {
        [
            self.name.clone(),
            format_local_timestamp(self.clock_in_at),
            format_local_timestamp(self.clock_out_at),
            self.formatted_duration.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::shift_entry::ShiftId;

    #[test]
    fn active_entry_has_no_record() {
        let e = ShiftEntry::new(ShiftId(1), "Ada", 0);
        assert!(LedgerRecord::from_entry(&e).is_none());
    }

    #[test]
    fn record_carries_formatted_duration() {
        let mut e = ShiftEntry::new(ShiftId(1), "Ada", 0);
        e.clock_out_at = Some(3_723_000);
        let rec = LedgerRecord::from_entry(&e).expect("record");

        assert_eq!(rec.formatted_duration, "01:02:03");
        let row = rec.to_row();
        assert_eq!(row[0], "Ada");
        assert_eq!(row[3], "01:02:03");
    }
}
