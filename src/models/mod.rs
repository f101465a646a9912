pub mod ledger_record;
pub mod shift_entry;
pub mod snapshot;
pub mod spreadsheet;
