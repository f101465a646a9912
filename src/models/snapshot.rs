use super::shift_entry::ShiftEntry;
use super::spreadsheet::SpreadsheetRef;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Everything that survives a restart: the roster plus the two settings.
///
/// Wire shape: `{ "users": [...], "dark": bool, "spreadsheet": {"id", "name"} }`.
/// Reading is lenient so older, partial or hand-edited snapshots still load:
/// missing, null or mistyped `dark`/`spreadsheet` fall back to defaults, and
/// a `users` element that does not parse is set aside in `unreadable`
/// instead of failing the whole load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSnapshot")]
pub struct PersistedSnapshot {
    pub users: Vec<ShiftEntry>,
    pub dark: bool,
    pub spreadsheet: SpreadsheetRef,
    /// Raw JSON of `users` elements that could not be read. Never written back.
    #[serde(skip)]
    pub unreadable: Vec<String>,
}

#[derive(Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    users: Option<Vec<Value>>,
    #[serde(default)]
    dark: Option<Value>,
    #[serde(default)]
    spreadsheet: Option<Value>,
}

impl From<RawSnapshot> for PersistedSnapshot {
    fn from(raw: RawSnapshot) -> Self {
        let mut users = Vec::new();
        let mut unreadable = Vec::new();
        for value in raw.users.unwrap_or_default() {
            match ShiftEntry::deserialize(&value) {
                Ok(entry) => users.push(entry),
                Err(_) => unreadable.push(value.to_string()),
            }
        }

        Self {
            users,
            dark: raw.dark.and_then(|v| v.as_bool()).unwrap_or(false),
            spreadsheet: raw
                .spreadsheet
                .and_then(|v| SpreadsheetRef::deserialize(&v).ok())
                .unwrap_or_default(),
            unreadable,
        }
    }
}

impl PersistedSnapshot {
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
