use serde::{Deserialize, Serialize};

/// Reference to the ledger spreadsheet, as returned by the file picker.
/// `id == None` means no sheet is configured and no append may be attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadsheetRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
}

impl SpreadsheetRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
        }
    }

    /// The `{id: null, name: ''}` reference.
    pub fn unset() -> Self {
        Self::default()
    }

    /// Configured id, ignoring blank strings left behind by hand edits.
    pub fn sheet_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.trim().is_empty())
    }

    pub fn is_selected(&self) -> bool {
        self.sheet_id().is_some()
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() { "None" } else { &self.name }
    }
}

/// Result of probing a configured spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetValidity {
    Valid,
    Invalid,
}
