use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One stage's entry as the remote store holds it: the stage name plus the entry's fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteRecord {
    pub stage: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// A panel's remote document: stage-tagged records plus panel-wide data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelDocument {
    #[serde(default)]
    pub records: Vec<RemoteRecord>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub globals: Value,
}

impl PanelDocument {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.globals.is_null()
    }
}

/// Outcome of importing a remote document.
///
/// Orphaned and malformed records are dropped rather than failing the import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    /// Stage tags that matched no registered stage.
    pub orphaned: Vec<String>,
    /// Stage tags whose fields could not be decoded.
    pub malformed: Vec<String>,
    /// Stage tags that appeared more than once; the last record wins.
    pub duplicates: Vec<String>,
    pub globals_malformed: bool,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.orphaned.is_empty()
            && self.malformed.is_empty()
            && self.duplicates.is_empty()
            && !self.globals_malformed
    }
}
