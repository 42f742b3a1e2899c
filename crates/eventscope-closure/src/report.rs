//! Serializable summary of a schema unit's closures.
//!
//! Emitters generate one artifact per listed type; the report is also what
//! the CLI prints with `--json`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosureReport {
    pub unit: String,
    pub entry_message: String,
    pub event_union: String,
    pub events: Vec<EventEntry>,
    /// Qualified names, declaration order.
    pub fields: Vec<String>,
    /// Qualified names, declaration order.
    pub enums: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEntry {
    pub name: String,
    pub full_name: String,
    /// Has a `process` field.
    pub process: bool,
    /// Has a `parent` field.
    pub parent: bool,
}

impl ClosureReport {
    pub fn artifact_count(&self) -> usize {
        self.events.len() + self.fields.len() + self.enums.len()
    }
}
