//! Structural anchors of the closure.
//!
//! The entry message and its discriminator union are fixed for a generator
//! build; [`ClosureConfig`] exists so tests and embedders can point the
//! resolvers at differently named anchors.

use serde::Serialize;

/// Message whose discriminator union lists every event type.
pub const DEFAULT_ENTRY_MESSAGE: &str = "GetEventsResponse";

/// Name of the oneof on the entry message that carries the events.
pub const DEFAULT_EVENT_UNION: &str = "event";

/// Joins the host message and the camel-cased variant name in generated
/// oneof wrapper identifiers: `GetEventsResponse` + `_` + `ProcessExec`.
pub const WRAPPER_SEPARATOR: &str = "_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClosureConfig {
    /// Simple (unqualified) name of the entry message.
    pub entry_message: String,
    pub event_union: String,
}

impl ClosureConfig {
    pub fn new(entry_message: impl Into<String>, event_union: impl Into<String>) -> Self {
        Self {
            entry_message: entry_message.into(),
            event_union: event_union.into(),
        }
    }
}

impl Default for ClosureConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ENTRY_MESSAGE, DEFAULT_EVENT_UNION)
    }
}
