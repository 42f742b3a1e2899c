//! Event set: the payload types of the entry message's discriminator union.

use std::collections::HashSet;

use eventscope_schema::{camel_case, FieldDescriptor, MessageDescriptor, SchemaUnit};

use crate::config::{ClosureConfig, WRAPPER_SEPARATOR};
use crate::error::SchemaShapeError;

/// Resolve the event types of `unit`, in declaration order.
///
/// Variants whose payload is not a message declared in `unit` are dropped:
/// the union may name types defined elsewhere.
pub fn resolve_events<'g>(
    unit: SchemaUnit<'g>,
    config: &ClosureConfig,
) -> Result<Vec<&'g MessageDescriptor>, SchemaShapeError> {
    let entry = unit
        .messages()
        .find(|m| m.name == config.entry_message)
        .ok_or_else(|| SchemaShapeError::EntryNotFound {
            entry: config.entry_message.clone(),
            unit: unit.name().to_string(),
        })?;

    let union = entry
        .oneof(&config.event_union)
        .ok_or_else(|| SchemaShapeError::UnionNotFound {
            entry: entry.full_name.clone(),
            union: config.event_union.clone(),
        })?;

    let candidates: HashSet<String> = entry
        .oneof_fields(union)
        .map(|variant| variant_payload(unit, variant))
        .collect();

    let events: Vec<&MessageDescriptor> = unit
        .messages()
        .filter(|m| candidates.contains(&m.full_name))
        .collect();

    if events.len() < candidates.len() {
        for name in &candidates {
            if !events.iter().any(|e| &e.full_name == name) {
                tracing::trace!(variant = %name, unit = %unit.name(), "union variant outside unit, skipped");
            }
        }
    }
    tracing::debug!(
        unit = %unit.name(),
        entry = %entry.full_name,
        variants = union.fields.len(),
        events = events.len(),
        "resolved event closure"
    );
    Ok(events)
}

/// Qualified payload type of one union variant.
///
/// Message-typed variants carry the payload type directly. Any other variant
/// falls back to the camel-cased variant name in the unit's package, the
/// bare part of its [`wrapper_ident`].
fn variant_payload(unit: SchemaUnit<'_>, variant: &FieldDescriptor) -> String {
    match variant.message_type() {
        Some(target) => target.to_string(),
        None => unit.qualify(&camel_case(&variant.name)),
    }
}

/// Generated identifier of a oneof variant wrapper, e.g.
/// `GetEventsResponse_ProcessExec` for variant `process_exec`.
pub fn wrapper_ident(host: &str, variant: &str) -> String {
    format!("{host}{WRAPPER_SEPARATOR}{}", camel_case(variant))
}

/// Inverse of [`wrapper_ident`]: the bare variant type name, or `None` if
/// `wrapper` was not generated for `host`.
pub fn strip_wrapper_prefix<'a>(host: &str, wrapper: &'a str) -> Option<&'a str> {
    wrapper
        .strip_prefix(host)?
        .strip_prefix(WRAPPER_SEPARATOR)
        .filter(|bare| !bare.is_empty())
}
