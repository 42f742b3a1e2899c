//! Field set: message types reachable from the events through message-typed
//! fields, excluding the events themselves.

use std::collections::HashSet;

use eventscope_schema::{MessageDescriptor, SchemaUnit};

/// Resolve the field types of `unit` reachable from `events`, in declaration
/// order.
pub fn resolve_fields<'g>(
    unit: SchemaUnit<'g>,
    events: &[&'g MessageDescriptor],
) -> Vec<&'g MessageDescriptor> {
    let mut discovered: HashSet<&'g str> = HashSet::new();
    for &root in events {
        let reached = reachable_types(unit, root);
        tracing::trace!(root = %root.full_name, reached = reached.len(), "walked event");
        discovered.extend(reached);
    }

    let event_names: HashSet<&str> = events.iter().map(|e| e.full_name.as_str()).collect();
    let fields: Vec<&MessageDescriptor> = unit
        .messages()
        .filter(|m| {
            let name = m.full_name.as_str();
            discovered.contains(name) && !event_names.contains(name)
        })
        .collect();

    tracing::debug!(
        unit = %unit.name(),
        discovered = discovered.len(),
        fields = fields.len(),
        "resolved field closure"
    );
    fields
}

/// Names of every message type reachable from `root` through one or more
/// message-typed fields, in discovery order.
///
/// Each name is pushed on the worklist at most once, so the walk is bounded
/// by the number of distinct types even on cyclic schemas. `root` appears
/// only if it reaches itself. Types the graph cannot resolve are reported but
/// not expanded.
pub fn reachable_types<'g>(unit: SchemaUnit<'g>, root: &'g MessageDescriptor) -> Vec<&'g str> {
    let mut visited: HashSet<&'g str> = HashSet::new();
    let mut order = Vec::new();
    let mut worklist = vec![root];

    while let Some(message) = worklist.pop() {
        for field in &message.fields {
            let Some(target) = field.message_type() else {
                continue;
            };
            if !visited.insert(target) {
                continue;
            }
            order.push(target);
            match unit.find_message(target) {
                Some(next) => worklist.push(next),
                None => tracing::trace!(
                    field = %field.name,
                    type_name = %message.full_name,
                    target = %target,
                    "field type outside the descriptor set"
                ),
            }
        }
    }
    order
}
