//! Enum set: enums referenced directly by a field of an event or field type.

use std::collections::HashSet;

use eventscope_schema::{EnumDescriptor, MessageDescriptor, SchemaUnit};

/// Resolve the enums of `unit` used by `events` ∪ `fields`, in declaration
/// order. One hop only: enums have no fields to follow.
///
/// Map entry types are never part of `events` or `fields`, so an enum used
/// only as a map value is not listed.
pub fn resolve_enums<'g>(
    unit: SchemaUnit<'g>,
    events: &[&'g MessageDescriptor],
    fields: &[&'g MessageDescriptor],
) -> Vec<&'g EnumDescriptor> {
    let referenced: HashSet<&'g str> = events
        .iter()
        .chain(fields)
        .copied()
        .flat_map(|m: &'g MessageDescriptor| m.fields.iter())
        .filter_map(|f| f.enum_type())
        .collect();

    let enums: Vec<&EnumDescriptor> = unit
        .enums()
        .filter(|e| referenced.contains(e.full_name.as_str()))
        .collect();

    tracing::debug!(
        unit = %unit.name(),
        referenced = referenced.len(),
        enums = enums.len(),
        "resolved enum closure"
    );
    enums
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::resolve_events;
    use crate::fields::resolve_fields;
    use crate::fixtures::{enum_names, message_names, scenario_config, scenario_graph};
    use eventscope_schema::{FileBuilder, SchemaGraph};

    #[test]
    fn scenario_enums() {
        let graph = scenario_graph();
        let unit = graph.sole_unit().unwrap();
        let events = resolve_events(unit, &scenario_config()).unwrap();
        let fields = resolve_fields(unit, &events);
        let enums = resolve_enums(unit, &events, &fields);
        assert_eq!(enum_names(&enums), ["PodStatus"]);
    }

    #[test]
    fn enums_on_events_and_nested_enums_are_included() {
        let mut file = FileBuilder::new("a.proto", "a");
        file.enumeration("Unused", &["U0"]);
        file.enumeration("Action", &["A0"]);
        file.message("Policy").enum_field("action", "a.Action");
        {
            let exec = file.message("Exec");
            exec.nested_enum("Kind", &["K0"]);
            exec.enum_field("kind", "a.Exec.Kind")
                .message_field("policy", "a.Policy");
        }
        file.message("Resp").oneof_message("event", "exec", "a.Exec");
        let graph = SchemaGraph::from_files([file.build()]);
        let unit = graph.sole_unit().unwrap();

        let events = resolve_events(unit, &scenario_config()).unwrap();
        let fields = resolve_fields(unit, &events);
        let enums = resolve_enums(unit, &events, &fields);
        assert_eq!(enum_names(&enums), ["Action", "Kind"]);
    }

    #[test]
    fn enums_declared_elsewhere_are_not_listed() {
        let mut common = FileBuilder::new("common.proto", "common");
        common.enumeration("Level", &["L0"]);
        let mut file = FileBuilder::new("a.proto", "a");
        file.message("Exec").enum_field("level", "common.Level");
        file.message("Resp").oneof_message("event", "exec", "a.Exec");
        let graph = SchemaGraph::from_files([common.build(), file.build()]);
        let unit = graph.unit("a.proto").unwrap();

        let events = resolve_events(unit, &scenario_config()).unwrap();
        assert!(resolve_enums(unit, &events, &[]).is_empty());
    }

    #[test]
    fn map_values_reach_fields_but_not_enums() {
        let text = r#"{ "file": [{ "name": "a.proto", "package": "a",
            "enumType": [{ "name": "Status", "value": [{ "name": "S0", "number": 0 }] }],
            "messageType": [
                { "name": "Annot" },
                {
                    "name": "Exec",
                    "field": [
                        { "name": "statuses", "number": 1, "label": "LABEL_REPEATED",
                          "type": "TYPE_MESSAGE", "typeName": ".a.Exec.StatusesEntry" },
                        { "name": "annots", "number": 2, "label": "LABEL_REPEATED",
                          "type": "TYPE_MESSAGE", "typeName": ".a.Exec.AnnotsEntry" }
                    ],
                    "nestedType": [
                        { "name": "StatusesEntry", "options": { "mapEntry": true }, "field": [
                            { "name": "key", "number": 1, "type": "TYPE_STRING" },
                            { "name": "value", "number": 2, "type": "TYPE_ENUM", "typeName": ".a.Status" }
                        ] },
                        { "name": "AnnotsEntry", "options": { "mapEntry": true }, "field": [
                            { "name": "key", "number": 1, "type": "TYPE_STRING" },
                            { "name": "value", "number": 2, "type": "TYPE_MESSAGE", "typeName": ".a.Annot" }
                        ] }
                    ]
                },
                {
                    "name": "Resp",
                    "oneofDecl": [{ "name": "event" }],
                    "field": [{ "name": "exec", "number": 1, "type": "TYPE_MESSAGE",
                                "typeName": ".a.Exec", "oneofIndex": 0 }]
                }
            ]
        }] }"#;
        let graph = SchemaGraph::from_json(text).unwrap();
        let unit = graph.sole_unit().unwrap();

        let events = resolve_events(unit, &scenario_config()).unwrap();
        let fields = resolve_fields(unit, &events);
        let enums = resolve_enums(unit, &events, &fields);
        assert_eq!(message_names(&fields), ["Annot"]);
        assert!(enums.is_empty());
    }
}
