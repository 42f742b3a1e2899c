//! Programmatic construction of descriptor protos.
//!
//! Builds the same [`FileDescriptorProto`] values the JSON loader reads, so a
//! graph assembled in code goes through exactly the same indexing path.
//! Referenced type names are fully qualified, without the leading `.`.
//!
//! ```
//! use eventscope_schema::{FileBuilder, ScalarType, SchemaGraph};
//!
//! let mut file = FileBuilder::new("events.proto", "demo");
//! file.message("Process").scalar("binary", ScalarType::String);
//! file.message("Exec").message_field("process", "demo.Process");
//! file.message("GetEventsResponse").oneof_message("event", "exec", "demo.Exec");
//!
//! let graph = SchemaGraph::from_files([file.build()]);
//! assert!(graph.find_message("demo.Exec").is_some());
//! ```

use crate::descriptor::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FieldLabel, FieldType, FileDescriptorProto, MessageOptions, OneofDescriptorProto,
};
use crate::graph::{qualify_type_name, ScalarType};

#[derive(Debug, Clone)]
pub struct FileBuilder {
    name: String,
    package: String,
    messages: Vec<MessageBuilder>,
    enums: Vec<EnumDescriptorProto>,
}

impl FileBuilder {
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            messages: Vec::new(),
            enums: Vec::new(),
        }
    }

    /// Append a top-level message and return it for further declarations.
    pub fn message(&mut self, name: &str) -> &mut MessageBuilder {
        let full_name = qualify_type_name(&self.package, name);
        self.messages.push(MessageBuilder::new(name, full_name));
        let last = self.messages.len() - 1;
        &mut self.messages[last]
    }

    pub fn enumeration(&mut self, name: &str, values: &[&str]) -> &mut Self {
        self.enums.push(enum_proto(name, values));
        self
    }

    pub fn build(self) -> FileDescriptorProto {
        FileDescriptorProto {
            name: Some(self.name),
            package: (!self.package.is_empty()).then_some(self.package),
            message_type: self.messages.into_iter().map(MessageBuilder::build).collect(),
            enum_type: self.enums,
            syntax: Some("proto3".to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MessageBuilder {
    full_name: String,
    proto: DescriptorProto,
    nested: Vec<MessageBuilder>,
}

impl MessageBuilder {
    fn new(name: &str, full_name: String) -> Self {
        Self {
            full_name,
            proto: DescriptorProto {
                name: Some(name.to_string()),
                ..DescriptorProto::default()
            },
            nested: Vec::new(),
        }
    }

    fn push_field(
        &mut self,
        name: &str,
        label: FieldLabel,
        typ: FieldType,
        type_name: Option<&str>,
        oneof_index: Option<i32>,
    ) -> &mut Self {
        let number = self.proto.field.len() as i32 + 1;
        self.proto.field.push(FieldDescriptorProto {
            name: Some(name.to_string()),
            number: Some(number),
            label: Some(label),
            typ: Some(typ),
            type_name: type_name.map(|t| format!(".{t}")),
            oneof_index,
            proto3_optional: None,
        });
        self
    }

    pub fn scalar(&mut self, name: &str, scalar: ScalarType) -> &mut Self {
        self.push_field(name, FieldLabel::Optional, scalar.into(), None, None)
    }

    pub fn message_field(&mut self, name: &str, type_name: &str) -> &mut Self {
        self.push_field(name, FieldLabel::Optional, FieldType::Message, Some(type_name), None)
    }

    pub fn repeated_message(&mut self, name: &str, type_name: &str) -> &mut Self {
        self.push_field(name, FieldLabel::Repeated, FieldType::Message, Some(type_name), None)
    }

    pub fn enum_field(&mut self, name: &str, type_name: &str) -> &mut Self {
        self.push_field(name, FieldLabel::Optional, FieldType::Enum, Some(type_name), None)
    }

    /// Add a message-typed variant to the oneof `oneof`, declaring the oneof
    /// on first use.
    pub fn oneof_message(&mut self, oneof: &str, name: &str, type_name: &str) -> &mut Self {
        let index = self.oneof_index(oneof);
        self.push_field(
            name,
            FieldLabel::Optional,
            FieldType::Message,
            Some(type_name),
            Some(index),
        )
    }

    /// Add a scalar variant to the oneof `oneof`.
    pub fn oneof_scalar(&mut self, oneof: &str, name: &str, scalar: ScalarType) -> &mut Self {
        let index = self.oneof_index(oneof);
        self.push_field(name, FieldLabel::Optional, scalar.into(), None, Some(index))
    }

    fn oneof_index(&mut self, oneof: &str) -> i32 {
        let existing = self
            .proto
            .oneof_decl
            .iter()
            .position(|o| o.name.as_deref() == Some(oneof));
        let index = existing.unwrap_or_else(|| {
            self.proto.oneof_decl.push(OneofDescriptorProto {
                name: Some(oneof.to_string()),
            });
            self.proto.oneof_decl.len() - 1
        });
        index as i32
    }

    /// Declare `map<key, value_message>` the way protoc lowers it: a repeated
    /// field over a synthetic nested `<Name>Entry` type.
    pub fn map_field(&mut self, name: &str, key: ScalarType, value_message: &str) -> &mut Self {
        let entry_name = map_entry_name(name);
        let entry_full_name = format!("{}.{entry_name}", self.full_name);
        {
            let entry = self.nested(&entry_name);
            entry.proto.options = Some(MessageOptions {
                map_entry: Some(true),
            });
            entry.scalar("key", key);
            entry.message_field("value", value_message);
        }
        self.push_field(
            name,
            FieldLabel::Repeated,
            FieldType::Message,
            Some(&entry_full_name),
            None,
        )
    }

    pub fn nested(&mut self, name: &str) -> &mut MessageBuilder {
        let full_name = format!("{}.{name}", self.full_name);
        self.nested.push(MessageBuilder::new(name, full_name));
        let last = self.nested.len() - 1;
        &mut self.nested[last]
    }

    pub fn nested_enum(&mut self, name: &str, values: &[&str]) -> &mut Self {
        self.proto.enum_type.push(enum_proto(name, values));
        self
    }

    fn build(self) -> DescriptorProto {
        let mut proto = self.proto;
        proto.nested_type = self.nested.into_iter().map(MessageBuilder::build).collect();
        proto
    }
}

fn enum_proto(name: &str, values: &[&str]) -> EnumDescriptorProto {
    EnumDescriptorProto {
        name: Some(name.to_string()),
        value: values
            .iter()
            .enumerate()
            .map(|(number, value)| EnumValueDescriptorProto {
                name: Some(value.to_string()),
                number: Some(number as i32),
            })
            .collect(),
    }
}

/// Go identifier for a proto name: `process_exec` → `ProcessExec`.
///
/// An `_` is dropped only before a lowercase letter, so `process_2` keeps it
/// (`Process_2`); a letter following digits starts a new word (`v2x` →
/// `V2X`). A `.` before a lowercase letter is dropped, any other `.` becomes
/// `_`, and a leading `_` becomes `X`.
pub fn camel_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let lower_at = |i: usize| chars.get(i).is_some_and(|c| c.is_ascii_lowercase());
    let mut out = String::with_capacity(name.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '.' if lower_at(i + 1) => {}
            '.' => out.push('_'),
            '_' if i == 0 || chars[i - 1] == '.' => out.push('X'),
            '_' if lower_at(i + 1) => {}
            c if c.is_ascii_digit() => out.push(c),
            c => {
                out.push(c.to_ascii_uppercase());
                while lower_at(i + 1) {
                    i += 1;
                    out.push(chars[i]);
                }
            }
        }
        i += 1;
    }
    out
}

/// protoc's map entry type name: `pod_labels` → `PodLabelsEntry`.
fn map_entry_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 5);
    let mut upper_next = true;
    for c in field.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out.push_str("Entry");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FileDescriptorSet;
    use crate::graph::SchemaGraph;

    #[test]
    fn camel_case_matches_generated_identifiers() {
        assert_eq!(camel_case("process_exec"), "ProcessExec");
        assert_eq!(camel_case("exit"), "Exit");
        assert_eq!(camel_case("process_kprobe_v2"), "ProcessKprobeV2");
        assert_eq!(camel_case("labels"), "Labels");
        assert_eq!(camel_case("process_2"), "Process_2");
        assert_eq!(camel_case("v2x"), "V2X");
        assert_eq!(camel_case("_private"), "XPrivate");
        assert_eq!(camel_case("a.b_c"), "ABC");
        assert_eq!(camel_case("ProcessExec"), "ProcessExec");
    }

    #[test]
    fn map_entries_use_the_protoc_entry_name() {
        assert_eq!(map_entry_name("pod_labels"), "PodLabelsEntry");
        assert_eq!(map_entry_name("labels_2"), "Labels2Entry");
    }

    #[test]
    fn oneof_variants_share_one_declaration() {
        let mut file = FileBuilder::new("a.proto", "a");
        file.message("Resp")
            .oneof_message("event", "exec", "a.Exec")
            .oneof_message("event", "exit", "a.Exit")
            .scalar("node_name", ScalarType::String);
        let proto = file.build();
        let resp = &proto.message_type[0];

        assert_eq!(resp.oneof_decl.len(), 1);
        assert_eq!(resp.field[0].oneof_index, Some(0));
        assert_eq!(resp.field[1].oneof_index, Some(0));
        assert_eq!(resp.field[2].oneof_index, None);
        assert_eq!(resp.field[2].number, Some(3));
        assert_eq!(resp.field[0].type_name.as_deref(), Some(".a.Exec"));
    }

    #[test]
    fn built_files_survive_a_json_round_trip() {
        let mut file = FileBuilder::new("a.proto", "a");
        file.message("Exec").enum_field("status", "a.Status");
        file.enumeration("Status", &["UNKNOWN", "RUNNING"]);
        let set = FileDescriptorSet {
            file: vec![file.build()],
        };

        let text = serde_json::to_string(&set).unwrap();
        assert!(text.contains(r#""typeName":".a.Status""#));
        let graph = SchemaGraph::from_json(&text).unwrap();
        let status = graph.find_enum("a.Status").unwrap();
        assert_eq!(status.values.len(), 2);
        assert_eq!(status.values[1].name, "RUNNING");
        assert_eq!(status.values[1].number, 1);
    }
}
