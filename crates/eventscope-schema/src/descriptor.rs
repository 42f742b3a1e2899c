//! Descriptor set JSON (subset).
//!
//! These types mirror the JSON rendering of `google.protobuf.FileDescriptorSet`
//! produced by `buf build --as-file-descriptor-set -o descriptor.json`. Only the
//! parts needed to index messages, enums, fields and oneofs are modelled;
//! everything else (services, options, source info) is ignored on input.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileDescriptorSet {
    #[serde(default)]
    pub file: Vec<FileDescriptorProto>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptorProto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub message_type: Vec<DescriptorProto>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_type: Vec<EnumDescriptorProto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syntax: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptorProto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field: Vec<FieldDescriptorProto>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nested_type: Vec<DescriptorProto>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_type: Vec<EnumDescriptorProto>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub oneof_decl: Vec<OneofDescriptorProto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<MessageOptions>,
}

impl DescriptorProto {
    pub fn is_map_entry(&self) -> bool {
        self.options
            .as_ref()
            .and_then(|o| o.map_entry)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_entry: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OneofDescriptorProto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptorProto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<FieldLabel>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub typ: Option<FieldType>,
    /// Referenced type for message/enum fields. Fully-qualified names start
    /// with `.`; anything else is relative to the enclosing scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oneof_index: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proto3_optional: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldLabel {
    #[serde(rename = "LABEL_OPTIONAL")]
    Optional,
    #[serde(rename = "LABEL_REQUIRED")]
    Required,
    #[serde(rename = "LABEL_REPEATED")]
    Repeated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    #[serde(rename = "TYPE_DOUBLE")]
    Double,
    #[serde(rename = "TYPE_FLOAT")]
    Float,
    #[serde(rename = "TYPE_INT64")]
    Int64,
    #[serde(rename = "TYPE_UINT64")]
    Uint64,
    #[serde(rename = "TYPE_INT32")]
    Int32,
    #[serde(rename = "TYPE_FIXED64")]
    Fixed64,
    #[serde(rename = "TYPE_FIXED32")]
    Fixed32,
    #[serde(rename = "TYPE_BOOL")]
    Bool,
    #[serde(rename = "TYPE_STRING")]
    String,
    #[serde(rename = "TYPE_GROUP")]
    Group,
    #[serde(rename = "TYPE_MESSAGE")]
    Message,
    #[serde(rename = "TYPE_BYTES")]
    Bytes,
    #[serde(rename = "TYPE_UINT32")]
    Uint32,
    #[serde(rename = "TYPE_ENUM")]
    Enum,
    #[serde(rename = "TYPE_SFIXED32")]
    Sfixed32,
    #[serde(rename = "TYPE_SFIXED64")]
    Sfixed64,
    #[serde(rename = "TYPE_SINT32")]
    Sint32,
    #[serde(rename = "TYPE_SINT64")]
    Sint64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnumDescriptorProto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value: Vec<EnumValueDescriptorProto>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnumValueDescriptorProto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_buf_style_field_json() {
        let text = r#"{
            "name": "pod",
            "number": 3,
            "label": "LABEL_OPTIONAL",
            "type": "TYPE_MESSAGE",
            "typeName": ".tetragon.Pod",
            "jsonName": "pod"
        }"#;
        let field: FieldDescriptorProto = serde_json::from_str(text).unwrap();
        assert_eq!(field.name.as_deref(), Some("pod"));
        assert_eq!(field.typ, Some(FieldType::Message));
        assert_eq!(field.label, Some(FieldLabel::Optional));
        assert_eq!(field.type_name.as_deref(), Some(".tetragon.Pod"));
        assert_eq!(field.oneof_index, None);
    }

    #[test]
    fn map_entry_option_is_read() {
        let text = r#"{ "name": "LabelsEntry", "options": { "mapEntry": true } }"#;
        let msg: DescriptorProto = serde_json::from_str(text).unwrap();
        assert!(msg.is_map_entry());

        let plain: DescriptorProto = serde_json::from_str(r#"{ "name": "Pod" }"#).unwrap();
        assert!(!plain.is_map_entry());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let text = r#"{
            "file": [{
                "name": "a.proto",
                "package": "a",
                "service": [{ "name": "Svc" }],
                "sourceCodeInfo": { "location": [] },
                "options": { "goPackage": "example.com/a" }
            }]
        }"#;
        let set: FileDescriptorSet = serde_json::from_str(text).unwrap();
        assert_eq!(set.file.len(), 1);
        assert_eq!(set.file[0].package.as_deref(), Some("a"));
    }
}
