//! Resolved descriptor graph and the per-file schema unit view.
//!
//! Loading runs in two passes over the descriptor set:
//!
//! 1. collect every fully-qualified message and enum name, so relative and
//!    untyped field references can be resolved;
//! 2. build resolved descriptors and index them by qualified name.
//!
//! The graph is immutable once built; every accessor hands out shared borrows.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use crate::descriptor::{
    DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FieldLabel, FieldType,
    FileDescriptorProto, FileDescriptorSet,
};
use crate::error::SchemaLoadError;

// =============================================================================
// Descriptors
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Double,
    Float,
    Int64,
    Uint64,
    Int32,
    Fixed64,
    Fixed32,
    Bool,
    String,
    Bytes,
    Uint32,
    Sfixed32,
    Sfixed64,
    Sint32,
    Sint64,
}

impl ScalarType {
    /// `None` for the reference types (message, group, enum).
    pub fn from_field_type(typ: FieldType) -> Option<Self> {
        Some(match typ {
            FieldType::Double => ScalarType::Double,
            FieldType::Float => ScalarType::Float,
            FieldType::Int64 => ScalarType::Int64,
            FieldType::Uint64 => ScalarType::Uint64,
            FieldType::Int32 => ScalarType::Int32,
            FieldType::Fixed64 => ScalarType::Fixed64,
            FieldType::Fixed32 => ScalarType::Fixed32,
            FieldType::Bool => ScalarType::Bool,
            FieldType::String => ScalarType::String,
            FieldType::Bytes => ScalarType::Bytes,
            FieldType::Uint32 => ScalarType::Uint32,
            FieldType::Sfixed32 => ScalarType::Sfixed32,
            FieldType::Sfixed64 => ScalarType::Sfixed64,
            FieldType::Sint32 => ScalarType::Sint32,
            FieldType::Sint64 => ScalarType::Sint64,
            FieldType::Group | FieldType::Message | FieldType::Enum => return None,
        })
    }
}

impl From<ScalarType> for FieldType {
    fn from(scalar: ScalarType) -> Self {
        match scalar {
            ScalarType::Double => FieldType::Double,
            ScalarType::Float => FieldType::Float,
            ScalarType::Int64 => FieldType::Int64,
            ScalarType::Uint64 => FieldType::Uint64,
            ScalarType::Int32 => FieldType::Int32,
            ScalarType::Fixed64 => FieldType::Fixed64,
            ScalarType::Fixed32 => FieldType::Fixed32,
            ScalarType::Bool => FieldType::Bool,
            ScalarType::String => FieldType::String,
            ScalarType::Bytes => FieldType::Bytes,
            ScalarType::Uint32 => FieldType::Uint32,
            ScalarType::Sfixed32 => FieldType::Sfixed32,
            ScalarType::Sfixed64 => FieldType::Sfixed64,
            ScalarType::Sint32 => FieldType::Sint32,
            ScalarType::Sint64 => FieldType::Sint64,
        }
    }
}

/// What a field carries. References hold the fully-qualified target name
/// (no leading `.`); the target may live in another unit or outside the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Scalar(ScalarType),
    Message(String),
    Enum(String),
}

#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub number: i32,
    pub repeated: bool,
    pub kind: FieldKind,
    /// Index into the owning message's `oneofs`.
    pub oneof_index: Option<usize>,
}

impl FieldDescriptor {
    pub fn message_type(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Message(name) => Some(name),
            _ => None,
        }
    }

    pub fn enum_type(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Enum(name) => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OneofDescriptor {
    pub name: String,
    /// Indices into the owning message's `fields`, in declaration order.
    pub fields: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct MessageDescriptor {
    pub name: String,
    pub full_name: String,
    pub fields: Vec<FieldDescriptor>,
    pub oneofs: Vec<OneofDescriptor>,
    /// Synthetic `map<K, V>` entry type.
    pub map_entry: bool,
}

impl MessageDescriptor {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn oneof(&self, name: &str) -> Option<&OneofDescriptor> {
        self.oneofs.iter().find(|o| o.name == name)
    }

    pub fn oneof_fields<'a>(
        &'a self,
        oneof: &'a OneofDescriptor,
    ) -> impl Iterator<Item = &'a FieldDescriptor> + 'a {
        oneof.fields.iter().filter_map(move |&i| self.fields.get(i))
    }
}

#[derive(Debug, Clone)]
pub struct EnumValueDescriptor {
    pub name: String,
    pub number: i32,
}

#[derive(Debug, Clone)]
pub struct EnumDescriptor {
    pub name: String,
    pub full_name: String,
    pub values: Vec<EnumValueDescriptor>,
}

// =============================================================================
// Graph
// =============================================================================

#[derive(Debug, Clone)]
struct UnitData {
    name: String,
    package: String,
    messages: Vec<MessageDescriptor>,
    enums: Vec<EnumDescriptor>,
}

/// Every message and enum of one descriptor set, indexed by qualified name.
#[derive(Debug, Clone, Default)]
pub struct SchemaGraph {
    units: Vec<UnitData>,
    messages: HashMap<String, (usize, usize)>,
    enums: HashMap<String, (usize, usize)>,
}

impl SchemaGraph {
    /// Parse the JSON rendering of a `FileDescriptorSet`.
    pub fn from_json(text: &str) -> Result<Self, SchemaLoadError> {
        let set: FileDescriptorSet = serde_json::from_str(text)?;
        Ok(Self::from_descriptor_set(&set))
    }

    pub fn from_files(files: impl IntoIterator<Item = FileDescriptorProto>) -> Self {
        Self::from_descriptor_set(&FileDescriptorSet {
            file: files.into_iter().collect(),
        })
    }

    /// Index a decoded descriptor set. Indexing never fails: fields that
    /// cannot be typed are dropped with a warning.
    pub fn from_descriptor_set(set: &FileDescriptorSet) -> Self {
        let mut names = TypeNames::default();
        for file in &set.file {
            let package = file.package.clone().unwrap_or_default();
            for m in &file.message_type {
                names.index_message(&package, m, Vec::new());
            }
            for e in &file.enum_type {
                if let Some(name) = &e.name {
                    names.enums.insert(qualify_type_name(&package, name));
                }
            }
        }

        let mut graph = SchemaGraph::default();
        for file in &set.file {
            let package = file.package.clone().unwrap_or_default();
            let mut messages = Vec::new();
            let mut nested_enums = Vec::new();
            for m in &file.message_type {
                build_message(
                    &names,
                    &package,
                    Vec::new(),
                    m,
                    &mut messages,
                    &mut nested_enums,
                );
            }
            let mut enums: Vec<EnumDescriptor> = file
                .enum_type
                .iter()
                .filter_map(|e| {
                    let name = e.name.as_deref()?;
                    Some(build_enum(qualify_type_name(&package, name), e))
                })
                .collect();
            enums.extend(nested_enums);

            graph.register_unit(
                file.name.clone().unwrap_or_else(|| "<unknown>".to_string()),
                package,
                messages,
                enums,
            );
        }

        tracing::debug!(
            units = graph.units.len(),
            messages = graph.messages.len(),
            enums = graph.enums.len(),
            "indexed descriptor set"
        );
        graph
    }

    fn register_unit(
        &mut self,
        name: String,
        package: String,
        messages: Vec<MessageDescriptor>,
        enums: Vec<EnumDescriptor>,
    ) {
        let unit_idx = self.units.len();
        let mut unit = UnitData {
            name,
            package,
            messages: Vec::with_capacity(messages.len()),
            enums: Vec::with_capacity(enums.len()),
        };

        for message in messages {
            match self.messages.entry(message.full_name.clone()) {
                Entry::Occupied(_) => tracing::warn!(
                    type_name = %message.full_name,
                    unit = %unit.name,
                    "duplicate message definition ignored"
                ),
                Entry::Vacant(slot) => {
                    slot.insert((unit_idx, unit.messages.len()));
                    unit.messages.push(message);
                }
            }
        }
        for e in enums {
            match self.enums.entry(e.full_name.clone()) {
                Entry::Occupied(_) => tracing::warn!(
                    enum_name = %e.full_name,
                    unit = %unit.name,
                    "duplicate enum definition ignored"
                ),
                Entry::Vacant(slot) => {
                    slot.insert((unit_idx, unit.enums.len()));
                    unit.enums.push(e);
                }
            }
        }

        self.units.push(unit);
    }

    /// Look up a message anywhere in the graph. Accepts a leading `.`.
    pub fn find_message(&self, name: &str) -> Option<&MessageDescriptor> {
        let key = name.strip_prefix('.').unwrap_or(name);
        self.messages
            .get(key)
            .map(|&(unit, idx)| &self.units[unit].messages[idx])
    }

    /// Look up an enum anywhere in the graph. Accepts a leading `.`.
    pub fn find_enum(&self, name: &str) -> Option<&EnumDescriptor> {
        let key = name.strip_prefix('.').unwrap_or(name);
        self.enums
            .get(key)
            .map(|&(unit, idx)| &self.units[unit].enums[idx])
    }

    pub fn unit(&self, name: &str) -> Result<SchemaUnit<'_>, SchemaLoadError> {
        self.units
            .iter()
            .position(|u| u.name == name)
            .map(|index| SchemaUnit { graph: self, index })
            .ok_or_else(|| SchemaLoadError::UnknownUnit(name.to_string()))
    }

    /// The only unit, when the set holds exactly one file.
    pub fn sole_unit(&self) -> Option<SchemaUnit<'_>> {
        (self.units.len() == 1).then_some(SchemaUnit {
            graph: self,
            index: 0,
        })
    }

    pub fn units(&self) -> impl Iterator<Item = SchemaUnit<'_>> + '_ {
        (0..self.units.len()).map(move |index| SchemaUnit { graph: self, index })
    }
}

// =============================================================================
// Schema unit
// =============================================================================

/// Read-only view of one file of a [`SchemaGraph`].
///
/// Iteration follows declaration order: top-level messages in file order,
/// each followed by its nested messages. Map entry types are skipped during
/// iteration but still resolve through [`SchemaUnit::find_message`].
#[derive(Debug, Clone, Copy)]
pub struct SchemaUnit<'g> {
    graph: &'g SchemaGraph,
    index: usize,
}

impl<'g> SchemaUnit<'g> {
    fn data(&self) -> &'g UnitData {
        &self.graph.units[self.index]
    }

    pub fn name(&self) -> &'g str {
        &self.data().name
    }

    pub fn package(&self) -> &'g str {
        &self.data().package
    }

    pub fn graph(&self) -> &'g SchemaGraph {
        self.graph
    }

    pub fn messages(&self) -> impl Iterator<Item = &'g MessageDescriptor> + 'g {
        self.data().messages.iter().filter(|m| !m.map_entry)
    }

    pub fn enums(&self) -> impl Iterator<Item = &'g EnumDescriptor> + 'g {
        self.data().enums.iter()
    }

    pub fn find_message(&self, name: &str) -> Option<&'g MessageDescriptor> {
        self.graph.find_message(name)
    }

    pub fn find_enum(&self, name: &str) -> Option<&'g EnumDescriptor> {
        self.graph.find_enum(name)
    }

    /// Qualify a bare type name with this unit's package.
    pub fn qualify(&self, name: &str) -> String {
        qualify_type_name(self.package(), name)
    }
}

// =============================================================================
// Indexing helpers
// =============================================================================

#[derive(Debug, Default)]
struct TypeNames {
    messages: HashSet<String>,
    enums: HashSet<String>,
}

impl TypeNames {
    fn index_message(&mut self, package: &str, m: &DescriptorProto, mut prefix: Vec<String>) {
        let Some(name) = m.name.clone() else {
            return;
        };
        prefix.push(name);
        self.messages
            .insert(qualify_nested_type_name(package, &prefix));

        for e in &m.enum_type {
            if let Some(en) = &e.name {
                self.enums.insert(qualify_nested_type_name(
                    package,
                    &[prefix.clone(), vec![en.clone()]].concat(),
                ));
            }
        }
        for nested in &m.nested_type {
            self.index_message(package, nested, prefix.clone());
        }
    }

    fn contains(&self, name: &str) -> bool {
        self.messages.contains(name) || self.enums.contains(name)
    }

    /// Resolve a field's `typeName` from the scope of the declaring message,
    /// innermost scope first. Unknown relative names are returned unchanged.
    fn resolve(&self, scope: &str, name: &str) -> String {
        if let Some(absolute) = name.strip_prefix('.') {
            return absolute.to_string();
        }
        let mut scope = scope;
        loop {
            let candidate = qualify_type_name(scope, name);
            if self.contains(&candidate) {
                return candidate;
            }
            if scope.is_empty() {
                return name.to_string();
            }
            scope = scope.rfind('.').map(|i| &scope[..i]).unwrap_or("");
        }
    }
}

fn build_message(
    names: &TypeNames,
    package: &str,
    mut prefix: Vec<String>,
    m: &DescriptorProto,
    messages: &mut Vec<MessageDescriptor>,
    enums: &mut Vec<EnumDescriptor>,
) {
    let Some(name) = m.name.clone() else {
        return;
    };
    prefix.push(name.clone());
    let full_name = qualify_nested_type_name(package, &prefix);

    let mut oneofs: Vec<OneofDescriptor> = m
        .oneof_decl
        .iter()
        .map(|o| OneofDescriptor {
            name: o.name.clone().unwrap_or_default(),
            fields: Vec::new(),
        })
        .collect();
    let mut synthetic = vec![false; oneofs.len()];

    let mut fields = Vec::with_capacity(m.field.len());
    for f in &m.field {
        let Some(field) = build_field(names, &full_name, f) else {
            tracing::warn!(
                type_name = %full_name,
                field = f.name.as_deref().unwrap_or_default(),
                "dropping field without a usable type"
            );
            continue;
        };
        if let Some(idx) = field.oneof_index {
            if let Some(oneof) = oneofs.get_mut(idx) {
                oneof.fields.push(fields.len());
                if f.proto3_optional == Some(true) {
                    synthetic[idx] = true;
                }
            }
        }
        fields.push(field);
    }

    // proto3 `optional` wraps a single field in a synthetic oneof; it is not a union.
    let mut remap = Vec::with_capacity(oneofs.len());
    let mut kept = Vec::with_capacity(oneofs.len());
    for (oneof, is_synthetic) in oneofs.into_iter().zip(synthetic) {
        if is_synthetic {
            remap.push(None);
        } else {
            remap.push(Some(kept.len()));
            kept.push(oneof);
        }
    }
    for field in &mut fields {
        field.oneof_index = field.oneof_index.and_then(|i| remap.get(i).copied().flatten());
    }

    messages.push(MessageDescriptor {
        name,
        full_name,
        fields,
        oneofs: kept,
        map_entry: m.is_map_entry(),
    });

    for e in &m.enum_type {
        if let Some(en) = &e.name {
            let full = qualify_nested_type_name(package, &[prefix.clone(), vec![en.clone()]].concat());
            enums.push(build_enum(full, e));
        }
    }
    for nested in &m.nested_type {
        build_message(names, package, prefix.clone(), nested, messages, enums);
    }
}

/// `None` for a reference field without a `typeName`, or a field with
/// neither `type` nor `typeName`.
fn build_field(names: &TypeNames, scope: &str, f: &FieldDescriptorProto) -> Option<FieldDescriptor> {
    let target = f.type_name.as_deref().map(|t| names.resolve(scope, t));

    let kind = match (f.typ, target) {
        (Some(FieldType::Message | FieldType::Group), Some(t)) => FieldKind::Message(t),
        (Some(FieldType::Enum), Some(t)) => FieldKind::Enum(t),
        (Some(typ), _) => FieldKind::Scalar(ScalarType::from_field_type(typ)?),
        (None, Some(t)) if names.enums.contains(&t) => FieldKind::Enum(t),
        (None, Some(t)) => FieldKind::Message(t),
        (None, None) => return None,
    };

    Some(FieldDescriptor {
        name: f.name.clone().unwrap_or_default(),
        number: f.number.unwrap_or_default(),
        repeated: f.label == Some(FieldLabel::Repeated),
        kind,
        oneof_index: f.oneof_index.and_then(|i| usize::try_from(i).ok()),
    })
}

fn build_enum(full_name: String, e: &EnumDescriptorProto) -> EnumDescriptor {
    EnumDescriptor {
        name: e.name.clone().unwrap_or_default(),
        full_name,
        values: e
            .value
            .iter()
            .map(|v| EnumValueDescriptor {
                name: v.name.clone().unwrap_or_default(),
                number: v.number.unwrap_or_default(),
            })
            .collect(),
    }
}

pub(crate) fn qualify_type_name(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{package}.{name}")
    }
}

fn qualify_nested_type_name(package: &str, parts: &[String]) -> String {
    let name = parts.join(".");
    qualify_type_name(package, &name)
}
