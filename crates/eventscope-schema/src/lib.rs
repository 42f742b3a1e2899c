//! Protobuf descriptor graph (descriptor set JSON → read-only index).
//!
//! This crate is the schema side of `eventscope`:
//!
//! - parse the JSON rendering of a `google.protobuf.FileDescriptorSet`
//!   (`buf build --as-file-descriptor-set -o descriptor.json`)
//! - resolve every field reference to a fully-qualified type name
//! - expose one file at a time as a [`SchemaUnit`], with lookups that reach
//!   across the whole [`SchemaGraph`]
//!
//! Nothing here validates the schema beyond what is needed to resolve type
//! references. Unknown descriptor keys are ignored.

pub mod builder;
pub mod descriptor;
pub mod error;
pub mod graph;

pub use builder::{camel_case, FileBuilder, MessageBuilder};
pub use descriptor::{FileDescriptorProto, FileDescriptorSet};
pub use error::SchemaLoadError;
pub use graph::{
    EnumDescriptor, EnumValueDescriptor, FieldDescriptor, FieldKind, MessageDescriptor,
    OneofDescriptor, ScalarType, SchemaGraph, SchemaUnit,
};
