//! Event closures over a protobuf schema unit.
//!
//! Starting from an entry message (`GetEventsResponse`) and its discriminator
//! union (`event`), this crate computes three disjoint, declaration-ordered
//! sets that drive code generation:
//!
//! - **events**: the payload types of the union's variants,
//! - **fields**: message types reachable from the events through
//!   message-typed fields (events excluded),
//! - **enums**: enum types referenced by a field of an event or field type.
//!
//! Each set consumes the previous one. [`ClosureContext`] computes them lazily,
//! once per schema load, and is safe to share between threads:
//!
//! ```
//! use eventscope_closure::ClosureContext;
//! use eventscope_schema::{FileBuilder, ScalarType, SchemaGraph};
//!
//! let mut file = FileBuilder::new("events.proto", "demo");
//! file.message("Process").scalar("binary", ScalarType::String);
//! file.message("Exec").message_field("process", "demo.Process");
//! file.message("GetEventsResponse").oneof_message("event", "exec", "demo.Exec");
//! let graph = SchemaGraph::from_files([file.build()]);
//!
//! let ctx = ClosureContext::new(graph.sole_unit().unwrap());
//! assert_eq!(ctx.events().unwrap()[0].name, "Exec");
//! assert_eq!(ctx.fields().unwrap()[0].name, "Process");
//! assert!(ctx.enums().unwrap().is_empty());
//! ```
//!
//! Only the two anchors are checked; everything else unresolvable is skipped.

pub mod config;
pub mod context;
pub mod enums;
pub mod error;
pub mod events;
pub mod fields;
pub mod predicates;
pub mod report;

#[cfg(test)]
mod fixtures;

pub use config::{ClosureConfig, DEFAULT_ENTRY_MESSAGE, DEFAULT_EVENT_UNION, WRAPPER_SEPARATOR};
pub use context::{ClosureContext, EnumSet, MessageSet};
pub use enums::resolve_enums;
pub use error::SchemaShapeError;
pub use events::{resolve_events, strip_wrapper_prefix, wrapper_ident};
pub use fields::{reachable_types, resolve_fields};
pub use predicates::{has_field, is_parent_event, is_process_event};
pub use report::{ClosureReport, EventEntry};
