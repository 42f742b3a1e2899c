use thiserror::Error;

/// The schema lacks one of the two anchors the closure is defined by.
///
/// Both variants are fatal for the current schema load: the graph is
/// immutable, so retrying yields the same result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaShapeError {
    #[error("entry message `{entry}` not found in `{unit}`")]
    EntryNotFound { entry: String, unit: String },

    #[error("event union `{union}` not found on `{entry}`")]
    UnionNotFound { entry: String, union: String },
}
