//! Field-presence checks emitters use to decide which helpers an event gets.

use eventscope_schema::MessageDescriptor;

pub const PROCESS_FIELD: &str = "process";
pub const PARENT_FIELD: &str = "parent";

pub fn has_field(message: &MessageDescriptor, name: &str) -> bool {
    message.field(name).is_some()
}

/// The event carries the process it was raised for.
pub fn is_process_event(message: &MessageDescriptor) -> bool {
    has_field(message, PROCESS_FIELD)
}

/// The event carries the parent of its process.
pub fn is_parent_event(message: &MessageDescriptor) -> bool {
    has_field(message, PARENT_FIELD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventscope_schema::{FileBuilder, ScalarType, SchemaGraph};

    #[test]
    fn presence_is_by_field_name() {
        let mut file = FileBuilder::new("a.proto", "a");
        file.message("Process");
        file.message("Exec")
            .message_field("process", "a.Process")
            .message_field("parent", "a.Process");
        file.message("Exit").message_field("process", "a.Process");
        file.message("Test").scalar("arg0", ScalarType::Uint64);
        let graph = SchemaGraph::from_files([file.build()]);
        let get = |name: &str| graph.find_message(name).unwrap();

        assert!(is_process_event(get("a.Exec")) && is_parent_event(get("a.Exec")));
        assert!(is_process_event(get("a.Exit")) && !is_parent_event(get("a.Exit")));
        assert!(!is_process_event(get("a.Test")));
        assert!(has_field(get("a.Test"), "arg0"));
        assert!(!has_field(get("a.Test"), "arg1"));
    }
}
