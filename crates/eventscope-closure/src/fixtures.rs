use eventscope_schema::{EnumDescriptor, FileBuilder, MessageDescriptor, ScalarType, SchemaGraph};

use crate::config::ClosureConfig;

pub(crate) fn scenario_config() -> ClosureConfig {
    ClosureConfig::new("Resp", "event")
}

/// `Resp.event` → {Exec, Exit}; `Exec.process: Process`;
/// `Process.pod: Pod`; `Pod.status: PodStatus`.
pub(crate) fn scenario_file() -> FileBuilder {
    let mut file = FileBuilder::new("events.proto", "demo");
    file.message("Resp")
        .oneof_message("event", "exec", "demo.Exec")
        .oneof_message("event", "exit", "demo.Exit")
        .scalar("node_name", ScalarType::String);
    file.message("Exec").message_field("process", "demo.Process");
    file.message("Exit").scalar("code", ScalarType::Uint32);
    file.message("Process")
        .scalar("binary", ScalarType::String)
        .message_field("pod", "demo.Pod");
    file.message("Pod").enum_field("status", "demo.PodStatus");
    file.message("Unrelated").enum_field("mode", "demo.Mode");
    file.enumeration("Mode", &["MODE_UNKNOWN"]);
    file.enumeration("PodStatus", &["POD_UNKNOWN", "POD_RUNNING"]);
    file
}

pub(crate) fn scenario_graph() -> SchemaGraph {
    SchemaGraph::from_files([scenario_file().build()])
}

pub(crate) fn message_names<'a>(messages: &[&'a MessageDescriptor]) -> Vec<&'a str> {
    messages.iter().map(|m| m.name.as_str()).collect()
}

pub(crate) fn enum_names<'a>(enums: &[&'a EnumDescriptor]) -> Vec<&'a str> {
    enums.iter().map(|e| e.name.as_str()).collect()
}
