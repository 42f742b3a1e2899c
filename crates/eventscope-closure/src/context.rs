//! Per-schema-load closure cache.
//!
//! A [`ClosureContext`] is created once per loaded schema and handed to every
//! generator that needs the closures. Each closure is computed on first
//! request and shared afterwards; dropping the context (or calling
//! [`ClosureContext::reset`]) is the only way to invalidate it.
//!
//! First-call population is serialized per closure. Lock order is always
//! enums → fields → events, matching the dependency order of the resolvers.

use std::sync::Arc;

use eventscope_schema::{EnumDescriptor, MessageDescriptor, SchemaUnit};
use parking_lot::Mutex;

use crate::config::ClosureConfig;
use crate::enums::resolve_enums;
use crate::error::SchemaShapeError;
use crate::events::resolve_events;
use crate::fields::resolve_fields;
use crate::predicates::{is_parent_event, is_process_event};
use crate::report::{ClosureReport, EventEntry};

pub type MessageSet<'g> = Arc<[&'g MessageDescriptor]>;
pub type EnumSet<'g> = Arc<[&'g EnumDescriptor]>;

#[derive(Debug)]
pub struct ClosureContext<'g> {
    unit: SchemaUnit<'g>,
    config: ClosureConfig,
    events: Mutex<Option<MessageSet<'g>>>,
    fields: Mutex<Option<MessageSet<'g>>>,
    enums: Mutex<Option<EnumSet<'g>>>,
}

impl<'g> ClosureContext<'g> {
    pub fn new(unit: SchemaUnit<'g>) -> Self {
        Self::with_config(unit, ClosureConfig::default())
    }

    pub fn with_config(unit: SchemaUnit<'g>, config: ClosureConfig) -> Self {
        Self {
            unit,
            config,
            events: Mutex::new(None),
            fields: Mutex::new(None),
            enums: Mutex::new(None),
        }
    }

    pub fn unit(&self) -> SchemaUnit<'g> {
        self.unit
    }

    pub fn config(&self) -> &ClosureConfig {
        &self.config
    }

    pub fn events(&self) -> Result<MessageSet<'g>, SchemaShapeError> {
        let mut slot = self.events.lock();
        if let Some(cached) = slot.as_ref() {
            return Ok(Arc::clone(cached));
        }
        let events: MessageSet<'g> = resolve_events(self.unit, &self.config)?.into();
        *slot = Some(Arc::clone(&events));
        Ok(events)
    }

    pub fn fields(&self) -> Result<MessageSet<'g>, SchemaShapeError> {
        let mut slot = self.fields.lock();
        if let Some(cached) = slot.as_ref() {
            return Ok(Arc::clone(cached));
        }
        let events = self.events()?;
        let fields: MessageSet<'g> = resolve_fields(self.unit, &events).into();
        *slot = Some(Arc::clone(&fields));
        Ok(fields)
    }

    pub fn enums(&self) -> Result<EnumSet<'g>, SchemaShapeError> {
        let mut slot = self.enums.lock();
        if let Some(cached) = slot.as_ref() {
            return Ok(Arc::clone(cached));
        }
        let events = self.events()?;
        let fields = self.fields()?;
        let enums: EnumSet<'g> = resolve_enums(self.unit, &events, &fields).into();
        *slot = Some(Arc::clone(&enums));
        Ok(enums)
    }

    /// Compute all three closures now, before handing the context to
    /// concurrent consumers.
    pub fn warm(&self) -> Result<(), SchemaShapeError> {
        self.enums().map(|_| ())
    }

    pub fn is_warm(&self) -> bool {
        let enums = self.enums.lock().is_some();
        let fields = self.fields.lock().is_some();
        let events = self.events.lock().is_some();
        enums && fields && events
    }

    /// Drop every cached closure; the next request recomputes.
    pub fn reset(&self) {
        let mut enums = self.enums.lock();
        let mut fields = self.fields.lock();
        let mut events = self.events.lock();
        *enums = None;
        *fields = None;
        *events = None;
        tracing::debug!(unit = %self.unit.name(), "closure cache cleared");
    }

    pub fn report(&self) -> Result<ClosureReport, SchemaShapeError> {
        let events = self.events()?;
        let fields = self.fields()?;
        let enums = self.enums()?;

        Ok(ClosureReport {
            unit: self.unit.name().to_string(),
            entry_message: self.config.entry_message.clone(),
            event_union: self.config.event_union.clone(),
            events: events
                .iter()
                .map(|e| EventEntry {
                    name: e.name.clone(),
                    full_name: e.full_name.clone(),
                    process: is_process_event(e),
                    parent: is_parent_event(e),
                })
                .collect(),
            fields: fields.iter().map(|m| m.full_name.clone()).collect(),
            enums: enums.iter().map(|e| e.full_name.clone()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{enum_names, message_names, scenario_config, scenario_graph};

    #[test]
    fn closures_are_computed_once_and_shared() {
        let graph = scenario_graph();
        let ctx = ClosureContext::with_config(graph.sole_unit().unwrap(), scenario_config());

        let fields = ctx.fields().unwrap();
        assert!(ctx.events.lock().is_some(), "fields pulls events into the cache");
        assert!(ctx.enums.lock().is_none());

        assert!(Arc::ptr_eq(&fields, &ctx.fields().unwrap()));
        assert!(Arc::ptr_eq(&ctx.events().unwrap(), &ctx.events().unwrap()));
        assert_eq!(message_names(&fields), ["Process", "Pod"]);
        assert_eq!(enum_names(&ctx.enums().unwrap()), ["PodStatus"]);
        assert!(ctx.is_warm());
    }

    #[test]
    fn reset_forces_recomputation_with_identical_results() {
        let graph = scenario_graph();
        let ctx = ClosureContext::with_config(graph.sole_unit().unwrap(), scenario_config());
        ctx.warm().unwrap();
        let before = ctx.events().unwrap();

        ctx.reset();
        assert!(!ctx.is_warm());
        let after = ctx.events().unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(message_names(&before), message_names(&after));
    }

    #[test]
    fn shape_errors_propagate_from_every_accessor_and_are_not_cached() {
        let graph = scenario_graph();
        let ctx = ClosureContext::new(graph.sole_unit().unwrap());

        assert!(matches!(ctx.events(), Err(SchemaShapeError::EntryNotFound { .. })));
        assert!(matches!(ctx.fields(), Err(SchemaShapeError::EntryNotFound { .. })));
        assert!(matches!(ctx.enums(), Err(SchemaShapeError::EntryNotFound { .. })));
        assert!(ctx.warm().is_err());
        assert!(ctx.events.lock().is_none());
    }

    #[test]
    fn concurrent_first_calls_observe_one_result() {
        let graph = scenario_graph();
        let ctx = ClosureContext::with_config(graph.sole_unit().unwrap(), scenario_config());

        let results: Vec<EnumSet<'_>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8).map(|_| s.spawn(|| ctx.enums().unwrap())).collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for enums in &results {
            assert!(Arc::ptr_eq(enums, &results[0]));
        }
        assert_eq!(enum_names(&results[0]), ["PodStatus"]);
    }

    #[test]
    fn report_lists_every_artifact() {
        let graph = scenario_graph();
        let ctx = ClosureContext::with_config(graph.sole_unit().unwrap(), scenario_config());
        let report = ctx.report().unwrap();

        assert_eq!(report.unit, "events.proto");
        assert_eq!(report.events.len(), 2);
        assert!(report.events[0].process);
        assert!(!report.events[1].process);
        assert_eq!(report.fields, ["demo.Process", "demo.Pod"]);
        assert_eq!(report.enums, ["demo.PodStatus"]);
        assert_eq!(report.artifact_count(), 5);
    }
}
