//! Trace recording for a single query's pass through the graph

use ragent_core::{TraceEvent, TraceEventType};

/// Collects one trace event per executed node, in execution order
///
/// Step numbers are strictly increasing and contiguous starting at 1.
#[derive(Debug, Default)]
pub struct TraceRecorder {
    events: Vec<TraceEvent>,
}

impl TraceRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event for the node that just ran
    pub fn record(
        &mut self,
        node_name: &str,
        event_type: TraceEventType,
        description: impl Into<String>,
    ) {
        self.events.push(TraceEvent {
            step: self.events.len() + 1,
            node_name: node_name.to_string(),
            description: description.into(),
            event_type,
        });
    }

    pub fn into_events(self) -> Vec<TraceEvent> {
        self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_are_contiguous_from_one() {
        let mut trace = TraceRecorder::new();
        trace.record("router", TraceEventType::RouterDecision, "route=rag");
        trace.record("rag_lookup", TraceEventType::RagAction, "retrieved 3 chunks");
        trace.record("answer", TraceEventType::AnswerAction, "generated answer");

        let events = trace.into_events();
        assert_eq!(events.len(), 3);
        for (i, event) in events.iter().enumerate() {
            assert_eq!(event.step, i + 1);
        }
    }

    #[test]
    fn test_empty_trace() {
        assert!(TraceRecorder::new().into_events().is_empty());
    }
}
