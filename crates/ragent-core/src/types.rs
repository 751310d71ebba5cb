//! Shared agent-facing types: routes, verdicts, trace events

use serde::{Deserialize, Serialize};

/// Strategy chosen by the router for a single query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteDecision {
    /// Answer from the internal knowledge base
    Rag,
    /// Answer from live web search
    Web,
    /// Answer directly, no retrieval
    Answer,
}

impl RouteDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteDecision::Rag => "rag",
            RouteDecision::Web => "web",
            RouteDecision::Answer => "answer",
        }
    }
}

/// Outcome of the sufficiency judgment after RAG retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SufficiencyVerdict {
    pub sufficient: bool,
    pub rationale: String,
}

/// Kind of action a trace event describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceEventType {
    RouterDecision,
    RagAction,
    WebAction,
    AnswerAction,
}

/// One structured log entry describing a decision or action taken while
/// processing a query. Steps are strictly increasing and contiguous from 1
/// within a single query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEvent {
    pub step: usize,
    pub node_name: String,
    pub description: String,
    pub event_type: TraceEventType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_decision_wire_names() {
        assert_eq!(serde_json::to_string(&RouteDecision::Rag).unwrap(), "\"rag\"");
        assert_eq!(serde_json::to_string(&RouteDecision::Web).unwrap(), "\"web\"");
        assert_eq!(
            serde_json::to_string(&RouteDecision::Answer).unwrap(),
            "\"answer\""
        );
    }

    #[test]
    fn test_trace_event_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&TraceEventType::RouterDecision).unwrap(),
            "\"router_decision\""
        );
        assert_eq!(
            serde_json::to_string(&TraceEventType::RagAction).unwrap(),
            "\"rag_action\""
        );
        assert_eq!(
            serde_json::to_string(&TraceEventType::WebAction).unwrap(),
            "\"web_action\""
        );
        assert_eq!(
            serde_json::to_string(&TraceEventType::AnswerAction).unwrap(),
            "\"answer_action\""
        );
    }
}
