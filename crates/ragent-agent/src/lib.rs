//! Routing agent graph for ragent
//!
//! A fixed four-node graph: Router -> RAG Lookup -> [conditional: Web
//! Search] -> Answer. The router and the sufficiency judge are LLM calls
//! treated as nondeterministic oracles; everything else is deterministic
//! plumbing with a trace event per node.

mod graph;
mod judge;
mod router;
mod session;
mod trace;

#[cfg(test)]
mod tests;

pub use graph::{Agent, AgentConfig, AgentReply};
pub use judge::parse_verdict;
pub use router::{parse_route_response, RouterOutput};
pub use session::{ChatTurn, Session, SessionStore};
pub use trace::TraceRecorder;

// Re-export core types for convenience
pub use ragent_core::{
    Error, Result, RouteDecision, SufficiencyVerdict, TraceEvent, TraceEventType,
};
