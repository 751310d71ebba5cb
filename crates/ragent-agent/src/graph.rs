//! The four-node agent graph

use ragent_core::{
    GenerationConfig, LlmProvider, RagRetriever, Result, RouteDecision, TraceEvent,
    TraceEventType, WebSearchProvider, WebSnippet,
};

use crate::judge::judge_sufficiency;
use crate::router::route_query;
use crate::session::{ChatTurn, SessionStore};
use crate::trace::TraceRecorder;

/// Tunables for the agent graph
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Chunks fetched per RAG lookup
    pub top_k: usize,
    /// Turns of conversation memory injected into prompts
    pub history_window: usize,
    /// Token budget for the final answer
    pub answer_max_tokens: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            top_k: 4,
            history_window: 6,
            answer_max_tokens: 1024,
        }
    }
}

/// Final answer plus the decision trace for one query
#[derive(Debug, Clone)]
pub struct AgentReply {
    pub response: String,
    pub trace_events: Vec<TraceEvent>,
}

/// The routing agent: Router -> RAG Lookup -> [Web Search] -> Answer
///
/// `web` is optional; without a search provider the graph behaves as if
/// web search were disabled for every query.
pub struct Agent<L: LlmProvider, R: RagRetriever, W: WebSearchProvider> {
    llm: L,
    retriever: R,
    web: Option<W>,
    sessions: SessionStore,
    config: AgentConfig,
}

impl<L: LlmProvider, R: RagRetriever, W: WebSearchProvider> Agent<L, R, W> {
    pub fn new(llm: L, retriever: R, web: Option<W>) -> Self {
        Self::with_config(llm, retriever, web, AgentConfig::default())
    }

    pub fn with_config(llm: L, retriever: R, web: Option<W>, config: AgentConfig) -> Self {
        Self {
            llm,
            retriever,
            web,
            sessions: SessionStore::new(),
            config,
        }
    }

    pub fn has_web_search(&self) -> bool {
        self.web.is_some()
    }

    #[cfg(test)]
    pub(crate) fn llm(&self) -> &L {
        &self.llm
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.session_count().await
    }

    /// Run one query through the graph
    ///
    /// Exactly one route decision is made; the answer node always runs
    /// exactly once, last. Every executed node appends one trace event.
    pub async fn handle_query(
        &self,
        session_id: &str,
        query: &str,
        enable_web_search: bool,
    ) -> Result<AgentReply> {
        let web_enabled = enable_web_search && self.web.is_some();
        let recent = self
            .sessions
            .recent_turns(session_id, self.config.history_window)
            .await;

        let mut trace = TraceRecorder::new();

        // Node 1: router
        let routing = route_query(&self.llm, query, web_enabled, &recent).await;
        tracing::info!(
            session_id,
            route = routing.route.as_str(),
            reasoning = %routing.reasoning,
            "router decision"
        );
        trace.record(
            "router",
            TraceEventType::RouterDecision,
            format!("route={} ({})", routing.route.as_str(), routing.reasoning),
        );

        // Node 2: RAG lookup with sufficiency gate
        let mut rag_context: Option<String> = None;
        let mut rag_sufficient = false;
        if routing.route == RouteDecision::Rag {
            let retrieval = self.retriever.retrieve(query, self.config.top_k).await?;

            let verdict = if retrieval.is_empty() {
                ragent_core::SufficiencyVerdict {
                    sufficient: false,
                    rationale: "no chunks retrieved".to_string(),
                }
            } else {
                judge_sufficiency(&self.llm, query, &retrieval.context).await
            };

            trace.record(
                "rag_lookup",
                TraceEventType::RagAction,
                format!(
                    "retrieved {} chunks; context {}: {}",
                    retrieval.chunks.len(),
                    if verdict.sufficient {
                        "sufficient"
                    } else {
                        "insufficient"
                    },
                    verdict.rationale
                ),
            );

            rag_sufficient = verdict.sufficient;
            if !retrieval.is_empty() {
                rag_context = Some(retrieval.context);
            }
        }

        // Node 3: web search, only as direct route or insufficient-RAG fallback
        let need_web = match routing.route {
            RouteDecision::Web => true,
            RouteDecision::Rag => !rag_sufficient && web_enabled,
            RouteDecision::Answer => false,
        };

        let mut snippets: Vec<WebSnippet> = Vec::new();
        if need_web {
            if let Some(web) = self.web.as_ref() {
                snippets = web.search(query).await?;
                trace.record(
                    "web_search",
                    TraceEventType::WebAction,
                    format!("web search returned {} snippets", snippets.len()),
                );
            }
        }

        // Node 4: answer, always last, exactly once
        let prompt = build_answer_prompt(query, rag_context.as_deref(), &snippets, &recent);

        let generation_config = GenerationConfig {
            model_id: self.llm.model_id().to_string(),
            max_tokens: self.config.answer_max_tokens,
            ..Default::default()
        };
        let result = self.llm.generate_with_config(&prompt, &generation_config).await?;

        trace.record(
            "answer",
            TraceEventType::AnswerAction,
            format!("generated answer from {}", context_label(&rag_context, &snippets)),
        );

        self.sessions
            .record_turn(session_id, query, &result.text)
            .await;

        Ok(AgentReply {
            response: result.text,
            trace_events: trace.into_events(),
        })
    }
}

fn context_label(rag_context: &Option<String>, snippets: &[WebSnippet]) -> &'static str {
    match (rag_context.is_some(), !snippets.is_empty()) {
        (true, true) => "knowledge base and web results",
        (true, false) => "knowledge base context",
        (false, true) => "web results",
        (false, false) => "no retrieval context",
    }
}

fn build_answer_prompt(
    query: &str,
    rag_context: Option<&str>,
    snippets: &[WebSnippet],
    recent: &[ChatTurn],
) -> String {
    let mut parts = Vec::with_capacity(5);
    parts.push(
        "You are a helpful assistant. Answer the user's query using the context below when it is relevant; say so plainly when you do not know."
            .to_string(),
    );

    if !recent.is_empty() {
        let history: String = recent
            .iter()
            .map(|t| format!("user: {}\nassistant: {}", t.query, t.response))
            .collect::<Vec<_>>()
            .join("\n");
        parts.push(format!("Conversation so far:\n{}", history));
    }

    if let Some(context) = rag_context {
        parts.push(context.to_string());
    }

    if !snippets.is_empty() {
        let mut web_block = String::from("Web search results:\n\n");
        for (i, snippet) in snippets.iter().enumerate() {
            web_block.push_str(&format!(
                "{}. [{}]({}) {}\n\n",
                i + 1,
                snippet.title,
                snippet.url,
                snippet.content
            ));
        }
        parts.push(web_block);
    }

    parts.push(format!("Query: {}\nAnswer:", query));
    parts.join("\n\n")
}
