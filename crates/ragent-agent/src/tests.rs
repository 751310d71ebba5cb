//! Graph behavior tests driven through mock providers
//!
//! The router and judge are LLM calls, so routing outcomes are asserted by
//! scripting the oracle replies, never against a live model.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use ragent_core::{
    Error, GenerationConfig, GenerationResult, LlmProvider, RagRetriever, Result,
    RetrievalResult, TraceEventType, VectorDocument, WebSearchProvider, WebSnippet,
};

use crate::{Agent, AgentConfig};

/// LLM double that replays scripted replies in call order
struct MockLlm {
    replies: Mutex<VecDeque<std::result::Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl MockLlm {
    fn new(replies: Vec<&str>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.to_string())).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn with_script(replies: Vec<std::result::Result<&str, &str>>) -> Self {
        Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for MockLlm {
    async fn generate(&self, prompt: &str) -> Result<GenerationResult> {
        self.generate_with_config(prompt, &GenerationConfig::default())
            .await
    }

    async fn generate_with_config(
        &self,
        prompt: &str,
        _config: &GenerationConfig,
    ) -> Result<GenerationResult> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let next = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::LlmProvider("mock script exhausted".to_string()))?;

        match next {
            Ok(text) => Ok(GenerationResult {
                text,
                model_id: "mock-model".to_string(),
                tokens_used: None,
            }),
            Err(message) => Err(Error::LlmProvider(message)),
        }
    }

    fn model_id(&self) -> &str {
        "mock-model"
    }
}

/// Retriever double with fixed chunks
struct MockRetriever {
    chunks: Vec<VectorDocument>,
    fail: bool,
}

impl MockRetriever {
    fn empty() -> Self {
        Self {
            chunks: Vec::new(),
            fail: false,
        }
    }

    fn with_chunks(contents: &[&str]) -> Self {
        let chunks = contents
            .iter()
            .enumerate()
            .map(|(i, content)| VectorDocument {
                id: format!("chunk-{}", i),
                content: content.to_string(),
                source: "doc.pdf".to_string(),
                chunk_index: i,
                embedding: None,
                score: Some(0.9),
            })
            .collect();
        Self {
            chunks,
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            chunks: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl RagRetriever for MockRetriever {
    async fn retrieve(&self, _query: &str, top_k: usize) -> Result<RetrievalResult> {
        if self.fail {
            return Err(Error::VectorStore("store unreachable".to_string()));
        }

        let chunks: Vec<VectorDocument> = self.chunks.iter().take(top_k).cloned().collect();
        let context = chunks
            .iter()
            .map(|c| c.content.clone())
            .collect::<Vec<_>>()
            .join("\n");
        Ok(RetrievalResult { chunks, context })
    }
}

/// Web search double with fixed snippets
struct MockWeb {
    snippets: Vec<WebSnippet>,
}

impl MockWeb {
    fn new(count: usize) -> Self {
        let snippets = (0..count)
            .map(|i| WebSnippet {
                title: format!("result {}", i),
                url: format!("https://example.com/{}", i),
                content: format!("snippet {}", i),
                score: Some(0.8),
            })
            .collect();
        Self { snippets }
    }
}

#[async_trait]
impl WebSearchProvider for MockWeb {
    async fn search(&self, _query: &str) -> Result<Vec<WebSnippet>> {
        Ok(self.snippets.clone())
    }
}

const ROUTE_RAG: &str = r#"{"route":"rag","reasoning":"document question"}"#;
const ROUTE_WEB: &str = r#"{"route":"web","reasoning":"needs fresh data"}"#;
const ROUTE_ANSWER: &str = r#"{"route":"answer","reasoning":"general knowledge"}"#;
const JUDGE_SUFFICIENT: &str = r#"{"sufficient":true,"rationale":"context covers it"}"#;
const JUDGE_INSUFFICIENT: &str = r#"{"sufficient":false,"rationale":"context misses it"}"#;

fn event_types(reply: &crate::AgentReply) -> Vec<TraceEventType> {
    reply.trace_events.iter().map(|e| e.event_type).collect()
}

fn assert_steps_contiguous(reply: &crate::AgentReply) {
    for (i, event) in reply.trace_events.iter().enumerate() {
        assert_eq!(event.step, i + 1, "trace steps must be contiguous from 1");
    }
}

#[tokio::test]
async fn test_direct_answer_with_web_disabled_has_two_events() {
    // "What is the capital of France?" against an empty store
    let llm = MockLlm::new(vec![ROUTE_ANSWER, "Paris is the capital of France."]);
    let agent = Agent::new(llm, MockRetriever::empty(), None::<MockWeb>);

    let reply = agent
        .handle_query("s1", "What is the capital of France?", false)
        .await
        .unwrap();

    assert_eq!(reply.response, "Paris is the capital of France.");
    assert_eq!(
        event_types(&reply),
        vec![TraceEventType::RouterDecision, TraceEventType::AnswerAction]
    );
    assert_steps_contiguous(&reply);
}

#[tokio::test]
async fn test_sufficient_context_skips_web_search() {
    let llm = MockLlm::new(vec![ROUTE_RAG, JUDGE_SUFFICIENT, "Answer from documents."]);
    let agent = Agent::new(
        llm,
        MockRetriever::with_chunks(&["chunk one", "chunk two"]),
        Some(MockWeb::new(3)),
    );

    let reply = agent.handle_query("s1", "what does the report say", true).await.unwrap();

    assert_eq!(
        event_types(&reply),
        vec![
            TraceEventType::RouterDecision,
            TraceEventType::RagAction,
            TraceEventType::AnswerAction,
        ]
    );
    assert_steps_contiguous(&reply);
}

#[tokio::test]
async fn test_insufficient_context_falls_back_to_web() {
    let llm = MockLlm::new(vec![ROUTE_RAG, JUDGE_INSUFFICIENT, "Answer from the web."]);
    let agent = Agent::new(
        llm,
        MockRetriever::with_chunks(&["off-topic chunk"]),
        Some(MockWeb::new(2)),
    );

    let reply = agent.handle_query("s1", "what changed upstream", true).await.unwrap();

    assert_eq!(
        event_types(&reply),
        vec![
            TraceEventType::RouterDecision,
            TraceEventType::RagAction,
            TraceEventType::WebAction,
            TraceEventType::AnswerAction,
        ]
    );
    assert_steps_contiguous(&reply);
}

#[tokio::test]
async fn test_direct_web_route_skips_rag() {
    let llm = MockLlm::new(vec![ROUTE_WEB, "Fresh answer."]);
    let agent = Agent::new(llm, MockRetriever::empty(), Some(MockWeb::new(2)));

    let reply = agent.handle_query("s1", "latest release notes", true).await.unwrap();

    assert_eq!(
        event_types(&reply),
        vec![
            TraceEventType::RouterDecision,
            TraceEventType::WebAction,
            TraceEventType::AnswerAction,
        ]
    );
}

#[tokio::test]
async fn test_web_route_never_chosen_when_disabled() {
    // Even a "web" label from the model cannot produce a web action
    let llm = MockLlm::new(vec![ROUTE_WEB, "Direct answer."]);
    let agent = Agent::new(llm, MockRetriever::empty(), Some(MockWeb::new(2)));

    let reply = agent.handle_query("s1", "latest news", false).await.unwrap();

    assert!(
        !event_types(&reply).contains(&TraceEventType::WebAction),
        "web search must not run when disabled"
    );
    assert_eq!(
        event_types(&reply),
        vec![TraceEventType::RouterDecision, TraceEventType::AnswerAction]
    );
}

#[tokio::test]
async fn test_insufficient_context_without_web_still_answers() {
    let llm = MockLlm::new(vec![ROUTE_RAG, JUDGE_INSUFFICIENT, "Best-effort answer."]);
    let agent = Agent::new(
        llm,
        MockRetriever::with_chunks(&["partial chunk"]),
        None::<MockWeb>,
    );

    let reply = agent.handle_query("s1", "what does the report say", false).await.unwrap();

    assert_eq!(
        event_types(&reply),
        vec![
            TraceEventType::RouterDecision,
            TraceEventType::RagAction,
            TraceEventType::AnswerAction,
        ]
    );
}

#[tokio::test]
async fn test_empty_retrieval_counts_as_insufficient_without_judge_call() {
    // Script has no judge reply: if the judge ran, the answer node would
    // exhaust the script and the turn would fail.
    let llm = MockLlm::new(vec![ROUTE_RAG, "Answer from the web instead."]);
    let agent = Agent::new(llm, MockRetriever::empty(), Some(MockWeb::new(1)));

    let reply = agent.handle_query("s1", "anything indexed", true).await.unwrap();

    assert_eq!(
        event_types(&reply),
        vec![
            TraceEventType::RouterDecision,
            TraceEventType::RagAction,
            TraceEventType::WebAction,
            TraceEventType::AnswerAction,
        ]
    );
    assert!(reply.trace_events[1].description.contains("0 chunks"));
}

#[tokio::test]
async fn test_router_failure_defaults_to_direct_answer() {
    let llm = MockLlm::with_script(vec![Err("llm unreachable"), Ok("Still answered.")]);
    let agent = Agent::new(llm, MockRetriever::empty(), None::<MockWeb>);

    let reply = agent.handle_query("s1", "hello there", false).await.unwrap();

    assert_eq!(reply.response, "Still answered.");
    assert_eq!(
        event_types(&reply),
        vec![TraceEventType::RouterDecision, TraceEventType::AnswerAction]
    );
}

#[tokio::test]
async fn test_router_garbage_defaults_to_direct_answer() {
    let llm = MockLlm::new(vec!["no json here at all", "Answered anyway."]);
    let agent = Agent::new(llm, MockRetriever::empty(), None::<MockWeb>);

    let reply = agent.handle_query("s1", "hmm", false).await.unwrap();

    assert_eq!(reply.response, "Answered anyway.");
    assert_eq!(
        event_types(&reply),
        vec![TraceEventType::RouterDecision, TraceEventType::AnswerAction]
    );
}

#[tokio::test]
async fn test_answer_is_always_last_and_exactly_once() {
    let scripts: Vec<Vec<&str>> = vec![
        vec![ROUTE_ANSWER, "a"],
        vec![ROUTE_RAG, JUDGE_SUFFICIENT, "b"],
        vec![ROUTE_RAG, JUDGE_INSUFFICIENT, "c"],
        vec![ROUTE_WEB, "d"],
    ];

    for script in scripts {
        let llm = MockLlm::new(script);
        let agent = Agent::new(
            llm,
            MockRetriever::with_chunks(&["chunk"]),
            Some(MockWeb::new(1)),
        );

        let reply = agent.handle_query("s1", "query", true).await.unwrap();

        let answers: Vec<_> = reply
            .trace_events
            .iter()
            .filter(|e| e.event_type == TraceEventType::AnswerAction)
            .collect();
        assert_eq!(answers.len(), 1, "answer node must run exactly once");
        assert_eq!(
            reply.trace_events.last().unwrap().event_type,
            TraceEventType::AnswerAction,
            "answer node must run last"
        );
        assert_steps_contiguous(&reply);
    }
}

#[tokio::test]
async fn test_retriever_failure_fails_the_turn() {
    let llm = MockLlm::new(vec![ROUTE_RAG]);
    let agent = Agent::new(llm, MockRetriever::failing(), None::<MockWeb>);

    assert!(agent.handle_query("s1", "query", false).await.is_err());
}

#[tokio::test]
async fn test_answer_failure_fails_the_turn() {
    let llm = MockLlm::with_script(vec![Ok(ROUTE_ANSWER), Err("generation failed")]);
    let agent = Agent::new(llm, MockRetriever::empty(), None::<MockWeb>);

    assert!(agent.handle_query("s1", "query", false).await.is_err());
}

#[tokio::test]
async fn test_conversation_memory_reaches_later_prompts() {
    let llm = MockLlm::new(vec![
        ROUTE_ANSWER,
        "The CEO is Jane Doe.",
        ROUTE_ANSWER,
        "Her title is Chief Executive Officer.",
    ]);
    let agent = Agent::with_config(
        llm,
        MockRetriever::empty(),
        None::<MockWeb>,
        AgentConfig::default(),
    );

    agent.handle_query("s1", "who runs the company", false).await.unwrap();
    agent.handle_query("s1", "what is her title", false).await.unwrap();

    let prompts = agent.llm().prompts();
    // Third prompt is the second turn's router call; it must carry turn one
    assert!(prompts[2].contains("The CEO is Jane Doe."));

    assert_eq!(agent.session_count().await, 1);
}
