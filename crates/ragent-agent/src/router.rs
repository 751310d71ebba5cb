//! LLM-driven route classification
//!
//! One classification call decides whether a query is answered from the
//! knowledge base, from live web search, or directly. Parsing is lenient
//! about the usual LLM quirks (markdown fences, trailing prose); anything
//! unrecoverable falls back to direct answering at the call site.

use ragent_core::{Error, GenerationConfig, LlmProvider, Result, RouteDecision};
use serde::Deserialize;

use crate::session::ChatTurn;

/// Parsed router reply
#[derive(Debug, Clone)]
pub struct RouterOutput {
    pub route: RouteDecision,
    pub reasoning: String,
}

const ROUTER_PROMPT_WITH_WEB: &str = r#"You are a query router for an assistant that can answer from an internal knowledge base, from live web search, or directly. Classify the user query and output a JSON object with exactly these fields:

{"route":"rag|web|answer","reasoning":"..."}

RULES:
- "rag": the query asks about information likely to live in the user's uploaded documents (reports, contracts, internal facts, anything previously ingested).
- "web": the query needs current or real-time information (news, weather, prices, recent events) that no static document would hold.
- "answer": greetings, small talk, general knowledge, calculations, or anything answerable without retrieval.
- reasoning: one sentence explaining the decision.

Output ONLY the JSON object, nothing else."#;

const ROUTER_PROMPT_NO_WEB: &str = r#"You are a query router for an assistant that can answer from an internal knowledge base or directly. Classify the user query and output a JSON object with exactly these fields:

{"route":"rag|answer","reasoning":"..."}

RULES:
- "rag": the query asks about information likely to live in the user's uploaded documents (reports, contracts, internal facts, anything previously ingested).
- "answer": greetings, small talk, general knowledge, calculations, or anything answerable without retrieval.
- reasoning: one sentence explaining the decision.

Output ONLY the JSON object, nothing else."#;

/// Build the classification prompt, including a short conversation window
pub(crate) fn build_router_prompt(
    query: &str,
    web_enabled: bool,
    recent_turns: &[ChatTurn],
) -> String {
    let mut parts = Vec::with_capacity(3);
    parts.push(
        if web_enabled {
            ROUTER_PROMPT_WITH_WEB
        } else {
            ROUTER_PROMPT_NO_WEB
        }
        .to_string(),
    );

    if !recent_turns.is_empty() {
        let history: String = recent_turns
            .iter()
            .map(|t| format!("user: {}\nassistant: {}", t.query, t.response))
            .collect::<Vec<_>>()
            .join("\n");
        parts.push(format!("\nConversation so far:\n{}", history));
    }

    parts.push(format!("\nUser query: \"{}\"\nJSON:", query));
    parts.join("\n")
}

#[derive(Deserialize)]
struct RouterReply {
    route: String,
    #[serde(default)]
    reasoning: String,
}

/// Parse the LLM's route reply
///
/// Handles markdown fences and trailing text; falls back to scanning for a
/// quoted label. With web search disabled a `web` label is coerced to
/// `answer` (the option was never in the decision space).
pub fn parse_route_response(raw: &str, web_enabled: bool) -> Result<RouterOutput> {
    let cleaned = raw
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let json_str = match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(start), Some(end)) if end > start => &cleaned[start..=end],
        _ => cleaned,
    };

    // Strict parse first
    if let Ok(reply) = serde_json::from_str::<RouterReply>(json_str) {
        if let Some(route) = label_to_route(&reply.route) {
            return Ok(coerce(route, reply.reasoning, web_enabled));
        }
    }

    // Lenient parse: scan for a quoted label
    let route = if json_str.contains("\"rag\"") {
        Some(RouteDecision::Rag)
    } else if json_str.contains("\"web\"") {
        Some(RouteDecision::Web)
    } else if json_str.contains("\"answer\"") {
        Some(RouteDecision::Answer)
    } else {
        None
    };

    match route {
        Some(route) => Ok(coerce(
            route,
            "router reply partially parsed".to_string(),
            web_enabled,
        )),
        None => Err(Error::Agent(format!(
            "Unparseable router reply: {}",
            raw.trim()
        ))),
    }
}

fn label_to_route(label: &str) -> Option<RouteDecision> {
    match label.trim().to_lowercase().as_str() {
        "rag" => Some(RouteDecision::Rag),
        "web" => Some(RouteDecision::Web),
        "answer" => Some(RouteDecision::Answer),
        _ => None,
    }
}

fn coerce(route: RouteDecision, reasoning: String, web_enabled: bool) -> RouterOutput {
    if route == RouteDecision::Web && !web_enabled {
        return RouterOutput {
            route: RouteDecision::Answer,
            reasoning: "web search disabled; answering directly".to_string(),
        };
    }
    RouterOutput { route, reasoning }
}

/// Classify a query into a route
///
/// Router failures are a policy decision, not an error: an unreachable LLM
/// or an unparseable label resolves to direct answering.
pub(crate) async fn route_query<L: LlmProvider>(
    llm: &L,
    query: &str,
    web_enabled: bool,
    recent_turns: &[ChatTurn],
) -> RouterOutput {
    let prompt = build_router_prompt(query, web_enabled, recent_turns);

    let config = GenerationConfig {
        model_id: llm.model_id().to_string(),
        max_tokens: 200,
        ..Default::default()
    };

    match llm.generate_with_config(&prompt, &config).await {
        Ok(result) => parse_route_response(&result.text, web_enabled).unwrap_or_else(|_| {
            tracing::debug!(reply = %result.text, "unparseable router reply, defaulting to answer");
            RouterOutput {
                route: RouteDecision::Answer,
                reasoning: "router reply unparseable; answering directly".to_string(),
            }
        }),
        Err(e) => {
            tracing::debug!(error = %e, "router call failed, defaulting to answer");
            RouterOutput {
                route: RouteDecision::Answer,
                reasoning: "router unavailable; answering directly".to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_json() {
        let raw = r#"{"route":"rag","reasoning":"asks about an uploaded report"}"#;
        let output = parse_route_response(raw, true).unwrap();
        assert_eq!(output.route, RouteDecision::Rag);
        assert_eq!(output.reasoning, "asks about an uploaded report");
    }

    #[test]
    fn test_parse_json_with_fences() {
        let raw = "```json\n{\"route\":\"web\",\"reasoning\":\"needs current prices\"}\n```";
        let output = parse_route_response(raw, true).unwrap();
        assert_eq!(output.route, RouteDecision::Web);
    }

    #[test]
    fn test_parse_json_with_trailing_text() {
        let raw = r#"Sure! {"route":"answer","reasoning":"greeting"} Hope that helps."#;
        let output = parse_route_response(raw, true).unwrap();
        assert_eq!(output.route, RouteDecision::Answer);
    }

    #[test]
    fn test_parse_partial_json() {
        let raw = r#"{"route":"rag""#;
        let output = parse_route_response(raw, true).unwrap();
        assert_eq!(output.route, RouteDecision::Rag);
    }

    #[test]
    fn test_parse_garbage_is_an_error() {
        assert!(parse_route_response("I cannot classify this", true).is_err());
    }

    #[test]
    fn test_web_label_coerced_when_web_disabled() {
        let raw = r#"{"route":"web","reasoning":"needs fresh data"}"#;
        let output = parse_route_response(raw, false).unwrap();
        assert_eq!(output.route, RouteDecision::Answer);
    }

    #[test]
    fn test_prompt_excludes_web_when_disabled() {
        let prompt = build_router_prompt("what is new today", false, &[]);
        assert!(!prompt.contains("\"rag|web|answer\""));
        assert!(prompt.contains("\"rag|answer\""));
    }

    #[test]
    fn test_prompt_includes_history() {
        let turns = vec![ChatTurn::new("who is the ceo", "The CEO is Jane Doe.")];
        let prompt = build_router_prompt("what is her salary", true, &turns);
        assert!(prompt.contains("who is the ceo"));
        assert!(prompt.contains("The CEO is Jane Doe."));
        assert!(prompt.contains("what is her salary"));
    }
}
