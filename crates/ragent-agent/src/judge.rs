//! Sufficiency judgment over retrieved context
//!
//! After RAG retrieval the agent asks the LLM whether the retrieved context
//! actually answers the query. The verdict gates the web-search fallback.

use ragent_core::{GenerationConfig, LlmProvider, SufficiencyVerdict};
use serde::Deserialize;

pub(crate) fn build_judge_prompt(query: &str, context: &str) -> String {
    format!(
        "You are grading retrieved context. Decide whether the context below is sufficient to answer the user's query. Output a JSON object with exactly these fields:\n\
        \n\
        {{\"sufficient\":true|false,\"rationale\":\"...\"}}\n\
        \n\
        Context:\n{}\n\
        \n\
        Query: \"{}\"\n\
        JSON:",
        context, query
    )
}

#[derive(Deserialize)]
struct JudgeReply {
    sufficient: bool,
    #[serde(default)]
    rationale: String,
}

/// Parse the judge's reply into a verdict
///
/// Handles fences and trailing prose. An unparseable reply is treated as
/// insufficient: when in doubt, gather more context.
pub fn parse_verdict(raw: &str) -> SufficiencyVerdict {
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

    if let Ok(reply) = serde_json::from_str::<JudgeReply>(json_str) {
        return SufficiencyVerdict {
            sufficient: reply.sufficient,
            rationale: reply.rationale,
        };
    }

    // Lenient scan for the boolean
    if let Some(pos) = json_str.find("\"sufficient\"") {
        let tail = &json_str[pos..];
        if let Some(true_pos) = tail.find("true") {
            if !tail[..true_pos].contains("false") {
                return SufficiencyVerdict {
                    sufficient: true,
                    rationale: "judge reply partially parsed".to_string(),
                };
            }
        }
        if tail.contains("false") {
            return SufficiencyVerdict {
                sufficient: false,
                rationale: "judge reply partially parsed".to_string(),
            };
        }
    }

    SufficiencyVerdict {
        sufficient: false,
        rationale: "judge reply unparseable; treating context as insufficient".to_string(),
    }
}

/// Judge retrieved context against a query
///
/// A failed judge call counts as insufficient, same as an unparseable one.
pub(crate) async fn judge_sufficiency<L: LlmProvider>(
    llm: &L,
    query: &str,
    context: &str,
) -> SufficiencyVerdict {
    let prompt = build_judge_prompt(query, context);

    let config = GenerationConfig {
        model_id: llm.model_id().to_string(),
        max_tokens: 200,
        ..Default::default()
    };

    match llm.generate_with_config(&prompt, &config).await {
        Ok(result) => parse_verdict(&result.text),
        Err(e) => {
            tracing::debug!(error = %e, "judge call failed, treating context as insufficient");
            SufficiencyVerdict {
                sufficient: false,
                rationale: "judge unavailable; treating context as insufficient".to_string(),
            }
        }
    }
}
