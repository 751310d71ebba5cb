//! Rendering of answers and decision traces

use colored::*;

use ragent_core::{TraceEvent, TraceEventType};

/// Print the agent's answer
pub fn render_answer(response: &str) {
    println!("{} {}", "→".green(), response);
}

/// Print the decision trace beneath an answer
pub fn render_trace(events: &[TraceEvent]) {
    if events.is_empty() {
        return;
    }

    println!();
    println!("{}", "Decision trace:".dimmed().bold());
    for event in events {
        let tag = match event.event_type {
            TraceEventType::RouterDecision => "router".cyan(),
            TraceEventType::RagAction => "rag".magenta(),
            TraceEventType::WebAction => "web".yellow(),
            TraceEventType::AnswerAction => "answer".green(),
        };
        println!(
            "  {} {} {}",
            format!("{}.", event.step).dimmed(),
            format!("[{}]", tag).bold(),
            event.description.dimmed()
        );
    }
    println!();
}
