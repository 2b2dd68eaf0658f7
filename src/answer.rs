//! Structured answer returned for one query, and its terminal rendering

use colored::Colorize;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Answer produced by the retrieval index for one question
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Answer {
    /// The question as asked
    pub question: String,

    /// Synthesized answer; reasoning models may embed a
    /// `<think>...</think>` segment which rendering strips
    pub answer: String,

    /// Formatted reference list, empty when no evidence was cited
    pub references: String,

    /// Tokens billed per model over the whole query
    pub token_counts: HashMap<String, u64>,

    /// Evidence snippets the answer was synthesized from
    pub contexts: Vec<Context>,
}

/// One evidence snippet with its source label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Context {
    pub text: String,
    pub source: String,
    pub score: f32,
}

fn think_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<think>(.*?)</think>").expect("valid regex"))
}

/// Split an answer into its reasoning segment (if any) and the visible part
pub fn split_reasoning(answer: &str) -> (Option<String>, String) {
    if let Some(caps) = think_regex().captures(answer) {
        let think = caps.get(1).map(|m| m.as_str().trim().to_string());
        let visible = think_regex().replace(answer, "").trim().to_string();
        (think.filter(|t| !t.is_empty()), visible)
    } else {
        (None, answer.trim().to_string())
    }
}

/// Print an answer to the console.
///
/// verbose 0 prints question, answer, references and token counts;
/// verbose >= 1 adds the model's reasoning segment; verbose >= 2 adds the
/// retrieved contexts.
pub fn print_answer(answer: &Answer, verbose: u8) {
    let (reasoning, visible) = split_reasoning(&answer.answer);

    println!("{}", "QUESTION:".cyan().bold());
    println!("{}\n", answer.question.cyan());

    println!("{}", "ANSWER:".green().bold());
    println!("{}", visible.green());

    if !answer.references.is_empty() {
        println!("\n{}", "REFERENCES:".blue().bold());
        println!("{}", answer.references.blue());
    }

    println!("\n{}", "TOKEN Count:".red().bold());
    let mut counts: Vec<_> = answer.token_counts.iter().collect();
    counts.sort_by(|a, b| a.0.cmp(b.0));
    for (model, tokens) in counts {
        println!(
            "{}{}",
            format!(" - {}: ", model).red(),
            format!("{} tokens", tokens).green()
        );
    }

    if verbose >= 1 {
        if let Some(think) = reasoning {
            println!("\n{}", "LLM Reasoning:".yellow().bold());
            println!("{}", think.yellow());
        }
    }

    if verbose >= 2 && !answer.contexts.is_empty() {
        println!("\n{}", "Contexts Used:".magenta().bold());
        for context in &answer.contexts {
            println!(
                "{}{}",
                format!(" - {} ", context.text).yellow(),
                format!("(from {})", context.source).magenta()
            );
        }
    }
}
