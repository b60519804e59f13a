use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::llm::{CompletionRequest, LLMProvider};
use crate::models::VoteRecord;

pub const DEFAULT_BLOCKLIST: &[&str] = &[
    "很抱歉",
    "未能找到",
    "没有找到",
    "无法找到",
    "规则",
    "未找到",
    "apologize",
    "sorry",
    "unable to find",
];

const CONTEXT_VOTE_LIMIT: usize = 20;
const MAX_FALLBACK_QUOTES: usize = 3;

static POSITIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(congrat|congrats|congratulations|good luck|best wishes|thank you|great work|well done|happy to|pleased to|excited to|support)",
    )
    .expect("valid positive keyword regex")
});
static SENTENCE_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]\s+").expect("valid sentence break regex"));

pub struct QuoteExtractor {
    llm: Option<Arc<dyn LLMProvider>>,
    template: String,
    blocklist: Vec<String>,
}

impl QuoteExtractor {
    pub fn new(llm: Option<Arc<dyn LLMProvider>>, template: String) -> Self {
        Self {
            llm,
            template,
            blocklist: DEFAULT_BLOCKLIST.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_blocklist(mut self, blocklist: Vec<String>) -> Self {
        self.blocklist = blocklist;
        self
    }

    pub async fn extract_quotes(&self, votes: &[VoteRecord]) -> String {
        if votes.is_empty() {
            return String::new();
        }

        let sanitized = match &self.llm {
            Some(llm) => {
                let context = build_vote_context(votes);
                let request = CompletionRequest::quote_extraction(&self.template, &context);
                match llm.complete(request).await {
                    Ok(reply) => self.sanitize(&reply),
                    Err(e) => {
                        tracing::warn!("LLM quote extraction failed: {}", e);
                        String::new()
                    }
                }
            }
            None => String::new(),
        };

        if !sanitized.is_empty() {
            return sanitized;
        }

        tracing::info!("Falling back to keyword quote extraction");
        fallback_quotes(votes)
    }

    /// Empty when the reply trips the blocklist. Otherwise keeps the `>` lines,
    /// or quotes every line if the reply has none.
    pub fn sanitize(&self, reply: &str) -> String {
        let lower = reply.to_lowercase();
        if self
            .blocklist
            .iter()
            .any(|phrase| lower.contains(&phrase.to_lowercase()))
        {
            tracing::debug!("Rejected LLM quote reply containing a blocked phrase");
            return String::new();
        }

        let lines: Vec<&str> = reply
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let quote_lines: Vec<&str> = lines.iter().copied().filter(|l| l.starts_with('>')).collect();
        if !quote_lines.is_empty() {
            return quote_lines.join("\n");
        }

        lines
            .iter()
            .map(|line| format!("> {}", line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn build_vote_context(votes: &[VoteRecord]) -> String {
    votes
        .iter()
        .filter(|vote| !vote.raw_text.trim().is_empty())
        .take(CONTEXT_VOTE_LIMIT)
        .map(|vote| {
            format!(
                "Name: {}\nBinding: {}\nBody:\n{}",
                display_name(vote),
                vote.binding_type.map(|b| b.as_str()).unwrap_or("unknown"),
                vote.raw_text.trim()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

pub fn fallback_quotes(votes: &[VoteRecord]) -> String {
    votes
        .iter()
        .filter_map(|vote| {
            find_positive_sentence(vote.raw_text.trim())
                .map(|sentence| format!("> {} — {}", sentence, display_name(vote)))
        })
        .take(MAX_FALLBACK_QUOTES)
        .collect::<Vec<_>>()
        .join("\n")
}

fn display_name(vote: &VoteRecord) -> &str {
    let name = vote.sender_name.trim();
    if name.is_empty() {
        "Unknown"
    } else {
        name
    }
}

fn find_positive_sentence(text: &str) -> Option<&str> {
    split_sentences(text)
        .into_iter()
        .map(|part| part.trim().trim_matches('"').trim_matches('\''))
        .find(|candidate| !candidate.is_empty() && POSITIVE_RE.is_match(candidate))
}

fn split_sentences(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    for line in text.split('\n') {
        let mut start = 0;
        for m in SENTENCE_BREAK_RE.find_iter(line) {
            parts.push(&line[start..m.start() + 1]);
            start = m.end();
        }
        parts.push(&line[start..]);
    }
    parts
}
