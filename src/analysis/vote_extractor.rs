use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::llm::{parse_structured, CompletionRequest, LLMProvider};
use crate::models::{BindingType, ExtractedVote, VoteValue};

static VOTE_VALUE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[\s>]*(\+1|\+0|-1)\b").expect("valid vote value regex")
});
static BINDING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(non-?binding|binding)\b").expect("valid binding regex")
});

#[async_trait]
pub trait VoteStrategy: Send + Sync {
    async fn extract(&self, body: &str) -> Option<ExtractedVote>;
    fn name(&self) -> &str;
}

/// Deterministic pass: a line starting with `+1`, `+0` or `-1`, optionally
/// behind quote markers.
pub struct PatternStrategy;

impl PatternStrategy {
    pub fn find(body: &str) -> Option<ExtractedVote> {
        let caps = VOTE_VALUE_RE.captures(body)?;
        let token = caps.get(1)?;
        let vote_value = VoteValue::parse(token.as_str())?;

        // The binding marker may sit anywhere in the body, not only on the vote line.
        let binding_type = BINDING_RE
            .captures(body)
            .and_then(|c| c.get(1))
            .and_then(|m| BindingType::classify(m.as_str()));

        Some(ExtractedVote {
            vote_value,
            binding_type,
            raw_text: line_around(body, token.start()).trim().to_string(),
        })
    }
}

#[async_trait]
impl VoteStrategy for PatternStrategy {
    async fn extract(&self, body: &str) -> Option<ExtractedVote> {
        Self::find(body)
    }

    fn name(&self) -> &str {
        "pattern"
    }
}

fn line_around(text: &str, offset: usize) -> &str {
    let start = text[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let end = text[offset..]
        .find('\n')
        .map(|i| offset + i)
        .unwrap_or(text.len());
    &text[start..end]
}

#[derive(Debug, Deserialize)]
struct LlmVote {
    #[serde(default)]
    vote_value: Option<String>,
    #[serde(default)]
    binding_type: Option<String>,
    #[serde(default)]
    raw_text: Option<String>,
}

/// Asks the LLM to read the first part of the body. Every failure, including
/// transport errors and unparseable replies, reads as "no vote".
pub struct LlmStrategy {
    llm: Arc<dyn LLMProvider>,
}

impl LlmStrategy {
    pub fn new(llm: Arc<dyn LLMProvider>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl VoteStrategy for LlmStrategy {
    async fn extract(&self, body: &str) -> Option<ExtractedVote> {
        let reply = match self.llm.complete(CompletionRequest::vote_extraction(body)).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("LLM vote extraction failed: {}", e);
                return None;
            }
        };

        let parsed: LlmVote = match parse_structured(&reply) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!("Discarding LLM vote reply: {}", e);
                return None;
            }
        };

        let raw_value = parsed.vote_value?.to_lowercase();
        let Some(vote_value) = VoteValue::parse(&raw_value) else {
            tracing::debug!("LLM returned unknown vote value '{}'", raw_value);
            return None;
        };

        Some(ExtractedVote {
            vote_value,
            binding_type: parsed.binding_type.as_deref().and_then(BindingType::classify),
            raw_text: parsed.raw_text.unwrap_or_default().trim().to_string(),
        })
    }

    fn name(&self) -> &str {
        "llm"
    }
}

pub struct VoteExtractor {
    strategies: Vec<Box<dyn VoteStrategy>>,
}

impl VoteExtractor {
    pub fn new(llm: Option<Arc<dyn LLMProvider>>) -> Self {
        let mut strategies: Vec<Box<dyn VoteStrategy>> = vec![Box::new(PatternStrategy)];
        if let Some(llm) = llm {
            strategies.push(Box::new(LlmStrategy::new(llm)));
        }
        Self::with_strategies(strategies)
    }

    pub fn with_strategies(strategies: Vec<Box<dyn VoteStrategy>>) -> Self {
        Self { strategies }
    }

    pub async fn extract(&self, body: &str) -> Option<ExtractedVote> {
        if body.trim().is_empty() {
            return None;
        }

        for strategy in &self.strategies {
            if let Some(vote) = strategy.extract(body).await {
                tracing::debug!("Vote {} found by {} strategy", vote.vote_value, strategy.name());
                return Some(vote);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::StubProvider;

    #[test]
    fn test_vote_tokens_at_line_start() {
        for (body, expected) in [
            ("+1", VoteValue::PlusOne),
            ("  +0 I abstain", VoteValue::PlusZero),
            ("> > -1 not ready", VoteValue::MinusOne),
            ("Hi all,\n\n+1 (binding)\n\nThanks", VoteValue::PlusOne),
            (">\t+1", VoteValue::PlusOne),
        ] {
            let vote = PatternStrategy::find(body).unwrap_or_else(|| panic!("no vote in {body:?}"));
            assert_eq!(vote.vote_value, expected, "body: {body:?}");
        }
    }

    #[test]
    fn test_token_must_lead_the_line() {
        assert!(PatternStrategy::find("I give this a +1").is_none());
        assert!(PatternStrategy::find("+10 points").is_none());
        assert!(PatternStrategy::find("").is_none());
    }

    #[test]
    fn test_binding_detected_anywhere_in_body() {
        let vote = PatternStrategy::find("+1\n\nThis is my binding vote.").unwrap();
        assert_eq!(vote.binding_type, Some(BindingType::Binding));
        assert_eq!(vote.raw_text, "+1");

        let vote = PatternStrategy::find("+1 (non-binding) congrats!").unwrap();
        assert_eq!(vote.binding_type, Some(BindingType::NonBinding));
        assert_eq!(vote.raw_text, "+1 (non-binding) congrats!");

        let vote = PatternStrategy::find("> +1 NonBinding").unwrap();
        assert_eq!(vote.binding_type, Some(BindingType::NonBinding));
        assert_eq!(vote.raw_text, "> +1 NonBinding");

        let vote = PatternStrategy::find("+1").unwrap();
        assert_eq!(vote.binding_type, None);
    }

    #[tokio::test]
    async fn test_no_vote_without_llm() {
        let extractor = VoteExtractor::new(None);
        assert!(extractor.extract("Looks great, ship it").await.is_none());
        assert!(extractor.extract("   ").await.is_none());
    }

    #[tokio::test]
    async fn test_llm_only_consulted_after_pattern_miss() {
        let stub = Arc::new(StubProvider::replying(
            r#"{"vote_value": "+1", "binding_type": "Binding", "raw_text": "I vote +1"}"#,
        ));
        let extractor = VoteExtractor::new(Some(stub.clone()));

        let vote = extractor.extract("+0").await.unwrap();
        assert_eq!(vote.vote_value, VoteValue::PlusZero);
        assert_eq!(stub.calls(), 0);

        let vote = extractor.extract("Count me in: I vote +1").await.unwrap();
        assert_eq!(vote.vote_value, VoteValue::PlusOne);
        assert_eq!(vote.binding_type, Some(BindingType::Binding));
        assert_eq!(vote.raw_text, "I vote +1");
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_llm_failures_mean_no_vote() {
        let failing = VoteExtractor::new(Some(Arc::new(StubProvider::failing())));
        assert!(failing.extract("no token here").await.is_none());

        let null_vote = VoteExtractor::new(Some(Arc::new(StubProvider::replying(
            r#"{"vote_value": null, "binding_type": null, "raw_text": null}"#,
        ))));
        assert!(null_vote.extract("no token here").await.is_none());

        let garbage = VoteExtractor::new(Some(Arc::new(StubProvider::replying("sorry, no idea"))));
        assert!(garbage.extract("no token here").await.is_none());

        let bogus = VoteExtractor::new(Some(Arc::new(StubProvider::replying(
            r#"{"vote_value": "+2"}"#,
        ))));
        assert!(bogus.extract("no token here").await.is_none());
    }

    struct FixedStrategy(Option<VoteValue>);

    #[async_trait]
    impl VoteStrategy for FixedStrategy {
        async fn extract(&self, _body: &str) -> Option<ExtractedVote> {
            self.0.map(|vote_value| ExtractedVote {
                vote_value,
                binding_type: None,
                raw_text: "fixed".to_string(),
            })
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_custom_chain_first_hit_wins() {
        let extractor = VoteExtractor::with_strategies(vec![
            Box::new(FixedStrategy(None)),
            Box::new(FixedStrategy(Some(VoteValue::MinusOne))),
            Box::new(PatternStrategy),
        ]);

        // The pattern pass would read +1, but an earlier strategy answered first.
        let vote = extractor.extract("+1 (binding)").await.unwrap();
        assert_eq!(vote.vote_value, VoteValue::MinusOne);
        assert_eq!(vote.raw_text, "fixed");

        let pattern_first = VoteExtractor::with_strategies(vec![
            Box::new(PatternStrategy),
            Box::new(FixedStrategy(Some(VoteValue::MinusOne))),
        ]);
        let vote = pattern_first.extract("+1 (binding)").await.unwrap();
        assert_eq!(vote.vote_value, VoteValue::PlusOne);

        let empty = VoteExtractor::with_strategies(Vec::new());
        assert!(empty.extract("+1").await.is_none());
    }
}
