use std::sync::Arc;

use crate::article::assembler::assemble_article;
use crate::article::formatter::VoteStatisticsFormatter;
use crate::article::quotes::QuoteExtractor;
use crate::article::summary::votes_from_summary;
use crate::config::ArticleConfig;
use crate::error::{Error, Result};
use crate::llm::{parse_json_response, parse_structured, CompletionRequest, LLMProvider, PromptTemplates};
use crate::models::{ArticleResult, GeneratedContent, SummaryCounts, VoteData};
use crate::storage::{OutputStore, VOTE_DATA_PATH};

pub struct ArticleGenerator {
    llm: Arc<dyn LLMProvider>,
    store: OutputStore,
    config: ArticleConfig,
    templates: PromptTemplates,
    quotes: QuoteExtractor,
}

impl ArticleGenerator {
    pub fn new(
        llm: Arc<dyn LLMProvider>,
        store: OutputStore,
        config: ArticleConfig,
        quote_blocklist: Option<Vec<String>>,
    ) -> Self {
        let templates = PromptTemplates::load(&store.resolve(&config.prompts_dir));

        let mut quotes = QuoteExtractor::new(Some(llm.clone()), templates.quote.clone());
        if let Some(blocklist) = quote_blocklist {
            quotes = quotes.with_blocklist(blocklist);
        }

        Self {
            llm,
            store,
            config,
            templates,
            quotes,
        }
    }

    pub fn topic(&self) -> String {
        format!("{} 毕业公告", self.config.project_name)
    }

    pub fn load_project_info(&self) -> Result<String> {
        self.store.read_text(&self.config.project_info_path).map_err(|e| {
            Error::Config(format!(
                "Cannot read project info {}: {}",
                self.store.resolve(&self.config.project_info_path).display(),
                e
            ))
        })
    }

    pub fn load_vote_data(&self) -> Result<VoteData> {
        if !self.store.exists(VOTE_DATA_PATH) {
            tracing::warn!("No vote data at {}, continuing without votes", VOTE_DATA_PATH);
            return Ok(VoteData::default());
        }

        let mut data: VoteData = self.store.read_json(VOTE_DATA_PATH)?;
        if data.votes.is_none() {
            if let Some(summary) = data.summary_text.as_deref() {
                let recovered = votes_from_summary(summary);
                tracing::info!("Recovered {} votes from the vote summary", recovered.len());
                data.votes = Some(recovered);
            }
        }
        Ok(data)
    }

    /// Formatted statistics block. Saved counts win, then computed stats,
    /// then counts parsed out of the summary text or summary file.
    pub fn load_vote_summary(&self, data: &VoteData) -> Result<String> {
        let summary_text = data.summary_text.as_deref().unwrap_or("");
        let counts = data
            .summary_counts
            .or_else(|| data.stats.as_ref().map(SummaryCounts::from));

        if counts.is_some() {
            return Ok(VoteStatisticsFormatter::format_summary(summary_text, counts));
        }

        if !summary_text.is_empty() {
            return Ok(VoteStatisticsFormatter::format_summary(summary_text, None));
        }

        let text = self.store.read_text(&self.config.vote_summary_path).map_err(|e| {
            Error::Config(format!(
                "No vote statistics saved and cannot read vote summary {}: {}",
                self.store.resolve(&self.config.vote_summary_path).display(),
                e
            ))
        })?;
        Ok(VoteStatisticsFormatter::format_summary(&text, None))
    }

    pub async fn generate_outline(&self, topic: &str) -> Result<serde_json::Value> {
        let requirements = serde_json::json!({
            "topic": topic,
            "tone": "celebratory",
            "audience": "open source community",
        });
        let reply = self
            .llm
            .complete(CompletionRequest::outline(&self.templates.outline, topic, &requirements))
            .await?;

        Ok(parse_json_response(&reply).unwrap_or_else(|e| {
            tracing::warn!("Outline reply was not JSON ({}), keeping raw text", e);
            serde_json::Value::String(reply)
        }))
    }

    pub async fn generate_content(
        &self,
        topic: &str,
        project_info: &str,
        vote_summary: &str,
    ) -> Result<GeneratedContent> {
        let reply = self
            .llm
            .complete(CompletionRequest::article(
                &self.templates.article,
                topic,
                project_info,
                vote_summary,
            ))
            .await?;

        parse_structured(&reply)
    }

    pub async fn generate(&self) -> Result<ArticleResult> {
        let topic = self.topic();
        tracing::info!("Generating article: {}", topic);

        // Step 1: Inputs
        let project_info = self.load_project_info()?;
        let vote_data = self.load_vote_data()?;
        let vote_summary = self.load_vote_summary(&vote_data)?;

        // Step 2: Outline and body
        let outline = self.generate_outline(&topic).await?;
        let generated = self
            .generate_content(&topic, &project_info, &vote_summary)
            .await?;
        tracing::info!(
            "Generated article body ({} chars)",
            generated.content.chars().count()
        );

        // Step 3: Quotes
        let votes = vote_data.votes.unwrap_or_default();
        let quotes = self.quotes.extract_quotes(&votes).await;

        Ok(ArticleResult {
            title: generated.title,
            meta_description: generated.meta_description,
            content: assemble_article(&generated.content, &quotes),
            outline,
        })
    }
}
