use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};

use crate::analysis::record_builder::VoteRecordBuilder;
use crate::analysis::statistics::compute_statistics;
use crate::analysis::vote_extractor::VoteExtractor;
use crate::archive::{collect_email_ids, extract_thread_id, ArchiveClient};
use crate::error::Result;
use crate::llm::LLMProvider;
use crate::models::{VoteData, VoteRecord, VoteStatistics};

#[derive(Debug, Clone)]
pub struct VoteAnalysis {
    pub thread_id: String,
    pub votes: Vec<VoteRecord>,
    pub stats: VoteStatistics,
    pub failed: usize,
}

impl VoteAnalysis {
    pub fn to_vote_data(&self) -> VoteData {
        VoteData {
            votes: Some(self.votes.clone()),
            stats: Some(self.stats.clone()),
            ..Default::default()
        }
    }
}

pub struct VoteAnalysisPipeline {
    archive: ArchiveClient,
    extractor: VoteExtractor,
}

impl VoteAnalysisPipeline {
    pub fn new(archive: ArchiveClient, llm: Option<Arc<dyn LLMProvider>>) -> Self {
        Self::with_extractor(archive, VoteExtractor::new(llm))
    }

    pub fn with_extractor(archive: ArchiveClient, extractor: VoteExtractor) -> Self {
        Self { archive, extractor }
    }

    pub async fn analyze_thread(&self, thread_url: &str) -> Result<VoteAnalysis> {
        // Step 1: Resolve and fetch the thread
        let thread_id = extract_thread_id(thread_url)?;
        let thread = self.archive.get_thread(&thread_id).await?;
        let email_ids = collect_email_ids(&thread);
        tracing::info!("Thread {} has {} messages", thread_id, email_ids.len());

        // Step 2: Extract votes one email at a time
        let pb = ProgressBar::new(email_ids.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} emails")
                .map(|style| style.progress_chars("#>-"))
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let mut votes = Vec::new();
        let mut failed = 0;

        for email_id in &email_ids {
            match self.process_email(email_id).await {
                Ok(Some(record)) => votes.push(record),
                Ok(None) => failed += 1,
                Err(e) => {
                    tracing::warn!("Failed to process email {}: {}", email_id, e);
                    failed += 1;
                }
            }
            pb.inc(1);
        }

        pb.finish_with_message("Vote extraction complete");

        if failed > 0 {
            tracing::warn!("{} emails did not yield a vote", failed);
        }

        // Step 3: Aggregate
        let stats = compute_statistics(&votes);
        tracing::info!("Collected {} votes", stats.total);

        Ok(VoteAnalysis {
            thread_id,
            votes,
            stats,
            failed,
        })
    }

    async fn process_email(&self, email_id: &str) -> Result<Option<VoteRecord>> {
        let email = self.archive.get_email(email_id).await?;

        let Some(vote) = self.extractor.extract(&email.body).await else {
            tracing::debug!("No vote found in email {}", email_id);
            return Ok(None);
        };

        Ok(Some(VoteRecordBuilder::build(email_id, &email, vote)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::{BindingType, VoteValue};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_email(server: &MockServer, id: &str, from: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path("/email.lua"))
            .and(query_param("id", id))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "from": from,
                "epoch": 1_700_000_000,
                "body": body
            })))
            .mount(server)
            .await;
    }

    async fn mount_thread(server: &MockServer, thread: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/thread.lua"))
            .and(query_param("id", "t0vote"))
            .respond_with(ResponseTemplate::new(200).set_body_json(thread))
            .mount(server)
            .await;
    }

    fn pipeline(server: &MockServer) -> VoteAnalysisPipeline {
        let archive = ArchiveClient::new(&server.uri(), 5).unwrap();
        VoteAnalysisPipeline::new(archive, None)
    }

    #[tokio::test]
    async fn test_three_email_thread() {
        let server = MockServer::start().await;
        mount_thread(
            &server,
            serde_json::json!({
                "id": "m1",
                "children": [{"id": "m2", "children": [{"message_id": "m3"}]}]
            }),
        )
        .await;
        mount_email(&server, "m1", "Alice <alice@apache.org>", "+1 binding").await;
        mount_email(&server, "m2", "Bob <bob@example.com>", "+1 non-binding\nGood luck!").await;
        mount_email(&server, "m3", "Carol <carol@example.com>", "Thanks for driving this.").await;

        let analysis = pipeline(&server)
            .analyze_thread("https://lists.apache.org/thread/t0vote")
            .await
            .unwrap();

        assert_eq!(analysis.thread_id, "t0vote");
        assert_eq!(analysis.stats.total, 2);
        assert_eq!(analysis.stats.by_binding.len(), 2);
        assert_eq!(analysis.stats.by_binding["binding"], 1);
        assert_eq!(analysis.stats.by_binding["non-binding"], 1);
        assert_eq!(analysis.failed, 1);

        assert_eq!(analysis.votes[0].sender_name, "Alice");
        assert_eq!(analysis.votes[0].binding_type, Some(BindingType::Binding));
        assert_eq!(analysis.votes[1].vote_value, VoteValue::PlusOne);
        assert_eq!(analysis.votes[1].message_id, "m2");
    }

    #[tokio::test]
    async fn test_email_fetch_failure_is_counted() {
        let server = MockServer::start().await;
        mount_thread(&server, serde_json::json!({"id": "m1", "children": [{"id": "gone"}]})).await;
        mount_email(&server, "m1", "Alice <alice@apache.org>", "+1").await;
        Mock::given(method("GET"))
            .and(path("/email.lua"))
            .and(query_param("id", "gone"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let analysis = pipeline(&server)
            .analyze_thread("https://lists.apache.org/thread/t0vote")
            .await
            .unwrap();
        assert_eq!(analysis.votes.len(), 1);
        assert_eq!(analysis.failed, 1);
    }

    #[tokio::test]
    async fn test_thread_failures_are_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/thread.lua"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let pipeline = pipeline(&server);
        let err = pipeline
            .analyze_thread("https://lists.apache.org/thread/t0vote")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ArchiveApi(_)));

        let err = pipeline.analyze_thread("not a thread url").await.unwrap_err();
        assert!(matches!(err, Error::InvalidThreadUrl(_)));
    }
}
