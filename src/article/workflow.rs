use std::path::PathBuf;

use crate::article::assembler::PlaceholderSubstituter;
use crate::article::generator::ArticleGenerator;
use crate::article::links::LinkCollector;
use crate::config::ArticleConfig;
use crate::error::{Error, Result};
use crate::storage::{OutputStore, ARTICLE_PATH, IMAGES_DIR, OUTLINE_PATH};

#[derive(Debug, Clone)]
pub struct SavedArticle {
    pub title: String,
    pub article_path: PathBuf,
    pub outline_path: PathBuf,
}

pub struct ArticleWorkflow {
    generator: ArticleGenerator,
    store: OutputStore,
    config: ArticleConfig,
}

impl ArticleWorkflow {
    pub fn new(generator: ArticleGenerator, store: OutputStore, config: ArticleConfig) -> Self {
        Self {
            generator,
            store,
            config,
        }
    }

    pub async fn run(&self) -> Result<SavedArticle> {
        // Step 1: Generate
        let article = self.generator.generate().await?;
        if article.content.trim().is_empty() {
            return Err(Error::EmptyArticle);
        }

        // Step 2: Placeholders
        let content = match self.substitute(&article.content) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Placeholder substitution skipped: {}", e);
                article.content.clone()
            }
        };

        // Step 3: Save
        let article_path = self.store.write_text(ARTICLE_PATH, &content)?;
        let outline_path = self.store.write_json(OUTLINE_PATH, &article.outline)?;
        tracing::info!("Article saved to {}", article_path.display());

        Ok(SavedArticle {
            title: article.title,
            article_path,
            outline_path,
        })
    }

    fn substitute(&self, content: &str) -> Result<String> {
        let catalog = LinkCollector::load(&self.store.resolve(&self.config.links_path))?;
        let links = LinkCollector::render(&catalog);

        let mut substituter = PlaceholderSubstituter::new(&self.config.cover_image_file, &links);
        if let Ok(root) = self.store.root().canonicalize() {
            let images = root.join(IMAGES_DIR);
            substituter = substituter.with_absolute_prefix(&images.to_string_lossy());
        }

        Ok(substituter.substitute(content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::StubProvider;
    use std::sync::Arc;

    fn article_config() -> ArticleConfig {
        ArticleConfig {
            project_name: "Apache Demo".to_string(),
            project_info_path: "project_info.md".to_string(),
            vote_summary_path: "vote_statistics_summary.md".to_string(),
            links_path: "links.json".to_string(),
            prompts_dir: "prompts".to_string(),
            cover_image_file: "cover.png".to_string(),
        }
    }

    fn workflow(dir: &std::path::Path, reply: &str) -> ArticleWorkflow {
        std::fs::write(dir.join("project_info.md"), "# Demo").unwrap();
        std::fs::write(
            dir.join("vote_statistics_summary.md"),
            "| **+1 IPMC Binding** | 2票 |\n| **总计** | **2票** |",
        )
        .unwrap();

        let store = OutputStore::new(dir);
        let generator = ArticleGenerator::new(
            Arc::new(StubProvider::replying(reply)),
            store.clone(),
            article_config(),
            None,
        );
        ArticleWorkflow::new(generator, store, article_config())
    }

    #[tokio::test]
    async fn test_run_substitutes_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("links.json"),
            r#"{"project_links": [{"title": "Website", "url": "https://demo.apache.org"}]}"#,
        )
        .unwrap();

        let reply = r#"{"title": "Demo graduates", "meta_description": "M", "content": "[COVER_IMAGE_PLACEHOLDER]\n\nBody\n\n[链接集合占位符]"}"#;
        let saved = workflow(dir.path(), reply).run().await.unwrap();

        assert_eq!(saved.title, "Demo graduates");
        let article = std::fs::read_to_string(&saved.article_path).unwrap();
        assert!(article.starts_with("![Cover Image](../images/cover.png)\n\nBody\n\n## 相关资源"));
        assert!(article.contains("https://demo.apache.org"));
        assert!(!article.contains("[链接集合占位符]"));

        let outline: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&saved.outline_path).unwrap()).unwrap();
        assert_eq!(outline["title"], "Demo graduates");
        assert_eq!(saved.outline_path, dir.path().join(OUTLINE_PATH));
    }

    #[tokio::test]
    async fn test_missing_links_keeps_placeholders() {
        let dir = tempfile::tempdir().unwrap();
        let reply = r#"{"title": "T", "content": "Body [VOTE_DISTRIBUTION_CHART]"}"#;
        let saved = workflow(dir.path(), reply).run().await.unwrap();

        let article = std::fs::read_to_string(saved.article_path).unwrap();
        assert_eq!(article, "Body [VOTE_DISTRIBUTION_CHART]");
    }

    #[tokio::test]
    async fn test_empty_content_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = workflow(dir.path(), r#"{"title": "T", "content": "  "}"#)
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmptyArticle));
        assert!(!dir.path().join(ARTICLE_PATH).exists());
    }
}
