pub mod config;
pub mod error;
pub mod models;
pub mod archive;
pub mod llm;
pub mod analysis;
pub mod article;
pub mod storage;

pub use config::{ArticleConfig, Config};
pub use error::{Error, Result};
pub use archive::ArchiveClient;
pub use llm::{LLMProvider, OpenAICompatProvider};
pub use analysis::VoteAnalysisPipeline;
pub use article::{ArticleGenerator, ArticleWorkflow};
pub use storage::{OutputStore, Storage};
