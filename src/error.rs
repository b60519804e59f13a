use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Mail archive API error: {0}")]
    ArchiveApi(String),

    #[error("Invalid thread URL: {0}")]
    InvalidThreadUrl(String),

    #[error("LLM API error: {0}")]
    LLMApi(String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Generated article content is empty")]
    EmptyArticle,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

}

pub type Result<T> = std::result::Result<T, Error>;
