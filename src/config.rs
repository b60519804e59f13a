use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};

const DEFAULT_LLM_BASE_URL: &str = "https://api.deepseek.com/v1";
const DEFAULT_LLM_MODEL: &str = "deepseek-reasoner";
const DEFAULT_ARCHIVE_BASE_URL: &str = "https://lists.apache.org/api";

#[derive(Debug, Clone)]
pub struct Config {
    pub llm: Option<LlmConfig>,
    pub archive_base_url: String,
    pub http_timeout_secs: u64,
    pub output_dir: PathBuf,
    pub database_path: String,
    pub project_name: String,
    pub project_info_path: String,
    pub vote_summary_path: String,
    pub links_path: String,
    pub prompts_dir: String,
    pub cover_image_file: String,
    pub quote_blocklist: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let first_of = |keys: &[&str]| keys.iter().find_map(|k| get(k));

        let llm = match first_of(&["LLM_API_KEY", "DEEPSEEK_API_KEY", "CHATAI_API_KEY"]) {
            Some(api_key) => Some(LlmConfig {
                api_key,
                base_url: first_of(&["LLM_BASE_URL", "DEEPSEEK_BASE_URL", "CHATAI_BASE_URL"])
                    .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string()),
                model: first_of(&["LLM_MODEL", "DEFAULT_LLM_MODEL"])
                    .unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
                timeout_secs: parse_number(get("LLM_TIMEOUT_SECS"), "LLM_TIMEOUT_SECS", 300)?,
            }),
            None => None,
        };

        let quote_blocklist = get("QUOTE_BLOCKLIST").map(|value| {
            value
                .split(',')
                .map(|part| part.trim().to_string())
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
        });

        Ok(Self {
            llm,
            archive_base_url: get("ARCHIVE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_ARCHIVE_BASE_URL.to_string()),
            http_timeout_secs: parse_number(get("HTTP_TIMEOUT_SECS"), "HTTP_TIMEOUT_SECS", 30)?,
            output_dir: PathBuf::from(get("OUTPUT_DIR").unwrap_or_else(|| ".".to_string())),
            database_path: get("DATABASE_PATH").unwrap_or_else(|| "gradpress.db".to_string()),
            project_name: get("PROJECT_NAME").unwrap_or_else(|| "Apache HugeGraph".to_string()),
            project_info_path: get("PROJECT_INFO_PATH")
                .unwrap_or_else(|| "project_info.md".to_string()),
            vote_summary_path: get("VOTE_SUMMARY_PATH")
                .unwrap_or_else(|| "vote_statistics_summary.md".to_string()),
            links_path: get("LINKS_PATH").unwrap_or_else(|| "config/links.json".to_string()),
            prompts_dir: get("PROMPTS_DIR").unwrap_or_else(|| "config/prompts".to_string()),
            cover_image_file: get("COVER_IMAGE_FILE")
                .unwrap_or_else(|| "cover_image.png".to_string()),
            quote_blocklist,
        })
    }

    pub fn require_llm(&self) -> Result<&LlmConfig> {
        self.llm.as_ref().ok_or_else(|| {
            Error::Config("LLM_API_KEY (or DEEPSEEK_API_KEY) environment variable not set".to_string())
        })
    }
}

fn parse_number(value: Option<String>, key: &str, default: u64) -> Result<u64> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("{} must be a positive integer, got '{}'", key, raw))),
        None => Ok(default),
    }
}

#[derive(Debug, Clone)]
pub struct ArticleConfig {
    pub project_name: String,
    pub project_info_path: String,
    pub vote_summary_path: String,
    pub links_path: String,
    pub prompts_dir: String,
    pub cover_image_file: String,
}

impl From<&Config> for ArticleConfig {
    fn from(config: &Config) -> Self {
        Self {
            project_name: config.project_name.clone(),
            project_info_path: config.project_info_path.clone(),
            vote_summary_path: config.vote_summary_path.clone(),
            links_path: config.links_path.clone(),
            prompts_dir: config.prompts_dir.clone(),
            cover_image_file: config.cover_image_file.clone(),
        }
    }
}
