use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratedContent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleResult {
    pub title: String,
    pub meta_description: String,
    pub content: String,
    pub outline: serde_json::Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkCatalog {
    #[serde(default)]
    pub project_links: Vec<LinkItem>,
    #[serde(default)]
    pub vote_links: Vec<LinkItem>,
    #[serde(default)]
    pub related_projects: Vec<LinkItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: String,
}
