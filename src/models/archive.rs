use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreadNode {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub children: Vec<ThreadNode>,
}

impl ThreadNode {
    pub fn identifier(&self) -> Option<&str> {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or_else(|| self.message_id.as_deref().filter(|id| !id.is_empty()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailMessage {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub epoch: Option<i64>,
    #[serde(default)]
    pub body: String,
}
