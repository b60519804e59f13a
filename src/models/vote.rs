use serde::{Deserialize, Serialize};

use super::statistics::{SummaryCounts, VoteStatistics};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum VoteValue {
    #[serde(rename = "+1")]
    PlusOne,
    #[serde(rename = "+0")]
    PlusZero,
    #[serde(rename = "-1")]
    MinusOne,
}

impl VoteValue {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteValue::PlusOne => "+1",
            VoteValue::PlusZero => "+0",
            VoteValue::MinusOne => "-1",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        match token.trim() {
            "+1" => Some(VoteValue::PlusOne),
            "+0" => Some(VoteValue::PlusZero),
            "-1" => Some(VoteValue::MinusOne),
            _ => None,
        }
    }
}

impl std::fmt::Display for VoteValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BindingType {
    #[serde(rename = "binding")]
    Binding,
    #[serde(rename = "non-binding")]
    NonBinding,
}

impl BindingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BindingType::Binding => "binding",
            BindingType::NonBinding => "non-binding",
        }
    }

    pub fn classify(word: &str) -> Option<Self> {
        let lower = word.trim().to_lowercase();
        if lower.contains("non") && lower.contains("binding") {
            Some(BindingType::NonBinding)
        } else if lower == "binding" {
            Some(BindingType::Binding)
        } else {
            None
        }
    }
}

impl std::fmt::Display for BindingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedVote {
    pub vote_value: VoteValue,
    pub binding_type: Option<BindingType>,
    pub raw_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoteRecord {
    #[serde(rename = "email_id")]
    pub message_id: String,
    #[serde(rename = "name")]
    pub sender_name: String,
    #[serde(rename = "email")]
    pub sender_email: String,
    pub vote_value: VoteValue,
    pub binding_type: Option<BindingType>,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub epoch: Option<i64>,
    #[serde(default)]
    pub raw_text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoteData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub votes: Option<Vec<VoteRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<VoteStatistics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_counts: Option<SummaryCounts>,
}
