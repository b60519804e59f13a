use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{EmailMessage, ExtractedVote, VoteRecord};

static FROM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.*)<(.*)>").expect("valid from regex"));

pub struct VoteRecordBuilder;

impl VoteRecordBuilder {
    pub fn build(message_id: &str, email: &EmailMessage, vote: ExtractedVote) -> VoteRecord {
        let (sender_name, sender_email) = parse_from_field(&email.from);

        VoteRecord {
            message_id: message_id.to_string(),
            sender_name,
            sender_email,
            vote_value: vote.vote_value,
            binding_type: vote.binding_type,
            timestamp: format_timestamp(email.epoch),
            epoch: email.epoch,
            raw_text: vote.raw_text,
        }
    }
}

pub fn parse_from_field(from: &str) -> (String, String) {
    match FROM_RE.captures(from) {
        Some(caps) => {
            let name = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            let email = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            (
                name.trim().trim_matches('"').to_string(),
                email.trim().to_string(),
            )
        }
        None => (from.to_string(), String::new()),
    }
}

/// Renders an epoch as `YYYY-MM-DD HH:MM:SS` (UTC). Missing or zero epochs
/// render empty.
pub fn format_timestamp(epoch: Option<i64>) -> String {
    epoch
        .filter(|e| *e != 0)
        .and_then(|e| DateTime::<Utc>::from_timestamp(e, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}
