use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{BindingType, VoteRecord, VoteValue};

const BINDING_SECTION: &str = "### IPMC Binding Votes";
const NON_BINDING_SECTION: &str = "### Non-Binding Votes";

static NUMBERED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.").expect("valid numbered line regex"));
static BOLD_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid bold name regex"));

pub fn votes_from_summary(summary: &str) -> Vec<VoteRecord> {
    let mut votes = Vec::new();

    if let Some(body) = section_body(summary, BINDING_SECTION, &["\n###", "\n---"]) {
        votes.extend(section_votes(body, BindingType::Binding));
    }
    if let Some(body) = section_body(summary, NON_BINDING_SECTION, &["\n---"]) {
        votes.extend(section_votes(body, BindingType::NonBinding));
    }

    votes
}

/// Text after the first blank line following `heading`, up to the earliest
/// terminator or the end of the summary.
fn section_body<'a>(summary: &'a str, heading: &str, terminators: &[&str]) -> Option<&'a str> {
    let after_heading = summary.find(heading)? + heading.len();
    let body_start = summary[after_heading..].find("\n\n")? + after_heading + 2;
    let rest = &summary[body_start..];

    let end = terminators
        .iter()
        .filter_map(|t| rest.find(t))
        .min()
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

fn section_votes(body: &str, binding: BindingType) -> Vec<VoteRecord> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && NUMBERED_RE.is_match(line))
        .filter_map(|line| {
            let name = BOLD_NAME_RE.captures(line)?.get(1)?.as_str().to_string();
            Some(VoteRecord {
                message_id: String::new(),
                sender_name: name,
                sender_email: String::new(),
                vote_value: VoteValue::PlusOne,
                binding_type: Some(binding),
                timestamp: String::new(),
                epoch: None,
                raw_text: line.to_string(),
            })
        })
        .collect()
}
