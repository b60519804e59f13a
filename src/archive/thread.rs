use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::models::ThreadNode;

static THREAD_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/thread/([A-Za-z0-9]+)").expect("valid thread id regex"));

pub fn extract_thread_id(thread_url: &str) -> Result<String> {
    THREAD_ID_RE
        .captures(thread_url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| Error::InvalidThreadUrl(thread_url.to_string()))
}

/// Flattens a thread tree into message identifiers, depth-first with each
/// parent before its children. Nodes without an identifier are skipped but
/// their children are still visited.
pub fn collect_email_ids(root: &ThreadNode) -> Vec<String> {
    let mut ids = Vec::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if let Some(id) = node.identifier() {
            ids.push(id.to_string());
        }
        // Reversed so the first child is popped next.
        stack.extend(node.children.iter().rev());
    }

    ids
}
