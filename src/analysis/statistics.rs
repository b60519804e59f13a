use crate::models::{VoteRecord, VoteStatistics};

const UNKNOWN: &str = "unknown";

pub fn compute_statistics(votes: &[VoteRecord]) -> VoteStatistics {
    let mut stats = VoteStatistics {
        total: votes.len() as u32,
        ..Default::default()
    };

    for vote in votes {
        let binding = vote.binding_type.map(|b| b.as_str()).unwrap_or(UNKNOWN);
        let value = vote.vote_value.as_str();

        *stats.by_binding.entry(binding.to_string()).or_insert(0) += 1;
        *stats.by_value.entry(value.to_string()).or_insert(0) += 1;
        *stats
            .by_binding_value
            .entry(format!("{}:{}", binding, value))
            .or_insert(0) += 1;
    }

    stats
}

pub fn render_vote_list(votes: &[VoteRecord]) -> String {
    let mut output = String::from("## 详细投票列表\n\n");
    for vote in votes {
        output.push_str(&format!(
            "- {} - {} ({}) - {}\n",
            vote.sender_name,
            vote.vote_value,
            vote.binding_type.map(|b| b.as_str()).unwrap_or(UNKNOWN),
            vote.timestamp
        ));
    }
    output
}
