use crate::analysis::pipeline::VoteAnalysis;
use crate::analysis::statistics::render_vote_list;
use crate::article::VoteStatisticsFormatter;
use crate::error::Result;
use crate::models::{SummaryCounts, VoteData};
use crate::storage::{OutputStore, VOTE_DATA_PATH, VOTE_STATISTICS_PATH};

pub fn save_analysis(store: &OutputStore, analysis: &VoteAnalysis) -> Result<()> {
    let data = analysis.to_vote_data();
    let counts = SummaryCounts::from(&analysis.stats);

    let report = format!(
        "{}\n\n{}",
        VoteStatisticsFormatter::format_summary("", Some(counts)),
        render_vote_list(&analysis.votes)
    );

    let data_path = store.write_json(VOTE_DATA_PATH, &data)?;
    let report_path = store.write_text(VOTE_STATISTICS_PATH, &report)?;
    tracing::info!(
        "Vote data saved to {}, report to {}",
        data_path.display(),
        report_path.display()
    );
    Ok(())
}

pub fn save_summary(store: &OutputStore, summary_text: &str) -> Result<SummaryCounts> {
    let counts = VoteStatisticsFormatter::parse_counts(summary_text);
    let data = VoteData {
        summary_text: Some(summary_text.to_string()),
        summary_counts: Some(counts),
        ..Default::default()
    };

    store.write_json(VOTE_DATA_PATH, &data)?;
    store.write_text(VOTE_STATISTICS_PATH, summary_text)?;
    tracing::info!("Parsed {} votes from the vote summary", counts.resolved_total());
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::compute_statistics;
    use crate::models::{BindingType, VoteRecord, VoteValue};

    #[test]
    fn test_save_analysis_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = OutputStore::new(dir.path());

        let votes = vec![VoteRecord {
            message_id: "m1".to_string(),
            sender_name: "Alice".to_string(),
            sender_email: "alice@apache.org".to_string(),
            vote_value: VoteValue::PlusOne,
            binding_type: Some(BindingType::Binding),
            timestamp: "2023-11-14 22:13:20".to_string(),
            epoch: Some(1_700_000_000),
            raw_text: "+1 (binding)".to_string(),
        }];
        let analysis = VoteAnalysis {
            thread_id: "t0vote".to_string(),
            stats: compute_statistics(&votes),
            votes,
            failed: 0,
        };
        save_analysis(&store, &analysis).unwrap();

        let report = store.read_text(VOTE_STATISTICS_PATH).unwrap();
        assert!(report.starts_with("### 投票结果概览"));
        assert!(report.contains("**总投票数**：1票"));
        assert!(report.ends_with("## 详细投票列表\n\n- Alice - +1 (binding) - 2023-11-14 22:13:20\n"));

        let data: VoteData = store.read_json(VOTE_DATA_PATH).unwrap();
        assert_eq!(data.votes.unwrap()[0].message_id, "m1");
        assert_eq!(data.stats.unwrap().total, 1);
        assert!(data.summary_text.is_none());
    }

    #[test]
    fn test_save_summary_keeps_text_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let store = OutputStore::new(dir.path());
        let summary = "| **+1 IPMC Binding** | 4票 |\n| **+1 Non-Binding** | 2票 |\n| **总计** | **6票** |\n";

        let counts = save_summary(&store, summary).unwrap();
        assert_eq!(counts.binding_plus_one, 4);
        assert_eq!(counts.non_binding_plus_one, 2);
        assert_eq!(counts.total, 6);

        assert_eq!(store.read_text(VOTE_STATISTICS_PATH).unwrap(), summary);
        let data: VoteData = store.read_json(VOTE_DATA_PATH).unwrap();
        assert_eq!(data.summary_counts, Some(counts));
        assert!(data.votes.is_none());
    }
}
