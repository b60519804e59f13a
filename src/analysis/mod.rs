pub mod vote_extractor;
pub mod record_builder;
pub mod statistics;
pub mod pipeline;
pub mod report;

pub use vote_extractor::{LlmStrategy, PatternStrategy, VoteExtractor, VoteStrategy};
pub use record_builder::VoteRecordBuilder;
pub use statistics::{compute_statistics, render_vote_list};
pub use pipeline::{VoteAnalysis, VoteAnalysisPipeline};
