pub mod formatter;
pub mod quotes;
pub mod assembler;
pub mod links;
pub mod summary;
pub mod generator;
pub mod workflow;

pub use formatter::VoteStatisticsFormatter;
pub use quotes::QuoteExtractor;
pub use assembler::{assemble_article, PlaceholderSubstituter};
pub use links::LinkCollector;
pub use summary::votes_from_summary;
pub use generator::ArticleGenerator;
pub use workflow::{ArticleWorkflow, SavedArticle};
