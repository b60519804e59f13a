pub mod files;
pub mod sqlite;

pub use files::{OutputStore, ARTICLE_PATH, IMAGES_DIR, OUTLINE_PATH, VOTE_DATA_PATH, VOTE_STATISTICS_PATH};
pub use sqlite::{CachedAnalysis, Storage};
