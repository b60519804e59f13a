use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

pub const VOTE_DATA_PATH: &str = "outputs/data/vote_data.json";
pub const VOTE_STATISTICS_PATH: &str = "outputs/statistics/vote_statistics.md";
pub const ARTICLE_PATH: &str = "outputs/articles/graduation_article.md";
pub const OUTLINE_PATH: &str = "outputs/data/article_outline.json";
pub const IMAGES_DIR: &str = "outputs/images";

#[derive(Debug, Clone)]
pub struct OutputStore {
    root: PathBuf,
}

impl OutputStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn exists<P: AsRef<Path>>(&self, path: P) -> bool {
        self.resolve(path).exists()
    }

    pub fn read_text<P: AsRef<Path>>(&self, path: P) -> Result<String> {
        Ok(std::fs::read_to_string(self.resolve(path))?)
    }

    pub fn write_text<P: AsRef<Path>>(&self, path: P, content: &str) -> Result<PathBuf> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&full, content)?;
        tracing::debug!("Wrote {}", full.display());
        Ok(full)
    }

    pub fn read_json<T: DeserializeOwned, P: AsRef<Path>>(&self, path: P) -> Result<T> {
        let raw = self.read_text(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json<T: Serialize, P: AsRef<Path>>(&self, path: P, value: &T) -> Result<PathBuf> {
        let json = serde_json::to_string_pretty(value)?;
        self.write_text(path, &json)
    }
}
