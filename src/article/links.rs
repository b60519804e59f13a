use std::path::Path;

use crate::error::Result;
use crate::models::{LinkCatalog, LinkItem};

pub struct LinkCollector;

impl LinkCollector {
    pub fn load(path: &Path) -> Result<LinkCatalog> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn render(catalog: &LinkCatalog) -> String {
        let mut lines = vec!["## 相关资源".to_string(), String::new()];

        for (title, items) in [
            ("项目链接", &catalog.project_links),
            ("投票与提案", &catalog.vote_links),
            ("相关项目", &catalog.related_projects),
        ] {
            render_section(&mut lines, title, items);
        }

        format!("{}\n", lines.join("\n").trim_end())
    }
}

fn render_section(lines: &mut Vec<String>, title: &str, items: &[LinkItem]) {
    if items.is_empty() {
        return;
    }
    lines.push(format!("### {}", title));
    for item in items {
        let name = item.title.trim();
        let url = item.url.trim();
        if name.is_empty() || url.is_empty() {
            continue;
        }
        let desc = item.description.trim();
        if desc.is_empty() {
            lines.push(format!("- [{}]({})", name, url));
        } else {
            lines.push(format!("- [{}]({}) - {}", name, url, desc));
        }
    }
    lines.push(String::new());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_catalog() {
        let catalog: LinkCatalog = serde_json::from_value(serde_json::json!({
            "project_links": [
                {"title": "Website", "url": "https://hugegraph.apache.org", "description": "Official site"},
                {"title": "", "url": "https://skipped.example"}
            ],
            "vote_links": [],
            "related_projects": [{"title": "Toolchain", "url": "https://example.org/tc"}]
        }))
        .unwrap();

        assert_eq!(
            LinkCollector::render(&catalog),
            "## 相关资源\n\n\
             ### 项目链接\n\
             - [Website](https://hugegraph.apache.org) - Official site\n\n\
             ### 相关项目\n\
             - [Toolchain](https://example.org/tc)\n"
        );
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("links.json");
        std::fs::write(&path, r#"{"vote_links": [{"title": "Vote", "url": "https://v"}]}"#).unwrap();
        let catalog = LinkCollector::load(&path).unwrap();
        assert_eq!(catalog.vote_links.len(), 1);
        assert!(LinkCollector::load(&dir.path().join("missing.json")).is_err());
    }
}
