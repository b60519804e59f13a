pub const QUOTES_HEADING: &str = "## 引用金句";

pub const COMMUNITY_TREND_CHART: &str = "[COMMUNITY_TREND_CHART]";
pub const RELEASE_TIMELINE_CHART: &str = "[RELEASE_TIMELINE_CHART]";
pub const VOTE_DISTRIBUTION_CHART: &str = "[VOTE_DISTRIBUTION_CHART]";
pub const COVER_PLACEHOLDERS: &[&str] = &["[COVER_IMAGE_PLACEHOLDER]", "[封面图占位符]", "[封面图]"];
pub const LINKS_PLACEHOLDER: &str = "[链接集合占位符]";
pub const LINKS_HEADING_PLACEHOLDER: &str = "## 链接集合占位符";

const IMAGE_DIR: &str = "../images";
const OUTPUT_IMAGE_DIR: &str = "outputs/images/";

pub fn assemble_article(content: &str, quotes: &str) -> String {
    if quotes.trim().is_empty() {
        return content.to_string();
    }
    format!("{}\n\n{}\n\n{}\n", content, QUOTES_HEADING, quotes)
}

#[derive(Debug, Clone)]
pub struct PlaceholderSubstituter {
    cover_file: String,
    links_markdown: String,
    absolute_image_prefixes: Vec<String>,
}

impl PlaceholderSubstituter {
    pub fn new(cover_file: &str, links_markdown: &str) -> Self {
        Self {
            cover_file: cover_file.to_string(),
            links_markdown: links_markdown.trim().to_string(),
            absolute_image_prefixes: Vec::new(),
        }
    }

    pub fn with_absolute_prefix(mut self, prefix: &str) -> Self {
        let mut prefix = prefix.to_string();
        if !prefix.ends_with('/') {
            prefix.push('/');
        }
        self.absolute_image_prefixes.push(prefix);
        self
    }

    pub fn substitute(&self, content: &str) -> String {
        let image = |file: &str| format!("{}/{}", IMAGE_DIR, file);

        let mut content = content
            .replace(
                COMMUNITY_TREND_CHART,
                &format!("![Community Trend]({})", image("community_trend.png")),
            )
            .replace(
                RELEASE_TIMELINE_CHART,
                &format!("![Release Timeline]({})", image("release_timeline.png")),
            )
            .replace(
                VOTE_DISTRIBUTION_CHART,
                &format!("![Vote Distribution]({})", image("vote_distribution.png")),
            );

        let relative_dir = format!("{}/", IMAGE_DIR);
        for prefix in &self.absolute_image_prefixes {
            content = content.replace(prefix.as_str(), &relative_dir);
        }
        content = content.replace(OUTPUT_IMAGE_DIR, &relative_dir);

        let cover = format!("![Cover Image]({})", image(&self.cover_file));
        for placeholder in COVER_PLACEHOLDERS {
            content = content.replace(placeholder, &cover);
        }

        // Heading-plus-token first so the pair collapses into a single block.
        let heading_pair = format!("{}\n\n{}", LINKS_HEADING_PLACEHOLDER, LINKS_PLACEHOLDER);
        content
            .replace(&heading_pair, &self.links_markdown)
            .replace(LINKS_PLACEHOLDER, &self.links_markdown)
            .replace(LINKS_HEADING_PLACEHOLDER, &self.links_markdown)
    }
}
