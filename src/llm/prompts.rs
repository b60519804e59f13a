use std::path::Path;

const BASE_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

const LONG_FORM_REQUIREMENT: &str = "IMPORTANT: You must generate a detailed article with 2000-3000 Chinese characters (not words). This is a hard requirement. Expand each section with sufficient details, examples, and explanations. Do not be concise - provide comprehensive content.";

pub const VOTE_BODY_LIMIT: usize = 1000;

pub const DEFAULT_OUTLINE_PROMPT: &str = r#"你是一名开源社区的技术编辑。请为下面的主题规划一篇公众号文章的大纲。

返回 JSON 对象：
{
  "title": "文章标题",
  "sections": [
    {"heading": "章节标题", "points": ["要点"]}
  ]
}"#;

pub const DEFAULT_ARTICLE_PROMPT: &str = r#"你是一名开源社区的技术编辑，请根据提供的项目信息与投票统计撰写一篇项目毕业公告文章。

要求：
- 使用 Markdown，包含：项目简介、孵化历程、关键成就亮点、投票结果、致谢与展望
- 在合适的位置保留占位符：[COVER_IMAGE_PLACEHOLDER]、[COMMUNITY_TREND_CHART]、[RELEASE_TIMELINE_CHART]、[VOTE_DISTRIBUTION_CHART]、[链接集合占位符]
- 投票结果部分直接引用提供的投票统计

返回 JSON 对象：
{
  "title": "文章标题",
  "meta_description": "一句话摘要",
  "content": "Markdown 正文"
}"#;

pub const DEFAULT_QUOTE_PROMPT: &str = r#"从下面的投票邮件正文中摘录 1-3 句祝贺或支持项目的原话。

规则：
- 只能使用邮件中真实出现的句子，不要改写或编造
- 每条引用单独一行，格式为：> 原句 — 发件人姓名
- 如果没有合适的句子，返回空字符串，不要解释"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Creativity {
    Conservative,
    Balanced,
}

impl Creativity {
    pub fn temperature(&self) -> f32 {
        match self {
            Creativity::Conservative => 0.3,
            Creativity::Balanced => 0.5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub category: String,
    pub vibe: String,
    pub instruction: String,
    pub creativity: Creativity,
    pub structured: bool,
    pub long_form: bool,
}

impl CompletionRequest {
    pub fn new(category: &str, vibe: &str, instruction: String) -> Self {
        Self {
            category: category.to_string(),
            vibe: vibe.to_string(),
            instruction,
            creativity: Creativity::Balanced,
            structured: false,
            long_form: false,
        }
    }

    pub fn creativity(mut self, creativity: Creativity) -> Self {
        self.creativity = creativity;
        self
    }

    pub fn structured(mut self) -> Self {
        self.structured = true;
        self
    }

    pub fn long_form(mut self) -> Self {
        self.long_form = true;
        self
    }

    pub fn system_prompt(&self) -> String {
        let mut system = format!("{} {} {}", BASE_SYSTEM_PROMPT, self.category, self.vibe)
            .trim()
            .to_string();
        if self.long_form {
            system.push_str("\n\n");
            system.push_str(LONG_FORM_REQUIREMENT);
        }
        system
    }

    pub fn max_tokens(&self) -> u32 {
        if self.long_form {
            6000
        } else {
            2000
        }
    }

    pub fn vote_extraction(body: &str) -> Self {
        let excerpt: String = body.chars().take(VOTE_BODY_LIMIT).collect();
        let instruction = format!(
            r#"从以下邮件正文中提取投票信息：

邮件正文：
{excerpt}

请提取以下信息：
1. 投票值：查找 "+1"、"-1"、"+0"（通常位于正文开头）
2. 绑定类型：查找 "binding" 或 "non-binding"（大小写不敏感）
3. 原始文本：包含投票值的一行

如果找不到投票信息，vote_value 返回 null。

返回 JSON 格式：
{{
  "vote_value": "+1" | "-1" | "+0" | null,
  "binding_type": "binding" | "non-binding" | null,
  "raw_text": "原始投票文本"
}}"#
        );

        Self::new("Analyzing", "Data Extraction", instruction)
            .creativity(Creativity::Conservative)
            .structured()
    }

    pub fn quote_extraction(template: &str, vote_context: &str) -> Self {
        let instruction = format!("{}\n\n投票邮件正文:\n{}", template, vote_context);
        Self::new("Creating", "Quote Extraction", instruction).creativity(Creativity::Conservative)
    }

    pub fn outline(template: &str, topic: &str, requirements: &serde_json::Value) -> Self {
        let instruction = format!("{}\n\n主题: {}\n需求: {}", template, topic, requirements);
        Self::new("Creating", "Outline", instruction)
            .creativity(Creativity::Conservative)
            .structured()
    }

    pub fn article(template: &str, topic: &str, project_info: &str, vote_summary: &str) -> Self {
        let instruction = format!(
            "{template}\n\n\
             ## 主题\n{topic}\n\n\
             ## 项目信息\n{project_info}\n\n\
             ## 投票统计\n{vote_summary}\n\n\
             ## 字数要求\n\
             **必须达到 2000-3000 字，这是硬性要求！**\n\n\
             请详细展开每个部分：\n\
             - 项目简介部分：至少 300 字\n\
             - 孵化历程部分：至少 400 字\n\
             - 关键成就亮点部分：每个亮点至少 200 字\n\
             - 投票结果部分：至少 300 字\n\
             - 致谢与展望部分：至少 300 字"
        );
        Self::new("Creating", "Writing Content", instruction)
            .creativity(Creativity::Balanced)
            .structured()
            .long_form()
    }
}

#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub outline: String,
    pub article: String,
    pub quote: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            outline: DEFAULT_OUTLINE_PROMPT.to_string(),
            article: DEFAULT_ARTICLE_PROMPT.to_string(),
            quote: DEFAULT_QUOTE_PROMPT.to_string(),
        }
    }
}

impl PromptTemplates {
    pub fn load(dir: &Path) -> Self {
        let defaults = Self::default();
        Self {
            outline: read_or(dir, "outline_generation.md", defaults.outline),
            article: read_or(dir, "article_generation.md", defaults.article),
            quote: read_or(dir, "quote_extraction.md", defaults.quote),
        }
    }
}

fn read_or(dir: &Path, file: &str, fallback: String) -> String {
    let path = dir.join(file);
    match std::fs::read_to_string(&path) {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => fallback,
        Err(_) => {
            tracing::debug!("Prompt template {} not found, using built-in", path.display());
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_extraction_truncates_by_chars() {
        let body = "投".repeat(1500);
        let request = CompletionRequest::vote_extraction(&body);
        assert!(request.instruction.contains(&"投".repeat(1000)));
        assert!(!request.instruction.contains(&"投".repeat(1001)));
        assert!(request.structured);
        assert_eq!(request.creativity, Creativity::Conservative);
        assert_eq!(request.max_tokens(), 2000);
    }

    #[test]
    fn test_task_temperatures() {
        assert_eq!(Creativity::Conservative.temperature(), 0.3);
        assert_eq!(Creativity::Balanced.temperature(), 0.5);
        assert_eq!(CompletionRequest::outline("tpl", "topic", &serde_json::json!({})).creativity, Creativity::Conservative);
        assert_eq!(CompletionRequest::article("tpl", "topic", "info", "summary").creativity, Creativity::Balanced);
    }

    #[test]
    fn test_article_request_is_long_form() {
        let request = CompletionRequest::article("tpl", "topic", "info", "summary");
        assert_eq!(request.max_tokens(), 6000);
        assert!(request.system_prompt().contains("2000-3000 Chinese characters"));
        assert!(request.system_prompt().starts_with("You are a helpful assistant. Creating Writing Content"));
    }

    #[test]
    fn test_templates_override_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("quote_extraction.md"), "custom quote prompt").unwrap();
        let templates = PromptTemplates::load(dir.path());
        assert_eq!(templates.quote, "custom quote prompt");
        assert_eq!(templates.outline, DEFAULT_OUTLINE_PROMPT);
    }
}
