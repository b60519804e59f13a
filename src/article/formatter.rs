use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::SummaryCounts;

static BINDING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*\+1 IPMC Binding\*\*\s*\|\s*(\d+)票").expect("valid binding count regex")
});
static NON_BINDING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*\+1 Non-Binding\*\*\s*\|\s*(\d+)票").expect("valid non-binding count regex")
});
static TOTAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*总计\*\*\s*\|\s*\*\*(\d+)票\*\*").expect("valid total count regex")
});
static PLUS_ZERO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*\+0\*\*\s*\|\s*(\d+)票").expect("valid +0 count regex")
});
static MINUS_ONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*-1\*\*\s*\|\s*(\d+)票").expect("valid -1 count regex")
});

const CONCLUSION: &str = "**结论**：项目获得社区一致支持，IPMC 成员投出绑定支持票，充分体现了项目的成熟度和社区认可。";

pub struct VoteStatisticsFormatter;

impl VoteStatisticsFormatter {
    pub fn format_summary(summary_text: &str, counts: Option<SummaryCounts>) -> String {
        let counts = counts.unwrap_or_else(|| Self::parse_counts(summary_text));
        let total = counts.resolved_total();

        let binding = counts.binding_plus_one;
        let non_binding = counts.non_binding_plus_one;
        let plus_one = binding.saturating_add(non_binding);
        let plus_zero = counts.plus_zero;
        let minus_one = counts.minus_one;

        let binding_pct = percent(binding, total);
        let non_binding_pct = percent(non_binding, total);
        let plus_one_pct = percent(plus_one, total);
        let plus_zero_pct = percent(plus_zero, total);
        let minus_one_pct = percent(minus_one, total);

        let headline = if total > 0 {
            format!("**总投票数**：{}票 | **通过率**：{} ✅", total, plus_one_pct)
        } else {
            "**总投票数**：0票".to_string()
        };

        [
            "### 投票结果概览".to_string(),
            String::new(),
            headline,
            String::new(),
            "#### 关键指标".to_string(),
            String::new(),
            "| 指标 | 数值 | 说明 |".to_string(),
            "|------|------|------|".to_string(),
            format!("| **IPMC 绑定投票** | {}票 ({}) | 具有决定权的投票 |", binding, binding_pct),
            format!("| **社区支持投票** | {}票 ({}) | 社区成员意见 |", non_binding, non_binding_pct),
            format!("| **反对票** | {}票 ({}) | 反对意见 |", minus_one, minus_one_pct),
            format!("| **弃权票** | {}票 ({}) | 弃权意见 |", plus_zero, plus_zero_pct),
            String::new(),
            "#### 投票分布".to_string(),
            String::new(),
            format!("- ✅ **+1 支持票**：{}票（{}）", plus_one, plus_one_pct),
            format!("- ⚪ **+0 弃权票**：{}票（{}）", plus_zero, plus_zero_pct),
            format!("- ❌ **-1 反对票**：{}票（{}）", minus_one, minus_one_pct),
            String::new(),
            CONCLUSION.to_string(),
        ]
        .join("\n")
    }

    /// Reads counts from the bold-label table cells of a human-written summary.
    /// Missing cells count as zero; a missing total becomes the sum of the rest.
    pub fn parse_counts(text: &str) -> SummaryCounts {
        let binding_plus_one = find_count(&BINDING_RE, text);
        let non_binding_plus_one = find_count(&NON_BINDING_RE, text);
        let plus_zero = find_count(&PLUS_ZERO_RE, text);
        let minus_one = find_count(&MINUS_ONE_RE, text);
        let total = find_count(&TOTAL_RE, text);

        let mut counts = SummaryCounts {
            binding_plus_one,
            non_binding_plus_one,
            plus_zero,
            minus_one,
            total,
        };
        counts.total = counts.resolved_total();
        counts
    }
}

fn find_count(re: &Regex, text: &str) -> u32 {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// `value / total` as a percentage with one decimal, or `0%` for an empty
/// total. Exact ties round to even (`1/16` is `6.2%`).
pub fn percent(value: u32, total: u32) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    format!("{:.1}%", value as f64 / total as f64 * 100.0)
}
