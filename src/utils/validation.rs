use once_cell::sync::Lazy;
use regex::Regex;

/// 文章内容的最大字符数
pub const MAX_CONTENT_LENGTH: usize = 100_000;

/// 危险内容模式
/// 这是清理前的预检查（纵深防御），不能替代清理器本身
static DANGEROUS_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"(?is)<script\b").unwrap(),
            "Content must not contain script tags",
        ),
        (
            Regex::new(r"(?i)javascript\s*:").unwrap(),
            "Content must not contain javascript: URIs",
        ),
        (
            Regex::new(r"(?i)\bon\w+\s*=").unwrap(),
            "Content must not contain inline event handlers",
        ),
        (
            Regex::new(r"(?is)<iframe\b").unwrap(),
            "Content must not contain iframe tags",
        ),
        (
            Regex::new(r"(?is)<object\b").unwrap(),
            "Content must not contain object tags",
        ),
        (
            Regex::new(r"(?is)<embed\b").unwrap(),
            "Content must not contain embed tags",
        ),
    ]
});

/// 内容校验结果，不落库
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// 把所有错误拼接成一条给客户端的消息
    pub fn joined_errors(&self) -> String {
        self.errors.join("; ")
    }
}

/// 校验用户提交的 Markdown 内容
pub fn validate_content(content: &str) -> ValidationResult {
    let mut errors = Vec::new();

    if content.trim().is_empty() {
        errors.push("Content must not be empty".to_string());
    }

    if content.chars().count() > MAX_CONTENT_LENGTH {
        errors.push(format!(
            "Content must not exceed {} characters",
            MAX_CONTENT_LENGTH
        ));
    }

    for (pattern, message) in DANGEROUS_PATTERNS.iter() {
        if pattern.is_match(content) {
            errors.push((*message).to_string());
        }
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_content_accepts_plain_markdown() {
        let result = validate_content("# Hello\n\nJust some **markdown** text.");
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_validate_content_rejects_empty() {
        assert!(!validate_content("").is_valid);
        assert!(!validate_content("   \n\t ").is_valid);
    }

    #[test]
    fn test_validate_content_rejects_script_tags() {
        let result = validate_content("hello <script>alert(1)</script>");
        assert!(!result.is_valid);

        // 大小写混合也要命中
        assert!(!validate_content("<ScRiPt src='x'>").is_valid);
    }

    #[test]
    fn test_validate_content_rejects_javascript_uris() {
        assert!(!validate_content("[x](javascript:alert(1))").is_valid);
        assert!(!validate_content("[x](JAVASCRIPT : alert(1))").is_valid);
    }

    #[test]
    fn test_validate_content_rejects_event_handlers() {
        assert!(!validate_content(r#"<img src=x onerror="alert(1)">"#).is_valid);
        assert!(!validate_content("<div onclick=go()>").is_valid);
    }

    #[test]
    fn test_validate_content_rejects_embedding_tags() {
        assert!(!validate_content("<iframe src='https://evil'></iframe>").is_valid);
        assert!(!validate_content("<object data='x'>").is_valid);
        assert!(!validate_content("<embed src='x'>").is_valid);
    }

    #[test]
    fn test_validate_content_length_boundary() {
        // 正好 100,000 个字符有效
        let at_limit = "a".repeat(MAX_CONTENT_LENGTH);
        assert!(validate_content(&at_limit).is_valid);

        // 100,001 个字符被拒绝
        let over_limit = "a".repeat(MAX_CONTENT_LENGTH + 1);
        let result = validate_content(&over_limit);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn test_validate_content_collects_all_errors() {
        let result = validate_content("<script>x</script><iframe></iframe>");
        assert!(!result.is_valid);
        assert!(result.errors.len() >= 2);
        assert!(result.joined_errors().contains("; "));
    }
}
