use once_cell::sync::Lazy;
use regex::Regex;

static SLUG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9\-_]").unwrap());
static HYPHEN_RUN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").unwrap());

/// 从名称生成 URL 友好的 slug
pub fn generate_slug(name: &str) -> String {
    // 转换为小写
    let mut slug = name.to_lowercase();

    // 替换空格为连字符
    slug = slug.replace(' ', "-");

    // 移除所有非字母数字和连字符的字符
    slug = SLUG_REGEX.replace_all(&slug, "").to_string();

    // 移除连续的连字符
    slug = HYPHEN_RUN_REGEX.replace_all(&slug, "-").to_string();

    // 移除开头和结尾的连字符
    slug = slug.trim_matches('-').to_string();

    // 限制长度
    if slug.len() > 100 {
        slug = slug.chars().take(100).collect();
        slug = slug.trim_matches('-').to_string();
    }

    // 如果 slug 为空，使用默认值
    if slug.is_empty() {
        slug = "untitled".to_string();
    }

    slug
}

/// 验证 slug 格式是否正确
pub fn is_valid_slug(slug: &str) -> bool {
    if slug.is_empty() || slug.len() > 100 {
        return false;
    }

    static VALID_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9\-_]+$").unwrap());
    if !VALID_CHARS.is_match(slug) {
        return false;
    }

    // 不能以连字符开头或结尾
    if slug.starts_with('-') || slug.ends_with('-') {
        return false;
    }

    // 不能包含连续的连字符
    if slug.contains("--") {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_slug() {
        assert_eq!(generate_slug("Local News"), "local-news");
        assert_eq!(generate_slug("Rock & Metal"), "rock-metal");
        assert_eq!(generate_slug("Top 40: The Countdown"), "top-40-the-countdown");
        assert_eq!(generate_slug(""), "untitled");
        assert_eq!(generate_slug("   "), "untitled");
        assert_eq!(generate_slug("---"), "untitled");
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("local-news"));
        assert!(is_valid_slug("top_40"));
        assert!(is_valid_slug("rock123"));

        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("-news"));
        assert!(!is_valid_slug("news-"));
        assert!(!is_valid_slug("local--news"));
        assert!(!is_valid_slug("local news"));
        assert!(!is_valid_slug("news@radio"));
    }
}
