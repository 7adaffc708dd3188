use ammonia::Builder;
use maplit::{hashmap, hashset};
use once_cell::sync::Lazy;
use pulldown_cmark::{html, Event, Options, Parser};
use regex::Regex;

static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

#[derive(Clone)]
pub struct MarkdownProcessor {}

impl Default for MarkdownProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownProcessor {
    pub fn new() -> Self {
        Self {}
    }

    fn get_sanitizer() -> Builder<'static> {
        // 配置 HTML 清理器
        let mut sanitizer = Builder::default();

        // 允许的标签
        sanitizer.tags(hashset![
            "h1", "h2", "h3", "h4", "h5", "h6",
            "p", "br", "hr",
            "strong", "em", "u", "s", "del",
            "pre", "code", "blockquote",
            "ul", "ol", "li",
            "a", "img",
            "table", "thead", "tbody", "tr", "th", "td",
            "div", "span"
        ]);

        // 配置标签属性
        sanitizer.tag_attributes(hashmap! {
            "a" => hashset!["href", "title", "target", "rel"],
            "img" => hashset!["src", "alt", "title", "width", "height"],
            "pre" => hashset!["class"],
            "code" => hashset!["class"],
            "div" => hashset!["class"],
            "span" => hashset!["class"],
        });

        // URI 属性只允许这些协议，其余一律剥离
        sanitizer.url_schemes(hashset!["http", "https", "mailto"]);

        // rel 属性在允许列表里，交给作者控制
        sanitizer.link_rel(None);

        sanitizer
    }

    /// 将 Markdown 转换为安全的 HTML
    /// 输出永远经过清理器，任何输入都不会产生未清理的标记
    pub fn to_html(&self, markdown: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);

        // 单个换行渲染为 <br>
        let parser = Parser::new_ext(markdown, options).map(|event| match event {
            Event::SoftBreak => Event::HardBreak,
            event => event,
        });

        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        Self::get_sanitizer().clean(&html_output).to_string()
    }

    /// 按允许列表清理 HTML
    /// 不允许的标签被移除但保留其文本内容，清理是幂等的
    pub fn sanitize_html(&self, html: &str) -> String {
        Self::get_sanitizer().clean(html).to_string()
    }

    /// 从 HTML 提取纯文本（用于摘要和搜索）
    pub fn html_to_plain_text(&self, html: &str, max_length: Option<usize>) -> String {
        let text = TAG_REGEX.replace_all(html, "");
        let text = Self::decode_entities(&text);
        let text = WHITESPACE_REGEX.replace_all(&text, " ").trim().to_string();

        if let Some(max_length) = max_length {
            if text.chars().count() > max_length {
                let truncated: String = text.chars().take(max_length).collect();
                return format!("{}...", truncated.trim_end());
            }
        }

        text
    }

    /// 无条件移除所有标签，不做实体解码
    /// 作为兜底的文本提取器
    pub fn strip_html(&self, html: &str) -> String {
        TAG_REGEX.replace_all(html, "").to_string()
    }

    /// 生成文章摘要
    pub fn generate_excerpt(&self, markdown: &str, max_length: usize) -> String {
        let html = self.to_html(markdown);
        self.html_to_plain_text(&html, Some(max_length))
    }

    /// 解码固定集合的 HTML 实体
    /// &amp; 必须最后解码，避免 &amp;lt; 被二次解码成 <
    fn decode_entities(text: &str) -> String {
        text.replace("&nbsp;", " ")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_markdown_to_html() {
        let processor = MarkdownProcessor::new();

        let markdown = "# Hello World\n\nThis is **bold** text.";
        let html = processor.to_html(markdown);

        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn test_to_html_renders_line_breaks() {
        let processor = MarkdownProcessor::new();

        let html = processor.to_html("first line\nsecond line");

        assert!(html.contains("<br"));
    }

    #[test]
    fn test_to_html_renders_tables() {
        let processor = MarkdownProcessor::new();

        let markdown = "| a | b |\n|---|---|\n| 1 | 2 |";
        let html = processor.to_html(markdown);

        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn test_to_html_never_emits_script() {
        let processor = MarkdownProcessor::new();

        let markdown = "before\n\n<script>alert(1)</script>Hello\n\nafter";
        let html = processor.to_html(markdown);

        assert!(!html.contains("<script"));
        assert!(!html.contains("alert(1)"));
        assert!(html.contains("Hello"));
    }

    #[test]
    fn test_sanitize_html_keeps_text_of_stripped_tags() {
        let processor = MarkdownProcessor::new();

        let html = processor.sanitize_html("<section><p>Hello</p></section>");

        assert!(!html.contains("<section"));
        assert!(html.contains("<p>Hello</p>"));
    }

    #[test]
    fn test_sanitize_html_drops_script_content() {
        let processor = MarkdownProcessor::new();

        let html = processor.sanitize_html("<script>alert(1)</script>Hello");

        assert!(!html.contains("<script"));
        assert!(!html.contains("alert(1)"));
        assert!(html.contains("Hello"));
    }

    #[test]
    fn test_sanitize_html_strips_disallowed_attributes() {
        let processor = MarkdownProcessor::new();

        let html = processor.sanitize_html(r#"<p onclick="alert(1)" class="x">Hi</p>"#);

        assert!(!html.contains("onclick"));
        // p 不在 class 的允许列表里
        assert!(!html.contains("class"));
        assert!(html.contains("Hi"));
    }

    #[test]
    fn test_sanitize_html_strips_javascript_uris() {
        let processor = MarkdownProcessor::new();

        let html = processor.sanitize_html(r#"<a href="javascript:alert(1)">link</a>"#);

        assert!(!html.contains("javascript:"));
        assert!(html.contains("link"));

        let html = processor.sanitize_html(r#"<a href="https://example.com">ok</a>"#);
        assert!(html.contains(r#"href="https://example.com""#));
    }

    #[test]
    fn test_sanitize_html_keeps_image_dimensions() {
        let processor = MarkdownProcessor::new();

        let html = processor
            .sanitize_html(r#"<img src="https://example.com/a.png" alt="a" width="10" height="20">"#);

        assert!(html.contains(r#"width="10""#));
        assert!(html.contains(r#"height="20""#));
    }

    #[test]
    fn test_html_to_plain_text_decodes_entities() {
        let processor = MarkdownProcessor::new();

        assert_eq!(
            processor.html_to_plain_text("<p>A&nbsp;B</p>", Some(100)),
            "A B"
        );
        // &amp; 最后解码：&amp;lt; 是字面量 &lt;，不是 <
        assert_eq!(processor.html_to_plain_text("&amp;lt;", None), "&lt;");
    }

    #[test]
    fn test_html_to_plain_text_collapses_whitespace() {
        let processor = MarkdownProcessor::new();

        assert_eq!(
            processor.html_to_plain_text("<p>  a \n\n b\t c  </p>", None),
            "a b c"
        );
    }

    #[test]
    fn test_html_to_plain_text_truncates() {
        let processor = MarkdownProcessor::new();

        let text = processor.html_to_plain_text("<p>aaaaaaaaaaaaaaaaaaaa</p>", Some(10));

        assert!(text.ends_with("..."));
        assert!(text.chars().count() <= 13);
    }

    #[test]
    fn test_strip_html_keeps_entities() {
        let processor = MarkdownProcessor::new();

        assert_eq!(processor.strip_html("<p>&amp; &lt;</p>"), "&amp; &lt;");
    }

    #[test]
    fn test_generate_excerpt() {
        let processor = MarkdownProcessor::new();

        let markdown = "# Title\n\nThis is a very long article body that should be truncated at some reasonable point for the card view.";
        let excerpt = processor.generate_excerpt(markdown, 50);

        assert!(excerpt.chars().count() <= 53);
        assert!(excerpt.ends_with("..."));
        assert!(excerpt.starts_with("Title"));
    }

    proptest! {
        #[test]
        fn prop_sanitize_html_is_idempotent(input in ".*") {
            let processor = MarkdownProcessor::new();
            let once = processor.sanitize_html(&input);
            let twice = processor.sanitize_html(&once);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_plain_text_respects_max_length(input in ".*", max in 1usize..64) {
            let processor = MarkdownProcessor::new();
            let text = processor.html_to_plain_text(&input, Some(max));
            prop_assert!(text.chars().count() <= max + 3);
        }

        #[test]
        fn prop_to_html_never_emits_script(input in ".*") {
            let processor = MarkdownProcessor::new();
            let html = processor.to_html(&input);
            prop_assert!(!html.contains("<script"));
        }
    }
}
