//! Wildcard URL patterns.
//!
//! A pattern is matched case-insensitively against the start of the request
//! path. `*` stands for any run of characters; everything else is literal.

use regex::{Regex, RegexBuilder};

/// A compiled, start-anchored URL pattern.
#[derive(Debug, Clone)]
pub struct UrlPattern {
    source: String,
    regex: Regex,
}

impl UrlPattern {
    /// Compile a single pattern line.
    ///
    /// Returns `None` for empty or whitespace-only lines.
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        // regex::escape turns `*` into `\*`; only that sequence becomes a wildcard.
        let body = regex::escape(trimmed).replace(r"\*", ".*");
        let regex = RegexBuilder::new(&format!("^{body}"))
            .case_insensitive(true)
            .build()
            .ok()?;

        Some(Self { source: trimmed.to_string(), regex })
    }

    /// Pattern text as configured, trimmed.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `path` starts with this pattern.
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// Compile every non-blank line, keeping configured order.
pub fn compile_all<'a>(lines: impl IntoIterator<Item = &'a String>) -> Vec<UrlPattern> {
    lines.into_iter().filter_map(|line| UrlPattern::parse(line)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(s: &str) -> UrlPattern {
        UrlPattern::parse(s).unwrap()
    }

    #[test]
    fn test_blank_lines_skipped() {
        assert!(UrlPattern::parse("").is_none());
        assert!(UrlPattern::parse("   \t").is_none());
    }

    #[test]
    fn test_trailing_wildcard() {
        let p = pattern("/blog/*");
        assert!(p.matches("/blog/post-1"));
        assert!(p.matches("/blog/"));
        assert!(!p.matches("/news/blog/"));
        assert!(!p.matches("/blog"));
    }

    #[test]
    fn test_prefix_without_wildcard() {
        let p = pattern("/shop");
        assert!(p.matches("/shop"));
        assert!(p.matches("/shop-now"));
        assert!(p.matches("/shop/cart?id=4"));
        assert!(!p.matches("/sho"));
        assert!(!p.matches("/my/shop"));
    }

    #[test]
    fn test_case_insensitive() {
        let p = pattern("/Promo/*");
        assert!(p.matches("/PROMO/summer"));
        assert!(p.matches("/promo/summer"));
    }

    #[test]
    fn test_inner_wildcard() {
        let p = pattern("/product/*/reviews");
        assert!(p.matches("/product/42/reviews"));
        assert!(p.matches("/product//reviews/page/2"));
        assert!(!p.matches("/product/42/specs"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let p = pattern("/a.b");
        assert!(p.matches("/a.b/c"));
        assert!(!p.matches("/axb"));

        let p = pattern("/search?q=(x)");
        assert!(p.matches("/search?q=(x)&page=2"));
        assert!(!p.matches("/searchq=x"));

        let p = pattern("/c++/[docs]");
        assert!(p.matches("/c++/[docs]/intro"));
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        let p = pattern("  /blog/  ");
        assert_eq!(p.as_str(), "/blog/");
        assert!(p.matches("/blog/x"));
    }

    #[test]
    fn test_compile_all_keeps_order() {
        let lines = vec!["/b".to_string(), "".to_string(), "/a*".to_string()];
        let compiled = compile_all(&lines);
        let sources: Vec<&str> = compiled.iter().map(UrlPattern::as_str).collect();
        assert_eq!(sources, vec!["/b", "/a*"]);
    }
}
