//! Page-eligibility rules.
//!
//! Decides whether the recovery script belongs on a page. Rule families are
//! checked in a fixed precedence and the first positive signal wins:
//!
//! 1. all pages
//! 2. URL patterns (start-anchored, case-insensitive, `*` wildcard)
//! 3. categories/tags of a single content item
//! 4. category archive
//! 5. tag archive
//!
//! Evaluation is pure: no I/O, no clock, no shared state.

pub mod pattern;

use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use pattern::UrlPattern;

/// Targeting rules as the evaluator sees them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TargetingConfig {
    /// Enable on every page; the other fields are then ignored.
    pub enable_all_pages: bool,
    /// Wildcard patterns matched against the start of the request path.
    #[serde(default)]
    pub url_patterns: Vec<String>,
    /// Category ids that enable the script.
    #[serde(default)]
    pub category_ids: BTreeSet<i64>,
    /// Tag ids that enable the script.
    #[serde(default)]
    pub tag_ids: BTreeSet<i64>,
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self {
            enable_all_pages: true,
            url_patterns: Vec::new(),
            category_ids: BTreeSet::new(),
            tag_ids: BTreeSet::new(),
        }
    }
}

/// What kind of page is being rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageKind {
    /// A single post or page, with its taxonomy.
    Single {
        #[serde(default)]
        category_ids: BTreeSet<i64>,
        #[serde(default)]
        tag_ids: BTreeSet<i64>,
    },
    /// Listing of one category.
    CategoryArchive { category_id: Option<i64> },
    /// Listing of one tag.
    TagArchive { tag_id: Option<i64> },
    /// Home, search, author listings and anything else.
    #[default]
    Other,
}

/// Per-request facts supplied by the host platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RequestContext {
    /// Raw request path (and query), e.g. `/blog/post-1?ref=x`. Empty when unknown.
    #[serde(default)]
    pub path: String,
    /// Page classification.
    #[serde(default)]
    pub page: PageKind,
}

impl RequestContext {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), page: PageKind::Other }
    }

    pub fn with_page(mut self, page: PageKind) -> Self {
        self.page = page;
        self
    }
}

/// The rule that enabled a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "rule", content = "value", rename_all = "snake_case")]
pub enum RuleMatch {
    AllPages,
    UrlPattern(String),
    ContentCategory(i64),
    ContentTag(i64),
    CategoryArchive(i64),
    TagArchive(i64),
}

/// Evaluate the rules and report the first one that matches.
pub fn evaluate(config: &TargetingConfig, ctx: &RequestContext) -> Option<RuleMatch> {
    if config.enable_all_pages {
        return Some(RuleMatch::AllPages);
    }

    if !config.url_patterns.is_empty() && !ctx.path.is_empty() {
        let matched = pattern::compile_all(&config.url_patterns)
            .into_iter()
            .find(|p| p.matches(&ctx.path));
        if let Some(p) = matched {
            return Some(RuleMatch::UrlPattern(p.as_str().to_string()));
        }
    }

    match &ctx.page {
        PageKind::Single { category_ids, tag_ids } => {
            if let Some(id) = category_ids.iter().find(|id| config.category_ids.contains(*id)) {
                return Some(RuleMatch::ContentCategory(*id));
            }
            if let Some(id) = tag_ids.iter().find(|id| config.tag_ids.contains(*id)) {
                return Some(RuleMatch::ContentTag(*id));
            }
        }
        PageKind::CategoryArchive { category_id: Some(id) } if config.category_ids.contains(id) => {
            return Some(RuleMatch::CategoryArchive(*id));
        }
        PageKind::TagArchive { tag_id: Some(id) } if config.tag_ids.contains(id) => {
            return Some(RuleMatch::TagArchive(*id));
        }
        _ => {}
    }

    None
}

/// Whether the script should be injected for this request.
pub fn should_inject(config: &TargetingConfig, ctx: &RequestContext) -> bool {
    evaluate(config, ctx).is_some()
}
