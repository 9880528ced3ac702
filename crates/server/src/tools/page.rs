//! render_head and check_page tool implementations.
//!
//! Both take the per-request facts a host page render would supply.

use adunblock_core::{HeadInjection, PageKind, RequestContext, RuleMatch};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;
use crate::state::AppState;

/// Input parameters for render_head and check_page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PageParams {
    /// Request path with optional query, e.g. `/blog/post-1`. Empty when unknown.
    #[serde(default)]
    pub path: String,

    /// Page classification: `single` (with `category_ids`/`tag_ids`),
    /// `category_archive` (with `category_id`), `tag_archive` (with `tag_id`), or `other`.
    #[serde(default)]
    pub page: PageKind,
}

impl From<PageParams> for RequestContext {
    fn from(params: PageParams) -> Self {
        RequestContext::new(params.path).with_page(params.page)
    }
}

/// Output structure for render_head.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RenderHeadOutput {
    /// Whether anything was emitted.
    pub injected: bool,
    /// Markup for the document head; empty when nothing is emitted.
    pub html: String,
    /// The verification code and script source used.
    pub injection: Option<HeadInjection>,
}

/// Output structure for check_page.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CheckPageOutput {
    /// Whether the rules enable this page.
    pub enabled: bool,
    /// The first rule that matched.
    pub matched: Option<RuleMatch>,
}

/// Implementation of the render_head tool.
pub async fn render_head_impl(state: &AppState, params: PageParams) -> Result<CallToolResult, McpError> {
    let ctx = RequestContext::from(params);
    let injection = state.injector.render(&ctx).await;

    let output = RenderHeadOutput {
        injected: injection.is_some(),
        html: injection.as_ref().map(HeadInjection::to_html).unwrap_or_default(),
        injection,
    };
    json_result(&output)
}

/// Implementation of the check_page tool.
pub async fn check_page_impl(state: &AppState, params: PageParams) -> Result<CallToolResult, McpError> {
    let ctx = RequestContext::from(params);
    let matched = state.injector.check(&ctx).await?;

    json_result(&CheckPageOutput { enabled: matched.is_some(), matched })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{decode, state};
    use adunblock_core::settings::PageRulesInput;
    use serde_json::json;

    async fn promo_only(state: &AppState) {
        let settings = state.injector.settings();
        settings.save_verification_code("ABC123").await.unwrap();
        let input = PageRulesInput {
            all_pages: Some(json!("no")),
            url_patterns: Some(json!("/promo/*")),
            tags: Some(json!([12])),
            ..Default::default()
        };
        settings.save_page_rules(&input).await.unwrap();
    }

    #[test]
    fn test_params_deserialize() {
        let params: PageParams =
            serde_json::from_value(json!({"path": "/t/rust", "page": {"kind": "tag_archive", "tag_id": 12}})).unwrap();
        let ctx = RequestContext::from(params);
        assert_eq!(ctx.path, "/t/rust");
        assert_eq!(ctx.page, PageKind::TagArchive { tag_id: Some(12) });

        let params: PageParams = serde_json::from_value(json!({})).unwrap();
        assert_eq!(RequestContext::from(params), RequestContext::default());
    }

    #[tokio::test]
    async fn test_render_head_promo() {
        let (state, _store, fetcher) = state(&["https://cdn.example/s1.js"]);
        promo_only(&state).await;

        let params = PageParams { path: "/promo/summer".into(), ..Default::default() };
        let output: RenderHeadOutput = decode(&render_head_impl(&state, params).await.unwrap());

        assert!(output.injected);
        assert_eq!(
            output.html,
            "<meta name=\"ad-unblock-verification\" content=\"ABC123\" />\n\
             <script id=\"ad-unblock-script-js\" src=\"https://cdn.example/s1.js\" async></script>"
        );
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_render_head_unmatched() {
        let (state, _store, fetcher) = state(&["https://cdn.example/s1.js"]);
        promo_only(&state).await;

        let params = PageParams { path: "/about".into(), ..Default::default() };
        let output: RenderHeadOutput = decode(&render_head_impl(&state, params).await.unwrap());

        assert!(!output.injected);
        assert!(output.html.is_empty());
        assert!(output.injection.is_none());
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_check_page() {
        let (state, _store, _fetcher) = state(&[]);
        promo_only(&state).await;

        let params = PageParams { path: "/promo/x".into(), ..Default::default() };
        let output: CheckPageOutput = decode(&check_page_impl(&state, params).await.unwrap());
        assert!(output.enabled);
        assert_eq!(output.matched, Some(RuleMatch::UrlPattern("/promo/*".into())));

        let params = PageParams { path: "/t/rust".into(), page: PageKind::TagArchive { tag_id: Some(12) } };
        let output: CheckPageOutput = decode(&check_page_impl(&state, params).await.unwrap());
        assert_eq!(output.matched, Some(RuleMatch::TagArchive(12)));

        let params = PageParams { path: "/about".into(), ..Default::default() };
        let output: CheckPageOutput = decode(&check_page_impl(&state, params).await.unwrap());
        assert!(!output.enabled);
        assert!(output.matched.is_none());
    }
}
