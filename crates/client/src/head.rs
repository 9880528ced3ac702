//! Per-render head injection.
//!
//! Preconditions are checked cheapest first, and the source list is only
//! requested once the code is set and a rule has matched:
//! 1. verification code non-empty
//! 2. some rule enables the page
//! 3. script sources non-empty
//!
//! Any failed precondition yields no output. So does a store error, which
//! is logged and otherwise swallowed.

use adunblock_core::rules::{self, RequestContext, RuleMatch};
use adunblock_core::settings::SettingsStore;
use adunblock_core::{Error, HeadInjection};

use crate::sources::ScriptSourceCache;

/// Decides and renders the head markup for one page view.
#[derive(Clone)]
pub struct HeadInjector {
    settings: SettingsStore,
    sources: ScriptSourceCache,
}

impl HeadInjector {
    pub fn new(settings: SettingsStore, sources: ScriptSourceCache) -> Self {
        Self { settings, sources }
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn sources(&self) -> &ScriptSourceCache {
        &self.sources
    }

    /// The rule enabling this page under the stored rules, if any.
    pub async fn check(&self, ctx: &RequestContext) -> Result<Option<RuleMatch>, Error> {
        let targeting = self.settings.page_rules().await?.targeting();
        Ok(rules::evaluate(&targeting, ctx))
    }

    /// Markup for this page view, or `None` when nothing should be emitted.
    pub async fn render(&self, ctx: &RequestContext) -> Option<HeadInjection> {
        match self.try_render(ctx).await {
            Ok(injection) => injection,
            Err(e) => {
                tracing::warn!(error = %e, path = %ctx.path, "head injection skipped");
                None
            }
        }
    }

    async fn try_render(&self, ctx: &RequestContext) -> Result<Option<HeadInjection>, Error> {
        let code = self.settings.verification_code().await?;
        if code.is_empty() {
            tracing::debug!("no verification code; injection disabled");
            return Ok(None);
        }

        let Some(matched) = self.check(ctx).await? else {
            tracing::debug!(path = %ctx.path, "no rule enables this page");
            return Ok(None);
        };

        let sources = self.sources.get_script_sources().await;
        let injection = HeadInjection::new(&code, &sources);
        tracing::debug!(path = %ctx.path, ?matched, injected = injection.is_some(), "head injection evaluated");
        Ok(injection)
    }
}
