//! Admin settings: persisted shape, sanitization and typed access.
//!
//! Two options are stored: the verification code and the page rules. Both
//! are sanitized on the way in, so readers can trust their shape.

pub mod sanitize;

use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Error;
use crate::rules::TargetingConfig;
use crate::store::{OptionStore, TransientStore};

/// Option key for the verification code.
pub const VERIFICATION_CODE_KEY: &str = "ad_unblock_verification_code";

/// Option key for the page rules.
pub const PAGE_RULES_KEY: &str = "ad_unblock_page_rules";

/// Transient key for the cached script-source list.
pub const SCRIPT_SOURCES_KEY: &str = "ad_unblock_script_sources";

/// A persisted yes/no flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Toggle {
    #[default]
    Yes,
    No,
}

impl Toggle {
    pub fn is_yes(self) -> bool {
        self == Toggle::Yes
    }
}

/// Page rules as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PageRules {
    /// Enable on all pages.
    pub all_pages: Toggle,
    /// URL patterns, one per line.
    #[serde(default)]
    pub url_patterns: String,
    /// Enabled category ids.
    #[serde(default)]
    pub categories: Vec<i64>,
    /// Enabled tag ids.
    #[serde(default)]
    pub tags: Vec<i64>,
}

impl Default for PageRules {
    fn default() -> Self {
        Self { all_pages: Toggle::Yes, url_patterns: String::new(), categories: Vec::new(), tags: Vec::new() }
    }
}

impl PageRules {
    /// Rules that enable no page at all.
    pub fn disabled() -> Self {
        Self { all_pages: Toggle::No, ..Default::default() }
    }

    /// Rules in the shape the evaluator consumes.
    pub fn targeting(&self) -> TargetingConfig {
        TargetingConfig {
            enable_all_pages: self.all_pages.is_yes(),
            url_patterns: self.url_patterns.lines().map(str::to_string).collect(),
            category_ids: self.categories.iter().copied().collect(),
            tag_ids: self.tags.iter().copied().collect(),
        }
    }
}

/// Page rules as submitted by an admin form; any field may be missing or mistyped.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PageRulesInput {
    /// `"yes"` enables all pages; anything else (or nothing) disables.
    #[serde(default)]
    pub all_pages: Option<Value>,
    /// URL patterns, one per line.
    #[serde(default)]
    pub url_patterns: Option<Value>,
    /// Category ids; must be an array, elements are cast to integers.
    #[serde(default)]
    pub categories: Option<Value>,
    /// Tag ids; must be an array, elements are cast to integers.
    #[serde(default)]
    pub tags: Option<Value>,
}

impl PageRulesInput {
    /// Coerce the submission into storable rules.
    pub fn sanitize(&self) -> PageRules {
        let all_pages = match &self.all_pages {
            Some(Value::String(s)) if s == "yes" => Toggle::Yes,
            _ => Toggle::No,
        };
        let url_patterns = match &self.url_patterns {
            Some(Value::String(s)) => sanitize::textarea_field(s),
            _ => String::new(),
        };

        PageRules {
            all_pages,
            url_patterns,
            categories: sanitize::int_list(self.categories.as_ref()),
            tags: sanitize::int_list(self.tags.as_ref()),
        }
    }
}

/// Everything an admin can edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Settings {
    pub verification_code: String,
    pub page_rules: PageRules,
}

/// What a reset removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResetReport {
    pub verification_code: bool,
    pub page_rules: bool,
    pub script_sources: bool,
}

/// Typed access to the settings options.
#[derive(Clone)]
pub struct SettingsStore {
    options: Arc<dyn OptionStore>,
}

impl SettingsStore {
    pub fn new(options: Arc<dyn OptionStore>) -> Self {
        Self { options }
    }

    /// Stored verification code, or empty when unset.
    pub async fn verification_code(&self) -> Result<String, Error> {
        match self.options.get_option(VERIFICATION_CODE_KEY).await? {
            Some(Value::String(code)) => Ok(code),
            Some(other) => {
                tracing::warn!(kind = value_kind(&other), "verification code is not a string; treating as unset");
                Ok(String::new())
            }
            None => Ok(String::new()),
        }
    }

    /// Stored page rules. Unset rules are the defaults; unreadable rules
    /// enable nothing.
    pub async fn page_rules(&self) -> Result<PageRules, Error> {
        let Some(value) = self.options.get_option(PAGE_RULES_KEY).await? else {
            return Ok(PageRules::default());
        };

        match serde_json::from_value(value) {
            Ok(rules) => Ok(rules),
            Err(e) => {
                tracing::warn!(error = %e, "stored page rules are unreadable; disabling injection");
                Ok(PageRules::disabled())
            }
        }
    }

    pub async fn settings(&self) -> Result<Settings, Error> {
        Ok(Settings { verification_code: self.verification_code().await?, page_rules: self.page_rules().await? })
    }

    /// Sanitize and persist a verification code. Returns the stored value.
    pub async fn save_verification_code(&self, raw: &str) -> Result<String, Error> {
        let code = sanitize::text_field(raw);
        self.options
            .set_option(VERIFICATION_CODE_KEY, &Value::String(code.clone()))
            .await?;
        Ok(code)
    }

    /// Sanitize and persist page rules. Returns the stored value.
    pub async fn save_page_rules(&self, input: &PageRulesInput) -> Result<PageRules, Error> {
        let rules = input.sanitize();
        self.options
            .set_option(PAGE_RULES_KEY, &serde_json::to_value(&rules)?)
            .await?;
        Ok(rules)
    }
}

/// Remove every persisted trace: both options and the cached script sources.
pub async fn uninstall(options: &dyn OptionStore, transients: &dyn TransientStore) -> Result<ResetReport, Error> {
    let report = ResetReport {
        verification_code: options.delete_option(VERIFICATION_CODE_KEY).await?,
        page_rules: options.delete_option(PAGE_RULES_KEY).await?,
        script_sources: transients.delete_transient(SCRIPT_SOURCES_KEY).await?,
    };
    tracing::info!(?report, "cleared settings and cached script sources");
    Ok(report)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
