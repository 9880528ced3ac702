//! Head markup for the verification marker and the recovery script.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use url::Url;

/// `name` attribute of the verification `<meta>` tag.
pub const VERIFICATION_META_NAME: &str = "ad-unblock-verification";

/// `id` attribute of the injected `<script>` tag.
pub const SCRIPT_ELEMENT_ID: &str = "ad-unblock-script-js";

/// What gets written into the document head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HeadInjection {
    pub verification_code: String,
    pub script_src: String,
}

impl HeadInjection {
    /// Build the injection from a verification code and the fetched source list.
    ///
    /// Only the first source is used. Returns `None` when the code is empty,
    /// the list is empty, or the first entry is not an absolute http(s) URL.
    pub fn new(verification_code: &str, sources: &[String]) -> Option<Self> {
        if verification_code.is_empty() {
            return None;
        }

        let first = sources.first()?;
        let script_src = match Url::parse(first.trim()) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => url.to_string(),
            Ok(url) => {
                tracing::warn!(scheme = url.scheme(), "refusing script source with unsupported scheme");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "refusing unparsable script source");
                return None;
            }
        };

        Some(Self { verification_code: verification_code.to_string(), script_src })
    }

    pub fn meta_tag(&self) -> String {
        format!(r#"<meta name="{VERIFICATION_META_NAME}" content="{}" />"#, escape_attr(&self.verification_code))
    }

    pub fn script_tag(&self) -> String {
        format!(r#"<script id="{SCRIPT_ELEMENT_ID}" src="{}" async></script>"#, escape_attr(&self.script_src))
    }

    /// Meta marker followed by the script tag, one per line.
    pub fn to_html(&self) -> String {
        format!("{}\n{}", self.meta_tag(), self.script_tag())
    }
}

fn escape_attr(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}
