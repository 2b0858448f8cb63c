//! Wire shapes exchanged with the host application.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::host_key::HostKey;

/// Inbound key holding the page preprocessing results (`title`, `URL`).
pub const PREPROCESSING_RESULTS_KEY: &str = "NSExtensionJavaScriptPreprocessingResultsKey";
/// Outbound key wrapping the finalize argument handed back to the page.
pub const FINALIZE_ARGUMENT_KEY: &str = "NSExtensionJavaScriptFinalizeArgumentKey";

/// Page context for one session. Parsed once, with empty-string defaults for
/// anything missing or of the wrong type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    /// Display only; never persisted.
    pub title: String,
    pub url: String,
}

impl SessionContext {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }

    /// Extract context from an inbound payload value. Never fails: a missing
    /// results object, missing keys, or non-string values all become "".
    pub fn from_inbound(value: &Value) -> Self {
        let results = value.get(PREPROCESSING_RESULTS_KEY);
        let field = |name: &str| {
            results
                .and_then(|r| r.get(name))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Self {
            title: field("title"),
            url: field("URL"),
        }
    }

    /// Parse inbound payload text. Malformed JSON degrades to an empty context.
    pub fn from_json_str(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => Self::from_inbound(&value),
            Err(err) => {
                tracing::warn!(error = %err, "malformed handshake payload; using empty page context");
                Self::default()
            }
        }
    }

    /// Host key for the page URL, if it has one.
    pub fn host_key(&self) -> Option<HostKey> {
        HostKey::from_url(&self.url)
    }
}

/// Outbound payload: `{ FINALIZE_ARGUMENT_KEY: { "customJavaScript": ... } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizePayload {
    #[serde(rename = "NSExtensionJavaScriptFinalizeArgumentKey")]
    pub argument: FinalizeArgument,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizeArgument {
    #[serde(rename = "customJavaScript")]
    pub custom_javascript: String,
}

impl FinalizePayload {
    pub fn new(custom_javascript: impl Into<String>) -> Self {
        Self {
            argument: FinalizeArgument {
                custom_javascript: custom_javascript.into(),
            },
        }
    }

    /// Script the host should inject into the page.
    pub fn custom_javascript(&self) -> &str {
        &self.argument.custom_javascript
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
