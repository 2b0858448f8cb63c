/// A stored script body. No schema beyond the raw text; the empty string is a
/// valid value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptRecord {
    source: String,
}

impl ScriptRecord {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// The record returned for hosts with nothing stored.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    pub fn into_source(self) -> String {
        self.source
    }
}

impl From<String> for ScriptRecord {
    fn from(source: String) -> Self {
        Self { source }
    }
}

impl From<&str> for ScriptRecord {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}
