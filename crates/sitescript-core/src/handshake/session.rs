use crate::host_key::HostKey;
use crate::store::{ScriptRecord, ScriptStore, StoreError};

use super::payload::{FinalizePayload, SessionContext};
use super::template::Template;

/// One open → edit → finish cycle for a page visit.
///
/// The store is borrowed for the session's lifetime; sessions on different
/// pages may share one store, with last-write-wins for the same host.
#[derive(Debug)]
pub struct HandshakeSession<'s, S> {
    store: &'s S,
    context: SessionContext,
    host: Option<HostKey>,
    script: String,
}

/// Outcome of the save step in [`HandshakeSession::finish`].
#[derive(Debug)]
pub enum SaveStatus {
    /// Script committed under this host.
    Saved(HostKey),
    /// Page URL had no host; nothing was written.
    Skipped,
    /// The store rejected the write. The payload is still produced.
    Failed { host: HostKey, error: StoreError },
}

impl SaveStatus {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveStatus::Saved(_))
    }
}

/// Result of finishing a session.
#[derive(Debug)]
pub struct Finalized {
    pub payload: FinalizePayload,
    pub save: SaveStatus,
}

impl<'s, S: ScriptStore> HandshakeSession<'s, S> {
    /// Open a session and seed the editable text from the store.
    ///
    /// Without a host key the session is non-persistent and starts empty. A
    /// store read failure is logged and also starts empty; it never fails the
    /// session.
    pub async fn open(store: &'s S, context: SessionContext) -> Self {
        let host = context.host_key();
        let script = match &host {
            Some(key) => match store.get(key).await {
                Ok(record) => record.into_source(),
                Err(error) => {
                    tracing::warn!(host = %key, %error, "failed to load stored script; starting empty");
                    String::new()
                }
            },
            None => {
                tracing::debug!(url = %context.url, "page URL has no host; persistence disabled");
                String::new()
            }
        };
        tracing::debug!(
            title = %context.title,
            host = host.as_ref().map(HostKey::as_str).unwrap_or("-"),
            seeded_len = script.len(),
            "handshake session opened"
        );
        Self {
            store,
            context,
            host,
            script,
        }
    }

    /// Page title, for display.
    pub fn title(&self) -> &str {
        &self.context.title
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn host(&self) -> Option<&HostKey> {
        self.host.as_ref()
    }

    /// Whether `finish` will write to the store.
    pub fn is_persistent(&self) -> bool {
        self.host.is_some()
    }

    /// Current editable text.
    pub fn script(&self) -> &str {
        &self.script
    }

    /// Replace the editable text.
    pub fn set_script(&mut self, text: impl Into<String>) {
        self.script = text.into();
    }

    /// Replace the editable text with a canned snippet. Does not touch the store.
    pub fn load_template(&mut self, template: &Template) {
        self.script = template.source.to_string();
    }

    /// Save the current text under the session's host (if any), then build the
    /// payload for the host application. The save is awaited before the
    /// payload is returned.
    pub async fn finish(self) -> Finalized {
        let save = match self.host {
            Some(host) => {
                let record = ScriptRecord::new(self.script.as_str());
                match self.store.put(&host, record).await {
                    Ok(()) => {
                        tracing::info!(host = %host, "script saved");
                        SaveStatus::Saved(host)
                    }
                    Err(error) => {
                        tracing::warn!(host = %host, %error, "failed to save script");
                        SaveStatus::Failed { host, error }
                    }
                }
            }
            None => SaveStatus::Skipped,
        };
        Finalized {
            payload: FinalizePayload::new(self.script),
            save,
        }
    }
}
