//! `sitescript handshake` – drive one session from a JSON payload.
//!
//! The payload is read from `--input` or stdin, the edit (if any) replaces the
//! seeded script, and the finalize payload is printed to stdout as one line of
//! JSON.

use anyhow::{Context, Result};
use sitescript_core::handshake::{find_template, HandshakeSession, SaveStatus, SessionContext, Template};
use sitescript_core::store::ScriptStore;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

/// Edit applied between open and finish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptEdit {
    /// Keep the seeded (stored) script.
    Keep,
    Replace(String),
    ReplaceFromFile(PathBuf),
    Template(&'static Template),
}

impl ScriptEdit {
    pub fn from_args(
        script: Option<String>,
        script_file: Option<PathBuf>,
        template: Option<String>,
    ) -> Result<Self> {
        match (script, script_file, template) {
            (Some(text), _, _) => Ok(ScriptEdit::Replace(text)),
            (None, Some(path), _) => Ok(ScriptEdit::ReplaceFromFile(path)),
            (None, None, Some(name)) => find_template(&name)
                .map(ScriptEdit::Template)
                .with_context(|| format!("unknown template: {name} (see `sitescript templates`)")),
            (None, None, None) => Ok(ScriptEdit::Keep),
        }
    }
}

async fn read_payload(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("read payload: {}", path.display())),
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("read payload from stdin")?;
            Ok(buf)
        }
    }
}

pub async fn run_handshake<S: ScriptStore>(
    store: &S,
    input: Option<&Path>,
    edit: ScriptEdit,
) -> Result<()> {
    let text = read_payload(input).await?;
    let context = SessionContext::from_json_str(&text);
    let mut session = HandshakeSession::open(store, context).await;

    match edit {
        ScriptEdit::Keep => {}
        ScriptEdit::Replace(text) => session.set_script(text),
        ScriptEdit::ReplaceFromFile(path) => {
            let text = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("read script: {}", path.display()))?;
            session.set_script(text);
        }
        ScriptEdit::Template(template) => session.load_template(template),
    }

    let done = session.finish().await;
    match &done.save {
        SaveStatus::Saved(host) => tracing::debug!(host = %host, "handshake finished"),
        SaveStatus::Skipped => eprintln!("sitescript: page URL has no host; script not remembered"),
        SaveStatus::Failed { host, error } => {
            eprintln!("sitescript: warning: script not saved for {host}: {error}")
        }
    }

    println!("{}", done.payload.to_json().context("serialize finalize payload")?);
    Ok(())
}
