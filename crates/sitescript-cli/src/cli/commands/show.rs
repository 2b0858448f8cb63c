//! `sitescript show <url>` – print the stored script for a URL's host.

use anyhow::{Context, Result};
use sitescript_core::host_key::HostKey;
use sitescript_core::store::ScriptStore;

pub async fn run_show<S: ScriptStore>(store: &S, url: &str) -> Result<()> {
    let key = HostKey::from_url(url).with_context(|| format!("URL has no host: {url}"))?;
    let record = store.get(&key).await?;
    if record.is_empty() {
        eprintln!("No script stored for {key}.");
    } else {
        println!("{}", record.as_str());
    }
    Ok(())
}
