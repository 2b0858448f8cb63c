//! `sitescript list` – show hosts with a stored script.

use anyhow::Result;
use sitescript_core::store::ScriptStore;

pub async fn run_list<S: ScriptStore>(store: &S) -> Result<()> {
    let entries = store.entries().await?;
    if entries.is_empty() {
        println!("No scripts stored.");
    } else {
        println!("{:<40} {}", "HOST", "SIZE");
        for (host, record) in entries {
            println!("{:<40} {}", host, record.as_str().len());
        }
    }
    Ok(())
}
