//! `sitescript templates` – list built-in script templates.

use anyhow::Result;
use sitescript_core::handshake::TEMPLATES;

pub fn run_templates() -> Result<()> {
    println!("{:<14} {:<20} {}", "SLUG", "NAME", "SCRIPT");
    for t in TEMPLATES {
        println!("{:<14} {:<20} {}", t.slug, t.name, t.source);
    }
    Ok(())
}
