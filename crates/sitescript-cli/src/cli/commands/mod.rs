//! CLI command handlers. Each command is in its own file.

mod handshake;
mod list;
mod show;
mod templates;

pub use handshake::{run_handshake, ScriptEdit};
pub use list::run_list;
pub use show::run_show;
pub use templates::run_templates;
