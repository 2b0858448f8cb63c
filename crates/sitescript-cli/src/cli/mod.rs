//! CLI for SiteScript: a host bridge for the page handshake plus store inspection.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use sitescript_core::config::{self, SiteScriptConfig, StoreBackend};
use sitescript_core::store::ConfiguredStore;
use std::path::PathBuf;

use commands::{run_handshake, run_list, run_show, run_templates, ScriptEdit};

/// Top-level CLI for SiteScript.
#[derive(Debug, Parser)]
#[command(name = "sitescript")]
#[command(about = "SiteScript: remember a custom script per website host", long_about = None)]
pub struct Cli {
    /// Override the configured store backend.
    #[arg(long, global = true, value_enum, value_name = "BACKEND")]
    pub store: Option<StoreArg>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreArg {
    Json,
    Sqlite,
}

impl From<StoreArg> for StoreBackend {
    fn from(arg: StoreArg) -> Self {
        match arg {
            StoreArg::Json => StoreBackend::Json,
            StoreArg::Sqlite => StoreBackend::Sqlite,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run one handshake: read the page payload, apply an edit, save, print the finalize payload.
    Handshake {
        /// Read the inbound payload from this file instead of stdin.
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Replace the script with this text.
        #[arg(long, conflicts_with_all = ["script_file", "template"])]
        script: Option<String>,

        /// Replace the script with the contents of this file.
        #[arg(long, value_name = "FILE", conflicts_with = "template")]
        script_file: Option<PathBuf>,

        /// Replace the script with a built-in template (see `templates`).
        #[arg(long, value_name = "NAME")]
        template: Option<String>,
    },

    /// Print the stored script for a page URL's host.
    Show {
        /// Any URL on the host.
        url: String,
    },

    /// List hosts with a stored script.
    List,

    /// List built-in script templates.
    Templates,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = config::load_or_init()?;
        if let Some(store) = cli.store {
            cfg.store = store.into();
        }
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Handshake {
                input,
                script,
                script_file,
                template,
            } => {
                let edit = ScriptEdit::from_args(script, script_file, template)?;
                let store = open_store(&cfg).await?;
                run_handshake(&store, input.as_deref(), edit).await?
            }
            CliCommand::Show { url } => run_show(&open_store(&cfg).await?, &url).await?,
            CliCommand::List => run_list(&open_store(&cfg).await?).await?,
            CliCommand::Templates => run_templates()?,
        }

        Ok(())
    }
}

async fn open_store(cfg: &SiteScriptConfig) -> Result<ConfiguredStore> {
    ConfiguredStore::open(cfg)
        .await
        .context("open script store")
}

#[cfg(test)]
mod tests;
