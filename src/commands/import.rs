use super::Session;
use crate::{
    db::transfer::ImportMode,
    libs::{export::read_records, messages::Message},
    msg_bail_anyhow, msg_error_anyhow, msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// JSON file produced by `export`
    path: PathBuf,

    /// Delete all existing tasks before importing
    #[arg(long)]
    replace: bool,

    /// Skip the confirmation prompt for --replace
    #[arg(short, long)]
    yes: bool,
}

pub fn cmd(session: &Session, args: ImportArgs) -> Result<()> {
    if args.path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")) {
        msg_bail_anyhow!(Message::ImportFormatUnsupported(args.path.display().to_string()));
    }

    let records = read_records(&args.path)
        .map_err(|e| msg_error_anyhow!(Message::ImportFileUnreadable(args.path.display().to_string(), e.to_string())))?;
    let mode = if args.replace { ImportMode::Replace } else { ImportMode::Merge };

    if mode == ImportMode::Replace && !args.yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmReplaceImport(records.len()).to_string())
            .default(false)
            .interact()?;
        if !confirmed {
            msg_info!(Message::OperationCancelled);
            return Ok(());
        }
    }

    let outcome = session.todos.import(session.owner_id, &records, mode)?;
    msg_success!(Message::ImportCompleted(outcome.imported, outcome.mode.as_str().to_string()));
    Ok(())
}
