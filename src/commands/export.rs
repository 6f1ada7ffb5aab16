use super::Session;
use crate::{
    libs::{
        export::{ExportFormat, Exporter},
        messages::Message,
    },
    msg_success,
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// JSON can be imported again; CSV is for spreadsheets
    #[arg(short, long, value_enum, default_value = "json")]
    format: ExportFormat,

    /// Output file; defaults to a timestamped name in the current directory
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn cmd(session: &Session, args: ExportArgs) -> Result<()> {
    let records = session.todos.export(session.owner_id)?;
    let exporter = Exporter::new(args.format, args.output);
    exporter.export(&records)?;

    msg_success!(Message::ExportCompleted(exporter.output_path().display().to_string(), records.len()));
    Ok(())
}
