use super::Session;
use crate::{libs::messages::Message, msg_error, msg_info, msg_success};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct RmArgs {
    id: i64,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

pub fn cmd(session: &Session, args: RmArgs) -> Result<()> {
    let Some(todo) = session.todos.get(session.owner_id, args.id)? else {
        msg_error!(Message::TodoNotFound(args.id));
        return Ok(());
    };

    if !args.yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmDeleteSubtree(todo.id, todo.title).to_string())
            .default(false)
            .interact()?;
        if !confirmed {
            msg_info!(Message::OperationCancelled);
            return Ok(());
        }
    }

    let deleted = session.todos.delete_tree(session.owner_id, args.id)?;
    msg_success!(Message::TodosDeleted(deleted));
    Ok(())
}
