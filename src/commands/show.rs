use super::Session;
use crate::{
    libs::{messages::Message, view::View},
    msg_error, msg_print,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ShowArgs {
    id: i64,
}

pub fn cmd(session: &Session, args: ShowArgs) -> Result<()> {
    match session.todos.get(session.owner_id, args.id)? {
        Some(todo) => {
            msg_print!(Message::TodoHeader(todo.id), true);
            View::todo(&todo)?;
        }
        None => msg_error!(Message::TodoNotFound(args.id)),
    }
    Ok(())
}
