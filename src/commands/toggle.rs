use super::Session;
use crate::{libs::messages::Message, msg_error, msg_success};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ToggleArgs {
    id: i64,
}

pub fn cmd(session: &Session, args: ToggleArgs) -> Result<()> {
    match session.todos.toggle(session.owner_id, args.id)? {
        Some(todo) if todo.completed => msg_success!(Message::TodoCompleted(todo.id)),
        Some(todo) => msg_success!(Message::TodoReopened(todo.id)),
        None => msg_error!(Message::TodoNotFound(args.id)),
    }
    Ok(())
}
