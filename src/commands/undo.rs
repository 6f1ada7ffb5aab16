use super::Session;
use crate::{
    libs::{error::TodoError, messages::Message},
    msg_success, msg_warning,
};
use anyhow::Result;

pub fn cmd(session: &Session) -> Result<()> {
    match session.todos.undo(session.owner_id) {
        Ok(restored) => msg_success!(Message::UndoApplied(restored)),
        Err(TodoError::NoUndoAvailable) => msg_warning!(Message::NoUndoAvailable),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
