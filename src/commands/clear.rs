use super::Session;
use crate::{libs::messages::Message, msg_info, msg_success};
use anyhow::Result;

pub fn cmd(session: &Session) -> Result<()> {
    match session.todos.clear_completed(session.owner_id)? {
        0 => msg_info!(Message::NothingToClear),
        cleared => msg_success!(Message::CompletedCleared(cleared)),
    }
    Ok(())
}
