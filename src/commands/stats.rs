use super::Session;
use crate::{
    libs::{messages::Message, view::View},
    msg_print,
};
use anyhow::Result;

pub fn cmd(session: &Session) -> Result<()> {
    let stats = session.todos.stats(session.owner_id)?;
    msg_print!(Message::StatsHeader, true);
    msg_print!(Message::StatsLine(stats.total, stats.completed, stats.active));

    let projects = session.todos.projects(session.owner_id)?;
    if !projects.is_empty() {
        msg_print!(Message::ProjectsHeader, true);
        View::projects(&projects)?;
    }

    msg_print!(Message::UndoDepth(session.todos.undo_depth(session.owner_id)?));
    Ok(())
}
