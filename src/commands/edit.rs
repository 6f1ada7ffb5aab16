use super::{Session, TodoFields};
use crate::{
    libs::{messages::Message, todo::TodoPatch},
    msg_error, msg_success, msg_warning,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct EditArgs {
    id: i64,

    #[arg(long)]
    title: Option<String>,

    /// New parent task id
    #[arg(long, conflicts_with = "no_parent")]
    parent: Option<i64>,

    #[command(flatten)]
    fields: TodoFields,

    /// Remove the due date
    #[arg(long, conflicts_with = "due")]
    no_due: bool,

    /// Remove the reminder
    #[arg(long, conflicts_with = "remind")]
    no_remind: bool,

    /// Make the task a root task
    #[arg(long)]
    no_parent: bool,

    /// Remove all tags
    #[arg(long, conflicts_with = "tags")]
    clear_tags: bool,
}

impl EditArgs {
    fn into_patch(self) -> TodoPatch {
        let fields = self.fields;
        TodoPatch {
            title: self.title,
            project: fields.project,
            due_date: if self.no_due { Some(None) } else { fields.due.map(Some) },
            reminder_at: if self.no_remind { Some(None) } else { fields.remind.map(Some) },
            parent_id: if self.no_parent { Some(None) } else { self.parent.map(Some) },
            priority: fields.priority,
            status: fields.status,
            recurrence: fields.recurrence,
            tags: if self.clear_tags {
                Some(Vec::new())
            } else if fields.tags.is_empty() {
                None
            } else {
                Some(fields.tags)
            },
        }
    }
}

pub fn cmd(session: &Session, args: EditArgs) -> Result<()> {
    let id = args.id;
    let patch = args.into_patch();
    if patch.is_empty() {
        msg_warning!(Message::NoPatchFields);
        return Ok(());
    }

    match session.todos.update(session.owner_id, id, &patch)? {
        Some(_) => msg_success!(Message::TodoUpdated(id)),
        None => msg_error!(Message::TodoNotFound(id)),
    }
    Ok(())
}
