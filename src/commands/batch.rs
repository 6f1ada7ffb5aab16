use super::{Session, TodoFields};
use crate::{
    db::batch::BatchUpdate,
    libs::messages::Message,
    msg_print, msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// Task ids to update
    #[arg(required = true)]
    ids: Vec<i64>,

    /// Mark the tasks complete
    #[arg(long, conflicts_with = "reopen")]
    complete: bool,

    /// Mark the tasks active again
    #[arg(long)]
    reopen: bool,

    #[command(flatten)]
    fields: TodoFields,

    #[arg(long, conflicts_with = "due")]
    no_due: bool,

    #[arg(long, conflicts_with = "remind")]
    no_remind: bool,

    #[arg(long, conflicts_with = "tags")]
    clear_tags: bool,
}

impl BatchArgs {
    fn to_update(&self) -> BatchUpdate {
        let fields = &self.fields;
        BatchUpdate {
            completed: match (self.complete, self.reopen) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            },
            project: fields.project.clone(),
            due_date: if self.no_due { Some(None) } else { fields.due.map(Some) },
            reminder_at: if self.no_remind { Some(None) } else { fields.remind.map(Some) },
            priority: fields.priority,
            status: fields.status,
            recurrence: fields.recurrence,
            tags: if self.clear_tags {
                Some(Vec::new())
            } else if fields.tags.is_empty() {
                None
            } else {
                Some(fields.tags.clone())
            },
        }
    }
}

pub fn cmd(session: &Session, args: BatchArgs) -> Result<()> {
    let outcome = session.todos.batch_update(session.owner_id, &args.ids, &args.to_update())?;

    msg_success!(Message::BatchApplied(outcome.count, outcome.skipped.len()));
    if !outcome.ids.is_empty() {
        let ids: Vec<String> = outcome.ids.iter().map(|id| format!("#{}", id)).collect();
        msg_print!(Message::BatchChangedIds(ids.join(", ")));
    }
    Ok(())
}
