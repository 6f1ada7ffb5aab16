use super::{Session, TodoFields};
use crate::{
    libs::{messages::Message, todo::TodoDraft, view::View},
    msg_success, msg_warning,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// One title per task; several titles share the same fields
    #[arg(required = true)]
    titles: Vec<String>,

    /// Parent task id
    #[arg(long)]
    parent: Option<i64>,

    #[command(flatten)]
    fields: TodoFields,
}

pub fn cmd(session: &Session, args: AddArgs) -> Result<()> {
    let fields = args.fields;
    let draft = TodoDraft {
        title: String::new(),
        project: fields.project,
        due_date: fields.due,
        reminder_at: fields.remind,
        parent_id: args.parent,
        priority: fields.priority.unwrap_or_default(),
        status: fields.status.unwrap_or_default(),
        recurrence: fields.recurrence.unwrap_or_default(),
        tags: fields.tags,
    };

    if let [title] = args.titles.as_slice() {
        let todo = session.todos.create(session.owner_id, &TodoDraft { title: title.clone(), ..draft })?;
        msg_success!(Message::TodoCreated(todo.id, todo.title));
        return Ok(());
    }

    let created = session.todos.create_bulk(session.owner_id, &args.titles, &draft)?;
    if created.is_empty() {
        msg_warning!(Message::NoTitlesProvided);
        return Ok(());
    }

    msg_success!(Message::TodosCreated(created.len()));
    View::todos(&created)?;
    Ok(())
}
