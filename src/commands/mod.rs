pub mod add;
pub mod batch;
pub mod clear;
pub mod edit;
pub mod export;
pub mod import;
pub mod init;
pub mod list;
pub mod rm;
pub mod show;
pub mod stats;
pub mod toggle;
pub mod undo;

use crate::db::todos::Todos;
use crate::libs::config::Config;
use crate::libs::normalize::{parse_date, parse_date_time, require_owner};
use crate::libs::todo::{Priority, Recurrence, Status};
use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Create one or more tasks", arg_required_else_help = true)]
    Add(add::AddArgs),
    #[command(about = "List tasks with filters, sorting and paging")]
    List(list::ListArgs),
    #[command(about = "Show one task")]
    Show(show::ShowArgs),
    #[command(about = "Change fields of a task", arg_required_else_help = true)]
    Edit(edit::EditArgs),
    #[command(about = "Complete or reopen a task")]
    Toggle(toggle::ToggleArgs),
    #[command(about = "Delete a task and all of its subtasks")]
    Rm(rm::RmArgs),
    #[command(about = "Delete all completed tasks")]
    Clear,
    #[command(about = "Update several tasks at once", arg_required_else_help = true)]
    Batch(batch::BatchArgs),
    #[command(about = "Revert the last change")]
    Undo,
    #[command(about = "Export tasks to JSON or CSV")]
    Export(export::ExportArgs),
    #[command(about = "Import tasks from a JSON export", arg_required_else_help = true)]
    Import(import::ImportArgs),
    #[command(about = "Show task statistics")]
    Stats,
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    /// Owner to act for (defaults to the configured owner)
    #[arg(long, global = true)]
    owner: Option<i64>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            command => Self::run(&Session::open(cli.owner)?, command),
        }
    }

    fn run(session: &Session, command: Commands) -> Result<()> {
        match command {
            Commands::Init(args) => init::cmd(args),
            Commands::Add(args) => add::cmd(session, args),
            Commands::List(args) => list::cmd(session, args),
            Commands::Show(args) => show::cmd(session, args),
            Commands::Edit(args) => edit::cmd(session, args),
            Commands::Toggle(args) => toggle::cmd(session, args),
            Commands::Rm(args) => rm::cmd(session, args),
            Commands::Clear => clear::cmd(session),
            Commands::Batch(args) => batch::cmd(session, args),
            Commands::Undo => undo::cmd(session),
            Commands::Export(args) => export::cmd(session, args),
            Commands::Import(args) => import::cmd(session, args),
            Commands::Stats => stats::cmd(session),
        }
    }
}

/// Store handle and resolved owner shared by every command.
pub struct Session {
    pub todos: Todos,
    pub owner_id: i64,
    pub config: Config,
}

impl Session {
    pub fn open(owner: Option<i64>) -> Result<Self> {
        let config = Config::read()?;
        let owner_id = require_owner(owner.unwrap_or(config.owner_id))?;
        let todos = Todos::new()?;

        Ok(Session { todos, owner_id, config })
    }
}

/// Task fields shared by `add`, `edit` and `batch`.
#[derive(Debug, Args, Default)]
pub struct TodoFields {
    /// Project name
    #[arg(short, long)]
    pub project: Option<String>,

    /// Due date, YYYY-MM-DD
    #[arg(short, long, value_parser = date_arg)]
    pub due: Option<NaiveDate>,

    /// Reminder, YYYY-MM-DDTHH:mm
    #[arg(short, long, value_parser = date_time_arg)]
    pub remind: Option<NaiveDateTime>,

    #[arg(long, value_enum)]
    pub priority: Option<Priority>,

    #[arg(long, value_enum)]
    pub status: Option<Status>,

    /// Repeat rule; needs a due date
    #[arg(long = "repeat", value_enum)]
    pub recurrence: Option<Recurrence>,

    /// Tag, repeatable
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,
}

pub(crate) fn date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).map_err(|e| e.to_string())
}

pub(crate) fn date_time_arg(value: &str) -> Result<NaiveDateTime, String> {
    parse_date_time(value).map_err(|e| e.to_string())
}
