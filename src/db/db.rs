use super::migrations::init_with_migrations;
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::msg_debug;
use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Opens the configured database and brings its schema up to date.
    pub fn new() -> Result<Db> {
        let path = Config::read()?.db_path()?;
        Self::open(path)
    }

    /// Opens (or creates) a database file at `path` with migrations applied.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Db> {
        let mut conn = Connection::open(path.as_ref())?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        init_with_migrations(&mut conn)?;
        msg_debug!(Message::DatabaseOpened(path.as_ref().display().to_string()));

        Ok(Db { conn })
    }

    pub fn open_in_memory() -> Result<Db> {
        let mut conn = Connection::open_in_memory()?;
        init_with_migrations(&mut conn)?;

        Ok(Db { conn })
    }
}
