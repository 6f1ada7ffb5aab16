//! Interactive configuration setup.
//!
//! Besides writing `config.json`, init hands any tasks stored before
//! ownership existed to the configured owner.

use crate::{
    db::todos::Todos,
    libs::{config::Config, messages::Message},
    msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Keep the current settings and only claim unowned tasks
    #[arg(long)]
    claim_only: bool,
}

pub fn cmd(init_args: InitArgs) -> Result<()> {
    let config = if init_args.claim_only {
        Config::read()?
    } else {
        let config = Config::init()?;
        config.save()?;
        msg_success!(Message::ConfigSaved);
        config
    };

    let claimed = Todos::new()?.claim_unowned(config.owner_id)?;
    if claimed > 0 {
        msg_info!(Message::UnownedTodosClaimed(config.owner_id, claimed));
    }
    Ok(())
}
