//! The `myxb logout` command.

use anyhow::{Context, Result};

use myxb_client::config::config_dir;
use myxb_client::Credentials;

use crate::ui;

pub fn execute() -> Result<()> {
    let dir = config_dir().context("could not determine the settings directory")?;

    if !Credentials::delete_from(&dir)? {
        ui::warning("No saved credentials found");
        return Ok(());
    }

    ui::success("Credentials cleared!");
    ui::detail(format!("Removed from: {}", dir.display()));
    println!();
    ui::info("Run 'myxb login' to login again");
    Ok(())
}
