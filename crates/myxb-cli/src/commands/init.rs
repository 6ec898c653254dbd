//! The `myxb init` command.

use std::path::Path;

use anyhow::{Context, Result};

use myxb_core::grading::DEFAULT_GRADING_TOML;

const GRADING_FILE: &str = "grading.toml";

pub fn execute(force: bool) -> Result<()> {
    let path = Path::new(GRADING_FILE);
    if path.exists() && !force {
        println!("{GRADING_FILE} already exists, skipping (use --force to overwrite).");
    } else {
        std::fs::write(path, DEFAULT_GRADING_TOML)
            .with_context(|| format!("failed to write {GRADING_FILE}"))?;
        println!("Created {GRADING_FILE}");
    }

    println!("\nNext steps:");
    println!("  1. Edit {GRADING_FILE} to match your school's score bands");
    println!("  2. Run: myxb --grading {GRADING_FILE}");
    println!("  3. Or set grading_config in the myxb config.toml to use it by default");

    Ok(())
}
