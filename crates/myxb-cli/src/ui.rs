//! Status lines and interactive prompts.

use std::fmt::Display;
use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use console::{style, Term};

pub fn info(msg: impl Display) {
    println!("{} {msg}", style("ℹ").blue());
}

pub fn success(msg: impl Display) {
    println!("{} {msg}", style("✓").green());
}

pub fn warning(msg: impl Display) {
    println!("{} {msg}", style("⚠").yellow());
}

pub fn detail(msg: impl Display) {
    println!("{}", style(format!(" - {msg}")).dim());
}

/// Print `label` and read one trimmed line from stdin.
pub fn prompt(label: impl Display) -> Result<String> {
    print!("{label}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    Ok(line.trim().to_string())
}

/// Read a line without echoing it.
pub fn prompt_secret(label: impl Display) -> Result<String> {
    let term = Term::stderr();
    term.write_str(&label.to_string())?;
    let line = term
        .read_secure_line()
        .context("failed to read password")?;
    Ok(line.trim().to_string())
}
