//! The `myxb login` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use base64::Engine as _;
use console::style;

use myxb_client::{load_settings_from, Credentials};

use crate::ui;

const CAPTCHA_FILE: &str = "myxb_captcha.png";
const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Decode a base64 captcha (optionally a PNG data URL) into `dir`.
pub fn save_captcha(data: &str, dir: &Path) -> Result<PathBuf> {
    let encoded = data.trim().trim_start_matches(DATA_URL_PREFIX);
    let image = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .context("captcha is not valid base64")?;

    let path = dir.join(CAPTCHA_FILE);
    std::fs::write(&path, image)
        .with_context(|| format!("failed to write captcha to {}", path.display()))?;
    Ok(path)
}

pub async fn execute(config: Option<PathBuf>) -> Result<()> {
    println!(
        "Your credentials will be saved {} for future use.",
        style("locally").cyan().bold()
    );
    println!();

    let settings = load_settings_from(config.as_deref())?;
    let client = super::connect(&settings)?;

    let username = ui::prompt(style("Username: ").yellow())?;
    anyhow::ensure!(!username.is_empty(), "username must not be empty");
    let password = ui::prompt_secret(style("Password: ").yellow())?;
    println!();
    let credentials = Credentials::new(&username, &password);

    let captcha = match client.captcha().await.context("failed to get captcha")? {
        Some(data) => {
            match save_captcha(&data, &std::env::temp_dir()) {
                Ok(path) => ui::info(format!("Captcha saved to: {}", path.display())),
                Err(e) => {
                    ui::warning(format!("Failed to save captcha image: {e:#}"));
                    ui::info("Captcha data received but could not be saved.");
                }
            }
            ui::prompt(style("Enter captcha code: ").cyan())?
        }
        None => String::new(),
    };

    ui::info("Logging in...");
    client
        .login(&credentials.username, &credentials.password_hash, &captcha)
        .await
        .context("login failed")?;
    ui::success("Login successful!");

    match credentials.save() {
        Ok(path) => {
            ui::success("Credentials saved!");
            ui::detail(format!("Saved to: {}", path.display()));
        }
        Err(e) => ui::warning(format!("Failed to save credentials: {e:#}")),
    }

    println!();
    ui::info("You can now run 'myxb' to calculate your GPA");
    Ok(())
}
