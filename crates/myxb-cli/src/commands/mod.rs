//! Subcommand implementations and the helpers they share.

pub mod calc;
pub mod gpa;
pub mod init;
pub mod login;
pub mod logout;
pub mod semesters;

use std::path::Path;

use anyhow::{Context, Result};

use myxb_client::config::Settings;
use myxb_client::{Credentials, PortalClient};
use myxb_core::grading::{load_grading_config_or_builtin, GradingConfig};
use myxb_core::mapping::ScoreMappings;
use myxb_core::model::Semester;
use myxb_core::report::GpaReport;
use myxb_core::traits::ScoreSource;
use myxb_report::{render_subject_table, render_summary, write_markdown_report};

use crate::ui;

/// The grading config: `--grading` wins over the settings file, which wins
/// over the built-in default.
pub fn load_grading(explicit: Option<&Path>, settings: &Settings) -> Result<GradingConfig> {
    let path = explicit.or(settings.grading_config.as_deref());
    let grading = load_grading_config_or_builtin(path)?;
    Ok(grading)
}

pub fn connect(settings: &Settings) -> Result<PortalClient> {
    let client = PortalClient::new(&settings.base_url, settings.timeout_secs)?;
    Ok(client)
}

/// All semesters from `source`, most recent first.
pub async fn fetch_semesters(source: &dyn ScoreSource) -> Result<Vec<Semester>> {
    source
        .semesters()
        .await
        .context("failed to get semesters")
}

/// Log in with saved credentials. Credentials the portal rejects are removed.
pub async fn login_with_saved(client: &PortalClient) -> Result<()> {
    let Some(credentials) = Credentials::load()? else {
        anyhow::bail!("not logged in, run 'myxb login' first");
    };
    ui::info(format!(
        "Using saved credentials for: {}",
        console::style(&credentials.username).cyan()
    ));

    if let Err(e) = client.login_saved(&credentials).await {
        if e.is_auth_failure() {
            ui::warning("Saved credentials failed, please login again");
            Credentials::delete()?;
            anyhow::bail!("authentication failed: {e}. Run 'myxb login' to log in again");
        }
        return Err(e).context("login failed");
    }

    ui::success("Authentication successful!");
    println!();
    Ok(())
}

/// Print every subject table followed by the summary.
pub fn print_report(report: &GpaReport, mappings: &ScoreMappings, show_tasks: bool) {
    for subject in &report.subjects {
        println!("{}", render_subject_table(subject, mappings, show_tasks));
        println!();
    }
    print!("{}", render_summary(report));
}

/// Export as markdown for `.md` paths, JSON otherwise.
pub fn export_report(report: &GpaReport, mappings: &ScoreMappings, path: &Path) -> Result<()> {
    let is_markdown = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"));
    if is_markdown {
        write_markdown_report(report, mappings, path)?;
    } else {
        report.save_json(path)?;
    }
    ui::success(format!("Report exported to {}", path.display()));
    Ok(())
}
