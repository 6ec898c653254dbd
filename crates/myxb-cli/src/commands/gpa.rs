//! The `myxb gpa` command (also the default).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use myxb_client::load_settings_from;
use myxb_core::engine::{EngineConfig, ProgressReporter, SemesterEngine};
use myxb_core::model::{Subject, SubjectSummary};

use super::semesters::{print_semester_list, select_semester};
use crate::ui;

#[derive(Args, Debug, Default)]
pub struct GpaArgs {
    /// Semester index from the semester list (skips the prompt)
    #[arg(long)]
    pub semester: Option<usize>,

    /// Show individual learning tasks for each subject
    #[arg(short, long)]
    pub tasks: bool,

    /// Export the report (.md for markdown, otherwise JSON)
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Settings file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Grading configuration file (TOML, or JSON by extension)
    #[arg(long)]
    pub grading: Option<PathBuf>,
}

/// Per-subject progress on stderr.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_subject_start(&self, subject: &SubjectSummary) {
        tracing::debug!(subject = %subject.name, "fetching subject");
    }

    fn on_subject_complete(&self, subject: &Subject) {
        eprintln!("  Fetched: {} ({:.1})", subject.name, subject.score);
    }

    fn on_subject_skipped(&self, subject: &SubjectSummary, reason: &str) {
        eprintln!("  Skipped: {}: {reason}", subject.name);
    }

    fn on_run_complete(&self, total: usize, processed: usize, skipped: usize, elapsed: Duration) {
        eprintln!(
            "\nProcessed {processed}/{total} subjects, {skipped} skipped ({:.1}s)\n",
            elapsed.as_secs_f64()
        );
    }
}

pub async fn execute(args: GpaArgs) -> Result<()> {
    let settings = load_settings_from(args.config.as_deref())?;
    let grading = Arc::new(super::load_grading(args.grading.as_deref(), &settings)?);
    let client = Arc::new(super::connect(&settings)?);

    super::login_with_saved(&client).await?;

    ui::info("Fetching semesters...");
    let semesters = super::fetch_semesters(client.as_ref()).await?;
    anyhow::ensure!(!semesters.is_empty(), "no semesters found");
    println!();

    let index = match args.semester {
        Some(index) => {
            anyhow::ensure!(
                index < semesters.len(),
                "invalid semester selection: {index} (0-{} available)",
                semesters.len() - 1
            );
            index
        }
        None => {
            let current = print_semester_list(&semesters);
            println!();
            let label = match current {
                Some(i) => format!(
                    "Select a semester to calculate GPA for (default {}): ",
                    console::style(format!("[{i}]")).dim()
                ),
                None => "Select a semester to calculate GPA for: ".to_string(),
            };
            let input = ui::prompt(label)?;
            select_semester(&input, &semesters, current)?
        }
    };
    let semester = &semesters[index];

    println!();
    ui::success(format!("Calculating GPA for {semester}"));
    println!();

    let engine = SemesterEngine::new(
        client.clone(),
        grading.clone(),
        EngineConfig {
            parallelism: settings.parallelism,
        },
    );
    let report = engine.run(semester, &ConsoleReporter).await?;

    super::print_report(&report, &grading.mappings, args.tasks);

    if let Some(path) = &args.export {
        super::export_report(&report, &grading.mappings, path)?;
    }

    Ok(())
}
