//! The `myxb calc` command: offline GPA from a semester snapshot.

use std::path::PathBuf;

use anyhow::{Context, Result};

use myxb_client::load_settings_from;
use myxb_core::engine::process_snapshot;
use myxb_core::model::SemesterSnapshot;

use crate::ui;

pub fn execute(
    input: PathBuf,
    show_tasks: bool,
    grading_path: Option<PathBuf>,
    export: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let settings = load_settings_from(config_path.as_deref())?;
    let grading = super::load_grading(grading_path.as_deref(), &settings)?;

    let content = std::fs::read_to_string(&input)
        .with_context(|| format!("failed to read snapshot: {}", input.display()))?;
    let snapshot: SemesterSnapshot = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse snapshot: {}", input.display()))?;

    match &snapshot.semester {
        Some(semester) => ui::success(format!("Calculating GPA for {semester}")),
        None => ui::success(format!("Calculating GPA from {}", input.display())),
    }
    println!();

    let report = process_snapshot(&grading, snapshot);
    super::print_report(&report, &grading.mappings, show_tasks);

    if let Some(path) = &export {
        super::export_report(&report, &grading.mappings, path)?;
    }

    Ok(())
}
