//! The `myxb semesters` command and semester selection.

use std::path::PathBuf;

use anyhow::{Context, Result};
use console::style;

use myxb_client::load_settings_from;
use myxb_core::model::Semester;

use crate::ui;

/// How many of the most recent semesters are listed.
pub const MAX_DISPLAY_SEMESTERS: usize = 10;

/// Print the most recent semesters, oldest first so the latest ends up
/// nearest the prompt. Returns the index of the current semester if listed.
pub fn print_semester_list(semesters: &[Semester]) -> Option<usize> {
    let shown = semesters.len().min(MAX_DISPLAY_SEMESTERS);
    for (i, semester) in semesters[..shown].iter().enumerate().rev() {
        let suffix = if semester.is_now {
            style(" (current)").cyan().to_string()
        } else {
            String::new()
        };
        println!("{} {semester}{suffix}", style(format!("[{i}]")).dim());
    }
    current_index(semesters)
}

/// Index of the current semester among the listed ones.
pub fn current_index(semesters: &[Semester]) -> Option<usize> {
    semesters
        .iter()
        .take(MAX_DISPLAY_SEMESTERS)
        .position(|s| s.is_now)
}

/// Resolve the user's answer to the selection prompt. Empty input picks the
/// current semester.
pub fn select_semester(
    input: &str,
    semesters: &[Semester],
    current: Option<usize>,
) -> Result<usize> {
    let input = input.trim();
    if input.is_empty() {
        return current.context("no current semester, please enter a semester index");
    }
    match input.parse::<usize>() {
        Ok(index) if index < semesters.len() => Ok(index),
        _ => anyhow::bail!("invalid semester selection: {input}"),
    }
}

pub async fn execute(config: Option<PathBuf>) -> Result<()> {
    let settings = load_settings_from(config.as_deref())?;
    let client = super::connect(&settings)?;
    super::login_with_saved(&client).await?;

    let semesters = super::fetch_semesters(&client).await?;
    if semesters.is_empty() {
        ui::warning("No semesters found");
        return Ok(());
    }
    print_semester_list(&semesters);
    if semesters.len() > MAX_DISPLAY_SEMESTERS {
        ui::detail(format!(
            "{} older semesters not shown",
            semesters.len() - MAX_DISPLAY_SEMESTERS
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn semesters(n: usize, current: Option<usize>) -> Vec<Semester> {
        (0..n)
            .map(|i| Semester {
                id: 100 - i as u64,
                year: 2024 - (i as u64 / 2),
                semester: 2 - (i as u64 % 2),
                is_now: current == Some(i),
                start_date: String::new(),
                end_date: String::new(),
            })
            .collect()
    }

    #[test]
    fn empty_input_selects_current() {
        let list = semesters(4, Some(1));
        assert_eq!(select_semester("", &list, current_index(&list)).unwrap(), 1);
        assert_eq!(select_semester("  3 ", &list, Some(1)).unwrap(), 3);
    }

    #[test]
    fn empty_input_without_current_fails() {
        let list = semesters(4, None);
        assert!(select_semester("", &list, current_index(&list)).is_err());
    }

    #[test]
    fn out_of_range_or_garbage_fails() {
        let list = semesters(4, Some(0));
        assert!(select_semester("4", &list, Some(0)).is_err());
        assert!(select_semester("-1", &list, Some(0)).is_err());
        assert!(select_semester("first", &list, Some(0)).is_err());
    }

    #[test]
    fn current_beyond_display_limit_is_ignored() {
        let list = semesters(12, Some(11));
        assert_eq!(current_index(&list), None);
        // still selectable by index
        assert_eq!(select_semester("11", &list, None).unwrap(), 11);
    }
}
