//! Per-subject detail table.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Table};

use myxb_core::mapping::ScoreMappings;
use myxb_core::model::{EvaluationProject, Subject};

use crate::style::Tone;

fn level_cell(text: impl Into<String>, level: &str) -> Cell {
    Cell::new(text.into()).fg(Tone::of(level).table_color())
}

fn bold(text: impl Into<String>) -> Cell {
    Cell::new(text.into()).add_attribute(Attribute::Bold)
}

/// Header row text for a subject's score, with any extra credit.
pub fn score_label(subject: &Subject) -> String {
    let mut label = format!("{:.1}", subject.score);
    if subject.extra_credit > 0.0 {
        label.push_str(&format!(" ({:.2} Extra credit)", subject.extra_credit));
    }
    label
}

/// Build the detail table for one subject.
///
/// The header row summarizes the subject; below it each graded evaluation
/// project gets a row, nested projects indented with `"- "`. With
/// `show_tasks`, graded learning tasks follow their project.
pub fn render_subject_table(
    subject: &Subject,
    mappings: &ScoreMappings,
    show_tasks: bool,
) -> Table {
    let level = mappings
        .score_level(subject.score, subject.is_weighted)
        .unwrap_or_default();
    let gpa = subject
        .gpa
        .map(|g| format!("{g:.2}"))
        .unwrap_or_else(|| "N/A".to_string());

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            level_cell(subject.name.as_str(), level).add_attribute(Attribute::Bold),
            bold(score_label(subject)),
            bold(level),
            bold(gpa),
            bold(subject.kind_label()),
        ]);

    for project in subject.evaluation_details.iter().filter(|p| !p.score_is_null) {
        add_project_rows(&mut table, project, "", show_tasks, subject.is_weighted, mappings);
    }

    table
}

fn add_project_rows(
    table: &mut Table,
    project: &EvaluationProject,
    indent: &str,
    show_tasks: bool,
    is_weighted: bool,
    mappings: &ScoreMappings,
) {
    table.add_row(vec![
        level_cell(format!("{indent}{}", project.name), &project.level),
        Cell::new(format!("{:.1}", project.score)),
        Cell::new(&project.level),
        Cell::new(project.gpa.map(|g| format!("{g:.2}")).unwrap_or_default()),
        Cell::new(format!("{:.2}%", project.proportion)),
    ]);

    if show_tasks {
        let graded: Vec<_> = project.tasks.iter().filter(|t| t.score.is_some()).collect();
        if !graded.is_empty() {
            let weight = project.proportion / graded.len() as f64;
            for task in graded {
                let percent = task.percent();
                let level = percent
                    .and_then(|p| mappings.score_level(p, is_weighted))
                    .unwrap_or_default();
                table.add_row(vec![
                    level_cell(format!("{indent}- {}", task.name), level),
                    Cell::new(format!(
                        "{:.0} / {:.0}",
                        task.score.unwrap_or_default(),
                        task.total_score
                    )),
                    Cell::new(percent.map(|p| format!("{p:.2}%")).unwrap_or_default()),
                    Cell::new(""),
                    Cell::new(format!("{indent}- {weight:.2}%")),
                ]);
            }
        }
    }

    let nested = format!("{indent}- ");
    for child in project.children.iter().filter(|c| !c.score_is_null) {
        add_project_rows(table, child, &nested, show_tasks, is_weighted, mappings);
    }
}
