//! Markdown export of a GPA report.

use std::path::Path;

use anyhow::{Context, Result};

use myxb_core::mapping::ScoreMappings;
use myxb_core::model::EvaluationProject;
use myxb_core::report::{GpaReport, DISCREPANCY_TOLERANCE};

fn md_escape(s: &str) -> String {
    s.replace('|', "\\|")
}

fn opt2(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_else(|| "N/A".into())
}

/// Render a report as a markdown document.
pub fn generate_markdown(report: &GpaReport, mappings: &ScoreMappings) -> String {
    let mut md = String::new();

    md.push_str("# GPA Report\n\n");
    if let Some(semester) = &report.semester {
        md.push_str(&format!("**Semester:** {semester}  \n"));
    }
    md.push_str(&format!(
        "**Generated:** {}\n\n",
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    md.push_str("## Summary\n\n");
    match report.calculated.totals {
        Some(t) => {
            md.push_str("| Metric | Value | Maximum |\n");
            md.push_str("|---|---|---|\n");
            md.push_str(&format!(
                "| Weighted GPA | {:.2} | {:.2} |\n",
                t.weighted_gpa, t.max_gpa
            ));
            md.push_str(&format!(
                "| Unweighted GPA | {:.2} | {:.2} |\n",
                t.unweighted_gpa, t.unweighted_max_gpa
            ));
            md.push_str(&format!(
                "| Official GPA | {} | |\n\n",
                opt2(report.official_gpa)
            ));
            if let Some(diff) = report.discrepancy(DISCREPANCY_TOLERANCE) {
                md.push_str(&format!(
                    "> Calculated GPA differs from the official GPA by {diff:+.2}.\n\n"
                ));
            }
            md.push_str(&format!(
                "Calculated from {} subjects.\n",
                report.calculated.subjects.len()
            ));
        }
        None => md.push_str("Unable to calculate GPA - no valid subjects found.\n"),
    }
    md.push('\n');

    if !report.subjects.is_empty() {
        md.push_str("## Subjects\n\n");
        md.push_str("| Subject | Score | Level | GPA | Type | Counted |\n");
        md.push_str("|---|---|---|---|---|---|\n");
        for s in &report.subjects {
            let level = mappings.score_level(s.score, s.is_weighted).unwrap_or_default();
            let counted = if myxb_core::statistics::counts_toward_gpa(s) {
                "yes"
            } else {
                "no"
            };
            md.push_str(&format!(
                "| {} | {:.1} | {} | {} | {} | {} |\n",
                md_escape(&s.name),
                s.score,
                level,
                opt2(s.gpa),
                s.kind_label(),
                counted
            ));
        }
        md.push('\n');

        for s in &report.subjects {
            md.push_str(&format!("### {}\n\n", s.name));
            if s.extra_credit > 0.0 {
                md.push_str(&format!("Extra credit: {:.2}\n\n", s.extra_credit));
            }
            md.push_str("| Project | Score | Level | GPA | Proportion |\n");
            md.push_str("|---|---|---|---|---|\n");
            for p in s.evaluation_details.iter().filter(|p| !p.score_is_null) {
                project_rows(&mut md, p, "");
            }
            md.push('\n');
        }
    }

    if !report.skipped.is_empty() {
        md.push_str("## Skipped\n\n");
        for s in &report.skipped {
            md.push_str(&format!("- {}: {}\n", s.name, s.reason));
        }
        md.push('\n');
    }

    md
}

fn project_rows(md: &mut String, project: &EvaluationProject, indent: &str) {
    md.push_str(&format!(
        "| {indent}{} | {:.1} | {} | {} | {:.2}% |\n",
        md_escape(&project.name),
        project.score,
        project.level,
        project.gpa.map(|g| format!("{g:.2}")).unwrap_or_default(),
        project.proportion
    ));
    let nested = format!("{indent}- ");
    for child in project.children.iter().filter(|c| !c.score_is_null) {
        project_rows(md, child, &nested);
    }
}

/// Write a markdown report to a file.
pub fn write_markdown_report(
    report: &GpaReport,
    mappings: &ScoreMappings,
    path: &Path,
) -> Result<()> {
    let md = generate_markdown(report, mappings);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, md)
        .with_context(|| format!("failed to write markdown report to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use myxb_core::grading::GradingConfig;
    use myxb_core::model::{CalculatedGpa, GpaTotals, Semester, Subject};
    use myxb_core::report::SkippedSubject;
    use uuid::Uuid;

    fn make_report() -> GpaReport {
        let mut lab = EvaluationProject::leaf("Lab | Practical", 100.0, 91.0);
        lab.level = "A-".into();
        let mut group = EvaluationProject::group("Coursework", 100.0, vec![lab]);
        group.score = 91.0;
        group.gpa = Some(3.7);

        let subject = Subject {
            id: 1,
            name: "AP Chemistry".into(),
            class_id: 2,
            score: 91.0,
            official_score: None,
            extra_credit: 0.0,
            gpa: Some(4.2),
            unweighted_gpa: Some(3.7),
            max_gpa: 4.8,
            unweighted_max_gpa: 4.3,
            weight: 1.0,
            is_weighted: true,
            is_elective: false,
            is_in_grade: true,
            evaluation_details: vec![group],
        };

        GpaReport {
            id: Uuid::nil(),
            created_at: Utc::now(),
            semester: Some(Semester {
                id: 8,
                year: 2024,
                semester: 2,
                is_now: false,
                start_date: String::new(),
                end_date: String::new(),
            }),
            subjects: vec![subject.clone()],
            calculated: CalculatedGpa {
                totals: Some(GpaTotals {
                    weighted_gpa: 4.2,
                    max_gpa: 4.8,
                    unweighted_gpa: 3.7,
                    unweighted_max_gpa: 4.3,
                }),
                subjects: vec![subject],
            },
            official_gpa: Some(4.0),
            official_gpa_unavailable: false,
            skipped: vec![SkippedSubject {
                subject_id: 3,
                name: "Homeroom".into(),
                reason: "no learning tasks".into(),
            }],
            duration_ms: 5,
        }
    }

    fn mappings() -> ScoreMappings {
        GradingConfig::builtin().unwrap().mappings
    }

    #[test]
    fn markdown_sections() {
        let md = generate_markdown(&make_report(), &mappings());
        assert!(md.starts_with("# GPA Report"));
        assert!(md.contains("**Semester:** 2024-2025 Semester 2"));
        assert!(md.contains("| Weighted GPA | 4.20 | 4.80 |"));
        assert!(md.contains("| Official GPA | 4.00 | |"));
        assert!(md.contains("differs from the official GPA by +0.20"));
        assert!(md.contains("| AP Chemistry | 91.0 | A- | 4.20 | Weighted | yes |"));
        assert!(md.contains("### AP Chemistry"));
        assert!(md.contains("| - Lab \\| Practical | 91.0 | A- |"));
        assert!(md.contains("- Homeroom: no learning tasks"));
    }

    #[test]
    fn markdown_without_totals() {
        let mut report = make_report();
        report.calculated.totals = None;
        let md = generate_markdown(&report, &mappings());
        assert!(md.contains("Unable to calculate GPA"));
        assert!(!md.contains("| Weighted GPA"));
    }

    #[test]
    fn write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("gpa.md");
        write_markdown_report(&make_report(), &mappings(), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("## Subjects"));
    }
}
