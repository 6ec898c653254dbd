//! Semester GPA summary and official-GPA comparison.

use console::style;

use myxb_core::model::GpaTotals;
use myxb_core::report::{GpaReport, DISCREPANCY_TOLERANCE};

const RULE: &str = "----------------------------------------------";

fn percent_of(value: f64, max: f64) -> String {
    if max > 0.0 {
        format!("({:.1}%)", value / max * 100.0)
    } else {
        String::new()
    }
}

fn gpa_lines(out: &mut String, totals: &GpaTotals) {
    out.push_str(&format!(
        "{} {:.2} / {:.2} {}\n",
        style("Weighted GPA:").bold(),
        totals.weighted_gpa,
        totals.max_gpa,
        style(percent_of(totals.weighted_gpa, totals.max_gpa)).dim()
    ));
    out.push_str(&format!(
        "{} {:.2} / {:.2} {}\n",
        style("Unweighted GPA:").bold(),
        totals.unweighted_gpa,
        totals.unweighted_max_gpa,
        style(percent_of(totals.unweighted_gpa, totals.unweighted_max_gpa)).dim()
    ));
}

fn official_lines(out: &mut String, report: &GpaReport) {
    let Some(official) = report.official_gpa else {
        if !report.official_gpa_unavailable {
            out.push_str(&format!("{}\n", style("Official GPA not yet published").dim()));
        }
        return;
    };

    let Some(diff) = report.discrepancy(DISCREPANCY_TOLERANCE) else {
        out.push_str(&format!("{} {official:.2}\n", style("Official GPA:").bold()));
        return;
    };

    let label = format!("({diff:+.2})");
    let label = if diff < 0.0 {
        style(label).green()
    } else {
        style(label).red()
    };
    out.push_str(&format!(
        "{} {official:.2} {label}\n\n",
        style("Official GPA:").bold()
    ));
    out.push_str(&format!(
        "{}{diff:.2}{}\n",
        style("Hi! We found a discrepancy of ").bold(),
        style(" points in the GPA calculation.").bold()
    ));
    out.push_str(&format!(
        "This may be caused by special courses that are {} from official GPA calculation.\n",
        style("weighted differently or excluded").yellow()
    ));
    out.push_str("Please report this to the developers so we can improve the accuracy.\n");
    out.push_str("Thank you!\n");
}

/// The closing block printed after the subject tables.
pub fn render_summary(report: &GpaReport) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(RULE);
    out.push('\n');

    let Some(totals) = report.calculated.totals else {
        out.push_str(&format!(
            "{} Unable to calculate GPA - no valid subjects found\n",
            style("⚠").yellow()
        ));
        return out;
    };

    gpa_lines(&mut out, &totals);
    out.push('\n');
    official_lines(&mut out, report);
    out.push('\n');
    out.push_str(&format!(
        "{} Calculated GPA from {} subjects\n",
        style("✓").green(),
        report.calculated.subjects.len()
    ));

    if !report.skipped.is_empty() {
        let names: Vec<&str> = report.skipped.iter().map(|s| s.name.as_str()).collect();
        out.push_str(&format!(
            "{} Skipped {} subjects: {}\n",
            style("ℹ").blue(),
            report.skipped.len(),
            names.join(", ")
        ));
    }

    out
}
