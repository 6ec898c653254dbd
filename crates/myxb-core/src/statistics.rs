//! Semester GPA aggregation across subjects.

use crate::mapping::ScoreMappings;
use crate::model::{CalculatedGpa, GpaTotals, Subject};

/// Whether a subject takes part in the semester GPA.
pub fn counts_toward_gpa(subject: &Subject) -> bool {
    subject.is_in_grade && subject.gpa.is_some() && subject.unweighted_gpa.is_some()
}

/// Credit-weighted semester GPA.
///
/// Subjects that are not in grade, or whose GPA is undefined, are dropped.
/// The unweighted maximum is the regular scale's top GPA rather than a
/// weighted average. With no qualifying subject, `totals` is `None`.
pub fn calculate_gpa(subjects: &[Subject], mappings: &ScoreMappings) -> CalculatedGpa {
    let mut total_weight = 0.0;
    let mut total_weighted_gpa = 0.0;
    let mut total_unweighted_gpa = 0.0;
    let mut total_max_gpa = 0.0;
    let mut counted = Vec::new();

    for subject in subjects {
        let (Some(gpa), Some(unweighted_gpa)) = (subject.gpa, subject.unweighted_gpa) else {
            tracing::debug!(subject = %subject.name, "excluded: GPA undefined");
            continue;
        };
        if !subject.is_in_grade {
            tracing::debug!(subject = %subject.name, "excluded: not in grade");
            continue;
        }

        total_weight += subject.weight;
        total_weighted_gpa += gpa * subject.weight;
        total_unweighted_gpa += unweighted_gpa * subject.weight;
        total_max_gpa += subject.max_gpa * subject.weight;
        counted.push(subject.clone());
    }

    let totals = (total_weight > 0.0).then(|| GpaTotals {
        weighted_gpa: total_weighted_gpa / total_weight,
        max_gpa: total_max_gpa / total_weight,
        unweighted_gpa: total_unweighted_gpa / total_weight,
        unweighted_max_gpa: mappings.max_gpa(false),
    });

    CalculatedGpa {
        totals,
        subjects: counted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::GradingConfig;

    fn subject(name: &str, in_grade: bool, gpa: Option<f64>, weight: f64) -> Subject {
        Subject {
            id: 0,
            name: name.into(),
            class_id: 0,
            score: 90.0,
            official_score: None,
            extra_credit: 0.0,
            gpa,
            unweighted_gpa: gpa,
            max_gpa: 4.3,
            unweighted_max_gpa: 4.3,
            weight,
            is_weighted: false,
            is_elective: weight < 1.0,
            is_in_grade: in_grade,
            evaluation_details: vec![],
        }
    }

    fn mappings() -> ScoreMappings {
        GradingConfig::builtin().unwrap().mappings
    }

    #[test]
    fn filters_out_of_grade_and_undefined() {
        let subjects = vec![
            subject("Counted", true, Some(3.7), 1.0),
            subject("Audited", false, Some(4.0), 1.0),
            subject("Broken", true, None, 0.5),
        ];
        let result = calculate_gpa(&subjects, &mappings());
        let totals = result.totals.unwrap();
        assert!((totals.weighted_gpa - 3.7).abs() < 1e-9);
        assert_eq!(result.subjects.len(), 1);
        assert_eq!(result.subjects[0].name, "Counted");
    }

    #[test]
    fn electives_count_half() {
        let subjects = vec![
            subject("Math", true, Some(4.0), 1.0),
            subject("Ele Art", true, Some(1.0), 0.5),
        ];
        let totals = calculate_gpa(&subjects, &mappings()).totals.unwrap();
        assert!((totals.weighted_gpa - 3.0).abs() < 1e-9);
        assert!((totals.unweighted_gpa - 3.0).abs() < 1e-9);
    }

    #[test]
    fn max_gpa_is_weight_averaged_but_unweighted_max_is_constant() {
        let mut ap = subject("AP Calculus", true, Some(4.5), 1.0);
        ap.is_weighted = true;
        ap.max_gpa = 4.8;
        ap.unweighted_gpa = Some(4.0);
        let subjects = vec![ap, subject("English", true, Some(3.3), 1.0)];

        let totals = calculate_gpa(&subjects, &mappings()).totals.unwrap();
        assert!((totals.max_gpa - 4.55).abs() < 1e-9);
        assert_eq!(totals.unweighted_max_gpa, 4.3);
        assert!((totals.unweighted_gpa - 3.65).abs() < 1e-9);
    }

    #[test]
    fn no_qualifying_subjects_yields_undefined_totals() {
        let subjects = vec![subject("Audited", false, Some(4.0), 1.0)];
        let result = calculate_gpa(&subjects, &mappings());
        assert!(result.totals.is_none());
        assert!(result.weighted_gpa().is_none());
        assert!(result.unweighted_max_gpa().is_none());
        assert!(result.subjects.is_empty());

        assert!(calculate_gpa(&[], &mappings()).totals.is_none());
    }

    #[test]
    fn order_does_not_change_totals() {
        let a = subject("A", true, Some(4.0), 1.0);
        let b = subject("B", true, Some(2.7), 0.5);
        let c = subject("C", true, Some(3.3), 1.0);
        let forward = calculate_gpa(&[a.clone(), b.clone(), c.clone()], &mappings());
        let reverse = calculate_gpa(&[c, b, a], &mappings());
        let (f, r) = (forward.totals.unwrap(), reverse.totals.unwrap());
        assert!((f.weighted_gpa - r.weighted_gpa).abs() < 1e-12);
        assert!((f.max_gpa - r.max_gpa).abs() < 1e-12);
    }

    #[test]
    fn counts_toward_gpa_requires_grade_and_gpa() {
        assert!(counts_toward_gpa(&subject("A", true, Some(3.0), 1.0)));
        assert!(!counts_toward_gpa(&subject("A", false, Some(3.0), 1.0)));
        assert!(!counts_toward_gpa(&subject("A", true, None, 1.0)));
    }
}
