//! Per-subject score computation.
//!
//! A subject's evaluation tree is first normalized so that only graded
//! projects share the available weight, then folded into a single score,
//! optionally overridden by the school's official score, and finally mapped
//! to GPA figures.

use crate::grading::GradingConfig;
use crate::mapping::round_to_tenth;
use crate::model::{EvaluationProject, SemesterScore, Subject, SubjectDetail};

/// Credit weight of electives and half-weight subjects.
pub const ELECTIVE_WEIGHT: f64 = 0.5;

/// Rescale sibling proportions so graded projects fill `allotted` percent.
///
/// At each level only projects with a score take part: their proportions are
/// rewritten to `proportion / graded_sum * allotted`, and each project's
/// children are then normalized against the project's new proportion.
/// Ungraded projects keep their raw proportion. A level whose graded
/// proportions sum to zero is left untouched, subtree included.
pub fn normalize(projects: &mut [EvaluationProject], allotted: f64) {
    let graded_sum: f64 = projects
        .iter()
        .filter(|p| !p.score_is_null)
        .map(|p| p.proportion)
        .sum();

    if graded_sum == 0.0 {
        return;
    }

    for project in projects.iter_mut() {
        if !project.score_is_null {
            project.proportion = project.proportion / graded_sum * allotted;
        }
        if !project.children.is_empty() {
            let share = project.proportion;
            normalize(&mut project.children, share);
        }
    }
}

/// Normalize a subject's root level against 100%.
pub fn normalize_tree(projects: &mut [EvaluationProject]) {
    normalize(projects, 100.0);
}

/// Proportion-weighted sum of graded leaf scores.
///
/// Groups contribute through their children, whose proportions already carry
/// the group's share after [`normalize`]. The result is not rounded.
pub fn aggregate_score(projects: &[EvaluationProject]) -> f64 {
    projects
        .iter()
        .filter(|p| !p.score_is_null)
        .map(|p| {
            if p.is_leaf() {
                p.score * p.proportion / 100.0
            } else {
                aggregate_score(&p.children)
            }
        })
        .sum()
}

/// Turn one subject's raw data into a scored [`Subject`].
///
/// `official` is the semester-wide record for this subject, when the school
/// publishes one: it decides `is_in_grade`, and a positive official total
/// replaces the computed score.
pub fn process_subject(
    grading: &GradingConfig,
    detail: &SubjectDetail,
    mut projects: Vec<EvaluationProject>,
    official: Option<&SemesterScore>,
    is_elective: bool,
) -> Subject {
    let name = detail.subject_name.as_str();
    let half_weight = is_elective || grading.is_half_weight(name);
    let weight = if half_weight { ELECTIVE_WEIGHT } else { 1.0 };
    let is_weighted = grading.is_weighted(name);

    normalize_tree(&mut projects);
    let computed = aggregate_score(&projects);

    let mut score = computed;
    let mut official_score = None;
    let mut extra_credit = 0.0;
    let mut is_in_grade = true;

    if let Some(info) = official {
        is_in_grade = info.is_in_grade;
        if let Some(raw) = info.official_score {
            if info.official_total_score > 0.0 {
                let percent = raw / info.official_total_score * 100.0;
                extra_credit = percent - round_to_tenth(computed);
                official_score = Some(percent);
                score = percent;
            }
        }
    }

    let score = round_to_tenth(score);
    let mappings = &grading.mappings;

    tracing::debug!(
        subject = name,
        computed,
        score,
        is_weighted,
        weight,
        "processed subject"
    );

    Subject {
        id: detail.subject_id,
        name: detail.subject_name.clone(),
        class_id: detail.class_id,
        score,
        official_score,
        extra_credit,
        gpa: mappings.score_to_gpa(score, is_weighted),
        unweighted_gpa: mappings.score_to_gpa(score, false),
        max_gpa: mappings.max_gpa(is_weighted),
        unweighted_max_gpa: mappings.max_gpa(false),
        weight,
        is_weighted,
        is_elective: half_weight,
        is_in_grade,
        evaluation_details: projects,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EvaluationProject as P;

    const EPS: f64 = 1e-9;

    fn grading() -> GradingConfig {
        GradingConfig::builtin().unwrap()
    }

    fn detail(name: &str) -> SubjectDetail {
        SubjectDetail {
            subject_name: name.into(),
            class_id: 11,
            subject_id: 22,
            semester_id: 33,
        }
    }

    fn official(score: Option<f64>, total: f64, in_grade: bool) -> SemesterScore {
        SemesterScore {
            class_id: 11,
            class_name: "G11-A".into(),
            subject_id: 22,
            subject_name: String::new(),
            is_in_grade: in_grade,
            official_score: score,
            score_mapping_id: 0,
            official_total_score: total,
        }
    }

    /// Sum of graded proportions at every level must equal the allotment.
    fn assert_levels_sum(projects: &[EvaluationProject], allotted: f64) {
        let graded: Vec<_> = projects.iter().filter(|p| !p.score_is_null).collect();
        let raw_sum: f64 = graded.iter().map(|p| p.proportion).sum();
        if graded.is_empty() {
            return;
        }
        assert!(
            (raw_sum - allotted).abs() < EPS,
            "level sums to {raw_sum}, expected {allotted}"
        );
        for p in graded {
            if !p.children.is_empty() {
                assert_levels_sum(&p.children, p.proportion);
            }
        }
    }

    fn sample_tree() -> Vec<EvaluationProject> {
        vec![
            P::group(
                "Formative",
                40.0,
                vec![
                    P::leaf("Homework", 30.0, 95.0),
                    P::leaf("Quizzes", 50.0, 80.0),
                    P::ungraded("Project", 20.0),
                ],
            ),
            P::leaf("Midterm", 30.0, 88.0),
            P::ungraded("Final", 30.0),
        ]
    }

    #[test]
    fn normalize_redistributes_ungraded_weight() {
        let mut tree = sample_tree();
        normalize_tree(&mut tree);

        // Formative 40 and Midterm 30 share 100%.
        assert!((tree[0].proportion - 400.0 / 7.0).abs() < EPS);
        assert!((tree[1].proportion - 300.0 / 7.0).abs() < EPS);
        // Ungraded final keeps its raw proportion.
        assert_eq!(tree[2].proportion, 30.0);
        // Homework 30 and Quizzes 50 share Formative's slot.
        let formative = tree[0].proportion;
        assert!((tree[0].children[0].proportion - formative * 30.0 / 80.0).abs() < EPS);
        assert!((tree[0].children[1].proportion - formative * 50.0 / 80.0).abs() < EPS);
        assert_levels_sum(&tree, 100.0);
    }

    #[test]
    fn normalize_invariant_holds_on_deep_trees() {
        let mut tree = vec![
            P::group(
                "Summative",
                70.0,
                vec![
                    P::group(
                        "Tests",
                        2.0,
                        vec![P::leaf("Unit 1", 1.0, 70.0), P::leaf("Unit 2", 3.0, 90.0)],
                    ),
                    P::leaf("Essay", 1.0, 85.0),
                ],
            ),
            P::leaf("Participation", 10.0, 100.0),
            P::ungraded("Lab", 20.0),
        ];
        normalize_tree(&mut tree);
        assert_levels_sum(&tree, 100.0);
    }

    #[test]
    fn normalize_all_null_level_is_noop() {
        let mut tree = vec![P::ungraded("A", 60.0), P::ungraded("B", 40.0)];
        let before = tree.clone();
        normalize_tree(&mut tree);
        assert_eq!(tree, before);
    }

    #[test]
    fn normalize_zero_sum_level_skips_subtree() {
        let mut tree = vec![P::group(
            "Weightless",
            0.0,
            vec![P::leaf("Inner", 10.0, 90.0)],
        )];
        normalize_tree(&mut tree);
        assert_eq!(tree[0].proportion, 0.0);
        assert_eq!(tree[0].children[0].proportion, 10.0);
    }

    #[test]
    fn aggregate_matches_hand_computation() {
        let mut tree = sample_tree();
        normalize_tree(&mut tree);
        let formative = 400.0 / 7.0;
        let expected = (95.0 * formative * 30.0 / 80.0
            + 80.0 * formative * 50.0 / 80.0
            + 88.0 * 300.0 / 7.0)
            / 100.0;
        assert!((aggregate_score(&tree) - expected).abs() < EPS);
    }

    #[test]
    fn aggregate_all_null_is_zero() {
        let mut tree = vec![
            P::ungraded("A", 50.0),
            P::group("B", 50.0, vec![P::ungraded("B1", 100.0)]),
        ];
        tree[1].score_is_null = true;
        normalize_tree(&mut tree);
        assert_eq!(aggregate_score(&tree), 0.0);
        assert_eq!(aggregate_score(&[]), 0.0);
    }

    #[test]
    fn aggregate_stays_within_score_range() {
        let trees = [
            vec![P::leaf("Only", 17.0, 100.0)],
            vec![P::leaf("A", 1.0, 0.0), P::leaf("B", 3.0, 100.0)],
            sample_tree(),
        ];
        for mut tree in trees {
            normalize_tree(&mut tree);
            let score = aggregate_score(&tree);
            assert!((0.0..=100.0 + EPS).contains(&score), "score {score}");
        }
    }

    #[test]
    fn single_graded_leaf_scores_its_own_score() {
        let mut tree = vec![P::leaf("Only", 17.0, 83.4), P::ungraded("Later", 83.0)];
        normalize_tree(&mut tree);
        assert!((aggregate_score(&tree) - 83.4).abs() < EPS);
    }

    #[test]
    fn process_regular_subject() {
        let subject = process_subject(
            &grading(),
            &detail("English 11"),
            vec![P::leaf("Essay", 50.0, 94.0), P::leaf("Exam", 50.0, 90.0)],
            None,
            false,
        );
        assert_eq!(subject.score, 92.0);
        assert_eq!(subject.gpa, Some(3.7));
        assert_eq!(subject.unweighted_gpa, Some(3.7));
        assert_eq!(subject.max_gpa, 4.3);
        assert_eq!(subject.weight, 1.0);
        assert!(!subject.is_weighted);
        assert!(subject.is_in_grade);
        assert_eq!(subject.official_score, None);
        assert_eq!(subject.extra_credit, 0.0);
        assert_eq!(subject.id, 22);
        assert_eq!(subject.class_id, 11);
    }

    #[test]
    fn process_weighted_subject_uses_weighted_bands() {
        let subject = process_subject(
            &grading(),
            &detail("AP Chemistry"),
            vec![P::leaf("Exam", 100.0, 98.0)],
            None,
            false,
        );
        assert!(subject.is_weighted);
        assert_eq!(subject.gpa, Some(4.8));
        assert_eq!(subject.unweighted_gpa, Some(4.3));
        assert_eq!(subject.max_gpa, 4.8);
        assert_eq!(subject.unweighted_max_gpa, 4.3);
    }

    #[test]
    fn official_score_overrides_computed() {
        let info = official(Some(90.0), 100.0, true);
        let subject = process_subject(
            &grading(),
            &detail("History"),
            vec![P::leaf("All", 100.0, 88.3)],
            Some(&info),
            false,
        );
        assert_eq!(subject.score, 90.0);
        assert_eq!(subject.official_score, Some(90.0));
        assert!((subject.extra_credit - 1.7).abs() < 1e-9);
    }

    #[test]
    fn official_score_is_scaled_by_total() {
        let info = official(Some(45.0), 50.0, true);
        let subject = process_subject(
            &grading(),
            &detail("History"),
            vec![P::leaf("All", 100.0, 90.0)],
            Some(&info),
            false,
        );
        assert_eq!(subject.score, 90.0);
        assert!((subject.official_score.unwrap() - 90.0).abs() < EPS);
    }

    #[test]
    fn official_without_total_keeps_computed_score() {
        let info = official(Some(45.0), 0.0, false);
        let subject = process_subject(
            &grading(),
            &detail("Music"),
            vec![P::leaf("All", 100.0, 77.77)],
            Some(&info),
            false,
        );
        assert_eq!(subject.score, 77.8);
        assert_eq!(subject.official_score, None);
        assert_eq!(subject.extra_credit, 0.0);
        assert!(!subject.is_in_grade);
    }

    #[test]
    fn electives_and_humanities_are_half_weight() {
        let g = grading();
        let tree = || vec![P::leaf("All", 100.0, 90.0)];

        let elective = process_subject(&g, &detail("Ele Drama"), tree(), None, true);
        assert_eq!(elective.weight, 0.5);
        assert!(elective.is_elective);

        let humanities = process_subject(&g, &detail("C-Humanities"), tree(), None, false);
        assert_eq!(humanities.weight, 0.5);
        assert!(humanities.is_elective);
    }

    #[test]
    fn processed_tree_is_normalized() {
        let subject = process_subject(&grading(), &detail("Biology"), sample_tree(), None, false);
        assert_levels_sum(&subject.evaluation_details, 100.0);
    }

    #[test]
    fn processing_is_deterministic() {
        let g = grading();
        let info = official(Some(87.0), 100.0, true);
        let a = process_subject(&g, &detail("AP Physics"), sample_tree(), Some(&info), false);
        let b = process_subject(&g, &detail("AP Physics"), sample_tree(), Some(&info), false);
        assert_eq!(a, b);
        assert_eq!(a.score.to_bits(), b.score.to_bits());
        assert_eq!(a.extra_credit.to_bits(), b.extra_credit.to_bits());
    }
}
