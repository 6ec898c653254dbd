//! Core data model types for myxb.
//!
//! Input types mirror the portal's JSON (camelCase wire names) so they can be
//! deserialized directly from API payloads or offline snapshots. Result types
//! (`Subject`, `CalculatedGpa`) are produced by the calculator.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize an explicit JSON `null` as the type's default value.
fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A school semester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Semester {
    pub id: u64,
    pub year: u64,
    /// Semester number within the school year (1 or 2).
    pub semester: u64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub is_now: bool,
    #[serde(default, deserialize_with = "null_to_default")]
    pub start_date: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub end_date: String,
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{} Semester {}",
            self.year,
            self.year + 1,
            self.semester
        )
    }
}

/// A subject entry from the semester's subject list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectSummary {
    pub id: u64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub name: String,
}

/// Identifying details for a subject, derived from one of its learning tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectDetail {
    #[serde(default, deserialize_with = "null_to_default")]
    pub subject_name: String,
    pub class_id: u64,
    pub subject_id: u64,
    #[serde(rename = "schoolSemesterId", default)]
    pub semester_id: u64,
}

/// One graded component of a subject. Projects nest arbitrarily.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationProject {
    #[serde(
        rename = "evaluationProjectEName",
        default,
        deserialize_with = "null_to_default"
    )]
    pub name: String,
    /// Percent of the parent's allotment. Rewritten in place by normalization.
    #[serde(default, deserialize_with = "null_to_default")]
    pub proportion: f64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub score: f64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub score_is_null: bool,
    /// Display label supplied by the portal.
    #[serde(rename = "scoreLevel", default, deserialize_with = "null_to_default")]
    pub level: String,
    #[serde(default)]
    pub gpa: Option<f64>,
    #[serde(
        rename = "learningTaskAndExamList",
        default,
        deserialize_with = "null_to_default"
    )]
    pub tasks: Vec<LearningTask>,
    #[serde(
        rename = "evaluationProjectList",
        default,
        deserialize_with = "null_to_default"
    )]
    pub children: Vec<EvaluationProject>,
}

impl EvaluationProject {
    /// A graded leaf project.
    pub fn leaf(name: impl Into<String>, proportion: f64, score: f64) -> Self {
        Self {
            name: name.into(),
            proportion,
            score,
            score_is_null: false,
            level: String::new(),
            gpa: None,
            tasks: Vec::new(),
            children: Vec::new(),
        }
    }

    /// A leaf project that has not been graded yet.
    pub fn ungraded(name: impl Into<String>, proportion: f64) -> Self {
        Self {
            score_is_null: true,
            ..Self::leaf(name, proportion, 0.0)
        }
    }

    /// A graded group whose score is derived from its children.
    pub fn group(
        name: impl Into<String>,
        proportion: f64,
        children: Vec<EvaluationProject>,
    ) -> Self {
        Self {
            children,
            ..Self::leaf(name, proportion, 0.0)
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A single assignment or exam inside an evaluation project. Display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningTask {
    #[serde(default, deserialize_with = "null_to_default")]
    pub name: String,
    /// `None` while ungraded.
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub total_score: f64,
}

impl LearningTask {
    /// Percentage score, if graded and the total is positive.
    pub fn percent(&self) -> Option<f64> {
        match self.score {
            Some(score) if self.total_score > 0.0 => Some(score / self.total_score * 100.0),
            _ => None,
        }
    }
}

/// Semester-wide score record for one subject, as published by the school.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterScore {
    #[serde(default)]
    pub class_id: u64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub class_name: String,
    pub subject_id: u64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub subject_name: String,
    /// Missing or `null` means the subject is not in grade.
    #[serde(default, deserialize_with = "null_to_default")]
    pub is_in_grade: bool,
    #[serde(rename = "subjectScore", default)]
    pub official_score: Option<f64>,
    #[serde(default)]
    pub score_mapping_id: u64,
    #[serde(rename = "subjectTotalScore", default, deserialize_with = "null_to_default")]
    pub official_total_score: f64,
}

/// A fully scored subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: u64,
    pub name: String,
    pub class_id: u64,
    /// Final score, rounded to one decimal.
    pub score: f64,
    /// Score published by the school, as a percentage.
    pub official_score: Option<f64>,
    /// Official score minus the rounded computed score; 0 without an official score.
    pub extra_credit: f64,
    pub gpa: Option<f64>,
    pub unweighted_gpa: Option<f64>,
    pub max_gpa: f64,
    pub unweighted_max_gpa: f64,
    /// Credit weight: 1.0 for regular subjects, 0.5 for electives.
    pub weight: f64,
    pub is_weighted: bool,
    pub is_elective: bool,
    /// Whether the subject counts toward the semester GPA.
    pub is_in_grade: bool,
    /// The normalized evaluation tree.
    pub evaluation_details: Vec<EvaluationProject>,
}

impl Subject {
    /// "Regular" or "Weighted", suffixed with " Elective" where it applies.
    pub fn kind_label(&self) -> String {
        let mut label = if self.is_weighted {
            "Weighted".to_string()
        } else {
            "Regular".to_string()
        };
        if self.is_elective {
            label.push_str(" Elective");
        }
        label
    }
}

/// Semester GPA figures. Only exist when at least one subject counted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpaTotals {
    pub weighted_gpa: f64,
    pub max_gpa: f64,
    pub unweighted_gpa: f64,
    pub unweighted_max_gpa: f64,
}

/// Result of aggregating a semester's subjects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatedGpa {
    /// `None` when no subject qualified for aggregation.
    pub totals: Option<GpaTotals>,
    /// The subjects that counted.
    pub subjects: Vec<Subject>,
}

impl CalculatedGpa {
    pub fn weighted_gpa(&self) -> Option<f64> {
        self.totals.map(|t| t.weighted_gpa)
    }

    pub fn max_gpa(&self) -> Option<f64> {
        self.totals.map(|t| t.max_gpa)
    }

    pub fn unweighted_gpa(&self) -> Option<f64> {
        self.totals.map(|t| t.unweighted_gpa)
    }

    pub fn unweighted_max_gpa(&self) -> Option<f64> {
        self.totals.map(|t| t.unweighted_max_gpa)
    }
}

/// Raw inputs for one subject in an offline snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectSnapshot {
    pub detail: SubjectDetail,
    #[serde(default)]
    pub evaluation_projects: Vec<EvaluationProject>,
    #[serde(default)]
    pub semester_score: Option<SemesterScore>,
    /// Overrides the keyword-based elective detection when set.
    #[serde(default)]
    pub is_elective: Option<bool>,
}

/// Everything needed to compute a semester GPA without the network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemesterSnapshot {
    #[serde(default)]
    pub semester: Option<Semester>,
    #[serde(default)]
    pub official_gpa: Option<f64>,
    #[serde(default)]
    pub subjects: Vec<SubjectSnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semester_display() {
        let semester = Semester {
            id: 7,
            year: 2024,
            semester: 2,
            is_now: true,
            start_date: String::new(),
            end_date: String::new(),
        };
        assert_eq!(semester.to_string(), "2024-2025 Semester 2");
    }

    #[test]
    fn evaluation_project_from_portal_json() {
        let json = r#"{
            "evaluationProjectEName": "Assessments",
            "proportion": 60,
            "score": 91.5,
            "scoreLevel": "A-",
            "gpa": 3.7,
            "scoreIsNull": false,
            "learningTaskAndExamList": [
                {"name": "Quiz 1", "score": 18, "totalScore": 20},
                {"name": "Quiz 2", "score": null, "totalScore": 20}
            ],
            "evaluationProjectList": null
        }"#;
        let project: EvaluationProject = serde_json::from_str(json).unwrap();
        assert_eq!(project.name, "Assessments");
        assert_eq!(project.proportion, 60.0);
        assert_eq!(project.gpa, Some(3.7));
        assert!(project.children.is_empty());
        assert_eq!(project.tasks.len(), 2);
        assert_eq!(project.tasks[0].percent(), Some(90.0));
        assert_eq!(project.tasks[1].percent(), None);
    }

    #[test]
    fn null_score_deserializes_as_zero() {
        let json = r#"{"evaluationProjectEName": "Final", "proportion": 40,
                       "score": null, "scoreIsNull": true, "scoreLevel": null}"#;
        let project: EvaluationProject = serde_json::from_str(json).unwrap();
        assert!(project.score_is_null);
        assert_eq!(project.score, 0.0);
        assert!(project.level.is_empty());
    }

    #[test]
    fn task_percent_requires_positive_total() {
        let task = LearningTask {
            name: "Bonus".into(),
            score: Some(5.0),
            total_score: 0.0,
        };
        assert_eq!(task.percent(), None);
    }

    #[test]
    fn semester_score_in_grade_flag() {
        let json = r#"{"subjectId": 3, "isInGrade": true, "subjectScore": 88, "subjectTotalScore": 100}"#;
        let score: SemesterScore = serde_json::from_str(json).unwrap();
        assert!(score.is_in_grade);
        assert_eq!(score.official_score, Some(88.0));
    }

    #[test]
    fn semester_score_null_in_grade_is_false() {
        let json = r#"{"subjectId": 3, "isInGrade": null, "subjectScore": 88, "subjectTotalScore": 100}"#;
        let score: SemesterScore = serde_json::from_str(json).unwrap();
        assert!(!score.is_in_grade);
        assert_eq!(score.official_total_score, 100.0);
    }

    #[test]
    fn semester_score_missing_in_grade_is_false() {
        let json = r#"{"subjectId": 3, "subjectScore": 88, "subjectTotalScore": 100}"#;
        let score: SemesterScore = serde_json::from_str(json).unwrap();
        assert!(!score.is_in_grade);
    }

    #[test]
    fn semester_list_tolerates_null_is_now() {
        let json = r#"[
            {"id": 1, "year": 2024, "semester": 1, "isNow": null},
            {"id": 2, "year": 2024, "semester": 2, "isNow": true}
        ]"#;
        let semesters: Vec<Semester> = serde_json::from_str(json).unwrap();
        assert!(!semesters[0].is_now);
        assert!(semesters[1].is_now);
    }
}
