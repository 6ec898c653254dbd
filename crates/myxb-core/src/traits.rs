//! The data-source seam between the GPA engine and the school portal.
//!
//! `myxb-client` implements this over HTTP; tests implement it in memory.

use async_trait::async_trait;

use crate::model::{EvaluationProject, Semester, SemesterScore, SubjectDetail, SubjectSummary};

/// Read-only access to a student's semesters, subjects, and scores.
#[async_trait]
pub trait ScoreSource: Send + Sync {
    /// Human-readable source name (e.g. "portal").
    fn name(&self) -> &str;

    /// All semesters, most recent first.
    async fn semesters(&self) -> anyhow::Result<Vec<Semester>>;

    /// Subjects taken in a semester, deduplicated by id.
    async fn subjects(&self, semester_id: u64) -> anyhow::Result<Vec<SubjectSummary>>;

    /// Class and subject identifiers, or `None` if the subject has no
    /// learning task to derive them from.
    async fn subject_detail(
        &self,
        semester_id: u64,
        subject_id: u64,
    ) -> anyhow::Result<Option<SubjectDetail>>;

    /// The subject's evaluation project tree, with raw proportions.
    async fn evaluation_tree(
        &self,
        class_id: u64,
        subject_id: u64,
        semester_id: u64,
    ) -> anyhow::Result<Vec<EvaluationProject>>;

    /// Semester-wide score records for every subject.
    async fn semester_scores(&self, semester_id: u64) -> anyhow::Result<Vec<SemesterScore>>;

    /// The officially published semester GPA, if any.
    async fn official_gpa(&self, semester_id: u64) -> anyhow::Result<Option<f64>>;
}
