//! In-memory score source for testing the engine without a portal.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use myxb_core::model::{EvaluationProject, Semester, SemesterScore, SubjectDetail, SubjectSummary};
use myxb_core::traits::ScoreSource;

/// A canned `ScoreSource`. Subjects registered with [`MockSource::with_subject`]
/// get a detail and evaluation tree; [`MockSource::failing`] makes a
/// subject's tree fetch return an error.
#[derive(Default)]
pub struct MockSource {
    semesters: Vec<Semester>,
    subjects: Vec<SubjectSummary>,
    trees: HashMap<u64, Vec<EvaluationProject>>,
    without_tasks: HashSet<u64>,
    failing: HashSet<u64>,
    semester_scores: Option<Vec<SemesterScore>>,
    official_gpa: Option<f64>,
    official_gpa_fails: bool,
    tree_calls: AtomicU32,
}

impl MockSource {
    pub fn new() -> Self {
        Self {
            semester_scores: Some(Vec::new()),
            ..Self::default()
        }
    }

    pub fn with_semester(mut self, semester: Semester) -> Self {
        self.semesters.push(semester);
        self
    }

    /// Add a subject with its evaluation tree.
    pub fn with_subject(mut self, id: u64, name: &str, tree: Vec<EvaluationProject>) -> Self {
        self.subjects.push(SubjectSummary {
            id,
            name: name.to_string(),
        });
        self.trees.insert(id, tree);
        self
    }

    /// Add a subject that has no learning tasks.
    pub fn with_empty_subject(mut self, id: u64, name: &str) -> Self {
        self.subjects.push(SubjectSummary {
            id,
            name: name.to_string(),
        });
        self.without_tasks.insert(id);
        self
    }

    /// Make fetching this subject's tree fail.
    pub fn failing(mut self, id: u64) -> Self {
        self.failing.insert(id);
        self
    }

    pub fn with_semester_score(mut self, score: SemesterScore) -> Self {
        self.semester_scores.get_or_insert_with(Vec::new).push(score);
        self
    }

    /// Make the semester-wide score fetch fail.
    pub fn without_semester_scores(mut self) -> Self {
        self.semester_scores = None;
        self
    }

    pub fn with_official_gpa(mut self, gpa: f64) -> Self {
        self.official_gpa = Some(gpa);
        self
    }

    /// Make the official GPA fetch fail.
    pub fn failing_official_gpa(mut self) -> Self {
        self.official_gpa_fails = true;
        self
    }

    /// Number of evaluation tree fetches made.
    pub fn tree_calls(&self) -> u32 {
        self.tree_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ScoreSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn semesters(&self) -> anyhow::Result<Vec<Semester>> {
        Ok(self.semesters.clone())
    }

    async fn subjects(&self, _semester_id: u64) -> anyhow::Result<Vec<SubjectSummary>> {
        Ok(self.subjects.clone())
    }

    async fn subject_detail(
        &self,
        semester_id: u64,
        subject_id: u64,
    ) -> anyhow::Result<Option<SubjectDetail>> {
        if self.without_tasks.contains(&subject_id) {
            return Ok(None);
        }
        let subject = self
            .subjects
            .iter()
            .find(|s| s.id == subject_id)
            .ok_or_else(|| anyhow::anyhow!("unknown subject {subject_id}"))?;
        Ok(Some(SubjectDetail {
            subject_name: subject.name.clone(),
            class_id: subject_id + 1000,
            subject_id,
            semester_id,
        }))
    }

    async fn evaluation_tree(
        &self,
        _class_id: u64,
        subject_id: u64,
        _semester_id: u64,
    ) -> anyhow::Result<Vec<EvaluationProject>> {
        self.tree_calls.fetch_add(1, Ordering::Relaxed);
        if self.failing.contains(&subject_id) {
            anyhow::bail!("simulated failure for subject {subject_id}");
        }
        Ok(self.trees.get(&subject_id).cloned().unwrap_or_default())
    }

    async fn semester_scores(&self, _semester_id: u64) -> anyhow::Result<Vec<SemesterScore>> {
        self.semester_scores
            .clone()
            .ok_or_else(|| anyhow::anyhow!("semester scores unavailable"))
    }

    async fn official_gpa(&self, _semester_id: u64) -> anyhow::Result<Option<f64>> {
        if self.official_gpa_fails {
            anyhow::bail!("official GPA unavailable");
        }
        Ok(self.official_gpa)
    }
}
