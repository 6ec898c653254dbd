//! Semester GPA orchestrator.
//!
//! Fetches every subject of a semester through a [`ScoreSource`] with bounded
//! parallelism, scores each one, and aggregates the semester GPA. A subject
//! whose data cannot be fetched is skipped, never fatal.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::calculator::process_subject;
use crate::grading::GradingConfig;
use crate::model::{Semester, SemesterScore, SemesterSnapshot, Subject, SubjectSummary};
use crate::report::{GpaReport, SkippedSubject};
use crate::statistics::calculate_gpa;
use crate::traits::ScoreSource;

/// Configuration for the semester engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum subjects fetched concurrently.
    pub parallelism: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { parallelism: 4 }
    }
}

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_subject_start(&self, subject: &SubjectSummary);
    fn on_subject_complete(&self, subject: &Subject);
    fn on_subject_skipped(&self, subject: &SubjectSummary, reason: &str);
    fn on_run_complete(&self, total: usize, processed: usize, skipped: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_subject_start(&self, _: &SubjectSummary) {}
    fn on_subject_complete(&self, _: &Subject) {}
    fn on_subject_skipped(&self, _: &SubjectSummary, _: &str) {}
    fn on_run_complete(&self, _: usize, _: usize, _: usize, _: Duration) {}
}

/// Why a subject produced no result.
enum Outcome {
    Processed(Subject),
    Skipped(String),
}

/// Computes a semester GPA from a score source.
pub struct SemesterEngine {
    source: Arc<dyn ScoreSource>,
    grading: Arc<GradingConfig>,
    config: EngineConfig,
}

impl SemesterEngine {
    pub fn new(
        source: Arc<dyn ScoreSource>,
        grading: Arc<GradingConfig>,
        config: EngineConfig,
    ) -> Self {
        Self {
            source,
            grading,
            config,
        }
    }

    /// Fetch, score, and aggregate every subject of `semester`.
    pub async fn run(
        &self,
        semester: &Semester,
        progress: &dyn ProgressReporter,
    ) -> Result<GpaReport> {
        let start = Instant::now();
        anyhow::ensure!(self.config.parallelism >= 1, "parallelism must be at least 1");

        let subjects = self
            .source
            .subjects(semester.id)
            .await
            .with_context(|| format!("failed to fetch subjects for {semester}"))?;
        tracing::info!(
            source = self.source.name(),
            count = subjects.len(),
            %semester,
            "fetched subject list"
        );

        let semester_scores = match self.source.semester_scores(semester.id).await {
            Ok(scores) => scores,
            Err(e) => {
                tracing::warn!("semester-wide scores unavailable: {e:#}");
                Vec::new()
            }
        };
        let scores_by_subject: Arc<HashMap<u64, SemesterScore>> = Arc::new(
            semester_scores
                .into_iter()
                .map(|s| (s.subject_id, s))
                .collect(),
        );

        let semaphore = Arc::new(Semaphore::new(self.config.parallelism));
        let mut futures = FuturesUnordered::new();

        for (index, summary) in subjects.iter().enumerate() {
            let source = Arc::clone(&self.source);
            let grading = Arc::clone(&self.grading);
            let semaphore = Arc::clone(&semaphore);
            let scores = Arc::clone(&scores_by_subject);
            let summary = summary.clone();
            let semester_id = semester.id;

            futures.push(async move {
                let outcome = async {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|_| anyhow::anyhow!("semaphore closed"))?;
                    progress.on_subject_start(&summary);

                    let Some(detail) = source.subject_detail(semester_id, summary.id).await?
                    else {
                        return Ok(Outcome::Skipped("no learning tasks".to_string()));
                    };

                    let tree = source
                        .evaluation_tree(detail.class_id, summary.id, semester_id)
                        .await?;

                    let is_elective = grading.is_elective(&summary.name);
                    let subject = process_subject(
                        &grading,
                        &detail,
                        tree,
                        scores.get(&summary.id),
                        is_elective,
                    );
                    anyhow::Ok(Outcome::Processed(subject))
                }
                .await;
                (index, summary, outcome)
            });
        }

        let mut processed: Vec<(usize, Subject)> = Vec::new();
        let mut skipped = Vec::new();
        let total = futures.len();

        while let Some((index, summary, outcome)) = futures.next().await {
            let reason = match outcome {
                Ok(Outcome::Processed(subject)) => {
                    progress.on_subject_complete(&subject);
                    processed.push((index, subject));
                    continue;
                }
                Ok(Outcome::Skipped(reason)) => reason,
                Err(e) => format!("{e:#}"),
            };
            tracing::warn!(subject = %summary.name, "skipping subject: {reason}");
            progress.on_subject_skipped(&summary, &reason);
            skipped.push((
                index,
                SkippedSubject {
                    subject_id: summary.id,
                    name: summary.name.clone(),
                    reason,
                },
            ));
        }

        processed.sort_by_key(|(index, _)| *index);
        skipped.sort_by_key(|(index, _)| *index);
        let subjects: Vec<Subject> = processed.into_iter().map(|(_, s)| s).collect();
        let skipped: Vec<SkippedSubject> = skipped.into_iter().map(|(_, s)| s).collect();

        let calculated = calculate_gpa(&subjects, &self.grading.mappings);

        let (official_gpa, official_gpa_unavailable) =
            match self.source.official_gpa(semester.id).await {
                Ok(gpa) => (gpa, false),
                Err(e) => {
                    tracing::warn!("official GPA unavailable: {e:#}");
                    (None, true)
                }
            };

        let elapsed = start.elapsed();
        progress.on_run_complete(total, subjects.len(), skipped.len(), elapsed);

        Ok(GpaReport {
            id: Uuid::new_v4(),
            created_at: chrono::Utc::now(),
            semester: Some(semester.clone()),
            subjects,
            calculated,
            official_gpa,
            official_gpa_unavailable,
            skipped,
            duration_ms: elapsed.as_millis() as u64,
        })
    }
}

/// Score an offline snapshot without any network access.
pub fn process_snapshot(grading: &GradingConfig, snapshot: SemesterSnapshot) -> GpaReport {
    let start = Instant::now();

    let subjects: Vec<Subject> = snapshot
        .subjects
        .into_iter()
        .map(|s| {
            let is_elective = s
                .is_elective
                .unwrap_or_else(|| grading.is_elective(&s.detail.subject_name));
            process_subject(
                grading,
                &s.detail,
                s.evaluation_projects,
                s.semester_score.as_ref(),
                is_elective,
            )
        })
        .collect();

    let calculated = calculate_gpa(&subjects, &grading.mappings);

    GpaReport {
        id: Uuid::new_v4(),
        created_at: chrono::Utc::now(),
        semester: snapshot.semester,
        subjects,
        calculated,
        official_gpa: snapshot.official_gpa,
        official_gpa_unavailable: false,
        skipped: Vec::new(),
        duration_ms: start.elapsed().as_millis() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EvaluationProject, SubjectDetail, SubjectSnapshot};

    fn snapshot_subject(name: &str, score: f64) -> SubjectSnapshot {
        SubjectSnapshot {
            detail: SubjectDetail {
                subject_name: name.into(),
                class_id: 1,
                subject_id: 2,
                semester_id: 3,
            },
            evaluation_projects: vec![
                EvaluationProject::leaf("Exam", 60.0, score),
                EvaluationProject::ungraded("Final", 40.0),
            ],
            semester_score: None,
            is_elective: None,
        }
    }

    #[test]
    fn snapshot_detects_electives_by_keyword() {
        let grading = GradingConfig::builtin().unwrap();
        let snapshot = SemesterSnapshot {
            semester: None,
            official_gpa: Some(3.9),
            subjects: vec![
                snapshot_subject("Physics", 95.0),
                snapshot_subject("Ele Photography", 80.0),
            ],
        };

        let report = process_snapshot(&grading, snapshot);
        assert_eq!(report.subjects.len(), 2);
        assert_eq!(report.subjects[0].weight, 1.0);
        assert_eq!(report.subjects[1].weight, 0.5);
        assert_eq!(report.official_gpa, Some(3.9));

        // (4.0 * 1.0 + 2.7 * 0.5) / 1.5
        let gpa = report.calculated.weighted_gpa().unwrap();
        assert!((gpa - 5.35 / 1.5).abs() < 1e-9);
    }

    #[test]
    fn snapshot_elective_flag_overrides_keyword() {
        let grading = GradingConfig::builtin().unwrap();
        let mut subject = snapshot_subject("Ele Photography", 80.0);
        subject.is_elective = Some(false);
        let report = process_snapshot(
            &grading,
            SemesterSnapshot {
                semester: None,
                official_gpa: None,
                subjects: vec![subject],
            },
        );
        assert_eq!(report.subjects[0].weight, 1.0);
    }

    #[test]
    fn empty_snapshot_has_no_totals() {
        let grading = GradingConfig::builtin().unwrap();
        let report = process_snapshot(
            &grading,
            SemesterSnapshot {
                semester: None,
                official_gpa: None,
                subjects: vec![],
            },
        );
        assert!(report.calculated.totals.is_none());
    }
}
