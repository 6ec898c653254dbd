//! Semester GPA report with JSON persistence and official-GPA comparison.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{CalculatedGpa, Semester, Subject};

/// Differences at or below this are treated as rounding noise.
pub const DISCREPANCY_TOLERANCE: f64 = 0.01;

/// The outcome of one GPA computation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpaReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// The semester the report covers, when known.
    pub semester: Option<Semester>,
    /// Every processed subject, in subject-list order.
    pub subjects: Vec<Subject>,
    /// Aggregated GPA over the subjects that counted.
    pub calculated: CalculatedGpa,
    /// GPA published by the school, if any.
    pub official_gpa: Option<f64>,
    /// The official GPA could not be fetched, as opposed to being unpublished.
    #[serde(default)]
    pub official_gpa_unavailable: bool,
    /// Subjects whose data could not be fetched.
    #[serde(default)]
    pub skipped: Vec<SkippedSubject>,
    /// Total wall-clock duration in milliseconds.
    #[serde(default)]
    pub duration_ms: u64,
}

/// A subject left out of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedSubject {
    pub subject_id: u64,
    pub name: String,
    pub reason: String,
}

impl GpaReport {
    /// Calculated weighted GPA minus the official GPA, when both exist and
    /// differ by more than `tolerance`.
    pub fn discrepancy(&self, tolerance: f64) -> Option<f64> {
        let calculated = self.calculated.weighted_gpa()?;
        let official = self.official_gpa?;
        let diff = calculated - official;
        (diff.abs() > tolerance).then_some(diff)
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }
}
